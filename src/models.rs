//! 数据模型模块
//!
//! 各端点的响应/请求类型。所有数值（额度、价格、订单状态）均以后端为准，
//! 客户端只做展示，不在本地推算。字段带 `#[serde(default)]` 以容忍
//! 后端响应中缺失的字段，解析失败不会导致视图崩溃。

use serde::{Deserialize, Serialize};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 管理员角色阈值：role >= 10 即为管理员。
/// 唯一定义点，路由守卫与菜单渲染共用。
pub const ADMIN_ROLE: i32 = 10;

// =========================================================
// 响应信封 (Response Envelope)
// =========================================================

/// 后端统一响应信封：`{success, message?, data?, total?}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// 分页列表响应携带的总条数
    #[serde(default)]
    pub total: Option<i64>,
}

/// 已解包的分页结果
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: i32,
    /// 1=启用, 2=禁用
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub newapi_user_id: i64,
    #[serde(default)]
    pub newapi_username: String,
    /// 0=未绑定, 1=已绑定
    #[serde(default)]
    pub newapi_bound: i32,
    #[serde(default)]
    pub email_remind: i32,
    #[serde(default)]
    pub remind_days: i32,
    #[serde(default)]
    pub created_at: String,
    /// 管理端用户列表会附带当前订阅
    #[serde(default, skip_serializing)]
    pub subscription: Option<Subscription>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role >= ADMIN_ROLE
    }

    pub fn is_newapi_bound(&self) -> bool {
        self.newapi_bound == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Plan {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// day/week/month/custom
    #[serde(default)]
    pub period_type: String,
    #[serde(default)]
    pub period_days: i64,
    #[serde(default)]
    pub daily_quota: i64,
    /// 0=不结转, 1=结转
    #[serde(default)]
    pub carry_over: i32,
    /// 最大结转额度 (0=无限制)
    #[serde(default)]
    pub max_carry_over: i64,
    /// fixed=固定价格, daily=按天计价
    #[serde(default)]
    pub price_type: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub newapi_group: String,
    /// 1=上架, 0=下架
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Subscription {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub plan_id: u64,
    /// active/expired/cancelled
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub today_quota: i64,
    #[serde(default)]
    pub carried_quota: i64,
    #[serde(default)]
    pub daily_quota: i64,
    #[serde(default)]
    pub carry_over: i32,
    #[serde(default)]
    pub max_carry_over: i64,
    #[serde(default)]
    pub newapi_group: String,
    #[serde(default)]
    pub plan: Option<Plan>,
}

/// `GET /subscriptions/current` 的负载；无订阅时整个 data 为 null
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentSubscription {
    pub subscription: Subscription,
    #[serde(default)]
    pub current_quota: i64,
    #[serde(default)]
    pub days_remaining: i64,
}

/// `GET /subscriptions/usage` 今日用量负载
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TodayUsage {
    #[serde(default)]
    pub today_used: i64,
    #[serde(default)]
    pub daily_quota: i64,
    #[serde(default)]
    pub current_quota: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Order {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub order_no: String,
    /// new=新购, renew=续费
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    pub period_days: i64,
    #[serde(default)]
    pub amount: f64,
    /// alipay/wxpay
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub trade_no: String,
    /// pending/paid/cancelled/refunded
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsageLog {
    #[serde(default)]
    pub id: u64,
    /// Unix 秒级时间戳
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub quota: i64,
    #[serde(default)]
    pub prompt_tokens: i64,
    #[serde(default)]
    pub completion_tokens: i64,
}

/// 站点设置：后端以 map[string]string 存储，开关取值 "0"/"1"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SiteSettings {
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub site_description: String,
    #[serde(default)]
    pub require_login: String,
    #[serde(default)]
    pub allow_register: String,
    #[serde(default)]
    pub newapi_login_enabled: String,
}

pub fn flag_on(value: &str) -> bool {
    value == "1"
}

pub fn flag_str(on: bool) -> String {
    if on { "1".to_string() } else { "0".to_string() }
}

// =========================================================
// 组合负载 (Composite Payloads)
// =========================================================

/// 登录/注册成功负载：`{token, user}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// 购买成功负载：`{order, newapi_action}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PurchasePayload {
    pub order: Order,
    #[serde(default)]
    pub newapi_action: String,
}

/// 支付创建负载：`{pay_url}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayPayload {
    pub pay_url: String,
    #[serde(default)]
    pub order_no: String,
}

/// 管理端用户详情负载：`{user, subscription, current_quota}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminUserDetail {
    pub user: User,
    /// 后端无订阅时可能给出零值结构，以 id == 0 判断
    #[serde(default)]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub current_quota: i64,
}

// =========================================================
// 请求体 (Request Bodies)
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest {
    pub plan_id: u64,
    /// 自定义天数（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_days: Option<i64>,
    /// bind_existing / create_new / overwrite
    pub newapi_action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newapi_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newapi_password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewRequest {
    pub period_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayRequest {
    pub order_id: u64,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BindNewApiRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailSettingsRequest {
    pub email_remind: i32,
    pub remind_days: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminUpdateUserRequest {
    pub status: i32,
}

/// 套餐创建/更新请求体（管理端）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanUpsertRequest {
    pub name: String,
    pub description: String,
    pub period_type: String,
    pub period_days: i64,
    pub daily_quota: i64,
    pub carry_over: i32,
    pub max_carry_over: i64,
    pub price_type: String,
    pub price: f64,
    pub newapi_group: String,
    pub status: i32,
    pub sort_order: i32,
}

// =========================================================
// 展示辅助 (Display Helpers)
// =========================================================

pub fn period_type_label(period_type: &str) -> &'static str {
    match period_type {
        "day" => "天",
        "week" => "周",
        "month" => "月",
        _ => "自定义",
    }
}

/// 订单状态 -> (文案, badge 样式)
pub fn order_status_label(status: &str) -> (&'static str, &'static str) {
    match status {
        "pending" => ("待支付", "badge badge-warning"),
        "paid" => ("已支付", "badge badge-success"),
        "cancelled" => ("已取消", "badge badge-ghost"),
        "refunded" => ("已退款", "badge badge-error"),
        _ => ("未知", "badge badge-ghost"),
    }
}

pub fn order_type_label(order_type: &str) -> &'static str {
    if order_type == "renew" { "续费" } else { "新购" }
}

/// RFC3339 时间串 -> "YYYY-MM-DD HH:MM"；解析失败时原样截断
pub fn fmt_datetime(value: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => value.chars().take(16).collect::<String>().replace('T', " "),
    }
}

/// RFC3339 时间串 -> "YYYY-MM-DD"
pub fn fmt_date(value: &str) -> String {
    value.chars().take(10).collect()
}

/// Unix 秒级时间戳 -> "YYYY-MM-DD HH:MM:SS" (UTC)
pub fn fmt_unix(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}

/// "YYYY-MM-DD" 日期输入 -> 当日零点的 Unix 秒级时间戳 (UTC)
pub fn parse_date_secs(value: &str) -> Option<i64> {
    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

// =========================================================
// 分页计算 (Pagination Math)
// =========================================================

/// 总页数（至少 1 页）
pub fn page_count(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// 第 page 页应有的行数：`min(per_page, total - (page-1)*per_page)`，越界为 0
pub fn rows_on_page(total: i64, page: i64, per_page: i64) -> i64 {
    if page < 1 || per_page <= 0 {
        return 0;
    }
    let skipped = (page - 1) * per_page;
    if total > skipped {
        per_page.min(total - skipped)
    } else {
        0
    }
}

// =========================================================
// 请求序号 (Request Sequencing)
// =========================================================

/// 请求序号守卫
///
/// 分页/筛选列表的响应可能乱序返回。每次发起请求先 `issue` 领取新序号，
/// 响应回来时用 `accepts` 校验：领取过更新序号则视为过期，直接丢弃，
/// 保证旧页/旧筛选的慢响应不会覆盖当前数据。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReqSeq {
    latest: u64,
}

impl ReqSeq {
    /// 领取新序号，同时作废所有在途请求
    pub fn issue(&mut self) -> u64 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    /// 序号是否仍是最新
    pub fn accepts(&self, tag: u64) -> bool {
        self.latest == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_threshold_is_ten() {
        let mut user = User::default();
        user.role = 9;
        assert!(!user.is_admin());
        user.role = 10;
        assert!(user.is_admin());
        user.role = 11;
        assert!(user.is_admin());
    }

    #[test]
    fn parse_login_envelope() {
        let body = r#"{
            "success": true,
            "data": {"token": "T", "user": {"id": 1, "username": "alice", "role": 1}}
        }"#;
        let env: ApiEnvelope<AuthPayload> = serde_json::from_str(body).unwrap();
        assert!(env.success);
        let payload = env.data.unwrap();
        assert_eq!(payload.token, "T");
        assert_eq!(payload.user.username, "alice");
        assert!(!payload.user.is_admin());
    }

    #[test]
    fn parse_failure_envelope() {
        let body = r#"{"success": false, "message": "用户名或密码错误"}"#;
        let env: ApiEnvelope<AuthPayload> = serde_json::from_str(body).unwrap();
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("用户名或密码错误"));
        assert!(env.data.is_none());
    }

    #[test]
    fn parse_null_data_envelope() {
        // 无订阅时 data 为 null
        let body = r#"{"success": true, "data": null}"#;
        let env: ApiEnvelope<CurrentSubscription> = serde_json::from_str(body).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn parse_paginated_envelope() {
        let body = r#"{
            "success": true,
            "data": [{"id": 1, "order_no": "N1", "status": "paid", "amount": 9.9}],
            "total": 42,
            "page": 1,
            "per_page": 10
        }"#;
        let env: ApiEnvelope<Vec<Order>> = serde_json::from_str(body).unwrap();
        let items = env.data.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].order_no, "N1");
        assert_eq!(env.total, Some(42));
    }

    #[test]
    fn parse_plan_tolerates_missing_fields() {
        let body = r#"{"id": 3, "name": "基础版", "daily_quota": 500000}"#;
        let plan: Plan = serde_json::from_str(body).unwrap();
        assert_eq!(plan.name, "基础版");
        assert_eq!(plan.daily_quota, 500000);
        assert_eq!(plan.carry_over, 0);
        assert!(plan.newapi_group.is_empty());
    }

    #[test]
    fn rows_on_page_matches_contract() {
        // total=25, per_page=10: 页行数 10/10/5，之后为 0
        assert_eq!(rows_on_page(25, 1, 10), 10);
        assert_eq!(rows_on_page(25, 2, 10), 10);
        assert_eq!(rows_on_page(25, 3, 10), 5);
        assert_eq!(rows_on_page(25, 4, 10), 0);
        // 空列表
        assert_eq!(rows_on_page(0, 1, 10), 0);
        // 非法入参
        assert_eq!(rows_on_page(10, 0, 10), 0);
        assert_eq!(rows_on_page(10, 1, 0), 0);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
    }

    #[test]
    fn stale_request_tags_are_rejected() {
        let mut seq = ReqSeq::default();
        let first = seq.issue();
        assert!(seq.accepts(first));

        // 翻页/改筛选发出第二个请求后，第一个请求的慢响应必须被丢弃
        let second = seq.issue();
        assert!(!seq.accepts(first));
        assert!(seq.accepts(second));

        let third = seq.issue();
        assert!(!seq.accepts(second));
        assert!(seq.accepts(third));
    }

    #[test]
    fn datetime_formatting() {
        assert_eq!(fmt_datetime("2026-03-01T08:30:00+08:00"), "2026-03-01 08:30");
        assert_eq!(fmt_date("2026-03-01T08:30:00Z"), "2026-03-01");
        assert_eq!(fmt_unix(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn date_input_to_unix_secs() {
        assert_eq!(parse_date_secs("1970-01-02"), Some(86400));
        assert_eq!(parse_date_secs(""), None);
        assert_eq!(parse_date_secs("not-a-date"), None);
    }

    #[test]
    fn settings_flags() {
        assert!(flag_on("1"));
        assert!(!flag_on("0"));
        assert!(!flag_on(""));
        assert_eq!(flag_str(true), "1");
        assert_eq!(flag_str(false), "0");
    }
}
