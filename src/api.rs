//! API 客户端模块
//!
//! 所有后端请求的唯一出口：统一附加 Bearer 凭据、解包响应信封、
//! 集中处理 401（同步清空会话，路由服务随后重定向到登录页）。
//!
//! 契约：每个方法的 Ok 值都是已解包的 data 负载；
//! 每个 Err 都是带人类可读消息的 [`ApiError`]。

use crate::auth::AuthContext;
use crate::models::*;
use gloo_net::http::{Request, RequestBuilder};
use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 后端固定路径前缀
pub const API_BASE: &str = "/api";

/// 结构化错误：被拒绝的调用至少携带一条可读消息
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// API 客户端
///
/// 持有会话上下文以读取凭据；本身为 Copy，直接存入 Context 共享。
#[derive(Clone, Copy)]
pub struct ApiClient {
    auth: AuthContext,
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient should be provided")
}

impl ApiClient {
    pub fn new(auth: AuthContext) -> Self {
        Self { auth }
    }

    fn url(path: &str) -> String {
        format!("{}{}", API_BASE, path)
    }

    /// 有 token 则附加 Bearer 凭据，否则匿名发送
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// 核心发送路径：发送 -> 401 拦截 -> 信封校验
    async fn run<T: DeserializeOwned>(
        &self,
        request: Result<gloo_net::http::Request, gloo_net::Error>,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let request = request.map_err(|e| ApiError::new(format!("请求构建失败: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::new(format!("网络错误: {}", e)))?;

        let status = response.status();
        let envelope: Option<ApiEnvelope<T>> = response.json().await.ok();

        if status == 401 {
            web_sys::console::log_1(&"[Api] 401 Unauthorized. Clearing session.".into());
            // 同步清空会话，路由服务监听到信号变化后跳转登录页
            self.auth.logout();
            let message = envelope
                .and_then(|env| env.message)
                .unwrap_or_else(|| "登录已过期，请重新登录".to_string());
            return Err(ApiError::new(message));
        }

        let envelope = envelope.ok_or_else(|| ApiError::new("响应解析失败"))?;
        if !envelope.success {
            return Err(ApiError::new(
                envelope.message.unwrap_or_else(|| "请求失败".to_string()),
            ));
        }
        Ok(envelope)
    }

    /// GET，data 必须存在
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let env = self
            .run::<T>(self.authed(Request::get(&Self::url(path))).build())
            .await?;
        env.data.ok_or_else(|| ApiError::new("响应缺少数据"))
    }

    /// GET，data 可为 null
    async fn get_opt<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        Ok(self
            .run::<T>(self.authed(Request::get(&Self::url(path))).build())
            .await?
            .data)
    }

    /// GET 分页列表
    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Paged<T>, ApiError> {
        let env = self
            .run::<Vec<T>>(self.authed(Request::get(&Self::url(path))).build())
            .await?;
        Ok(Paged {
            items: env.data.unwrap_or_default(),
            total: env.total.unwrap_or(0),
        })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let env = self
            .run::<T>(self.authed(Request::post(&Self::url(path))).json(body))
            .await?;
        env.data.ok_or_else(|| ApiError::new("响应缺少数据"))
    }

    /// POST，只关心成功与否
    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.run::<serde_json::Value>(self.authed(Request::post(&Self::url(path))).json(body))
            .await
            .map(|_| ())
    }

    /// 无请求体的 POST
    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.run::<serde_json::Value>(self.authed(Request::post(&Self::url(path))).build())
            .await
            .map(|_| ())
    }

    async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.run::<serde_json::Value>(self.authed(Request::put(&Self::url(path))).json(body))
            .await
            .map(|_| ())
    }

    async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        self.run::<serde_json::Value>(self.authed(Request::delete(&Self::url(path))).build())
            .await
            .map(|_| ())
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.post_json("/auth/login", req).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthPayload, ApiError> {
        self.post_json("/auth/register", req).await
    }

    /// 使用 new-api 账号登录（站点开关允许时）
    pub async fn login_newapi(&self, req: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.post_json("/auth/login/newapi", req).await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_data("/auth/me").await
    }

    // =========================================================
    // 套餐
    // =========================================================

    pub async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        self.get_data("/plans").await
    }

    pub async fn get_plan(&self, id: u64) -> Result<Plan, ApiError> {
        self.get_data(&format!("/plans/{}", id)).await
    }

    /// 套餐分组内可用的模型列表
    pub async fn get_plan_models(&self, id: u64) -> Result<Vec<String>, ApiError> {
        self.get_data(&format!("/plans/{}/models", id)).await
    }

    // =========================================================
    // 订阅
    // =========================================================

    /// 当前订阅；无订阅时返回 None
    pub async fn current_subscription(&self) -> Result<Option<CurrentSubscription>, ApiError> {
        self.get_opt("/subscriptions/current").await
    }

    pub async fn purchase(&self, req: &PurchaseRequest) -> Result<PurchasePayload, ApiError> {
        self.post_json("/subscriptions/purchase", req).await
    }

    /// 续费当前订阅，返回待支付订单
    pub async fn renew(&self, req: &RenewRequest) -> Result<Order, ApiError> {
        self.post_json("/subscriptions/renew", req).await
    }

    /// 分页使用日志
    pub async fn usage_logs(&self, page: i64, per_page: i64) -> Result<Paged<UsageLog>, ApiError> {
        self.get_paged(&format!(
            "/subscriptions/usage?page={}&per_page={}",
            page, per_page
        ))
        .await
    }

    /// 按日期范围（Unix 秒）查询使用明细
    pub async fn usage_detail(
        &self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<UsageLog>, ApiError> {
        let mut path = String::from("/subscriptions/usage/detail?");
        if let Some(start) = start {
            path.push_str(&format!("start_date={}&", start));
        }
        if let Some(end) = end {
            path.push_str(&format!("end_date={}&", end));
        }
        path.pop();
        self.get_data(&path).await
    }

    /// 今日用量（需已绑定 new-api 账号）
    pub async fn today_usage(&self) -> Result<TodayUsage, ApiError> {
        self.get_data("/subscriptions/usage/today").await
    }

    // =========================================================
    // 订单
    // =========================================================

    pub async fn list_orders(&self, page: i64, per_page: i64) -> Result<Paged<Order>, ApiError> {
        self.get_paged(&format!("/orders?page={}&per_page={}", page, per_page))
            .await
    }

    pub async fn get_order(&self, id: u64) -> Result<Order, ApiError> {
        self.get_data(&format!("/orders/{}", id)).await
    }

    /// 创建支付，返回网关跳转地址
    pub async fn pay_order(&self, req: &PayRequest) -> Result<PayPayload, ApiError> {
        self.post_json("/orders/pay", req).await
    }

    // =========================================================
    // 用户
    // =========================================================

    pub async fn update_profile(&self, req: &UpdateProfileRequest) -> Result<(), ApiError> {
        self.put_unit("/user/profile", req).await
    }

    pub async fn bind_newapi(&self, req: &BindNewApiRequest) -> Result<(), ApiError> {
        self.post_unit("/user/bind-newapi", req).await
    }

    pub async fn update_email_settings(&self, req: &EmailSettingsRequest) -> Result<(), ApiError> {
        self.put_unit("/user/email-settings", req).await
    }

    // =========================================================
    // 管理员
    // =========================================================

    pub async fn admin_users(
        &self,
        page: i64,
        per_page: i64,
        keyword: &str,
    ) -> Result<Paged<User>, ApiError> {
        self.get_paged(&format!(
            "/admin/users?page={}&per_page={}&keyword={}",
            page,
            per_page,
            urlencoding::encode(keyword)
        ))
        .await
    }

    pub async fn admin_user(&self, id: u64) -> Result<AdminUserDetail, ApiError> {
        self.get_data(&format!("/admin/users/{}", id)).await
    }

    /// 用户使用记录；未绑定 new-api 账号时后端返回 null
    pub async fn admin_user_usage(&self, id: u64) -> Result<Vec<UsageLog>, ApiError> {
        Ok(self
            .get_opt(&format!("/admin/users/{}/usage", id))
            .await?
            .unwrap_or_default())
    }

    pub async fn admin_update_user(
        &self,
        id: u64,
        req: &AdminUpdateUserRequest,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/admin/users/{}", id), req).await
    }

    pub async fn admin_orders(
        &self,
        page: i64,
        per_page: i64,
        status: &str,
    ) -> Result<Paged<Order>, ApiError> {
        let mut path = format!("/admin/orders?page={}&per_page={}", page, per_page);
        if !status.is_empty() {
            path.push_str(&format!("&status={}", status));
        }
        self.get_paged(&path).await
    }

    pub async fn admin_create_plan(&self, req: &PlanUpsertRequest) -> Result<(), ApiError> {
        self.post_unit("/admin/plans", req).await
    }

    pub async fn admin_update_plan(
        &self,
        id: u64,
        req: &PlanUpsertRequest,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/admin/plans/{}", id), req).await
    }

    pub async fn admin_delete_plan(&self, id: u64) -> Result<(), ApiError> {
        self.delete_unit(&format!("/admin/plans/{}", id)).await
    }

    pub async fn admin_settings(&self) -> Result<SiteSettings, ApiError> {
        self.get_data("/admin/settings").await
    }

    pub async fn admin_update_settings(&self, req: &SiteSettings) -> Result<(), ApiError> {
        self.put_unit("/admin/settings", req).await
    }

    /// 手动触发订阅额度同步
    pub async fn admin_trigger_sync(&self) -> Result<(), ApiError> {
        self.post_empty("/admin/sync/trigger").await
    }

    pub async fn admin_newapi_groups(&self) -> Result<Vec<String>, ApiError> {
        self.get_data("/admin/newapi/groups").await
    }
}
