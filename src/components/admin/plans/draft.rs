//! 套餐表单草稿
//!
//! 表单原始输入（全部字符串）与校验逻辑，和渲染层分离。
//! `validate` 返回可直接提交的请求体，或按字段归集的错误列表。

use crate::models::{Plan, PlanUpsertRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanDraft {
    pub name: String,
    pub description: String,
    pub period_type: String,
    pub period_days: String,
    pub daily_quota: String,
    pub carry_over: bool,
    pub max_carry_over: String,
    pub price_type: String,
    pub price: String,
    pub newapi_group: String,
    pub status: bool,
    pub sort_order: String,
}

/// 字段级错误：(字段名, 提示文案)
pub type FieldErrors = Vec<(&'static str, String)>;

impl PlanDraft {
    /// 新建套餐的默认草稿
    pub fn new() -> Self {
        Self {
            period_type: "month".to_string(),
            period_days: "30".to_string(),
            daily_quota: String::new(),
            max_carry_over: "0".to_string(),
            price_type: "fixed".to_string(),
            price: String::new(),
            status: true,
            sort_order: "0".to_string(),
            ..Self::default()
        }
    }

    /// 从已有套餐构建编辑草稿
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            name: plan.name.clone(),
            description: plan.description.clone(),
            period_type: plan.period_type.clone(),
            period_days: plan.period_days.to_string(),
            daily_quota: plan.daily_quota.to_string(),
            carry_over: plan.carry_over == 1,
            max_carry_over: plan.max_carry_over.to_string(),
            price_type: plan.price_type.clone(),
            price: plan.price.to_string(),
            newapi_group: plan.newapi_group.clone(),
            status: plan.status == 1,
            sort_order: plan.sort_order.to_string(),
        }
    }

    /// 校验并生成请求体
    pub fn validate(&self) -> Result<PlanUpsertRequest, FieldErrors> {
        let mut errors: FieldErrors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(("name", "请输入套餐名称".to_string()));
        }

        if !matches!(self.period_type.as_str(), "day" | "week" | "month" | "custom") {
            errors.push(("period_type", "请选择周期类型".to_string()));
        }

        let period_days = match self.period_days.trim().parse::<i64>() {
            Ok(v) if v >= 1 => v,
            _ => {
                errors.push(("period_days", "周期天数应为不小于 1 的整数".to_string()));
                0
            }
        };

        let daily_quota = match self.daily_quota.trim().parse::<i64>() {
            Ok(v) if v >= 1 => v,
            _ => {
                errors.push(("daily_quota", "每日额度应为不小于 1 的整数".to_string()));
                0
            }
        };

        let max_carry_over = match self.max_carry_over.trim().parse::<i64>() {
            Ok(v) if v >= 0 => v,
            _ => {
                errors.push(("max_carry_over", "最大结转额度应为非负整数".to_string()));
                0
            }
        };

        if !matches!(self.price_type.as_str(), "fixed" | "daily") {
            errors.push(("price_type", "请选择价格类型".to_string()));
        }

        let price = match self.price.trim().parse::<f64>() {
            Ok(v) if v >= 0.0 => v,
            _ => {
                errors.push(("price", "价格应为非负数字".to_string()));
                0.0
            }
        };

        if self.newapi_group.trim().is_empty() {
            errors.push(("newapi_group", "请选择 new-api 分组".to_string()));
        }

        let sort_order = match self.sort_order.trim().parse::<i32>() {
            Ok(v) if v >= 0 => v,
            _ => {
                errors.push(("sort_order", "排序应为非负整数".to_string()));
                0
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PlanUpsertRequest {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            period_type: self.period_type.clone(),
            period_days,
            daily_quota,
            carry_over: if self.carry_over { 1 } else { 0 },
            max_carry_over,
            price_type: self.price_type.clone(),
            price,
            newapi_group: self.newapi_group.clone(),
            status: if self.status { 1 } else { 0 },
            sort_order,
        })
    }
}

/// 查找字段错误文案
pub fn field_error<'a>(errors: &'a FieldErrors, field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, msg)| msg.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PlanDraft {
        PlanDraft {
            name: "月度套餐".to_string(),
            description: "适合日常使用".to_string(),
            period_type: "month".to_string(),
            period_days: "30".to_string(),
            daily_quota: "500000".to_string(),
            carry_over: true,
            max_carry_over: "1000000".to_string(),
            price_type: "fixed".to_string(),
            price: "29.9".to_string(),
            newapi_group: "default".to_string(),
            status: true,
            sort_order: "1".to_string(),
        }
    }

    #[test]
    fn valid_draft_builds_request() {
        let request = valid_draft().validate().unwrap();
        assert_eq!(request.name, "月度套餐");
        assert_eq!(request.period_days, 30);
        assert_eq!(request.daily_quota, 500000);
        assert_eq!(request.carry_over, 1);
        assert_eq!(request.max_carry_over, 1000000);
        assert_eq!(request.price, 29.9);
        assert_eq!(request.status, 1);
    }

    #[test]
    fn name_is_required() {
        let mut draft = valid_draft();
        draft.name = "  ".to_string();
        let errors = draft.validate().unwrap_err();
        assert!(field_error(&errors, "name").is_some());
    }

    #[test]
    fn newapi_group_is_required() {
        let mut draft = valid_draft();
        draft.newapi_group = String::new();
        let errors = draft.validate().unwrap_err();
        assert!(field_error(&errors, "newapi_group").is_some());
    }

    #[test]
    fn numeric_fields_reject_garbage() {
        let mut draft = valid_draft();
        draft.period_days = "abc".to_string();
        draft.daily_quota = "0".to_string();
        draft.price = "-1".to_string();
        let errors = draft.validate().unwrap_err();
        assert!(field_error(&errors, "period_days").is_some());
        assert!(field_error(&errors, "daily_quota").is_some());
        assert!(field_error(&errors, "price").is_some());
        // 合法字段不应出现在错误里
        assert!(field_error(&errors, "name").is_none());
    }

    #[test]
    fn switches_map_to_int_flags() {
        let mut draft = valid_draft();
        draft.carry_over = false;
        draft.status = false;
        let request = draft.validate().unwrap();
        assert_eq!(request.carry_over, 0);
        assert_eq!(request.status, 0);
    }

    #[test]
    fn from_plan_roundtrip() {
        let plan = Plan {
            id: 7,
            name: "周套餐".to_string(),
            description: String::new(),
            period_type: "week".to_string(),
            period_days: 7,
            daily_quota: 100000,
            carry_over: 1,
            max_carry_over: 0,
            price_type: "daily".to_string(),
            price: 2.5,
            newapi_group: "vip".to_string(),
            status: 1,
            sort_order: 3,
        };
        let request = PlanDraft::from_plan(&plan).validate().unwrap();
        assert_eq!(request.name, plan.name);
        assert_eq!(request.period_days, plan.period_days);
        assert_eq!(request.price, plan.price);
        assert_eq!(request.newapi_group, plan.newapi_group);
    }
}
