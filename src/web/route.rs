//! 路由定义模块（领域模型）
//!
//! 定义应用的所有路由、路径映射与访问守卫判定。
//! 守卫是纯函数：给定路由与认证/权限状态即可得出结论，便于单元测试。

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    /// 套餐目录（公开）
    Home,
    /// 登录/注册页（公开，已登录则跳回首页）
    Login,
    /// 用户控制台
    Dashboard,
    /// 我的订单
    Orders,
    /// 使用记录
    Usage,
    /// 个人设置
    Settings,
    /// 管理后台：用户管理
    AdminUsers,
    /// 管理后台：套餐管理
    AdminPlans,
    /// 管理后台：订单管理
    AdminOrders,
    /// 管理后台：系统设置
    AdminSettings,
    /// 404 页面
    NotFound,
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// 允许渲染
    Render,
    /// 未登录访问受保护页，跳转登录页
    RedirectLogin,
    /// 权限不足或已登录访问登录页，跳回首页
    RedirectHome,
}

impl AppRoute {
    /// 从路径解析路由（忽略查询串与 hash）
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or(path)
            .trim_end_matches('/');
        match path {
            "" | "/" => Self::Home,
            "/login" => Self::Login,
            "/user" => Self::Dashboard,
            "/user/orders" => Self::Orders,
            "/user/usage" => Self::Usage,
            "/user/settings" => Self::Settings,
            // /admin 裸路径落到默认的用户管理页
            "/admin" | "/admin/users" => Self::AdminUsers,
            "/admin/plans" => Self::AdminPlans,
            "/admin/orders" => Self::AdminOrders,
            "/admin/settings" => Self::AdminSettings,
            _ => Self::NotFound,
        }
    }

    /// 路由对应的规范路径
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Dashboard => "/user",
            Self::Orders => "/user/orders",
            Self::Usage => "/user/usage",
            Self::Settings => "/user/settings",
            Self::AdminUsers => "/admin/users",
            Self::AdminPlans => "/admin/plans",
            Self::AdminOrders => "/admin/orders",
            Self::AdminSettings => "/admin/settings",
            Self::NotFound => "/404",
        }
    }

    /// 是否需要登录
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Orders | Self::Usage | Self::Settings
        ) || self.requires_admin()
    }

    /// 是否需要管理员权限
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::AdminUsers | Self::AdminPlans | Self::AdminOrders | Self::AdminSettings
        )
    }

    /// 已登录用户不应停留的页面（登录页）
    pub fn redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }
}

/// 访问守卫判定（纯函数）
///
/// 判定顺序：先认证，后权限，最后处理已登录访问登录页的情况。
pub fn guard(route: AppRoute, is_authenticated: bool, is_admin: bool) -> GuardOutcome {
    if route.requires_auth() && !is_authenticated {
        return GuardOutcome::RedirectLogin;
    }
    if route.requires_admin() && !is_admin {
        return GuardOutcome::RedirectHome;
    }
    if route.redirect_when_authenticated() && is_authenticated {
        return GuardOutcome::RedirectHome;
    }
    GuardOutcome::Render
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_basic() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/user"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/user/orders"), AppRoute::Orders);
        assert_eq!(AppRoute::from_path("/user/usage"), AppRoute::Usage);
        assert_eq!(AppRoute::from_path("/user/settings"), AppRoute::Settings);
        assert_eq!(AppRoute::from_path("/admin/users"), AppRoute::AdminUsers);
        assert_eq!(AppRoute::from_path("/admin/plans"), AppRoute::AdminPlans);
        assert_eq!(AppRoute::from_path("/admin/orders"), AppRoute::AdminOrders);
        assert_eq!(
            AppRoute::from_path("/admin/settings"),
            AppRoute::AdminSettings
        );
        assert_eq!(AppRoute::from_path("/unknown"), AppRoute::NotFound);
    }

    #[test]
    fn test_from_path_admin_alias() {
        // /admin 裸路径等价于 /admin/users
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::AdminUsers);
        assert_eq!(AppRoute::from_path("/admin/"), AppRoute::AdminUsers);
    }

    #[test]
    fn test_from_path_strips_query_and_hash() {
        assert_eq!(AppRoute::from_path("/user?plan=3"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/login#top"), AppRoute::Login);
        assert_eq!(
            AppRoute::from_path("/admin/orders?page=2&status=paid"),
            AppRoute::AdminOrders
        );
    }

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::Orders,
            AppRoute::Usage,
            AppRoute::Settings,
            AppRoute::AdminUsers,
            AppRoute::AdminPlans,
            AppRoute::AdminOrders,
            AppRoute::AdminSettings,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_requires_auth_covers_admin() {
        // 管理路由同时要求登录
        assert!(AppRoute::AdminUsers.requires_auth());
        assert!(AppRoute::AdminSettings.requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(!AppRoute::Home.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
    }

    #[test]
    fn test_guard_anonymous() {
        assert_eq!(guard(AppRoute::Home, false, false), GuardOutcome::Render);
        assert_eq!(guard(AppRoute::Login, false, false), GuardOutcome::Render);
        assert_eq!(
            guard(AppRoute::Dashboard, false, false),
            GuardOutcome::RedirectLogin
        );
        // 未登录访问管理路由：先判认证，跳登录页而不是首页
        assert_eq!(
            guard(AppRoute::AdminUsers, false, false),
            GuardOutcome::RedirectLogin
        );
    }

    #[test]
    fn test_guard_regular_user() {
        assert_eq!(
            guard(AppRoute::Dashboard, true, false),
            GuardOutcome::Render
        );
        // 普通用户访问管理路由：权限不足跳回首页
        assert_eq!(
            guard(AppRoute::AdminPlans, true, false),
            GuardOutcome::RedirectHome
        );
        // 已登录访问登录页：跳回首页
        assert_eq!(
            guard(AppRoute::Login, true, false),
            GuardOutcome::RedirectHome
        );
    }

    #[test]
    fn test_guard_admin() {
        assert_eq!(
            guard(AppRoute::AdminUsers, true, true),
            GuardOutcome::Render
        );
        assert_eq!(
            guard(AppRoute::AdminSettings, true, true),
            GuardOutcome::Render
        );
        assert_eq!(guard(AppRoute::Dashboard, true, true), GuardOutcome::Render);
        assert_eq!(
            guard(AppRoute::Login, true, true),
            GuardOutcome::RedirectHome
        );
    }

    #[test]
    fn test_guard_not_found_is_public() {
        assert_eq!(
            guard(AppRoute::NotFound, false, false),
            GuardOutcome::Render
        );
    }
}
