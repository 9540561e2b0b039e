//! 订阅中心前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫判定（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: 后端 API 客户端（唯一出口）
//! - `models`: 各端点的响应/请求类型
//! - `components`: UI 组件层

mod api;
mod auth;
mod models;

mod components {
    pub mod home;
    pub mod layout;
    pub mod login;
    pub mod pager;
    pub mod toast;

    pub mod user {
        pub mod dashboard;
        pub mod orders;
        pub mod settings;
        pub mod usage;
    }

    pub mod admin {
        pub mod layout;
        pub mod orders;
        pub mod plans;
        pub mod settings;
        pub mod users;
    }
}

// 路由模块：封装浏览器 History API，认证/权限信号由外部注入
pub(crate) mod web {
    pub mod route;
    pub mod router;
}

use crate::api::ApiClient;
use crate::auth::{AuthContext, init_auth};
use crate::components::admin::layout::AdminLayout;
use crate::components::admin::orders::AdminOrdersPage;
use crate::components::admin::plans::AdminPlansPage;
use crate::components::admin::settings::AdminSettingsPage;
use crate::components::admin::users::AdminUsersPage;
use crate::components::home::HomePage;
use crate::components::layout::MainLayout;
use crate::components::login::LoginPage;
use crate::components::toast::{ToastContext, ToastHost};
use crate::components::user::dashboard::DashboardPage;
use crate::components::user::orders::OrdersPage;
use crate::components::user::settings::SettingsPage;
use crate::components::user::usage::UsagePage;

use leptos::prelude::*;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，并套上所属布局。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Home => view! {
            <MainLayout>
                <HomePage />
            </MainLayout>
        }
        .into_any(),
        AppRoute::Dashboard => view! {
            <MainLayout>
                <DashboardPage />
            </MainLayout>
        }
        .into_any(),
        AppRoute::Orders => view! {
            <MainLayout>
                <OrdersPage />
            </MainLayout>
        }
        .into_any(),
        AppRoute::Usage => view! {
            <MainLayout>
                <UsagePage />
            </MainLayout>
        }
        .into_any(),
        AppRoute::Settings => view! {
            <MainLayout>
                <SettingsPage />
            </MainLayout>
        }
        .into_any(),
        AppRoute::AdminUsers => view! {
            <AdminLayout>
                <AdminUsersPage />
            </AdminLayout>
        }
        .into_any(),
        AppRoute::AdminPlans => view! {
            <AdminLayout>
                <AdminPlansPage />
            </AdminLayout>
        }
        .into_any(),
        AppRoute::AdminOrders => view! {
            <AdminLayout>
                <AdminOrdersPage />
            </AdminLayout>
        }
        .into_any(),
        AppRoute::AdminSettings => view! {
            <AdminLayout>
                <AdminSettingsPage />
            </AdminLayout>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文与 API 客户端
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    let api = ApiClient::new(auth_ctx);
    provide_context(api);

    // 2. 全局通知上下文
    let toast = ToastContext::new();
    provide_context(toast);

    // 3. 从 LocalStorage 恢复会话，并后台刷新用户资料
    init_auth(&auth_ctx, api);

    // 4. 认证/权限信号注入路由服务实现守卫（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let is_admin = auth_ctx.is_admin_signal();

    view! {
        <Router is_authenticated=is_authenticated is_admin=is_admin>
            <ToastHost />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
