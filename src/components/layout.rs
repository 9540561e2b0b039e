//! 前台布局组件
//!
//! 顶部导航栏 + 内容区。导航项按会话状态切换：
//! 未登录显示登录入口，已登录显示用户菜单，管理员额外显示后台入口。

use crate::auth::use_auth;
use crate::models::User;
use crate::web::router::use_navigate;
use leptos::prelude::*;

#[component]
pub fn MainLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let navigate = use_navigate();

    let is_authenticated = move || state.get().token.is_some();
    let is_admin = move || state.get().user.as_ref().is_some_and(User::is_admin);
    let username = move || {
        state
            .get()
            .user
            .map(|u| u.username)
            .unwrap_or_default()
    };

    let nav_home = navigate.clone();
    let nav_dashboard = navigate.clone();
    let nav_orders = navigate.clone();
    let nav_usage = navigate.clone();
    let nav_settings = navigate.clone();
    let nav_admin = StoredValue::new(navigate.clone());
    let nav_login = navigate.clone();

    let on_logout = move |_| {
        // 清空会话后路由服务自动跳转登录页
        auth.logout();
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1">
                    <a
                        class="btn btn-ghost text-xl font-bold"
                        on:click=move |_| nav_home("/")
                    >
                        "订阅中心"
                    </a>
                    <Show when=is_authenticated>
                        <a class="btn btn-ghost btn-sm" on:click={
                            let nav = nav_dashboard.clone();
                            move |_| nav("/user")
                        }>
                            "控制台"
                        </a>
                        <a class="btn btn-ghost btn-sm" on:click={
                            let nav = nav_orders.clone();
                            move |_| nav("/user/orders")
                        }>
                            "我的订单"
                        </a>
                        <a class="btn btn-ghost btn-sm" on:click={
                            let nav = nav_usage.clone();
                            move |_| nav("/user/usage")
                        }>
                            "使用记录"
                        </a>
                    </Show>
                </div>
                <div class="flex-none">
                    <Show
                        when=is_authenticated
                        fallback=move || {
                            let nav = nav_login.clone();
                            view! {
                                <button class="btn btn-primary btn-sm" on:click=move |_| nav("/login")>
                                    "登录"
                                </button>
                            }
                        }
                    >
                        <div class="dropdown dropdown-end">
                            <label tabindex="0" class="btn btn-ghost btn-sm">
                                {username}
                            </label>
                            <ul
                                tabindex="0"
                                class="dropdown-content menu bg-base-100 rounded-box z-10 w-44 p-2 shadow"
                            >
                                <li>
                                    <a on:click={
                                        let nav = nav_settings.clone();
                                        move |_| nav("/user/settings")
                                    }>
                                        "个人设置"
                                    </a>
                                </li>
                                <Show when=is_admin>
                                    <li>
                                        <a on:click=move |_| nav_admin.with_value(|nav| nav("/admin/users"))>
                                            "管理后台"
                                        </a>
                                    </li>
                                </Show>
                                <li>
                                    <a on:click=on_logout>"退出登录"</a>
                                </li>
                            </ul>
                        </div>
                    </Show>
                </div>
            </div>
            <main class="container mx-auto px-4 py-6">{children()}</main>
        </div>
    }
}
