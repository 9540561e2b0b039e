//! 管理后台布局
//!
//! 左侧菜单 + 内容区，当前路由对应的菜单项高亮。

use crate::web::route::AppRoute;
use crate::web::router::{use_navigate, use_router};
use leptos::prelude::*;

const MENU: [(AppRoute, &str); 4] = [
    (AppRoute::AdminUsers, "用户管理"),
    (AppRoute::AdminPlans, "套餐管理"),
    (AppRoute::AdminOrders, "订单管理"),
    (AppRoute::AdminSettings, "系统设置"),
];

#[component]
pub fn AdminLayout(children: Children) -> impl IntoView {
    let router = use_router();
    let navigate = use_navigate();
    let current = router.current_route();

    let title = move || {
        MENU.iter()
            .find(|(route, _)| *route == current.get())
            .map(|(_, label)| *label)
            .unwrap_or("管理后台")
    };

    let nav_front = navigate.clone();

    view! {
        <div class="min-h-screen flex bg-base-200">
            <aside class="w-52 bg-base-100 shadow-md">
                <div class="h-16 flex items-center justify-center border-b border-base-200">
                    <span class="text-lg font-bold text-primary">"管理后台"</span>
                </div>
                <ul class="menu p-2">
                    {MENU
                        .iter()
                        .map(|(route, label)| {
                            let route = *route;
                            let label = *label;
                            let nav = navigate.clone();
                            view! {
                                <li>
                                    <a
                                        class=move || {
                                            if current.get() == route { "active" } else { "" }
                                        }
                                        on:click=move |_| nav(route.to_path())
                                    >
                                        {label}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </aside>

            <div class="flex-1 flex flex-col">
                <header class="h-16 bg-base-100 shadow-sm flex items-center justify-between px-6">
                    <span class="text-base font-medium">{title}</span>
                    <a class="link link-primary" on:click=move |_| nav_front("/")>
                        "返回前台"
                    </a>
                </header>
                <main class="flex-1 p-6">{children()}</main>
            </div>
        </div>
    }
}
