//! 套餐目录页（公开）
//!
//! 展示上架套餐卡片。未登录点击订阅时弹出确认框引导登录，
//! 已登录则跳转控制台并通过 `?plan=` 预选套餐。

use crate::api::use_api;
use crate::auth::use_auth;
use crate::models::{Plan, period_type_label};
use crate::web::router::use_navigate;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn HomePage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let navigate = use_navigate();

    let (plans, set_plans) = signal(Vec::<Plan>::new());
    let (is_loading, set_is_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);

    // 模型列表对话框状态
    let (models, set_models) = signal(Vec::<String>::new());
    let (models_plan_name, set_models_plan_name) = signal(String::new());
    let (models_loading, set_models_loading) = signal(false);
    let models_dialog: NodeRef<html::Dialog> = NodeRef::new();

    // 登录引导对话框
    let login_dialog: NodeRef<html::Dialog> = NodeRef::new();

    // 首次渲染加载套餐列表
    Effect::new(move |_| {
        spawn_local(async move {
            match api.list_plans().await {
                Ok(list) => set_plans.set(list),
                Err(err) => set_load_error.set(Some(err.message)),
            }
            set_is_loading.set(false);
        });
    });

    let on_subscribe = {
        let navigate = navigate.clone();
        move |plan_id: u64| {
            if auth.token().is_none() {
                if let Some(dialog) = login_dialog.get() {
                    let _ = dialog.show_modal();
                }
                return;
            }
            navigate(&format!("/user?plan={}", plan_id));
        }
    };
    let on_subscribe = StoredValue::new(on_subscribe);

    let on_show_models = move |plan: &Plan| {
        set_models_plan_name.set(plan.name.clone());
        set_models.set(Vec::new());
        set_models_loading.set(true);
        if let Some(dialog) = models_dialog.get() {
            let _ = dialog.show_modal();
        }
        let plan_id = plan.id;
        spawn_local(async move {
            if let Ok(list) = api.get_plan_models(plan_id).await {
                set_models.set(list);
            }
            set_models_loading.set(false);
        });
    };

    let go_login = {
        let navigate = navigate.clone();
        move |_| {
            if let Some(dialog) = login_dialog.get() {
                dialog.close();
            }
            navigate("/login");
        }
    };

    view! {
        <div>
            <div class="text-center py-8">
                <h1 class="text-4xl font-bold">"选择您的专属套餐"</h1>
                <p class="mt-2 opacity-70">"灵活的订阅方案，为您提供最优质的 AI 服务体验"</p>
            </div>

            <Show when=move || load_error.get().is_some()>
                <div role="alert" class="alert alert-error max-w-lg mx-auto">
                    <span>{move || load_error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !is_loading.get()
                fallback=|| {
                    view! {
                        <div class="flex justify-center py-16">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                }
            >
                <Show
                    when=move || !plans.get().is_empty()
                    fallback=|| {
                        view! { <p class="text-center opacity-60 py-16">"暂无可用套餐"</p> }
                    }
                >
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        <For
                            each=move || plans.get()
                            key=|plan| plan.id
                            children={
                                move |plan: Plan| {
                                    let plan_id = plan.id;
                                    let period_suffix = if plan.price_type == "fixed" {
                                        format!("{}{}", plan.period_days, period_type_label(&plan.period_type))
                                    } else {
                                        "天".to_string()
                                    };
                                    let carry_label = if plan.carry_over == 1 {
                                        "支持额度结转"
                                    } else {
                                        "额度不结转"
                                    };
                                    let plan_for_models = plan.clone();
                                    view! {
                                        <div class="card bg-base-100 shadow-xl">
                                            <div class="card-body">
                                                <h2 class="card-title">{plan.name.clone()}</h2>
                                                <p class="opacity-70 min-h-12">{plan.description.clone()}</p>
                                                <div class="my-2">
                                                    <span class="text-3xl font-bold">
                                                        {format!("¥{}", plan.price)}
                                                    </span>
                                                    <span class="opacity-60">{format!("/{}", period_suffix)}</span>
                                                </div>
                                                <ul class="space-y-1 text-sm">
                                                    <li>{format!("每日额度 {}", plan.daily_quota)}</li>
                                                    <li>{carry_label}</li>
                                                    <li>{format!("分组: {}", plan.newapi_group)}</li>
                                                    <li>{format!("有效期 {} 天", plan.period_days)}</li>
                                                </ul>
                                                <div class="card-actions justify-between items-center mt-4">
                                                    <button
                                                        class="btn btn-ghost btn-sm"
                                                        on:click=move |_| on_show_models(&plan_for_models)
                                                    >
                                                        "查看模型"
                                                    </button>
                                                    <button
                                                        class="btn btn-primary"
                                                        on:click=move |_| on_subscribe.with_value(|f| f(plan_id))
                                                    >
                                                        "立即订阅"
                                                    </button>
                                                </div>
                                            </div>
                                        </div>
                                    }
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>

            // 登录引导对话框
            <dialog class="modal" node_ref=login_dialog>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"请先登录"</h3>
                    <p class="py-4">"购买订阅需要先登录账号"</p>
                    <div class="modal-action">
                        <form method="dialog">
                            <button class="btn">"取消"</button>
                        </form>
                        <button class="btn btn-primary" on:click=go_login>
                            "去登录"
                        </button>
                    </div>
                </div>
            </dialog>

            // 模型列表对话框
            <dialog class="modal" node_ref=models_dialog>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || format!("{} · 可用模型", models_plan_name.get())}
                    </h3>
                    <div class="py-4 max-h-80 overflow-y-auto">
                        <Show
                            when=move || !models_loading.get()
                            fallback=|| {
                                view! { <span class="loading loading-spinner"></span> }
                            }
                        >
                            <Show
                                when=move || !models.get().is_empty()
                                fallback=|| view! { <p class="opacity-60">"暂无模型信息"</p> }
                            >
                                <ul class="space-y-1">
                                    <For
                                        each=move || models.get()
                                        key=|name| name.clone()
                                        children=|name: String| {
                                            view! {
                                                <li class="badge badge-outline mr-2">{name}</li>
                                            }
                                        }
                                    />
                                </ul>
                            </Show>
                        </Show>
                    </div>
                    <div class="modal-action">
                        <form method="dialog">
                            <button class="btn">"关闭"</button>
                        </form>
                    </div>
                </div>
            </dialog>
        </div>
    }
}
