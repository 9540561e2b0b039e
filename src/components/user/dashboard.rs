//! 用户控制台：我的订阅
//!
//! 展示当前订阅的周期/额度进度与今日用量，提供购买与续费入口。
//! 购买流程：创建订单 -> 创建支付 -> 跳转支付网关。
//! 通过 `?plan=` 查询参数支持从目录页预选套餐直接打开购买框。

use crate::api::use_api;
use crate::models::{
    CurrentSubscription, PayRequest, Plan, PurchaseRequest, RenewRequest, TodayUsage, fmt_date,
};
use crate::web::router::{query_param, use_navigate};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 跳转到支付网关
fn redirect_to_pay(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();

    let (is_loading, set_is_loading) = signal(true);
    let (current, set_current) = signal(Option::<CurrentSubscription>::None);
    let (today, set_today) = signal(Option::<TodayUsage>::None);

    // 购买对话框状态
    let (plans, set_plans) = signal(Vec::<Plan>::new());
    let (selected_plan_id, set_selected_plan_id) = signal(Option::<u64>::None);
    let (newapi_action, set_newapi_action) = signal("create_new".to_string());
    let (newapi_username, set_newapi_username) = signal(String::new());
    let (newapi_password, set_newapi_password) = signal(String::new());
    let (payment_method, set_payment_method) = signal("alipay".to_string());
    let (purchase_loading, set_purchase_loading) = signal(false);
    let (purchase_error, set_purchase_error) = signal(Option::<String>::None);
    let purchase_dialog: NodeRef<html::Dialog> = NodeRef::new();

    // 续费对话框状态
    let (renew_days, set_renew_days) = signal("30".to_string());
    let (renew_payment, set_renew_payment) = signal("alipay".to_string());
    let (renew_loading, set_renew_loading) = signal(false);
    let (renew_error, set_renew_error) = signal(Option::<String>::None);
    let renew_dialog: NodeRef<html::Dialog> = NodeRef::new();

    let load_data = move || {
        spawn_local(async move {
            match api.current_subscription().await {
                Ok(sub) => set_current.set(sub),
                Err(_) => set_current.set(None),
            }
            // 今日用量要求已绑定 new-api 账号，失败时静默跳过
            if let Ok(usage) = api.today_usage().await {
                set_today.set(Some(usage));
            }
            set_is_loading.set(false);
        });
    };

    let load_plans = move |preselect: Option<u64>| {
        spawn_local(async move {
            if let Ok(list) = api.list_plans().await {
                if let Some(id) = preselect {
                    if list.iter().any(|p| p.id == id) {
                        set_selected_plan_id.set(Some(id));
                    }
                }
                set_plans.set(list);
            }
        });
    };

    // 首次渲染：加载订阅数据，并处理 ?plan= 预选
    Effect::new(move |_| {
        load_data();
        if let Some(plan_id) = query_param("plan").and_then(|v| v.parse::<u64>().ok()) {
            load_plans(Some(plan_id));
            spawn_local(async move {
                // 确认套餐仍然上架，再弹出购买框
                if api.get_plan(plan_id).await.is_ok() {
                    if let Some(dialog) = purchase_dialog.get_untracked() {
                        let _ = dialog.show_modal();
                    }
                }
            });
        }
    });

    let open_purchase = move |_| {
        set_purchase_error.set(None);
        load_plans(None);
        if let Some(dialog) = purchase_dialog.get() {
            let _ = dialog.show_modal();
        }
    };

    let open_renew = move |_| {
        set_renew_error.set(None);
        if let Some(dialog) = renew_dialog.get() {
            let _ = dialog.show_modal();
        }
    };

    let on_purchase = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(plan_id) = selected_plan_id.get() else {
            set_purchase_error.set(Some("请选择套餐".to_string()));
            return;
        };
        let action = newapi_action.get();
        let username = newapi_username.get();
        let password = newapi_password.get();
        if action == "bind_existing" && (username.is_empty() || password.is_empty()) {
            set_purchase_error.set(Some("请输入 new-api 账号和密码".to_string()));
            return;
        }

        set_purchase_loading.set(true);
        set_purchase_error.set(None);

        let method = payment_method.get();
        spawn_local(async move {
            let request = PurchaseRequest {
                plan_id,
                period_days: None,
                newapi_action: action.clone(),
                newapi_username: (action == "bind_existing").then_some(username),
                newapi_password: (action == "bind_existing").then_some(password),
            };
            let result = async {
                let payload = api.purchase(&request).await?;
                api.pay_order(&PayRequest {
                    order_id: payload.order.id,
                    payment_method: method,
                })
                .await
            }
            .await;

            match result {
                Ok(pay) => redirect_to_pay(&pay.pay_url),
                Err(err) => set_purchase_error.set(Some(err.message)),
            }
            set_purchase_loading.set(false);
        });
    };

    let on_renew = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let days = match renew_days.get().parse::<i64>() {
            Ok(d) if d > 0 => d,
            _ => {
                set_renew_error.set(Some("请输入有效的续费天数".to_string()));
                return;
            }
        };

        set_renew_loading.set(true);
        set_renew_error.set(None);

        let method = renew_payment.get();
        spawn_local(async move {
            let result = async {
                let order = api.renew(&RenewRequest { period_days: days }).await?;
                api.pay_order(&PayRequest {
                    order_id: order.id,
                    payment_method: method,
                })
                .await
            }
            .await;

            match result {
                Ok(pay) => redirect_to_pay(&pay.pay_url),
                Err(err) => set_renew_error.set(Some(err.message)),
            }
            set_renew_loading.set(false);
        });
    };

    // 订阅周期进度：按套餐周期天数折算
    let period_percent = move |cur: &CurrentSubscription| -> i64 {
        let period_days = cur
            .subscription
            .plan
            .as_ref()
            .map(|p| p.period_days)
            .unwrap_or(0);
        if period_days <= 0 {
            return 0;
        }
        (100 - cur.days_remaining * 100 / period_days).clamp(0, 100)
    };

    view! {
        <div class="max-w-5xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"我的订阅"</h2>

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
                    when=move || current.get().is_some()
                    fallback={
                        let navigate = navigate.clone();
                        move || {
                            let navigate = navigate.clone();
                            view! {
                                <div class="card bg-base-100 shadow-xl">
                                    <div class="card-body items-center py-16">
                                        <p class="opacity-60">"暂无订阅"</p>
                                        <button
                                            class="btn btn-primary mt-4"
                                            on:click=move |_| navigate("/")
                                        >
                                            "选择套餐"
                                        </button>
                                    </div>
                                </div>
                            }
                        }
                    }
                >
                    {move || {
                        current
                            .get()
                            .map(|cur| {
                                let sub = cur.subscription.clone();
                                let plan_name = sub
                                    .plan
                                    .as_ref()
                                    .map(|p| p.name.clone())
                                    .unwrap_or_else(|| "订阅套餐".to_string());
                                let active = sub.status == "active";
                                let quota_percent = if sub.today_quota > 0 {
                                    (cur.current_quota * 100 / sub.today_quota).clamp(0, 100)
                                } else {
                                    0
                                };
                                let percent = period_percent(&cur);
                                view! {
                                    <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                                        <div class="card bg-base-100 shadow-xl lg:col-span-2">
                                            <div class="card-body">
                                                <div class="flex justify-between items-start">
                                                    <div>
                                                        <h3 class="card-title">{plan_name}</h3>
                                                        <span class=if active {
                                                            "badge badge-success mt-2"
                                                        } else {
                                                            "badge badge-error mt-2"
                                                        }>
                                                            {if active { "生效中" } else { "已过期" }}
                                                        </span>
                                                        <p class="text-sm opacity-60 mt-2">
                                                            {format!(
                                                                "{} ~ {}",
                                                                fmt_date(&sub.start_date),
                                                                fmt_date(&sub.end_date),
                                                            )}
                                                        </p>
                                                    </div>
                                                    <div class="flex gap-2">
                                                        <button class="btn btn-primary btn-sm" on:click=open_renew>
                                                            "续费"
                                                        </button>
                                                        <button class="btn btn-outline btn-sm" on:click=open_purchase>
                                                            "购买新套餐"
                                                        </button>
                                                    </div>
                                                </div>

                                                <div class="mt-6">
                                                    <p class="mb-1 text-sm">"订阅周期"</p>
                                                    <progress
                                                        class="progress progress-primary w-full"
                                                        value=percent.to_string()
                                                        max="100"
                                                    ></progress>
                                                    <p class="text-sm opacity-60">
                                                        {format!("剩余 {} 天", cur.days_remaining)}
                                                    </p>
                                                </div>

                                                <div class="mt-4">
                                                    <p class="mb-1 text-sm">"今日额度"</p>
                                                    <progress
                                                        class={if cur.current_quota > 0 {
                                                            "progress progress-success w-full"
                                                        } else {
                                                            "progress progress-error w-full"
                                                        }}
                                                        value=quota_percent.to_string()
                                                        max="100"
                                                    ></progress>
                                                    <p class="text-sm opacity-60">
                                                        {format!("{} / {}", cur.current_quota, sub.today_quota)}
                                                    </p>
                                                </div>
                                            </div>
                                        </div>

                                        <div class="card bg-base-100 shadow-xl">
                                            <div class="card-body space-y-3">
                                                <div>
                                                    <p class="text-sm opacity-60">"每日额度"</p>
                                                    <p class="text-2xl font-bold">{sub.daily_quota}</p>
                                                </div>
                                                <div>
                                                    <p class="text-sm opacity-60">"结转额度"</p>
                                                    <p class="text-2xl font-bold">{sub.carried_quota}</p>
                                                </div>
                                                <div>
                                                    <p class="text-sm opacity-60">"模型分组"</p>
                                                    <p class="text-xl font-bold">{sub.newapi_group.clone()}</p>
                                                </div>
                                                {move || {
                                                    today
                                                        .get()
                                                        .map(|usage| {
                                                            let limit = usage.daily_quota;
                                                            let danger = limit > 0
                                                                && usage.today_used * 10 > limit * 8;
                                                            view! {
                                                                <div>
                                                                    <p class="text-sm opacity-60">"今日已用"</p>
                                                                    <p class=if danger {
                                                                        "text-2xl font-bold text-error"
                                                                    } else {
                                                                        "text-2xl font-bold text-success"
                                                                    }>
                                                                        {format!("{} / {}", usage.today_used, limit)}
                                                                    </p>
                                                                </div>
                                                            }
                                                        })
                                                }}
                                            </div>
                                        </div>
                                    </div>
                                }
                            })
                    }}
                </Show>
            </Show>

            // 购买对话框
            <dialog class="modal" node_ref=purchase_dialog>
                <div class="modal-box">
                    <h3 class="font-bold text-lg mb-4">"购买订阅"</h3>
                    <form on:submit=on_purchase>
                        <Show when=move || purchase_error.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2 mb-2">
                                <span>{move || purchase_error.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"选择套餐"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                on:change=move |ev| {
                                    set_selected_plan_id.set(event_target_value(&ev).parse().ok());
                                }
                            >
                                <option value="" selected=move || selected_plan_id.get().is_none()>
                                    "请选择套餐"
                                </option>
                                <For
                                    each=move || plans.get()
                                    key=|plan| plan.id
                                    children=move |plan: Plan| {
                                        let id = plan.id;
                                        view! {
                                            <option
                                                value=id.to_string()
                                                selected=move || selected_plan_id.get() == Some(id)
                                            >
                                                {format!(
                                                    "{} - ¥{}/{}天",
                                                    plan.name,
                                                    plan.price,
                                                    plan.period_days,
                                                )}
                                            </option>
                                        }
                                    }
                                />
                            </select>
                        </div>

                        <div class="form-control mt-3">
                            <label class="label">
                                <span class="label-text">"new-api 账号"</span>
                            </label>
                            <div class="flex flex-col gap-1">
                                <label class="label cursor-pointer justify-start gap-2">
                                    <input
                                        type="radio"
                                        name="newapi_action"
                                        class="radio radio-sm"
                                        checked=move || newapi_action.get() == "create_new"
                                        on:change=move |_| set_newapi_action.set("create_new".to_string())
                                    />
                                    <span class="label-text">"创建新账号"</span>
                                </label>
                                <label class="label cursor-pointer justify-start gap-2">
                                    <input
                                        type="radio"
                                        name="newapi_action"
                                        class="radio radio-sm"
                                        checked=move || newapi_action.get() == "bind_existing"
                                        on:change=move |_| set_newapi_action.set("bind_existing".to_string())
                                    />
                                    <span class="label-text">"绑定现有账号"</span>
                                </label>
                                <label class="label cursor-pointer justify-start gap-2">
                                    <input
                                        type="radio"
                                        name="newapi_action"
                                        class="radio radio-sm"
                                        checked=move || newapi_action.get() == "overwrite"
                                        on:change=move |_| set_newapi_action.set("overwrite".to_string())
                                    />
                                    <span class="label-text">"覆盖当前账号"</span>
                                </label>
                            </div>
                        </div>

                        <Show when=move || newapi_action.get() == "bind_existing">
                            <div class="form-control mt-2">
                                <label class="label">
                                    <span class="label-text">"new-api 用户名"</span>
                                </label>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    on:input=move |ev| set_newapi_username.set(event_target_value(&ev))
                                    prop:value=newapi_username
                                />
                            </div>
                            <div class="form-control mt-2">
                                <label class="label">
                                    <span class="label-text">"new-api 密码"</span>
                                </label>
                                <input
                                    type="password"
                                    class="input input-bordered"
                                    on:input=move |ev| set_newapi_password.set(event_target_value(&ev))
                                    prop:value=newapi_password
                                />
                            </div>
                        </Show>

                        <div class="form-control mt-3">
                            <label class="label">
                                <span class="label-text">"支付方式"</span>
                            </label>
                            <div class="flex gap-4">
                                <label class="label cursor-pointer gap-2">
                                    <input
                                        type="radio"
                                        name="payment_method"
                                        class="radio radio-sm"
                                        checked=move || payment_method.get() == "alipay"
                                        on:change=move |_| set_payment_method.set("alipay".to_string())
                                    />
                                    <span class="label-text">"支付宝"</span>
                                </label>
                                <label class="label cursor-pointer gap-2">
                                    <input
                                        type="radio"
                                        name="payment_method"
                                        class="radio radio-sm"
                                        checked=move || payment_method.get() == "wxpay"
                                        on:change=move |_| set_payment_method.set("wxpay".to_string())
                                    />
                                    <span class="label-text">"微信"</span>
                                </label>
                            </div>
                        </div>

                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| {
                                    if let Some(dialog) = purchase_dialog.get() {
                                        dialog.close();
                                    }
                                }
                            >
                                "取消"
                            </button>
                            <button class="btn btn-primary" disabled=move || purchase_loading.get()>
                                {move || {
                                    if purchase_loading.get() {
                                        view! { <span class="loading loading-spinner"></span> }
                                            .into_any()
                                    } else {
                                        "立即支付".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </dialog>

            // 续费对话框
            <dialog class="modal" node_ref=renew_dialog>
                <div class="modal-box">
                    <h3 class="font-bold text-lg mb-4">"续费订阅"</h3>
                    <form on:submit=on_renew>
                        <Show when=move || renew_error.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2 mb-2">
                                <span>{move || renew_error.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"续费天数"</span>
                            </label>
                            <input
                                type="number"
                                min="1"
                                class="input input-bordered"
                                on:input=move |ev| set_renew_days.set(event_target_value(&ev))
                                prop:value=renew_days
                            />
                        </div>

                        <div class="form-control mt-3">
                            <label class="label">
                                <span class="label-text">"支付方式"</span>
                            </label>
                            <div class="flex gap-4">
                                <label class="label cursor-pointer gap-2">
                                    <input
                                        type="radio"
                                        name="renew_payment"
                                        class="radio radio-sm"
                                        checked=move || renew_payment.get() == "alipay"
                                        on:change=move |_| set_renew_payment.set("alipay".to_string())
                                    />
                                    <span class="label-text">"支付宝"</span>
                                </label>
                                <label class="label cursor-pointer gap-2">
                                    <input
                                        type="radio"
                                        name="renew_payment"
                                        class="radio radio-sm"
                                        checked=move || renew_payment.get() == "wxpay"
                                        on:change=move |_| set_renew_payment.set("wxpay".to_string())
                                    />
                                    <span class="label-text">"微信"</span>
                                </label>
                            </div>
                        </div>

                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| {
                                    if let Some(dialog) = renew_dialog.get() {
                                        dialog.close();
                                    }
                                }
                            >
                                "取消"
                            </button>
                            <button class="btn btn-primary" disabled=move || renew_loading.get()>
                                {move || {
                                    if renew_loading.get() {
                                        view! { <span class="loading loading-spinner"></span> }
                                            .into_any()
                                    } else {
                                        "确认续费".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </dialog>
        </div>
    }
}
