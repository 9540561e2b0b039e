//! 管理后台：订单管理
//!
//! 全站订单的分页列表，可按状态筛选。切换筛选回到第 1 页。

use crate::api::use_api;
use crate::components::pager::Pager;
use crate::components::toast::use_toast;
use crate::models::{Order, ReqSeq, fmt_datetime, order_status_label, order_type_label};
use leptos::prelude::*;
use leptos::task::spawn_local;

const PER_PAGE: i64 = 20;

const STATUS_OPTIONS: [(&str, &str); 5] = [
    ("", "全部状态"),
    ("pending", "待支付"),
    ("paid", "已支付"),
    ("cancelled", "已取消"),
    ("refunded", "已退款"),
];

#[component]
pub fn AdminOrdersPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (page, set_page) = signal(1i64);
    let (total, set_total) = signal(0i64);
    let (status, set_status) = signal(String::new());
    let (is_loading, set_is_loading) = signal(true);
    let (seq, set_seq) = signal(ReqSeq::default());

    let load = move |target_page: i64| {
        let tag = set_seq.try_update(ReqSeq::issue).unwrap_or_default();
        set_is_loading.set(true);
        let filter = status.get_untracked();
        spawn_local(async move {
            let result = api.admin_orders(target_page, PER_PAGE, &filter).await;
            if !seq.with_untracked(|s| s.accepts(tag)) {
                return;
            }
            match result {
                Ok(paged) => {
                    set_orders.set(paged.items);
                    set_total.set(paged.total);
                }
                Err(err) => toast.error(err.message),
            }
            set_is_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load(1);
    });

    // 筛选变化：回到第 1 页
    let on_filter = move |ev: leptos::web_sys::Event| {
        set_status.set(event_target_value(&ev));
        set_page.set(1);
        load(1);
    };

    let on_page = Callback::new(move |target: i64| {
        set_page.set(target);
        load(target);
    });

    view! {
        <div>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="mb-4">
                        <select class="select select-bordered select-sm w-40" on:change=on_filter>
                            {STATUS_OPTIONS
                                .iter()
                                .map(|(value, label)| {
                                    let value = *value;
                                    let label = *label;
                                    view! {
                                        <option value=value selected=move || status.get() == value>
                                            {label}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <Show
                        when=move || !is_loading.get()
                        fallback=|| {
                            view! {
                                <div class="flex justify-center py-8">
                                    <span class="loading loading-spinner loading-lg"></span>
                                </div>
                            }
                        }
                    >
                        <div class="overflow-x-auto">
                            <table class="table table-sm">
                                <thead>
                                    <tr>
                                        <th>"ID"</th>
                                        <th>"订单号"</th>
                                        <th>"用户"</th>
                                        <th>"套餐"</th>
                                        <th>"类型"</th>
                                        <th>"天数"</th>
                                        <th>"金额"</th>
                                        <th>"支付方式"</th>
                                        <th>"状态"</th>
                                        <th>"创建时间"</th>
                                        <th>"支付时间"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || orders.get()
                                        key=|order| order.id
                                        children=|order: Order| {
                                            let (status_text, status_class) = order_status_label(
                                                &order.status,
                                            );
                                            let username = order
                                                .user
                                                .as_ref()
                                                .map(|u| u.username.clone())
                                                .unwrap_or_else(|| "-".to_string());
                                            let plan_name = order
                                                .plan
                                                .as_ref()
                                                .map(|p| p.name.clone())
                                                .unwrap_or_else(|| "-".to_string());
                                            let paid_at = order
                                                .paid_at
                                                .as_ref()
                                                .map(|t| fmt_datetime(t))
                                                .unwrap_or_else(|| "-".to_string());
                                            view! {
                                                <tr>
                                                    <td>{order.id}</td>
                                                    <td>{order.order_no.clone()}</td>
                                                    <td>{username}</td>
                                                    <td>{plan_name}</td>
                                                    <td>{order_type_label(&order.order_type)}</td>
                                                    <td>{order.period_days}</td>
                                                    <td>{format!("¥{}", order.amount)}</td>
                                                    <td>{order.payment_method.clone()}</td>
                                                    <td>
                                                        <span class=status_class>{status_text}</span>
                                                    </td>
                                                    <td>{fmt_datetime(&order.created_at)}</td>
                                                    <td>{paid_at}</td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                            <Show when=move || orders.get().is_empty()>
                                <p class="text-center opacity-60 py-8">"暂无订单"</p>
                            </Show>
                        </div>
                        <Pager page=page per_page=PER_PAGE total=total on_page=on_page />
                    </Show>
                </div>
            </div>
        </div>
    }
}
