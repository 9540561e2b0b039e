//! 我的订单页
//!
//! 分页订单列表，点击订单号查看详情。
//! 翻页请求带序号防护：慢响应返回时若已翻到别页则直接丢弃。

use crate::api::use_api;
use crate::components::pager::Pager;
use crate::components::toast::use_toast;
use crate::models::{Order, ReqSeq, fmt_datetime, order_status_label, order_type_label};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

const PER_PAGE: i64 = 10;

#[component]
pub fn OrdersPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (page, set_page) = signal(1i64);
    let (total, set_total) = signal(0i64);
    let (is_loading, set_is_loading) = signal(true);
    // 请求序号：只接受最新一次请求的响应
    let (seq, set_seq) = signal(ReqSeq::default());

    let (detail, set_detail) = signal(Option::<Order>::None);
    let detail_dialog: NodeRef<html::Dialog> = NodeRef::new();

    let load = move |target_page: i64| {
        let tag = set_seq.try_update(ReqSeq::issue).unwrap_or_default();
        set_is_loading.set(true);
        spawn_local(async move {
            let result = api.list_orders(target_page, PER_PAGE).await;
            // 已有更新的请求，丢弃本次结果
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

    let on_page = Callback::new(move |target: i64| {
        set_page.set(target);
        load(target);
    });

    let show_detail = move |order_id: u64| {
        set_detail.set(None);
        if let Some(dialog) = detail_dialog.get() {
            let _ = dialog.show_modal();
        }
        spawn_local(async move {
            match api.get_order(order_id).await {
                Ok(order) => set_detail.set(Some(order)),
                Err(err) => toast.error(err.message),
            }
        });
    };

    view! {
        <div class="max-w-5xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"订单记录"</h2>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
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
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"订单号"</th>
                                        <th>"套餐"</th>
                                        <th>"类型"</th>
                                        <th>"天数"</th>
                                        <th>"金额"</th>
                                        <th>"状态"</th>
                                        <th>"创建时间"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || orders.get()
                                        key=|order| order.id
                                        children=move |order: Order| {
                                            let order_id = order.id;
                                            let (status_text, status_class) = order_status_label(
                                                &order.status,
                                            );
                                            let plan_name = order
                                                .plan
                                                .as_ref()
                                                .map(|p| p.name.clone())
                                                .unwrap_or_else(|| "-".to_string());
                                            view! {
                                                <tr>
                                                    <td>
                                                        <a
                                                            class="link link-primary"
                                                            on:click=move |_| show_detail(order_id)
                                                        >
                                                            {order.order_no.clone()}
                                                        </a>
                                                    </td>
                                                    <td>{plan_name}</td>
                                                    <td>{order_type_label(&order.order_type)}</td>
                                                    <td>{format!("{}天", order.period_days)}</td>
                                                    <td>{format!("¥{}", order.amount)}</td>
                                                    <td>
                                                        <span class=status_class>{status_text}</span>
                                                    </td>
                                                    <td>{fmt_datetime(&order.created_at)}</td>
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

            // 订单详情对话框
            <dialog class="modal" node_ref=detail_dialog>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"订单详情"</h3>
                    <div class="py-4">
                        <Show
                            when=move || detail.get().is_some()
                            fallback=|| view! { <span class="loading loading-spinner"></span> }
                        >
                            {move || {
                                detail
                                    .get()
                                    .map(|order| {
                                        let (status_text, status_class) = order_status_label(
                                            &order.status,
                                        );
                                        view! {
                                            <div class="space-y-2 text-sm">
                                                <p>{format!("订单号：{}", order.order_no)}</p>
                                                <p>
                                                    {format!(
                                                        "套餐：{}",
                                                        order
                                                            .plan
                                                            .as_ref()
                                                            .map(|p| p.name.as_str())
                                                            .unwrap_or("-"),
                                                    )}
                                                </p>
                                                <p>{format!("类型：{}", order_type_label(&order.order_type))}</p>
                                                <p>{format!("天数：{}天", order.period_days)}</p>
                                                <p>{format!("金额：¥{}", order.amount)}</p>
                                                <p>{format!("支付方式：{}", order.payment_method)}</p>
                                                <p>
                                                    "状态：" <span class=status_class>{status_text}</span>
                                                </p>
                                                <p>{format!("创建时间：{}", fmt_datetime(&order.created_at))}</p>
                                                {order
                                                    .paid_at
                                                    .as_ref()
                                                    .map(|paid| {
                                                        view! {
                                                            <p>{format!("支付时间：{}", fmt_datetime(paid))}</p>
                                                        }
                                                    })}
                                            </div>
                                        }
                                    })
                            }}
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
