//! 管理后台：用户管理
//!
//! 关键词搜索 + 分页列表，详情框内可查看订阅、使用记录并启用/禁用账号。

use crate::api::use_api;
use crate::components::pager::Pager;
use crate::components::toast::use_toast;
use crate::models::{
    AdminUpdateUserRequest, AdminUserDetail, ReqSeq, UsageLog, User, fmt_date, fmt_unix,
};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

const PER_PAGE: i64 = 20;

#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let (users, set_users) = signal(Vec::<User>::new());
    let (page, set_page) = signal(1i64);
    let (total, set_total) = signal(0i64);
    let (keyword, set_keyword) = signal(String::new());
    let (is_loading, set_is_loading) = signal(true);
    let (seq, set_seq) = signal(ReqSeq::default());

    let (detail, set_detail) = signal(Option::<AdminUserDetail>::None);
    let (usage, set_usage) = signal(Vec::<UsageLog>::new());
    let (detail_loading, set_detail_loading) = signal(false);
    let (status_loading, set_status_loading) = signal(false);
    let detail_dialog: NodeRef<html::Dialog> = NodeRef::new();

    let load = move |target_page: i64| {
        let tag = set_seq.try_update(ReqSeq::issue).unwrap_or_default();
        set_is_loading.set(true);
        let kw = keyword.get_untracked();
        spawn_local(async move {
            let result = api.admin_users(target_page, PER_PAGE, &kw).await;
            if !seq.with_untracked(|s| s.accepts(tag)) {
                return;
            }
            match result {
                Ok(paged) => {
                    set_users.set(paged.items);
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

    // 搜索：回到第 1 页
    let on_search = move |_| {
        set_page.set(1);
        load(1);
    };

    let on_page = Callback::new(move |target: i64| {
        set_page.set(target);
        load(target);
    });

    let show_detail = move |user_id: u64| {
        set_detail.set(None);
        set_usage.set(Vec::new());
        set_detail_loading.set(true);
        if let Some(dialog) = detail_dialog.get() {
            let _ = dialog.show_modal();
        }
        spawn_local(async move {
            match api.admin_user(user_id).await {
                Ok(data) => set_detail.set(Some(data)),
                Err(err) => toast.error(err.message),
            }
            if let Ok(logs) = api.admin_user_usage(user_id).await {
                set_usage.set(logs);
            }
            set_detail_loading.set(false);
        });
    };

    // 启用/禁用切换，成功后刷新详情与列表
    let toggle_status = move |user_id: u64, enable: bool| {
        set_status_loading.set(true);
        spawn_local(async move {
            let request = AdminUpdateUserRequest {
                status: if enable { 1 } else { 2 },
            };
            match api.admin_update_user(user_id, &request).await {
                Ok(()) => {
                    toast.success(if enable { "已启用" } else { "已禁用" });
                    if let Ok(data) = api.admin_user(user_id).await {
                        set_detail.set(Some(data));
                    }
                    load(page.get_untracked());
                }
                Err(err) => toast.error(err.message),
            }
            set_status_loading.set(false);
        });
    };

    view! {
        <div>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex gap-2 mb-4">
                        <input
                            type="text"
                            class="input input-bordered input-sm w-72"
                            placeholder="搜索用户名或邮箱"
                            on:input=move |ev| set_keyword.set(event_target_value(&ev))
                            prop:value=keyword
                        />
                        <button class="btn btn-primary btn-sm" on:click=on_search>
                            "搜索"
                        </button>
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
                                        <th>"用户名"</th>
                                        <th>"邮箱"</th>
                                        <th>"订阅状态"</th>
                                        <th>"new-api"</th>
                                        <th>"状态"</th>
                                        <th>"创建时间"</th>
                                        <th>"操作"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || users.get()
                                        key=|user| user.id
                                        children=move |user: User| {
                                            let user_id = user.id;
                                            let sub_badge = match &user.subscription {
                                                Some(sub) => {
                                                    let name = sub
                                                        .plan
                                                        .as_ref()
                                                        .map(|p| p.name.clone())
                                                        .unwrap_or_else(|| "订阅中".to_string());
                                                    view! {
                                                        <span class="badge badge-success">{name}</span>
                                                    }
                                                        .into_any()
                                                }
                                                None => {
                                                    view! { <span class="badge badge-ghost">"无订阅"</span> }
                                                        .into_any()
                                                }
                                            };
                                            let newapi_badge = if user.is_newapi_bound() {
                                                view! {
                                                    <span class="badge badge-info">
                                                        {user.newapi_username.clone()}
                                                    </span>
                                                }
                                                    .into_any()
                                            } else {
                                                view! { <span class="badge badge-ghost">"未绑定"</span> }
                                                    .into_any()
                                            };
                                            let enabled = user.status == 1;
                                            view! {
                                                <tr>
                                                    <td>{user.id}</td>
                                                    <td>{user.username.clone()}</td>
                                                    <td>{user.email.clone()}</td>
                                                    <td>{sub_badge}</td>
                                                    <td>{newapi_badge}</td>
                                                    <td>
                                                        <span class=if enabled {
                                                            "badge badge-success"
                                                        } else {
                                                            "badge badge-error"
                                                        }>{if enabled { "启用" } else { "禁用" }}</span>
                                                    </td>
                                                    <td>{fmt_date(&user.created_at)}</td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-xs"
                                                            on:click=move |_| show_detail(user_id)
                                                        >
                                                            "详情"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                            <Show when=move || users.get().is_empty()>
                                <p class="text-center opacity-60 py-8">"暂无用户"</p>
                            </Show>
                        </div>
                        <Pager page=page per_page=PER_PAGE total=total on_page=on_page />
                    </Show>
                </div>
            </div>

            // 用户详情对话框
            <dialog class="modal" node_ref=detail_dialog>
                <div class="modal-box max-w-2xl">
                    <h3 class="font-bold text-lg">"用户详情"</h3>
                    <div class="py-4">
                        <Show
                            when=move || !detail_loading.get()
                            fallback=|| {
                                view! {
                                    <div class="flex justify-center py-8">
                                        <span class="loading loading-spinner"></span>
                                    </div>
                                }
                            }
                        >
                            {move || {
                                detail
                                    .get()
                                    .map(|data| {
                                        let user = data.user.clone();
                                        let user_id = user.id;
                                        let enabled = user.status == 1;
                                        let subscription = data
                                            .subscription
                                            .clone()
                                            .filter(|s| s.id != 0);
                                        view! {
                                            <div class="space-y-2 text-sm">
                                                <p>{format!("用户名：{}", user.username)}</p>
                                                <p>
                                                    {format!(
                                                        "邮箱：{}",
                                                        if user.email.is_empty() { "-" } else { user.email.as_str() },
                                                    )}
                                                </p>
                                                <p>
                                                    {format!(
                                                        "角色：{}",
                                                        if user.is_admin() { "管理员" } else { "普通用户" },
                                                    )}
                                                </p>
                                                <p>
                                                    {format!(
                                                        "new-api 账号：{}",
                                                        if user.newapi_username.is_empty() {
                                                            "-"
                                                        } else {
                                                            user.newapi_username.as_str()
                                                        },
                                                    )}
                                                </p>
                                                <p>{format!("当前余额：{}", data.current_quota)}</p>
                                                <div class="flex items-center gap-2">
                                                    <span>
                                                        "账号状态："
                                                        <span class=if enabled {
                                                            "badge badge-success"
                                                        } else {
                                                            "badge badge-error"
                                                        }>{if enabled { "启用" } else { "禁用" }}</span>
                                                    </span>
                                                    <button
                                                        class=if enabled {
                                                            "btn btn-error btn-xs"
                                                        } else {
                                                            "btn btn-success btn-xs"
                                                        }
                                                        disabled=move || status_loading.get()
                                                        on:click=move |_| toggle_status(user_id, !enabled)
                                                    >
                                                        {if enabled { "禁用账号" } else { "启用账号" }}
                                                    </button>
                                                </div>

                                                {subscription
                                                    .map(|sub| {
                                                        view! {
                                                            <div class="mt-4">
                                                                <h4 class="font-bold mb-2">"订阅信息"</h4>
                                                                <p>
                                                                    {format!(
                                                                        "套餐：{}",
                                                                        sub
                                                                            .plan
                                                                            .as_ref()
                                                                            .map(|p| p.name.as_str())
                                                                            .unwrap_or("-"),
                                                                    )}
                                                                </p>
                                                                <p>{format!("状态：{}", sub.status)}</p>
                                                                <p>{format!("每日额度：{}", sub.daily_quota)}</p>
                                                                <p>{format!("今日额度：{}", sub.today_quota)}</p>
                                                                <p>{format!("结转额度：{}", sub.carried_quota)}</p>
                                                                <p>{format!("到期时间：{}", fmt_date(&sub.end_date))}</p>
                                                            </div>
                                                        }
                                                    })}

                                                <Show when=move || !usage.get().is_empty()>
                                                    <div class="mt-4">
                                                        <h4 class="font-bold mb-2">"最近使用记录"</h4>
                                                        <div class="overflow-x-auto max-h-60">
                                                            <table class="table table-xs">
                                                                <thead>
                                                                    <tr>
                                                                        <th>"时间"</th>
                                                                        <th>"模型"</th>
                                                                        <th>"消耗"</th>
                                                                    </tr>
                                                                </thead>
                                                                <tbody>
                                                                    <For
                                                                        each=move || usage.get()
                                                                        key=|log| log.id
                                                                        children=|log: UsageLog| {
                                                                            view! {
                                                                                <tr>
                                                                                    <td>{fmt_unix(log.created_at)}</td>
                                                                                    <td>{log.model_name.clone()}</td>
                                                                                    <td>{log.quota}</td>
                                                                                </tr>
                                                                            }
                                                                        }
                                                                    />
                                                                </tbody>
                                                            </table>
                                                        </div>
                                                    </div>
                                                </Show>
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
