//! 使用记录页
//!
//! 未绑定 new-api 账号时只显示绑定提示。
//! 默认展示分页日志；选择日期范围后切换为按范围查询的明细列表。
//! 筛选变化会把页码重置到第 1 页，慢响应用请求序号丢弃。

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::pager::Pager;
use crate::components::toast::use_toast;
use crate::models::{ReqSeq, UsageLog, User, fmt_unix, parse_date_secs};
use leptos::prelude::*;
use leptos::task::spawn_local;

const PER_PAGE: i64 = 20;

/// 当日结束时刻 = 零点 + 86399 秒
const DAY_END_OFFSET: i64 = 86399;

#[component]
pub fn UsagePage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let toast = use_toast();

    let state = auth.state;
    let is_bound = move || {
        state
            .get()
            .user
            .as_ref()
            .is_some_and(User::is_newapi_bound)
    };

    let (logs, set_logs) = signal(Vec::<UsageLog>::new());
    let (page, set_page) = signal(1i64);
    let (total, set_total) = signal(0i64);
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let (seq, set_seq) = signal(ReqSeq::default());

    let has_range = move || !start_date.get().is_empty() || !end_date.get().is_empty();

    let load = move |target_page: i64| {
        let tag = set_seq.try_update(ReqSeq::issue).unwrap_or_default();
        set_is_loading.set(true);

        let start = parse_date_secs(&start_date.get_untracked());
        let end = parse_date_secs(&end_date.get_untracked()).map(|s| s + DAY_END_OFFSET);
        let ranged = start.is_some() || end.is_some();

        spawn_local(async move {
            if ranged {
                let result = api.usage_detail(start, end).await;
                if !seq.with_untracked(|s| s.accepts(tag)) {
                    return;
                }
                match result {
                    Ok(items) => {
                        set_total.set(items.len() as i64);
                        set_logs.set(items);
                    }
                    Err(err) => toast.error(err.message),
                }
            } else {
                let result = api.usage_logs(target_page, PER_PAGE).await;
                if !seq.with_untracked(|s| s.accepts(tag)) {
                    return;
                }
                match result {
                    Ok(paged) => {
                        set_logs.set(paged.items);
                        set_total.set(paged.total);
                    }
                    Err(err) => toast.error(err.message),
                }
            }
            set_is_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if is_bound() {
            load(1);
        }
    });

    // 日期筛选变化：回到第 1 页重新加载
    let on_filter = move || {
        set_page.set(1);
        load(1);
    };

    let on_page = Callback::new(move |target: i64| {
        set_page.set(target);
        load(target);
    });

    view! {
        <div class="max-w-5xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"使用统计"</h2>

            <Show
                when=is_bound
                fallback=|| {
                    view! {
                        <div role="alert" class="alert alert-warning">
                            <div>
                                <h3 class="font-bold">"未绑定 new-api 账号"</h3>
                                <p class="text-sm">
                                    "请先在账户设置中绑定 new-api 账号，或前往 new-api 站点查询使用记录"
                                </p>
                            </div>
                        </div>
                    }
                }
            >
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <div class="flex items-center gap-2 mb-4">
                            <input
                                type="date"
                                class="input input-bordered input-sm"
                                prop:value=start_date
                                on:change=move |ev| {
                                    set_start_date.set(event_target_value(&ev));
                                    on_filter();
                                }
                            />
                            <span>"~"</span>
                            <input
                                type="date"
                                class="input input-bordered input-sm"
                                prop:value=end_date
                                on:change=move |ev| {
                                    set_end_date.set(event_target_value(&ev));
                                    on_filter();
                                }
                            />
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
                                            <th>"时间"</th>
                                            <th>"模型"</th>
                                            <th>"消耗"</th>
                                            <th>"输入Token"</th>
                                            <th>"输出Token"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        <For
                                            each=move || logs.get()
                                            key=|log| log.id
                                            children=|log: UsageLog| {
                                                view! {
                                                    <tr>
                                                        <td>{fmt_unix(log.created_at)}</td>
                                                        <td>{log.model_name.clone()}</td>
                                                        <td>{log.quota}</td>
                                                        <td>{log.prompt_tokens}</td>
                                                        <td>{log.completion_tokens}</td>
                                                    </tr>
                                                }
                                            }
                                        />
                                    </tbody>
                                </table>
                                <Show when=move || logs.get().is_empty()>
                                    <p class="text-center opacity-60 py-8">"暂无使用记录"</p>
                                </Show>
                            </div>
                            // 范围查询一次性返回全部明细，无须翻页
                            <Show when=move || !has_range()>
                                <Pager page=page per_page=PER_PAGE total=total on_page=on_page />
                            </Show>
                        </Show>
                    </div>
                </div>
            </Show>
        </div>
    }
}
