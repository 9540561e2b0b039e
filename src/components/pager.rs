//! 分页控件
//!
//! 所有分页列表共用：展示页码摘要并提供上一页/下一页按钮。
//! 页码计算放在 models 的纯函数里，控件只负责渲染与回调。

use crate::models::{page_count, rows_on_page};
use leptos::prelude::*;

#[component]
pub fn Pager(
    /// 当前页（从 1 开始）
    page: ReadSignal<i64>,
    /// 每页条数
    per_page: i64,
    /// 总条数信号
    total: ReadSignal<i64>,
    /// 翻页回调，参数为目标页码
    on_page: Callback<i64>,
) -> impl IntoView {
    let pages = move || page_count(total.get(), per_page);
    let rows = move || rows_on_page(total.get(), page.get(), per_page);

    view! {
        <div class="flex items-center justify-between mt-4">
            <span class="text-sm opacity-70">
                {move || {
                    format!("第 {}/{} 页 · 本页 {} 条 / 共 {} 条", page.get(), pages(), rows(), total.get())
                }}
            </span>
            <div class="join">
                <button
                    class="join-item btn btn-sm"
                    disabled=move || page.get() <= 1
                    on:click=move |_| on_page.run(page.get() - 1)
                >
                    "上一页"
                </button>
                <button
                    class="join-item btn btn-sm"
                    disabled=move || page.get() >= pages()
                    on:click=move |_| on_page.run(page.get() + 1)
                >
                    "下一页"
                </button>
            </div>
        </div>
    }
}
