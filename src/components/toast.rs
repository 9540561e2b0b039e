//! 全局通知组件
//!
//! 页面各处通过 Context 拿到 [`ToastContext`] 弹出提示，
//! 3 秒后自动消失。错误提示统一走这里，不在页面内散落 alert。

use leptos::prelude::*;
use std::time::Duration;

/// 通知上下文：(消息, 是否成功)
#[derive(Clone, Copy)]
pub struct ToastContext {
    message: RwSignal<Option<(String, bool)>>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            message: RwSignal::new(None),
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text.into(), true);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text.into(), false);
    }

    fn show(&self, text: String, ok: bool) {
        let message = self.message;
        message.set(Some((text, ok)));
        // 3 秒后自动清除
        set_timeout(
            move || {
                message.set(None);
            },
            Duration::from_secs(3),
        );
    }
}

/// 从 Context 获取通知上下文
pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// 通知渲染组件，挂载在应用根部
#[component]
pub fn ToastHost() -> impl IntoView {
    let toast = use_toast();
    let message = toast.message;

    view! {
        <Show when=move || message.get().is_some()>
            {move || {
                message
                    .get()
                    .map(|(text, ok)| {
                        let class = if ok { "alert alert-success" } else { "alert alert-error" };
                        view! {
                            <div class="toast toast-top toast-center z-50">
                                <div class=class>
                                    <span>{text}</span>
                                </div>
                            </div>
                        }
                    })
            }}
        </Show>
    }
}
