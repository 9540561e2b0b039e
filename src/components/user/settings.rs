//! 账户设置页
//!
//! 三个卡片：个人信息、new-api 账号绑定、邮件提醒。
//! 保存成功后调用 /auth/me 刷新会话中的用户资料，而不是整页刷新。

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::toast::use_toast;
use crate::models::{BindNewApiRequest, EmailSettingsRequest, UpdateProfileRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let toast = use_toast();

    let state = auth.state;
    let user = move || state.get().user.unwrap_or_default();

    let (email, set_email) = signal(auth.user().map(|u| u.email).unwrap_or_default());
    let (profile_loading, set_profile_loading) = signal(false);

    let (bind_username, set_bind_username) = signal(String::new());
    let (bind_password, set_bind_password) = signal(String::new());
    let (bind_loading, set_bind_loading) = signal(false);

    let (email_remind, set_email_remind) = signal(
        auth.user().map(|u| u.email_remind == 1).unwrap_or(false),
    );
    let (remind_days, set_remind_days) = signal(
        auth.user()
            .map(|u| {
                if u.remind_days > 0 { u.remind_days } else { 3 }
            })
            .unwrap_or(3)
            .to_string(),
    );
    let (remind_loading, set_remind_loading) = signal(false);

    // 保存后刷新会话中的用户资料
    let refresh_user = move || {
        spawn_local(async move {
            if let Ok(profile) = api.me().await {
                auth.set_user(profile);
            }
        });
    };

    let on_save_profile = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_profile_loading.set(true);
        let request = UpdateProfileRequest { email: email.get() };
        spawn_local(async move {
            match api.update_profile(&request).await {
                Ok(()) => {
                    toast.success("更新成功");
                    refresh_user();
                }
                Err(err) => toast.error(err.message),
            }
            set_profile_loading.set(false);
        });
    };

    let on_bind = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let username = bind_username.get();
        let password = bind_password.get();
        if username.is_empty() || password.is_empty() {
            toast.error("请输入 new-api 用户名和密码");
            return;
        }
        set_bind_loading.set(true);
        spawn_local(async move {
            match api.bind_newapi(&BindNewApiRequest { username, password }).await {
                Ok(()) => {
                    toast.success("绑定成功");
                    set_bind_username.set(String::new());
                    set_bind_password.set(String::new());
                    refresh_user();
                }
                Err(err) => toast.error(err.message),
            }
            set_bind_loading.set(false);
        });
    };

    let on_save_remind = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let days = match remind_days.get().parse::<i32>() {
            Ok(d) if (1..=30).contains(&d) => d,
            _ => {
                toast.error("提醒天数应在 1-30 之间");
                return;
            }
        };
        set_remind_loading.set(true);
        let request = EmailSettingsRequest {
            email_remind: if email_remind.get() { 1 } else { 0 },
            remind_days: days,
        };
        spawn_local(async move {
            match api.update_email_settings(&request).await {
                Ok(()) => {
                    toast.success("更新成功");
                    refresh_user();
                }
                Err(err) => toast.error(err.message),
            }
            set_remind_loading.set(false);
        });
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h2 class="text-2xl font-bold">"账户设置"</h2>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">"个人信息"</h3>
                    <form on:submit=on_save_profile>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"用户名"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || user().username
                                disabled
                            />
                        </div>
                        <div class="form-control mt-2">
                            <label class="label">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                type="email"
                                class="input input-bordered"
                                placeholder="用于接收到期提醒"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                            />
                        </div>
                        <button class="btn btn-primary mt-4" disabled=move || profile_loading.get()>
                            "保存"
                        </button>
                    </form>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">"new-api 账号绑定"</h3>
                    <Show
                        when=move || user().is_newapi_bound()
                        fallback=move || {
                            view! {
                                <form on:submit=on_bind>
                                    <div class="form-control">
                                        <label class="label">
                                            <span class="label-text">"new-api 用户名"</span>
                                        </label>
                                        <input
                                            type="text"
                                            class="input input-bordered"
                                            on:input=move |ev| set_bind_username.set(event_target_value(&ev))
                                            prop:value=bind_username
                                        />
                                    </div>
                                    <div class="form-control mt-2">
                                        <label class="label">
                                            <span class="label-text">"new-api 密码"</span>
                                        </label>
                                        <input
                                            type="password"
                                            class="input input-bordered"
                                            on:input=move |ev| set_bind_password.set(event_target_value(&ev))
                                            prop:value=bind_password
                                        />
                                    </div>
                                    <button class="btn btn-primary mt-4" disabled=move || bind_loading.get()>
                                        "绑定"
                                    </button>
                                </form>
                            }
                        }
                    >
                        <p>
                            "已绑定账号: "
                            <span class="badge badge-success">
                                {move || user().newapi_username}
                            </span>
                        </p>
                    </Show>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">"邮件提醒"</h3>
                    <form on:submit=on_save_remind>
                        <div class="form-control">
                            <label class="label cursor-pointer justify-start gap-4">
                                <span class="label-text">"开启到期提醒"</span>
                                <input
                                    type="checkbox"
                                    class="toggle toggle-primary"
                                    prop:checked=email_remind
                                    on:change=move |ev| set_email_remind.set(event_target_checked(&ev))
                                />
                            </label>
                        </div>
                        <div class="form-control mt-2">
                            <label class="label">
                                <span class="label-text">"提前提醒天数"</span>
                            </label>
                            <input
                                type="number"
                                min="1"
                                max="30"
                                class="input input-bordered w-32"
                                on:input=move |ev| set_remind_days.set(event_target_value(&ev))
                                prop:value=remind_days
                            />
                        </div>
                        <button class="btn btn-primary mt-4" disabled=move || remind_loading.get()>
                            "保存"
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
