//! 登录/注册页
//!
//! 三个标签页：账号登录、注册账号、new-api 登录。
//! 注册时在客户端先做长度校验，其余校验交给后端。

use crate::api::use_api;
use crate::auth::use_auth;
use crate::models::{LoginRequest, RegisterRequest};
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 当前激活的标签页
#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Login,
    Register,
    NewApi,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let navigate = use_navigate();

    let (tab, set_tab) = signal(Tab::Login);
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 切换标签时清空错误提示
    let switch_tab = move |target: Tab| {
        set_tab.set(target);
        set_error_msg.set(None);
    };

    let on_submit = {
        let navigate = navigate.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let name = username.get();
            let pass = password.get();
            if name.is_empty() || pass.is_empty() {
                set_error_msg.set(Some("请输入用户名和密码".to_string()));
                return;
            }
            let active = tab.get();
            if active == Tab::Register {
                if name.chars().count() < 3 {
                    set_error_msg.set(Some("用户名至少3个字符".to_string()));
                    return;
                }
                if pass.chars().count() < 6 {
                    set_error_msg.set(Some("密码至少6个字符".to_string()));
                    return;
                }
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let navigate = navigate.clone();
            spawn_local(async move {
                let result = match active {
                    Tab::Login => {
                        api.login(&LoginRequest {
                            username: name,
                            password: pass,
                        })
                        .await
                    }
                    Tab::Register => {
                        let mail = email.get_untracked();
                        api.register(&RegisterRequest {
                            username: name,
                            password: pass,
                            email: if mail.is_empty() { None } else { Some(mail) },
                        })
                        .await
                    }
                    Tab::NewApi => {
                        api.login_newapi(&LoginRequest {
                            username: name,
                            password: pass,
                        })
                        .await
                    }
                };

                match result {
                    Ok(payload) => {
                        auth.set_auth(payload.token, payload.user);
                        navigate("/");
                    }
                    Err(err) => set_error_msg.set(Some(err.message)),
                }
                set_is_submitting.set(false);
            });
        }
    };

    let tab_class = move |target: Tab| {
        if tab.get() == target {
            "tab tab-active"
        } else {
            "tab"
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold mb-4">"订阅中心"</h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div role="tablist" class="tabs tabs-bordered mb-2">
                            <a role="tab" class=move || tab_class(Tab::Login)
                                on:click=move |_| switch_tab(Tab::Login)>
                                "账号登录"
                            </a>
                            <a role="tab" class=move || tab_class(Tab::Register)
                                on:click=move |_| switch_tab(Tab::Register)>
                                "注册账号"
                            </a>
                            <a role="tab" class=move || tab_class(Tab::NewApi)
                                on:click=move |_| switch_tab(Tab::NewApi)>
                                "new-api 登录"
                            </a>
                        </div>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">
                                    {move || {
                                        if tab.get() == Tab::NewApi { "new-api 用户名" } else { "用户名" }
                                    }}
                                </span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="用户名"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <Show when=move || tab.get() == Tab::Register>
                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"邮箱（选填）"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="邮箱"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                />
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">
                                    {move || {
                                        if tab.get() == Tab::NewApi { "new-api 密码" } else { "密码" }
                                    }}
                                </span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "提交中..."
                                        }
                                            .into_any()
                                    } else if tab.get() == Tab::Register {
                                        "注册".into_any()
                                    } else {
                                        "登录".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
