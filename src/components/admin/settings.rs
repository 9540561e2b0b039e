//! 管理后台：系统设置
//!
//! 站点设置表单（开关以 "0"/"1" 字符串与后端交换）与手动额度同步入口。

use crate::api::use_api;
use crate::components::toast::use_toast;
use crate::models::{SiteSettings, flag_on, flag_str};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AdminSettingsPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let (is_loading, set_is_loading) = signal(true);
    let (site_name, set_site_name) = signal(String::new());
    let (site_description, set_site_description) = signal(String::new());
    let (require_login, set_require_login) = signal(false);
    let (allow_register, set_allow_register) = signal(false);
    let (newapi_login, set_newapi_login) = signal(false);
    let (saving, set_saving) = signal(false);
    let (syncing, set_syncing) = signal(false);

    Effect::new(move |_| {
        spawn_local(async move {
            match api.admin_settings().await {
                Ok(settings) => {
                    set_site_name.set(settings.site_name);
                    set_site_description.set(settings.site_description);
                    set_require_login.set(flag_on(&settings.require_login));
                    set_allow_register.set(flag_on(&settings.allow_register));
                    set_newapi_login.set(flag_on(&settings.newapi_login_enabled));
                }
                Err(err) => toast.error(err.message),
            }
            set_is_loading.set(false);
        });
    });

    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        let request = SiteSettings {
            site_name: site_name.get(),
            site_description: site_description.get(),
            require_login: flag_str(require_login.get()),
            allow_register: flag_str(allow_register.get()),
            newapi_login_enabled: flag_str(newapi_login.get()),
        };
        spawn_local(async move {
            match api.admin_update_settings(&request).await {
                Ok(()) => toast.success("保存成功"),
                Err(err) => toast.error(err.message),
            }
            set_saving.set(false);
        });
    };

    let on_sync = move |_| {
        set_syncing.set(true);
        spawn_local(async move {
            match api.admin_trigger_sync().await {
                Ok(()) => toast.success("同步任务已启动"),
                Err(err) => toast.error(err.message),
            }
            set_syncing.set(false);
        });
    };

    view! {
        <div class="max-w-2xl space-y-6">
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
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">"站点设置"</h3>
                        <form on:submit=on_save>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"站点名称"</span>
                                </label>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    on:input=move |ev| set_site_name.set(event_target_value(&ev))
                                    prop:value=site_name
                                />
                            </div>
                            <div class="form-control mt-2">
                                <label class="label">
                                    <span class="label-text">"站点描述"</span>
                                </label>
                                <textarea
                                    class="textarea textarea-bordered"
                                    rows="2"
                                    prop:value=site_description
                                    on:input=move |ev| {
                                        set_site_description.set(event_target_value(&ev));
                                    }
                                ></textarea>
                            </div>

                            <div class="divider"></div>

                            <div class="form-control">
                                <label class="label cursor-pointer justify-start gap-4">
                                    <span class="label-text">"访问需要登录"</span>
                                    <input
                                        type="checkbox"
                                        class="toggle toggle-primary"
                                        prop:checked=require_login
                                        on:change=move |ev| {
                                            set_require_login.set(event_target_checked(&ev));
                                        }
                                    />
                                </label>
                                <span class="text-xs opacity-60 ml-1">
                                    "开启后未登录用户无法查看套餐列表"
                                </span>
                            </div>
                            <div class="form-control mt-2">
                                <label class="label cursor-pointer justify-start gap-4">
                                    <span class="label-text">"允许注册"</span>
                                    <input
                                        type="checkbox"
                                        class="toggle toggle-primary"
                                        prop:checked=allow_register
                                        on:change=move |ev| {
                                            set_allow_register.set(event_target_checked(&ev));
                                        }
                                    />
                                </label>
                            </div>
                            <div class="form-control mt-2">
                                <label class="label cursor-pointer justify-start gap-4">
                                    <span class="label-text">"允许 new-api 登录"</span>
                                    <input
                                        type="checkbox"
                                        class="toggle toggle-primary"
                                        prop:checked=newapi_login
                                        on:change=move |ev| {
                                            set_newapi_login.set(event_target_checked(&ev));
                                        }
                                    />
                                </label>
                            </div>

                            <button class="btn btn-primary mt-4" disabled=move || saving.get()>
                                "保存设置"
                            </button>
                        </form>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">"系统操作"</h3>
                        <p class="text-sm opacity-60">
                            "手动触发订阅额度同步，通常每天 0:00 自动执行"
                        </p>
                        <div>
                            <button
                                class="btn btn-outline mt-2"
                                disabled=move || syncing.get()
                                on:click=on_sync
                            >
                                {move || {
                                    if syncing.get() {
                                        view! { <span class="loading loading-spinner"></span> }
                                            .into_any()
                                    } else {
                                        "立即同步额度".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
