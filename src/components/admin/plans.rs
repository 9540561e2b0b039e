//! 管理后台：套餐管理
//!
//! 套餐列表 + 新建/编辑对话框。表单校验在 [`draft`] 中以纯逻辑实现，
//! 分组选项来自 new-api 的分组接口。

pub mod draft;

use crate::api::use_api;
use crate::components::toast::use_toast;
use crate::models::{Plan, period_type_label};
use draft::{FieldErrors, PlanDraft, field_error};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AdminPlansPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let (plans, set_plans) = signal(Vec::<Plan>::new());
    let (groups, set_groups) = signal(Vec::<String>::new());
    let (is_loading, set_is_loading) = signal(true);

    // 表单状态
    let (editing_id, set_editing_id) = signal(Option::<u64>::None);
    let (form, set_form) = signal(PlanDraft::new());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (submit_loading, set_submit_loading) = signal(false);
    let form_dialog: NodeRef<html::Dialog> = NodeRef::new();

    let load_plans = move || {
        spawn_local(async move {
            match api.list_plans().await {
                Ok(list) => set_plans.set(list),
                Err(err) => toast.error(err.message),
            }
            set_is_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load_plans();
        spawn_local(async move {
            if let Ok(list) = api.admin_newapi_groups().await {
                set_groups.set(list);
            }
        });
    });

    let open_form = move |plan: Option<&Plan>| {
        match plan {
            Some(plan) => {
                set_editing_id.set(Some(plan.id));
                set_form.set(PlanDraft::from_plan(plan));
            }
            None => {
                set_editing_id.set(None);
                set_form.set(PlanDraft::new());
            }
        }
        set_errors.set(Vec::new());
        if let Some(dialog) = form_dialog.get() {
            let _ = dialog.show_modal();
        }
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match form.get().validate() {
            Ok(request) => request,
            Err(errs) => {
                set_errors.set(errs);
                return;
            }
        };
        set_errors.set(Vec::new());
        set_submit_loading.set(true);

        let editing = editing_id.get();
        spawn_local(async move {
            let result = match editing {
                Some(id) => api.admin_update_plan(id, &request).await,
                None => api.admin_create_plan(&request).await,
            };
            match result {
                Ok(()) => {
                    toast.success(if editing.is_some() { "更新成功" } else { "创建成功" });
                    if let Some(dialog) = form_dialog.get_untracked() {
                        dialog.close();
                    }
                    load_plans();
                }
                Err(err) => toast.error(err.message),
            }
            set_submit_loading.set(false);
        });
    };

    let on_delete = move |plan_id: u64| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("确定删除该套餐？").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api.admin_delete_plan(plan_id).await {
                Ok(()) => {
                    toast.success("删除成功");
                    load_plans();
                }
                Err(err) => toast.error(err.message),
            }
        });
    };

    // 字段错误提示
    let error_hint = move |field: &'static str| {
        view! {
            <Show when=move || field_error(&errors.get(), field).is_some()>
                <span class="label-text-alt text-error">
                    {move || {
                        field_error(&errors.get(), field).unwrap_or_default().to_string()
                    }}
                </span>
            </Show>
        }
    };

    view! {
        <div>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="mb-4">
                        <button class="btn btn-primary btn-sm" on:click=move |_| open_form(None)>
                            "新建套餐"
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
                                        <th>"名称"</th>
                                        <th>"周期"</th>
                                        <th>"每日额度"</th>
                                        <th>"结转"</th>
                                        <th>"价格"</th>
                                        <th>"分组"</th>
                                        <th>"状态"</th>
                                        <th>"操作"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || plans.get()
                                        key=|plan| plan.id
                                        children=move |plan: Plan| {
                                            let plan_id = plan.id;
                                            let plan_for_edit = plan.clone();
                                            let online = plan.status == 1;
                                            let price_label = if plan.price_type == "daily" {
                                                format!("¥{}/天", plan.price)
                                            } else {
                                                format!("¥{}", plan.price)
                                            };
                                            view! {
                                                <tr>
                                                    <td>{plan.id}</td>
                                                    <td>{plan.name.clone()}</td>
                                                    <td>
                                                        {format!(
                                                            "{}天 ({})",
                                                            plan.period_days,
                                                            period_type_label(&plan.period_type),
                                                        )}
                                                    </td>
                                                    <td>{plan.daily_quota}</td>
                                                    <td>
                                                        <span class=if plan.carry_over == 1 {
                                                            "badge badge-success"
                                                        } else {
                                                            "badge badge-ghost"
                                                        }>{if plan.carry_over == 1 { "是" } else { "否" }}</span>
                                                    </td>
                                                    <td>{price_label}</td>
                                                    <td>{plan.newapi_group.clone()}</td>
                                                    <td>
                                                        <span class=if online {
                                                            "badge badge-success"
                                                        } else {
                                                            "badge badge-ghost"
                                                        }>{if online { "上架" } else { "下架" }}</span>
                                                    </td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-xs"
                                                            on:click=move |_| open_form(Some(&plan_for_edit))
                                                        >
                                                            "编辑"
                                                        </button>
                                                        <button
                                                            class="btn btn-ghost btn-xs text-error"
                                                            on:click=move |_| on_delete(plan_id)
                                                        >
                                                            "删除"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                            <Show when=move || plans.get().is_empty()>
                                <p class="text-center opacity-60 py-8">"暂无套餐"</p>
                            </Show>
                        </div>
                    </Show>
                </div>
            </div>

            // 新建/编辑对话框
            <dialog class="modal" node_ref=form_dialog>
                <div class="modal-box max-w-xl">
                    <h3 class="font-bold text-lg mb-4">
                        {move || if editing_id.get().is_some() { "编辑套餐" } else { "新建套餐" }}
                    </h3>
                    <form on:submit=on_submit>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"套餐名称"</span>
                                {error_hint("name")}
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || form.get().name
                                on:input=move |ev| {
                                    set_form.update(|d| d.name = event_target_value(&ev));
                                }
                            />
                        </div>

                        <div class="form-control mt-2">
                            <label class="label">
                                <span class="label-text">"描述"</span>
                            </label>
                            <textarea
                                class="textarea textarea-bordered"
                                rows="2"
                                prop:value=move || form.get().description
                                on:input=move |ev| {
                                    set_form.update(|d| d.description = event_target_value(&ev));
                                }
                            ></textarea>
                        </div>

                        <div class="grid grid-cols-2 gap-3 mt-2">
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"周期类型"</span>
                                    {error_hint("period_type")}
                                </label>
                                <select
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_form.update(|d| d.period_type = event_target_value(&ev));
                                    }
                                >
                                    {["day", "week", "month", "custom"]
                                        .into_iter()
                                        .map(|value| {
                                            view! {
                                                <option
                                                    value=value
                                                    selected=move || form.get().period_type == value
                                                >
                                                    {period_type_label(value)}
                                                </option>
                                            }
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"周期天数"</span>
                                    {error_hint("period_days")}
                                </label>
                                <input
                                    type="number"
                                    min="1"
                                    class="input input-bordered"
                                    prop:value=move || form.get().period_days
                                    on:input=move |ev| {
                                        set_form.update(|d| d.period_days = event_target_value(&ev));
                                    }
                                />
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"每日额度"</span>
                                    {error_hint("daily_quota")}
                                </label>
                                <input
                                    type="number"
                                    min="1"
                                    class="input input-bordered"
                                    prop:value=move || form.get().daily_quota
                                    on:input=move |ev| {
                                        set_form.update(|d| d.daily_quota = event_target_value(&ev));
                                    }
                                />
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"最大结转额度 (0 表示无限制)"</span>
                                    {error_hint("max_carry_over")}
                                </label>
                                <input
                                    type="number"
                                    min="0"
                                    class="input input-bordered"
                                    prop:value=move || form.get().max_carry_over
                                    on:input=move |ev| {
                                        set_form.update(|d| d.max_carry_over = event_target_value(&ev));
                                    }
                                />
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"价格类型"</span>
                                    {error_hint("price_type")}
                                </label>
                                <select
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_form.update(|d| d.price_type = event_target_value(&ev));
                                    }
                                >
                                    <option value="fixed" selected=move || form.get().price_type == "fixed">
                                        "固定价格"
                                    </option>
                                    <option value="daily" selected=move || form.get().price_type == "daily">
                                        "按天计价"
                                    </option>
                                </select>
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"价格"</span>
                                    {error_hint("price")}
                                </label>
                                <input
                                    type="number"
                                    min="0"
                                    step="0.01"
                                    class="input input-bordered"
                                    prop:value=move || form.get().price
                                    on:input=move |ev| {
                                        set_form.update(|d| d.price = event_target_value(&ev));
                                    }
                                />
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"new-api 分组"</span>
                                    {error_hint("newapi_group")}
                                </label>
                                <select
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        set_form.update(|d| d.newapi_group = event_target_value(&ev));
                                    }
                                >
                                    <option value="" selected=move || form.get().newapi_group.is_empty()>
                                        "请选择分组"
                                    </option>
                                    <For
                                        each=move || groups.get()
                                        key=|group| group.clone()
                                        children=move |group: String| {
                                            let value = group.clone();
                                            let label = group.clone();
                                            view! {
                                                <option
                                                    value=value.clone()
                                                    selected=move || form.get().newapi_group == value
                                                >
                                                    {label}
                                                </option>
                                            }
                                        }
                                    />
                                </select>
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"排序"</span>
                                    {error_hint("sort_order")}
                                </label>
                                <input
                                    type="number"
                                    min="0"
                                    class="input input-bordered"
                                    prop:value=move || form.get().sort_order
                                    on:input=move |ev| {
                                        set_form.update(|d| d.sort_order = event_target_value(&ev));
                                    }
                                />
                            </div>
                        </div>

                        <div class="flex gap-6 mt-4">
                            <label class="label cursor-pointer gap-2">
                                <span class="label-text">"支持结转"</span>
                                <input
                                    type="checkbox"
                                    class="toggle toggle-primary toggle-sm"
                                    prop:checked=move || form.get().carry_over
                                    on:change=move |ev| {
                                        set_form.update(|d| d.carry_over = event_target_checked(&ev));
                                    }
                                />
                            </label>
                            <label class="label cursor-pointer gap-2">
                                <span class="label-text">"上架"</span>
                                <input
                                    type="checkbox"
                                    class="toggle toggle-primary toggle-sm"
                                    prop:checked=move || form.get().status
                                    on:change=move |ev| {
                                        set_form.update(|d| d.status = event_target_checked(&ev));
                                    }
                                />
                            </label>
                        </div>

                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| {
                                    if let Some(dialog) = form_dialog.get() {
                                        dialog.close();
                                    }
                                }
                            >
                                "取消"
                            </button>
                            <button class="btn btn-primary" disabled=move || submit_loading.get()>
                                {move || {
                                    if submit_loading.get() {
                                        view! { <span class="loading loading-spinner"></span> }
                                            .into_any()
                                    } else {
                                        "保存".into_any()
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
