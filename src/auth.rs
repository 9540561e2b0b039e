//! 会话状态模块
//!
//! 管理当前登录身份，与路由系统解耦。
//! 路由服务通过注入的认证/权限信号来检查访问资格；
//! API 客户端通过 `token()` 读取凭据，401 时回调 `logout()`。

use crate::api::ApiClient;
use crate::models::User;
use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use leptos::task::spawn_local;

const STORAGE_TOKEN_KEY: &str = "subcenter_token";
const STORAGE_USER_KEY: &str = "subcenter_user";

/// 会话状态
///
/// 不变量：token 为 Some 时 user 必为 Some；任一 401 响应会同步清空两者。
#[derive(Clone, Default)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    /// 启动恢复尚未完成
    pub is_loading: bool,
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState {
            is_loading: true,
            ..SessionState::default()
        });
        Self { state, set_state }
    }

    /// 当前凭据（非响应式读取，供 API 客户端使用）
    pub fn token(&self) -> Option<String> {
        self.state.get_untracked().token
    }

    /// 当前用户（非响应式读取）
    pub fn user(&self) -> Option<User> {
        self.state.get_untracked().user
    }

    /// 登录成功后写入会话，并持久化到 LocalStorage。
    pub fn set_auth(&self, token: String, user: User) {
        let _ = LocalStorage::set(STORAGE_TOKEN_KEY, &token);
        let _ = LocalStorage::set(STORAGE_USER_KEY, &user);
        self.set_state.update(|state| {
            state.token = Some(token);
            state.user = Some(user);
            state.is_loading = false;
        });
    }

    /// 仅更新用户资料（/auth/me 刷新、资料修改后）。
    /// 未登录时忽略，保持 token/user 成对的不变量。
    pub fn set_user(&self, user: User) {
        self.set_state.update(|state| {
            if state.token.is_some() {
                let _ = LocalStorage::set(STORAGE_USER_KEY, &user);
                state.user = Some(user);
            }
        });
    }

    /// 注销：同步清空 token 与用户，并删除持久化键。
    ///
    /// 本方法不做导航——路由服务监听认证信号变化后自动重定向。
    pub fn logout(&self) {
        LocalStorage::delete(STORAGE_TOKEN_KEY);
        LocalStorage::delete(STORAGE_USER_KEY);
        self.set_state.update(|state| {
            state.token = None;
            state.user = None;
        });
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().token.is_some())
    }

    /// 管理员权限信号（role >= 10，阈值定义在 models::ADMIN_ROLE）
    pub fn is_admin_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().user.as_ref().is_some_and(User::is_admin))
    }
}

/// 从 Context 获取会话上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化会话状态
///
/// 从 LocalStorage 恢复 token 与用户资料，随后后台调用 /auth/me 刷新。
/// token 与用户必须成对恢复，缺一则视为未登录。
pub fn init_auth(ctx: &AuthContext, api: ApiClient) {
    let token: Option<String> = LocalStorage::get(STORAGE_TOKEN_KEY).ok();
    let user: Option<User> = LocalStorage::get(STORAGE_USER_KEY).ok();
    let restored = token.is_some() && user.is_some();

    ctx.set_state.update(move |state| {
        if restored {
            state.token = token;
            state.user = user;
        }
        state.is_loading = false;
    });

    if restored {
        let ctx = *ctx;
        spawn_local(async move {
            // 过期 token 会在这里触发 401，由 API 客户端清空会话
            if let Ok(profile) = api.me().await {
                ctx.set_user(profile);
            }
        });
    }
}
