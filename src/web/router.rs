//! 路由服务模块（核心引擎）
//!
//! 封装 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现"监听 -> 守卫 -> 处理 -> 加载"的导航流程。
//! 认证/权限信号由外部注入，与会话模块解耦。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardOutcome, guard};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 读取当前地址栏中的查询参数
///
/// 用于 `/user?plan=3` 这类页面间传值，避免额外的全局状态。
pub fn query_param(key: &str) -> Option<String> {
    let search = web_sys::window().and_then(|w| w.location().search().ok())?;
    let search = search.strip_prefix('?')?;
    for pair in search.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key && !v.is_empty() {
            return urlencoding::decode(v).ok().map(|s| s.into_owned());
        }
    }
    None
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证/权限信号实现与会话系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号）
    is_authenticated: Signal<bool>,
    /// 管理员权限检查（注入的信号）
    is_admin: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, is_admin: Signal<bool>) -> Self {
        // 初始路由从 URL 解析，守卫在 setup_auth_redirect 的首轮 Effect 中执行
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            is_admin,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 守卫 -> 处理 -> 加载。
    /// path 可携带查询串（如 `/user?plan=3`），放行时原样写入地址栏。
    pub fn navigate(&self, path: &str) {
        let target_route = AppRoute::from_path(path);
        let outcome = guard(
            target_route,
            self.is_authenticated.get_untracked(),
            self.is_admin.get_untracked(),
        );

        match outcome {
            GuardOutcome::Render => {
                push_history_state(path);
                self.set_route.set(target_route);
            }
            GuardOutcome::RedirectLogin => {
                web_sys::console::log_1(&"[Router] Access denied. Redirecting to login.".into());
                push_history_state(AppRoute::Login.to_path());
                self.set_route.set(AppRoute::Login);
            }
            GuardOutcome::RedirectHome => {
                web_sys::console::log_1(&"[Router] Redirecting to home.".into());
                push_history_state(AppRoute::Home.to_path());
                self.set_route.set(AppRoute::Home);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_admin = self.is_admin;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let target_route = AppRoute::from_path(&path);

            // popstate 时也执行守卫；拒绝访问时用 replaceState 修正地址栏
            match guard(
                target_route,
                is_authenticated.get_untracked(),
                is_admin.get_untracked(),
            ) {
                GuardOutcome::Render => set_route.set(target_route),
                GuardOutcome::RedirectLogin => {
                    replace_history_state(AppRoute::Login.to_path());
                    set_route.set(AppRoute::Login);
                }
                GuardOutcome::RedirectHome => {
                    replace_history_state(AppRoute::Home.to_path());
                    set_route.set(AppRoute::Home);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证/权限状态变化时的自动重定向
    ///
    /// 登录后停留在登录页则跳回首页；注销（含 API 层 401 清空会话）后
    /// 停留在受保护页则跳转登录页。首轮执行即对初始路由做一次守卫。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_admin = self.is_admin;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let admin = is_admin.get();
            let route = current_route.get_untracked();

            match guard(route, is_auth, admin) {
                GuardOutcome::Render => {}
                GuardOutcome::RedirectLogin => {
                    web_sys::console::log_1(
                        &"[Router] Auth state changed: redirecting to login.".into(),
                    );
                    push_history_state(AppRoute::Login.to_path());
                    set_route.set(AppRoute::Login);
                }
                GuardOutcome::RedirectHome => {
                    web_sys::console::log_1(
                        &"[Router] Auth state changed: redirecting to home.".into(),
                    );
                    push_history_state(AppRoute::Home.to_path());
                    set_route.set(AppRoute::Home);
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, is_admin: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, is_admin);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 管理员权限信号
    is_admin: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, is_admin);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
