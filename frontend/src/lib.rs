//! Briefify 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: 后端 REST 客户端
//! - `components`: UI 组件层

mod api;
mod auth;
pub mod config;
mod error;
mod gate;
pub mod logging;
mod components {
    pub mod document_detail;
    pub mod history;
    pub mod layout;
    pub mod login;
    pub mod register;
    pub mod upload;
}

use crate::api::AppApi;
use crate::auth::AuthContext;
use crate::components::document_detail::DocumentDetailPage;
use crate::components::history::HistoryPage;
use crate::components::layout::{Header, NotFound};
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::upload::UploadPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
    mod timer;

    pub use http::{FetchClient, HttpClient, UploadFile};
    pub use timer::Timeout;
}

use web::FetchClient;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::storage::default_store;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。守卫已在 `RouterOutlet` 中执行，
/// 这里只会收到允许渲染的路由。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Home | AppRoute::Upload => view! { <UploadPage /> }.into_any(),
        AppRoute::History => view! { <HistoryPage /> }.into_any(),
        AppRoute::Document(id) => view! { <DocumentDetailPage id=id /> }.into_any(),
        AppRoute::NotFound => view! { <NotFound /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();

    // 1. 从 LocalStorage 恢复会话并注入 Context
    let auth_ctx = AuthContext::new(default_store());
    provide_context(auth_ctx);

    // 2. API 客户端
    provide_context(AppApi::new(config.api_base_url, FetchClient));

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <Header />
            <main class="app-main">
                <RouterOutlet matcher=route_matcher />
            </main>
        </Router>
    }
}
