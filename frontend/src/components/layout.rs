use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 顶部导航栏
#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();

    view! {
        <header class="app-header">
            <Link to="/" class="app-title">"Briefify"</Link>
            <Show when=move || auth.is_authenticated()>
                <nav class="app-nav">
                    <Link to="/upload" class="nav-link">"Upload"</Link>
                    <Link to="/history" class="nav-link">"History"</Link>
                    <LogoutButton />
                </nav>
            </Show>
        </header>
    }
}

/// 退出登录：清空会话并回到登录页
#[component]
pub fn LogoutButton() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        auth.logout();
        router.redirect(AppRoute::Login);
    };

    view! {
        <button class="logout-button" on:click=on_logout>"Logout"</button>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="centered-content">
            <div class="not-found">
                <h1 class="not-found-code">"404"</h1>
                <p>"Page not found"</p>
                <Link to="/">"Back to Briefify"</Link>
            </div>
        </div>
    }
}
