//! 认证模块
//!
//! 管理用户会话（凭据令牌），与路由系统解耦。
//! - `Session`: 纯状态 + 持久化，不依赖响应式系统，便于测试
//! - `AuthContext`: `Session` 的响应式包装，通过 Context 注入组件
//!
//! 路由服务通过注入的认证信号来检查认证状态。

use crate::web::storage::SharedStore;
use leptos::prelude::*;

/// 令牌在 LocalStorage 中的键
pub const TOKEN_STORAGE_KEY: &str = "jwtToken";

/// 会话状态
///
/// 只有两种状态：匿名 / 已认证。是否认证完全由令牌是否存在推导，
/// 不单独存储。每次变更都会同步写入（或删除）持久化存储。
pub struct Session {
    store: SharedStore,
    token: Option<String>,
}

impl Session {
    /// 从持久化存储恢复会话
    ///
    /// 不在客户端校验令牌是否过期，失效的令牌会在后续 API 调用失败时暴露。
    pub fn restore(store: SharedStore) -> Self {
        let token = store.get(TOKEN_STORAGE_KEY).filter(|t| !t.is_empty());
        if token.is_some() {
            log::debug!("[Auth] Restored persisted session");
        }
        Self { store, token }
    }

    /// 登录：保存令牌并持久化
    ///
    /// 空令牌等同于注销。
    pub fn login(&mut self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            self.logout();
            return;
        }
        if !self.store.set(TOKEN_STORAGE_KEY, &token) {
            log::warn!("[Auth] Failed to persist token, session is memory-only");
        }
        self.token = Some(token);
    }

    /// 注销：清除令牌并删除持久化副本
    pub fn logout(&mut self) {
        self.token = None;
        if !self.store.delete(TOKEN_STORAGE_KEY) {
            log::warn!("[Auth] Failed to remove persisted token");
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// 认证上下文
///
/// 包含会话信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<Session>,
}

impl AuthContext {
    /// 从给定存储恢复会话并创建上下文
    pub fn new(store: SharedStore) -> Self {
        Self {
            session: RwSignal::new(Session::restore(store)),
        }
    }

    /// 当前令牌（响应式读取）
    pub fn token(&self) -> Option<String> {
        self.session.with(|s| s.token().map(str::to_string))
    }

    /// 当前令牌（不追踪依赖）
    pub fn token_untracked(&self) -> Option<String> {
        self.session
            .with_untracked(|s| s.token().map(str::to_string))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.is_authenticated()))
    }

    pub fn login(&self, token: String) {
        self.session.update(|s| s.login(token));
        log::info!("[Auth] Logged in");
    }

    /// 注销并清除状态
    ///
    /// 导航由路由服务的认证状态监听自动处理。
    pub fn logout(&self) {
        self.session.update(|s| s.logout());
        log::info!("[Auth] Logged out");
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::{KeyValueStore, MemoryStorage};
    use std::sync::Arc;

    fn session_with(store: &MemoryStorage) -> Session {
        Session::restore(Arc::new(store.clone()))
    }

    #[test]
    fn test_login_then_logout() {
        let store = MemoryStorage::new();
        let mut session = session_with(&store);
        assert!(!session.is_authenticated());

        for token in ["a", "eyJhbGciOiJIUzI1NiJ9.payload.sig", "with spaces"] {
            session.login(token);
            assert!(session.is_authenticated());
            assert_eq!(session.token(), Some(token));
            assert_eq!(store.get(TOKEN_STORAGE_KEY).as_deref(), Some(token));

            session.logout();
            assert!(!session.is_authenticated());
            assert_eq!(session.token(), None);
            assert_eq!(store.get(TOKEN_STORAGE_KEY), None);
        }
    }

    #[test]
    fn test_session_survives_restart() {
        let store = MemoryStorage::new();
        session_with(&store).login("persisted");

        let restarted = session_with(&store);
        assert!(restarted.is_authenticated());
        assert_eq!(restarted.token(), Some("persisted"));
    }

    #[test]
    fn test_fresh_store_starts_anonymous() {
        let session = session_with(&MemoryStorage::new());
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let store = MemoryStorage::new();
        store.set(TOKEN_STORAGE_KEY, "");
        assert!(!session_with(&store).is_authenticated());

        let mut session = session_with(&store);
        session.login("");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_logout_after_restart_clears_storage() {
        let store = MemoryStorage::new();
        session_with(&store).login("t");

        let mut restarted = session_with(&store);
        restarted.logout();
        assert!(!session_with(&store).is_authenticated());
    }

    #[test]
    fn test_context_tracks_session() {
        let ctx = AuthContext::new(Arc::new(MemoryStorage::new()));
        let is_auth = ctx.is_authenticated_signal();
        assert!(!is_auth.get_untracked());

        ctx.login("ctx-token".into());
        assert!(is_auth.get_untracked());
        assert_eq!(ctx.token_untracked().as_deref(), Some("ctx-token"));

        ctx.logout();
        assert!(!is_auth.get_untracked());
        assert_eq!(ctx.token_untracked(), None);
    }
}
