//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、路由属性以及守卫判定。

use briefify_shared::protocol::{decode_path_segment, encode_path_segment};
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 根路径，转到上传页
    #[default]
    Home,
    Login,
    Register,
    /// 上传页面 (需要认证)
    Upload,
    /// 历史列表 (需要认证)
    History,
    /// 文档详情 (需要认证)
    Document(String),
    /// 页面未找到
    NotFound,
}

/// 守卫判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 直接渲染该路由
    Render(AppRoute),
    /// 重定向到该路由（使用 replaceState）
    Redirect(AppRoute),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略末尾斜杠；`/document/` 后必须跟一个非空的单段 id，
    /// id 会做百分号解码，解码失败视为未找到。
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/upload" => Self::Upload,
            "/history" => Self::History,
            _ => match trimmed.strip_prefix("/document/") {
                Some(id) if !id.is_empty() && !id.contains('/') => decode_path_segment(id)
                    .map(Self::Document)
                    .unwrap_or(Self::NotFound),
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Upload => "/upload".to_string(),
            Self::History => "/history".to_string(),
            Self::Document(id) => format!("/document/{}", encode_path_segment(id)),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Upload | Self::History | Self::Document(_))
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Upload
    }

    /// 在给定认证状态下解析该路由
    ///
    /// 每次渲染和每次认证状态变化都会重新调用，不缓存结果。
    pub fn resolve(self, is_authenticated: bool) -> Resolution {
        if self == Self::Home {
            return match Self::auth_success_redirect().resolve(is_authenticated) {
                Resolution::Render(target) | Resolution::Redirect(target) => {
                    Resolution::Redirect(target)
                }
            };
        }

        if self.requires_auth() && !is_authenticated {
            return Resolution::Redirect(Self::auth_failure_redirect());
        }

        if self.should_redirect_when_authenticated() && is_authenticated {
            return Resolution::Redirect(Self::auth_success_redirect());
        }

        Resolution::Render(self)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register/"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/upload"), AppRoute::Upload);
        assert_eq!(AppRoute::from_path("/history"), AppRoute::History);
        assert_eq!(
            AppRoute::from_path("/document/65f0c"),
            AppRoute::Document("65f0c".into())
        );
        assert_eq!(AppRoute::from_path("/document/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/document/a/b"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_roundtrip() {
        for route in [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Upload,
            AppRoute::History,
            AppRoute::Document("abc".into()),
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_guard_redirects_anonymous_from_protected() {
        for route in [
            AppRoute::Upload,
            AppRoute::History,
            AppRoute::Document("x".into()),
        ] {
            assert_eq!(route.resolve(false), Resolution::Redirect(AppRoute::Login));
        }
    }

    #[test]
    fn test_guard_renders_protected_when_authenticated() {
        assert_eq!(
            AppRoute::History.resolve(true),
            Resolution::Render(AppRoute::History)
        );
        assert_eq!(
            AppRoute::Document("x".into()).resolve(true),
            Resolution::Render(AppRoute::Document("x".into()))
        );
    }

    #[test]
    fn test_public_routes() {
        assert_eq!(AppRoute::Login.resolve(false), Resolution::Render(AppRoute::Login));
        assert_eq!(
            AppRoute::Register.resolve(false),
            Resolution::Render(AppRoute::Register)
        );
        assert_eq!(
            AppRoute::NotFound.resolve(false),
            Resolution::Render(AppRoute::NotFound)
        );
        assert_eq!(AppRoute::Login.resolve(true), Resolution::Redirect(AppRoute::Upload));
    }

    #[test]
    fn test_home_follows_upload() {
        assert_eq!(AppRoute::Home.resolve(true), Resolution::Redirect(AppRoute::Upload));
        assert_eq!(AppRoute::Home.resolve(false), Resolution::Redirect(AppRoute::Login));
    }

    #[test]
    fn test_document_id_is_percent_decoded() {
        assert_eq!(
            AppRoute::from_path("/document/a%20b"),
            AppRoute::Document("a b".into())
        );
        assert_eq!(
            AppRoute::from_path("/document/a%2Fb"),
            AppRoute::Document("a/b".into())
        );
        assert_eq!(AppRoute::from_path("/document/a%2"), AppRoute::NotFound);
    }

    #[test]
    fn test_document_id_with_reserved_characters_roundtrips() {
        for id in ["a b", "50%off", "x/y"] {
            let route = AppRoute::Document(id.into());
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
        assert_eq!(AppRoute::Document("a b".into()).to_path(), "/document/a%20b");
    }
}
