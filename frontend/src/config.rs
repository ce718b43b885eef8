//! 构建期配置
//!
//! 前端没有运行时环境变量，配置在编译时通过 `option_env!` 注入，
//! 读不到就使用默认值。

use log::LevelFilter;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// 应用配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 后端 API 根地址（不含末尾斜杠）
    pub api_base_url: String,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// 读取编译时注入的 `BRIEFIFY_API_URL` / `BRIEFIFY_LOG_LEVEL`
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("BRIEFIFY_API_URL"),
            option_env!("BRIEFIFY_LOG_LEVEL"),
        )
    }

    fn from_values(api_base_url: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .and_then(|level| level.trim().parse::<LevelFilter>().ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            api_base_url,
            log_level,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = AppConfig::from_values(Some("https://api.briefify.ai/"), Some("debug"));
        assert_eq!(config.api_base_url, "https://api.briefify.ai");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_values(Some("   "), Some("chatty"));
        assert_eq!(config, AppConfig::default());
    }
}
