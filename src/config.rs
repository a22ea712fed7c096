use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Prefix for persisted storage keys (`<app_name>.auth`, `<app_name>.ui`)
    pub app_name: String,
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub timing: TimingConfig,
    pub list_config: ListConfig,
    pub placeholder_image_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "catalog-admin".to_string(),
            backend_url_development: "http://localhost:4000/api".to_string(),
            backend_url_production: "https://api.example.com/api".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            timing: TimingConfig::default(),
            list_config: ListConfig::default(),
            placeholder_image_url: "/assets/placeholder.png".to_string(),
        }
    }
}

/// Delays used by the UI coordination layer, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub search_debounce_ms: u32,
    pub guard_settle_ms: u32,
    pub login_redirect_delay_ms: u32,
    pub toast_duration_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            guard_settle_ms: 100,
            login_redirect_delay_ms: 300,
            toast_duration_ms: 3500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_page_limit: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 20,
        }
    }
}

impl AppConfig {
    /// Build the configuration from compile-time environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: option_env!("APP_NAME")
                .map(str::to_string)
                .unwrap_or(defaults.app_name),
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_development),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("ENVIRONMENT")
                .map(str::to_string)
                .unwrap_or(defaults.environment),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            timing: TimingConfig {
                search_debounce_ms: option_env!("SEARCH_DEBOUNCE_MS")
                    .unwrap_or("500").parse().unwrap_or(500),
                guard_settle_ms: option_env!("GUARD_SETTLE_MS")
                    .unwrap_or("100").parse().unwrap_or(100),
                login_redirect_delay_ms: option_env!("LOGIN_REDIRECT_DELAY_MS")
                    .unwrap_or("300").parse().unwrap_or(300),
                toast_duration_ms: option_env!("TOAST_DURATION_MS")
                    .unwrap_or("3500").parse().unwrap_or(3500),
            },
            list_config: ListConfig {
                default_page_limit: option_env!("DEFAULT_PAGE_LIMIT")
                    .unwrap_or("20").parse::<u32>().ok().filter(|limit| *limit > 0).unwrap_or(20),
            },
            placeholder_image_url: option_env!("PLACEHOLDER_IMAGE_URL")
                .map(str::to_string)
                .unwrap_or(defaults.placeholder_image_url),
        }
    }

    /// Backend URL for the current environment
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Key of the tab-scoped session entry
    pub fn auth_storage_key(&self) -> String {
        format!("{}.auth", self.app_name)
    }

    /// Key of the durable UI preference entry
    pub fn ui_storage_key(&self) -> String {
        format!("{}.ui", self.app_name)
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_namespaced_by_app_name() {
        let config = AppConfig {
            app_name: "shopfront".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.auth_storage_key(), "shopfront.auth");
        assert_eq!(config.ui_storage_key(), "shopfront.ui");
    }

    #[test]
    fn backend_url_follows_environment() {
        let mut config = AppConfig::default();
        assert_eq!(config.backend_url(), "http://localhost:4000/api");

        config.environment = "production".to_string();
        assert_eq!(config.backend_url(), "https://api.example.com/api");
    }
}
