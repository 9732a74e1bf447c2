pub const DEFAULT_DATA_API_URL: &str = "https://analyticsdata.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path to the service-account key file, read from
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    pub credentials_path: String,
    /// Base URL of the Analytics Data API. Overridable so tests and
    /// proxies can point the connector elsewhere.
    pub data_api_url: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: std::env::var("GA4_CONNECTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("GA4_CONNECTOR_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            credentials_path: std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    "GOOGLE_APPLICATION_CREDENTIALS must point to a service account key file"
                        .to_string()
                })?,
            data_api_url: std::env::var("GA4_DATA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_DATA_API_URL.to_string()),
            cors_origins: std::env::var("GA4_CONNECTOR_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes tests that mutate process-wide env vars.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CREDENTIALS_ERROR: &str =
        "GOOGLE_APPLICATION_CREDENTIALS must point to a service account key file";

    fn clear_env() {
        for name in [
            "GA4_CONNECTOR_HOST",
            "GA4_CONNECTOR_PORT",
            "GOOGLE_APPLICATION_CREDENTIALS",
            "GA4_DATA_API_URL",
            "GA4_CONNECTOR_CORS_ORIGINS",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn missing_credentials_path_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        assert_eq!(Config::from_env().err().as_deref(), Some(CREDENTIALS_ERROR));
    }

    #[test]
    fn blank_credentials_path_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", "   ");
        assert_eq!(Config::from_env().err().as_deref(), Some(CREDENTIALS_ERROR));
        clear_env();
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", "/etc/ga4/key.json");
        std::env::set_var("GA4_CONNECTOR_CORS_ORIGINS", "https://a.example, ,https://b.example");
        let config = Config::from_env().expect("config");
        clear_env();

        assert_eq!(config.credentials_path, "/etc/ga4/key.json");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.data_api_url, DEFAULT_DATA_API_URL);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}
