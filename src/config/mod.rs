use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub prism_host: String,
    pub prism_username: String,
    pub prism_password: String,
    pub dashboard_username: String,
    pub dashboard_password: String,
    pub listen_addr: String,
    pub frontend_dir: String,
    pub console_base_url: String,
    pub api_timeout_secs: u64,
    pub cluster_cache_ttl_secs: u64,
    pub session_lifetime_hours: u64,
    pub login_rate_limit_per_minute: u32,
    pub api_rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            prism_host: get_env("PRISM_HOST", ""),
            prism_username: get_env("PRISM_USERNAME", ""),
            prism_password: get_env("PRISM_PASSWORD", ""),
            dashboard_username: get_env("DASHBOARD_USERNAME", ""),
            dashboard_password: get_env("DASHBOARD_PASSWORD", ""),
            listen_addr: get_env("LISTEN_ADDR", "127.0.0.1:5000"),
            frontend_dir: get_env("FRONTEND_DIR", "frontend"),
            console_base_url: get_env("CONSOLE_BASE_URL", "https://ntnxlab.ddns.net:8443"),
            api_timeout_secs: get_env("API_TIMEOUT", "30").parse().unwrap_or(30),
            cluster_cache_ttl_secs: get_env("CLUSTER_CACHE_TTL", "300").parse().unwrap_or(300),
            session_lifetime_hours: get_env("SESSION_TIMEOUT_HOURS", "12").parse().unwrap_or(12),
            login_rate_limit_per_minute: get_env("LOGIN_RATE_LIMIT", "5").parse().unwrap_or(5),
            api_rate_limit_per_minute: get_env("API_RATE_LIMIT", "60").parse().unwrap_or(60),
        }
    }

    /// Validate required configuration. The server refuses to start without
    /// upstream and dashboard credentials.
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("PRISM_HOST", &self.prism_host),
            ("PRISM_USERNAME", &self.prism_username),
            ("PRISM_PASSWORD", &self.prism_password),
            ("DASHBOARD_USERNAME", &self.dashboard_username),
            ("DASHBOARD_PASSWORD", &self.dashboard_password),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        Ok(())
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
