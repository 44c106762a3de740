#[derive(Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_password: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub client_max_retries: u32,
    pub client_backoff_base_ms: u64,
    pub browse_max_retries: u32,
    pub browse_retry_delay_ms: u64,
    pub page_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("api_password", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("client_max_retries", &self.client_max_retries)
            .field("client_backoff_base_ms", &self.client_backoff_base_ms)
            .field("browse_max_retries", &self.browse_max_retries)
            .field("browse_retry_delay_ms", &self.browse_retry_delay_ms)
            .field("page_size", &self.page_size)
            .finish()
    }
}
