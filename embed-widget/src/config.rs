//! Runtime configuration for the embeddable script.

/// Build-time configuration for backend endpoints.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Base URL for the preview-configuration API.
    pub api_base_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("CHATEMBED_API_URL")
                .unwrap_or("https://api.chatembed.dev/api")
                .to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Create a new runtime configuration instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the preview API base URL.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}
