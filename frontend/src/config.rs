use serde::{Deserialize, Serialize};

use crate::validation::MAX_UPLOAD_BYTES;

/// Element id of the optional inline JSON block carrying overrides.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for every `/api/...` path. Empty means same origin.
    pub api_base: String,
    pub dashboard_path: String,
    pub currency: String,
    pub per_page: u32,
    pub redirect_delay_ms: u32,
    pub banner_timeout_ms: u32,
    pub theme_settle_ms: u32,
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base: String::new(),
            dashboard_path: "/dashboard".to_string(),
            currency: "RWF".to_string(),
            per_page: 10,
            redirect_delay_ms: 2_000,
            banner_timeout_ms: 5_000,
            theme_settle_ms: 300,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

/// Reads overrides from the host page, falling back to defaults.
pub fn load_config() -> AppConfig {
    let raw = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    match raw {
        Some(raw) if !raw.trim().is_empty() => match AppConfig::from_json(&raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, err);
                AppConfig::default()
            }
        },
        _ => AppConfig::default(),
    }
}
