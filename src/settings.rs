//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web. The leaderboard credential is
//! configuration, never part of the build and never persisted: on the web
//! it comes from the page's meta tag on every load, natively from the
//! environment or the command line.

use serde::{Deserialize, Serialize};

/// Environment variable holding the leaderboard server URL
pub const SERVER_ENV: &str = "CASH_RUNNER_SERVER";
/// Environment variable holding the leaderboard API key
pub const API_KEY_ENV: &str = "CASH_RUNNER_API_KEY";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Leaderboard ===
    /// Base URL of the leaderboard service (empty = page origin on the web,
    /// disabled natively)
    pub server_url: String,
    /// Credential sent as `X-API-Key`. Not written to storage.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Last name entered at game over
    pub player_name: String,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (coins don't spin)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            api_key: None,
            player_name: String::new(),
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cash_runner_settings";

    /// Whether a leaderboard server is configured
    pub fn has_server(&self) -> bool {
        !self.server_url.trim().is_empty()
    }

    /// Remember the name typed at game over
    pub fn remember_name(&mut self, name: &str) {
        self.player_name = name.trim().to_string();
    }

    /// Overlay values from a variable lookup (the process environment in
    /// [`Settings::from_env`])
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SERVER_ENV).filter(|v| !v.trim().is_empty()) {
            self.server_url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env(|name| std::env::var(name).ok());
        settings
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: environment only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_env()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_have_no_credential() {
        let settings = Settings::default();
        assert!(settings.api_key.is_none());
        assert!(!settings.has_server());
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            (SERVER_ENV, "https://scores.example.com"),
            (API_KEY_ENV, "k-123"),
        ]
        .into_iter()
        .collect();
        let mut settings = Settings::default();
        settings.apply_env(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(settings.server_url, "https://scores.example.com");
        assert_eq!(settings.api_key.as_deref(), Some("k-123"));
        assert!(settings.has_server());
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut settings = Settings {
            server_url: "http://localhost:3000".into(),
            ..Settings::default()
        };
        settings.apply_env(|_| Some("  ".to_string()));
        assert_eq!(settings.server_url, "http://localhost:3000");
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"player_name":"ada"}"#).unwrap();
        assert_eq!(settings.player_name, "ada");
        assert!(!settings.reduced_motion);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_credential_never_stored() {
        let settings = Settings {
            api_key: Some("k-123".into()),
            player_name: "ada".into(),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("k-123"));

        // A key left in storage by an older build is ignored
        let stale: Settings =
            serde_json::from_str(r#"{"api_key":"k-old","player_name":"ada"}"#).unwrap();
        assert!(stale.api_key.is_none());
        assert_eq!(stale.player_name, "ada");
    }

    #[test]
    fn test_remember_name_trims() {
        let mut settings = Settings::default();
        settings.remember_name("  ada  ");
        assert_eq!(settings.player_name, "ada");
    }
}
