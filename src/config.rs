//! User settings, stored as JSON.
//!
//! The layout matches the extension storage the settings come from:
//!
//! ```json
//! {
//!   "settings": {
//!     "downloadPath": "",
//!     "autoRename": true,
//!     "conflictAction": "uniquify",
//!     "showNotifications": true,
//!     "exclusionDomains": "mail.example.com\nbank.example"
//!   },
//!   "enabled": true
//! }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Pick a free name (`name (1).pdf`)
    #[default]
    Uniquify,
    /// Replace the existing file
    Overwrite,
    /// Ask the user; non-interactive savers refuse instead
    Prompt,
}

/// User-facing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Sub-directory for saved files (empty = download root)
    pub download_path: String,

    /// Name assembled PDFs after the page title
    pub auto_rename: bool,

    /// Existing-file policy
    pub conflict_action: ConflictAction,

    /// Emit notifications after downloads
    pub show_notifications: bool,

    /// Newline-separated host substrings excluded from automatic runs
    pub exclusion_domains: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_path: String::new(),
            auto_rename: true,
            conflict_action: ConflictAction::Uniquify,
            show_notifications: true,
            exclusion_domains: String::new(),
        }
    }
}

impl Settings {
    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusion list.
    pub fn with_exclusions(mut self, domains: impl Into<String>) -> Self {
        self.exclusion_domains = domains.into();
        self
    }

    /// Enable or disable title-based naming.
    pub fn with_auto_rename(mut self, auto_rename: bool) -> Self {
        self.auto_rename = auto_rename;
        self
    }

    /// Set the download sub-directory.
    pub fn with_download_path(mut self, path: impl Into<String>) -> Self {
        self.download_path = path.into();
        self
    }

    /// Set the conflict policy.
    pub fn with_conflict_action(mut self, action: ConflictAction) -> Self {
        self.conflict_action = action;
        self
    }

    /// Enable or disable notifications.
    pub fn with_notifications(mut self, show: bool) -> Self {
        self.show_notifications = show;
        self
    }
}

/// Whole persisted state: settings plus the global on/off switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    /// Settings, absent before first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    /// Global switch, absent means enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl StoredState {
    /// Parse stored JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Settings, or the install defaults when none were saved.
    pub fn settings_or_default(&self) -> Settings {
        self.settings.clone().unwrap_or_default()
    }

    /// Whether automatic runs are enabled (default true).
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.auto_rename);
        assert!(settings.show_notifications);
        assert_eq!(settings.conflict_action, ConflictAction::Uniquify);
        assert!(settings.exclusion_domains.is_empty());
    }

    #[test]
    fn test_parse_stored_layout() {
        let json = r#"{
            "settings": {
                "downloadPath": "papers",
                "autoRename": false,
                "conflictAction": "overwrite",
                "showNotifications": false,
                "exclusionDomains": "google.com\nexample.org"
            },
            "enabled": false
        }"#;
        let state = StoredState::from_json(json).unwrap();
        let settings = state.settings_or_default();
        assert_eq!(settings.download_path, "papers");
        assert!(!settings.auto_rename);
        assert_eq!(settings.conflict_action, ConflictAction::Overwrite);
        assert!(!state.is_enabled());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let state =
            StoredState::from_json(r#"{"settings": {"exclusionDomains": "a.com"}}"#).unwrap();
        let settings = state.settings_or_default();
        assert_eq!(settings.exclusion_domains, "a.com");
        assert!(settings.auto_rename);
        assert!(state.is_enabled());
    }

    #[test]
    fn test_empty_state() {
        let state = StoredState::from_json("{}").unwrap();
        assert_eq!(state.settings_or_default(), Settings::default());
        assert!(state.is_enabled());
    }

    #[test]
    fn test_round_trip() {
        let state = StoredState {
            settings: Some(Settings::new().with_exclusions("x.com").with_notifications(false)),
            enabled: Some(true),
        };
        let json = state.to_json().unwrap();
        assert!(json.contains("\"exclusionDomains\": \"x.com\""));
        assert_eq!(StoredState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_unknown_conflict_action_is_error() {
        assert!(StoredState::from_json(r#"{"settings": {"conflictAction": "ask"}}"#).is_err());
    }
}
