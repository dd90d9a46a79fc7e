//! Per-device settings and their metadata.

use serde::{Deserialize, Serialize};

/// Set to a truthy value to log every generated interrupt report.
pub const TRACE_REPORTS_ENV: &str = "DENSHA_MASCON_TRACE_REPORTS";

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enable" | "enabled"
    )
}

pub fn default_trace_reports() -> bool {
    std::env::var(TRACE_REPORTS_ENV)
        .ok()
        .is_some_and(|value| parse_bool_env(&value))
}

/// Runtime settings of one emulated controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MasconSettings {
    /// Host pass-through flag. Stored and reported; reports are always
    /// generated from the bound inputs.
    pub passthrough: bool,

    /// Log each interrupt report at debug level.
    pub trace_reports: bool,
}

impl Default for MasconSettings {
    fn default() -> Self {
        Self {
            passthrough: false,
            trace_reports: default_trace_reports(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Boolean,
}

/// Describes one user-facing setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingInfo {
    pub kind: SettingKind,
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub default_value: &'static str,
}

pub(crate) static MASCON_SETTINGS: [SettingInfo; 1] = [SettingInfo {
    kind: SettingKind::Boolean,
    name: "Passthrough",
    display_name: "Passthrough",
    description: "Passes through the unprocessed input report. Only use with a real controller.",
    default_value: "false",
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_env() {
        for value in ["1", "true", "YES", " on ", "Enabled"] {
            assert!(parse_bool_env(value), "{value}");
        }
        for value in ["", "0", "false", "off", "maybe"] {
            assert!(!parse_bool_env(value), "{value}");
        }
    }

    #[test]
    fn test_settings_deserialize_partial() -> Result<(), serde_json::Error> {
        let settings: MasconSettings = serde_json::from_str(r#"{"passthrough": true}"#)?;
        assert!(settings.passthrough);
        Ok(())
    }

    #[test]
    fn test_settings_reject_unknown_fields() {
        let result: Result<MasconSettings, _> = serde_json::from_str(r#"{"turbo": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_yaml() -> Result<(), serde_yaml::Error> {
        let settings: MasconSettings =
            serde_yaml::from_str("passthrough: false\ntrace_reports: true\n")?;
        assert_eq!(
            settings,
            MasconSettings {
                passthrough: false,
                trace_reports: true,
            }
        );
        Ok(())
    }

    #[test]
    fn test_setting_metadata() {
        assert_eq!(MASCON_SETTINGS.len(), 1);
        assert_eq!(MASCON_SETTINGS[0].name, "Passthrough");
        assert_eq!(MASCON_SETTINGS[0].kind, SettingKind::Boolean);
    }
}
