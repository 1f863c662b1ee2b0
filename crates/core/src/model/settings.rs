use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//
// ─── THEME ────────────────────────────────────────────────────────────────────
//

/// Persisted colour scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::Auto => "auto",
        }
    }

    /// Resolve to a concrete dark/light decision; `Auto` follows the system.
    #[must_use]
    pub fn resolve_dark(self, system_is_dark: bool) -> bool {
        match self {
            ThemePreference::Light => false,
            ThemePreference::Dark => true,
            ThemePreference::Auto => system_is_dark,
        }
    }

    /// The settings screen only exposes an on/off switch.
    #[must_use]
    pub fn from_dark_toggle(enabled: bool) -> Self {
        if enabled {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" | "system" => Ok(Self::Auto),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

//
// ─── SETTINGS ENTRIES ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingToggle {
    DarkMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingAction {
    About,
    PrivacyPolicy,
    Terms,
    ClearProgress,
}

/// One row on the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingEntry {
    Toggle {
        id: SettingToggle,
        label: &'static str,
        icon: &'static str,
        value: bool,
    },
    Action {
        id: SettingAction,
        label: &'static str,
        icon: &'static str,
        destructive: bool,
    },
}

impl SettingEntry {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SettingEntry::Toggle { label, .. } | SettingEntry::Action { label, .. } => label,
        }
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            SettingEntry::Toggle { icon, .. } | SettingEntry::Action { icon, .. } => icon,
        }
    }

    #[must_use]
    pub fn is_destructive(&self) -> bool {
        matches!(self, SettingEntry::Action { destructive: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSection {
    pub title: &'static str,
    pub entries: Vec<SettingEntry>,
}

/// Build the settings screen layout for the current dark-mode state.
#[must_use]
pub fn settings_sections(dark_mode: bool) -> Vec<SettingsSection> {
    vec![
        SettingsSection {
            title: "Display",
            entries: vec![SettingEntry::Toggle {
                id: SettingToggle::DarkMode,
                label: "Dark Mode",
                icon: "moon",
                value: dark_mode,
            }],
        },
        SettingsSection {
            title: "About",
            entries: vec![
                SettingEntry::Action {
                    id: SettingAction::About,
                    label: "About QuizApp",
                    icon: "information-circle",
                    destructive: false,
                },
                SettingEntry::Action {
                    id: SettingAction::PrivacyPolicy,
                    label: "Privacy Policy",
                    icon: "document-text",
                    destructive: false,
                },
                SettingEntry::Action {
                    id: SettingAction::Terms,
                    label: "Terms & Conditions",
                    icon: "shield-checkmark",
                    destructive: false,
                },
            ],
        },
        SettingsSection {
            title: "Data",
            entries: vec![SettingEntry::Action {
                id: SettingAction::ClearProgress,
                label: "Clear Quiz Progress",
                icon: "trash",
                destructive: true,
            }],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follows_system() {
        assert!(ThemePreference::Auto.resolve_dark(true));
        assert!(!ThemePreference::Auto.resolve_dark(false));
        assert!(ThemePreference::Dark.resolve_dark(false));
        assert_eq!(ThemePreference::default(), ThemePreference::Auto);
    }

    #[test]
    fn theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemePreference::Dark).unwrap(), "\"dark\"");
        assert_eq!("System".parse::<ThemePreference>().unwrap(), ThemePreference::Auto);
    }

    #[test]
    fn only_clear_progress_is_destructive() {
        let sections = settings_sections(true);
        let destructive: Vec<_> = sections
            .iter()
            .flat_map(|s| s.entries.iter())
            .filter(|e| e.is_destructive())
            .map(SettingEntry::label)
            .collect();
        assert_eq!(destructive, vec!["Clear Quiz Progress"]);
        assert!(matches!(
            sections[0].entries[0],
            SettingEntry::Toggle { value: true, .. }
        ));
    }
}
