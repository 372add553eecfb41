// SPDX-License-Identifier: MPL-2.0

//! Persisted Toggle Settings
//!
//! Each applet instance keeps its settings in its own rc file:
//!
//! ```text
//! ~/.config/cosmic-toggle-applet/<instance>.rc
//! ```
//!
//! # File Format
//!
//! A flat `key=value` file, compatible with the rc files written by the
//! older panel plugin:
//!
//! ```text
//! active_icon=starred
//! inactive_icon=non-starred
//! primary_command=notify-send 'primary command executed'
//! secondary_command=notify-send 'secondary command executed'
//! active=true
//! ```
//!
//! - Lines starting with `#` are comments, `[Name]` lines open a group.
//! - Only the ungrouped section carries toggle settings; other groups and
//!   unknown keys are kept as-is when the file is rewritten.
//! - Values escape `\\`, `\n`, `\t`, `\r`, form feed (`\f`) and edge
//!   spaces (`\s`). Only ASCII whitespace around keys and values is trimmed.
//!
//! # Failure Policy
//!
//! Loading never fails outward. A missing file, a missing key or an
//! unreadable file fall back to defaults; [`LoadSource`] records which case
//! happened. Saving logs and skips when the file cannot be written.

use crate::config::{
    ToggleSettings, DEFAULT_ACTIVE, DEFAULT_ACTIVE_ICON, DEFAULT_INACTIVE_ICON,
    DEFAULT_PRIMARY_COMMAND, DEFAULT_SECONDARY_COMMAND,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the user config dir holding one rc file per instance.
const APP_DIR: &str = "cosmic-toggle-applet";

pub const KEY_ACTIVE_ICON: &str = "active_icon";
pub const KEY_INACTIVE_ICON: &str = "inactive_icon";
pub const KEY_PRIMARY_COMMAND: &str = "primary_command";
pub const KEY_SECONDARY_COMMAND: &str = "secondary_command";
pub const KEY_ACTIVE: &str = "active";

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while locating, reading or writing a settings file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The instance id cannot be used as a file name.
    #[error("invalid instance id {0:?}")]
    InvalidInstance(String),

    /// The platform reports no user configuration directory.
    #[error("no user configuration directory available")]
    NoConfigDir,

    /// Reading or writing the rc file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Load Results
// ============================================================================

/// Where the settings returned by [`SettingsStore::try_load`] came from.
#[derive(Debug)]
pub enum LoadSource {
    /// Read from an existing file (missing keys were defaulted).
    Stored,
    /// No file exists yet; full defaults.
    Missing,
    /// The file exists but could not be read; full defaults.
    Unreadable(StoreError),
}

/// Settings together with the way they were obtained.
#[derive(Debug)]
pub struct Loaded {
    pub settings: ToggleSettings,
    pub source: LoadSource,
}

// ============================================================================
// Settings Store
// ============================================================================

/// Handle to the rc file of a single applet instance.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Resolve the settings file of `instance_id` in the user config dir.
    pub fn for_instance(instance_id: &str) -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Self::in_dir(&dir.join(APP_DIR), instance_id)
    }

    /// Resolve the settings file of `instance_id` inside `dir`.
    pub fn in_dir(dir: &Path, instance_id: &str) -> Result<Self, StoreError> {
        validate_instance_id(instance_id)?;
        Ok(Self::at(dir.join(format!("{instance_id}.rc"))))
    }

    /// Use an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load settings and report whether defaults were substituted.
    pub fn try_load(&self) -> Loaded {
        match fs::read_to_string(&self.path) {
            Ok(content) => Loaded {
                settings: settings_from_rc(&RcFile::parse(&content)),
                source: LoadSource::Stored,
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Loaded {
                settings: ToggleSettings::default(),
                source: LoadSource::Missing,
            },
            Err(source) => Loaded {
                settings: ToggleSettings::default(),
                source: LoadSource::Unreadable(StoreError::Io {
                    path: self.path.clone(),
                    source,
                }),
            },
        }
    }

    /// Load settings, falling back to defaults on any failure.
    pub fn load(&self) -> ToggleSettings {
        let loaded = self.try_load();
        match &loaded.source {
            LoadSource::Stored => {
                log::debug!("Loaded toggle settings from {}", self.path.display());
            }
            LoadSource::Missing => {
                log::debug!(
                    "No settings file at {}, applying default settings",
                    self.path.display()
                );
            }
            LoadSource::Unreadable(err) => {
                log::debug!("Applying default settings: {err}");
            }
        }
        loaded.settings
    }

    /// Write all five fields, keeping any other content of the file.
    pub fn try_save(&self, settings: &ToggleSettings) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        // An unreadable previous file is replaced rather than merged.
        let mut rc = fs::read_to_string(&self.path)
            .map(|content| RcFile::parse(&content))
            .unwrap_or_default();

        rc.set(KEY_ACTIVE_ICON, &settings.active_icon);
        rc.set(KEY_INACTIVE_ICON, &settings.inactive_icon);
        rc.set(KEY_PRIMARY_COMMAND, &settings.primary_command);
        rc.set(KEY_SECONDARY_COMMAND, &settings.secondary_command);
        rc.set(KEY_ACTIVE, if settings.active { "true" } else { "false" });

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, rc.render()).map_err(io_err)
    }

    /// Save settings; failures are logged and the save is skipped.
    pub fn save(&self, settings: &ToggleSettings) {
        if let Err(err) = self.try_save(settings) {
            log::debug!("Failed to save toggle settings: {err}");
        }
    }
}

/// Instance ids become file names, so only a conservative charset is allowed.
fn validate_instance_id(id: &str) -> Result<(), StoreError> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if id.is_empty() || id == "." || id == ".." || !valid_chars {
        return Err(StoreError::InvalidInstance(id.to_string()));
    }
    Ok(())
}

fn settings_from_rc(rc: &RcFile) -> ToggleSettings {
    let string = |key, default: &str| rc.get(key).unwrap_or(default).to_string();

    ToggleSettings {
        active_icon: string(KEY_ACTIVE_ICON, DEFAULT_ACTIVE_ICON),
        inactive_icon: string(KEY_INACTIVE_ICON, DEFAULT_INACTIVE_ICON),
        primary_command: string(KEY_PRIMARY_COMMAND, DEFAULT_PRIMARY_COMMAND),
        secondary_command: string(KEY_SECONDARY_COMMAND, DEFAULT_SECONDARY_COMMAND),
        active: rc.get(KEY_ACTIVE).map_or(DEFAULT_ACTIVE, parse_bool),
    }
}

/// Present but unrecognised values read as `false`, like the legacy reader.
fn parse_bool(value: &str) -> bool {
    ["true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

// ============================================================================
// Rc File Codec
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
struct RcSection {
    /// `None` for the entries before the first group header
    name: Option<String>,
    entries: Vec<(String, String)>,
}

/// Ordered in-memory form of an rc file.
#[derive(Debug, Clone, PartialEq)]
struct RcFile {
    sections: Vec<RcSection>,
}

impl Default for RcFile {
    fn default() -> Self {
        Self {
            sections: vec![RcSection::default()],
        }
    }
}

impl RcFile {
    fn parse(content: &str) -> Self {
        let mut rc = Self::default();

        // Only ASCII whitespace is insignificant; other spaces belong to values.
        for line in content.lines() {
            let line = line.trim_ascii();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                rc.sections.push(RcSection {
                    name: Some(name.trim_ascii().to_string()),
                    entries: Vec::new(),
                });
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim_ascii();
            if key.is_empty() {
                continue;
            }

            // `sections` always holds at least the default section.
            if let Some(section) = rc.sections.last_mut() {
                upsert(&mut section.entries, key, unescape(value.trim_ascii()));
            }
        }

        rc
    }

    /// Value of `key` in the ungrouped section.
    fn get(&self, key: &str) -> Option<&str> {
        self.sections
            .first()?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` in the ungrouped section.
    fn set(&mut self, key: &str, value: &str) {
        if let Some(section) = self.sections.first_mut() {
            upsert(&mut section.entries, key, value.to_string());
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(name) = &section.name {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push('[');
                out.push_str(name);
                out.push_str("]\n");
            }
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push('=');
                out.push_str(&escape(value));
                out.push('\n');
            }
        }
        out
    }
}

fn upsert(entries: &mut Vec<(String, String)>, key: &str, value: String) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key.to_string(), value)),
    }
}

fn escape(value: &str) -> String {
    // Edge spaces would otherwise be lost to trimming on the next read.
    let body_start = value.len() - value.trim_start_matches(' ').len();
    let body_end = value.trim_end_matches(' ').len();

    let mut out = String::with_capacity(value.len());
    for (idx, ch) in value.char_indices() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' if idx < body_start || idx >= body_end => out.push_str("\\s"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn custom_settings() -> ToggleSettings {
        ToggleSettings {
            active_icon: "a.png".to_string(),
            inactive_icon: "b.png".to_string(),
            primary_command: "systemctl --user start foo".to_string(),
            secondary_command: "printf 'x\\ty'".to_string(),
            active: false,
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::at(temp.path().join("absent.rc"));

        let loaded = store.try_load();
        assert!(matches!(loaded.source, LoadSource::Missing));
        assert_eq!(loaded.settings, ToggleSettings::default());
        assert_eq!(loaded.settings.active_icon, "starred");
        assert_eq!(loaded.settings.inactive_icon, "non-starred");
        assert!(loaded.settings.active);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.rc");
        fs::write(&path, "").unwrap();

        let loaded = SettingsStore::at(&path).try_load();
        assert!(matches!(loaded.source, LoadSource::Stored));
        assert_eq!(loaded.settings, ToggleSettings::default());
    }

    #[test]
    fn test_unreadable_file_is_distinguished_from_missing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("binary.rc");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let loaded = SettingsStore::at(&path).try_load();
        assert!(matches!(loaded.source, LoadSource::Unreadable(_)));
        assert_eq!(loaded.settings, ToggleSettings::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::at(temp.path().join("nested").join("toggle.rc"));

        store.try_save(&custom_settings()).unwrap();
        let first = store.load();
        assert_eq!(first, custom_settings());

        store.try_save(&first).unwrap();
        assert_eq!(store.load(), first);
    }

    #[test]
    fn test_file_layout_matches_legacy_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("toggle.rc");
        SettingsStore::at(&path)
            .try_save(&ToggleSettings::default())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "active_icon=starred\n\
             inactive_icon=non-starred\n\
             primary_command=notify-send 'primary command executed'\n\
             secondary_command=notify-send 'secondary command executed'\n\
             active=true\n"
        );
    }

    #[test]
    fn test_missing_keys_fall_back_individually() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("partial.rc");
        fs::write(&path, "# written by hand\ninactive_icon = off\nactive=false\n").unwrap();

        let settings = SettingsStore::at(&path).load();
        assert_eq!(settings.active_icon, DEFAULT_ACTIVE_ICON);
        assert_eq!(settings.inactive_icon, "off");
        assert_eq!(settings.primary_command, DEFAULT_PRIMARY_COMMAND);
        assert_eq!(settings.secondary_command, DEFAULT_SECONDARY_COMMAND);
        assert!(!settings.active);
    }

    #[test]
    fn test_malformed_bool_reads_false() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bool.rc");

        fs::write(&path, "active=maybe\n").unwrap();
        assert!(!SettingsStore::at(&path).load().active);

        fs::write(&path, "active=YES\n").unwrap();
        assert!(SettingsStore::at(&path).load().active);
    }

    #[test]
    fn test_grouped_keys_are_ignored_and_preserved() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("grouped.rc");
        fs::write(&path, "extra=1\n[Other]\nactive_icon=nope\n").unwrap();

        let store = SettingsStore::at(&path);
        let settings = store.load();
        assert_eq!(settings.active_icon, DEFAULT_ACTIVE_ICON);

        store.try_save(&settings).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("extra=1\n"));
        assert!(content.ends_with("[Other]\nactive_icon=nope\n"));
    }

    #[test]
    fn test_special_characters_survive_roundtrip() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::at(temp.path().join("escape.rc"));
        let settings = ToggleSettings {
            primary_command: " echo a\\b\nnext ".to_string(),
            secondary_command: String::new(),
            ..ToggleSettings::default()
        };

        store.try_save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_unicode_and_control_whitespace_survive_roundtrip() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::at(temp.path().join("whitespace.rc"));

        for value in [
            "echo hi\u{a0}",
            "\u{3000}echo",
            "\u{2003}echo\u{2003}",
            "echo\u{c}",
            "\u{c}\techo\r",
            "\u{b}",
        ] {
            let settings = ToggleSettings {
                active_icon: value.to_string(),
                secondary_command: value.to_string(),
                ..ToggleSettings::default()
            };
            store.try_save(&settings).unwrap();
            assert_eq!(store.load(), settings, "value {value:?}");
        }
    }

    #[test]
    fn test_instance_files_are_separate() {
        let temp = tempdir().unwrap();
        let panel = SettingsStore::in_dir(temp.path(), "Panel").unwrap();
        let dock = SettingsStore::in_dir(temp.path(), "Dock").unwrap();

        panel
            .try_save(&ToggleSettings {
                active: false,
                ..ToggleSettings::default()
            })
            .unwrap();

        assert!(!panel.load().active);
        assert!(matches!(dock.try_load().source, LoadSource::Missing));
        assert!(SettingsStore::in_dir(temp.path(), "../Panel").is_err());
    }

    #[test]
    fn test_instance_id_validation() {
        assert!(validate_instance_id("toggle-1").is_ok());
        assert!(validate_instance_id("panel.dock_2").is_ok());
        assert!(matches!(
            validate_instance_id("../escape"),
            Err(StoreError::InvalidInstance(_))
        ));
        assert!(validate_instance_id("..").is_err());
        assert!(validate_instance_id("").is_err());
        assert!(validate_instance_id("a/b").is_err());
    }

    #[test]
    fn test_save_into_unwritable_location_is_skipped() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();

        // The parent "directory" is a regular file.
        let store = SettingsStore::at(blocker.join("toggle.rc"));
        assert!(store.try_save(&ToggleSettings::default()).is_err());
        store.save(&ToggleSettings::default());
    }
}
