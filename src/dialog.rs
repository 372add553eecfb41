// SPDX-License-Identifier: MPL-2.0

//! Configuration dialog session.
//!
//! A session holds an editable copy of the four string settings. Edits stay
//! in the session until [`DialogSession::commit`], which is the only place
//! the settings are written back. The toggle state itself is not editable.

use crate::config::ToggleSettings;
use crate::launcher::Launcher;

/// Documentation page opened by the Help button.
pub const PLUGIN_WEBSITE: &str = "https://docs.xfce.org/panel-plugins/xfce4-sample-plugin";

/// Editable fields of the dialog, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ActiveIcon,
    InactiveIcon,
    PrimaryCommand,
    SecondaryCommand,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::ActiveIcon,
        Field::InactiveIcon,
        Field::PrimaryCommand,
        Field::SecondaryCommand,
    ];
}

/// Working copy of the settings while the dialog is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSession {
    active_icon: String,
    inactive_icon: String,
    primary_command: String,
    secondary_command: String,
}

impl DialogSession {
    pub fn open(settings: &ToggleSettings) -> Self {
        Self {
            active_icon: settings.active_icon.clone(),
            inactive_icon: settings.inactive_icon.clone(),
            primary_command: settings.primary_command.clone(),
            secondary_command: settings.secondary_command.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ActiveIcon => &self.active_icon,
            Field::InactiveIcon => &self.inactive_icon,
            Field::PrimaryCommand => &self.primary_command,
            Field::SecondaryCommand => &self.secondary_command,
        }
    }

    /// Replace a field of the working copy. Empty values are accepted.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::ActiveIcon => &mut self.active_icon,
            Field::InactiveIcon => &mut self.inactive_icon,
            Field::PrimaryCommand => &mut self.primary_command,
            Field::SecondaryCommand => &mut self.secondary_command,
        };
        *slot = value;
    }

    /// Open the documentation page. A failed launch only logs a warning
    /// and the session stays usable.
    pub fn help(&self, launcher: &dyn Launcher) -> bool {
        match launcher.open_url(PLUGIN_WEBSITE) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Unable to open the following url: {PLUGIN_WEBSITE} ({err})");
                false
            }
        }
    }

    /// Write the working copy into `settings`; `active` is left untouched.
    pub fn commit(self, settings: &mut ToggleSettings) {
        settings.active_icon = self.active_icon;
        settings.inactive_icon = self.inactive_icon;
        settings.primary_command = self.primary_command;
        settings.secondary_command = self.secondary_command;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_copies_current_values() {
        let settings = ToggleSettings::default();
        let session = DialogSession::open(&settings);

        assert_eq!(session.get(Field::ActiveIcon), "starred");
        assert_eq!(session.get(Field::InactiveIcon), "non-starred");
        assert_eq!(session.get(Field::PrimaryCommand), settings.primary_command);
        assert_eq!(session.get(Field::SecondaryCommand), settings.secondary_command);
    }

    #[test]
    fn test_edits_do_not_touch_settings_before_commit() {
        let settings = ToggleSettings::default();
        let mut session = DialogSession::open(&settings);
        session.set(Field::PrimaryCommand, "changed".to_string());

        assert_eq!(settings, ToggleSettings::default());
        assert_eq!(session.get(Field::PrimaryCommand), "changed");
    }

    #[test]
    fn test_commit_overwrites_strings_and_keeps_state() {
        let mut settings = ToggleSettings::default();
        assert!(settings.active);

        let mut session = DialogSession::open(&settings);
        for (field, value) in Field::ALL.into_iter().zip(["a.png", "b.png", "cmd1", "cmd2"]) {
            session.set(field, value.to_string());
        }
        session.commit(&mut settings);

        assert_eq!(
            settings,
            ToggleSettings {
                active_icon: "a.png".to_string(),
                inactive_icon: "b.png".to_string(),
                primary_command: "cmd1".to_string(),
                secondary_command: "cmd2".to_string(),
                active: true,
            }
        );
    }

    #[test]
    fn test_empty_values_are_committed_verbatim() {
        let mut settings = ToggleSettings {
            active: false,
            ..ToggleSettings::default()
        };
        let mut session = DialogSession::open(&settings);
        session.set(Field::ActiveIcon, String::new());
        session.set(Field::SecondaryCommand, String::new());
        session.commit(&mut settings);

        assert_eq!(settings.active_icon, "");
        assert_eq!(settings.secondary_command, "");
        assert_eq!(settings.inactive_icon, "non-starred");
        assert!(!settings.active);
    }
}
