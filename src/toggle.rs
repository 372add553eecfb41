// SPDX-License-Identifier: MPL-2.0

//! The toggle state machine.
//!
//! Two states, one transition:
//!
//! ```text
//!            primary click
//!   Active <---------------> Inactive
//!     ^ |                      ^ |
//!     +-+ secondary click      +-+ secondary click
//! ```
//!
//! The command a click returns never depends on the new state.

use crate::config::ToggleSettings;

/// Pointer buttons as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button: flips the state and runs the primary command
    Primary,
    /// Middle button: runs the secondary command
    Middle,
    /// Right button: reserved for the panel menu
    Secondary,
}

/// Flip `active` and return the command to launch.
pub fn on_primary_click(settings: &mut ToggleSettings) -> String {
    settings.active = !settings.active;
    settings.primary_command.clone()
}

/// Return the command to launch; the state is left alone.
pub fn on_secondary_click(settings: &ToggleSettings) -> String {
    settings.secondary_command.clone()
}

/// Icon name for the current state.
pub fn render_icon(settings: &ToggleSettings) -> &str {
    if settings.active {
        &settings.active_icon
    } else {
        &settings.inactive_icon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(active: bool) -> ToggleSettings {
        ToggleSettings {
            active_icon: "on".to_string(),
            inactive_icon: "off".to_string(),
            primary_command: "cmd1".to_string(),
            secondary_command: "cmd2".to_string(),
            active,
        }
    }

    #[test]
    fn test_primary_click_is_an_involution() {
        for start in [true, false] {
            let mut settings = sample(start);

            assert_eq!(on_primary_click(&mut settings), "cmd1");
            assert_eq!(settings.active, !start);

            on_primary_click(&mut settings);
            assert_eq!(settings, sample(start));
        }
    }

    #[test]
    fn test_secondary_click_never_changes_state() {
        let settings = sample(false);
        for _ in 0..5 {
            assert_eq!(on_secondary_click(&settings), "cmd2");
        }
        assert_eq!(settings, sample(false));
    }

    #[test]
    fn test_render_icon_follows_state() {
        assert_eq!(render_icon(&sample(true)), "on");
        assert_eq!(render_icon(&sample(false)), "off");
    }

    #[test]
    fn test_inactive_primary_click_scenario() {
        let mut settings = sample(false);
        assert_eq!(render_icon(&settings), "off");

        let command = on_primary_click(&mut settings);
        assert!(settings.active);
        assert_eq!(render_icon(&settings), "on");
        assert_eq!(command, "cmd1");
    }
}
