// SPDX-License-Identifier: MPL-2.0

//! Toggle settings owned by one applet instance.

/// Icon shown while the toggle is active.
pub const DEFAULT_ACTIVE_ICON: &str = "starred";
/// Icon shown while the toggle is inactive.
pub const DEFAULT_INACTIVE_ICON: &str = "non-starred";
/// Command run on primary (left) click.
pub const DEFAULT_PRIMARY_COMMAND: &str = "notify-send 'primary command executed'";
/// Command run on secondary (middle) click.
pub const DEFAULT_SECONDARY_COMMAND: &str = "notify-send 'secondary command executed'";
/// Initial toggle state.
pub const DEFAULT_ACTIVE: bool = true;

/// Persisted state of a toggle applet.
///
/// Every string is always present; unset values are filled from the
/// defaults above when the settings are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSettings {
    /// Icon name shown while `active` is true
    pub active_icon: String,
    /// Icon name shown while `active` is false
    pub inactive_icon: String,
    /// Shell command launched on primary click
    pub primary_command: String,
    /// Shell command launched on secondary click
    pub secondary_command: String,
    /// Current toggle state
    pub active: bool,
}

impl Default for ToggleSettings {
    fn default() -> Self {
        Self {
            active_icon: DEFAULT_ACTIVE_ICON.to_string(),
            inactive_icon: DEFAULT_INACTIVE_ICON.to_string(),
            primary_command: DEFAULT_PRIMARY_COMMAND.to_string(),
            secondary_command: DEFAULT_SECONDARY_COMMAND.to_string(),
            active: DEFAULT_ACTIVE,
        }
    }
}
