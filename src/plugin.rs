// SPDX-License-Identifier: MPL-2.0

//! Panel Plugin Instance
//!
//! [`PanelHooks`] is the full surface a panel host drives: seven lifecycle
//! hooks, nothing else. [`TogglePlugin`] implements them on top of the
//! settings store, the toggle state machine and the dialog session.
//!
//! # Lifecycle
//!
//! ```text
//! construct ──> load settings ──> render icon
//!     │
//!     ├─ press(Primary)  ──> flip state, launch primary command
//!     ├─ press(Middle)   ──> launch secondary command
//!     ├─ configure       ──> open dialog session (blocks configure)
//!     │     └─ close_dialog ──> commit, save, refresh icon, unblock
//!     ├─ save            ──> write settings
//!     └─ free            ──> drop open dialog, final save
//! ```

use crate::config::ToggleSettings;
use crate::dialog::{DialogSession, PLUGIN_WEBSITE};
use crate::launcher::{Launcher, SystemLauncher};
use crate::store::SettingsStore;
use crate::toggle::{self, PointerButton};

/// Icon size used until the panel reports its size.
const DEFAULT_ICON_SIZE: u16 = 16;

/// Instance id used when nothing better is known.
const FALLBACK_INSTANCE: &str = "default";

/// Panel orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Icon lookup request handed to the host's icon theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    /// Symbolic icon name
    pub name: String,
    /// Desired size in pixels
    pub size: u16,
}

/// Static data for the about surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub comments: &'static str,
    pub authors: Vec<&'static str>,
    pub license: &'static str,
    pub website: &'static str,
}

/// Build the instance id of an applet from the panel hosting it and an
/// optional user-supplied suffix.
///
/// Each panel (for example `Panel` and `Dock`) gets its own settings file.
/// Characters that cannot appear in a file name become `_`.
pub fn instance_id(panel: &str, suffix: Option<&str>) -> String {
    let raw = match suffix.filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{panel}-{suffix}"),
        None => panel.to_string(),
    };

    let id: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if id.is_empty() || id == "." || id == ".." {
        FALLBACK_INSTANCE.to_string()
    } else {
        id
    }
}

/// Lifecycle hooks a panel host calls on a plugin instance.
pub trait PanelHooks: Sized {
    /// Create the instance identified by `instance_id`.
    fn construct(instance_id: &str) -> Self;

    /// Persist the current settings.
    fn save(&self);

    /// Tear the instance down.
    fn free(&mut self);

    /// The panel size changed; returns `true` when handled.
    fn size_changed(&mut self, size: u32) -> bool;

    fn orientation_changed(&mut self, orientation: Orientation);

    /// Show the configuration dialog; returns `false` if one is already open.
    fn configure(&mut self) -> bool;

    fn about(&self) -> AboutInfo;
}

/// A toggle button living in the panel.
#[derive(Debug)]
pub struct TogglePlugin {
    /// `None` when no settings location could be resolved; saves are skipped
    store: Option<SettingsStore>,
    settings: ToggleSettings,
    /// Open configuration session. Its presence blocks `configure`.
    dialog: Option<DialogSession>,
    launcher: Box<dyn Launcher>,
    icon_size: u16,
    orientation: Orientation,
}

impl TogglePlugin {
    /// Build an instance backed by an explicit settings store.
    pub fn with_store(store: Option<SettingsStore>) -> Self {
        let settings = store
            .as_ref()
            .map(SettingsStore::load)
            .unwrap_or_default();

        Self {
            store,
            settings,
            dialog: None,
            launcher: Box::new(SystemLauncher),
            icon_size: DEFAULT_ICON_SIZE,
            orientation: Orientation::default(),
        }
    }

    /// Replace the process launcher.
    pub fn with_launcher(mut self, launcher: impl Launcher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    pub fn settings(&self) -> &ToggleSettings {
        &self.settings
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Icon to display for the current state.
    pub fn icon(&self) -> IconRequest {
        IconRequest {
            name: toggle::render_icon(&self.settings).to_string(),
            size: self.icon_size,
        }
    }

    /// Apply a click and return the command it selects, if any.
    fn click(&mut self, button: PointerButton) -> Option<String> {
        match button {
            PointerButton::Primary => Some(toggle::on_primary_click(&mut self.settings)),
            PointerButton::Middle => Some(toggle::on_secondary_click(&self.settings)),
            PointerButton::Secondary => None,
        }
    }

    /// Handle a pointer press. Returns `true` when the press was consumed.
    pub fn press(&mut self, button: PointerButton) -> bool {
        let Some(command) = self.click(button) else {
            return false;
        };

        self.launcher.spawn_command(&command);
        true
    }

    pub fn configure_blocked(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn dialog(&self) -> Option<&DialogSession> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut DialogSession> {
        self.dialog.as_mut()
    }

    /// Help button of the open dialog. The dialog stays open either way;
    /// returns `false` when no dialog is open or the page could not be opened.
    pub fn help(&self) -> bool {
        self.dialog
            .as_ref()
            .is_some_and(|dialog| dialog.help(self.launcher.as_ref()))
    }

    /// Website button of the about surface.
    pub fn open_website(&self) {
        if let Err(err) = self.launcher.open_url(PLUGIN_WEBSITE) {
            log::warn!("Unable to open the following url: {PLUGIN_WEBSITE} ({err})");
        }
    }

    /// Commit the open dialog, save and re-enable configuration.
    ///
    /// Returns `false` when no dialog was open.
    pub fn close_dialog(&mut self) -> bool {
        let Some(dialog) = self.dialog.take() else {
            return false;
        };

        dialog.commit(&mut self.settings);
        self.save();
        log::debug!("Configuration committed, showing icon {}", self.icon().name);
        true
    }

    /// Drop the open dialog without committing.
    pub fn cancel_dialog(&mut self) {
        if self.dialog.take().is_some() {
            log::debug!("Discarding open configuration dialog");
        }
    }
}

impl PanelHooks for TogglePlugin {
    fn construct(instance_id: &str) -> Self {
        let store = SettingsStore::for_instance(instance_id)
            .inspect_err(|err| log::warn!("Settings for `{instance_id}` unavailable: {err}"))
            .ok();

        log::info!("Constructing toggle instance `{instance_id}`");
        Self::with_store(store)
    }

    fn save(&self) {
        if let Some(store) = &self.store {
            store.save(&self.settings);
        }
    }

    fn free(&mut self) {
        self.cancel_dialog();
        self.save();
    }

    fn size_changed(&mut self, size: u32) -> bool {
        self.icon_size = u16::try_from(size).unwrap_or(u16::MAX);
        true
    }

    fn orientation_changed(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    fn configure(&mut self) -> bool {
        if self.dialog.is_some() {
            log::debug!("Configuration dialog already open");
            return false;
        }

        self.dialog = Some(DialogSession::open(&self.settings));
        true
    }

    fn about(&self) -> AboutInfo {
        AboutInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            comments: env!("CARGO_PKG_DESCRIPTION"),
            authors: env!("CARGO_PKG_AUTHORS")
                .split(':')
                .filter(|author| !author.is_empty())
                .collect(),
            license: env!("CARGO_PKG_LICENSE"),
            website: PLUGIN_WEBSITE,
        }
    }
}
