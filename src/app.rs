// SPDX-License-Identifier: MPL-2.0

//! Panel Applet UI
//!
//! Hosts a [`TogglePlugin`] inside the COSMIC panel and translates panel
//! events into its lifecycle hooks.
//!
//! # Interaction
//!
//! - **Left click**: flips the toggle and runs the primary command
//! - **Middle click**: runs the secondary command
//! - **Right click**: opens a popup menu with "Configure" and "About"
//!
//! The configure popup edits a working copy of the settings. Closing it, by
//! the Close button, by right-clicking the applet again or by the compositor
//! dismissing the popup, is the single commit point.

use crate::dialog::Field;
use crate::fl;
use crate::plugin::{self, Orientation, PanelHooks, TogglePlugin};
use crate::toggle::PointerButton;
use cosmic::applet::cosmic_panel_config::PanelAnchor;
use cosmic::iced::{window::Id, Length, Limits};
use cosmic::iced_winit::commands::popup::{destroy_popup, get_popup};
use cosmic::prelude::*;
use cosmic::widget;

// ============================================================================
// Application Model
// ============================================================================

/// What the open popup currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PopupKind {
    Menu,
    Configure,
    About,
}

/// Applet state managed by the COSMIC runtime.
pub struct AppModel {
    /// COSMIC runtime core
    core: cosmic::Core,

    /// The toggle instance this applet hosts
    plugin: TogglePlugin,

    /// Open popup window and its content
    popup: Option<(Id, PopupKind)>,

    /// Last panel size forwarded to the plugin
    panel_size: u32,
}

// ============================================================================
// Message Types
// ============================================================================

#[derive(Debug, Clone)]
pub enum Message {
    /// Pointer press on the applet button.
    Press(PointerButton),

    /// Right click: open or close the popup menu.
    TogglePopup,

    /// Popup window was closed by the compositor.
    PopupClosed(Id),

    /// "Configure" chosen from the menu.
    ShowConfigure,

    /// "About" chosen from the menu.
    ShowAbout,

    /// A field of the configure popup was edited.
    Edit(Field, String),

    /// Help button of the configure popup.
    Help,

    /// Close button of the configure popup.
    CloseDialog,

    /// Website button of the about popup.
    OpenWebsite,
}

// ============================================================================
// Helper Methods
// ============================================================================

impl AppModel {
    /// Forward panel size and anchor changes to the plugin hooks.
    fn sync_panel_geometry(&mut self) {
        let orientation = match self.core.applet.anchor {
            PanelAnchor::Left | PanelAnchor::Right => Orientation::Vertical,
            PanelAnchor::Top | PanelAnchor::Bottom => Orientation::Horizontal,
        };
        if orientation != self.plugin.orientation() {
            log::debug!("Panel orientation changed to {orientation:?}");
            self.plugin.orientation_changed(orientation);
        }

        let size = u32::from(self.core.applet.suggested_size(true).0);
        if size != self.panel_size {
            self.panel_size = size;
            self.plugin.size_changed(size);
        }
    }

    fn open_popup(&mut self, kind: PopupKind) -> Task<cosmic::Action<Message>> {
        let Some(main_id) = self.core.main_window_id() else {
            log::warn!("No main window to attach the popup to");
            return Task::none();
        };

        let new_id = Id::unique();
        self.popup = Some((new_id, kind));

        let mut popup_settings =
            self.core
                .applet
                .get_popup_settings(main_id, new_id, None, None, None);

        popup_settings.positioner.size_limits = Limits::NONE
            .min_width(300.0)
            .max_width(420.0)
            .min_height(120.0)
            .max_height(1080.0);

        get_popup(popup_settings)
    }

    /// Close the popup, committing the configuration if it was showing.
    fn close_popup(&mut self) -> Task<cosmic::Action<Message>> {
        let Some((id, kind)) = self.popup.take() else {
            return Task::none();
        };

        if kind == PopupKind::Configure {
            self.plugin.close_dialog();
        }
        destroy_popup(id)
    }

    fn field_label(field: Field) -> String {
        match field {
            Field::ActiveIcon => fl!("active-icon"),
            Field::InactiveIcon => fl!("inactive-icon"),
            Field::PrimaryCommand => fl!("primary-command"),
            Field::SecondaryCommand => fl!("secondary-command"),
        }
    }

    fn view_menu(&self) -> Element<'_, Message> {
        let configure = if self.plugin.configure_blocked() {
            widget::button::text(fl!("configure"))
        } else {
            widget::button::text(fl!("configure")).on_press(Message::ShowConfigure)
        };

        widget::list_column()
            .padding(5)
            .spacing(0)
            .add(configure)
            .add(widget::button::text(fl!("about")).on_press(Message::ShowAbout))
            .into()
    }

    fn view_configure(&self) -> Element<'_, Message> {
        let Some(dialog) = self.plugin.dialog() else {
            return widget::text(fl!("configure")).into();
        };

        let mut content = widget::list_column().padding(5).spacing(0);
        for field in Field::ALL {
            content = content.add(widget::settings::item(
                Self::field_label(field),
                widget::text_input("", dialog.get(field))
                    .on_input(move |value| Message::Edit(field, value)),
            ));
        }

        let buttons = widget::row()
            .spacing(8)
            .push(widget::button::standard(fl!("help")).on_press(Message::Help))
            .push(widget::horizontal_space())
            .push(widget::button::suggested(fl!("close")).on_press(Message::CloseDialog));

        widget::column()
            .spacing(12)
            .padding(12)
            .push(widget::text::heading(fl!("dialog-title")))
            .push(content)
            .push(buttons)
            .into()
    }

    fn view_about(&self) -> Element<'_, Message> {
        let about = self.plugin.about();

        widget::column()
            .spacing(8)
            .padding(12)
            .width(Length::Fill)
            .push(widget::text::heading(about.name))
            .push(widget::text(fl!("about-version", version = about.version)))
            .push(widget::text(about.comments))
            .push(widget::text(fl!(
                "about-authors",
                authors = about.authors.join(", ")
            )))
            .push(widget::text(fl!("about-license", license = about.license)))
            .push(widget::button::text(fl!("website")).on_press(Message::OpenWebsite))
            .into()
    }
}

impl Drop for AppModel {
    fn drop(&mut self) {
        self.plugin.free();
    }
}

// ============================================================================
// COSMIC Application Implementation
// ============================================================================

impl cosmic::Application for AppModel {
    type Executor = cosmic::executor::Default;

    /// Optional instance suffix from the command line
    type Flags = Option<String>;

    type Message = Message;

    const APP_ID: &'static str = "com.github.cosmic-toggle-applet";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    fn init(
        core: cosmic::Core,
        suffix: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Panel and Dock each run their own copy of the applet.
        let instance_id =
            plugin::instance_id(&core.applet.panel_type.to_string(), suffix.as_deref());

        let mut app = AppModel {
            core,
            plugin: TogglePlugin::construct(&instance_id),
            popup: None,
            panel_size: 0,
        };
        app.sync_panel_geometry();

        (app, Task::none())
    }

    fn on_close_requested(&self, id: Id) -> Option<Message> {
        Some(Message::PopupClosed(id))
    }

    /// The toggle button shown in the panel.
    fn view(&self) -> Element<'_, Self::Message> {
        let icon = self.plugin.icon();
        let button = self
            .core
            .applet
            .icon_button_from_handle(widget::icon::from_name(icon.name).size(icon.size).handle())
            .on_press(Message::Press(PointerButton::Primary));

        let content: Element<'_, Message> = match self.plugin.orientation() {
            Orientation::Horizontal => widget::row().push(button).into(),
            Orientation::Vertical => widget::column().push(button).into(),
        };

        widget::mouse_area(content)
            .on_middle_press(Message::Press(PointerButton::Middle))
            .on_right_press(Message::TogglePopup)
            .into()
    }

    fn view_window(&self, _id: Id) -> Element<'_, Self::Message> {
        let content = match self.popup.map(|(_, kind)| kind) {
            Some(PopupKind::Configure) => self.view_configure(),
            Some(PopupKind::About) => self.view_about(),
            Some(PopupKind::Menu) | None => self.view_menu(),
        };

        self.core.applet.popup_container(content).into()
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.sync_panel_geometry();

        match message {
            Message::Press(button) => {
                // The panel never asks for a save, so state changes save here.
                if self.plugin.press(button) && button == PointerButton::Primary {
                    self.plugin.save();
                }
            }

            Message::TogglePopup => {
                return if self.popup.is_some() {
                    self.close_popup()
                } else {
                    self.open_popup(PopupKind::Menu)
                };
            }

            Message::PopupClosed(id) => {
                if let Some((open_id, kind)) = self.popup {
                    if open_id == id {
                        self.popup = None;
                        if kind == PopupKind::Configure {
                            self.plugin.close_dialog();
                        }
                    }
                }
            }

            Message::ShowConfigure => {
                if let Some((_, kind)) = self.popup.as_mut() {
                    if self.plugin.configure() {
                        *kind = PopupKind::Configure;
                    }
                } else if self.plugin.configure() {
                    return self.open_popup(PopupKind::Configure);
                }
            }

            Message::ShowAbout => {
                if let Some((_, kind)) = self.popup.as_mut() {
                    *kind = PopupKind::About;
                } else {
                    return self.open_popup(PopupKind::About);
                }
            }

            Message::Edit(field, value) => {
                if let Some(dialog) = self.plugin.dialog_mut() {
                    dialog.set(field, value);
                }
            }

            Message::Help => {
                self.plugin.help();
            }

            Message::CloseDialog => {
                return self.close_popup();
            }

            Message::OpenWebsite => {
                self.plugin.open_website();
            }
        }
        Task::none()
    }

    fn style(&self) -> Option<cosmic::iced_runtime::Appearance> {
        Some(cosmic::applet::style())
    }
}
