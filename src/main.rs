// SPDX-License-Identifier: MPL-2.0

//! COSMIC Toggle Applet
//!
//! A two-state toggle button for the COSMIC panel. Left click flips the
//! state, swaps the icon and runs a command; middle click runs a second
//! command. Settings live in one rc file per applet instance.
//!
//! # Usage
//!
//! ```bash
//! cosmic-toggle-applet [suffix]
//! ```
//!
//! Settings live in `~/.config/cosmic-toggle-applet/<panel>[-<suffix>].rc`,
//! so the applet on the Panel and on the Dock keep separate state. Set
//! `RUST_LOG=debug` for storage and launch diagnostics.

mod app;
mod config;
mod dialog;
mod i18n;
mod launcher;
mod plugin;
mod store;
mod toggle;

fn main() -> cosmic::iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional suffix to tell several applets on the same panel apart.
    let instance_suffix = std::env::args().nth(1);

    log::info!("Starting toggle applet with version {}", env!("CARGO_PKG_VERSION"));

    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    cosmic::applet::run::<app::AppModel>(instance_suffix)
}
