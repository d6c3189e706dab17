#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
// Often exceeded by queries
#![allow(clippy::type_complexity)]
// Unhelpful for systems
#![allow(clippy::too_many_arguments)]

//! [`bevy_dialogue_window`] is a Bevy plugin that provides a dialogue window:
//! a speaker name and a text revealed character by character, a single "next"
//! input to skip the reveal or close the window, and hooks to know when the
//! window opens and closes.

use bevy::prelude::*;
use prelude::*;

pub mod commands;
pub mod errors;
pub mod events;
pub mod hooks;
pub mod localization;
pub mod prelude;
pub mod settings;
pub mod signal;
pub mod surface;
pub mod typewriter;
pub mod window;

/// The plugin that provides the dialogue window.
///
/// It inserts the one [`DialogueWindow`] of the app, so the window exists as
/// soon as the app is built. It needs the `AssetPlugin` for string tables.
#[derive(Default)]
pub struct DialogueWindowPlugin {
    /// Settings of the window.
    pub settings: DialogueSettings,
}

/// The [`SystemSet`] for the dialogue window systems.
#[derive(SystemSet, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogueSet;

impl Plugin for DialogueWindowPlugin {
    fn build(&self, app: &mut App) {
        if let Err(err) = self.settings.validate() {
            warn!("Dialogue window settings are not usable, dialogues will fail to show: {}", err);
        }
        app.insert_resource(DialogueWindow::new(self.settings.clone()))
            .init_resource::<StringTables>()
            .init_asset::<StringTable>()
            .init_asset_loader::<StringTableLoader>()
            .add_plugins(events::DialogueEventsPlugin)
            .add_systems(
                Update,
                (
                    next_handler,
                    resolve_localized_requests,
                    tick_typewriter,
                    events::relay_notifications,
                )
                    .chain()
                    .in_set(DialogueSet),
            );
        info!(
            "Dialogue window ready, revealing {} characters per second",
            self.settings.characters_per_second
        );
    }
}

/// Handles `NextRequest` events by skipping the reveal or closing the window.
fn next_handler(mut reqs: EventReader<NextRequest>, mut window: ResMut<DialogueWindow>) {
    for _ev in reqs.read() {
        window.advance_or_skip();
    }
}

/// Shows the queued localized dialogue once its strings resolve.
fn resolve_localized_requests(mut window: ResMut<DialogueWindow>, localization: Localization) {
    if !window.has_pending_localized() {
        return;
    }
    let Some(request) = window.take_pending_localized() else {
        return;
    };
    match window.show_localized(&localization, request) {
        Ok(ShowOutcome::Shown) => {}
        Ok(ShowOutcome::Pending(request)) => window.queue_localized(request),
        Err(err) => error!("Localized dialogue could not be shown: {}", err),
    }
}

/// Advances the reveal with the frame time.
fn tick_typewriter(time: Res<Time>, mut window: ResMut<DialogueWindow>) {
    if window.typewriter().is_running() {
        window.tick(time.delta());
    }
}
