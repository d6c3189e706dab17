//! Commands for the dialogue window

use bevy::prelude::*;

use crate::{localization::LocalizedDialogue, signal::DialogueCallback, window::DialogueWindow};

/// Extension trait for [`Commands`] to drive the [`DialogueWindow`] from any system.
///
/// The commands run when the command queue is applied. Failures are logged.
pub trait DialogueCommandsExt {
    /// Queues [`DialogueWindow::show`].
    fn show_dialogue(
        &mut self,
        speaker: impl Into<String>,
        text: impl Into<String>,
        on_show: Option<DialogueCallback>,
        on_close: Option<DialogueCallback>,
    );

    /// Queues [`DialogueWindow::queue_localized`]. The dialogue shows once its strings resolve.
    fn show_localized_dialogue(&mut self, request: LocalizedDialogue);

    /// Queues [`DialogueWindow::close`].
    fn close_dialogue(&mut self, on_next: Option<DialogueCallback>);
}

impl DialogueCommandsExt for Commands<'_, '_> {
    fn show_dialogue(
        &mut self,
        speaker: impl Into<String>,
        text: impl Into<String>,
        on_show: Option<DialogueCallback>,
        on_close: Option<DialogueCallback>,
    ) {
        let speaker = speaker.into();
        let text = text.into();
        self.add(move |world: &mut World| {
            let Some(mut window) = world.get_resource_mut::<DialogueWindow>() else {
                error!("Show dialogue requested but the DialogueWindowPlugin was not added");
                return;
            };
            if let Err(err) = window.show(speaker, text, on_show, on_close) {
                error!("Dialogue could not be shown: {}", err);
            }
        });
    }

    fn show_localized_dialogue(&mut self, request: LocalizedDialogue) {
        self.add(move |world: &mut World| {
            let Some(mut window) = world.get_resource_mut::<DialogueWindow>() else {
                error!("Show dialogue requested but the DialogueWindowPlugin was not added");
                return;
            };
            window.queue_localized(request);
        });
    }

    fn close_dialogue(&mut self, on_next: Option<DialogueCallback>) {
        self.add(move |world: &mut World| {
            let Some(mut window) = world.get_resource_mut::<DialogueWindow>() else {
                error!("Close dialogue requested but the DialogueWindowPlugin was not added");
                return;
            };
            window.close(on_next);
        });
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::CommandQueue;

    use crate::{
        prelude::{CloseSignal, DialogueSettings, LocalizedString, StringTable, StringTables},
        tests::dialogue_minimal_app,
    };

    use super::*;

    /// Queues commands with `f` and applies them to `world`.
    fn apply_commands(world: &mut World, f: impl FnOnce(&mut Commands)) {
        let mut queue = CommandQueue::default();
        let mut commands = Commands::new(&mut queue, world);
        f(&mut commands);
        queue.apply(world);
    }

    #[test]
    fn show_and_close_through_commands() {
        let mut app = dialogue_minimal_app();
        let signal = CloseSignal::new();
        let on_close = signal.clone();
        app.add_systems(Startup, move |mut commands: Commands| {
            commands.show_dialogue("Hero", "Hi!", None, Some(on_close.callback()));
        });
        app.update();

        let window = app.world.resource::<DialogueWindow>();
        assert!(window.is_open());
        assert_eq!(window.body(), Some("Hi!"));

        apply_commands(&mut app.world, |commands| commands.close_dialogue(None));

        assert!(!app.world.resource::<DialogueWindow>().is_open());
        assert!(signal.is_closed());
    }

    #[test]
    fn invalid_rate_is_logged_not_shown() {
        let mut app = dialogue_minimal_app();
        app.world
            .insert_resource(DialogueWindow::new(DialogueSettings::with_rate(0.0)));

        apply_commands(&mut app.world, |commands| {
            commands.show_dialogue("Hero", "Hi!", None, None)
        });

        assert!(!app.world.resource::<DialogueWindow>().is_open());
    }

    #[test]
    fn localized_dialogue_waits_for_table() {
        let mut app = dialogue_minimal_app();
        let handle = Handle::<StringTable>::weak_from_u128(0xd1a1);
        app.world
            .resource_mut::<StringTables>()
            .insert("Dialogue", handle.clone());

        apply_commands(&mut app.world, |commands| {
            commands.show_localized_dialogue(LocalizedDialogue::new(
                LocalizedString::new("Dialogue", "hero"),
                LocalizedString::new("Dialogue", "hi"),
            ))
        });
        app.update();
        let window = app.world.resource::<DialogueWindow>();
        assert!(!window.is_open());
        assert!(window.has_pending_localized());

        app.world.resource_mut::<Assets<StringTable>>().insert(
            &handle,
            StringTable::new("Dialogue", [("hero", "Hero"), ("hi", "Hi!")]),
        );
        app.update();

        let window = app.world.resource::<DialogueWindow>();
        assert!(window.is_open());
        assert_eq!(window.speaker(), Some("Hero"));
        assert_eq!(window.body(), Some("Hi!"));
        assert!(!window.has_pending_localized());
    }
}
