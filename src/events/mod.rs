//! Events to interact with the dialogue window.
use bevy::prelude::*;

use crate::window::{DialogueNotification, DialogueWindow};

use self::{notifications::*, requests::*};

pub mod notifications;
pub mod requests;

/// All the built-in events for `bevy_dialogue_window`.
pub(crate) struct DialogueEventsPlugin;

impl Plugin for DialogueEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NextRequest>()
            .add_event::<DialogueOpened>()
            .add_event::<DialogueClosed>()
            .add_event::<TypewriterBegin>()
            .add_event::<TypewriterEnd>()
            .add_event::<TypewriterChar>();
    }
}

/// System that relays the window notifications to their event channels.
pub(crate) fn relay_notifications(
    mut window: ResMut<DialogueWindow>,
    mut opened: EventWriter<DialogueOpened>,
    mut closed: EventWriter<DialogueClosed>,
    mut begin: EventWriter<TypewriterBegin>,
    mut end: EventWriter<TypewriterEnd>,
    mut chars: EventWriter<TypewriterChar>,
) {
    if !window.has_notifications() {
        return;
    }
    window
        .drain_notifications()
        .for_each(|notification| match notification {
            DialogueNotification::Opened => opened.send(DialogueOpened),
            DialogueNotification::Closed => closed.send(DialogueClosed),
            DialogueNotification::TypewriterBegin(run) => begin.send(TypewriterBegin(run)),
            DialogueNotification::TypewriterEnd(run) => end.send(TypewriterEnd(run)),
            DialogueNotification::TypewriterChar { run, index } => {
                chars.send(TypewriterChar { run, index })
            }
        });
}
