//! Events the plugin can receive.

use bevy::prelude::*;

/// Event to advance the dialogue window.
///
/// This event is typically wired to an input from the player, e.g. a button
/// or a key press. While the text is being revealed it skips to the full
/// text, afterwards it closes the window.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct NextRequest;
