//! Prelude for the `bevy_dialogue_window` crate.
pub use super::{DialogueSet, DialogueWindowPlugin};
pub use super::{
    commands::*,
    errors::*,
    events::{notifications::*, requests::*},
    hooks::*,
    localization::*,
    settings::*,
    signal::*,
    surface::*,
    typewriter::*,
    window::*,
};
