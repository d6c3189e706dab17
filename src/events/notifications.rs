//! Events emitted by the dialogue window.

use bevy::prelude::*;

use crate::typewriter::RunId;

/// Emitted when the window is asked to show. Drive the show animation from here.
#[derive(Event, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DialogueOpened;

/// Emitted when the window is asked to close. Drive the hide animation from here.
#[derive(Event, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DialogueClosed;

/// Emitted when a reveal starts.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterBegin(pub RunId);

/// Emitted when a reveal ends, by itself or by a skip.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterEnd(pub RunId);

/// Emitted at every reveal step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterChar {
    /// The run of the step.
    pub run: RunId,
    /// The visible count.
    pub index: usize,
}
