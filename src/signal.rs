//! Single-shot completion signal for callers that wait for a dialogue to close.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bevy::prelude::Component;

/// A callback handed to the dialogue window. Called at most once.
pub type DialogueCallback = Box<dyn FnOnce() + Send + Sync + 'static>;

/// Becomes closed when the callback made by [`CloseSignal::callback`] runs.
///
/// This is how a script step waits for the player to dismiss a dialogue: it
/// passes the callback as `on_close` and checks [`CloseSignal::is_closed`]
/// every frame. The window calls `on_close` synchronously inside
/// [`DialogueWindow::close`](crate::prelude::DialogueWindow::close), so the
/// signal is already closed when `close` returns.
///
/// ```
/// use bevy_dialogue_window::prelude::*;
///
/// let mut window = DialogueWindow::default();
/// let signal = CloseSignal::new();
/// window.show("Hero", "Hi!", None, Some(signal.callback())).unwrap();
/// assert!(!signal.is_closed());
/// window.close(None);
/// assert!(signal.is_closed());
/// ```
#[derive(Component, Debug, Clone, Default)]
pub struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    /// Creates an open signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that closes this signal, and every clone of it.
    pub fn callback(&self) -> DialogueCallback {
        let closed = self.0.clone();
        Box::new(move || closed.store(true, Ordering::Release))
    }

    /// Whether the callback ran.
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_state() {
        let signal = CloseSignal::new();
        let waiter = signal.clone();
        let callback = signal.callback();
        assert!(!waiter.is_closed());
        callback();
        assert!(waiter.is_closed());
        assert!(signal.is_closed());
    }

    #[test]
    fn dropped_callback_leaves_signal_open() {
        let signal = CloseSignal::new();
        drop(signal.callback());
        assert!(!signal.is_closed());
    }
}
