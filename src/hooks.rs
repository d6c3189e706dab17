//! Synchronous notification channels of the dialogue window.

use crate::typewriter::RunId;

/// A subscribed handler.
pub type Handler<T> = Box<dyn FnMut(T) + Send + Sync>;

/// A list of handlers called in registration order every time the channel emits.
pub struct HookChannel<T> {
    /// The subscribed handlers.
    handlers: Vec<Handler<T>>,
}

impl<T> Default for HookChannel<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for HookChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookChannel")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<T: Copy> HookChannel<T> {
    /// Adds a handler after the existing ones.
    pub fn subscribe(&mut self, handler: impl FnMut(T) + Send + Sync + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Calls every handler with `arg`.
    pub fn emit(&mut self, arg: T) {
        for handler in &mut self.handlers {
            handler(arg);
        }
    }

    /// Removes every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of subscribed handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Every hook the dialogue window exposes. None of them does anything by default.
#[derive(Debug, Default)]
pub struct DialogueHooks {
    /// A reveal started.
    pub typewriter_begin: HookChannel<RunId>,
    /// A reveal ended, by itself or by a skip.
    pub typewriter_end: HookChannel<RunId>,
    /// The visible count moved to the given value. Handy for per-character sounds.
    pub typewriter_char: HookChannel<usize>,
    /// The window was asked to show.
    pub opened: HookChannel<()>,
    /// The window was asked to close.
    pub closed: HookChannel<()>,
}
