//! The dialogue window: session lifecycle and input routing.

use std::{collections::VecDeque, task::Poll, time::Duration};

use bevy::prelude::*;

use crate::{
    errors::DialogueError,
    hooks::DialogueHooks,
    localization::{LocalizedDialogue, StringDatabase},
    settings::DialogueSettings,
    signal::DialogueCallback,
    surface::{PlainTextSurface, TextSurface},
    typewriter::{RunId, Typewriter, TypewriterEvent},
};

/// How many notifications are kept until [`DialogueWindow::drain_notifications`]
/// is called. The oldest ones are dropped beyond that.
const NOTIFICATION_BUFFER_CAPACITY: usize = 4096;

/// One open-to-close lifecycle of the window.
struct DialogueSession {
    /// Who is talking.
    speaker: String,
    /// What is being said.
    body: String,
    /// Characters the body surface reported for `body`.
    total_characters: usize,
    /// Called when the window closes.
    on_close: Option<DialogueCallback>,
}

/// Everything the window notified, in order. Relayed to Bevy events by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueNotification {
    /// The window was asked to show.
    Opened,
    /// The window was asked to close.
    Closed,
    /// A reveal started.
    TypewriterBegin(RunId),
    /// A reveal ended.
    TypewriterEnd(RunId),
    /// The visible count moved to `index`.
    TypewriterChar {
        /// The run that revealed the character.
        run: RunId,
        /// The visible count.
        index: usize,
    },
}

/// What [`DialogueWindow::show_localized`] did.
#[derive(Debug)]
pub enum ShowOutcome {
    /// The dialogue is on screen.
    Shown,
    /// The strings are not available yet. Nothing changed; the request is handed back.
    Pending(LocalizedDialogue),
}

/// The dialogue window. There is exactly one per app, inserted by
/// [`DialogueWindowPlugin`](crate::DialogueWindowPlugin).
///
/// A single "next" input drives it through [`DialogueWindow::advance_or_skip`]:
/// while the text is being revealed it skips to the full text, afterwards it
/// closes the window.
///
/// Every notification is also buffered for [`DialogueWindow::drain_notifications`].
/// The plugin drains the buffer each frame; a window used on its own should be
/// drained by its owner, otherwise only the most recent notifications are kept.
#[derive(Resource)]
pub struct DialogueWindow {
    /// Reveal rate and friends.
    settings: DialogueSettings,
    /// Reveals the body text.
    typewriter: Typewriter,
    /// Shows the speaker.
    nameplate: Box<dyn TextSurface>,
    /// Shows the dialogue text.
    body: Box<dyn TextSurface>,
    /// The open session, if any.
    session: Option<DialogueSession>,
    /// A localized show waiting for its strings.
    pending_localized: Option<LocalizedDialogue>,
    /// Whether the "press next" indicator should be visible.
    next_indicator_visible: bool,
    /// Synchronous notification channels.
    hooks: DialogueHooks,
    /// Notifications not yet relayed.
    notifications: VecDeque<DialogueNotification>,
    /// Whether notifications were dropped since the last drain.
    notifications_overflowed: bool,
}

impl Default for DialogueWindow {
    fn default() -> Self {
        Self::new(DialogueSettings::default())
    }
}

impl DialogueWindow {
    /// A closed window writing to [`PlainTextSurface`]s.
    pub fn new(settings: DialogueSettings) -> Self {
        Self::with_surfaces(
            settings,
            PlainTextSurface::default(),
            PlainTextSurface::default(),
        )
    }

    /// A closed window writing to the given surfaces.
    pub fn with_surfaces(
        settings: DialogueSettings,
        nameplate: impl TextSurface,
        body: impl TextSurface,
    ) -> Self {
        Self {
            settings,
            typewriter: Typewriter::new(),
            nameplate: Box::new(nameplate),
            body: Box::new(body),
            session: None,
            pending_localized: None,
            next_indicator_visible: false,
            hooks: DialogueHooks::default(),
            notifications: VecDeque::new(),
            notifications_overflowed: false,
        }
    }

    /// Shows `text` said by `speaker` and starts revealing it.
    ///
    /// An open dialogue is replaced: its reveal is cancelled and its
    /// `on_close` is dropped without being called. `on_show` runs before
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::InvalidRevealRate`] if the configured rate
    /// cannot drive the typewriter. Nothing is changed in that case.
    pub fn show(
        &mut self,
        speaker: impl Into<String>,
        text: impl Into<String>,
        on_show: Option<DialogueCallback>,
        on_close: Option<DialogueCallback>,
    ) -> Result<(), DialogueError> {
        let rate = self.settings.validate()?;

        if self.pending_localized.take().is_some() {
            debug!("Pending localized dialogue dropped by a newer one");
        }

        self.notify(DialogueNotification::Opened);

        let speaker = speaker.into();
        let body = text.into();
        self.nameplate.set_text(&speaker);
        let nameplate_characters = self.nameplate.character_count();
        self.nameplate
            .set_max_visible_characters(nameplate_characters);
        self.body.set_text(&body);
        let total_characters = self.body.character_count();
        self.body.set_max_visible_characters(0);

        info!("Showing dialogue of {speaker:?} ({total_characters} characters)");
        let previous = self.session.replace(DialogueSession {
            speaker,
            body,
            total_characters,
            on_close: None,
        });
        if previous.and_then(|session| session.on_close).is_some() {
            warn!("Open dialogue replaced, its close callback will not be called");
        }

        let mut events = Vec::new();
        self.typewriter
            .start(total_characters, rate, |event| events.push(event))?;
        self.dispatch(events);

        if let Some(on_show) = on_show {
            on_show();
        }
        if let Some(session) = self.session.as_mut() {
            session.on_close = on_close;
        }
        Ok(())
    }

    /// Resolves the keys of `request` through `db` and shows the dialogue.
    ///
    /// If `db` is still loading either string, nothing changes and the
    /// request comes back as [`ShowOutcome::Pending`].
    pub fn show_localized(
        &mut self,
        db: &impl StringDatabase,
        request: LocalizedDialogue,
    ) -> Result<ShowOutcome, DialogueError> {
        let (Poll::Ready(speaker), Poll::Ready(text)) = (
            db.localized_string(&request.speaker),
            db.localized_string(&request.text),
        ) else {
            return Ok(ShowOutcome::Pending(request));
        };
        self.show(speaker, text, request.on_show, request.on_close)?;
        Ok(ShowOutcome::Shown)
    }

    /// Queues a localized dialogue, shown by the plugin as soon as its
    /// strings resolve. Replaces a request that is still waiting.
    pub fn queue_localized(&mut self, request: LocalizedDialogue) {
        if let Some(previous) = self.pending_localized.replace(request) {
            debug!(
                "Pending localized dialogue {} replaced before it could be shown",
                previous.text
            );
        }
    }

    /// Closes the window.
    ///
    /// Notifies the close, runs `on_next`, then runs the `on_close` given to
    /// [`DialogueWindow::show`], all before returning. Closing a closed
    /// window still notifies and runs `on_next`; `on_close` only ever runs once.
    /// A localized dialogue still waiting for its strings is dropped.
    pub fn close(&mut self, on_next: Option<DialogueCallback>) {
        self.notify(DialogueNotification::Closed);
        self.next_indicator_visible = false;
        if let Some(pending) = self.pending_localized.take() {
            debug!("Pending localized dialogue {} dropped by close", pending.text);
        }

        if let Some(on_next) = on_next {
            on_next();
        }

        self.typewriter.cancel();
        match self.session.take() {
            Some(session) => {
                info!("Closing dialogue of {:?}", session.speaker);
                if let Some(on_close) = session.on_close {
                    on_close();
                }
            }
            None => debug!("Close requested with no open dialogue"),
        }
    }

    /// Skips the reveal if it is running, closes the window otherwise.
    pub fn advance_or_skip(&mut self) {
        if self.typewriter.is_running() {
            self.skip();
        } else {
            self.close(None);
        }
    }

    /// Reveals the whole text at once. Does nothing unless the reveal is running.
    pub fn skip(&mut self) {
        let mut events = Vec::new();
        if self.typewriter.skip(|event| events.push(event)) {
            debug!("Typewriter skipped");
            self.dispatch(events);
        }
    }

    /// Advances the reveal by `delta`.
    pub fn tick(&mut self, delta: Duration) {
        if !self.typewriter.is_running() {
            return;
        }
        let mut events = Vec::new();
        self.typewriter.tick(delta, |event| events.push(event));
        self.dispatch(events);
    }

    /// Whether a dialogue is open.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The speaker of the open dialogue.
    pub fn speaker(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.speaker.as_str())
    }

    /// The full text of the open dialogue.
    pub fn body(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.body.as_str())
    }

    /// Number of revealable characters of the open dialogue.
    pub fn total_characters(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.total_characters)
    }

    /// How many characters of the text are visible.
    pub fn visible_characters(&self) -> usize {
        self.body.max_visible_characters()
    }

    /// Whether the "press next" indicator should be shown.
    pub fn is_next_indicator_visible(&self) -> bool {
        self.next_indicator_visible
    }

    /// Whether a localized dialogue waits for its strings.
    pub fn has_pending_localized(&self) -> bool {
        self.pending_localized.is_some()
    }

    /// The typewriter revealing the text.
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    /// The current settings.
    pub fn settings(&self) -> &DialogueSettings {
        &self.settings
    }

    /// Changes the reveal rate. The open dialogue keeps its rate; the new one
    /// applies from the next [`DialogueWindow::show`].
    pub fn set_reveal_rate(&mut self, characters_per_second: f32) -> Result<(), DialogueError> {
        let settings = DialogueSettings::with_rate(characters_per_second);
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// The speaker surface.
    pub fn nameplate(&self) -> &dyn TextSurface {
        self.nameplate.as_ref()
    }

    /// The text surface.
    pub fn body_surface(&self) -> &dyn TextSurface {
        self.body.as_ref()
    }

    /// The notification hooks, to subscribe handlers.
    pub fn hooks_mut(&mut self) -> &mut DialogueHooks {
        &mut self.hooks
    }

    /// Whether notifications wait to be drained.
    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Takes every buffered notification emitted since the last call.
    pub fn drain_notifications(
        &mut self,
    ) -> std::collections::vec_deque::Drain<'_, DialogueNotification> {
        self.notifications_overflowed = false;
        self.notifications.drain(..)
    }

    /// Takes the localized request waiting for its strings.
    pub(crate) fn take_pending_localized(&mut self) -> Option<LocalizedDialogue> {
        self.pending_localized.take()
    }

    /// Applies typewriter events to the surfaces and notifies them.
    fn dispatch(&mut self, events: Vec<TypewriterEvent>) {
        for event in events {
            match event {
                TypewriterEvent::Begin(run) => {
                    self.next_indicator_visible = false;
                    self.notify(DialogueNotification::TypewriterBegin(run));
                }
                TypewriterEvent::CharacterRevealed { run, index } => {
                    self.body.set_max_visible_characters(index);
                    self.notify(DialogueNotification::TypewriterChar { run, index });
                }
                TypewriterEvent::End(run) => {
                    self.body
                        .set_max_visible_characters(self.typewriter.revealed());
                    self.next_indicator_visible = true;
                    self.notify(DialogueNotification::TypewriterEnd(run));
                }
            }
        }
    }

    /// Runs the hooks for `notification` and buffers it for relaying.
    fn notify(&mut self, notification: DialogueNotification) {
        match notification {
            DialogueNotification::Opened => self.hooks.opened.emit(()),
            DialogueNotification::Closed => self.hooks.closed.emit(()),
            DialogueNotification::TypewriterBegin(run) => self.hooks.typewriter_begin.emit(run),
            DialogueNotification::TypewriterEnd(run) => self.hooks.typewriter_end.emit(run),
            DialogueNotification::TypewriterChar { index, .. } => {
                self.hooks.typewriter_char.emit(index)
            }
        }
        if self.notifications.len() >= NOTIFICATION_BUFFER_CAPACITY {
            if !self.notifications_overflowed {
                warn!("Dialogue notifications are not being drained, dropping the oldest");
                self.notifications_overflowed = true;
            }
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }
}
