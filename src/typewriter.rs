//! The typewriter: a restartable timed reveal over a fixed number of characters.
//!
//! A [`Typewriter`] does not own any text. It only knows how many characters
//! there are and how many of them are visible, and it is driven forward by
//! [`Typewriter::tick`] with the elapsed time of each frame.

use std::time::Duration;

use bevy::time::Stopwatch;

use crate::errors::DialogueError;

/// Identifies one reveal run of a [`Typewriter`]. Every call to
/// [`Typewriter::start`] gets a new, larger id.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub(crate) u64);

/// The phase of a [`Typewriter`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterState {
    /// Never started, or cancelled.
    #[default]
    Idle,
    /// Characters are being revealed.
    Running,
    /// Every character is visible.
    Finished,
}

/// Notifications produced while a [`Typewriter`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterEvent {
    /// A run started.
    Begin(RunId),
    /// The visible count became `index` during a run.
    CharacterRevealed {
        /// The run that revealed the character.
        run: RunId,
        /// The number of visible characters at this step.
        index: usize,
    },
    /// A run ended, either by itself or because it was skipped.
    End(RunId),
}

/// Time between two reveal steps at `rate` characters per second.
///
/// Fails for rates that are not positive and finite, or so small that the
/// interval does not fit in a [`Duration`].
pub fn reveal_interval(rate: f32) -> Result<Duration, DialogueError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(DialogueError::InvalidRevealRate(rate));
    }
    Duration::try_from_secs_f32(1.0 / rate)
        .map(|interval| interval.max(Duration::from_nanos(1)))
        .map_err(|_| DialogueError::InvalidRevealRate(rate))
}

/// What a single step of a run did.
enum Step {
    /// The visible count moved to this value.
    Revealed(usize),
    /// The run has no characters left.
    Finished,
}

/// The state of an in-flight reveal. Dropping it cancels the reveal.
#[derive(Debug)]
struct RevealRun {
    /// Id handed out when the run started.
    id: RunId,
    /// The visible count the next step will set.
    next_index: usize,
    /// Characters per second.
    rate: f64,
    /// Time since the run started.
    clock: Stopwatch,
    /// Steps performed after the initial one.
    steps_taken: u64,
}

impl RevealRun {
    /// Advances the clock by `delta` and returns how many steps became due.
    ///
    /// Step `k` is due `k / rate` seconds after the start, measured on the
    /// total elapsed time so that rounding does not pile up across steps.
    fn steps_due(&mut self, delta: Duration) -> u64 {
        let elapsed_nanos = self.clock.tick(delta).elapsed().as_nanos() as f64;
        let due = (elapsed_nanos * self.rate / 1e9).floor() as u64;
        let steps = due.saturating_sub(self.steps_taken);
        self.steps_taken = self.steps_taken.max(due);
        steps
    }

    /// Performs one step over `total` characters.
    fn step(&mut self, total: usize) -> Step {
        if self.next_index < total {
            let index = self.next_index;
            self.next_index += 1;
            Step::Revealed(index)
        } else {
            Step::Finished
        }
    }
}

/// Reveals characters one by one at a fixed rate.
///
/// During a run over `N` characters the visible count goes through
/// `0, 1, ..., N - 1`, waiting `1 / rate` seconds after each value, and jumps
/// to `N` only when the run ends. A whole run therefore lasts `N / rate`
/// seconds.
///
/// ```
/// use std::time::Duration;
/// use bevy_dialogue_window::prelude::*;
///
/// let mut typewriter = Typewriter::default();
/// let mut revealed = Vec::new();
/// typewriter.start(3, 10.0, |_| {}).unwrap();
/// typewriter.tick(Duration::from_secs(1), |event| {
///     if let TypewriterEvent::CharacterRevealed { index, .. } = event {
///         revealed.push(index);
///     }
/// });
/// assert_eq!(revealed, vec![1, 2]);
/// assert_eq!(typewriter.state(), TypewriterState::Finished);
/// assert_eq!(typewriter.revealed(), 3);
/// ```
#[derive(Debug, Default)]
pub struct Typewriter {
    /// Current phase.
    state: TypewriterState,
    /// Number of visible characters.
    revealed: usize,
    /// Number of characters of the current or last run.
    total: usize,
    /// The in-flight run, present only while running.
    run: Option<RevealRun>,
    /// How many runs were started so far, used to hand out [`RunId`]s.
    runs_started: u64,
}

impl Typewriter {
    /// Creates an idle typewriter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts revealing `character_count` characters at `rate` characters per second.
    ///
    /// Any run in flight is cancelled first and will not emit anything else.
    /// The new run emits [`TypewriterEvent::Begin`] and its first step right away.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::InvalidRevealRate`] without touching the current
    /// run if `rate` is not a positive, finite number.
    pub fn start(
        &mut self,
        character_count: usize,
        rate: f32,
        mut emit: impl FnMut(TypewriterEvent),
    ) -> Result<RunId, DialogueError> {
        reveal_interval(rate)?;

        self.cancel();
        self.runs_started += 1;
        let id = RunId(self.runs_started);

        self.total = character_count;
        self.revealed = 0;
        self.state = TypewriterState::Running;
        self.run = Some(RevealRun {
            id,
            next_index: 0,
            rate: f64::from(rate),
            clock: Stopwatch::new(),
            steps_taken: 0,
        });

        emit(TypewriterEvent::Begin(id));
        self.advance(&mut emit);
        Ok(id)
    }

    /// Advances the running reveal by `delta`, performing every step that
    /// became due. Does nothing unless running.
    pub fn tick(&mut self, delta: Duration, mut emit: impl FnMut(TypewriterEvent)) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let due = run.steps_due(delta);
        for _ in 0..due {
            if !self.advance(&mut emit) {
                break;
            }
        }
    }

    /// Reveals every character at once and ends the run.
    ///
    /// Returns `false`, emitting nothing, if the typewriter was not running.
    pub fn skip(&mut self, mut emit: impl FnMut(TypewriterEvent)) -> bool {
        let Some(id) = self.run.as_ref().map(|run| run.id) else {
            return false;
        };
        self.finish(id, &mut emit);
        true
    }

    /// Stops the running reveal without revealing the rest and without
    /// emitting anything. The typewriter becomes idle.
    pub fn cancel(&mut self) {
        if self.run.take().is_some() {
            self.state = TypewriterState::Idle;
        }
    }

    /// Whether a reveal is in flight.
    pub fn is_running(&self) -> bool {
        self.state == TypewriterState::Running
    }

    /// The current phase.
    pub fn state(&self) -> TypewriterState {
        self.state
    }

    /// Number of visible characters.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Number of characters of the current or last run.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The id of the in-flight run, if any.
    pub fn run_id(&self) -> Option<RunId> {
        self.run.as_ref().map(|run| run.id)
    }

    /// Performs one step of the current run. Returns whether the run is still going.
    fn advance(&mut self, emit: &mut impl FnMut(TypewriterEvent)) -> bool {
        let total = self.total;
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        match run.step(total) {
            Step::Revealed(index) => {
                let id = run.id;
                self.revealed = index;
                emit(TypewriterEvent::CharacterRevealed { run: id, index });
                true
            }
            Step::Finished => {
                let id = run.id;
                self.finish(id, emit);
                false
            }
        }
    }

    /// Ends run `id` with every character visible.
    fn finish(&mut self, id: RunId, emit: &mut impl FnMut(TypewriterEvent)) {
        self.run = None;
        self.revealed = self.total;
        self.state = TypewriterState::Finished;
        emit(TypewriterEvent::End(id));
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn typewriter() -> Typewriter {
        Typewriter::new()
    }

    /// Indices of the `CharacterRevealed` events in `events`.
    fn revealed_indices(events: &[TypewriterEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                TypewriterEvent::CharacterRevealed { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Number of `End` events in `events`.
    fn ends(events: &[TypewriterEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TypewriterEvent::End(_)))
            .count()
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    #[case(f32::MIN_POSITIVE)]
    fn start_rejects_invalid_rate(mut typewriter: Typewriter, #[case] rate: f32) {
        let mut events = Vec::new();
        let res = typewriter.start(4, rate, |e| events.push(e));
        assert!(matches!(res, Err(DialogueError::InvalidRevealRate(_))));
        assert!(events.is_empty());
        assert_eq!(typewriter.state(), TypewriterState::Idle);
    }

    #[rstest]
    fn invalid_rate_leaves_running_reveal_alone(mut typewriter: Typewriter) {
        let first = typewriter.start(4, 10.0, |_| {}).unwrap();
        assert!(typewriter.start(4, 0.0, |_| {}).is_err());
        assert!(typewriter.is_running());
        assert_eq!(typewriter.run_id(), Some(first));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(12)]
    fn uninterrupted_run_reveals_every_index_in_order(
        mut typewriter: Typewriter,
        #[case] count: usize,
    ) {
        let mut events = Vec::new();
        typewriter.start(count, 10.0, |e| events.push(e)).unwrap();

        let mut frames = 0;
        while typewriter.is_running() && frames < 1000 {
            typewriter.tick(Duration::from_millis(16), |e| events.push(e));
            frames += 1;
        }

        assert!(matches!(events.first(), Some(TypewriterEvent::Begin(_))));
        assert!(matches!(events.last(), Some(TypewriterEvent::End(_))));
        assert_eq!(revealed_indices(&events), (0..count).collect::<Vec<_>>());
        assert_eq!(ends(&events), 1);
        assert_eq!(typewriter.state(), TypewriterState::Finished);
        assert_eq!(typewriter.revealed(), count);
    }

    #[rstest]
    fn empty_text_ends_on_start(mut typewriter: Typewriter) {
        let mut events = Vec::new();
        let id = typewriter.start(0, 5.0, |e| events.push(e)).unwrap();
        assert_eq!(
            events,
            vec![TypewriterEvent::Begin(id), TypewriterEvent::End(id)]
        );
        assert_eq!(typewriter.state(), TypewriterState::Finished);
    }

    #[rstest]
    fn five_characters_at_ten_per_second(mut typewriter: Typewriter) {
        let mut events = Vec::new();
        typewriter.start(5, 10.0, |e| events.push(e)).unwrap();

        typewriter.tick(Duration::from_millis(450), |e| events.push(e));
        assert!(typewriter.is_running());
        assert_eq!(typewriter.revealed(), 4);

        typewriter.tick(Duration::from_millis(150), |e| events.push(e));
        assert_eq!(typewriter.state(), TypewriterState::Finished);
        assert_eq!(typewriter.revealed(), 5);
        assert_eq!(revealed_indices(&events).len(), 5);
        assert_eq!(ends(&events), 1);
    }

    #[rstest]
    #[case(7, 7.0, Duration::from_secs(1))]
    #[case(7, 7.0, Duration::from_nanos(1_000_000_020))]
    #[case(3, 3.0, Duration::from_secs(1))]
    #[case(100, 30.0, Duration::from_nanos(3_333_333_334))]
    fn run_lasts_count_over_rate(
        mut typewriter: Typewriter,
        #[case] count: usize,
        #[case] rate: f32,
        #[case] length: Duration,
    ) {
        typewriter.start(count, rate, |_| {}).unwrap();
        typewriter.tick(length, |_| {});
        assert_eq!(typewriter.state(), TypewriterState::Finished);
        assert_eq!(typewriter.revealed(), count);
    }

    #[rstest]
    fn small_frames_do_not_drift(mut typewriter: Typewriter) {
        typewriter.start(7, 7.0, |_| {}).unwrap();
        for _ in 0..999 {
            typewriter.tick(Duration::from_millis(1), |_| {});
        }
        assert!(typewriter.is_running());
        assert_eq!(typewriter.revealed(), 6);

        typewriter.tick(Duration::from_millis(1), |_| {});
        assert_eq!(typewriter.state(), TypewriterState::Finished);
        assert_eq!(typewriter.revealed(), 7);
    }

    #[rstest]
    fn one_long_frame_finishes_the_run(mut typewriter: Typewriter) {
        let mut events = Vec::new();
        typewriter.start(8, 4.0, |e| events.push(e)).unwrap();
        typewriter.tick(Duration::from_secs(10), |e| events.push(e));
        assert_eq!(typewriter.state(), TypewriterState::Finished);
        assert_eq!(revealed_indices(&events), (0..8).collect::<Vec<_>>());
    }

    #[rstest]
    fn skip_reveals_everything_and_stops_the_run(mut typewriter: Typewriter) {
        let mut events = Vec::new();
        let id = typewriter.start(10, 5.0, |e| events.push(e)).unwrap();
        typewriter.tick(Duration::from_millis(250), |e| events.push(e));
        assert_eq!(typewriter.revealed(), 1);

        events.clear();
        assert!(typewriter.skip(|e| events.push(e)));
        assert_eq!(events, vec![TypewriterEvent::End(id)]);
        assert_eq!(typewriter.state(), TypewriterState::Finished);
        assert_eq!(typewriter.revealed(), 10);

        events.clear();
        typewriter.tick(Duration::from_secs(10), |e| events.push(e));
        assert!(events.is_empty());
        assert_eq!(typewriter.revealed(), 10);
    }

    #[rstest]
    fn skip_when_not_running_is_a_noop(mut typewriter: Typewriter) {
        let mut events = Vec::new();
        assert!(!typewriter.skip(|e| events.push(e)));
        assert_eq!(typewriter.state(), TypewriterState::Idle);

        typewriter.start(1, 5.0, |_| {}).unwrap();
        typewriter.tick(Duration::from_secs(1), |_| {});
        assert_eq!(typewriter.state(), TypewriterState::Finished);

        assert!(!typewriter.skip(|e| events.push(e)));
        assert!(events.is_empty());
        assert_eq!(typewriter.state(), TypewriterState::Finished);
    }

    #[rstest]
    fn restart_cancels_previous_run(mut typewriter: Typewriter) {
        let old = typewriter.start(20, 5.0, |_| {}).unwrap();
        typewriter.tick(Duration::from_millis(500), |_| {});

        let mut events = Vec::new();
        let new = typewriter.start(3, 5.0, |e| events.push(e)).unwrap();
        assert!(new > old);
        assert_eq!(typewriter.revealed(), 0);

        typewriter.tick(Duration::from_secs(5), |e| events.push(e));
        assert!(events.iter().all(|e| match e {
            TypewriterEvent::Begin(run) | TypewriterEvent::End(run) => *run == new,
            TypewriterEvent::CharacterRevealed { run, .. } => *run == new,
        }));
        assert_eq!(revealed_indices(&events), vec![0, 1, 2]);
        assert_eq!(typewriter.revealed(), 3);
    }

    #[rstest]
    fn cancel_is_silent(mut typewriter: Typewriter) {
        typewriter.start(6, 5.0, |_| {}).unwrap();
        typewriter.cancel();
        assert_eq!(typewriter.state(), TypewriterState::Idle);
        assert_eq!(typewriter.run_id(), None);

        let mut events = Vec::new();
        typewriter.tick(Duration::from_secs(5), |e| events.push(e));
        assert!(!typewriter.skip(|e| events.push(e)));
        assert!(events.is_empty());
    }
}
