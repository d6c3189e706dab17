//! A headless dialogue: lines come from `assets/strings/dialogue.strings.ron`,
//! are printed once revealed and "next" is pressed on a timer.

use std::time::Duration;

use bevy::{
    app::{AppExit, ScheduleRunnerPlugin},
    prelude::*,
};
use bevy_dialogue_window::prelude::*;

/// The string table holding the lines.
const TABLE: &str = "Dialogue";

/// The `(speaker, text)` entries to say, in order.
const SCRIPT: &[(&str, &str)] = &[
    ("name.guard", "guard.halt"),
    ("name.hero", "hero.traveller"),
    ("name.guard", "guard.move_along"),
];

/// Progress through [`SCRIPT`].
#[derive(Resource, Default)]
struct Script {
    /// Next line to show.
    line: usize,
    /// Closed when the shown line is dismissed.
    waiting: Option<CloseSignal>,
}

/// Stands in for the player pressing "next".
#[derive(Resource)]
struct AutoPress(Timer);

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
            AssetPlugin::default(),
            DialogueWindowPlugin {
                settings: DialogueSettings::with_rate(20.0),
            },
        ))
        .init_resource::<Script>()
        .insert_resource(AutoPress(Timer::from_seconds(0.6, TimerMode::Repeating)))
        .add_systems(Startup, (load_strings, setup_hooks))
        .add_systems(Update, (run_script, auto_press).before(DialogueSet))
        .add_systems(Update, print_lines.after(DialogueSet))
        .run();
}

/// Registers the string table the script reads from.
fn load_strings(server: Res<AssetServer>, mut tables: ResMut<StringTables>) {
    tables.load(&server, TABLE, "strings/dialogue.strings.ron");
}

/// A per-character hook, where a typing sound would go.
fn setup_hooks(mut window: ResMut<DialogueWindow>) {
    window.hooks_mut().typewriter_char.subscribe(|index| {
        if index % 5 == 0 {
            print!(".");
        }
    });
}

/// Shows the next line once the previous one is closed, like a script step waiting on the window.
fn run_script(mut script: ResMut<Script>, mut commands: Commands, mut exit: EventWriter<AppExit>) {
    if script
        .waiting
        .as_ref()
        .is_some_and(|signal| !signal.is_closed())
    {
        return;
    }
    let Some((speaker, text)) = SCRIPT.get(script.line) else {
        exit.send(AppExit);
        return;
    };
    let signal = CloseSignal::new();
    commands.show_localized_dialogue(
        LocalizedDialogue::new(
            LocalizedString::new(TABLE, *speaker),
            LocalizedString::new(TABLE, *text),
        )
        .on_close(signal.callback()),
    );
    script.waiting = Some(signal);
    script.line += 1;
}

/// Presses "next" regularly while a line is shown: the first press skips, the second one closes.
fn auto_press(
    time: Res<Time>,
    window: Res<DialogueWindow>,
    mut timer: ResMut<AutoPress>,
    mut next: EventWriter<NextRequest>,
) {
    if !window.is_open() {
        return;
    }
    if timer.0.tick(time.delta()).just_finished() {
        next.send(NextRequest);
    }
}

/// Prints each line once fully revealed.
fn print_lines(
    window: Res<DialogueWindow>,
    mut ends: EventReader<TypewriterEnd>,
    mut closed: EventReader<DialogueClosed>,
) {
    for _ in ends.read() {
        if let (Some(speaker), Some(body)) = (window.speaker(), window.body()) {
            println!("\n{speaker}: {body}");
        }
    }
    for _ in closed.read() {
        println!("---");
    }
}
