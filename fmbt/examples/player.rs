//! Music player test generation demonstration
//!
//! Generates a test that plays every action in every state of a music
//! player whose playlist can grow to four songs.
//!
//! Run with `RUST_LOG=fmbt_core=debug` to see how paths are chosen.

use fmbt::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlayerState {
    playing: bool,
    song: u32,
    songcount: u32,
}

impl State for PlayerState {
    fn render(&self) -> String {
        let desc = if self.playing { "playing" } else { "paused" };
        format!("{desc}-song-{}-of-{}", self.song, self.songcount)
    }
}

fn player_model() -> Model<PlayerState> {
    let set_state = |playing: bool, song: u32, songcount: u32| {
        move |_: &PlayerState| {
            Some(PlayerState {
                playing,
                song,
                songcount,
            })
        }
    };

    let mut model = Model::new();
    model.register(move |s: &PlayerState| {
        when(
            true,
            [
                on_action("reset").apply(set_state(false, 1, 1)),
                when(
                    s.playing,
                    [on_action("pause").apply(set_state(false, s.song, s.songcount))],
                ),
                when(
                    !s.playing,
                    [on_action("play").apply(set_state(true, s.song, s.songcount))],
                ),
                when(
                    s.song < s.songcount,
                    [on_action("nextsong").apply(set_state(s.playing, s.song + 1, s.songcount))],
                ),
                when(
                    s.song > 1,
                    [on_action("prevsong").apply(set_state(s.playing, s.song - 1, s.songcount))],
                ),
                when(
                    s.songcount < 4,
                    [on_action_with("addsong({})", [s.songcount + 1])
                        .apply(set_state(s.playing, s.song, s.songcount + 1))],
                ),
            ],
        )
    });
    model
}

fn main() -> std::result::Result<(), FmbtError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let model = player_model();

    // from every state test every action
    let mut coverer = Coverer::new();
    coverer.cover_state_actions();

    let initial = PlayerState {
        playing: false,
        song: 1,
        songcount: 1,
    };
    let config = GenerationConfig::default()
        .with_max_depth(8)
        .with_advance(Advance::MaxIncrease);
    let mut session = Session::new(&model, coverer, initial, config)?;

    let mut step_count = 0;
    while let Some(steps) = session.next_steps() {
        for step in &steps {
            step_count += 1;
            println!(
                "# {step_count}: coverage: {}, state: {}, test: {}",
                session.coverer().coverage(),
                step.start_state().render(),
                step.action()
            );
            session.record(std::slice::from_ref(step));
        }
    }

    let report = session.report();
    println!(
        "\n# final coverage: {}, steps: {}",
        report.coverage, report.steps_executed
    );
    Ok(())
}
