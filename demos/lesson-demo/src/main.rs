//! SENYAS Lesson Demo
//!
//! Runs the standard lesson catalogue in a terminal. There is no camera and
//! no model: pressing a letter or digit key holds that sign up to a simulated
//! camera, and the classifiers report whatever is being signed.
//!
//! Usage: `lesson-demo [SAVE_DIR] [CONFIG_JSON]`
//!
//! Logs go to `senyas-demo.log` in the system temp directory; set `RUST_LOG`
//! to change the level.

mod controls;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use senyas_core::InputEvent;
use senyas_recognition::DEFAULT_SEQUENCE_WINDOW;
use senyas_runtime::{scene_ids, LessonPlayer, PlayerConfig};
use senyas_test::{BoardCamera, SignBoard};

use controls::{map_key, Action, Selection};
use ui::DemoUi;

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

fn init_logging() -> DemoResult<PathBuf> {
    let path = std::env::temp_dir().join("senyas-demo.log");
    let file = File::create(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}

fn load_config(path: Option<&str>) -> DemoResult<PlayerConfig> {
    let Some(path) = path else {
        return Ok(PlayerConfig::default());
    };
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> DemoResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let log_path = init_logging()?;

    let mut config = load_config(args.get(1).map(String::as_str))?;
    // Held until exit when no save directory is given
    let scratch = match args.first() {
        Some(dir) => {
            config.save_dir = PathBuf::from(dir);
            None
        }
        None => {
            let dir = tempfile::tempdir()?;
            config.save_dir = dir.path().to_path_buf();
            Some(dir)
        }
    };
    tracing::info!(save_dir = %config.save_dir.display(), log = %log_path.display(), "lesson demo starting");

    let board = SignBoard::new();
    let recognizers = board.recognizers(DEFAULT_SEQUENCE_WINDOW);
    let camera = Box::new(BoardCamera::new(board.clone()));
    let mut player = LessonPlayer::standard(&recognizers, camera, config)?;
    player.start()?;

    let result = run(&mut player, &board).await;

    tracing::info!(stats = ?player.stats(), machine = ?player.machine_stats(), "lesson demo finished");
    drop(scratch);
    result
}

async fn run(player: &mut LessonPlayer, board: &SignBoard) -> DemoResult<()> {
    let mut ui = DemoUi::new()?;
    let mut selection = Selection::default();
    let mut scene = player.active_scene().cloned().unwrap_or_default();

    let mut interval = tokio::time::interval(player.config().tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !player.is_finished() {
        interval.tick().await;

        let typing = scene.as_str() == scene_ids::KEYBOARD;
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let buttons = controls::buttons(player.display());
            let input = match map_key(key, typing) {
                Action::Input(event) => Some(event),
                Action::Sign(label) => {
                    board.show(&label);
                    None
                }
                Action::LowerHands => {
                    board.clear();
                    None
                }
                Action::MoveSelection(delta) => selection.step(delta, &buttons),
                Action::ActivateSelected => selection.activate(&buttons),
                Action::Ignore => None,
            };
            if let Some(input) = input {
                player.queue_input(input);
            }
        }

        player.frame()?;
        if player.is_finished() {
            break;
        }

        let active = player.active_scene().cloned().unwrap_or_default();
        if active != scene {
            selection.reset();
            player.queue_input(InputEvent::Hover(None));
            scene = active;
        }
        for cue in player.drain_audio() {
            ui.audio(cue);
        }
        let signing = board.current().map(|p| p.label);
        ui.draw(
            scene.as_str(),
            player.display(),
            selection.index(),
            signing.as_deref(),
        )?;
    }
    Ok(())
}
