//! Neon Arcade - headless demo host
//!
//! Drives each game through the public API the way a UI host would: a fixed
//! step loop for pong, elapsed-time ticks for snake and an online tic-tac-toe
//! match over the in-memory transport. Sounds go to the log.

#![cfg_attr(target_arch = "wasm32", allow(dead_code, unused_imports))]

use std::path::PathBuf;

use rand::Rng;

use neon_arcade::audio::{AudioSink, LogAudio};
use neon_arcade::consts::pong::{MAX_SUBSTEPS, SIM_DT};
use neon_arcade::highscores::{BestScore, JsonFileStore};
use neon_arcade::net::LoopbackHub;
use neon_arcade::pong::{self, MatchPhase, PaddleWorld, Side, TickInput};
use neon_arcade::scheduler::FixedStep;
use neon_arcade::settings::{Settings, Variant};
use neon_arcade::snake::{self, Direction, GridWorld, SnakeInput, SnakePhase};
use neon_arcade::tictactoe::{Event, TicTacToeController, heuristic, minimax};

/// Simulated frame time of the host (seconds)
const FRAME_DT: f32 = 1.0 / 60.0;
const FRAME_MS: u32 = 16;
/// Give up on a demo game after this many frames
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn data_dir() -> PathBuf {
    std::env::var_os("NEON_ARCADE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

fn run_pong(settings: &Settings, seed: u64, audio: &mut dyn AudioSink) {
    let mut world = PaddleWorld::new(seed, settings.pong_mode, settings.pong_difficulty);
    let mut clock = FixedStep::new(SIM_DT, MAX_SUBSTEPS);
    let input = TickInput {
        demo: true,
        ..Default::default()
    };

    world.start_match();
    clock.reset();
    audio.play(neon_arcade::SoundEffect::GameStart);

    for _ in 0..MAX_FRAMES {
        for _ in 0..clock.advance(FRAME_DT) {
            for event in pong::tick(&mut world, &input) {
                audio.play(event.sound(world.mode));
            }
        }
        if world.phase == MatchPhase::Over {
            break;
        }
    }

    log::info!(
        "Pong: {} - {} (winner {:?})",
        world.score(Side::Left),
        world.score(Side::Right),
        world.winner()
    );
}

/// Greedy steering toward the food that avoids walls and its own body
fn snake_autopilot(world: &GridWorld) -> Option<Direction> {
    let head = world.head()?;
    let food = world.food?;
    let mut options = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
    options.sort_by_key(|&d| {
        let next = head.step(d);
        (next.x - food.x).abs() + (next.y - food.y).abs()
    });
    options.into_iter().find(|&d| {
        let next = head.step(d);
        !d.is_opposite(&world.direction) && next.in_bounds(world.grid_size) && !world.occupies(next)
    })
}

fn run_snake(seed: u64, audio: &mut dyn AudioSink) {
    let mut store = JsonFileStore::new(data_dir().join("neon-arcade-best.json"));
    let mut best = BestScore::load(&mut store);
    let mut world = GridWorld::new(seed);

    if let Some(event) = snake::handle_input(&mut world, SnakeInput::Start) {
        audio.play(event.sound());
    }

    for _ in 0..MAX_FRAMES {
        if let Some(direction) = snake_autopilot(&world)
            && let Some(event) =
                snake::handle_input(&mut world, SnakeInput::DirectionRequested(direction))
        {
            audio.play(event.sound());
        }
        for event in snake::advance(&mut world, FRAME_MS) {
            audio.play(event.sound());
        }
        if world.phase == SnakePhase::GameOver {
            break;
        }
    }

    let new_best = best.submit(world.score, &mut store);
    log::info!(
        "Snake: score {} ({:?}), best {}{}",
        world.score,
        world.game_over_reason,
        best.best(),
        if new_best { " (new)" } else { "" }
    );
}

fn run_tictactoe(settings: &Settings, audio: &mut dyn AudioSink) {
    let hub = LoopbackHub::new();
    let mut rng = rand::rng();
    let mut host = TicTacToeController::new(settings.ttt_mode, settings.ttt_variant);
    let mut guest = TicTacToeController::new(settings.ttt_mode, settings.ttt_variant);
    let mut quiet = neon_arcade::audio::NullAudio;

    let code = match host.host_room(Box::new(hub.endpoint()), &mut rng) {
        Ok(code) => code,
        Err(e) => {
            log::error!("Could not host room: {}", e);
            return;
        }
    };
    if let Err(e) = guest.join_room(Box::new(hub.endpoint()), &code) {
        log::error!("Could not join room {}: {}", code, e);
        return;
    }

    let mut now = 0u64;
    for _ in 0..64 {
        now += u64::from(FRAME_MS);
        let _ = host.handle(Event::Tick(now), audio);
        let _ = guest.handle(Event::Tick(now), &mut quiet);
        if host.board().is_over() {
            break;
        }

        for (player, sink) in [(&mut host, &mut *audio), (&mut guest, &mut quiet as &mut dyn AudioSink)] {
            let can_move = player
                .session()
                .is_some_and(|s| s.can_move(player.board()));
            if !can_move {
                continue;
            }
            let Some(mark) = player.session().and_then(|s| s.mark()) else {
                continue;
            };
            let board = player.board();
            let choice = match board.variant() {
                Variant::Classic => minimax::best_move(board.cells(), mark),
                Variant::Infinite => heuristic::best_move(board.cells(), board.history(), mark),
            };
            if let Some(index) = choice
                && let Err(e) = player.handle(Event::MoveRequested(index), sink)
            {
                log::warn!("Move {} refused: {}", index, e);
            }
        }
    }

    log::info!(
        "Tic-tac-toe (room {}): {:?}, scores {:?}",
        code,
        host.board().outcome(),
        host.scores()
    );
    host.disconnect();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    neon_arcade::init_logging();
    log::info!("Neon Arcade (headless) starting...");

    let settings_path = data_dir().join("neon-arcade-settings.json");
    let settings = Settings::load(&settings_path).unwrap_or_else(|e| {
        log::warn!("Using default settings: {}", e);
        Settings::default()
    });
    let mut audio = LogAudio::new(settings.muted);
    let seed: u64 = rand::rng().random();
    log::info!("Seed: {}", seed);

    run_pong(&settings, seed, &mut audio);
    run_snake(seed, &mut audio);
    run_tictactoe(&settings, &mut audio);

    if let Err(e) = settings.save(&settings_path) {
        log::warn!("Could not save settings: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host links the library directly
    neon_arcade::init_logging();
}
