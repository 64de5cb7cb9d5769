use std::path::Path;

use anyhow::Result;
use log::info;

use samurai_core::engine::game_loop::FrameClock;
use samurai_core::engine::input::{Action, PlayerInput};
use samurai_core::engine::level::{EnemySpawn, LevelSnapshot};
use samurai_core::game::characters::{GameConfig, LevelConfig};
use samurai_core::game::combat::EnemyRegistry;
use samurai_core::game::session::{GameSession, GameState};

/// Host frame times cycled by the driver, in seconds
const FRAME_TIMES: [f32; 4] = [0.016, 0.017, 0.021, 0.012];

/// Simulated seconds before the driver gives up
const MAX_SECONDS: f32 = 30.0;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting samurai-core headless driver...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => GameConfig::load(Path::new(path)),
        None => GameConfig::default(),
    };
    let snapshot = match args.get(1) {
        Some(path) => LevelSnapshot::load_or_default(Path::new(path)),
        None => default_arena(&config.level),
    };

    let mut session = GameSession::new(config, snapshot, EnemyRegistry::with_defaults());
    session.start_new_run();

    let mut clock = FrameClock::new();
    let mut input = PlayerInput::new();
    let mut step: u64 = 0;

    for frame_time in FRAME_TIMES.iter().cycle() {
        for _ in 0..clock.begin_frame(*frame_time) {
            apply_script(&mut input, step);
            session.handle_input(&input);
            session.update(clock.fixed_timestep());
            input.end_frame();
            step += 1;
        }

        for event in session.drain_events() {
            info!("[{:>6.2}s] {}", clock.simulated_time(), event);
        }

        let finished = matches!(session.state(), GameState::GameOver | GameState::Victory);
        if finished || clock.simulated_time() >= MAX_SECONDS {
            break;
        }
    }

    let player = session.player();
    info!(
        "Run ended: {:?}, score {}, {:.2}s played, hp {}/{}, {} enemies left",
        session.state(),
        session.score(),
        session.play_time(),
        player.health(),
        player.max_health(),
        session.enemies().len()
    );

    Ok(())
}

/// Walled arena with a floor one row above the bottom and a single demon
fn default_arena(level: &LevelConfig) -> LevelSnapshot {
    let rows = level.rows as i32;
    let cols = level.cols as i32;
    let floor = rows - 2;

    let mut solid: Vec<(i32, i32)> = (0..cols).map(|col| (floor, col)).collect();
    for row in 0..floor {
        solid.push((row, 0));
        solid.push((row, cols - 1));
    }

    LevelSnapshot {
        solid,
        water: Vec::new(),
        enemies: vec![EnemySpawn {
            enemy_id: "redDeon".to_string(),
            row: floor - 1,
            col: (level.spawn_col + 8).min(cols - 2),
        }],
    }
}

/// Scripted controls: walk toward the demon, pick up the blade, then keep
/// swinging with a special strike now and then
fn apply_script(input: &mut PlayerInput, step: u64) {
    let mut held = Vec::new();
    if step < 30 {
        held.push(Action::MoveRight);
    }
    if step == 40 {
        held.push(Action::GrantWeapon);
    }
    if step >= 60 && step % 20 == 0 {
        if step % 100 == 0 {
            held.push(Action::SpecialAttack);
        } else {
            held.push(Action::Attack);
        }
    }

    for action in Action::ALL {
        if held.contains(&action) {
            input.press(action);
        } else {
            input.release(action);
        }
    }
}
