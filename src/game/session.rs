// Game session
//
// Owns the level grid, the samurai and the enemy roster, and runs one
// simulation step in a fixed order:
// player -> enemies -> player strike -> enemy strikes -> purge -> events.

use glam::Vec2;

use super::characters::{GameConfig, Samurai};
use super::combat::{EnemyManager, EnemyRegistry, PowerUpKind};
use super::events::{EventQueue, GameEvent};
use crate::engine::input::{Action, PlayerInput};
use crate::engine::level::{EnemySpawn, LevelSnapshot};
use crate::engine::physics::CollisionGrid;

/// Points awarded per defeated enemy
pub const SCORE_PER_KILL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
    Victory,
}

#[derive(Debug)]
pub struct GameSession {
    grid: CollisionGrid,
    player: Samurai,
    enemies: EnemyManager,
    spawns: Vec<EnemySpawn>,
    events: EventQueue,
    state: GameState,
    score: u32,
    play_time: f32,
}

impl GameSession {
    /// Build a session in the `Menu` state. Call `start_new_run` to play.
    pub fn new(config: GameConfig, snapshot: LevelSnapshot, registry: EnemyRegistry) -> Self {
        let level = &config.level;
        let grid = snapshot.build_grid(level.rows, level.cols, level.tile_size);
        let spawn = Vec2::new(
            grid.col_left(level.spawn_col),
            grid.row_bottom(level.spawn_row),
        );
        let player = Samurai::new(config.stats.clone(), config.player.clone(), spawn);

        log::info!(
            "Session created: {}x{} grid, {} enemy spawns",
            grid.rows(),
            grid.cols(),
            snapshot.enemies.len()
        );

        Self {
            grid,
            player,
            enemies: EnemyManager::new(registry),
            spawns: snapshot.enemies,
            events: EventQueue::new(),
            state: GameState::Menu,
            score: 0,
            play_time: 0.0,
        }
    }

    /// Reset score, timer, player and roster, then start playing
    pub fn start_new_run(&mut self) {
        self.score = 0;
        self.play_time = 0.0;
        self.events.clear();
        self.player.respawn();
        self.enemies.spawn_all(&self.spawns, &self.grid);
        self.set_state(GameState::Playing);
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.set_state(GameState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.set_state(GameState::Playing);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            _ => {}
        }
    }

    /// Forward one frame of input to the samurai. The host calls
    /// `input.end_frame()` afterwards.
    pub fn handle_input(&mut self, input: &PlayerInput) {
        if input.just_pressed(Action::Pause) {
            self.toggle_pause();
        }
        if self.state != GameState::Playing {
            return;
        }

        let player = &mut self.player;
        player.move_horizontal(input.horizontal());

        if input.just_pressed(Action::Jump) {
            player.jump();
        }
        if input.just_pressed(Action::Dash) {
            player.dash(input.horizontal(), input.vertical());
        }
        if input.just_pressed(Action::Attack) {
            player.attack();
        }
        if input.just_pressed(Action::SpecialAttack) {
            player.special_attack();
        }
        if input.just_pressed(Action::Defend) {
            player.start_defend();
        }
        if input.just_released(Action::Defend) {
            player.stop_defend();
        }

        for (action, kind) in [
            (Action::GrantShield, PowerUpKind::Shield),
            (Action::GrantSpeed, PowerUpKind::Speed),
            (Action::GrantWeapon, PowerUpKind::Weapon),
        ] {
            if input.just_pressed(action) {
                player.grant_power_up(kind);
            }
        }
    }

    /// Advance one simulation step. Does nothing outside `Playing`.
    pub fn update(&mut self, dt: f32) {
        let dt = if self.state == GameState::Playing {
            dt
        } else {
            0.0
        };
        if dt <= 0.0 {
            return;
        }
        self.play_time += dt;
        let first_new_event = self.events.len();

        let strike = self.player.update(dt, Some(&self.grid));
        self.enemies
            .update(dt, Some(&self.grid), self.player.center());

        if let Some(strike) = strike {
            if self.enemies.resolve_strike(&strike, &mut self.events).is_some() {
                self.player.register_hit();
            }
        }

        for (id, damage) in self.enemies.collect_strikes(self.player.center()) {
            let lost = self.player.take_damage(damage);
            log::debug!("Enemy #{} hit the samurai for {} ({} lost)", id, damage, lost);
        }

        self.enemies.purge_finished(&mut self.events);
        for event in self.player.drain_events() {
            self.events.push(event);
        }

        let mut player_died = false;
        for event in self.events.iter().skip(first_new_event) {
            match event {
                GameEvent::EnemyDefeated { .. } => self.score += SCORE_PER_KILL,
                GameEvent::PlayerDied => player_died = true,
                _ => {}
            }
        }

        if player_died {
            self.set_state(GameState::GameOver);
        } else if self.enemies.spawned_count() > 0 && self.enemies.is_empty() {
            self.set_state(GameState::Victory);
        }
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::info!("Game state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds simulated in the current run
    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    pub fn player(&self) -> &Samurai {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Samurai {
        &mut self.player
    }

    pub fn enemies(&self) -> &EnemyManager {
        &self.enemies
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::{AnimationClip, CharacterState};
    use crate::game::combat::{AttackStrategy, EnemyAi, EnemyAnimation, EnemyDefinition};

    const DT: f32 = 1.0 / 60.0;

    /// Default 16x40 level with a floor whose top is at y = 64.
    /// The samurai spawns at (64, 64).
    fn floor_snapshot(enemies: Vec<EnemySpawn>) -> LevelSnapshot {
        LevelSnapshot {
            solid: (0..40).map(|col| (14, col)).collect(),
            water: Vec::new(),
            enemies,
        }
    }

    fn spawn(enemy_id: &str, col: i32) -> EnemySpawn {
        EnemySpawn {
            enemy_id: enemy_id.to_string(),
            row: 13,
            col,
        }
    }

    /// Passive enemy with no clips; it never attacks and vanishes on death
    fn dummy() -> EnemyDefinition {
        EnemyDefinition::new("dummy")
            .stats(20, 40.0)
            .attack(0, 0.0, 1.0)
    }

    /// Hits hard at close range
    fn brute() -> EnemyDefinition {
        EnemyDefinition::new("brute")
            .stats(100, 40.0)
            .attack(200, 80.0, 1.0)
            .animation(EnemyAnimation::Attack, AnimationClip::looping(8, 0.08))
    }

    fn session_with(enemies: Vec<EnemySpawn>) -> GameSession {
        let mut registry = EnemyRegistry::with_defaults();
        registry.register(dummy());
        registry.register(brute());
        let mut session = GameSession::new(GameConfig::default(), floor_snapshot(enemies), registry);
        session.start_new_run();
        session
    }

    fn tap(session: &mut GameSession, action: Action) {
        let mut input = PlayerInput::new();
        input.press(action);
        session.handle_input(&input);
    }

    fn run(session: &mut GameSession, frames: usize) {
        let idle = PlayerInput::new();
        for _ in 0..frames {
            session.handle_input(&idle);
            session.update(DT);
        }
    }

    fn current_strategy(session: &GameSession) -> Option<AttackStrategy> {
        match session.player().state() {
            CharacterState::Attack { strategy, .. } => Some(strategy),
            _ => None,
        }
    }

    #[test]
    fn test_new_session_waits_in_menu() {
        let mut session = GameSession::new(
            GameConfig::default(),
            floor_snapshot(Vec::new()),
            EnemyRegistry::with_defaults(),
        );
        assert_eq!(session.state(), GameState::Menu);
        let before = session.player().position();
        session.update(DT);
        assert_eq!(session.player().position(), before);
        assert_eq!(session.play_time(), 0.0);
    }

    #[test]
    fn test_spawns_on_floor() {
        let mut session = session_with(vec![spawn("dummy", 10)]);
        run(&mut session, 5);
        assert_eq!(session.player().position(), Vec2::new(64.0, 64.0));
        assert!(session.player().is_grounded());
        assert_eq!(session.enemies().len(), 1);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_combo_through_input() {
        let mut session = session_with(Vec::new());
        run(&mut session, 5);

        let mut strategies = Vec::new();
        for gap in [18, 18, 54] {
            tap(&mut session, Action::Attack);
            strategies.extend(current_strategy(&session));
            session.update(DT);
            run(&mut session, gap - 1);
        }
        tap(&mut session, Action::Attack);
        strategies.extend(current_strategy(&session));

        assert_eq!(
            strategies,
            vec![
                AttackStrategy::GroundOne,
                AttackStrategy::GroundTwo,
                AttackStrategy::GroundThree,
                AttackStrategy::GroundOne,
            ]
        );
    }

    #[test]
    fn test_melee_kill_scores_and_wins() {
        let mut session = session_with(vec![spawn("dummy", 5)]);
        run(&mut session, 5);

        tap(&mut session, Action::Attack);
        run(&mut session, 30);
        let id = session.enemies().enemies().next().unwrap().id();
        assert_eq!(session.enemies().get(id).unwrap().health(), 10);
        assert_eq!(session.state(), GameState::Playing);

        tap(&mut session, Action::Attack);
        assert_eq!(current_strategy(&session), Some(AttackStrategy::GroundTwo));
        run(&mut session, 30);

        assert_eq!(session.score(), SCORE_PER_KILL);
        assert!(session.enemies().is_empty());
        assert_eq!(session.state(), GameState::Victory);

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::EnemyDefeated { id }));
        assert!(events.contains(&GameEvent::EnemyRemoved { id }));
    }

    #[test]
    fn test_player_death_ends_run() {
        let mut session = session_with(vec![spawn("brute", 4)]);
        run(&mut session, 120);

        assert_eq!(session.state(), GameState::GameOver);
        assert!(session.player().is_dead());
        let events = session.drain_events();
        let deaths = events
            .iter()
            .filter(|event| **event == GameEvent::PlayerDied)
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_defend_blocks_enemy_attack() {
        let mut session = session_with(vec![spawn("brute", 4)]);
        run(&mut session, 5);

        let mut guard = PlayerInput::new();
        guard.press(Action::Defend);
        for _ in 0..50 {
            session.handle_input(&guard);
            session.update(DT);
        }

        assert!(session.player().is_defending());
        assert_eq!(session.player().health(), 100);
        let brute = session.enemies().enemies().next().unwrap();
        assert_eq!(brute.ai_state(), EnemyAi::Idle);
        assert!(brute.attack_cooldown() > 0.0);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = session_with(Vec::new());
        run(&mut session, 5);

        tap(&mut session, Action::Pause);
        assert_eq!(session.state(), GameState::Paused);
        let position = session.player().position();
        let play_time = session.play_time();

        let mut input = PlayerInput::new();
        input.press(Action::MoveRight);
        for _ in 0..10 {
            session.handle_input(&input);
            session.update(DT);
        }
        assert_eq!(session.player().position(), position);
        assert_eq!(session.play_time(), play_time);

        tap(&mut session, Action::Pause);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_power_up_granted_from_input() {
        let mut session = session_with(Vec::new());
        tap(&mut session, Action::GrantWeapon);
        session.update(DT);
        assert_eq!(session.player().active_power_ups().len(), 1);
        assert!(session.drain_events().contains(&GameEvent::PowerUpGranted {
            kind: PowerUpKind::Weapon
        }));
    }

    #[test]
    fn test_new_run_resets_everything() {
        let mut session = session_with(vec![spawn("brute", 4)]);
        run(&mut session, 120);
        assert_eq!(session.state(), GameState::GameOver);

        session.start_new_run();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.play_time(), 0.0);
        assert!(!session.player().is_dead());
        assert_eq!(session.player().health(), 100);
        assert_eq!(session.player().position(), Vec2::new(64.0, 64.0));
        assert_eq!(session.enemies().len(), 1);
        assert!(session.drain_events().is_empty());
    }
}
