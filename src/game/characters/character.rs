// The playable samurai
//
// Trigger methods (`move_horizontal`, `jump`, `dash`, ...) record intent and
// switch state immediately. `update` then integrates the body against the
// grid and lets the active state react to the resolved position.

use glam::Vec2;

use super::animation::{AnimationLibrary, SamuraiAnimation};
use super::health::{DamageOutcome, HealthComponent};
use super::state::{CharacterState, CharacterStateMachine, JumpPhase};
use super::stats::{CharacterStats, PlayerConfig};
use crate::core::math::{facing_sign, tick_down};
use crate::engine::physics::{BodyBuilder, CollisionGrid, KinematicBody};
use crate::game::combat::{
    attack_point, AttackCoordinator, AttackStrategy, Attributes, MeleeStrike, PowerUpKind,
    PowerUpSnapshot, PowerUpStack,
};
use crate::game::events::{EventQueue, GameEvent};

/// Direction components smaller than this count as neutral
const DIRECTION_DEADZONE: f32 = 0.01;

#[derive(Debug)]
pub struct Samurai {
    body: KinematicBody,
    stats: CharacterStats,
    config: PlayerConfig,
    state_machine: CharacterStateMachine,
    animations: AnimationLibrary<SamuraiAnimation>,
    combo: AttackCoordinator,
    health: HealthComponent,
    power_ups: PowerUpStack,
    /// Outbox drained by the session once per frame
    events: EventQueue,

    spawn: Vec2,
    facing_right: bool,
    jump_available: bool,
    dash_available: bool,
    was_grounded: bool,
    dash_velocity: Vec2,
    /// Remaining freeze after landing a hit
    hitstop: f32,
}

impl Samurai {
    pub fn new(stats: CharacterStats, config: PlayerConfig, spawn: Vec2) -> Self {
        let body = BodyBuilder::new()
            .position(spawn.x, spawn.y)
            .gravity(stats.gravity)
            .ground_y(config.ground_y)
            .collider(config.collider())
            .build();

        log::info!("Samurai created at ({}, {})", spawn.x, spawn.y);

        Self {
            body,
            health: HealthComponent::new(stats.max_health),
            stats,
            config,
            state_machine: CharacterStateMachine::new(),
            animations: AnimationLibrary::samurai(),
            combo: AttackCoordinator::default(),
            power_ups: PowerUpStack::new(),
            events: EventQueue::new(),
            spawn,
            facing_right: true,
            jump_available: true,
            dash_available: true,
            was_grounded: false,
            dash_velocity: Vec2::ZERO,
            hitstop: 0.0,
        }
    }

    /// Replace the clip set (timed states read their durations from it)
    pub fn with_animations(mut self, animations: AnimationLibrary<SamuraiAnimation>) -> Self {
        self.animations = animations;
        self
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    /// Horizontal input: negative = left, positive = right, 0 = stop
    pub fn move_horizontal(&mut self, direction: f32) {
        let state = self.state();
        if !state.can_move() {
            return;
        }

        if direction.abs() < DIRECTION_DEADZONE {
            self.body.stop_horizontal();
            if state == CharacterState::Run {
                self.enter(CharacterState::Idle);
            }
            return;
        }

        let sign = direction.signum();
        self.body.set_horizontal_speed(sign * self.run_speed());
        self.facing_right = sign > 0.0;
        if state == CharacterState::Idle && self.body.is_grounded() {
            self.enter(CharacterState::Run);
        }
    }

    /// Jump from the ground, or push off a wall while clinging to it
    pub fn jump(&mut self) -> bool {
        let state = self.state();
        if !state.can_jump() {
            return false;
        }
        let speed_multiplier = self.attributes().speed_multiplier;

        if state.is_on_wall() && !self.body.is_grounded() {
            let away = if self.body.is_touching_wall_left() {
                1.0
            } else if self.body.is_touching_wall_right() {
                -1.0
            } else {
                -facing_sign(self.facing_right)
            };
            self.body.set_velocity(Vec2::new(
                away * self.stats.wall_jump_speed * speed_multiplier,
                self.stats.jump_speed * speed_multiplier,
            ));
            self.facing_right = away > 0.0;
            self.enter(CharacterState::WallJump);
            return true;
        }

        if !self.jump_available || !self.body.is_grounded() {
            return false;
        }
        self.cancel_ground_attack();
        self.jump_available = false;
        self.body
            .set_vertical_velocity(self.stats.jump_speed * speed_multiplier);
        self.enter(CharacterState::Jump {
            phase: JumpPhase::Start,
            phase_time: 0.0,
        });
        true
    }

    /// Dash along `(dir_x, dir_y)`, or along facing when both are zero
    pub fn dash(&mut self, dir_x: f32, dir_y: f32) -> bool {
        if !self.dash_available || !self.state().can_jump() {
            return false;
        }

        let requested = Vec2::new(dir_x, dir_y);
        let direction = if requested.length_squared() < DIRECTION_DEADZONE * DIRECTION_DEADZONE {
            Vec2::new(facing_sign(self.facing_right), 0.0)
        } else {
            requested.normalize()
        };

        self.cancel_ground_attack();
        self.dash_available = false;
        self.dash_velocity =
            direction * self.stats.dash_speed * self.attributes().speed_multiplier;
        self.body.set_velocity(self.dash_velocity);
        // Held at a constant velocity for the whole dash
        self.body.set_gravity(0.0);
        if direction.x > DIRECTION_DEADZONE {
            self.facing_right = true;
        } else if direction.x < -DIRECTION_DEADZONE {
            self.facing_right = false;
        }
        self.enter(CharacterState::Dash {
            timer: self.stats.dash_duration,
        });
        true
    }

    /// Next combo strike on the ground, air strike otherwise
    pub fn attack(&mut self) -> bool {
        if !self.state().is_interruptible() {
            return false;
        }
        let grounded = self.body.is_grounded();
        let strategy = self.combo.request_strategy(grounded);
        self.combo.on_attack_started(strategy, grounded);
        self.begin_attack(strategy);
        true
    }

    /// Heavy strike, grounded only; the combo is left untouched
    pub fn special_attack(&mut self) -> bool {
        if !self.state().is_interruptible() || !self.body.is_grounded() {
            return false;
        }
        self.begin_attack(AttackStrategy::Special);
        true
    }

    pub fn start_defend(&mut self) -> bool {
        let state = self.state();
        if state == CharacterState::Defend
            || !state.is_interruptible()
            || !self.body.is_grounded()
        {
            return false;
        }
        self.body.stop_horizontal();
        self.enter(CharacterState::Defend);
        true
    }

    pub fn stop_defend(&mut self) -> bool {
        if self.state() != CharacterState::Defend {
            return false;
        }
        self.enter(CharacterState::Idle);
        true
    }

    pub fn grant_power_up(&mut self, kind: PowerUpKind) {
        self.power_ups.grant(kind);
        self.events.push(GameEvent::PowerUpGranted { kind });
    }

    /// Apply an incoming hit. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.health.is_dead() {
            return 0;
        }
        if self.state() == CharacterState::Defend {
            log::info!("Samurai blocked {} dmg", amount);
            return 0;
        }

        let scaled = self.attributes().incoming_damage(amount);
        let (lost, remaining) = match self.health.damage(scaled) {
            DamageOutcome::Ignored => return 0,
            DamageOutcome::Damaged { amount, remaining } => (amount, remaining),
            DamageOutcome::Killed { amount } => (amount, 0),
        };
        log::info!(
            "Samurai took {} dmg (hp={}/{})",
            lost,
            remaining,
            self.health.max()
        );
        self.events.push(GameEvent::PlayerDamaged {
            amount: lost,
            remaining,
        });

        // Lethal hits still stagger first; Hurt escalates to Death
        self.body.stop_horizontal();
        self.enter(CharacterState::Hurt {
            timer: self.stats.hurt_duration,
        });
        lost
    }

    /// Drop straight to Death regardless of health
    pub fn kill(&mut self) {
        if self.health.kill() {
            self.die();
        }
    }

    /// Reset everything and place the samurai at `position`
    pub fn revive_at(&mut self, position: Vec2) {
        self.spawn = position;
        self.body.place(position.x, position.y);
        self.body.set_gravity(self.stats.gravity);
        self.health.reset();
        self.combo.reset_combo();
        self.power_ups.clear();
        self.state_machine.reset();
        self.facing_right = true;
        self.jump_available = true;
        self.dash_available = true;
        self.was_grounded = false;
        self.dash_velocity = Vec2::ZERO;
        self.hitstop = 0.0;
        log::info!("Samurai revived at ({}, {})", position.x, position.y);
    }

    /// Revive at the last spawn point
    pub fn respawn(&mut self) {
        self.revive_at(self.spawn);
    }

    /// Called when one of our strikes connected
    pub fn register_hit(&mut self) {
        self.hitstop = self.stats.hitstop_duration;
    }

    // ------------------------------------------------------------------
    // Frame update
    // ------------------------------------------------------------------

    /// Advance one frame. Returns the strike to resolve if an attack reached
    /// its impact point this frame.
    pub fn update(&mut self, dt: f32, grid: Option<&CollisionGrid>) -> Option<MeleeStrike> {
        self.state_machine.tick(dt);

        for kind in self.power_ups.tick(dt) {
            self.events.push(GameEvent::PowerUpExpired { kind });
        }

        let frozen = self.hitstop > 0.0;
        self.hitstop = tick_down(self.hitstop, dt);
        self.combo.tick(dt, frozen);

        if self.state().is_dashing() {
            self.body.set_velocity(self.dash_velocity);
        }
        self.body.update(dt, grid);

        self.tick_dash(dt);
        self.handle_grounding();
        self.update_state(dt)
    }

    fn tick_dash(&mut self, dt: f32) {
        let CharacterState::Dash { timer } = self.state() else {
            return;
        };
        let remaining = timer - dt;
        if remaining > 0.0 {
            if let CharacterState::Dash { timer } = self.state_machine.state_mut() {
                *timer = remaining;
            }
            return;
        }

        self.body.stop_horizontal();
        if self.body.is_grounded() {
            self.restore_air_actions();
            self.enter(CharacterState::Idle);
        } else {
            self.enter(CharacterState::falling());
        }
    }

    fn handle_grounding(&mut self) {
        let grounded = self.body.is_grounded();
        if grounded && !self.was_grounded {
            self.restore_air_actions();
        }
        if !grounded && self.was_grounded {
            self.cancel_ground_attack();
        }
        self.was_grounded = grounded;

        match self.state() {
            CharacterState::Jump { .. }
            | CharacterState::WallContact
            | CharacterState::WallSlide
            | CharacterState::WallJump
                if grounded =>
            {
                self.enter(CharacterState::Idle);
            }
            CharacterState::Idle | CharacterState::Run | CharacterState::Defend if !grounded => {
                // Walked off a ledge
                self.enter(CharacterState::falling());
            }
            _ => {}
        }
    }

    fn update_state(&mut self, dt: f32) -> Option<MeleeStrike> {
        let state_time = self.state_machine.state_time();

        match self.state() {
            CharacterState::Jump { phase, phase_time } => {
                self.advance_jump(phase, phase_time + dt);
                self.check_wall_contact();
            }
            CharacterState::WallContact => {
                if !self.body.is_touching_wall() {
                    self.enter(CharacterState::falling());
                } else {
                    self.limit_wall_fall();
                    if state_time >= self.animations.duration(SamuraiAnimation::WallContact) {
                        self.enter(CharacterState::WallSlide);
                    }
                }
            }
            CharacterState::WallSlide => {
                if self.body.is_touching_wall() {
                    self.limit_wall_fall();
                } else {
                    self.enter(CharacterState::falling());
                }
            }
            CharacterState::WallJump => {
                if state_time >= self.animations.duration(SamuraiAnimation::WallJump) {
                    self.enter(CharacterState::falling());
                }
            }
            CharacterState::Attack {
                strategy,
                elapsed,
                impact_done,
            } => return self.update_attack(strategy, elapsed + dt, impact_done),
            CharacterState::Hurt { timer } => {
                let remaining = timer - dt;
                if remaining > 0.0 {
                    if let CharacterState::Hurt { timer } = self.state_machine.state_mut() {
                        *timer = remaining;
                    }
                } else if self.health.is_dead() {
                    self.die();
                } else if self.body.is_grounded() {
                    self.enter(CharacterState::Idle);
                } else {
                    self.enter(CharacterState::falling());
                }
            }
            CharacterState::Idle
            | CharacterState::Run
            | CharacterState::Dash { .. }
            | CharacterState::Defend
            | CharacterState::Death => {}
        }
        None
    }

    fn advance_jump(&mut self, phase: JumpPhase, phase_time: f32) {
        let next = match phase {
            JumpPhase::Start if phase_time >= self.animations.duration(SamuraiAnimation::Jump) => {
                Some(JumpPhase::Transition)
            }
            JumpPhase::Transition
                if phase_time >= self.animations.duration(SamuraiAnimation::JumpTransition) =>
            {
                Some(JumpPhase::Fall)
            }
            _ => None,
        };

        if let CharacterState::Jump {
            phase: current,
            phase_time: time,
        } = self.state_machine.state_mut()
        {
            match next {
                Some(next) => {
                    log::debug!("Jump phase {:?} -> {:?}", current, next);
                    *current = next;
                    *time = 0.0;
                }
                None => *time = phase_time,
            }
        }
    }

    fn check_wall_contact(&mut self) {
        if !self.body.is_grounded()
            && self.body.is_touching_wall()
            && self.body.velocity().y <= 0.0
        {
            self.enter(CharacterState::WallContact);
        }
    }

    fn limit_wall_fall(&mut self) {
        let max_fall = self.stats.wall_slide_max_fall;
        if self.body.velocity().y < -max_fall {
            self.body.set_vertical_velocity(-max_fall);
        }
    }

    fn update_attack(
        &mut self,
        strategy: AttackStrategy,
        elapsed: f32,
        impact_done: bool,
    ) -> Option<MeleeStrike> {
        let clip = strategy.animation();
        let mut strike = None;
        let mut impact_done = impact_done;
        if !impact_done && elapsed >= self.animations.duration(clip) * strategy.impact_fraction() {
            impact_done = true;
            strike = Some(self.strike(strategy));
        }

        if let CharacterState::Attack {
            elapsed: current_elapsed,
            impact_done: current_impact,
            ..
        } = self.state_machine.state_mut()
        {
            *current_elapsed = elapsed;
            *current_impact = impact_done;
        }

        if self.animations.is_finished(clip, elapsed) {
            let grounded = self.body.is_grounded();
            self.combo.on_attack_complete(grounded);
            self.enter(if grounded {
                CharacterState::Idle
            } else {
                CharacterState::falling()
            });
        }
        strike
    }

    fn strike(&self, strategy: AttackStrategy) -> MeleeStrike {
        let point = attack_point(
            self.body.aabb().center(),
            self.facing_right,
            self.stats.attack_reach,
            self.stats.attack_height,
        );
        let damage = self.attributes().outgoing_damage(strategy.base_damage());
        log::debug!("{} impact at {:?} for {} dmg", strategy.name(), point, damage);
        MeleeStrike {
            point,
            range: self.stats.attack_range,
            damage,
        }
    }

    fn begin_attack(&mut self, strategy: AttackStrategy) {
        if strategy.is_grounded() {
            self.body.stop_horizontal();
        }
        self.enter(CharacterState::Attack {
            strategy,
            elapsed: 0.0,
            impact_done: false,
        });
    }

    fn die(&mut self) {
        self.body.stop_horizontal();
        self.enter(CharacterState::Death);
        log::info!("Samurai died");
        self.events.push(GameEvent::PlayerDied);
    }

    /// Leaving the ground during a ground strike drops the combo
    fn cancel_ground_attack(&mut self) {
        if let CharacterState::Attack { strategy, .. } = self.state() {
            if strategy.is_grounded() {
                self.combo.reset_combo();
            }
        }
    }

    fn restore_air_actions(&mut self) {
        self.jump_available = true;
        self.dash_available = true;
    }

    fn enter(&mut self, state: CharacterState) {
        if self.state().is_dashing() && !state.is_dashing() {
            self.body.set_gravity(self.stats.gravity);
        }
        let (from, to) = self.state_machine.transition(state);
        self.events.push(GameEvent::StateChanged { from, to });
    }

    fn run_speed(&self) -> f32 {
        let speed = self.stats.run_speed * self.attributes().speed_multiplier;
        if self.body.is_in_water() {
            speed * self.stats.water_speed_factor
        } else {
            speed
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// Center of the collider, used as the target point for enemy attacks
    pub fn center(&self) -> Vec2 {
        self.body.aabb().center()
    }

    /// Where the renderer should draw the sprite
    pub fn render_position(&self) -> Vec2 {
        self.body.position() + Vec2::new(self.config.render_offset_x, self.config.render_offset_y)
    }

    pub fn health(&self) -> i32 {
        self.health.current()
    }

    pub fn max_health(&self) -> i32 {
        self.health.max()
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded()
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn is_defending(&self) -> bool {
        self.state() == CharacterState::Defend
    }

    pub fn is_dashing(&self) -> bool {
        self.state().is_dashing()
    }

    pub fn can_dash(&self) -> bool {
        self.dash_available
    }

    pub fn can_jump(&self) -> bool {
        self.jump_available
    }

    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }

    pub fn state_time(&self) -> f32 {
        self.state_machine.state_time()
    }

    pub fn animation_key(&self) -> SamuraiAnimation {
        self.state().animation_key()
    }

    /// Frame of the current clip, for the renderer
    pub fn animation_frame(&self) -> usize {
        let time = match self.state() {
            CharacterState::Jump { phase_time, .. } => phase_time,
            CharacterState::Attack { elapsed, .. } => elapsed,
            _ => self.state_machine.state_time(),
        };
        self.animations.frame_index(self.animation_key(), time)
    }

    pub fn attributes(&self) -> Attributes {
        self.power_ups.attributes()
    }

    pub fn active_power_ups(&self) -> Vec<PowerUpSnapshot> {
        self.power_ups.snapshots()
    }

    pub fn combo(&self) -> &AttackCoordinator {
        &self.combo
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    /// 10x20 grid with a solid floor on the bottom row (top at y = 32)
    fn floor_grid() -> CollisionGrid {
        let floor: Vec<_> = (0..20).map(|col| (9, col)).collect();
        CollisionGrid::from_masks(10, 20, 32.0, &floor, &[])
    }

    fn samurai_at(x: f32, y: f32) -> Samurai {
        Samurai::new(
            CharacterStats::default(),
            PlayerConfig::default(),
            Vec2::new(x, y),
        )
    }

    fn step(samurai: &mut Samurai, grid: &CollisionGrid, frames: usize) -> Vec<MeleeStrike> {
        (0..frames)
            .filter_map(|_| samurai.update(DT, Some(grid)))
            .collect()
    }

    fn is_falling(samurai: &Samurai) -> bool {
        matches!(
            samurai.state(),
            CharacterState::Jump {
                phase: JumpPhase::Fall,
                ..
            }
        )
    }

    fn grounded_samurai(grid: &CollisionGrid) -> Samurai {
        let mut samurai = samurai_at(100.0, 32.0);
        step(&mut samurai, grid, 2);
        samurai
    }

    #[test]
    fn test_settles_idle_on_floor() {
        let grid = floor_grid();
        let samurai = grounded_samurai(&grid);
        assert!(samurai.is_grounded());
        assert_eq!(samurai.state(), CharacterState::Idle);
        assert_relative_eq!(samurai.position().y, 32.0);
        assert_eq!(samurai.velocity().y, 0.0);
    }

    #[test]
    fn test_run_and_stop() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);

        samurai.move_horizontal(1.0);
        assert_eq!(samurai.state(), CharacterState::Run);
        assert_eq!(samurai.velocity().x, 220.0);

        samurai.move_horizontal(-1.0);
        assert!(!samurai.is_facing_right());
        assert_eq!(samurai.velocity().x, -220.0);

        samurai.move_horizontal(0.0);
        assert_eq!(samurai.state(), CharacterState::Idle);
        assert_eq!(samurai.velocity().x, 0.0);
    }

    #[test]
    fn test_jump_phases_and_landing() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);

        assert!(samurai.jump());
        assert!(!samurai.jump());
        assert_eq!(samurai.velocity().y, 620.0);
        assert_eq!(samurai.animation_key(), SamuraiAnimation::Jump);

        step(&mut samurai, &grid, 12);
        assert_eq!(samurai.animation_key(), SamuraiAnimation::JumpTransition);

        step(&mut samurai, &grid, 12);
        assert_eq!(samurai.animation_key(), SamuraiAnimation::JumpFall);

        step(&mut samurai, &grid, 60);
        assert!(samurai.is_grounded());
        assert_eq!(samurai.state(), CharacterState::Idle);
        assert!(samurai.can_jump());
    }

    #[test]
    fn test_dash_holds_speed_then_ends() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);

        assert!(samurai.dash(1.0, 0.0));
        assert!(!samurai.dash(1.0, 0.0));
        for _ in 0..10 {
            samurai.update(DT, Some(&grid));
            assert!(samurai.is_dashing());
            assert_relative_eq!(samurai.velocity().length(), 700.0, epsilon = 1e-3);
        }

        step(&mut samurai, &grid, 10);
        assert!(!samurai.is_dashing());
        assert_eq!(samurai.state(), CharacterState::Idle);
        assert_eq!(samurai.velocity().x, 0.0);
        assert!(samurai.can_dash());
    }

    #[test]
    fn test_dash_direction_is_normalized() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        assert!(samurai.dash(3.0, 4.0));
        assert_relative_eq!(samurai.velocity().x, 420.0, epsilon = 1e-3);
        assert_relative_eq!(samurai.velocity().y, 560.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_dash_uses_facing() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.move_horizontal(-1.0);
        assert!(samurai.dash(0.0, 0.0));
        assert_eq!(samurai.velocity(), Vec2::new(-700.0, 0.0));
    }

    #[test]
    fn test_air_dash_ends_falling_and_needs_landing() {
        let grid = floor_grid();
        let mut samurai = samurai_at(100.0, 200.0);
        step(&mut samurai, &grid, 1);
        assert!(is_falling(&samurai));

        assert!(samurai.dash(1.0, 0.0));
        step(&mut samurai, &grid, 20);
        assert!(is_falling(&samurai));
        assert!(!samurai.dash(1.0, 0.0));

        step(&mut samurai, &grid, 60);
        assert!(samurai.is_grounded());
        assert!(samurai.dash(1.0, 0.0));
    }

    #[test]
    fn test_walking_off_ledge_falls() {
        // Floor only under the first five columns
        let ledge: Vec<_> = (0..5).map(|col| (5, col)).collect();
        let grid = CollisionGrid::from_masks(10, 20, 32.0, &ledge, &[]);
        let mut samurai = samurai_at(73.0, 160.0);
        step(&mut samurai, &grid, 2);
        assert!(samurai.is_grounded());

        samurai.move_horizontal(1.0);
        for _ in 0..60 {
            samurai.update(DT, Some(&grid));
            if !samurai.is_grounded() {
                break;
            }
        }
        assert!(!samurai.is_grounded());
        assert!(is_falling(&samurai));
    }

    #[test]
    fn test_combo_timing_through_samurai() {
        // Attacks at t = 0, 0.3, 0.6, 1.5
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        let mut strategies = Vec::new();

        for frame in 0..=90 {
            if [0, 18, 36, 90].contains(&frame) {
                assert!(samurai.attack());
                if let CharacterState::Attack { strategy, .. } = samurai.state() {
                    strategies.push(strategy);
                }
            }
            samurai.update(DT, Some(&grid));
        }

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
    fn test_jump_out_of_ground_attack_restarts_combo() {
        // Ceiling two tiles up keeps the hop well inside the combo window
        let mut solid: Vec<_> = (0..20).map(|col| (9, col)).collect();
        solid.extend((0..20).map(|col| (5, col)));
        let grid = CollisionGrid::from_masks(10, 20, 32.0, &solid, &[]);
        let mut samurai = grounded_samurai(&grid);

        assert!(samurai.attack());
        step(&mut samurai, &grid, 1);
        assert!(samurai.jump());
        assert_eq!(samurai.combo().last_index(), 0);
        assert_eq!(samurai.combo().combo_timer(), 0.0);

        let mut frames = 0;
        loop {
            step(&mut samurai, &grid, 1);
            frames += 1;
            if samurai.is_grounded() && samurai.state() == CharacterState::Idle {
                break;
            }
            assert!(frames < 30, "never landed");
        }

        assert!(samurai.attack());
        assert!(matches!(
            samurai.state(),
            CharacterState::Attack {
                strategy: AttackStrategy::GroundOne,
                ..
            }
        ));
    }

    #[test]
    fn test_dash_out_of_ground_attack_restarts_combo() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);

        assert!(samurai.attack());
        step(&mut samurai, &grid, 1);
        assert_eq!(samurai.combo().last_index(), 1);
        assert!(samurai.dash(1.0, 0.0));
        assert_eq!(samurai.combo().last_index(), 0);
    }

    #[test]
    fn test_single_impact_per_attack() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        assert!(samurai.attack());

        let strikes = step(&mut samurai, &grid, 40);
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].damage, 10);
        assert_eq!(strikes[0].range, 38.0);
        // Facing right: the blade is in front of the collider center
        assert!(strikes[0].point.x > samurai.center().x);
        assert_eq!(samurai.state(), CharacterState::Idle);
    }

    #[test]
    fn test_weapon_boosts_strike() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.grant_power_up(PowerUpKind::Weapon);
        assert!(samurai.special_attack());
        let strikes = step(&mut samurai, &grid, 60);
        // round(25 * 1.4) + 6
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].damage, 41);
    }

    #[test]
    fn test_air_attack_when_airborne() {
        let grid = floor_grid();
        let mut samurai = samurai_at(100.0, 250.0);
        step(&mut samurai, &grid, 1);
        assert!(samurai.attack());
        assert!(matches!(
            samurai.state(),
            CharacterState::Attack {
                strategy: AttackStrategy::Air,
                ..
            }
        ));
        assert!(!samurai.special_attack());
    }

    #[test]
    fn test_damage_hurt_and_recover() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.drain_events();

        assert_eq!(samurai.take_damage(30), 30);
        assert_eq!(samurai.health(), 70);
        assert!(matches!(samurai.state(), CharacterState::Hurt { .. }));
        assert!(samurai.drain_events().contains(&GameEvent::PlayerDamaged {
            amount: 30,
            remaining: 70
        }));

        step(&mut samurai, &grid, 30);
        assert_eq!(samurai.state(), CharacterState::Idle);
    }

    #[test]
    fn test_defend_blocks_damage() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        assert!(samurai.start_defend());
        assert!(samurai.is_defending());
        assert_eq!(samurai.take_damage(30), 0);
        assert_eq!(samurai.health(), 100);
        assert!(samurai.stop_defend());
        assert_eq!(samurai.state(), CharacterState::Idle);
    }

    #[test]
    fn test_shield_scales_damage() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.grant_power_up(PowerUpKind::Shield);
        assert_eq!(samurai.take_damage(30), 18);
        assert_eq!(samurai.health(), 82);
    }

    #[test]
    fn test_lethal_hit_dies_once() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.drain_events();

        assert_eq!(samurai.take_damage(150), 100);
        assert!(samurai.is_dead());
        assert!(matches!(samurai.state(), CharacterState::Hurt { .. }));

        step(&mut samurai, &grid, 60);
        assert_eq!(samurai.state(), CharacterState::Death);
        assert_eq!(samurai.take_damage(10), 0);
        assert!(!samurai.attack());
        assert!(!samurai.jump());

        let deaths = samurai
            .drain_events()
            .into_iter()
            .filter(|event| *event == GameEvent::PlayerDied)
            .count();
        assert_eq!(deaths, 1);

        samurai.respawn();
        assert!(!samurai.is_dead());
        assert_eq!(samurai.health(), 100);
        assert_eq!(samurai.state(), CharacterState::Idle);
        assert_eq!(samurai.position(), Vec2::new(100.0, 32.0));
    }

    #[test]
    fn test_kill_goes_straight_to_death() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.kill();
        assert_eq!(samurai.state(), CharacterState::Death);
        assert_eq!(samurai.health(), 0);
    }

    #[test]
    fn test_wall_contact_slide_and_jump() {
        // Floor plus a wall at column 6 (x = 192)
        let mut solid: Vec<_> = (0..10).map(|col| (9, col)).collect();
        solid.extend((0..9).map(|row| (row, 6)));
        let grid = CollisionGrid::from_masks(10, 10, 32.0, &solid, &[]);

        // Collider right edge starts at 180
        let mut samurai = samurai_at(114.0, 200.0);
        step(&mut samurai, &grid, 1);
        samurai.move_horizontal(1.0);

        step(&mut samurai, &grid, 6);
        assert!(samurai.body().is_touching_wall_right());
        assert_eq!(samurai.state(), CharacterState::WallContact);

        step(&mut samurai, &grid, 20);
        assert_eq!(samurai.state(), CharacterState::WallSlide);
        assert!(samurai.velocity().y >= -120.0);

        assert!(samurai.jump());
        assert_eq!(samurai.state(), CharacterState::WallJump);
        assert_eq!(samurai.velocity(), Vec2::new(-260.0, 620.0));
        assert!(!samurai.is_facing_right());

        step(&mut samurai, &grid, 20);
        assert!(matches!(samurai.state(), CharacterState::Jump { .. }));
    }

    #[test]
    fn test_power_up_expiry_event() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid);
        samurai.grant_power_up(PowerUpKind::Weapon);
        assert_eq!(samurai.active_power_ups().len(), 1);

        step(&mut samurai, &grid, 601);
        assert!(samurai.active_power_ups().is_empty());
        assert!(samurai.drain_events().contains(&GameEvent::PowerUpExpired {
            kind: PowerUpKind::Weapon
        }));
    }

    #[test]
    fn test_ground_plane_without_grid() {
        let mut samurai = samurai_at(0.0, 50.0);
        for _ in 0..60 {
            samurai.update(DT, None);
        }
        assert!(samurai.is_grounded());
        assert_eq!(samurai.position().y, 0.0);
        assert_eq!(samurai.state(), CharacterState::Idle);
    }

    #[test]
    fn test_missing_clips_do_not_hang() {
        let grid = floor_grid();
        let mut samurai = grounded_samurai(&grid).with_animations(AnimationLibrary::new());
        assert!(samurai.attack());
        let strikes = step(&mut samurai, &grid, 1);
        assert_eq!(strikes.len(), 1);
        assert_eq!(samurai.state(), CharacterState::Idle);
    }
}
