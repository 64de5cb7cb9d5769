// Enemy definitions and per-enemy simulation

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::core::math::{clamp, tick_down};
use crate::engine::physics::{BodyBuilder, CollisionGrid, ColliderShape, KinematicBody};
use crate::game::characters::animation::{AnimationClip, AnimationLibrary};
use crate::game::characters::health::{DamageOutcome, HealthComponent};
use crate::game::events::EnemyId;

/// Stagger after an enemy takes a non-lethal hit
const HURT_DURATION: f32 = 0.3;

/// Clip groups an enemy sprite set may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyAnimation {
    Idle,
    Fly,
    Attack,
    Hurt,
    Death,
}

/// Static description of an enemy type
#[derive(Debug)]
pub struct EnemyDefinition {
    pub id: String,
    pub max_health: i32,
    /// Radius used by melee hit tests
    pub contact_radius: f32,
    pub move_speed: f32,
    pub attack_damage: i32,
    /// Horizontal distance at which the enemy starts an attack
    pub attack_range: f32,
    /// Chase range as a multiple of `attack_range`
    pub detection_multiplier: f32,
    pub attack_cooldown: f32,
    /// Fraction of the attack clip during which the attack can connect
    pub attack_window: (f32, f32),
    pub width: f32,
    pub height: f32,
    pub animations: AnimationLibrary<EnemyAnimation>,
}

impl EnemyDefinition {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            max_health: 100,
            contact_radius: 32.0,
            move_speed: 60.0,
            attack_damage: 10,
            attack_range: 80.0,
            detection_multiplier: 4.0,
            attack_cooldown: 1.0,
            attack_window: (0.3, 0.7),
            width: 64.0,
            height: 64.0,
            animations: AnimationLibrary::new(),
        }
    }

    pub fn stats(mut self, max_health: i32, contact_radius: f32) -> Self {
        self.max_health = max_health.max(1);
        self.contact_radius = contact_radius.max(0.0);
        self
    }

    pub fn movement(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn attack(mut self, damage: i32, range: f32, cooldown: f32) -> Self {
        self.attack_damage = damage;
        self.attack_range = range;
        self.attack_cooldown = cooldown;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn animation(mut self, key: EnemyAnimation, clip: AnimationClip) -> Self {
        self.animations.insert(key, clip);
        self
    }

    /// Distance within which an idle enemy starts chasing
    pub fn detection_range(&self) -> f32 {
        self.attack_range * self.detection_multiplier
    }

    /// Length of one attack, taken from the attack clip
    pub fn attack_duration(&self) -> f32 {
        self.animations.duration(EnemyAnimation::Attack)
    }

    /// The red demon shipped with the first level
    pub fn red_deon() -> Self {
        Self::new("redDeon")
            .stats(150, 60.0)
            .movement(60.0)
            .attack(12, 80.0, 1.2)
            .size(79.0, 69.0)
            .animation(EnemyAnimation::Idle, AnimationClip::looping(6, 0.1))
            .animation(EnemyAnimation::Hurt, AnimationClip::one_shot(4, 0.08))
            .animation(EnemyAnimation::Attack, AnimationClip::looping(8, 0.08))
            .animation(EnemyAnimation::Death, AnimationClip::one_shot(10, 0.12))
            .animation(EnemyAnimation::Fly, AnimationClip::looping(6, 0.08))
    }
}

/// Enemy definitions by id, handed to the enemy manager
#[derive(Debug, Default)]
pub struct EnemyRegistry {
    definitions: HashMap<String, Rc<EnemyDefinition>>,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in enemy type
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EnemyDefinition::red_deon());
        registry
    }

    pub fn register(&mut self, definition: EnemyDefinition) {
        log::info!("Enemy type registered: {}", definition.id);
        self.definitions
            .insert(definition.id.clone(), Rc::new(definition));
    }

    pub fn get(&self, id: &str) -> Option<Rc<EnemyDefinition>> {
        self.definitions.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Behavior state of one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAi {
    Idle,
    Chase,
    Attack,
    Hurt,
    Death,
}

/// A live enemy in the roster
#[derive(Debug)]
pub struct EnemyInstance {
    id: EnemyId,
    definition: Rc<EnemyDefinition>,
    body: KinematicBody,
    health: HealthComponent,
    ai: EnemyAi,
    state_time: f32,
    hurt_timer: f32,
    attack_cooldown: f32,
    attack_connected: bool,
    facing_right: bool,
}

impl EnemyInstance {
    pub fn new(id: EnemyId, definition: Rc<EnemyDefinition>, position: Vec2) -> Self {
        let body = BodyBuilder::new()
            .position(position.x, position.y)
            .collider(ColliderShape::new(
                definition.width,
                definition.height,
                0.0,
                0.0,
            ))
            .build();
        log::info!(
            "Enemy created: {} #{} at ({}, {})",
            definition.id,
            id,
            position.x,
            position.y
        );

        Self {
            id,
            health: HealthComponent::new(definition.max_health),
            definition,
            body,
            ai: EnemyAi::Idle,
            state_time: 0.0,
            hurt_timer: 0.0,
            attack_cooldown: 0.0,
            attack_connected: false,
            facing_right: false,
        }
    }

    /// Integrate physics, then decide what to do about `target`
    pub fn update(&mut self, dt: f32, grid: Option<&CollisionGrid>, target: Vec2) {
        self.body.update(dt, grid);
        self.think(dt, target);
    }

    fn think(&mut self, dt: f32, target: Vec2) {
        self.state_time += dt;
        self.attack_cooldown = tick_down(self.attack_cooldown, dt);

        match self.ai {
            EnemyAi::Death => {
                self.body.stop_horizontal();
                return;
            }
            EnemyAi::Hurt => {
                self.hurt_timer = tick_down(self.hurt_timer, dt);
                if self.hurt_timer > 0.0 {
                    return;
                }
                self.set_ai(EnemyAi::Idle);
            }
            EnemyAi::Attack => {
                if self.state_time < self.definition.attack_duration() {
                    return;
                }
                self.attack_cooldown = self.definition.attack_cooldown;
                self.set_ai(EnemyAi::Idle);
            }
            EnemyAi::Idle | EnemyAi::Chase => {}
        }

        let dx = target.x - self.center().x;
        let distance = dx.abs();
        if distance > f32::EPSILON {
            self.facing_right = dx > 0.0;
        }

        if distance <= self.definition.attack_range {
            self.body.stop_horizontal();
            if self.attack_cooldown <= 0.0 {
                self.attack_connected = false;
                self.set_ai(EnemyAi::Attack);
            } else if self.ai != EnemyAi::Idle {
                self.set_ai(EnemyAi::Idle);
            }
        } else if distance <= self.definition.detection_range() {
            self.body
                .set_horizontal_speed(dx.signum() * self.definition.move_speed);
            if self.ai != EnemyAi::Chase {
                self.set_ai(EnemyAi::Chase);
            }
        } else {
            self.body.stop_horizontal();
            if self.ai != EnemyAi::Idle {
                self.set_ai(EnemyAi::Idle);
            }
        }
    }

    fn set_ai(&mut self, ai: EnemyAi) {
        log::debug!("{} #{}: {:?} -> {:?}", self.definition.id, self.id, self.ai, ai);
        self.ai = ai;
        self.state_time = 0.0;
    }

    /// Progress through the current attack in [0, 1]
    pub fn attack_progress(&self) -> f32 {
        let duration = self.definition.attack_duration();
        if duration <= 0.0 {
            return 1.0;
        }
        clamp(self.state_time / duration, 0.0, 1.0)
    }

    /// Damage dealt to `target` this frame, if the attack connects.
    /// Each attack connects at most once, and only inside its window.
    pub fn strike(&mut self, target: Vec2) -> Option<i32> {
        if self.ai != EnemyAi::Attack || self.attack_connected {
            return None;
        }
        let (start, end) = self.definition.attack_window;
        let progress = self.attack_progress();
        if progress < start || progress > end {
            return None;
        }
        let offset = target - self.center();
        if offset.x.abs() > self.definition.attack_range || offset.y.abs() > self.definition.height
        {
            return None;
        }
        self.attack_connected = true;
        Some(self.definition.attack_damage)
    }

    /// Apply a hit, clamping health to `[0, max]`
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        let outcome = self.health.damage(amount);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { amount, remaining } => {
                log::info!(
                    "{} took {} dmg (hp={}/{})",
                    self.definition.id,
                    amount,
                    remaining,
                    self.health.max()
                );
                self.hurt_timer = HURT_DURATION;
                self.body.stop_horizontal();
                self.set_ai(EnemyAi::Hurt);
            }
            DamageOutcome::Killed { amount } => {
                log::info!("{} took {} dmg and died", self.definition.id, amount);
                self.body.stop_horizontal();
                self.set_ai(EnemyAi::Death);
            }
        }
        outcome
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Dead and the death clip has fully played (immediately if there is none)
    pub fn is_finished(&self) -> bool {
        self.is_dead()
            && self
                .definition
                .animations
                .is_finished(EnemyAnimation::Death, self.state_time)
    }

    pub fn animation_key(&self) -> EnemyAnimation {
        match self.ai {
            EnemyAi::Idle => EnemyAnimation::Idle,
            EnemyAi::Chase => EnemyAnimation::Fly,
            EnemyAi::Attack => EnemyAnimation::Attack,
            EnemyAi::Hurt => EnemyAnimation::Hurt,
            EnemyAi::Death => EnemyAnimation::Death,
        }
    }

    pub fn animation_frame(&self) -> usize {
        self.definition
            .animations
            .frame_index(self.animation_key(), self.state_time)
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.definition.id
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn center(&self) -> Vec2 {
        self.body.aabb().center()
    }

    pub fn contact_radius(&self) -> f32 {
        self.definition.contact_radius
    }

    pub fn health(&self) -> i32 {
        self.health.current()
    }

    pub fn max_health(&self) -> i32 {
        self.health.max()
    }

    pub fn ai_state(&self) -> EnemyAi {
        self.ai
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }
}
