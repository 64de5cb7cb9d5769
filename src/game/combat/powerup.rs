// Timed power-ups and the attributes they modify
//
// Active power-ups are an ordered list. Effective attributes are folded from
// that list every time they are queried, so an expired entry simply stops
// contributing once it is dropped.

use std::fmt;

use crate::core::math::tick_down;

/// Lowest defense multiplier a shield can bring the samurai to
const MIN_DEFENSE_MULTIPLIER: f32 = 0.1;

/// Combat and movement multipliers consulted by the samurai
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes {
    pub attack_multiplier: f32,
    pub attack_bonus: i32,
    pub defense_multiplier: f32,
    pub speed_multiplier: f32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            attack_multiplier: 1.0,
            attack_bonus: 0,
            defense_multiplier: 1.0,
            speed_multiplier: 1.0,
        }
    }
}

impl Attributes {
    /// Outgoing damage for a strike of `base` damage
    pub fn outgoing_damage(&self, base: i32) -> i32 {
        (base as f32 * self.attack_multiplier).round() as i32 + self.attack_bonus
    }

    /// Incoming damage after defense, never below 1
    pub fn incoming_damage(&self, amount: i32) -> i32 {
        ((amount as f32 * self.defense_multiplier).round() as i32).max(1)
    }

    fn apply(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::AttackScale(factor) => self.attack_multiplier *= factor,
            Modifier::AttackBonus(bonus) => self.attack_bonus += bonus,
            Modifier::DefenseScale(factor) => {
                self.defense_multiplier =
                    (self.defense_multiplier * factor).max(MIN_DEFENSE_MULTIPLIER)
            }
            Modifier::SpeedScale(factor) => self.speed_multiplier *= factor,
        }
        self
    }
}

/// One change to one attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    AttackScale(f32),
    AttackBonus(i32),
    DefenseScale(f32),
    SpeedScale(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Shield,
    Speed,
    Weapon,
}

impl PowerUpKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Shield => "Aegis Shield",
            Self::Speed => "Windrunner Boots",
            Self::Weapon => "Crimson Blade",
        }
    }

    /// Seconds the power-up stays active
    pub fn duration(&self) -> f32 {
        match self {
            Self::Shield => 15.0,
            Self::Speed => 12.0,
            Self::Weapon => 10.0,
        }
    }

    pub fn modifiers(&self) -> &'static [Modifier] {
        match self {
            Self::Shield => &[Modifier::DefenseScale(0.6)],
            Self::Speed => &[Modifier::SpeedScale(1.35)],
            Self::Weapon => &[Modifier::AttackScale(1.4), Modifier::AttackBonus(6)],
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// HUD view of an active power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpSnapshot {
    pub kind: PowerUpKind,
    pub display_name: &'static str,
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy)]
struct ActivePowerUp {
    kind: PowerUpKind,
    remaining: f32,
}

/// Ordered list of active power-ups
#[derive(Debug, Clone, Default)]
pub struct PowerUpStack {
    active: Vec<ActivePowerUp>,
}

impl PowerUpStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a power-up on top of the stack. Granting the same kind twice stacks.
    pub fn grant(&mut self, kind: PowerUpKind) {
        self.active.push(ActivePowerUp {
            kind,
            remaining: kind.duration(),
        });
        log::info!(
            "Power-up applied: {} ({}s)",
            kind.display_name(),
            kind.duration()
        );
    }

    /// Count down every entry and drop the expired ones, oldest first.
    /// Returns the kinds that expired this tick.
    pub fn tick(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.active.retain_mut(|power_up| {
            power_up.remaining = tick_down(power_up.remaining, dt);
            if power_up.remaining > 0.0 {
                true
            } else {
                log::info!("Power-up removed: {}", power_up.kind.display_name());
                expired.push(power_up.kind);
                false
            }
        });
        expired
    }

    /// Attributes with every active modifier applied in grant order
    pub fn attributes(&self) -> Attributes {
        self.active
            .iter()
            .flat_map(|power_up| power_up.kind.modifiers().iter().copied())
            .fold(Attributes::default(), Attributes::apply)
    }

    pub fn snapshots(&self) -> Vec<PowerUpSnapshot> {
        self.active
            .iter()
            .map(|power_up| PowerUpSnapshot {
                kind: power_up.kind,
                display_name: power_up.kind.display_name(),
                remaining: power_up.remaining,
            })
            .collect()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|power_up| power_up.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
