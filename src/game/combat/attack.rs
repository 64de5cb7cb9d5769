// Attack variants and combo sequencing

use crate::core::math::tick_down;
use crate::game::characters::animation::SamuraiAnimation;

/// Seconds after a ground attack during which the next one continues the combo
pub const COMBO_RESET_TIME: f32 = 0.6;

/// Concrete attack the samurai performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackStrategy {
    GroundOne,
    GroundTwo,
    GroundThree,
    Air,
    Special,
}

impl AttackStrategy {
    /// Ground combo strike for a combo index. Indices outside 1..=3 wrap to
    /// the last strike.
    pub fn ground(index: u8) -> Self {
        match index {
            1 => Self::GroundOne,
            2 => Self::GroundTwo,
            _ => Self::GroundThree,
        }
    }

    /// Position in the ground combo, if this is a combo strike
    pub fn combo_index(&self) -> Option<u8> {
        match self {
            Self::GroundOne => Some(1),
            Self::GroundTwo => Some(2),
            Self::GroundThree => Some(3),
            Self::Air | Self::Special => None,
        }
    }

    /// Whether the samurai must stay planted for this attack
    pub fn is_grounded(&self) -> bool {
        !matches!(self, Self::Air)
    }

    pub fn animation(&self) -> SamuraiAnimation {
        match self {
            Self::GroundOne => SamuraiAnimation::Attack1,
            Self::GroundTwo => SamuraiAnimation::Attack2,
            Self::GroundThree => SamuraiAnimation::Attack3,
            Self::Air => SamuraiAnimation::AirAttack,
            Self::Special => SamuraiAnimation::SpecialAttack,
        }
    }

    /// Damage before power-up modifiers
    pub fn base_damage(&self) -> i32 {
        match self {
            Self::GroundOne => 10,
            Self::GroundTwo => 12,
            Self::GroundThree => 15,
            Self::Air => 12,
            Self::Special => 25,
        }
    }

    /// Fraction of the clip at which the blade connects
    pub fn impact_fraction(&self) -> f32 {
        match self {
            Self::Special => 0.6,
            _ => 0.5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GroundOne => "ATTACK_1",
            Self::GroundTwo => "ATTACK_2",
            Self::GroundThree => "ATTACK_3",
            Self::Air => "AIR_ATTACK",
            Self::Special => "SPECIAL_ATTACK",
        }
    }
}

/// Picks the next attack from grounded state and a rolling combo timer
#[derive(Debug, Clone)]
pub struct AttackCoordinator {
    reset_window: f32,
    combo_timer: f32,
    /// 0 = none, 1..=3 = last ground strike
    last_index: u8,
}

impl Default for AttackCoordinator {
    fn default() -> Self {
        Self::new(COMBO_RESET_TIME)
    }
}

impl AttackCoordinator {
    pub fn new(reset_window: f32) -> Self {
        Self {
            reset_window: reset_window.max(0.0),
            combo_timer: 0.0,
            last_index: 0,
        }
    }

    /// Strategy for an attack requested now
    pub fn request_strategy(&mut self, grounded: bool) -> AttackStrategy {
        if !grounded {
            self.reset_combo();
            return AttackStrategy::Air;
        }

        let desired = if self.combo_timer <= 0.0 || self.last_index == 0 || self.last_index >= 3 {
            1
        } else {
            self.last_index + 1
        };
        AttackStrategy::ground(desired)
    }

    pub fn on_attack_started(&mut self, strategy: AttackStrategy, grounded: bool) {
        if !grounded || strategy == AttackStrategy::Air {
            self.reset_combo();
            return;
        }
        // Special strikes leave the combo alone
        if let Some(index) = strategy.combo_index() {
            self.last_index = index;
            self.combo_timer = self.reset_window;
        }
    }

    pub fn on_attack_complete(&mut self, grounded: bool) {
        if !grounded {
            self.reset_combo();
        }
    }

    /// Advance the combo timer unless frozen (hitstop)
    pub fn tick(&mut self, dt: f32, freeze: bool) {
        if freeze || self.combo_timer <= 0.0 {
            return;
        }
        self.combo_timer = tick_down(self.combo_timer, dt);
        if self.combo_timer == 0.0 {
            self.last_index = 0;
        }
    }

    pub fn reset_combo(&mut self) {
        self.combo_timer = 0.0;
        self.last_index = 0;
    }

    pub fn combo_timer(&self) -> f32 {
        self.combo_timer
    }

    pub fn last_index(&self) -> u8 {
        self.last_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Request and start an attack the way the samurai does
    fn fire(coordinator: &mut AttackCoordinator, grounded: bool) -> AttackStrategy {
        let strategy = coordinator.request_strategy(grounded);
        coordinator.on_attack_started(strategy, grounded);
        strategy
    }

    /// Advance in small steps like the frame loop does
    fn advance(coordinator: &mut AttackCoordinator, seconds: f32) {
        let steps = (seconds / 0.01).round() as usize;
        for _ in 0..steps {
            coordinator.tick(0.01, false);
        }
    }

    #[test]
    fn test_sequence_wraps() {
        let mut coordinator = AttackCoordinator::default();
        let sequence: Vec<_> = (0..6)
            .map(|_| {
                let strategy = fire(&mut coordinator, true);
                advance(&mut coordinator, 0.2);
                strategy.combo_index()
            })
            .collect();
        assert_eq!(
            sequence,
            vec![Some(1), Some(2), Some(3), Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn test_timed_scenario() {
        // Attacks at t = 0, 0.3, 0.6, 1.5
        let mut coordinator = AttackCoordinator::default();
        let mut sequence = vec![fire(&mut coordinator, true)];
        advance(&mut coordinator, 0.3);
        sequence.push(fire(&mut coordinator, true));
        advance(&mut coordinator, 0.3);
        sequence.push(fire(&mut coordinator, true));
        advance(&mut coordinator, 0.9);
        sequence.push(fire(&mut coordinator, true));

        assert_eq!(
            sequence,
            vec![
                AttackStrategy::GroundOne,
                AttackStrategy::GroundTwo,
                AttackStrategy::GroundThree,
                AttackStrategy::GroundOne,
            ]
        );
    }

    #[test]
    fn test_timeout_restarts_combo() {
        let mut coordinator = AttackCoordinator::default();
        fire(&mut coordinator, true);
        fire(&mut coordinator, true);
        advance(&mut coordinator, COMBO_RESET_TIME + 0.05);
        assert_eq!(coordinator.last_index(), 0);
        assert_eq!(fire(&mut coordinator, true), AttackStrategy::GroundOne);
    }

    #[test]
    fn test_air_attack_resets_combo() {
        let mut coordinator = AttackCoordinator::default();
        fire(&mut coordinator, true);
        fire(&mut coordinator, true);
        assert_eq!(fire(&mut coordinator, false), AttackStrategy::Air);
        assert_eq!(coordinator.last_index(), 0);
        assert_eq!(fire(&mut coordinator, true), AttackStrategy::GroundOne);
    }

    #[test]
    fn test_airborne_completion_resets() {
        let mut coordinator = AttackCoordinator::default();
        fire(&mut coordinator, true);
        coordinator.on_attack_complete(true);
        assert_eq!(coordinator.last_index(), 1);
        coordinator.on_attack_complete(false);
        assert_eq!(coordinator.last_index(), 0);
    }

    #[test]
    fn test_freeze_holds_timer() {
        let mut coordinator = AttackCoordinator::default();
        fire(&mut coordinator, true);
        coordinator.tick(1.0, true);
        assert_eq!(coordinator.combo_timer(), COMBO_RESET_TIME);
        assert_eq!(fire(&mut coordinator, true), AttackStrategy::GroundTwo);
    }

    #[test]
    fn test_special_leaves_combo_alone() {
        let mut coordinator = AttackCoordinator::default();
        fire(&mut coordinator, true);
        coordinator.on_attack_started(AttackStrategy::Special, true);
        assert_eq!(coordinator.last_index(), 1);
        assert_eq!(fire(&mut coordinator, true), AttackStrategy::GroundTwo);
    }

    #[test]
    fn test_strategy_properties() {
        assert!(AttackStrategy::GroundOne.is_grounded());
        assert!(!AttackStrategy::Air.is_grounded());
        assert_eq!(AttackStrategy::GroundThree.base_damage(), 15);
        assert_eq!(AttackStrategy::ground(7), AttackStrategy::GroundThree);
        assert_eq!(
            AttackStrategy::Air.animation(),
            SamuraiAnimation::AirAttack
        );
    }
}
