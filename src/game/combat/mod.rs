// Combat system
//
// Attack selection and combo timing, melee hit tests, timed power-ups and
// the enemy roster the samurai fights.

pub mod attack;
pub mod enemy;
pub mod manager;
pub mod melee;
pub mod powerup;

pub use attack::{AttackCoordinator, AttackStrategy, COMBO_RESET_TIME};
pub use enemy::{EnemyAi, EnemyAnimation, EnemyDefinition, EnemyInstance, EnemyRegistry};
pub use manager::EnemyManager;
pub use melee::{attack_point, circle_contact, first_hit, MeleeStrike};
pub use powerup::{Attributes, Modifier, PowerUpKind, PowerUpSnapshot, PowerUpStack};
