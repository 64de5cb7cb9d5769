// Game action definitions

use std::fmt;
use std::str::FromStr;

/// Represents all possible in-game actions.
///
/// Hosts translate their own keys/buttons into these; the simulation never
/// sees raw device input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    AimUp,
    AimDown,
    Jump,
    Dash,

    // Combat
    Attack,
    SpecialAttack,
    Defend,

    // Debug power-up grants
    GrantShield,
    GrantSpeed,
    GrantWeapon,

    // Meta actions
    Pause,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::AimUp,
        Action::AimDown,
        Action::Jump,
        Action::Dash,
        Action::Attack,
        Action::SpecialAttack,
        Action::Defend,
        Action::GrantShield,
        Action::GrantSpeed,
        Action::GrantWeapon,
        Action::Pause,
    ];

    /// Stable lowercase name, used by input scripts
    pub fn name(&self) -> &'static str {
        match self {
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::AimUp => "up",
            Action::AimDown => "down",
            Action::Jump => "jump",
            Action::Dash => "dash",
            Action::Attack => "attack",
            Action::SpecialAttack => "special",
            Action::Defend => "defend",
            Action::GrantShield => "shield",
            Action::GrantSpeed => "speed",
            Action::GrantWeapon => "weapon",
            Action::Pause => "pause",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an input script names an action that does not exist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.name() == wanted)
            .ok_or(UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Dash);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in Action::ALL.iter().enumerate() {
            for (j, b) in Action::ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(a.name(), b.name());
                }
            }
        }
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("jump".parse::<Action>(), Ok(Action::Jump));
        assert_eq!(" Attack ".parse::<Action>(), Ok(Action::Attack));
        assert_eq!(
            "fly".parse::<Action>(),
            Err(UnknownAction("fly".to_string()))
        );
    }
}
