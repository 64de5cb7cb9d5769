// Gameplay events
//
// Everything a host may want to react to (sound, HUD, persistent logs) is
// pushed here during `update` and drained once per frame.

use std::fmt;

use super::combat::PowerUpKind;

/// Identifier of an enemy within the active roster
pub type EnemyId = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDamaged { amount: i32, remaining: i32 },
    PlayerDied,
    EnemyDamaged { id: EnemyId, amount: i32, remaining: i32 },
    EnemyDefeated { id: EnemyId },
    EnemyRemoved { id: EnemyId },
    PowerUpGranted { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    StateChanged { from: &'static str, to: &'static str },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PlayerDamaged { amount, remaining } => {
                write!(f, "player took {} dmg (hp={})", amount, remaining)
            }
            GameEvent::PlayerDied => write!(f, "player died"),
            GameEvent::EnemyDamaged {
                id,
                amount,
                remaining,
            } => write!(f, "enemy #{} took {} dmg (hp={})", id, amount, remaining),
            GameEvent::EnemyDefeated { id } => write!(f, "enemy #{} defeated", id),
            GameEvent::EnemyRemoved { id } => write!(f, "enemy #{} removed", id),
            GameEvent::PowerUpGranted { kind } => write!(f, "{} granted", kind.display_name()),
            GameEvent::PowerUpExpired { kind } => write!(f, "{} expired", kind.display_name()),
            GameEvent::StateChanged { from, to } => write!(f, "state {} -> {}", from, to),
        }
    }
}

/// FIFO of events produced during one frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::debug!("Event: {}", event);
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Peek at pending events without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Take every pending event in the order it was pushed
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::EnemyDefeated { id: 1 });
        queue.push(GameEvent::PlayerDied);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![GameEvent::EnemyDefeated { id: 1 }, GameEvent::PlayerDied]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_display() {
        let event = GameEvent::PlayerDamaged {
            amount: 6,
            remaining: 94,
        };
        assert_eq!(event.to_string(), "player took 6 dmg (hp=94)");
        let event = GameEvent::PowerUpGranted {
            kind: PowerUpKind::Speed,
        };
        assert_eq!(event.to_string(), "Windrunner Boots granted");
    }
}
