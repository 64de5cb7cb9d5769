// Character state machine

use std::str::FromStr;

use thiserror::Error;

use super::animation::SamuraiAnimation;
use crate::game::combat::AttackStrategy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Unknown state: {0}")]
    UnknownState(String),
}

/// Sub-phase of a jump. Start and Transition are timed by their clips; Fall
/// lasts until the samurai lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpPhase {
    Start,
    Transition,
    Fall,
}

/// Represents the current state of a character
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterState {
    /// Standing still on ground
    Idle,
    /// Moving horizontally on ground
    Run,
    /// In the air after a jump, a dash or a ledge
    Jump { phase: JumpPhase, phase_time: f32 },
    /// Fixed-speed burst; `timer` is the time left
    Dash { timer: f32 },
    /// Just hit a wall while airborne
    WallContact,
    /// Sliding down a wall with capped fall speed
    WallSlide,
    /// Pushed off a wall
    WallJump,
    /// Swinging; `impact_done` is set once the blade has connected
    Attack {
        strategy: AttackStrategy,
        elapsed: f32,
        impact_done: bool,
    },
    /// Blocking; incoming hits deal nothing
    Defend,
    /// Staggered after a hit; `timer` is the time left
    Hurt { timer: f32 },
    /// Terminal until revived
    Death,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::Idle
    }
}

impl CharacterState {
    /// Airborne state entered after a dash or when walking off a ledge
    pub fn falling() -> Self {
        Self::Jump {
            phase: JumpPhase::Fall,
            phase_time: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Run => "RUN",
            Self::Jump { .. } => "JUMP",
            Self::Dash { .. } => "DASH",
            Self::WallContact => "WALL_CONTACT",
            Self::WallSlide => "WALL_SLIDE",
            Self::WallJump => "WALL_JUMP",
            Self::Attack { .. } => "ATTACK",
            Self::Defend => "DEFEND",
            Self::Hurt { .. } => "HURT",
            Self::Death => "DEATH",
        }
    }

    /// Clip the renderer should play for this state
    pub fn animation_key(&self) -> SamuraiAnimation {
        match self {
            Self::Idle => SamuraiAnimation::Idle,
            Self::Run => SamuraiAnimation::Run,
            Self::Jump { phase, .. } => match phase {
                JumpPhase::Start => SamuraiAnimation::Jump,
                JumpPhase::Transition => SamuraiAnimation::JumpTransition,
                JumpPhase::Fall => SamuraiAnimation::JumpFall,
            },
            Self::Dash { .. } => SamuraiAnimation::Dash,
            Self::WallContact => SamuraiAnimation::WallContact,
            Self::WallSlide => SamuraiAnimation::WallSlide,
            Self::WallJump => SamuraiAnimation::WallJump,
            Self::Attack { strategy, .. } => strategy.animation(),
            Self::Defend => SamuraiAnimation::Defend,
            Self::Hurt { .. } => SamuraiAnimation::Hurt,
            Self::Death => SamuraiAnimation::Death,
        }
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self, Self::Dash { .. })
    }

    pub fn is_on_wall(&self) -> bool {
        matches!(self, Self::WallContact | Self::WallSlide)
    }

    /// States an attack, special or defend may cut into
    pub fn is_interruptible(&self) -> bool {
        matches!(
            self,
            Self::Idle
                | Self::Run
                | Self::Jump { .. }
                | Self::WallContact
                | Self::WallSlide
                | Self::WallJump
                | Self::Attack { .. }
                | Self::Defend
        )
    }

    /// Check if the character accepts horizontal input
    pub fn can_move(&self) -> bool {
        match self {
            Self::Attack { strategy, .. } => !strategy.is_grounded(),
            Self::Dash { .. } | Self::WallJump | Self::Defend | Self::Hurt { .. } | Self::Death => {
                false
            }
            _ => true,
        }
    }

    /// Check if the character may start a jump or dash
    pub fn can_jump(&self) -> bool {
        !matches!(self, Self::Dash { .. } | Self::Hurt { .. } | Self::Death)
    }
}

impl FromStr for CharacterState {
    type Err = StateError;

    /// Fresh state for a state name, as reported by `name()`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let state = match s.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Self::Idle,
            "RUN" => Self::Run,
            "JUMP" => Self::Jump {
                phase: JumpPhase::Start,
                phase_time: 0.0,
            },
            "DASH" => Self::Dash { timer: 0.0 },
            "WALL_CONTACT" => Self::WallContact,
            "WALL_SLIDE" => Self::WallSlide,
            "WALL_JUMP" => Self::WallJump,
            "ATTACK" => Self::Attack {
                strategy: AttackStrategy::GroundOne,
                elapsed: 0.0,
                impact_done: false,
            },
            "DEFEND" => Self::Defend,
            "HURT" => Self::Hurt { timer: 0.0 },
            "DEATH" => Self::Death,
            _ => return Err(StateError::UnknownState(s.to_string())),
        };
        Ok(state)
    }
}

/// State machine that tracks the active state and time spent in it
#[derive(Debug)]
pub struct CharacterStateMachine {
    current_state: CharacterState,
    previous_state: CharacterState,
    state_time: f32,
}

impl Default for CharacterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: CharacterState::Idle,
            previous_state: CharacterState::Idle,
            state_time: 0.0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        self.current_state
    }

    /// Mutable access to the current state's data. Does not count as a
    /// transition, so state time keeps running.
    pub fn state_mut(&mut self) -> &mut CharacterState {
        &mut self.current_state
    }

    /// Get the previous state
    pub fn previous_state(&self) -> CharacterState {
        self.previous_state
    }

    /// Get time spent in current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Advance state time (called every frame)
    pub fn tick(&mut self, dt: f32) {
        self.state_time += dt;
    }

    /// Switch to a new state. Always resets state time, even when re-entering
    /// the same kind of state. Returns the `(from, to)` state names.
    pub fn transition(&mut self, new_state: CharacterState) -> (&'static str, &'static str) {
        let from = self.current_state.name();
        let to = new_state.name();
        log::info!("Samurai: {} -> {}", from, to);
        self.previous_state = self.current_state;
        self.current_state = new_state;
        self.state_time = 0.0;
        (from, to)
    }

    /// Switch by state name. Unknown names are logged and ignored.
    pub fn transition_named(&mut self, name: &str) -> Option<(&'static str, &'static str)> {
        match name.parse::<CharacterState>() {
            Ok(state) => Some(self.transition(state)),
            Err(e) => {
                log::error!("{}; keeping {}", e, self.current_state.name());
                None
            }
        }
    }

    /// Return to Idle with a clean history
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
