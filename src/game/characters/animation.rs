// Animation clip timing
//
// Only clip timing lives here. Sprite sheets and frame drawing belong to the
// host renderer, which asks for `frame_index` and draws whatever it likes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Timing of a single animation clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClip {
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    /// Whether the animation loops
    pub looping: bool,
}

impl AnimationClip {
    /// Create a new animation clip
    pub fn new(frame_count: usize, frame_duration: f32, looping: bool) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frame_duration: frame_duration.max(0.0),
            looping,
        }
    }

    /// Create a looping animation
    pub fn looping(frame_count: usize, frame_duration: f32) -> Self {
        Self::new(frame_count, frame_duration, true)
    }

    /// Create a one-shot animation (plays once)
    pub fn one_shot(frame_count: usize, frame_duration: f32) -> Self {
        Self::new(frame_count, frame_duration, false)
    }

    /// Get the total duration of one animation cycle
    pub fn total_duration(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }

    /// A one-shot clip is finished once it has played through; looping clips
    /// never finish.
    pub fn is_finished(&self, time: f32) -> bool {
        !self.looping && time >= self.total_duration()
    }

    /// Frame to display `time` seconds into the clip
    pub fn frame_index(&self, time: f32) -> usize {
        if self.frame_duration <= 0.0 {
            return 0;
        }
        let frame = (time.max(0.0) / self.frame_duration) as usize;
        if self.looping {
            frame % self.frame_count
        } else {
            // Stay on last frame
            frame.min(self.frame_count - 1)
        }
    }
}

/// Clip set keyed by animation identifier
#[derive(Debug)]
pub struct AnimationLibrary<K> {
    clips: HashMap<K, AnimationClip>,
    reported_missing: RefCell<HashSet<K>>,
}

impl<K> Default for AnimationLibrary<K> {
    fn default() -> Self {
        Self {
            clips: HashMap::new(),
            reported_missing: RefCell::new(HashSet::new()),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> AnimationLibrary<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip, builder style
    pub fn with(mut self, key: K, clip: AnimationClip) -> Self {
        self.insert(key, clip);
        self
    }

    pub fn insert(&mut self, key: K, clip: AnimationClip) {
        self.clips.insert(key, clip);
    }

    pub fn get(&self, key: K) -> Option<&AnimationClip> {
        let clip = self.clips.get(&key);
        if clip.is_none() && self.reported_missing.borrow_mut().insert(key) {
            log::warn!("No animation registered for {:?}", key);
        }
        clip
    }

    pub fn contains(&self, key: K) -> bool {
        self.clips.contains_key(&key)
    }

    /// Length of a clip, zero when it is missing
    pub fn duration(&self, key: K) -> f32 {
        self.get(key).map_or(0.0, AnimationClip::total_duration)
    }

    /// True once a one-shot clip has played `time` seconds.
    /// A missing clip counts as finished so timed states never hang.
    pub fn is_finished(&self, key: K, time: f32) -> bool {
        self.get(key).map_or(true, |clip| clip.is_finished(time))
    }

    pub fn frame_index(&self, key: K, time: f32) -> usize {
        self.get(key).map_or(0, |clip| clip.frame_index(time))
    }
}

/// Animation groups of the samurai sprite set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamuraiAnimation {
    Idle,
    Run,
    Attack1,
    Attack2,
    Attack3,
    AirAttack,
    SpecialAttack,
    Jump,
    JumpTransition,
    JumpFall,
    Dash,
    WallContact,
    WallSlide,
    WallJump,
    Defend,
    Hurt,
    Death,
}

impl SamuraiAnimation {
    /// Sprite sheet name for the host renderer
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Run => "RUN",
            Self::Attack1 => "ATTACK 1",
            Self::Attack2 => "ATTACK 2",
            Self::Attack3 => "ATTACK 3",
            Self::AirAttack => "AIR ATTACK",
            Self::SpecialAttack => "SPECIAL ATTACK",
            Self::Jump => "JUMP-START",
            Self::JumpTransition => "JUMP-TRANSITION",
            Self::JumpFall => "JUMP-FALL",
            Self::Dash => "DASH",
            Self::WallContact => "WALL CONTACT",
            Self::WallSlide => "WALL SLIDE",
            Self::WallJump => "WALL JUMP",
            Self::Defend => "DEFEND",
            Self::Hurt => "HURT",
            Self::Death => "DEATH",
        }
    }
}

impl AnimationLibrary<SamuraiAnimation> {
    /// The clip set shipped with the samurai sprites
    pub fn samurai() -> Self {
        use SamuraiAnimation::*;

        Self::new()
            .with(Idle, AnimationClip::looping(10, 0.08))
            .with(Run, AnimationClip::looping(16, 0.05))
            .with(Attack1, AnimationClip::one_shot(7, 0.06))
            .with(Attack2, AnimationClip::one_shot(5, 0.06))
            .with(Attack3, AnimationClip::one_shot(8, 0.06))
            .with(AirAttack, AnimationClip::one_shot(7, 0.06))
            .with(SpecialAttack, AnimationClip::one_shot(10, 0.07))
            .with(Jump, AnimationClip::one_shot(3, 0.05))
            .with(JumpTransition, AnimationClip::one_shot(3, 0.05))
            .with(JumpFall, AnimationClip::one_shot(3, 0.06))
            .with(Dash, AnimationClip::looping(5, 0.04))
            .with(WallContact, AnimationClip::one_shot(3, 0.08))
            .with(WallSlide, AnimationClip::looping(3, 0.08))
            .with(WallJump, AnimationClip::one_shot(4, 0.06))
            .with(Defend, AnimationClip::looping(6, 0.08))
            .with(Hurt, AnimationClip::one_shot(4, 0.1))
            .with(Death, AnimationClip::one_shot(9, 0.12))
    }
}
