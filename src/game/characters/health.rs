// Health tracking shared by the samurai and enemies

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead or a non-positive amount
    Ignored,
    /// Health dropped but is still above zero
    Damaged { amount: i32, remaining: i32 },
    /// This hit took the last of the health. Reported exactly once.
    /// `amount` is the health that was left, not the raw hit.
    Killed { amount: i32 },
}

/// Current/max health with a one-way dead flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthComponent {
    max: i32,
    current: i32,
    dead: bool,
}

impl HealthComponent {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            max,
            current: max,
            dead: false,
        }
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Fraction of health remaining, for health bars
    pub fn ratio(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn damage(&mut self, amount: i32) -> DamageOutcome {
        if self.dead || amount <= 0 {
            return DamageOutcome::Ignored;
        }
        let lost = amount.min(self.current);
        self.current -= lost;
        if self.current == 0 {
            self.dead = true;
            DamageOutcome::Killed { amount: lost }
        } else {
            DamageOutcome::Damaged {
                amount: lost,
                remaining: self.current,
            }
        }
    }

    /// Restore health up to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.dead || amount <= 0 {
            return 0;
        }
        let previous = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - previous
    }

    /// Returns false if already dead
    pub fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.current = 0;
        self.dead = true;
        true
    }

    pub fn reset(&mut self) {
        self.dead = false;
        self.current = self.max;
    }
}
