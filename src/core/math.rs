// Math utilities and helper functions

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Advance a countdown timer by `dt`, never going below zero.
pub fn tick_down(timer: f32, dt: f32) -> f32 {
    (timer - dt).max(0.0)
}

/// Sign of a facing flag as a multiplier (1 = right, -1 = left)
pub fn facing_sign(facing_right: bool) -> f32 {
    if facing_right {
        1.0
    } else {
        -1.0
    }
}
