// Melee hit tests
//
// A strike is a point in front of the attacker with a reach radius. It
// connects with a target when the two circles overlap.

use glam::Vec2;

/// One attack impact, ready to be tested against targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeStrike {
    /// World position of the blade
    pub point: Vec2,
    /// Radius added to the target's contact radius
    pub range: f32,
    pub damage: i32,
}

/// Blade position `reach` units in front of `origin` and `height` above it
pub fn attack_point(origin: Vec2, facing_right: bool, reach: f32, height: f32) -> Vec2 {
    let forward = if facing_right { reach } else { -reach };
    origin + Vec2::new(forward, height)
}

/// Circle-vs-circle contact: `distance² <= (radius + range)²`
pub fn circle_contact(point: Vec2, center: Vec2, radius: f32, range: f32) -> bool {
    let reach = radius + range;
    point.distance_squared(center) <= reach * reach
}

/// Index of the first target (in iteration order) the strike connects with.
/// Targets are `(center, contact_radius)` pairs.
pub fn first_hit<I>(strike: &MeleeStrike, targets: I) -> Option<usize>
where
    I: IntoIterator<Item = (Vec2, f32)>,
{
    targets
        .into_iter()
        .position(|(center, radius)| circle_contact(strike.point, center, radius, strike.range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_point_follows_facing() {
        let origin = Vec2::new(100.0, 50.0);
        assert_eq!(attack_point(origin, true, 68.0, 10.0), Vec2::new(168.0, 60.0));
        assert_eq!(attack_point(origin, false, 68.0, 10.0), Vec2::new(32.0, 60.0));
    }

    #[test]
    fn test_contact_scenario() {
        // Attacker at x=100 facing right with reach 68; enemy at x=150,
        // radius 20, attack range 38
        let point = attack_point(Vec2::new(100.0, 0.0), true, 68.0, 0.0);
        assert!(circle_contact(point, Vec2::new(150.0, 0.0), 20.0, 38.0));
        // Distance 50 from the attacker itself is still within 58
        assert!(circle_contact(
            Vec2::new(100.0, 0.0),
            Vec2::new(150.0, 0.0),
            20.0,
            38.0
        ));
    }

    #[test]
    fn test_contact_boundary() {
        let center = Vec2::new(58.0, 0.0);
        assert!(circle_contact(Vec2::ZERO, center, 20.0, 38.0));
        assert!(!circle_contact(Vec2::ZERO, Vec2::new(58.5, 0.0), 20.0, 38.0));
    }

    #[test]
    fn test_first_hit_is_single_target() {
        let strike = MeleeStrike {
            point: Vec2::ZERO,
            range: 10.0,
            damage: 10,
        };
        let targets = vec![
            (Vec2::new(500.0, 0.0), 20.0),
            (Vec2::new(15.0, 0.0), 20.0),
            (Vec2::new(5.0, 0.0), 20.0),
        ];
        assert_eq!(first_hit(&strike, targets), Some(1));
        assert_eq!(first_hit(&strike, vec![(Vec2::new(500.0, 0.0), 20.0)]), None);
    }
}
