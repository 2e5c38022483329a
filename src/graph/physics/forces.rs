use eframe::egui::{Vec2, vec2};

use super::PhysicsConfig;

/// Separation between two positions with the distance floored at
/// `min_distance`. Coincident points get a deterministic direction derived
/// from their indices so the pair can still be pushed apart.
#[derive(Clone, Copy, Debug)]
pub(super) struct Separation {
    pub(super) direction: Vec2,
    pub(super) distance: f32,
    pub(super) delta: Vec2,
}

pub(super) fn separation(a: Vec2, b: Vec2, a_index: usize, b_index: usize, min_distance: f32) -> Separation {
    let delta = a - b;
    let raw_distance = delta.length();
    let distance = raw_distance.max(min_distance);
    let direction = if raw_distance > f32::EPSILON {
        delta / raw_distance
    } else {
        let angle =
            ((a_index as f32) * 0.618_034 + (b_index as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    };

    Separation {
        direction,
        distance,
        delta,
    }
}

/// Inverse-square push on `a` away from `b`, zero beyond the cutoff.
pub(super) fn repulsion(separation: Separation, config: &PhysicsConfig) -> Vec2 {
    if separation.distance >= config.repulsion_cutoff {
        return Vec2::ZERO;
    }
    let magnitude = config.repulsion / (separation.distance * separation.distance);
    separation.direction * magnitude
}

/// Pull on `a` toward a same-category `b`, proportional to displacement.
pub(super) fn category_pull(separation: Separation, config: &PhysicsConfig) -> Vec2 {
    -separation.delta * config.category_attraction
}

/// Hookean correction on `a` along the link toward the rest length.
/// Stretched links contract, compressed ones push apart.
pub(super) fn spring(separation: Separation, config: &PhysicsConfig) -> Vec2 {
    let displacement = separation.distance - config.spring_length;
    -separation.direction * (displacement * config.spring_stiffness)
}

pub(super) fn center_gravity(position: Vec2, config: &PhysicsConfig) -> Vec2 {
    -position * config.center_gravity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_get_unit_direction() {
        let sep = separation(Vec2::ZERO, Vec2::ZERO, 0, 1, 1.0);
        assert_eq!(sep.distance, 1.0);
        assert!((sep.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn repulsion_stops_at_cutoff() {
        let config = PhysicsConfig::default();
        let near = separation(vec2(100.0, 0.0), Vec2::ZERO, 0, 1, 1.0);
        let far = separation(vec2(config.repulsion_cutoff, 0.0), Vec2::ZERO, 0, 1, 1.0);

        let push = repulsion(near, &config);
        assert!((push.x - config.repulsion / 10_000.0).abs() < 1e-6);
        assert_eq!(push.y, 0.0);
        assert_eq!(repulsion(far, &config), Vec2::ZERO);
    }

    #[test]
    fn spring_sign_follows_stretch() {
        let config = PhysicsConfig::default();
        let stretched = separation(vec2(config.spring_length * 2.0, 0.0), Vec2::ZERO, 0, 1, 1.0);
        let compressed = separation(vec2(config.spring_length * 0.5, 0.0), Vec2::ZERO, 0, 1, 1.0);

        assert!(spring(stretched, &config).x < 0.0);
        assert!(spring(compressed, &config).x > 0.0);
    }
}
