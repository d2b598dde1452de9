//! Axis-aligned bounding-box collision testing.

use super::kinematics::KinematicBody;

fn within_bounds(lower: (f32, f32), upper: (f32, f32), point: (f32, f32)) -> bool {
    (lower.0..=upper.0).contains(&point.0) && (lower.1..=upper.1).contains(&point.1)
}

fn any_corner_inside(container: &KinematicBody, other: &KinematicBody) -> bool {
    let lower = container.lower_left();
    let upper = container.upper_right();
    [
        other.lower_left(),
        other.upper_left(),
        other.lower_right(),
        other.upper_right(),
    ]
    .into_iter()
    .any(|corner| within_bounds(lower, upper, corner))
}

/// Tests whether two rectangular bodies overlap.
///
/// Each body's four corners are tested against the other's enclosing
/// rectangle. The test runs in both directions so that full containment of
/// either rectangle inside the other is detected, not just edge overlap.
#[must_use]
pub fn bodies_collide(a: &KinematicBody, b: &KinematicBody) -> bool {
    any_corner_inside(a, b) || any_corner_inside(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, width: f32, height: f32) -> KinematicBody {
        KinematicBody::new((x, y), (0.0, 0.0), (0.0, 0.0), (width, height))
    }

    #[test]
    fn disjoint_rectangles_do_not_collide() {
        let agent = body(0.0, 0.0, 40.0, 80.0);
        let obstacle = body(100.0, 0.0, 20.0, 40.0);
        assert!(!bodies_collide(&agent, &obstacle));
    }

    #[test]
    fn overlapping_rectangles_collide() {
        let agent = body(0.0, 0.0, 40.0, 80.0);
        let obstacle = body(20.0, 0.0, 20.0, 40.0);
        assert!(bodies_collide(&agent, &obstacle));
    }

    #[test]
    fn containment_is_detected_in_both_directions() {
        let small = body(10.0, 10.0, 5.0, 5.0);
        let large = body(0.0, 0.0, 100.0, 100.0);
        assert!(bodies_collide(&small, &large));
        assert!(bodies_collide(&large, &small));
    }

    #[test]
    fn touching_edges_count_as_collision() {
        let agent = body(0.0, 0.0, 40.0, 80.0);
        let obstacle = body(40.0, 0.0, 20.0, 40.0);
        assert!(bodies_collide(&agent, &obstacle));
    }

    #[test]
    fn vertically_separated_rectangles_do_not_collide() {
        let ducking = body(0.0, 0.0, 80.0, 40.0);
        let high_bird = body(10.0, 60.0, 40.0, 30.0);
        assert!(!bodies_collide(&ducking, &high_bird));
    }
}
