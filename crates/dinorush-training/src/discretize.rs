//! State discretization for the tabular Q-learner.
//!
//! Continuous arena measurements are folded into a small finite-alphabet
//! tuple so the value function fits in a hash map. Absent obstacles are
//! encoded with a `-1` sentinel rather than a far-away distance, keeping
//! "nothing in sight" a distinct state from "something far away".

use dinorush_engine::{ARENA_WIDTH, Agent, Arena, LocomotionState, Obstacle};

/// Number of distance buckets reserved for cacti (birds use the rest).
const CACTUS_DISTANCE_BUCKETS: i8 = 4;
/// Number of distance buckets for birds.
const BIRD_DISTANCE_BUCKETS: i8 = 3;

/// A discretized snapshot of the environment, used as the Q-table index.
///
/// Field alphabets: `speed` 0..3, `locomotion` 0..3, `distance` 0..7 with
/// cacti in the low buckets and birds in the high ones (`-1` when no
/// obstacle is in sight), `spacing` 0..3 (`-1` with fewer than two
/// obstacles), `width` 0..3, `height` 0..4.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct DiscreteState {
    pub speed: i8,
    pub locomotion: i8,
    pub distance: i8,
    pub spacing: i8,
    pub width: i8,
    pub height: i8,
}

/// Discretizes the current arena and agent into a Q-table index.
#[must_use]
pub fn discretize(arena: &Arena, agent: &Agent) -> DiscreteState {
    let nearest = nearest_obstacle(arena);
    DiscreteState {
        speed: speed_bucket(arena.obstacle_speed()),
        locomotion: locomotion_bucket(agent.state()),
        distance: nearest.map_or(-1, distance_bucket),
        spacing: spacing_bucket(arena),
        width: nearest.map_or(0, |o| width_bucket(o.width())),
        height: nearest.map_or(0, |o| height_bucket(o.y() + o.height())),
    }
}

/// The closest live obstacle of either kind, by leading edge.
fn nearest_obstacle(arena: &Arena) -> Option<&Obstacle> {
    match (arena.nearest_cactus(), arena.nearest_bird()) {
        (Some(c), Some(b)) => Some(if c.x() <= b.x() { c } else { b }),
        (Some(c), None) => Some(c),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Obstacle speed folded into three regimes (early, mid, late game).
fn speed_bucket(speed: f32) -> i8 {
    if speed < 6.0 {
        0
    } else if speed < 7.0 {
        1
    } else {
        2
    }
}

fn locomotion_bucket(state: LocomotionState) -> i8 {
    match state {
        LocomotionState::Walking => 0,
        LocomotionState::Jumping => 1,
        LocomotionState::Ducking => 2,
    }
}

/// Distance folded together with obstacle kind.
///
/// Cacti get four buckets (jumps must be timed precisely) in 0..4, birds
/// three coarser ones in 4..7.
fn distance_bucket(obstacle: &Obstacle) -> i8 {
    let fraction = (obstacle.x() / ARENA_WIDTH).clamp(0.0, 1.0);
    if obstacle.kind().is_cactus() {
        scale_to_bucket(fraction, CACTUS_DISTANCE_BUCKETS)
    } else {
        CACTUS_DISTANCE_BUCKETS + scale_to_bucket(fraction, BIRD_DISTANCE_BUCKETS)
    }
}

/// Gap between the two closest obstacles, in thirds of the arena width.
/// Sentinel `-1` with fewer than two live obstacles.
fn spacing_bucket(arena: &Arena) -> i8 {
    let mut edges: Vec<(f32, f32)> = arena
        .obstacles()
        .map(|o| (o.x(), o.trailing_edge()))
        .collect();
    if edges.len() < 2 {
        return -1;
    }
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));
    let gap = (edges[1].0 - edges[0].1).max(0.0);
    scale_to_bucket((gap / ARENA_WIDTH).clamp(0.0, 1.0), 3)
}

/// Obstacle width in three classes (narrow, medium, wide).
fn width_bucket(width: f32) -> i8 {
    if width < 40.0 {
        0
    } else if width < 80.0 {
        1
    } else {
        2
    }
}

/// Top edge of the obstacle in four 40-unit bands.
///
/// Low tops are jumped over, high tops are ducked under; the band decides
/// which response is viable.
fn height_bucket(top: f32) -> i8 {
    if top < 40.0 {
        0
    } else if top < 80.0 {
        1
    } else if top < 120.0 {
        2
    } else {
        3
    }
}

/// Maps a fraction in [0, 1] to a bucket in `0..buckets`.
fn scale_to_bucket(fraction: f32, buckets: i8) -> i8 {
    #[expect(clippy::cast_possible_truncation)]
    let bucket = (fraction * f32::from(buckets)) as i8;
    bucket.min(buckets - 1)
}

#[cfg(test)]
mod tests {
    use dinorush_engine::{Action, ArenaSeed};

    use super::*;

    fn empty_arena() -> Arena {
        Arena::with_seed(ArenaSeed::from_bytes([3; 16]), 0)
    }

    #[test]
    fn empty_arena_uses_sentinels() {
        let arena = empty_arena();
        let state = discretize(&arena, &Agent::default());
        assert_eq!(state.distance, -1);
        assert_eq!(state.spacing, -1);
        assert_eq!(state.speed, 0);
        assert_eq!(state.locomotion, 0);
    }

    #[test]
    fn locomotion_buckets_track_agent_state() {
        let arena = empty_arena();
        let mut agent = Agent::default();
        agent.apply_action(Action::HighJump);
        assert_eq!(discretize(&arena, &agent).locomotion, 1);
        while agent.state().is_jumping() {
            agent.apply_action(Action::NoOp);
        }
        agent.apply_action(Action::Duck);
        assert_eq!(discretize(&arena, &agent).locomotion, 2);
    }

    #[test]
    fn scale_to_bucket_covers_edges() {
        assert_eq!(scale_to_bucket(0.0, 4), 0);
        assert_eq!(scale_to_bucket(0.24, 4), 0);
        assert_eq!(scale_to_bucket(0.25, 4), 1);
        assert_eq!(scale_to_bucket(0.99, 4), 3);
        // The upper boundary stays in the last bucket.
        assert_eq!(scale_to_bucket(1.0, 4), 3);
    }

    #[test]
    fn bird_distance_buckets_sit_above_cactus_buckets() {
        let arena = populated_arena();
        let state = discretize(&arena, &Agent::default());
        assert!(state.distance >= 0);
        assert!(state.distance < CACTUS_DISTANCE_BUCKETS + BIRD_DISTANCE_BUCKETS);
        let nearest = nearest_obstacle(&arena).unwrap();
        if nearest.kind().is_bird() {
            assert!(state.distance >= CACTUS_DISTANCE_BUCKETS);
        } else {
            assert!(state.distance < CACTUS_DISTANCE_BUCKETS);
        }
    }

    #[test]
    fn all_fields_stay_within_their_alphabets() {
        let mut arena = populated_arena();
        let agent = Agent::default();
        for _ in 0..20_000 {
            arena.tick(0.0);
            let state = discretize(&arena, &agent);
            assert!((0..3).contains(&state.speed));
            assert!((0..3).contains(&state.locomotion));
            assert!((-1..7).contains(&state.distance));
            assert!((-1..3).contains(&state.spacing));
            assert!((0..3).contains(&state.width));
            assert!((0..4).contains(&state.height));
        }
    }

    fn populated_arena() -> Arena {
        let mut arena = empty_arena();
        while arena.obstacles().count() < 2 {
            arena.tick(0.0);
        }
        arena
    }
}
