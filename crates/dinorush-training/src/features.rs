//! Continuous feature extraction for the linear-softmax policies.

use dinorush_engine::{ARENA_HEIGHT, ARENA_WIDTH, Arena, Obstacle};

/// Length of the feature vector consumed by a GA policy.
pub const FEATURE_COUNT: usize = 7;

/// Extracts the feature vector for the current arena state.
///
/// All distances and sizes are normalized by the arena dimensions so every
/// feature lands in a comparable range. An absent obstacle reads as
/// maximally distant (1.0) with zero width / full height, which keeps the
/// vector length fixed. The final entry is a constant bias term.
///
/// Layout:
///
/// 1. live obstacle count
/// 2. nearest cactus distance / arena width
/// 3. nearest cactus width / arena width
/// 4. nearest bird distance / arena width
/// 5. nearest bird altitude / arena height
/// 6. current difficulty level
/// 7. bias (always 1.0)
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn state_features(arena: &Arena) -> [f32; FEATURE_COUNT] {
    let cactus = arena.nearest_cactus();
    let bird = arena.nearest_bird();

    let obstacle_count = (arena.cacti().len() + arena.birds().len()) as f32;
    let cactus_distance = cactus.map_or(ARENA_WIDTH, |c| c.x()) / ARENA_WIDTH;
    let cactus_width = cactus.map_or(0.0, Obstacle::width) / ARENA_WIDTH;
    let bird_distance = bird.map_or(ARENA_WIDTH, |b| b.x()) / ARENA_WIDTH;
    let bird_altitude = bird.map_or(ARENA_HEIGHT, Obstacle::y) / ARENA_HEIGHT;
    let level = arena.level() as f32;

    [
        obstacle_count,
        cactus_distance,
        cactus_width,
        bird_distance,
        bird_altitude,
        level,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use dinorush_engine::ArenaSeed;

    use super::*;

    fn seeded_arena(seed: u64) -> Arena {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&seed.to_be_bytes());
        Arena::with_seed(ArenaSeed::from_bytes(bytes), 0)
    }

    #[test]
    fn empty_arena_reads_maximally_distant() {
        let arena = seeded_arena(1);
        let features = state_features(&arena);
        assert_eq!(
            features,
            [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn features_stay_bounded_over_a_long_run() {
        let mut arena = seeded_arena(2);
        for _ in 0..20_000 {
            arena.tick(0.0);
            let features = state_features(&arena);
            assert_eq!(features.len(), FEATURE_COUNT);
            // Distances may briefly exceed 1.0 while an obstacle is still
            // entering at the right boundary, but never by more than the
            // widest catalog entry.
            for value in features {
                assert!(value.is_finite());
                assert!(value >= 0.0);
            }
            assert_eq!(features[FEATURE_COUNT - 1], 1.0);
        }
    }
}
