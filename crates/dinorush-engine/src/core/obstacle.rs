//! Obstacles the agent has to jump over or duck under.

use rand::{Rng, seq::IndexedRandom as _};

use super::kinematics::KinematicBody;

/// Cactus footprints, `(width, height)` pairs sampled uniformly at creation.
pub const CACTUS_DIMENSIONS: [(f32, f32); 21] = [
    (20.0, 40.0),
    (20.0, 50.0),
    (20.0, 60.0),
    (20.0, 70.0),
    (30.0, 50.0),
    (30.0, 60.0),
    (30.0, 80.0),
    (40.0, 50.0),
    (40.0, 65.0),
    (40.0, 80.0),
    (50.0, 30.0),
    (50.0, 60.0),
    (60.0, 30.0),
    (60.0, 60.0),
    (70.0, 30.0),
    (70.0, 50.0),
    (70.0, 60.0),
    (80.0, 60.0),
    (80.0, 30.0),
    (100.0, 30.0),
    (100.0, 30.0),
];

/// Bird bounding box, identical for every bird.
pub const BIRD_DIMENSIONS: (f32, f32) = (40.0, 30.0);
/// Lowest airborne bird altitude.
pub const BIRD_BASE_HEIGHT: f32 = 20.0;
/// Vertical distance between bird shelf levels.
pub const BIRD_SHELF_STRIDE: f32 = 40.0;
/// Number of shelf levels a bird can spawn on.
pub const BIRD_SHELF_COUNT: u32 = 4;

/// Tag distinguishing the two obstacle families.
///
/// Cacti sit on the ground and must be jumped. Birds hover at one of a few
/// shelf heights; low ones are ducked under or jumped, high ones fly clear
/// over a walking agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ObstacleKind {
    Cactus,
    Bird,
}

/// A single live obstacle scrolling right-to-left through the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    body: KinematicBody,
    kind: ObstacleKind,
}

impl Obstacle {
    /// Spawns a cactus at `x` with a random footprint from the catalog.
    ///
    /// `speed` is the leftward scroll speed (positive magnitude).
    pub fn cactus<R>(x: f32, speed: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let dims = *CACTUS_DIMENSIONS
            .choose(rng)
            .expect("cactus catalog is non-empty");
        Self {
            body: KinematicBody::new((x, 0.0), (-speed, 0.0), (0.0, 0.0), dims),
            kind: ObstacleKind::Cactus,
        }
    }

    /// Spawns a bird at `x` on a random shelf level.
    pub fn bird<R>(x: f32, speed: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let shelf = rng.random_range(0..BIRD_SHELF_COUNT);
        #[expect(clippy::cast_precision_loss)]
        let y = BIRD_BASE_HEIGHT + shelf as f32 * BIRD_SHELF_STRIDE;
        Self {
            body: KinematicBody::new((x, y), (-speed, 0.0), (0.0, 0.0), BIRD_DIMENSIONS),
            kind: ObstacleKind::Bird,
        }
    }

    #[must_use]
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    #[must_use]
    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.body.x()
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.body.y()
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.body.width()
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.body.height()
    }

    /// Trailing (rightmost) edge of the obstacle.
    #[must_use]
    pub fn trailing_edge(&self) -> f32 {
        self.body.x() + self.body.width()
    }

    /// Whether the obstacle has fully scrolled past the left boundary.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    /// Advances the obstacle one tick.
    ///
    /// The obstacle scrolls left by its own speed plus the agent's horizontal
    /// velocity, modeling the relative motion of an agent that accelerates
    /// across levels while staying pinned at a fixed screen position.
    pub fn advance(&mut self, agent_vx: f32) {
        let x = self.body.x() + self.body.vx() - agent_vx;
        let y = crate::core::kinematics::relu(self.body.y() + self.body.vy());
        self.body.set_position(x, y);
        self.body.advance_velocity();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn cactus_spawns_on_ground_from_catalog() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let cactus = Obstacle::cactus(800.0, 5.0, &mut rng);
            assert_eq!(cactus.y(), 0.0);
            assert!(CACTUS_DIMENSIONS.contains(&(cactus.width(), cactus.height())));
        }
    }

    #[test]
    fn bird_spawns_on_a_shelf_level() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let bird = Obstacle::bird(800.0, 5.0, &mut rng);
            let shelf = (bird.y() - BIRD_BASE_HEIGHT) / BIRD_SHELF_STRIDE;
            assert_eq!(shelf.fract(), 0.0);
            assert!((0.0..4.0).contains(&shelf));
        }
    }

    #[test]
    fn advance_scrolls_left_by_own_and_agent_velocity() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut cactus = Obstacle::cactus(800.0, 5.0, &mut rng);
        cactus.advance(2.0);
        assert_eq!(cactus.x(), 793.0);
    }

    #[test]
    fn expires_only_after_trailing_edge_passes_left_boundary() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut cactus = Obstacle::cactus(10.0, 5.0, &mut rng);
        while cactus.trailing_edge() >= 0.0 {
            assert!(!cactus.is_expired());
            cactus.advance(0.0);
        }
        assert!(cactus.is_expired());
    }
}
