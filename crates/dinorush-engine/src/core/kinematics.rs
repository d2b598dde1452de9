//! Kinematic state shared by every object in the arena.
//!
//! The coordinate system has its origin at the lower left of the arena:
//! positive x points right, positive y points up, and `y == 0` is the
//! ground. Position updates apply a floor rectifier (`y' = max(0, y + vy)`)
//! so nothing ever sinks below the ground line, and any residual downward
//! velocity is cancelled the moment an object comes to rest on it. That
//! cancellation is what lets a jump terminate cleanly instead of oscillating
//! around zero.

/// Rectifies a value to the ground line.
#[inline]
#[must_use]
pub fn relu(value: f32) -> f32 {
    value.max(0.0)
}

/// Position, velocity, acceleration, and extent of a rectangular arena object.
///
/// `(x, y)` is the lower-left corner of the object's bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    ax: f32,
    ay: f32,
    width: f32,
    height: f32,
}

impl KinematicBody {
    #[must_use]
    pub fn new(position: (f32, f32), velocity: (f32, f32), acceleration: (f32, f32), dims: (f32, f32)) -> Self {
        Self {
            x: position.0,
            y: position.1,
            vx: velocity.0,
            vy: velocity.1,
            ax: acceleration.0,
            ay: acceleration.1,
            width: dims.0,
            height: dims.1,
        }
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn vx(&self) -> f32 {
        self.vx
    }

    #[must_use]
    pub fn vy(&self) -> f32 {
        self.vy
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn set_dims(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Integrates the vertical position one tick, clamping to the ground.
    ///
    /// The horizontal position is left untouched; callers decide whether the
    /// object scrolls (obstacles) or stays pinned at a fixed x (the agent).
    pub fn advance_vertical(&mut self) {
        self.y = relu(self.y + self.vy);
    }

    /// Integrates velocity one tick.
    ///
    /// Horizontal velocity is rectified so drag can never push an object
    /// backwards; vertical velocity is forced to zero while the object rests
    /// on the ground.
    pub fn advance_velocity(&mut self) {
        self.vx = relu(self.vx + self.ax);
        self.vy += self.ay;
        if self.y == 0.0 {
            self.vy = 0.0;
        }
    }

    /// Returns the lower-left corner.
    #[must_use]
    pub fn lower_left(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Returns the upper-left corner.
    #[must_use]
    pub fn upper_left(&self) -> (f32, f32) {
        (self.x, self.y + self.height)
    }

    /// Returns the lower-right corner.
    #[must_use]
    pub fn lower_right(&self) -> (f32, f32) {
        (self.x + self.width, self.y)
    }

    /// Returns the upper-right corner.
    #[must_use]
    pub fn upper_right(&self) -> (f32, f32) {
        (self.x + self.width, self.y + self.height)
    }
}
