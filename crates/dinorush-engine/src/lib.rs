pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
