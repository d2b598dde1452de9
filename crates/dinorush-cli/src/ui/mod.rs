pub use self::arena_display::*;

mod arena_display;
