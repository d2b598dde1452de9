//! Minimal fixed-rate terminal runtime for the play modes.
//!
//! Drives an [`App`] with three event kinds: `Tick` at the configured
//! rate, `Render` whenever state changed since the last draw, and raw
//! crossterm events in between.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::Frame;

/// Behavior hooks for an application run by [`Tui::run`].
pub trait App {
    /// Whether the event loop should stop.
    fn should_exit(&self) -> bool;

    /// Handles a terminal event (key input, resize, etc.).
    fn handle_event(&mut self, event: &Event);

    /// Advances game logic one tick.
    fn update(&mut self);

    /// Draws the current state.
    fn draw(&self, frame: &mut Frame);
}

enum TuiEvent {
    Tick,
    Render,
    Crossterm(Event),
}

/// Fixed-rate event loop over a raw-mode terminal.
#[derive(Debug)]
pub struct Tui {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl Tui {
    /// Creates a runtime ticking `rate` times per second.
    pub fn with_tick_rate(rate: f64) -> Self {
        Self {
            tick_interval: Duration::from_secs_f64(1.0 / rate),
            last_tick: Instant::now(),
            // First render happens before the first tick.
            dirty: true,
        }
    }

    /// Runs the application until [`App::should_exit`] returns true.
    ///
    /// Terminal setup and restore are handled by `ratatui::run`, so a
    /// panic or error still leaves the terminal usable.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.next_event()? {
                    TuiEvent::Tick => app.update(),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&event),
                }
            }
            Ok(())
        })
    }

    fn next_event(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if now.duration_since(self.last_tick) >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }
            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let next_tick_at = self.last_tick + self.tick_interval;
            let timeout = next_tick_at.saturating_duration_since(now);
            if event::poll(timeout)? {
                self.dirty = true;
                return Ok(TuiEvent::Crossterm(event::read()?));
            }
        }
    }
}
