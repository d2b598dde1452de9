use std::mem;

use crossterm::event::{Event, KeyCode};
use dinorush_engine::Action;
use dinorush_training::{features::state_features, genetic::Individual};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{command::play::session::PlaySession, tui, ui::ArenaDisplay};

/// Where the agent's per-tick actions come from.
#[derive(Debug)]
enum Controller {
    /// Key presses since the last tick; none means `NoOp`.
    Keyboard { pending: Action },
    /// A trained linear-softmax policy.
    Policy { policy: Individual },
}

#[derive(Debug)]
pub struct PlayApp {
    session: PlaySession,
    controller: Controller,
    paused: bool,
    exiting: bool,
}

impl PlayApp {
    pub fn manual(high_score: u32) -> Self {
        Self::new(
            high_score,
            Controller::Keyboard {
                pending: Action::NoOp,
            },
        )
    }

    pub fn auto(policy: Individual, high_score: u32) -> Self {
        Self::new(high_score, Controller::Policy { policy })
    }

    fn new(high_score: u32, controller: Controller) -> Self {
        Self {
            session: PlaySession::new(high_score),
            controller,
            paused: false,
            exiting: false,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.session.high_score()
    }

    fn is_playing(&self) -> bool {
        !self.paused && !self.session.is_over()
    }

    fn help_text(&self) -> &'static str {
        if self.session.is_over() {
            return "Controls: R (Restart) | Q (Quit)";
        }
        if self.paused {
            return "Controls: P (Resume) | Q (Quit)";
        }
        match self.controller {
            Controller::Keyboard { .. } => {
                "Controls: ↑ Space (High Jump) | L S (Low Jump) | ↓ D (Duck) | P (Pause) | Q (Quit)"
            }
            Controller::Policy { .. } => "Controls: P (Pause) | Q (Quit)",
        }
    }
}

impl tui::App for PlayApp {
    fn should_exit(&self) -> bool {
        self.exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        match key.code {
            KeyCode::Char('q') => self.exiting = true,
            KeyCode::Char('p') if !self.session.is_over() => self.paused = !self.paused,
            KeyCode::Char('r') if self.session.is_over() => self.session.restart(),
            _ => {}
        }
        let playing = self.is_playing();
        if let Controller::Keyboard { pending } = &mut self.controller
            && playing
        {
            match key.code {
                KeyCode::Up | KeyCode::Char(' ') => *pending = Action::HighJump,
                KeyCode::Char('l' | 's') => *pending = Action::LowJump,
                KeyCode::Down | KeyCode::Char('d') => *pending = Action::Duck,
                _ => {}
            }
        }
    }

    fn update(&mut self) {
        if !self.is_playing() {
            return;
        }
        let action = match &mut self.controller {
            Controller::Keyboard { pending } => mem::replace(pending, Action::NoOp),
            Controller::Policy { policy } => {
                policy.select_action(&state_features(self.session.arena()))
            }
        };
        self.session.step(action);
    }

    fn draw(&self, frame: &mut Frame) {
        let arena_display =
            ArenaDisplay::new(self.session.arena(), self.session.agent()).paused(self.paused);
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Min(10), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(arena_display, main_area);
        frame.render_widget(help_text, help_area);
    }
}
