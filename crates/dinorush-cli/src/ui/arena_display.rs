use dinorush_engine::{ARENA_HEIGHT, ARENA_WIDTH, Agent, Arena, Obstacle};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Widget},
};

const AGENT_STYLE: Style = Style::new().fg(Color::Cyan);
const CRASHED_AGENT_STYLE: Style = Style::new().fg(Color::Red);
const CACTUS_STYLE: Style = Style::new().fg(Color::Green);
const BIRD_STYLE: Style = Style::new().fg(Color::Magenta);
const GROUND_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Renders the arena, the agent, and the score line into a bordered box.
///
/// World coordinates (800 x 400, y up) are scaled to the drawing area and
/// flipped vertically; the widget never mutates game state.
#[derive(Debug)]
pub struct ArenaDisplay<'a> {
    arena: &'a Arena,
    agent: &'a Agent,
    paused: bool,
}

impl<'a> ArenaDisplay<'a> {
    pub fn new(arena: &'a Arena, agent: &'a Agent) -> Self {
        Self {
            arena,
            agent,
            paused: false,
        }
    }

    pub fn paused(self, paused: bool) -> Self {
        Self { paused, ..self }
    }

    fn border_color(&self) -> Color {
        if self.agent.has_crashed() {
            Color::Red
        } else if self.paused {
            Color::Yellow
        } else {
            Color::White
        }
    }
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status = format!(
            " SCORE {:04}  LEVEL {}  HI {:04} ",
            self.arena.score(),
            self.arena.level(),
            self.arena.high_score(),
        );
        let block = Block::bordered()
            .title(Line::from(" dinorush ").centered())
            .title_bottom(Line::from(status).centered())
            .border_style(Style::new().fg(self.border_color()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        for col in inner.left()..inner.right() {
            if let Some(cell) = buf.cell_mut((col, inner.bottom() - 1)) {
                cell.set_symbol("▁");
                cell.set_style(GROUND_STYLE);
            }
        }

        for obstacle in self.arena.obstacles() {
            let (symbol, style) = if obstacle.kind().is_cactus() {
                ("█", CACTUS_STYLE)
            } else {
                ("▀", BIRD_STYLE)
            };
            fill_world_rect(inner, buf, obstacle_rect(obstacle), symbol, style);
        }

        let body = self.agent.body();
        let style = if self.agent.has_crashed() {
            CRASHED_AGENT_STYLE
        } else {
            AGENT_STYLE
        };
        fill_world_rect(
            inner,
            buf,
            (body.x(), body.y(), body.width(), body.height()),
            "█",
            style,
        );
    }
}

fn obstacle_rect(obstacle: &Obstacle) -> (f32, f32, f32, f32) {
    (
        obstacle.x(),
        obstacle.y(),
        obstacle.width(),
        obstacle.height(),
    )
}

/// Fills the cells covered by a world-space rectangle, clipped to `inner`.
fn fill_world_rect(
    inner: Rect,
    buf: &mut Buffer,
    (x, y, width, height): (f32, f32, f32, f32),
    symbol: &str,
    style: Style,
) {
    let scale_x = f32::from(inner.width) / ARENA_WIDTH;
    let scale_y = f32::from(inner.height) / ARENA_HEIGHT;

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamp_col = |world_x: f32| -> u16 {
        (world_x * scale_x).clamp(0.0, f32::from(inner.width)) as u16
    };
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamp_row = |world_y: f32| -> u16 {
        // World y grows upward, terminal rows grow downward.
        (f32::from(inner.height) - world_y * scale_y).clamp(0.0, f32::from(inner.height)) as u16
    };

    let left = clamp_col(x);
    let right = clamp_col(x + width).max(left + 1).min(inner.width);
    let top = clamp_row(y + height);
    let bottom = clamp_row(y).max(top + 1).min(inner.height);

    for row in top..bottom {
        for col in left..right {
            if let Some(cell) = buf.cell_mut((inner.x + col, inner.y + row)) {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        }
    }
}
