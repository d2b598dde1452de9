use dinorush_engine::{Action, Agent, Arena};

/// One playable run: an arena and the agent moving through it.
#[derive(Debug)]
pub struct PlaySession {
    arena: Arena,
    agent: Agent,
}

impl PlaySession {
    pub fn new(high_score: u32) -> Self {
        Self {
            arena: Arena::new(high_score),
            agent: Agent::default(),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn is_over(&self) -> bool {
        self.agent.has_crashed()
    }

    pub fn high_score(&self) -> u32 {
        self.arena.high_score()
    }

    /// Advances the run one tick: agent action, world scroll, collision,
    /// reward. A finished run ignores further steps.
    pub fn step(&mut self, action: Action) {
        if self.agent.has_crashed() {
            return;
        }
        self.agent.apply_action(action);
        self.arena.tick(self.agent.body().vx());
        self.agent.check_collision(self.arena.obstacles());
        self.agent.collect_reward();
    }

    /// Starts a fresh run, carrying only the high score over.
    pub fn restart(&mut self) {
        *self = Self::new(self.arena.high_score());
    }
}
