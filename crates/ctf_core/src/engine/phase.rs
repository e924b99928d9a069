//! Match lifecycle state machine.
//!
//! `AwaitingPlayers → Starting → InProgress → Ending → AwaitingPlayers`.
//! The phase machine records when each phase was entered and keeps a
//! transition log; every timer callback checks the current phase before
//! mutating anything, so a stale callback from a superseded round is a no-op.

use serde::{Deserialize, Serialize};

/// Match lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPhase {
    /// Lobby; waiting for both teams to have at least one member.
    AwaitingPlayers,
    /// Countdown running; joins and rebalancing still allowed.
    Starting,
    /// Round clock running; scoring and tagging live.
    InProgress,
    /// Result announced; full reset pending.
    Ending,
}

impl MatchPhase {
    /// Whether scoring, tagging, and power-up cycles are live.
    pub fn is_round_active(self) -> bool {
        matches!(self, MatchPhase::InProgress)
    }

    /// Whether actors may join or switch teams. Only an active round blocks
    /// joins; a join during `Ending` simply gets wiped by the reset.
    pub fn accepts_joins(self) -> bool {
        !matches!(self, MatchPhase::InProgress)
    }

    pub fn is_countdown(self) -> bool {
        matches!(self, MatchPhase::Starting)
    }
}

/// Controller for phase transitions.
#[derive(Debug)]
pub struct PhaseMachine {
    current: MatchPhase,
    entered_at_ms: u64,
    history: Vec<(u64, MatchPhase, MatchPhase)>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            current: MatchPhase::AwaitingPlayers,
            entered_at_ms: 0,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> MatchPhase {
        self.current
    }

    pub fn entered_at_ms(&self) -> u64 {
        self.entered_at_ms
    }

    pub fn history(&self) -> &[(u64, MatchPhase, MatchPhase)] {
        &self.history
    }

    /// Move to `next`, recording the transition. Same-phase transitions are
    /// ignored so repeated guards cannot pollute the log.
    pub fn transition(&mut self, next: MatchPhase, now_ms: u64) {
        if next == self.current {
            return;
        }
        log::info!("match phase {:?} -> {:?}", self.current, next);
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push((now_ms, previous, next));
        self.entered_at_ms = now_ms;
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
