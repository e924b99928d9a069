//! Scoring check run on every round poll.
//!
//! A carrier scores by bringing the opposing team's weapon past its own
//! scoring threshold on the capture axis: red past the positive line, blue
//! past the negative one.

use crate::actor::{Actor, ActorId};
use crate::config::MatchConfig;
use crate::engine::team::TeamColor;
use crate::world::PhysicsWorld;

/// A crossing detected this poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreHit {
    pub team: TeamColor,
    pub carrier: ActorId,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreZoneEvaluator {
    red_threshold_x: f32,
    blue_threshold_x: f32,
}

impl ScoreZoneEvaluator {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            red_threshold_x: config.red_score_x,
            blue_threshold_x: config.blue_score_x,
        }
    }

    /// Find the first actor carrying the opposing weapon across its scoring
    /// line. At most one hit is reported per poll; the reset that follows
    /// invalidates every other carrier anyway.
    pub fn check<'a>(
        &self,
        actors: impl Iterator<Item = &'a Actor>,
        physics: &dyn PhysicsWorld,
    ) -> Option<ScoreHit> {
        for actor in actors {
            let Some(team) = actor.team else {
                continue;
            };
            let Some(weapon) = actor.controller.combat.weapon() else {
                continue;
            };
            if weapon.team != team.opponent() {
                continue;
            }
            // Departed bodies simply do not score
            let Some(position) = physics.position(actor.id) else {
                continue;
            };

            let crossed = match team {
                TeamColor::Red => position.x > self.red_threshold_x,
                TeamColor::Blue => position.x < self.blue_threshold_x,
            };
            if crossed {
                return Some(ScoreHit {
                    team,
                    carrier: actor.id,
                });
            }
        }
        None
    }
}
