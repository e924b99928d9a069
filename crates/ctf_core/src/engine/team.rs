//! Team rosters, capacity policy, and balancing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::world::chat_color;

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Red,
    Blue,
}

impl TeamColor {
    pub const BOTH: [TeamColor; 2] = [TeamColor::Red, TeamColor::Blue];

    pub fn opponent(self) -> Self {
        match self {
            TeamColor::Red => TeamColor::Blue,
            TeamColor::Blue => TeamColor::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TeamColor::Red => "red",
            TeamColor::Blue => "blue",
        }
    }

    /// Chat color tag matching the team.
    pub fn chat_color(self) -> &'static str {
        match self {
            TeamColor::Red => chat_color::RED,
            TeamColor::Blue => chat_color::BLUE,
        }
    }

    fn index(self) -> usize {
        match self {
            TeamColor::Red => 0,
            TeamColor::Blue => 1,
        }
    }
}

/// Where a join request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Placed on this team (possibly not the requested one).
    Joined(TeamColor),
    /// Both teams populated and the target full; actor goes to the
    /// spectator position instead.
    Spectator,
}

/// Roster membership and balancing. Does not know about phases; the match
/// controller gates joins on the current phase before calling in.
#[derive(Debug)]
pub struct TeamManager {
    rosters: [Vec<ActorId>; 2],
    capacity: usize,
}

impl TeamManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            rosters: [Vec::new(), Vec::new()],
            capacity,
        }
    }

    pub fn roster(&self, team: TeamColor) -> &[ActorId] {
        &self.rosters[team.index()]
    }

    pub fn count(&self, team: TeamColor) -> usize {
        self.rosters[team.index()].len()
    }

    pub fn total(&self) -> usize {
        self.rosters[0].len() + self.rosters[1].len()
    }

    pub fn team_of(&self, actor: ActorId) -> Option<TeamColor> {
        TeamColor::BOTH
            .into_iter()
            .find(|team| self.rosters[team.index()].contains(&actor))
    }

    /// Both teams have at least one member.
    pub fn both_populated(&self) -> bool {
        !self.rosters[0].is_empty() && !self.rosters[1].is_empty()
    }

    /// Place `actor` on `requested`, applying the capacity policy:
    /// a full target redirects to the opposing side when that side is empty,
    /// and to spectator otherwise. Any prior membership is dropped first.
    pub fn join(&mut self, actor: ActorId, requested: TeamColor) -> JoinOutcome {
        self.remove(actor);

        let mut target = requested;
        if self.count(target) >= self.capacity {
            if self.count(target.opponent()) == 0 {
                target = target.opponent();
            } else {
                return JoinOutcome::Spectator;
            }
        }

        self.rosters[target.index()].push(actor);
        JoinOutcome::Joined(target)
    }

    /// Drop `actor` from whichever roster holds it.
    pub fn remove(&mut self, actor: ActorId) -> Option<TeamColor> {
        for team in TeamColor::BOTH {
            let roster = &mut self.rosters[team.index()];
            if let Some(pos) = roster.iter().position(|member| *member == actor) {
                roster.remove(pos);
                return Some(team);
            }
        }
        None
    }

    pub fn clear(&mut self) {
        self.rosters[0].clear();
        self.rosters[1].clear();
    }

    /// Even out the rosters: while the counts differ by more than one, move
    /// `floor(difference / 2)` members, chosen uniformly at random without
    /// replacement, from the larger side to the smaller. Returns the moves
    /// so the caller can update actor records and announce them.
    pub fn balance(&mut self, rng: &mut impl Rng) -> Vec<(ActorId, TeamColor)> {
        let red = self.count(TeamColor::Red);
        let blue = self.count(TeamColor::Blue);
        let difference = red.abs_diff(blue);
        if difference <= 1 {
            return Vec::new();
        }

        let (from, to) = if red > blue {
            (TeamColor::Red, TeamColor::Blue)
        } else {
            (TeamColor::Blue, TeamColor::Red)
        };

        let mut moved = Vec::new();
        for _ in 0..difference / 2 {
            let source = &mut self.rosters[from.index()];
            let pick = rng.gen_range(0..source.len());
            let actor = source.swap_remove(pick);
            self.rosters[to.index()].push(actor);
            moved.push((actor, to));
        }
        log::debug!("balanced teams, moved {} to {}", moved.len(), to.name());
        moved
    }

    /// Assign every teamless actor to the smaller team (ties broken at
    /// random). Actors that fit nowhere become spectators (`None`).
    pub fn assign_remaining(
        &mut self,
        unassigned: &[ActorId],
        rng: &mut impl Rng,
    ) -> Vec<(ActorId, Option<TeamColor>)> {
        let mut placements = Vec::new();
        for &actor in unassigned {
            if self.team_of(actor).is_some() {
                continue;
            }

            let red = self.count(TeamColor::Red);
            let blue = self.count(TeamColor::Blue);
            let mut target = match red.cmp(&blue) {
                std::cmp::Ordering::Less => TeamColor::Red,
                std::cmp::Ordering::Greater => TeamColor::Blue,
                std::cmp::Ordering::Equal => {
                    if rng.gen_bool(0.5) {
                        TeamColor::Red
                    } else {
                        TeamColor::Blue
                    }
                }
            };

            if self.count(target) >= self.capacity {
                if self.count(target.opponent()) < self.capacity {
                    target = target.opponent();
                } else {
                    placements.push((actor, None));
                    continue;
                }
            }

            self.rosters[target.index()].push(actor);
            placements.push((actor, Some(target)));
        }
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn ids(range: std::ops::Range<u64>) -> Vec<ActorId> {
        range.map(ActorId).collect()
    }

    #[test]
    fn test_join_switches_teams() {
        let mut teams = TeamManager::new(8);
        assert_eq!(
            teams.join(ActorId(1), TeamColor::Red),
            JoinOutcome::Joined(TeamColor::Red)
        );
        assert_eq!(
            teams.join(ActorId(1), TeamColor::Blue),
            JoinOutcome::Joined(TeamColor::Blue)
        );
        assert_eq!(teams.count(TeamColor::Red), 0);
        assert_eq!(teams.team_of(ActorId(1)), Some(TeamColor::Blue));
    }

    #[test]
    fn test_full_target_with_empty_opponent_redirects() {
        let mut teams = TeamManager::new(2);
        teams.join(ActorId(1), TeamColor::Red);
        teams.join(ActorId(2), TeamColor::Red);

        // Red is full, blue is empty: route toward the empty side
        assert_eq!(
            teams.join(ActorId(3), TeamColor::Red),
            JoinOutcome::Joined(TeamColor::Blue)
        );
    }

    #[test]
    fn test_full_target_with_populated_opponent_spectates() {
        let mut teams = TeamManager::new(2);
        teams.join(ActorId(1), TeamColor::Red);
        teams.join(ActorId(2), TeamColor::Red);
        teams.join(ActorId(3), TeamColor::Blue);

        assert_eq!(teams.join(ActorId(4), TeamColor::Red), JoinOutcome::Spectator);
        assert_eq!(teams.team_of(ActorId(4)), None);
    }

    #[test]
    fn test_balance_moves_half_the_difference() {
        let mut teams = TeamManager::new(8);
        for id in ids(0..6) {
            teams.join(id, TeamColor::Red);
        }
        teams.join(ActorId(10), TeamColor::Blue);

        // diff = 5, move floor(5/2) = 2
        let moved = teams.balance(&mut rng());
        assert_eq!(moved.len(), 2);
        assert_eq!(teams.count(TeamColor::Red), 4);
        assert_eq!(teams.count(TeamColor::Blue), 3);
        for (actor, to) in moved {
            assert_eq!(to, TeamColor::Blue);
            assert_eq!(teams.team_of(actor), Some(TeamColor::Blue));
        }
    }

    #[test]
    fn test_balance_leaves_close_rosters_alone() {
        let mut teams = TeamManager::new(8);
        teams.join(ActorId(1), TeamColor::Red);
        teams.join(ActorId(2), TeamColor::Red);
        teams.join(ActorId(3), TeamColor::Blue);

        assert!(teams.balance(&mut rng()).is_empty());
    }

    #[test]
    fn test_assign_remaining_fills_smaller_side() {
        let mut teams = TeamManager::new(8);
        teams.join(ActorId(1), TeamColor::Red);
        teams.join(ActorId(2), TeamColor::Red);

        let placements = teams.assign_remaining(&ids(10..13), &mut rng());
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().all(|(_, team)| team.is_some()));
        assert!(teams.count(TeamColor::Red).abs_diff(teams.count(TeamColor::Blue)) <= 1);
    }

    #[test]
    fn test_assign_remaining_overflows_to_spectator() {
        let mut teams = TeamManager::new(1);
        teams.join(ActorId(1), TeamColor::Red);
        teams.join(ActorId(2), TeamColor::Blue);

        let placements = teams.assign_remaining(&[ActorId(3)], &mut rng());
        assert_eq!(placements, vec![(ActorId(3), None)]);
    }

    proptest! {
        /// Capacity is never exceeded and assign+balance levels populated teams.
        #[test]
        fn prop_assign_and_balance_invariants(
            seed in any::<u64>(),
            joins in prop::collection::vec((0u64..32, any::<bool>()), 0..32),
            stragglers in prop::collection::vec(100u64..132, 0..16),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut teams = TeamManager::new(8);

            for (id, red) in joins {
                let requested = if red { TeamColor::Red } else { TeamColor::Blue };
                teams.join(ActorId(id), requested);
                prop_assert!(teams.count(TeamColor::Red) <= 8);
                prop_assert!(teams.count(TeamColor::Blue) <= 8);
            }

            let stragglers: Vec<ActorId> = stragglers.into_iter().map(ActorId).collect();
            teams.assign_remaining(&stragglers, &mut rng);
            teams.balance(&mut rng);

            prop_assert!(teams.count(TeamColor::Red) <= 8);
            prop_assert!(teams.count(TeamColor::Blue) <= 8);
            if teams.both_populated() {
                prop_assert!(
                    teams.count(TeamColor::Red).abs_diff(teams.count(TeamColor::Blue)) <= 1
                );
            }
        }
    }
}
