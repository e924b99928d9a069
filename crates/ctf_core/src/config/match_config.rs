//! Match-wide tuning: lifecycle durations, polling cadences, zone geometry.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::engine::team::TeamColor;
use crate::error::ConfigError;

/// Match lifecycle and map geometry parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    // === Lifecycle durations ===
    /// Lobby countdown before a round starts, in seconds (default: 60)
    pub lobby_countdown_s: u32,
    /// Shortened countdown once every connected actor holds a team (default: 10)
    pub fast_start_s: u32,
    /// Round length in seconds (default: 300)
    pub round_duration_s: u32,
    /// Delay between the result broadcast and the full reset, ms (default: 10_000)
    pub ending_reset_delay_ms: u64,

    // === Polling cadences ===
    /// Round poll driving the clock and scoring checks, ms (default: 100)
    pub round_poll_ms: u64,
    /// Score announcement interval while a round runs, ms (default: 60_000)
    pub score_announce_ms: u64,
    /// UI state broadcast interval while a round runs, ms (default: 100)
    pub state_broadcast_ms: u64,

    // === Tag rules ===
    /// Frozen time before a tagged actor respawns, ms (default: 13_000)
    pub respawn_delay_ms: u64,
    /// Window in which a freshly tagged actor cannot be re-tagged, ms (default: 1_000)
    pub tag_debounce_ms: u64,

    // === Teams ===
    /// Hard cap on roster size per team (default: 8)
    pub max_team_size: usize,

    // === Capture axis geometry ===
    /// Red scores while carrying the blue weapon past this x (default: 3.0)
    pub red_score_x: f32,
    /// Blue scores while carrying the red weapon past this x (default: -3.0)
    pub blue_score_x: f32,
    /// Boundary splitting the map into home territories (default: 1.0)
    pub territory_boundary_x: f32,

    // === Fixed world positions ===
    pub red_base: Vector3<f32>,
    pub blue_base: Vector3<f32>,
    pub red_weapon_spawn: Vector3<f32>,
    pub blue_weapon_spawn: Vector3<f32>,
    /// Where actors wait before picking a team, and where spectators are sent.
    pub lobby_spawn: Vector3<f32>,
    pub spectator_position: Vector3<f32>,
    /// Settle delay between a positional reset and the fresh weapon spawn, ms (default: 500)
    pub weapon_settle_delay_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            lobby_countdown_s: 60,
            fast_start_s: 10,
            round_duration_s: 300,
            ending_reset_delay_ms: 10_000,

            round_poll_ms: 100,
            score_announce_ms: 60_000,
            state_broadcast_ms: 100,

            respawn_delay_ms: 13_000,
            tag_debounce_ms: 1_000,

            max_team_size: 8,

            red_score_x: 3.0,
            blue_score_x: -3.0,
            territory_boundary_x: 1.0,

            red_base: Vector3::new(45.0, 7.0, 4.0),
            blue_base: Vector3::new(-44.0, 7.0, -4.0),
            red_weapon_spawn: Vector3::new(45.0, 7.0, -3.0),
            blue_weapon_spawn: Vector3::new(-43.0, 7.0, 6.0),
            lobby_spawn: Vector3::new(0.0, 10.0, 0.0),
            spectator_position: Vector3::new(0.0, 10.0, 0.0),
            weapon_settle_delay_ms: 500,
        }
    }
}

impl MatchConfig {
    /// Reject configs the state machine cannot run with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.round_duration_s == 0 {
            return Err(ConfigError::ZeroRoundDuration(self.round_duration_s));
        }
        if self.lobby_countdown_s == 0 {
            return Err(ConfigError::ZeroCountdown(self.lobby_countdown_s));
        }
        if self.red_score_x <= self.blue_score_x {
            return Err(ConfigError::InvertedScoreZones {
                red: self.red_score_x,
                blue: self.blue_score_x,
            });
        }
        if self.max_team_size == 0 {
            return Err(ConfigError::ZeroTeamSize);
        }
        Ok(())
    }

    pub fn team_base(&self, team: TeamColor) -> Vector3<f32> {
        match team {
            TeamColor::Red => self.red_base,
            TeamColor::Blue => self.blue_base,
        }
    }

    pub fn weapon_spawn(&self, team: TeamColor) -> Vector3<f32> {
        match team {
            TeamColor::Red => self.red_weapon_spawn,
            TeamColor::Blue => self.blue_weapon_spawn,
        }
    }

    /// Scoring threshold along the capture axis for the given team.
    pub fn score_threshold(&self, team: TeamColor) -> f32 {
        match team {
            TeamColor::Red => self.red_score_x,
            TeamColor::Blue => self.blue_score_x,
        }
    }
}
