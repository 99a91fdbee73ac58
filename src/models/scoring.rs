//! Scoring configuration and reported scorelines.
//!
//! The standings computation is configuration-driven: base points per result
//! plus an ordered bonus rule list applied in declaration order, so the
//! point precedence when several rules apply is explicit rather than
//! implied.

use serde::{Deserialize, Serialize};

/// Which side of a match a tiebreak decision refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

/// Per-set score, for sports that report set/game breakdowns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub team1: u32,
    pub team2: u32,
}

/// A reported result. Structural validity is checked against the sport's
/// [`ScoringConfig`] when the result is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreline {
    pub team1: u32,
    pub team2: u32,
    /// Optional per-set breakdown; when present, the set tally must agree
    /// with the aggregate scores above.
    #[serde(default)]
    pub sets: Vec<SetScore>,
    /// The match went to overtime.
    #[serde(default)]
    pub overtime: bool,
    /// Shootout decision when the scores are level.
    #[serde(default)]
    pub shootout_winner: Option<Side>,
}

impl Scoreline {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self {
            team1,
            team2,
            sets: Vec::new(),
            overtime: false,
            shootout_winner: None,
        }
    }

    /// Sets won by each side, derived from the per-set breakdown.
    pub fn sets_won(&self) -> (u32, u32) {
        let mut won = (0, 0);
        for set in &self.sets {
            if set.team1 > set.team2 {
                won.0 += 1;
            } else if set.team2 > set.team1 {
                won.1 += 1;
            }
        }
        won
    }
}

/// Ordered bonus rules; evaluated top to bottom when standings are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BonusRule {
    /// Losing in overtime (or a shootout) still earns points.
    OvertimeLossPoint { points: i32 },
    /// Winning without conceding earns extra points.
    ShutoutBonus { points: i32 },
}

/// Sport scoring configuration, loadable from the `[scoring]` section of the
/// engine config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_points_for_win")]
    pub points_for_win: i32,
    #[serde(default = "default_points_for_draw")]
    pub points_for_draw: i32,
    #[serde(default)]
    pub points_for_loss: i32,
    /// Whether a true draw is a permitted final result in rotation play.
    #[serde(default = "default_true")]
    pub use_points_for_draw: bool,
    /// Number of sets the winner must take, for sports reporting sets.
    #[serde(default)]
    pub sets_to_win: Option<u32>,
    #[serde(default)]
    pub bonus_rules: Vec<BonusRule>,
}

fn default_points_for_win() -> i32 {
    3
}

fn default_points_for_draw() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_for_win: default_points_for_win(),
            points_for_draw: default_points_for_draw(),
            points_for_loss: 0,
            use_points_for_draw: true,
            sets_to_win: None,
            bonus_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.points_for_win, 3);
        assert_eq!(config.points_for_draw, 1);
        assert_eq!(config.points_for_loss, 0);
        assert!(config.use_points_for_draw);
        assert!(config.bonus_rules.is_empty());
    }

    #[test]
    fn test_sets_won() {
        let scoreline = Scoreline {
            team1: 2,
            team2: 1,
            sets: vec![
                SetScore { team1: 25, team2: 20 },
                SetScore { team1: 18, team2: 25 },
                SetScore { team1: 25, team2: 23 },
            ],
            overtime: false,
            shootout_winner: None,
        };
        assert_eq!(scoreline.sets_won(), (2, 1));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            points_for_win = 2
            use_points_for_draw = false

            [[bonus_rules]]
            rule = "overtime_loss_point"
            points = 1
        "#;
        let config: ScoringConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.points_for_win, 2);
        assert_eq!(config.points_for_draw, 1);
        assert!(!config.use_points_for_draw);
        assert_eq!(
            config.bonus_rules,
            vec![BonusRule::OvertimeLossPoint { points: 1 }]
        );
    }
}
