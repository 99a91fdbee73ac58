//! Match state machine and bracket/standings progression.
//!
//! States move forward only: SCHEDULED -> REPORTED -> FINAL. Finalizing a
//! bracket match cascades its winner (and, with a consolation bracket, its
//! loser) into the downstream match's feeder slot; finalizing a rotation
//! match feeds the division standings and, once the rotation is fully
//! FINAL, resolves the playoff bracket's rank slots.

use serde::{Deserialize, Serialize};

use crate::api::{DivisionId, MatchId, TeamId};
use crate::models::{
    BonusRule, Event, Match, MatchStatus, ParticipantSlot, Scoreline, ScoringConfig, Side,
};
use crate::scheduler::error::ValidationError;

/// Outcome of a finalized match.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner { winner: TeamId, loser: TeamId },
    Draw,
}

/// One row of a division standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: TeamId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub scored: u32,
    pub conceded: u32,
    pub points: i32,
}

/// What a finalize cascade touched, as indices into the event match slice.
#[derive(Debug, Default)]
pub struct CascadeReport {
    /// Downstream matches whose slots or placement changed.
    pub touched: Vec<usize>,
    /// Matches that became fully resolved but still lack field/time.
    pub resolved_unplaced: Vec<usize>,
}

/// SCHEDULED -> REPORTED. The scoreline is validated structurally but not
/// yet treated as authoritative; a malformed scoreline leaves the match
/// untouched. A match whose slots are still rank placeholders or open
/// bracket feeds cannot carry a result at all.
pub fn report_result(
    m: &mut Match,
    scoreline: Scoreline,
    config: &ScoringConfig,
    override_final: bool,
) -> Result<(), ValidationError> {
    if m.status == MatchStatus::Final && !override_final {
        return Err(ValidationError::AlreadyFinal {
            match_id: m.id.unwrap_or(MatchId::new(0)),
        });
    }
    if !m.is_resolved() {
        return Err(ValidationError::UnresolvedParticipants {
            match_id: m.id.unwrap_or(MatchId::new(0)),
        });
    }
    validate_scoreline(&scoreline, config)?;
    m.scoreline = Some(scoreline);
    m.status = MatchStatus::Reported;
    Ok(())
}

/// REPORTED -> FINAL. Computes the outcome from the reported scoreline:
/// higher score wins, a shootout decision breaks level scores, and a true
/// draw is permitted only for rotation matches under a config that allows
/// draws.
pub fn finalize(
    m: &mut Match,
    config: &ScoringConfig,
    override_final: bool,
) -> Result<MatchOutcome, ValidationError> {
    match m.status {
        MatchStatus::Reported => {}
        MatchStatus::Final if override_final => {}
        MatchStatus::Final => {
            return Err(ValidationError::AlreadyFinal {
                match_id: m.id.unwrap_or(MatchId::new(0)),
            });
        }
        MatchStatus::Scheduled => {
            return Err(ValidationError::IllegalTransition {
                from: MatchStatus::Scheduled,
            });
        }
    }

    let match_id = m.id.unwrap_or(MatchId::new(0));
    let (team1, team2) = match (m.team1_id(), m.team2_id()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ValidationError::UnresolvedParticipants { match_id }),
    };
    let scoreline = m
        .scoreline
        .clone()
        .ok_or_else(|| ValidationError::MalformedScoreline("no reported scoreline".to_string()))?;

    let outcome = decide_outcome(&scoreline, team1, team2, m.phase.is_bracket(), config)?;
    m.status = MatchStatus::Final;
    Ok(outcome)
}

fn decide_outcome(
    scoreline: &Scoreline,
    team1: TeamId,
    team2: TeamId,
    is_bracket: bool,
    config: &ScoringConfig,
) -> Result<MatchOutcome, ValidationError> {
    if scoreline.team1 > scoreline.team2 {
        return Ok(MatchOutcome::Winner {
            winner: team1,
            loser: team2,
        });
    }
    if scoreline.team2 > scoreline.team1 {
        return Ok(MatchOutcome::Winner {
            winner: team2,
            loser: team1,
        });
    }
    match scoreline.shootout_winner {
        Some(Side::Team1) => Ok(MatchOutcome::Winner {
            winner: team1,
            loser: team2,
        }),
        Some(Side::Team2) => Ok(MatchOutcome::Winner {
            winner: team2,
            loser: team1,
        }),
        None if !is_bracket && config.use_points_for_draw => Ok(MatchOutcome::Draw),
        None => Err(ValidationError::DrawNotPermitted),
    }
}

/// Structural scoreline checks against the sport configuration.
fn validate_scoreline(scoreline: &Scoreline, config: &ScoringConfig) -> Result<(), ValidationError> {
    if scoreline.shootout_winner.is_some() && scoreline.team1 != scoreline.team2 {
        return Err(ValidationError::MalformedScoreline(
            "shootout decision reported for a match with unequal scores".to_string(),
        ));
    }
    if !scoreline.sets.is_empty() {
        let (won1, won2) = scoreline.sets_won();
        if (won1, won2) != (scoreline.team1, scoreline.team2) {
            return Err(ValidationError::MalformedScoreline(format!(
                "set tally ({}, {}) disagrees with aggregate scores ({}, {})",
                won1, won2, scoreline.team1, scoreline.team2
            )));
        }
    }
    if let Some(required) = config.sets_to_win {
        let best = scoreline.team1.max(scoreline.team2);
        let worst = scoreline.team1.min(scoreline.team2);
        if best != required || worst >= required {
            return Err(ValidationError::MalformedScoreline(format!(
                "winner must take exactly {} sets",
                required
            )));
        }
    }
    Ok(())
}

/// Apply the consequences of a freshly finalized match across the event's
/// match set. `finalized` indexes into `matches`, which must already hold
/// the FINAL status written by [`finalize`].
pub fn cascade_finalized(
    matches: &mut [Match],
    finalized: usize,
    outcome: &MatchOutcome,
    event: &Event,
    config: &ScoringConfig,
    override_final: bool,
) -> Result<CascadeReport, ValidationError> {
    let mut report = CascadeReport::default();
    let source = matches[finalized].clone();

    if source.phase.is_bracket() {
        if let MatchOutcome::Winner { winner, loser } = *outcome {
            if let Some(target_id) = source.winner_next_match {
                fill_feeder_slot(matches, target_id, &source, winner, override_final, &mut report)?;
            }
            if let Some(target_id) = source.loser_next_match {
                fill_feeder_slot(matches, target_id, &source, loser, override_final, &mut report)?;
            }
        }
    } else {
        resolve_playoff_ranks(matches, source.division_id, event, config, &mut report);
    }

    Ok(report)
}

/// Write an advancing team into the downstream match's slot, choosing the
/// side by which feeder link points back at the finalized match. An
/// occupied slot is never overwritten, except during an explicit override
/// correction while the downstream match is still SCHEDULED.
fn fill_feeder_slot(
    matches: &mut [Match],
    target_id: MatchId,
    source: &Match,
    team: TeamId,
    override_final: bool,
    report: &mut CascadeReport,
) -> Result<(), ValidationError> {
    let source_id = source.id;
    let position = matches
        .iter()
        .position(|m| m.id == Some(target_id))
        .ok_or(ValidationError::UnknownMatch { match_id: target_id })?;

    let target = &mut matches[position];
    let takes_slot1 = target.previous_left_match.is_some() && target.previous_left_match == source_id;
    let slot = if takes_slot1 {
        &mut target.slot1
    } else {
        &mut target.slot2
    };

    match slot {
        ParticipantSlot::Team { id } if *id == team => return Ok(()),
        ParticipantSlot::Team { .. }
            if !(override_final && target.status == MatchStatus::Scheduled) =>
        {
            return Err(ValidationError::SlotOccupied { match_id: target_id });
        }
        _ => {}
    }
    *slot = ParticipantSlot::Team { id: team };

    let other = if takes_slot1 {
        target.slot2
    } else {
        target.slot1
    };
    if other == (ParticipantSlot::Team { id: team }) {
        return Err(ValidationError::DuplicateTeam { match_id: target_id });
    }

    if target.is_resolved() && !target.is_placed() {
        report.resolved_unplaced.push(position);
    }
    report.touched.push(position);
    Ok(())
}

/// Once every rotation match of the division is FINAL, substitute the
/// playoff bracket's rank slots with the teams at those standings ranks.
fn resolve_playoff_ranks(
    matches: &mut [Match],
    division_id: DivisionId,
    event: &Event,
    config: &ScoringConfig,
    report: &mut CascadeReport,
) {
    let rotation_done = matches
        .iter()
        .filter(|m| m.division_id == division_id && !m.phase.is_bracket())
        .all(|m| m.status == MatchStatus::Final);
    if !rotation_done {
        return;
    }

    let table = standings(event, division_id, matches, config);
    for position in 0..matches.len() {
        let m = &mut matches[position];
        if m.division_id != division_id || !m.phase.is_bracket() {
            continue;
        }
        let mut changed = false;
        for slot in [&mut m.slot1, &mut m.slot2] {
            if let ParticipantSlot::Rank { rank } = *slot {
                match table.get((rank - 1) as usize) {
                    Some(row) => {
                        *slot = ParticipantSlot::Team { id: row.team_id };
                        changed = true;
                    }
                    None => {
                        log::warn!(
                            "standings of division {} have no rank {}; leaving slot pending",
                            division_id,
                            rank
                        );
                    }
                }
            }
        }
        if changed {
            report.touched.push(position);
            if m.is_resolved() && !m.is_placed() {
                report.resolved_unplaced.push(position);
            }
        }
    }
}

/// Cumulative standings of a division's rotation play.
///
/// Points: win/draw/loss base points, then the configured bonus rules in
/// declaration order. Table ordering, applied in sequence: points desc,
/// score difference desc, scored desc, team id asc.
pub fn standings(
    event: &Event,
    division_id: DivisionId,
    matches: &[Match],
    config: &ScoringConfig,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = event
        .teams_in_division(division_id)
        .iter()
        .map(|team| StandingsRow {
            team_id: team.id,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            scored: 0,
            conceded: 0,
            points: 0,
        })
        .collect();

    for m in matches {
        if m.division_id != division_id || m.phase.is_bracket() || m.status != MatchStatus::Final {
            continue;
        }
        let (Some(team1), Some(team2)) = (m.team1_id(), m.team2_id()) else {
            continue;
        };
        let Some(scoreline) = &m.scoreline else {
            continue;
        };
        let outcome = decide_outcome(scoreline, team1, team2, false, config);
        let Ok(outcome) = outcome else { continue };

        accumulate(&mut rows, team1, scoreline.team1, scoreline.team2, &outcome, scoreline, config);
        accumulate(&mut rows, team2, scoreline.team2, scoreline.team1, &outcome, scoreline, config);
    }

    rows.sort_by(|a, b| {
        let diff_a = a.scored as i64 - a.conceded as i64;
        let diff_b = b.scored as i64 - b.conceded as i64;
        b.points
            .cmp(&a.points)
            .then(diff_b.cmp(&diff_a))
            .then(b.scored.cmp(&a.scored))
            .then(a.team_id.cmp(&b.team_id))
    });
    rows
}

fn accumulate(
    rows: &mut [StandingsRow],
    team: TeamId,
    scored: u32,
    conceded: u32,
    outcome: &MatchOutcome,
    scoreline: &Scoreline,
    config: &ScoringConfig,
) {
    let Some(row) = rows.iter_mut().find(|r| r.team_id == team) else {
        return;
    };
    row.played += 1;
    row.scored += scored;
    row.conceded += conceded;

    let won = matches!(outcome, MatchOutcome::Winner { winner, .. } if *winner == team);
    let drew = matches!(outcome, MatchOutcome::Draw);

    if won {
        row.wins += 1;
        row.points += config.points_for_win;
    } else if drew {
        row.draws += 1;
        row.points += config.points_for_draw;
    } else {
        row.losses += 1;
        row.points += config.points_for_loss;
    }

    for rule in &config.bonus_rules {
        match rule {
            BonusRule::OvertimeLossPoint { points } => {
                let decided_late = scoreline.overtime || scoreline.shootout_winner.is_some();
                if !won && !drew && decided_late {
                    row.points += points;
                }
            }
            BonusRule::ShutoutBonus { points } => {
                if won && conceded == 0 {
                    row.points += points;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DivisionId, EventId, MatchId, TeamId};
    use crate::models::{EventType, MatchPhase, Team};

    fn rotation_match(id: i64, team1: i64, team2: i64, s1: u32, s2: u32) -> Match {
        Match {
            id: Some(MatchId::new(id)),
            event_id: EventId::new(1),
            division_id: DivisionId::new(1),
            phase: MatchPhase::RoundRobin { round: 1 },
            sequence: 0,
            slot1: ParticipantSlot::Team {
                id: TeamId::new(team1),
            },
            slot2: ParticipantSlot::Team {
                id: TeamId::new(team2),
            },
            field_id: None,
            start: None,
            end: None,
            referee_id: None,
            team_referee_id: None,
            previous_left_match: None,
            previous_right_match: None,
            winner_next_match: None,
            loser_next_match: None,
            status: MatchStatus::Final,
            scoreline: Some(Scoreline::new(s1, s2)),
        }
    }

    fn event_with_teams(team_ids: &[i64]) -> Event {
        Event {
            id: Some(EventId::new(1)),
            name: "League".to_string(),
            event_type: EventType::League,
            start: "2026-06-01T00:00:00Z".parse().unwrap(),
            end: "2026-06-30T00:00:00Z".parse().unwrap(),
            single_division: false,
            divisions: vec![],
            fields: vec![],
            time_slots: vec![],
            teams: team_ids
                .iter()
                .map(|&id| Team {
                    id: TeamId::new(id),
                    name: format!("team-{}", id),
                    division_id: DivisionId::new(1),
                    seed: None,
                })
                .collect(),
            schedule_checksum: String::new(),
        }
    }

    #[test]
    fn test_report_then_finalize() {
        let mut m = rotation_match(1, 10, 11, 0, 0);
        m.status = MatchStatus::Scheduled;
        m.scoreline = None;
        let config = ScoringConfig::default();

        report_result(&mut m, Scoreline::new(2, 1), &config, false).unwrap();
        assert_eq!(m.status, MatchStatus::Reported);

        let outcome = finalize(&mut m, &config, false).unwrap();
        assert_eq!(m.status, MatchStatus::Final);
        assert_eq!(
            outcome,
            MatchOutcome::Winner {
                winner: TeamId::new(10),
                loser: TeamId::new(11)
            }
        );
    }

    #[test]
    fn test_report_rejects_unresolved_participants() {
        let mut m = rotation_match(1, 10, 11, 0, 0);
        m.status = MatchStatus::Scheduled;
        m.scoreline = None;
        m.phase = MatchPhase::Bracket { round: 2 };
        m.slot2 = ParticipantSlot::Open;

        let err = report_result(&mut m, Scoreline::new(2, 1), &ScoringConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnresolvedParticipants { .. }));
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(m.scoreline.is_none());

        m.slot2 = ParticipantSlot::Rank { rank: 2 };
        let err = report_result(&mut m, Scoreline::new(2, 1), &ScoringConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnresolvedParticipants { .. }));
    }

    #[test]
    fn test_finalize_requires_report_first() {
        let mut m = rotation_match(1, 10, 11, 0, 0);
        m.status = MatchStatus::Scheduled;
        m.scoreline = None;
        let err = finalize(&mut m, &ScoringConfig::default(), false).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IllegalTransition {
                from: MatchStatus::Scheduled
            }
        );
        assert_eq!(m.status, MatchStatus::Scheduled);
    }

    #[test]
    fn test_finalize_twice_needs_override() {
        let mut m = rotation_match(1, 10, 11, 2, 1);
        let config = ScoringConfig::default();
        let err = finalize(&mut m, &config, false).unwrap_err();
        assert!(matches!(err, ValidationError::AlreadyFinal { .. }));

        let outcome = finalize(&mut m, &config, true).unwrap();
        assert!(matches!(outcome, MatchOutcome::Winner { .. }));
    }

    #[test]
    fn test_draw_requires_config_permission() {
        let mut m = rotation_match(1, 10, 11, 1, 1);
        m.status = MatchStatus::Reported;

        let mut config = ScoringConfig::default();
        config.use_points_for_draw = false;
        let err = finalize(&mut m, &config, false).unwrap_err();
        assert_eq!(err, ValidationError::DrawNotPermitted);

        config.use_points_for_draw = true;
        m.status = MatchStatus::Reported;
        let outcome = finalize(&mut m, &config, false).unwrap();
        assert_eq!(outcome, MatchOutcome::Draw);
    }

    #[test]
    fn test_bracket_match_never_draws() {
        let mut m = rotation_match(1, 10, 11, 1, 1);
        m.phase = MatchPhase::Bracket { round: 1 };
        m.status = MatchStatus::Reported;
        let err = finalize(&mut m, &ScoringConfig::default(), false).unwrap_err();
        assert_eq!(err, ValidationError::DrawNotPermitted);
    }

    #[test]
    fn test_malformed_scoreline_keeps_match_scheduled() {
        let mut m = rotation_match(1, 10, 11, 0, 0);
        m.status = MatchStatus::Scheduled;
        m.scoreline = None;

        let mut bad = Scoreline::new(2, 1);
        bad.shootout_winner = Some(Side::Team1);
        let err = report_result(&mut m, bad, &ScoringConfig::default(), false).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedScoreline(_)));
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(m.scoreline.is_none());
    }

    #[test]
    fn test_set_tally_must_agree() {
        let mut scoreline = Scoreline::new(2, 0);
        scoreline.sets = vec![
            crate::models::SetScore { team1: 25, team2: 20 },
            crate::models::SetScore { team1: 20, team2: 25 },
        ];
        let err = validate_scoreline(&scoreline, &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedScoreline(_)));
    }

    #[test]
    fn test_standings_ordering() {
        let event = event_with_teams(&[10, 11, 12]);
        let matches = vec![
            rotation_match(1, 10, 11, 3, 0),
            rotation_match(2, 11, 12, 2, 2),
            rotation_match(3, 12, 10, 0, 1),
        ];
        let table = standings(&event, DivisionId::new(1), &matches, &ScoringConfig::default());

        assert_eq!(table[0].team_id, TeamId::new(10));
        assert_eq!(table[0].points, 6);
        // 11 and 12 are level on points; 12 ranks higher on score
        // difference (-1 against -3).
        assert_eq!(table[1].team_id, TeamId::new(12));
        assert_eq!(table[1].points, 1);
        assert_eq!(table[2].team_id, TeamId::new(11));
        assert_eq!(table[2].points, 1);
    }

    #[test]
    fn test_overtime_loss_bonus_applies_in_order() {
        let event = event_with_teams(&[10, 11]);
        let mut m = rotation_match(1, 10, 11, 2, 2);
        m.scoreline = Some(Scoreline {
            team1: 2,
            team2: 2,
            sets: vec![],
            overtime: true,
            shootout_winner: Some(Side::Team1),
        });
        let config = ScoringConfig {
            points_for_win: 2,
            bonus_rules: vec![BonusRule::OvertimeLossPoint { points: 1 }],
            ..ScoringConfig::default()
        };
        let table = standings(&event, DivisionId::new(1), &[m], &config);
        assert_eq!(table[0].team_id, TeamId::new(10));
        assert_eq!(table[0].points, 2);
        assert_eq!(table[1].points, 1);
    }
}
