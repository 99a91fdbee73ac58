//! Abstract match generation.
//!
//! Pure functions: given an event snapshot they produce an abstract match
//! list and, for elimination play, the progression graph. No I/O and no
//! randomness; every ordering is a strict total order over
//! (rank, seed, stable input index) so an unchanged snapshot always yields
//! an identical plan. Links between planned matches are arena indices into
//! the plan vector; the Orchestrator rebinds them to `MatchId`s.

use serde::{Deserialize, Serialize};

use crate::api::DivisionId;
use crate::models::{Division, Event, EventType, MatchPhase, ParticipantSlot};
use crate::scheduler::error::ScheduleError;

/// One abstract match; links are indices into [`MatchPlan::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMatch {
    pub division_id: DivisionId,
    pub phase: MatchPhase,
    pub sequence: u32,
    pub slot1: ParticipantSlot,
    pub slot2: ParticipantSlot,
    pub previous_left: Option<usize>,
    pub previous_right: Option<usize>,
    pub winner_next: Option<usize>,
    pub loser_next: Option<usize>,
}

impl PlannedMatch {
    fn new(
        division_id: DivisionId,
        phase: MatchPhase,
        sequence: u32,
        slot1: ParticipantSlot,
        slot2: ParticipantSlot,
    ) -> Self {
        Self {
            division_id,
            phase,
            sequence,
            slot1,
            slot2,
            previous_left: None,
            previous_right: None,
            winner_next: None,
            loser_next: None,
        }
    }
}

/// Generator output: the abstract match arena.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlan {
    pub matches: Vec<PlannedMatch>,
}

impl MatchPlan {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn division_matches(&self, division_id: DivisionId) -> impl Iterator<Item = &PlannedMatch> {
        self.matches
            .iter()
            .filter(move |m| m.division_id == division_id)
    }
}

/// Generation knobs supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Declared participant count for divisions whose roster is not final
    /// yet (preview mode); such divisions play over `Rank` slots.
    pub participant_count: Option<u32>,
    /// Wire a third-place match fed by the semifinal losers.
    pub include_consolation: bool,
}

/// Build the abstract match plan for an event.
///
/// Non-schedulable event types yield an empty plan; the Orchestrator treats
/// them as an explicit no-op before ever calling here, but the Generator
/// stays total for standalone use.
pub fn generate(event: &Event, options: &GeneratorOptions) -> Result<MatchPlan, ScheduleError> {
    let mut plan = MatchPlan::default();

    if !event.event_type.is_schedulable() {
        return Ok(plan);
    }

    for division in &event.divisions {
        let roster = division_roster(event, division, options.participant_count);
        if roster.len() < 2 {
            return Err(ScheduleError::InsufficientParticipants {
                division_id: division.id,
            });
        }

        match event.event_type {
            EventType::League => {
                round_robin(&mut plan, division.id, &roster.rotation_order());

                if division.playoff_team_count > 0 {
                    let cutoff = division.playoff_team_count;
                    if cutoff < 2 || cutoff as usize > roster.len() {
                        return Err(ScheduleError::InvalidPlayoffCutoff {
                            division_id: division.id,
                            cutoff,
                            team_count: roster.len() as u32,
                        });
                    }
                    // Playoff entrants are projected standings ranks; the
                    // Progression Engine substitutes concrete teams once
                    // league play is fully FINAL.
                    let ranks: Vec<ParticipantSlot> = (1..=cutoff)
                        .map(|rank| ParticipantSlot::Rank { rank })
                        .collect();
                    bracket(&mut plan, division.id, &ranks, options.include_consolation);
                }
            }
            EventType::Tournament => {
                bracket(
                    &mut plan,
                    division.id,
                    &roster.seed_order(),
                    options.include_consolation,
                );
            }
            _ => {}
        }
    }

    Ok(plan)
}

/// Resolved entrants of one division.
enum Roster {
    /// (team slot, seed, stable input index)
    Teams(Vec<(ParticipantSlot, Option<u32>, usize)>),
    /// Declared participant count; entrants are rank placeholders.
    Count(u32),
}

impl Roster {
    fn len(&self) -> usize {
        match self {
            Roster::Teams(teams) => teams.len(),
            Roster::Count(n) => *n as usize,
        }
    }

    /// Entrants in stable input order, for rotation play.
    fn rotation_order(&self) -> Vec<ParticipantSlot> {
        match self {
            Roster::Teams(teams) => teams.iter().map(|(slot, _, _)| *slot).collect(),
            Roster::Count(n) => (1..=*n).map(|rank| ParticipantSlot::Rank { rank }).collect(),
        }
    }

    /// Entrants by seed ascending, unset seeds last, ties broken by stable
    /// input index.
    fn seed_order(&self) -> Vec<ParticipantSlot> {
        match self {
            Roster::Teams(teams) => {
                let mut sorted = teams.clone();
                sorted.sort_by_key(|(_, seed, index)| (seed.unwrap_or(u32::MAX), *index));
                sorted.into_iter().map(|(slot, _, _)| slot).collect()
            }
            Roster::Count(n) => (1..=*n).map(|rank| ParticipantSlot::Rank { rank }).collect(),
        }
    }
}

fn division_roster(event: &Event, division: &Division, participant_count: Option<u32>) -> Roster {
    let teams = event.teams_in_division(division.id);
    if teams.is_empty() {
        if let Some(count) = participant_count {
            return Roster::Count(count);
        }
    }
    Roster::Teams(
        teams
            .into_iter()
            .enumerate()
            .map(|(index, team)| (ParticipantSlot::Team { id: team.id }, team.seed, index))
            .collect(),
    )
}

/// Circle-method round robin.
///
/// Position `i` plays position `n-1-i` each round, then every position but
/// the first rotates. An odd entrant count gets a bye placeholder, so odd N
/// yields N rounds with one idle entrant per round and even N yields N-1
/// rounds; every pairing occurs exactly once either way.
fn round_robin(plan: &mut MatchPlan, division_id: DivisionId, entrants: &[ParticipantSlot]) {
    let mut ring: Vec<Option<ParticipantSlot>> = entrants.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let size = ring.len();
    let rounds = size - 1;

    for round in 0..rounds {
        let mut sequence = 0;
        for i in 0..size / 2 {
            if let (Some(a), Some(b)) = (ring[i], ring[size - 1 - i]) {
                plan.matches.push(PlannedMatch::new(
                    division_id,
                    MatchPhase::RoundRobin {
                        round: (round + 1) as u32,
                    },
                    sequence,
                    a,
                    b,
                ));
                sequence += 1;
            }
        }
        ring[1..].rotate_right(1);
    }
}

/// What feeds a bracket slot in the next round.
enum Feed {
    /// A real match at this arena index; its winner advances.
    Match(usize),
    /// A bye; the entrant advances directly.
    Bye(ParticipantSlot),
}

/// Single-elimination bracket over entrants already in seed order.
///
/// Seeds are placed with the standard 1-vs-N pattern so higher seeds meet
/// later. When the entrant count is not a power of two the byes land on the
/// highest seeds; bye entrants are seeded straight into their second-round
/// slot instead of materializing an auto-final match, which keeps the
/// bracket at exactly N-1 matches.
fn bracket(
    plan: &mut MatchPlan,
    division_id: DivisionId,
    entrants: &[ParticipantSlot],
    include_consolation: bool,
) {
    let n = entrants.len() as u32;
    debug_assert!(n >= 2);
    let size = n.next_power_of_two();
    let order = bracket_seed_order(size);

    // First round: pairs of bracket positions; a position whose seed number
    // exceeds the entrant count is a bye.
    let mut feeds: Vec<Feed> = Vec::with_capacity((size / 2) as usize);
    for pair in 0..(size / 2) as usize {
        let seed_a = order[2 * pair];
        let seed_b = order[2 * pair + 1];
        let entrant_a = (seed_a <= n).then(|| entrants[(seed_a - 1) as usize]);
        let entrant_b = (seed_b <= n).then(|| entrants[(seed_b - 1) as usize]);
        match (entrant_a, entrant_b) {
            (Some(a), Some(b)) => {
                let index = plan.matches.len();
                plan.matches.push(PlannedMatch::new(
                    division_id,
                    MatchPhase::Bracket { round: 1 },
                    pair as u32,
                    a,
                    b,
                ));
                feeds.push(Feed::Match(index));
            }
            (Some(a), None) => feeds.push(Feed::Bye(a)),
            (None, Some(b)) => feeds.push(Feed::Bye(b)),
            // Unreachable with standard seeding (n > size/2), but a double
            // bye degenerates into a bye for an open slot.
            (None, None) => feeds.push(Feed::Bye(ParticipantSlot::Open)),
        }
    }

    // Later rounds are always full: pair up the feeds until one remains.
    let mut round = 2u32;
    while feeds.len() > 1 {
        let mut next: Vec<Feed> = Vec::with_capacity(feeds.len() / 2);
        for pair in 0..feeds.len() / 2 {
            let index = plan.matches.len();
            let mut planned = PlannedMatch::new(
                division_id,
                MatchPhase::Bracket { round },
                pair as u32,
                ParticipantSlot::Open,
                ParticipantSlot::Open,
            );
            match feeds[2 * pair] {
                Feed::Match(child) => {
                    planned.previous_left = Some(child);
                    plan.matches[child].winner_next = Some(index);
                }
                Feed::Bye(slot) => planned.slot1 = slot,
            }
            match feeds[2 * pair + 1] {
                Feed::Match(child) => {
                    planned.previous_right = Some(child);
                    plan.matches[child].winner_next = Some(index);
                }
                Feed::Bye(slot) => planned.slot2 = slot,
            }
            plan.matches.push(planned);
            next.push(Feed::Match(index));
        }
        feeds = next;
        round += 1;
    }

    if include_consolation {
        wire_consolation(plan, division_id);
    }
}

/// Third-place match fed by the losers of the final's two feeder matches.
/// Skipped when a semifinal slot was a bye (there is only one semifinal
/// loser to place).
fn wire_consolation(plan: &mut MatchPlan, division_id: DivisionId) {
    let final_index = plan.matches.len() - 1;
    let final_round = plan.matches[final_index].phase.round();
    let (left, right) = (
        plan.matches[final_index].previous_left,
        plan.matches[final_index].previous_right,
    );
    if let (Some(left), Some(right)) = (left, right) {
        let consolation = plan.matches.len();
        let mut planned = PlannedMatch::new(
            division_id,
            MatchPhase::Bracket { round: final_round },
            1,
            ParticipantSlot::Open,
            ParticipantSlot::Open,
        );
        planned.previous_left = Some(left);
        planned.previous_right = Some(right);
        plan.matches.push(planned);
        plan.matches[left].loser_next = Some(consolation);
        plan.matches[right].loser_next = Some(consolation);
    }
}

/// Bracket positions as seed numbers, standard expansion: [1], [1,2],
/// [1,4,2,3], [1,8,4,5,2,7,3,6], ... Adjacent pairs form the first round.
fn bracket_seed_order(size: u32) -> Vec<u32> {
    let mut order = vec![1u32];
    let mut len = 1u32;
    while len < size {
        len *= 2;
        let mut next = Vec::with_capacity(len as usize);
        for &seed in &order {
            next.push(seed);
            next.push(len + 1 - seed);
        }
        order = next;
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_seed_order() {
        assert_eq!(bracket_seed_order(1), vec![1]);
        assert_eq!(bracket_seed_order(2), vec![1, 2]);
        assert_eq!(bracket_seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(bracket_seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn test_round_robin_even_count() {
        let mut plan = MatchPlan::default();
        let entrants: Vec<ParticipantSlot> =
            (1..=4).map(|rank| ParticipantSlot::Rank { rank }).collect();
        round_robin(&mut plan, DivisionId::new(1), &entrants);

        // 4 entrants: 3 rounds of 2 matches, 6 pairings total.
        assert_eq!(plan.len(), 6);
        let rounds: Vec<u32> = plan.matches.iter().map(|m| m.phase.round()).collect();
        assert_eq!(rounds.iter().max(), Some(&3));
    }

    #[test]
    fn test_round_robin_no_self_pairing() {
        let mut plan = MatchPlan::default();
        let entrants: Vec<ParticipantSlot> =
            (1..=7).map(|rank| ParticipantSlot::Rank { rank }).collect();
        round_robin(&mut plan, DivisionId::new(1), &entrants);
        for m in &plan.matches {
            assert_ne!(m.slot1, m.slot2);
        }
    }

    #[test]
    fn test_bracket_two_entrants() {
        let mut plan = MatchPlan::default();
        let entrants: Vec<ParticipantSlot> =
            (1..=2).map(|rank| ParticipantSlot::Rank { rank }).collect();
        bracket(&mut plan, DivisionId::new(1), &entrants, false);

        assert_eq!(plan.len(), 1);
        assert!(plan.matches[0].winner_next.is_none());
    }

    #[test]
    fn test_bracket_links_are_symmetric() {
        let mut plan = MatchPlan::default();
        let entrants: Vec<ParticipantSlot> =
            (1..=8).map(|rank| ParticipantSlot::Rank { rank }).collect();
        bracket(&mut plan, DivisionId::new(1), &entrants, false);

        assert_eq!(plan.len(), 7);
        for (index, m) in plan.matches.iter().enumerate() {
            if let Some(parent) = m.winner_next {
                let p = &plan.matches[parent];
                assert!(
                    p.previous_left == Some(index) || p.previous_right == Some(index),
                    "parent must link back to child {}",
                    index
                );
            }
        }
    }

    #[test]
    fn test_consolation_wiring() {
        let mut plan = MatchPlan::default();
        let entrants: Vec<ParticipantSlot> =
            (1..=4).map(|rank| ParticipantSlot::Rank { rank }).collect();
        bracket(&mut plan, DivisionId::new(1), &entrants, true);

        // 3 bracket matches plus the third-place match.
        assert_eq!(plan.len(), 4);
        let consolation = &plan.matches[3];
        assert_eq!(consolation.previous_left, Some(0));
        assert_eq!(consolation.previous_right, Some(1));
        assert_eq!(plan.matches[0].loser_next, Some(3));
        assert_eq!(plan.matches[1].loser_next, Some(3));
    }
}
