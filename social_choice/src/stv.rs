use log::{debug, info};
use snafu::prelude::*;

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
    ops::AddAssign,
};

use crate::config::*;
use crate::profile::{CandidateId, Profile};
use crate::tiebreak::break_tie;

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StvResult {
    pub winner: CandidateId,
    pub round_stats: Vec<RoundStats>,
    pub tiebreak: TiebreakSituation,
}

/// Single Transferable Vote with the default rules.
///
/// See [`stv_with_rules`].
pub fn stv<V>(profile: &Profile<V>, tie_break: &V) -> Result<CandidateId, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    stv_with_rules(profile, tie_break, &StvRules::DEFAULT_RULES).map(|r| r.winner)
}

/// Runs the Single Transferable Vote.
///
/// In each round, every voter supports the first of their candidates that is
/// still running. All the candidates with the lowest support are eliminated
/// together in the same round (not one at a time).
///
/// The procedure stops when a single candidate is left. It also stops when all
/// the remaining candidates share the lowest support, or, under
/// [`StvTermination::FirstRound`], after the first round that leaves several
/// candidates running. In both cases the `tie_break` voter picks the winner
/// among the remaining candidates.
pub fn stv_with_rules<V>(
    profile: &Profile<V>,
    tie_break: &V,
    rules: &StvRules,
) -> Result<StvResult, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    info!(
        "stv: {} voters, {} candidates, rules: {:?}",
        profile.num_voters(),
        profile.num_candidates(),
        rules
    );

    // The candidates that are still running, in candidate order.
    let mut remaining: Vec<CandidateId> = profile.candidates();
    // The rankings of the voters, restricted to the remaining candidates.
    let mut ballots: Vec<Vec<CandidateId>> =
        profile.rankings().map(|(_, r)| r.to_vec()).collect();
    let mut round_stats: Vec<RoundStats> = Vec::new();

    loop {
        match remaining.as_slice() {
            [] => {
                return InternalInvariantViolationSnafu {
                    details: "stv: all the candidates were eliminated",
                }
                .fail()
            }
            [winner] => {
                info!("stv: {} is the last candidate standing", winner);
                return Ok(StvResult {
                    winner: *winner,
                    round_stats,
                    tiebreak: TiebreakSituation::Clean,
                });
            }
            _ => {}
        }

        // Invariant: every round eliminates at least one candidate.
        ensure!(
            round_stats.len() < profile.num_candidates(),
            InternalInvariantViolationSnafu {
                details: format!("stv: no convergence after {} rounds", round_stats.len())
            }
        );
        let round_id = (round_stats.len() + 1) as u32;

        let tally = compute_tally(&ballots, &remaining);
        debug!("stv: round {}: tally: {:?}", round_id, tally);

        let min_count = tally
            .iter()
            .map(|(_, vc)| *vc)
            .min()
            .context(InternalInvariantViolationSnafu {
                details: "stv: empty tally",
            })?;
        let lowest: Vec<CandidateId> = tally
            .iter()
            .filter_map(|(cid, vc)| if *vc == min_count { Some(*cid) } else { None })
            .collect();

        if lowest.len() == remaining.len() {
            // Everyone is tied: eliminating them would leave no one to elect.
            debug!(
                "stv: round {}: all the remaining candidates are tied with {:?}",
                round_id, min_count
            );
            round_stats.push(round_stat(round_id, &tally, Vec::new()));
            let (winner, tiebreak) = break_tie(profile, &remaining, tie_break)?;
            info!("stv: round {}: {} wins the tiebreak", round_id, winner);
            return Ok(StvResult {
                winner,
                round_stats,
                tiebreak,
            });
        }

        let eliminated: HashSet<CandidateId> = lowest.iter().cloned().collect();
        remaining.retain(|cid| !eliminated.contains(cid));
        for ballot in ballots.iter_mut() {
            ballot.retain(|cid| !eliminated.contains(cid));
        }
        info!(
            "stv: round {}: eliminated {:?}, remaining {:?}",
            round_id, lowest, remaining
        );
        round_stats.push(round_stat(round_id, &tally, lowest));

        if remaining.len() > 1 && rules.termination == StvTermination::FirstRound {
            let (winner, tiebreak) = break_tie(profile, &remaining, tie_break)?;
            info!(
                "stv: round {}: {} candidates left, {} wins the tiebreak",
                round_id,
                remaining.len(),
                winner
            );
            return Ok(StvResult {
                winner,
                round_stats,
                tiebreak,
            });
        }
    }
}

// First-choice count of every remaining candidate, in the order of `remaining`.
// Candidates without any vote are included with a zero count.
fn compute_tally(
    ballots: &[Vec<CandidateId>],
    remaining: &[CandidateId],
) -> Vec<(CandidateId, VoteCount)> {
    let mut tally: HashMap<CandidateId, VoteCount> = remaining
        .iter()
        .map(|cid| (*cid, VoteCount::EMPTY))
        .collect();
    for ballot in ballots.iter() {
        if let Some(vc) = ballot.first().and_then(|cid| tally.get_mut(cid)) {
            *vc += VoteCount(1);
        }
    }
    remaining
        .iter()
        .map(|cid| (*cid, tally.get(cid).copied().unwrap_or(VoteCount::EMPTY)))
        .collect()
}

fn round_stat(
    round: u32,
    tally: &[(CandidateId, VoteCount)],
    eliminated: Vec<CandidateId>,
) -> RoundStats {
    RoundStats {
        round,
        tally: tally.iter().map(|(cid, vc)| (*cid, vc.0)).collect(),
        eliminated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAST_STANDING: StvRules = StvRules {
        termination: StvTermination::LastStanding,
    };

    fn cids(xs: &[u32]) -> Vec<CandidateId> {
        xs.iter().map(|&x| CandidateId(x)).collect()
    }

    fn counts(rs: &RoundStats) -> Vec<u64> {
        rs.tally.iter().map(|(_, c)| *c).collect()
    }

    #[test]
    fn simultaneous_elimination_of_the_lowest() {
        let p = Profile::new(vec![
            (1, vec![1, 2, 3]),
            (2, vec![1, 2, 3]),
            (3, vec![2, 3, 1]),
            (4, vec![3, 1, 2]),
        ])
        .unwrap();
        let res = stv_with_rules(&p, &1, &StvRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.winner, CandidateId(1));
        assert_eq!(res.tiebreak, TiebreakSituation::Clean);
        assert_eq!(res.round_stats.len(), 1);
        assert_eq!(counts(&res.round_stats[0]), vec![2, 1, 1]);
        assert_eq!(res.round_stats[0].eliminated, cids(&[2, 3]));
    }

    #[test]
    fn single_candidate_needs_no_round() {
        let p = Profile::new(vec![(1, vec![1]), (2, vec![1])]).unwrap();
        let res = stv_with_rules(&p, &1, &StvRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.winner, CandidateId(1));
        assert!(res.round_stats.is_empty());
    }

    #[test]
    fn first_round_survivors_go_to_the_tiebreak() {
        // Candidate 3 has no first choice and is the only one eliminated.
        let p = Profile::new(vec![
            (1, vec![1, 2, 3]),
            (2, vec![1, 3, 2]),
            (3, vec![2, 1, 3]),
        ])
        .unwrap();
        let res = stv_with_rules(&p, &3, &StvRules::DEFAULT_RULES).unwrap();
        assert_eq!(counts(&res.round_stats[0]), vec![2, 1, 0]);
        assert_eq!(res.round_stats[0].eliminated, cids(&[3]));
        assert_eq!(res.winner, CandidateId(2));
        assert_eq!(res.tiebreak, TiebreakSituation::TiebreakOccured);

        // Running more rounds elects the majority candidate instead.
        let res = stv_with_rules(&p, &3, &LAST_STANDING).unwrap();
        assert_eq!(res.winner, CandidateId(1));
        assert_eq!(res.tiebreak, TiebreakSituation::Clean);
        assert_eq!(res.round_stats.len(), 2);
        assert_eq!(counts(&res.round_stats[1]), vec![2, 1]);
    }

    #[test]
    fn transfers_follow_the_restricted_rankings() {
        let p = Profile::new(vec![
            (1, vec![1, 2, 3]),
            (2, vec![1, 2, 3]),
            (3, vec![2, 1, 3]),
            (4, vec![2, 1, 3]),
            (5, vec![3, 2, 1]),
        ])
        .unwrap();
        let res = stv_with_rules(&p, &1, &LAST_STANDING).unwrap();
        assert_eq!(counts(&res.round_stats[0]), vec![2, 2, 1]);
        // The vote of voter 5 moves to candidate 2.
        assert_eq!(res.round_stats[1].tally, vec![(CandidateId(1), 2), (CandidateId(2), 3)]);
        assert_eq!(res.winner, CandidateId(2));
    }

    #[test]
    fn full_tie_is_resolved_by_the_tiebreak() {
        let p = Profile::new(vec![(1, vec![1, 2, 3]), (2, vec![2, 3, 1]), (3, vec![3, 1, 2])])
            .unwrap();
        for rules in [StvRules::DEFAULT_RULES, LAST_STANDING] {
            let res = stv_with_rules(&p, &2, &rules).unwrap();
            assert_eq!(res.winner, CandidateId(2));
            assert_eq!(res.tiebreak, TiebreakSituation::TiebreakOccured);
            assert_eq!(res.round_stats.len(), 1);
            assert!(res.round_stats[0].eliminated.is_empty());
        }
    }

    #[test]
    fn every_voter_counts_in_every_round() {
        let p = Profile::new(vec![
            ('a', vec![4, 1, 2, 3, 5]),
            ('b', vec![4, 2, 1, 5, 3]),
            ('c', vec![1, 5, 4, 3, 2]),
            ('d', vec![2, 1, 3, 4, 5]),
            ('e', vec![3, 2, 5, 1, 4]),
            ('f', vec![1, 4, 3, 2, 5]),
            ('g', vec![5, 4, 1, 2, 3]),
        ])
        .unwrap();
        let res = stv_with_rules(&p, &'a', &LAST_STANDING).unwrap();
        assert!(res.round_stats.len() <= p.num_candidates());
        let mut running = p.num_candidates();
        for rs in res.round_stats.iter() {
            assert_eq!(rs.tally.len(), running);
            assert_eq!(counts(rs).iter().sum::<u64>(), p.num_voters() as u64);
            running -= rs.eliminated.len();
        }
        assert!(p.candidates().contains(&res.winner));
    }

    #[test]
    fn unknown_tie_break_voter() {
        let p = Profile::new(vec![(1, vec![1, 2]), (2, vec![2, 1])]).unwrap();
        assert!(matches!(
            stv(&p, &3),
            Err(VotingErrors::UnknownVoter { .. })
        ));
    }
}
