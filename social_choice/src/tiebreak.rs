use log::debug;
use snafu::prelude::*;

use std::{fmt::Debug, hash::Hash};

use crate::config::*;
use crate::profile::{CandidateId, Profile};

/// The ranking of the tie-breaking voter, most preferred candidate first.
///
/// Whenever several candidates are tied for the win, the first of them in this
/// order is the winner.
pub fn tie_break_order<'a, V>(
    profile: &'a Profile<V>,
    tie_break: &V,
) -> Result<&'a [CandidateId], VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    profile.ranking(tie_break)
}

/// Selects a single winner from the tied candidates.
///
/// The tie-breaking voter is only looked up if there is more than one tied
/// candidate: a missing tie-breaking voter is not an error as long as no tie
/// has to be resolved.
pub fn break_tie<V>(
    profile: &Profile<V>,
    tied: &[CandidateId],
    tie_break: &V,
) -> Result<(CandidateId, TiebreakSituation), VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    match tied {
        [] => InternalInvariantViolationSnafu {
            details: "no candidate to select a winner from",
        }
        .fail(),
        [single] => Ok((*single, TiebreakSituation::Clean)),
        _ => {
            let order = tie_break_order(profile, tie_break)?;
            let winner = order
                .iter()
                .find(|cid| tied.contains(cid))
                .copied()
                .with_context(|| InternalInvariantViolationSnafu {
                    details: format!(
                        "none of the tied candidates {:?} is ranked by voter {:?}",
                        tied, tie_break
                    ),
                })?;
            debug!(
                "break_tie: tied: {:?} resolved by voter {:?} in favour of {}",
                tied, tie_break, winner
            );
            Ok((winner, TiebreakSituation::TiebreakOccured))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile<u32> {
        Profile::new(vec![(1, vec![3, 1, 2]), (2, vec![1, 2, 3])]).unwrap()
    }

    #[test]
    fn order_is_the_ranking_of_the_voter() {
        let p = profile();
        assert_eq!(
            tie_break_order(&p, &1).unwrap(),
            &[CandidateId(3), CandidateId(1), CandidateId(2)]
        );
        assert!(matches!(
            tie_break_order(&p, &9),
            Err(VotingErrors::UnknownVoter { .. })
        ));
    }

    #[test]
    fn first_tied_candidate_in_order_wins() {
        let p = profile();
        assert_eq!(
            break_tie(&p, &[CandidateId(1), CandidateId(2)], &1),
            Ok((CandidateId(1), TiebreakSituation::TiebreakOccured))
        );
        assert_eq!(
            break_tie(&p, &[CandidateId(2), CandidateId(3)], &2),
            Ok((CandidateId(2), TiebreakSituation::TiebreakOccured))
        );
    }

    #[test]
    fn single_candidate_needs_no_voter() {
        let p = profile();
        assert_eq!(
            break_tie(&p, &[CandidateId(2)], &42),
            Ok((CandidateId(2), TiebreakSituation::Clean))
        );
    }

    #[test]
    fn unresolvable_ties() {
        let p = profile();
        assert!(matches!(
            break_tie(&p, &[], &1),
            Err(VotingErrors::InternalInvariantViolation { .. })
        ));
        assert!(matches!(
            break_tie(&p, &[CandidateId(5), CandidateId(6)], &1),
            Err(VotingErrors::InternalInvariantViolation { .. })
        ));
        assert!(matches!(
            break_tie(&p, &[CandidateId(1), CandidateId(2)], &9),
            Err(VotingErrors::UnknownVoter { .. })
        ));
    }
}
