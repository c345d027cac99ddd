use log::debug;
use snafu::prelude::*;

use std::{collections::HashMap, fmt::Debug, fmt::Display, hash::Hash};

use crate::config::*;

/// A candidate, identified by its number in `1..=n`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CandidateId {
    fn from(x: u32) -> Self {
        CandidateId(x)
    }
}

// Invariant: `ranking` is a permutation of 1..=n and `positions[c - 1]` is the
// index of candidate c in `ranking`.
#[derive(Eq, PartialEq, Debug, Clone)]
struct VoterPreference<V> {
    voter: V,
    ranking: Vec<CandidateId>,
    positions: Vec<usize>,
}

/// The complete strict rankings of a set of voters over the candidates `1..=n`.
///
/// The profile keeps the voters in the order they were provided: every rule
/// visits them in that order. A profile cannot be modified once built.
///
/// ```
/// use social_choice::{CandidateId, Profile};
/// # use social_choice::VotingErrors;
///
/// let profile = Profile::new(vec![(1, vec![1, 2, 3]), (2, vec![3, 2, 1])])?;
/// assert_eq!(profile.rank(CandidateId(3), &2)?, 0);
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone)]
pub struct Profile<V> {
    preferences: Vec<VoterPreference<V>>,
    index: HashMap<V, usize>,
    num_candidates: usize,
}

// The index is derived from the preferences.
impl<V: PartialEq> PartialEq for Profile<V> {
    fn eq(&self, other: &Self) -> bool {
        self.preferences == other.preferences
    }
}

impl<V: Eq> Eq for Profile<V> {}

impl<V> Profile<V>
where
    V: Eq + Hash + Clone + Debug,
{
    /// Builds a profile from the voters and their rankings (best first).
    ///
    /// All the rankings must be permutations of the same candidates `1..=n`.
    pub fn new<I>(preferences: I) -> Result<Profile<V>, VotingErrors>
    where
        I: IntoIterator<Item = (V, Vec<u32>)>,
    {
        let mut res: Vec<VoterPreference<V>> = Vec::new();
        let mut index: HashMap<V, usize> = HashMap::new();
        let mut num_candidates: Option<usize> = None;

        for (voter, raw_ranking) in preferences {
            ensure!(
                !index.contains_key(&voter),
                InvalidProfileSnafu {
                    reason: format!("voter {:?} appears more than once", voter)
                }
            );
            ensure!(
                !raw_ranking.is_empty(),
                InvalidProfileSnafu {
                    reason: format!("voter {:?} has an empty ranking", voter)
                }
            );
            let n = *num_candidates.get_or_insert(raw_ranking.len());
            ensure!(
                raw_ranking.len() == n,
                InvalidProfileSnafu {
                    reason: format!(
                        "voter {:?} ranks {} candidates, previous voters ranked {}",
                        voter,
                        raw_ranking.len(),
                        n
                    )
                }
            );

            let mut positions: Vec<Option<usize>> = vec![None; n];
            for (pos, &c) in raw_ranking.iter().enumerate() {
                let slot = (c as usize)
                    .checked_sub(1)
                    .and_then(|idx| positions.get_mut(idx))
                    .with_context(|| InvalidProfileSnafu {
                        reason: format!(
                            "voter {:?} ranks candidate {} outside of 1..={}",
                            voter, c, n
                        ),
                    })?;
                ensure!(
                    slot.is_none(),
                    InvalidProfileSnafu {
                        reason: format!("voter {:?} ranks candidate {} twice", voter, c)
                    }
                );
                *slot = Some(pos);
            }
            // n distinct in-range entries: every slot is filled.
            let positions: Vec<usize> = positions.into_iter().flatten().collect();

            index.insert(voter.clone(), res.len());
            res.push(VoterPreference {
                voter,
                ranking: raw_ranking.into_iter().map(CandidateId).collect(),
                positions,
            });
        }

        let num_candidates = num_candidates.context(InvalidProfileSnafu {
            reason: "no voters",
        })?;
        debug!(
            "Profile::new: {} voters, {} candidates",
            res.len(),
            num_candidates
        );
        Ok(Profile {
            preferences: res,
            index,
            num_candidates,
        })
    }

    /// The candidates, in the form `[1..n]`.
    pub fn candidates(&self) -> Vec<CandidateId> {
        (1..=self.num_candidates as u32).map(CandidateId).collect()
    }

    /// The voters, in insertion order.
    pub fn voters(&self) -> Vec<V> {
        self.preferences.iter().map(|vp| vp.voter.clone()).collect()
    }

    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    pub fn num_voters(&self) -> usize {
        self.preferences.len()
    }

    pub fn contains_voter(&self, voter: &V) -> bool {
        self.index.contains_key(voter)
    }

    /// The full ranking of a voter, most preferred candidate first.
    pub fn ranking(&self, voter: &V) -> Result<&[CandidateId], VotingErrors> {
        self.preference(voter).map(|vp| vp.ranking.as_slice())
    }

    /// The rank of the candidate for the given voter: 0 for the most preferred
    /// candidate, n-1 for the least preferred one.
    pub fn rank(&self, candidate: CandidateId, voter: &V) -> Result<usize, VotingErrors> {
        let vp = self.preference(voter)?;
        (candidate.0 as usize)
            .checked_sub(1)
            .and_then(|idx| vp.positions.get(idx))
            .copied()
            .with_context(|| InvalidCandidateSnafu {
                candidate,
                voter: format!("{:?}", voter),
            })
    }

    /// All the rankings, in voter order.
    pub(crate) fn rankings(&self) -> impl Iterator<Item = (&V, &[CandidateId])> + '_ {
        self.preferences
            .iter()
            .map(|vp| (&vp.voter, vp.ranking.as_slice()))
    }

    fn preference(&self, voter: &V) -> Result<&VoterPreference<V>, VotingErrors> {
        self.index
            .get(voter)
            .map(|&idx| &self.preferences[idx])
            .with_context(|| UnknownVoterSnafu {
                voter: format!("{:?}", voter),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cids(xs: &[u32]) -> Vec<CandidateId> {
        xs.iter().map(|&x| CandidateId(x)).collect()
    }

    #[test]
    fn candidates_and_voters_keep_their_order() {
        let p = Profile::new(vec![(7, vec![2, 1, 3]), (3, vec![1, 2, 3]), (5, vec![3, 1, 2])])
            .unwrap();
        assert_eq!(p.candidates(), cids(&[1, 2, 3]));
        assert_eq!(p.voters(), vec![7, 3, 5]);
        assert_eq!(p.num_voters(), 3);
        assert_eq!(p.num_candidates(), 3);
        // Stable across calls.
        assert_eq!(p.voters(), p.voters());
    }

    #[test]
    fn rank_lookup() {
        let p = Profile::new(vec![("ann", vec![3, 1, 2])]).unwrap();
        assert_eq!(p.rank(CandidateId(3), &"ann"), Ok(0));
        assert_eq!(p.rank(CandidateId(1), &"ann"), Ok(1));
        assert_eq!(p.rank(CandidateId(2), &"ann"), Ok(2));
        assert_eq!(p.ranking(&"ann").unwrap(), cids(&[3, 1, 2]).as_slice());
    }

    #[test]
    fn rank_errors() {
        let p = Profile::new(vec![(1, vec![1, 2])]).unwrap();
        assert!(matches!(
            p.rank(CandidateId(3), &1),
            Err(VotingErrors::InvalidCandidate { candidate: CandidateId(3), .. })
        ));
        assert!(matches!(
            p.rank(CandidateId(0), &1),
            Err(VotingErrors::InvalidCandidate { .. })
        ));
        assert_eq!(
            p.rank(CandidateId(1), &4),
            Err(VotingErrors::UnknownVoter {
                voter: "4".to_string()
            })
        );
        assert!(!p.contains_voter(&4));
    }

    #[test]
    fn rejects_malformed_profiles() {
        let cases: Vec<Vec<(u32, Vec<u32>)>> = vec![
            vec![],
            vec![(1, vec![])],
            vec![(1, vec![1, 2, 3]), (2, vec![1, 2])],
            vec![(1, vec![1, 1, 2])],
            vec![(1, vec![1, 2, 4])],
            vec![(1, vec![0, 1, 2])],
            vec![(1, vec![1, 2]), (1, vec![2, 1])],
        ];
        for case in cases {
            let res = Profile::new(case.clone());
            assert!(
                matches!(res, Err(VotingErrors::InvalidProfile { .. })),
                "{:?} -> {:?}",
                case,
                res
            );
        }
    }
}
