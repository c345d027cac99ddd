use log::{debug, info};
use snafu::prelude::*;

use std::{fmt::Debug, hash::Hash};

use crate::config::*;
use crate::profile::{CandidateId, Profile};
use crate::tiebreak::break_tie;

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct Score(i64);

impl Score {
    const EMPTY: Score = Score(0);

    fn checked_add(self, rhs: Score) -> Option<Score> {
        self.0.checked_add(rhs.0).map(Score)
    }
}

/// The outcome of a positional scoring rule.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoreTally {
    /// Total points of each candidate, in candidate order.
    pub scores: Vec<(CandidateId, i64)>,
    pub winner: CandidateId,
    pub tiebreak: TiebreakSituation,
}

// Sums, for every voter, the points given by `points` to the rank of each candidate.
// The result is indexed by candidate - 1.
fn accumulate<V, F>(profile: &Profile<V>, points: F) -> Result<Vec<Score>, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
    F: Fn(usize) -> i64,
{
    let mut totals: Vec<Score> = vec![Score::EMPTY; profile.num_candidates()];
    for (_, ranking) in profile.rankings() {
        for (rank, cid) in ranking.iter().enumerate() {
            let total = &mut totals[(cid.0 - 1) as usize];
            *total = total
                .checked_add(Score(points(rank)))
                .context(ScoreOverflowSnafu { candidate: *cid })?;
        }
    }
    Ok(totals)
}

fn elect<V>(
    profile: &Profile<V>,
    totals: Vec<Score>,
    tie_break: &V,
) -> Result<ScoreTally, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    let scores: Vec<(CandidateId, Score)> = profile.candidates().into_iter().zip(totals).collect();
    debug!("elect: scores: {:?}", scores);

    let max_score = scores
        .iter()
        .map(|(_, s)| *s)
        .max()
        .context(InternalInvariantViolationSnafu {
            details: "no candidate to score",
        })?;
    let tied: Vec<CandidateId> = scores
        .iter()
        .filter_map(|(cid, s)| if *s == max_score { Some(*cid) } else { None })
        .collect();

    let (winner, tiebreak) = break_tie(profile, &tied, tie_break)?;
    Ok(ScoreTally {
        scores: scores.iter().map(|(cid, s)| (*cid, s.0)).collect(),
        winner,
        tiebreak,
    })
}

/// General positional scoring rule.
///
/// Every voter gives `score_vector[r]` points to the candidate they rank at
/// position `r` (0 is the first position). The candidate with the most points
/// wins, ties are resolved with the ranking of the `tie_break` voter.
///
/// The vector must have one entry per candidate. It does not need to be
/// decreasing.
pub fn scoring_tally<V>(
    profile: &Profile<V>,
    score_vector: &[i64],
    tie_break: &V,
) -> Result<ScoreTally, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    ensure!(
        score_vector.len() == profile.num_candidates(),
        InvalidScoreVectorSnafu {
            expected: profile.num_candidates(),
            actual: score_vector.len(),
        }
    );
    info!(
        "scoring_tally: {} voters, score vector {:?}",
        profile.num_voters(),
        score_vector
    );
    let totals = accumulate(profile, |rank| score_vector[rank])?;
    elect(profile, totals, tie_break)
}

pub fn scoring_rule<V>(
    profile: &Profile<V>,
    score_vector: &[i64],
    tie_break: &V,
) -> Result<CandidateId, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    scoring_tally(profile, score_vector, tie_break).map(|t| t.winner)
}

/// Number of voters ranking each candidate first.
pub fn plurality_tally<V>(profile: &Profile<V>, tie_break: &V) -> Result<ScoreTally, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    let totals = accumulate(profile, |rank| if rank == 0 { 1 } else { 0 })?;
    elect(profile, totals, tie_break)
}

/// The candidate ranked first by the largest number of voters.
pub fn plurality<V>(profile: &Profile<V>, tie_break: &V) -> Result<CandidateId, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    plurality_tally(profile, tie_break).map(|t| t.winner)
}

/// Every voter gives one point to all the candidates but their last one.
pub fn veto_tally<V>(profile: &Profile<V>, tie_break: &V) -> Result<ScoreTally, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    let last = profile.num_candidates() - 1;
    let totals = accumulate(profile, |rank| if rank == last { 0 } else { 1 })?;
    elect(profile, totals, tie_break)
}

pub fn veto<V>(profile: &Profile<V>, tie_break: &V) -> Result<CandidateId, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    veto_tally(profile, tie_break).map(|t| t.winner)
}

/// A candidate at rank `r` gets `n - 1 - r` points.
pub fn borda_tally<V>(profile: &Profile<V>, tie_break: &V) -> Result<ScoreTally, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    let n = profile.num_candidates();
    let totals = accumulate(profile, |rank| (n - 1 - rank) as i64)?;
    elect(profile, totals, tie_break)
}

pub fn borda<V>(profile: &Profile<V>, tie_break: &V) -> Result<CandidateId, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    borda_tally(profile, tie_break).map(|t| t.winner)
}
