// ********* Errors ***********

use snafu::Snafu;

use crate::profile::CandidateId;

/// Errors that prevent a voting rule from completing successfully.
///
/// Voter keys are reported through their `Debug` rendering, so that the error
/// type does not depend on the type chosen for voters.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VotingErrors {
    /// The dictator or the tie-breaking agent is not part of the profile.
    #[snafu(display("Voter {voter} is not part of the profile"))]
    UnknownVoter { voter: String },
    /// The rankings handed to the profile do not form a complete profile.
    #[snafu(display("Invalid profile: {reason}"))]
    InvalidProfile { reason: String },
    /// The candidate does not appear in the ranking of this voter.
    #[snafu(display("Candidate {candidate} is not ranked by voter {voter}"))]
    InvalidCandidate {
        candidate: CandidateId,
        voter: String,
    },
    /// The score vector does not have one entry per candidate.
    #[snafu(display("Score vector has {actual} entries, expected one per candidate ({expected})"))]
    InvalidScoreVector { expected: usize, actual: usize },
    /// The total score of a candidate does not fit in an `i64`.
    #[snafu(display("The score of candidate {candidate} overflows"))]
    ScoreOverflow { candidate: CandidateId },
    /// A state that complete profiles cannot produce. Reported instead of picking
    /// an arbitrary winner.
    #[snafu(display("Internal invariant violated: {details}"))]
    InternalInvariantViolation { details: String },
}

// ********* Configuration **********

/// Flag to indicate if the tie-breaking voter had to be consulted.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TiebreakSituation {
    Clean,           // Did not happen
    TiebreakOccured, // Happened and had to be resolved.
}

/// When the STV procedure stops.
///
/// - FirstRound stops after the first round that leaves more than one candidate
/// standing, and lets the tie-breaking voter choose among the survivors.
///
/// - LastStanding keeps eliminating until a single candidate is left. The
/// tie-breaking voter is only consulted when all the remaining candidates share
/// the lowest tally.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum StvTermination {
    FirstRound,
    LastStanding,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StvRules {
    pub termination: StvTermination,
}

impl StvRules {
    pub const DEFAULT_RULES: StvRules = StvRules {
        termination: StvTermination::FirstRound,
    };
}

impl Default for StvRules {
    fn default() -> Self {
        StvRules::DEFAULT_RULES
    }
}

/// The voting rule to apply, with its parameters.
///
/// `V` is the type of the voter keys of the profile.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Rule<V> {
    Dictatorship { agent: V },
    /// General positional scoring. The vector is indexed by rank: the first
    /// entry is the number of points for being ranked first.
    Scoring { score_vector: Vec<i64>, tie_break: V },
    Plurality { tie_break: V },
    Veto { tie_break: V },
    Borda { tie_break: V },
    Stv { tie_break: V, rules: StvRules },
}

impl<V> Rule<V> {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Dictatorship { .. } => "dictatorship",
            Rule::Scoring { .. } => "scoring",
            Rule::Plurality { .. } => "plurality",
            Rule::Veto { .. } => "veto",
            Rule::Borda { .. } => "borda",
            Rule::Stv { .. } => "stv",
        }
    }

    /// The tie-breaking voter, if the rule has one.
    pub fn tie_break(&self) -> Option<&V> {
        match self {
            Rule::Dictatorship { .. } => None,
            Rule::Scoring { tie_break, .. }
            | Rule::Plurality { tie_break }
            | Rule::Veto { tie_break }
            | Rule::Borda { tie_break }
            | Rule::Stv { tie_break, .. } => Some(tie_break),
        }
    }
}

// ******** Output data structures *********

/// Statistics for one STV round
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    /// First-choice counts of the candidates running in this round, in candidate order.
    pub tally: Vec<(CandidateId, u64)>,
    /// Empty when every running candidate shared the lowest count.
    pub eliminated: Vec<CandidateId>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    pub winner: CandidateId,
    /// Total points per candidate, in candidate order. Empty for the rules that
    /// do not score candidates (dictatorship, STV).
    pub tally: Vec<(CandidateId, i64)>,
    /// Only filled by STV.
    pub round_stats: Vec<RoundStats>,
    pub tiebreak: TiebreakSituation,
}
