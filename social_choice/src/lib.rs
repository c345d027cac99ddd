/*!
Classic single-winner voting rules over complete preference profiles.

Every voter ranks all the candidates `1..=n`. The rules available are:
dictatorship, positional scoring with an arbitrary score vector, plurality,
veto, Borda and Single Transferable Vote (STV). Whenever several candidates
are tied for the win, the ranking of a designated voter decides.

```
use social_choice::*;
# fn main() -> Result<(), VotingErrors> {
let profile = Profile::new(vec![
    (1, vec![1, 2, 3]),
    (2, vec![1, 2, 3]),
    (3, vec![2, 1, 3]),
])?;
assert_eq!(plurality(&profile, &1)?, CandidateId(1));
assert_eq!(dictatorship(&profile, &3)?, CandidateId(2));
# Ok(())
# }
```

See the [manual] for the definition of each rule and for the input format of
the `socialchoice` program.
*/
pub mod builder;
mod config;
pub mod manual;
mod profile;
mod scoring;
mod stv;
mod tiebreak;

use log::info;
use snafu::prelude::*;

use std::{fmt::Debug, hash::Hash};

pub use crate::config::*;
pub use crate::profile::{CandidateId, Profile};
pub use crate::scoring::{
    borda, borda_tally, plurality, plurality_tally, scoring_rule, scoring_tally, veto,
    veto_tally, ScoreTally,
};
pub use crate::stv::{stv, stv_with_rules, StvResult};
pub use crate::tiebreak::{break_tie, tie_break_order};

/// The candidate ranked first by the `agent`.
pub fn dictatorship<V>(profile: &Profile<V>, agent: &V) -> Result<CandidateId, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    let ranking = profile.ranking(agent)?;
    ranking
        .first()
        .copied()
        .context(InternalInvariantViolationSnafu {
            details: "empty ranking in profile",
        })
}

/// Runs the given rule on the profile.
///
/// Besides the winner, the result contains the scores of the candidates
/// (scoring rules) or the statistics of every round (STV).
pub fn run_rule<V>(profile: &Profile<V>, rule: &Rule<V>) -> Result<VotingResult, VotingErrors>
where
    V: Eq + Hash + Clone + Debug,
{
    info!(
        "Processing {:?} voters and {:?} candidates with rule {}",
        profile.num_voters(),
        profile.num_candidates(),
        rule.name()
    );
    let res = match rule {
        Rule::Dictatorship { agent } => VotingResult {
            winner: dictatorship(profile, agent)?,
            tally: Vec::new(),
            round_stats: Vec::new(),
            tiebreak: TiebreakSituation::Clean,
        },
        Rule::Scoring {
            score_vector,
            tie_break,
        } => from_score_tally(scoring_tally(profile, score_vector, tie_break)?),
        Rule::Plurality { tie_break } => from_score_tally(plurality_tally(profile, tie_break)?),
        Rule::Veto { tie_break } => from_score_tally(veto_tally(profile, tie_break)?),
        Rule::Borda { tie_break } => from_score_tally(borda_tally(profile, tie_break)?),
        Rule::Stv { tie_break, rules } => {
            let sr = stv_with_rules(profile, tie_break, rules)?;
            VotingResult {
                winner: sr.winner,
                tally: Vec::new(),
                round_stats: sr.round_stats,
                tiebreak: sr.tiebreak,
            }
        }
    };
    info!("Winner: {} ({:?})", res.winner, res.tiebreak);
    Ok(res)
}

fn from_score_tally(st: ScoreTally) -> VotingResult {
    VotingResult {
        winner: st.winner,
        tally: st.scores,
        round_stats: Vec::new(),
        tiebreak: st.tiebreak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictator_first_choice() {
        let p = Profile::new(vec![(10, vec![2, 3, 1]), (20, vec![3, 1, 2])]).unwrap();
        assert_eq!(dictatorship(&p, &10), Ok(CandidateId(2)));
        assert_eq!(dictatorship(&p, &20), Ok(CandidateId(3)));
        assert_eq!(
            dictatorship(&p, &30),
            Err(VotingErrors::UnknownVoter {
                voter: "30".to_string()
            })
        );
    }

    #[test]
    fn run_rule_dispatch() {
        let p = Profile::new(vec![(1, vec![1, 2]), (2, vec![2, 1]), (3, vec![2, 1])]).unwrap();

        let res = run_rule(&p, &Rule::Dictatorship { agent: 1 }).unwrap();
        assert_eq!(res.winner, CandidateId(1));
        assert!(res.tally.is_empty());

        let res = run_rule(&p, &Rule::Borda { tie_break: 1 }).unwrap();
        assert_eq!(res.winner, CandidateId(2));
        assert_eq!(res.tally, vec![(CandidateId(1), 1), (CandidateId(2), 2)]);

        let res = run_rule(
            &p,
            &Rule::Stv {
                tie_break: 1,
                rules: StvRules::DEFAULT_RULES,
            },
        )
        .unwrap();
        assert_eq!(res.winner, CandidateId(2));
        assert_eq!(res.round_stats.len(), 1);

        assert!(matches!(
            run_rule(
                &p,
                &Rule::Scoring {
                    score_vector: vec![1],
                    tie_break: 1
                }
            ),
            Err(VotingErrors::InvalidScoreVector { .. })
        ));
    }

    #[test]
    fn rule_names() {
        assert_eq!(Rule::Veto { tie_break: 1 }.name(), "veto");
        assert_eq!(
            Rule::Stv {
                tie_break: 1,
                rules: StvRules::default()
            }
            .name(),
            "stv"
        );
        assert_eq!(Rule::Borda { tie_break: 4 }.tie_break(), Some(&4));
        assert_eq!(Rule::Dictatorship { agent: 4 }.tie_break(), None);
    }
}
