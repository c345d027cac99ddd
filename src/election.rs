use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use social_choice::*;

use std::collections::HashMap;
use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::election::config_reader::*;

#[derive(Debug, Snafu)]
pub enum ElectionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ElectionResult<T> = Result<T, ElectionError>;

pub mod config_reader;

fn candidate_name(names: &[String], cid: CandidateId) -> String {
    (cid.0 as usize)
        .checked_sub(1)
        .and_then(|idx| names.get(idx))
        .cloned()
        .unwrap_or_else(|| cid.to_string())
}

fn result_stats_to_json(rs: &VotingResult, names: &[String]) -> JSValue {
    let mut tally: JSMap<String, JSValue> = JSMap::new();
    for (cid, score) in rs.tally.iter() {
        tally.insert(candidate_name(names, *cid), json!(score.to_string()));
    }

    let mut rounds: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut round_tally: JSMap<String, JSValue> = JSMap::new();
        for (cid, count) in round_stat.tally.iter() {
            round_tally.insert(candidate_name(names, *cid), json!(count.to_string()));
        }
        let eliminated: Vec<String> = round_stat
            .eliminated
            .iter()
            .map(|cid| candidate_name(names, *cid))
            .collect();
        rounds.push(json!({
            "round": round_stat.round,
            "tally": round_tally,
            "eliminated": eliminated
        }));
    }

    json!({
        "winner": candidate_name(names, rs.winner),
        "tiebreak": rs.tiebreak == TiebreakSituation::TiebreakOccured,
        "tally": tally,
        "rounds": rounds
    })
}

fn build_summary_js(
    config: &ElectionConfig,
    rule: &Rule<u64>,
    names: &[String],
    rv: &VotingResult,
) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_juridiction.clone(),
        office: config.output_settings.contest_office.clone(),
        rule: rule.name().to_string(),
        tie_break_voter: rule.tie_break().map(|v| v.to_string()),
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv, names) })
}

/// Converts the ballots of the configuration into a profile.
///
/// Also returns the names of the candidates, in candidate order.
fn build_profile(config: &ElectionConfig) -> ElectionResult<(Profile<u64>, Vec<String>)> {
    let declared: Vec<String> = config
        .candidates
        .iter()
        .flatten()
        .map(|c| c.name.clone())
        .collect();
    let mut by_name: HashMap<&str, u32> = HashMap::new();
    for (idx, name) in declared.iter().enumerate() {
        if by_name.insert(name.as_str(), (idx + 1) as u32).is_some() {
            whatever!("Candidate {:?} is declared more than once", name)
        }
    }

    let mut preferences: Vec<(u64, Vec<u32>)> = Vec::new();
    for ballot in config.ballots.iter() {
        let mut ranking: Vec<u32> = Vec::new();
        for entry in ballot.ranking.iter() {
            let cid = match entry {
                RankEntry::Id(x) => *x,
                RankEntry::Name(name) => match by_name.get(name.as_str()) {
                    Some(cid) => *cid,
                    None => whatever!("Voter {}: unknown candidate {:?}", ballot.voter, name),
                },
            };
            ranking.push(cid);
        }
        debug!("Ranking for voter {:?}: {:?}", ballot.voter, ranking);
        preferences.push((ballot.voter, ranking));
    }

    let profile = Profile::new(preferences).context(VotingSnafu {})?;
    if !declared.is_empty() && declared.len() != profile.num_candidates() {
        whatever!(
            "{} candidates are declared, but the ballots rank {} candidates",
            declared.len(),
            profile.num_candidates()
        )
    }
    let names = if declared.is_empty() {
        profile.candidates().iter().map(|c| c.to_string()).collect()
    } else {
        declared
    };
    Ok((profile, names))
}

fn required<T>(value: Option<T>, rule: &str, what: &str) -> ElectionResult<T> {
    match value {
        Some(x) => Ok(x),
        None => whatever!("Rule {} requires {}", rule, what),
    }
}

fn validate_rules(rules: &ConfigRules, args: &Args) -> ElectionResult<Rule<u64>> {
    let rule_name = args.rule.clone().unwrap_or_else(|| rules.rule.clone());
    let tie_break = args.tie_break.or(rules.tie_break_voter);
    let tie_break_for = |name: &str| {
        required(
            tie_break,
            name,
            "a tie-breaking voter (tieBreakVoter or --tie-break)",
        )
    };

    let res = match rule_name.as_str() {
        "dictatorship" => Rule::Dictatorship {
            agent: required(
                args.agent.or(rules.dictator),
                "dictatorship",
                "a dictator (dictator or --agent)",
            )?,
        },
        "scoring" => Rule::Scoring {
            score_vector: required(
                args.score_vector
                    .clone()
                    .or_else(|| rules.score_vector.clone()),
                "scoring",
                "a score vector (scoreVector or --score-vector)",
            )?,
            tie_break: tie_break_for("scoring")?,
        },
        "plurality" => Rule::Plurality {
            tie_break: tie_break_for("plurality")?,
        },
        "veto" => Rule::Veto {
            tie_break: tie_break_for("veto")?,
        },
        "borda" => Rule::Borda {
            tie_break: tie_break_for("borda")?,
        },
        "stv" => Rule::Stv {
            tie_break: tie_break_for("stv")?,
            rules: StvRules {
                termination: match rules.stv_termination.as_deref() {
                    None | Some("firstRound") => StvTermination::FirstRound,
                    Some("lastStanding") => StvTermination::LastStanding,
                    Some(x) => {
                        whatever!("Cannot use stv termination {:?}: not implemented", x)
                    }
                },
            },
        },
        x => {
            whatever!("Cannot use rule {:?}: not implemented", x)
        }
    };
    Ok(res)
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> ElectionResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

pub fn run_election(args: &Args) -> ElectionResult<()> {
    let config = read_config(&args.config)?;
    info!("config: {:?}", config.output_settings);

    let rule = validate_rules(&config.rules, args)?;
    let (profile, names) = build_profile(&config)?;
    info!("Candidates: {:?}", names);

    let result = run_rule(&profile, &rule).context(VotingSnafu {})?;
    info!("res {:?}", result);

    let result_js = build_summary_js(&config, &rule, &names, &result);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    match args.out.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            fs::write(path, &pretty_js_stats).context(WritingSummarySnafu { path })?;
            info!("Summary written to {}", path);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = args.reference.as_deref() {
        check_reference(reference_path, &pretty_js_stats)?;
    }

    Ok(())
}
