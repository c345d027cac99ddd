use crate::election::*;

use log::debug;
use snafu::prelude::*;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_juridiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: Option<String>,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
    pub rule: String,
    #[serde(rename = "tieBreakVoter")]
    pub tie_break_voter: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub name: String,
}

/// A position in a ranking: either the number of the candidate or its name.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankEntry {
    Id(u32),
    Name(String),
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigBallot {
    pub voter: u64,
    pub ranking: Vec<RankEntry>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    pub rule: String,
    #[serde(rename = "tieBreakVoter")]
    pub tie_break_voter: Option<u64>,
    pub dictator: Option<u64>,
    #[serde(rename = "scoreVector")]
    pub score_vector: Option<Vec<i64>>,
    #[serde(rename = "stvTermination")]
    pub stv_termination: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    pub candidates: Option<Vec<ConfigCandidate>>,
    pub ballots: Vec<ConfigBallot>,
    pub rules: ConfigRules,
}

pub fn read_config(path: &str) -> ElectionResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents, path)
}

pub fn parse_config(contents: &str, path: &str) -> ElectionResult<ElectionConfig> {
    let config: ElectionConfig =
        serde_json::from_str(contents).context(ParsingJsonSnafu { path })?;
    debug!("parse_config: {} ballots", config.ballots.len());
    Ok(config)
}

pub fn read_summary(path: &str) -> ElectionResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}
