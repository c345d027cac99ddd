use clap::Parser;

/// This is a single-winner election program: it applies a classic voting rule to a set of complete rankings.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file containing the election description, in JSON.
    /// For more information about the file format, read the `manual` module of the social_choice library.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, socialchoice will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Otherwise it is printed on the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (dictatorship, scoring, plurality, veto, borda or stv) Overrides the rule set in the election description.
    #[clap(long, value_parser)]
    pub rule: Option<String>,

    /// (voter number) Overrides the tie-breaking voter set in the election description.
    #[clap(long, value_parser)]
    pub tie_break: Option<u64>,

    /// (voter number) Overrides the dictator set in the election description.
    #[clap(long, value_parser)]
    pub agent: Option<u64>,

    /// (list of comma-separated integers) Overrides the score vector of the scoring rule, best rank first.
    #[clap(long, value_parser, value_delimiter = ',', allow_hyphen_values = true)]
    pub score_vector: Option<Vec<i64>>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
