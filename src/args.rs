use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Command-line arguments for fc-bundle
#[derive(Debug)]
pub struct Args {
    /// Log every archive entry
    pub verbose: bool,

    /// Keep relative paths for files found while recursing into directories
    pub preserve_paths: bool,

    /// Plan the archive without writing it
    pub dry_run: bool,

    /// Explicit output archive path
    pub output: Option<PathBuf>,

    /// Executable (unless the first input is a directory) followed by supplemental paths
    pub inputs: Vec<PathBuf>,
}

pub fn command() -> Command {
    Command::new("fc-bundle")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Put an executable and supplemental files into a zip file that works with Aliyun FunctionCompute")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .env("FC_BUNDLE_OUTPUT")
                .help("Output file path for the zip. Defaults to the first input file name")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every entry written to the archive")
        )
        .arg(
            Arg::new("preserve-paths")
                .long("preserve-paths")
                .action(ArgAction::SetTrue)
                .help("Name files inside input directories by their relative path instead of their base name")
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("List the planned entries without creating the zip")
        )
        .arg(
            Arg::new("inputs")
                .value_name("INPUT")
                .num_args(0..)
                .help("Executable followed by supplemental files or directories")
        )
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            preserve_paths: matches.get_flag("preserve-paths"),
            dry_run: matches.get_flag("dry-run"),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            inputs: matches
                .get_many::<String>("inputs")
                .map(|values| values.map(PathBuf::from).collect())
                .unwrap_or_default(),
        }
    }
}
