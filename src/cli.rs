use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::io::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "metaclassify")]
#[command(
    about = "Classify C++ header declarations into code-generation roles",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract and classify the declarations of a translation unit AST dump
    Classify {
        /// Translation unit AST as JSON
        ast: PathBuf,

        /// Directory definition headers are reported relative to
        #[arg(long = "header-root", env = "METACLASSIFY_HEADER_ROOT")]
        header_root: Option<String>,

        /// Only classify definitions from these files (repeatable)
        #[arg(long = "input", value_name = "HEADER")]
        inputs: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reject fallback roles that only produced warnings
        #[arg(long = "no-warnings")]
        no_warnings: bool,

        /// Hide diagnostics of the fallback step
        #[arg(long = "suppress-errors")]
        suppress_errors: bool,

        /// Configuration file (defaults to the nearest .metaclassify.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a .metaclassify.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Classify { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}

/// Log filter directive for a `-v` count.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_classify_arguments() {
        let cli = Cli::parse_from([
            "metaclassify",
            "classify",
            "tu.json",
            "--input",
            "a.h",
            "--input",
            "b.h",
            "--format",
            "json",
            "-vv",
        ]);
        match cli.command {
            Commands::Classify {
                ast,
                inputs,
                format,
                verbosity,
                no_warnings,
                ..
            } => {
                assert_eq!(ast, PathBuf::from("tu.json"));
                assert_eq!(inputs, vec!["a.h", "b.h"]);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(verbosity, 2);
                assert!(!no_warnings);
            }
            Commands::Init { .. } => panic!("expected classify"),
        }
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_filter(0), "warn");
        assert_eq!(verbosity_filter(1), "info");
        assert_eq!(verbosity_filter(7), "trace");
    }
}
