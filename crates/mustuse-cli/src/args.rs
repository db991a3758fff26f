use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the mustuse binary.
#[derive(Parser, Debug)]
#[command(
    name = "mustuse",
    version,
    about = "Report Result values that are never handled"
)]
pub struct CliArgs {
    /// Path to mustuse.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Declaration file visible to every checked file. Repeatable.
    #[arg(long, value_delimiter = ',')]
    pub lib: Vec<PathBuf>,

    /// Run without type information (the must-use rule refuses to run).
    #[arg(long = "no-types", alias = "noTypes")]
    pub no_types: bool,

    /// Print names of files that would be checked and then stop.
    #[arg(long = "listFilesOnly", alias = "list-files-only")]
    pub list_files_only: bool,

    /// Output format of diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable color in text output.
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Disable color in text output.
    #[arg(long = "no-pretty", overrides_with = "pretty")]
    pub no_pretty: bool,

    /// Files or directories to check. Defaults to the project's include
    /// patterns.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl CliArgs {
    /// Explicit color choice, if any flag was given.
    pub fn pretty(&self) -> Option<bool> {
        if self.pretty {
            Some(true)
        } else if self.no_pretty {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// tsc-style text with source snippets.
    Text,
    /// The diagnostics array as JSON.
    Json,
}
