//! Fatal checker errors.
//!
//! Findings are diagnostics, never errors. A `CheckError` means the run
//! cannot produce meaningful findings at all.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The rule needs type information and none was provided.
    #[error(
        "Types not available; enable \"typeInformation\" and provide declaration files with \"lib\" or --lib"
    )]
    TypesUnavailable,

    #[error("no source file node in '{file_name}'")]
    MissingSourceFile { file_name: String },
}
