use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes, one per error class.
#[allow(dead_code)]
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_IO: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_FORMAT: i32 = 3;
pub const EXIT_TYPE: i32 = 4;

/// Unified error type for CLI operations.
pub enum CliError {
    /// File cannot be opened, read, or written.
    Io(String),
    /// Argument / usage errors.
    Usage(String),
    /// Input does not parse under the detected syntax, or the graph
    /// cannot be rendered in the requested one.
    Format(kindred_format::FormatError),
    /// An age value that is not a well-formed integer.
    Classify(kindred_family::ClassifyError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Format(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Classify(e) => write!(f, "{} {e}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<kindred_format::FormatError> for CliError {
    fn from(e: kindred_format::FormatError) -> Self {
        match e {
            kindred_format::FormatError::Io { .. } => CliError::Io(e.to_string()),
            other => CliError::Format(other),
        }
    }
}

impl From<kindred_family::ClassifyError> for CliError {
    fn from(e: kindred_family::ClassifyError) -> Self {
        CliError::Classify(e)
    }
}

/// Print the error and exit with its class's code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Io(_) => EXIT_IO,
        CliError::Usage(_) => EXIT_USAGE,
        CliError::Format(_) => EXIT_FORMAT,
        CliError::Classify(_) => EXIT_TYPE,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
