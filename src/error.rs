use std::io;
use std::num::{ParseFloatError, ParseIntError};
use std::process::ExitStatus;

use thiserror::Error;

use crate::metric::Metric;

/// Failure of a single collection. Every variant is terminal for the call:
/// a collector returns either a record or one of these, never both.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    ExternalTool(#[from] PipelineError),

    #[error("{metric}: {source}")]
    Parse {
        metric: Metric,
        #[source]
        source: ParseError,
    },

    #[error("{metric}: recovered from fault: {message}")]
    FaultRecovered { metric: Metric, message: String },

    #[error("lookup {host}: {reason}")]
    Lookup { host: String, reason: String },

    #[error("could not determine host name")]
    HostIdentity,

    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
}

impl CollectError {
    pub fn parse(metric: Metric, source: ParseError) -> Self {
        CollectError::Parse { metric, source }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("empty pipeline")]
    Empty,

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
        partial_output: String,
    },

    #[error("failed to read output of `{program}`: {source}")]
    Read {
        program: String,
        #[source]
        source: io::Error,
        partial_output: String,
    },

    #[error("failed waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
        partial_output: String,
    },

    #[error("`{program}` exited with {status}")]
    Exit {
        program: String,
        status: ExitStatus,
        partial_output: String,
    },
}

impl PipelineError {
    /// Whatever the last stage wrote before the failure. Only meaningful for
    /// diagnostics; it is never a valid collection result.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            PipelineError::Empty => None,
            PipelineError::Spawn { partial_output, .. }
            | PipelineError::Read { partial_output, .. }
            | PipelineError::Wait { partial_output, .. }
            | PipelineError::Exit { partial_output, .. } => Some(partial_output),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {expected} `;`-separated fields in {line:?}")]
    Shape { expected: usize, line: String },

    #[error("expected {columns} whitespace-separated columns in {line:?}")]
    Pattern { columns: usize, line: String },

    #[error("invalid integer {value:?} for {field}: {source}")]
    Int {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid number {value:?} for {field}: {source}")]
    Float {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("unexpected label {0:?}")]
    UnknownLabel(String),

    #[error("missing `{0}` row")]
    MissingRow(&'static str),

    #[error("no output")]
    NoOutput,
}
