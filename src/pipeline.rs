use std::fmt;
use std::io::{self, Read};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use crate::error::PipelineError;

/// One external program invocation inside a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    tolerated_exit_codes: Vec<i32>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            tolerated_exit_codes: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for this process only. The parent
    /// environment is never touched.
    pub fn env(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.envs.push((key.into(), value.to_string()));
        self
    }

    /// Treat `code` as a normal exit, e.g. `grep` exiting 1 when nothing matched.
    pub fn tolerate_exit(mut self, code: i32) -> Self {
        self.tolerated_exit_codes.push(code);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stderr(Stdio::null());
        command
    }

    fn accepts(&self, status: ExitStatus) -> bool {
        if status.success() {
            return true;
        }
        match status.code() {
            Some(code) => self.tolerated_exit_codes.contains(&code),
            // Upstream of `head` and friends: the reader left early.
            None => killed_by_broken_pipe(status),
        }
    }
}

#[cfg(unix)]
fn killed_by_broken_pipe(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;

    const SIGPIPE: i32 = 13;
    status.signal() == Some(SIGPIPE)
}

#[cfg(not(unix))]
fn killed_by_broken_pipe(_status: ExitStatus) -> bool {
    false
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={} ", shell_quote(value))?;
        }
        f.write_str(&shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:^+=,@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// An ordered chain of commands, each stage's stdout feeding the next stage's stdin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<CommandSpec>,
}

impl Pipeline {
    pub fn new(stages: Vec<CommandSpec>) -> Self {
        Pipeline { stages }
    }

    pub fn of(first: CommandSpec) -> Self {
        Pipeline {
            stages: vec![first],
        }
    }

    pub fn pipe(mut self, stage: CommandSpec) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[CommandSpec] {
        &self.stages
    }
}

/// Renders the pipeline the way it would be typed into a shell.
impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

/// Seam between collectors and live processes.
pub trait Runner: Send + Sync {
    fn run(&self, pipeline: &Pipeline) -> Result<String, PipelineError>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, pipeline: &Pipeline) -> Result<String, PipelineError> {
        tracing::debug!(%pipeline, "running pipeline");
        let result = run(pipeline.stages());
        if let Err(err) = &result {
            tracing::debug!(%pipeline, error = %err, "pipeline failed");
        }
        result
    }
}

enum StageFailure {
    Spawn(io::Error),
    Read(io::Error),
    Wait(io::Error),
    Exit(ExitStatus),
}

impl StageFailure {
    fn into_error(self, program: String, partial_output: String) -> PipelineError {
        match self {
            StageFailure::Spawn(source) => PipelineError::Spawn {
                program,
                source,
                partial_output,
            },
            StageFailure::Read(source) => PipelineError::Read {
                program,
                source,
                partial_output,
            },
            StageFailure::Wait(source) => PipelineError::Wait {
                program,
                source,
                partial_output,
            },
            StageFailure::Exit(status) => PipelineError::Exit {
                program,
                status,
                partial_output,
            },
        }
    }
}

/// Starts every stage in order, collects the last stage's stdout and waits
/// on every started stage, whatever happened before.
///
/// The first failure wins. Output captured up to that point is carried inside
/// the error and never returned as a result.
pub fn run(stages: &[CommandSpec]) -> Result<String, PipelineError> {
    if stages.is_empty() {
        return Err(PipelineError::Empty);
    }

    let mut children: Vec<(&CommandSpec, Child)> = Vec::with_capacity(stages.len());
    let mut upstream: Option<ChildStdout> = None;
    let mut first_failure: Option<(&str, StageFailure)> = None;

    for spec in stages {
        let mut command = spec.command();
        let stdin = match upstream.take() {
            Some(out) => Stdio::from(out),
            None => Stdio::null(),
        };
        command.stdin(stdin).stdout(Stdio::piped());

        match command.spawn() {
            Ok(mut child) => {
                upstream = child.stdout.take();
                children.push((spec, child));
            }
            Err(err) => {
                // Dropping `command` closes the pipe handed to it, so the
                // stages already running see EOF or SIGPIPE and exit.
                first_failure = Some((spec.program(), StageFailure::Spawn(err)));
                break;
            }
        }
    }

    let mut raw = Vec::new();
    if let Some(mut out) = upstream.take()
        && let Err(err) = out.read_to_end(&mut raw)
    {
        let program = stages[stages.len() - 1].program();
        first_failure.get_or_insert((program, StageFailure::Read(err)));
    }

    for (spec, mut child) in children {
        match child.wait() {
            Ok(status) if spec.accepts(status) => {}
            Ok(status) => {
                first_failure.get_or_insert((spec.program(), StageFailure::Exit(status)));
            }
            Err(err) => {
                first_failure.get_or_insert((spec.program(), StageFailure::Wait(err)));
            }
        }
    }

    let output = String::from_utf8_lossy(&raw).into_owned();
    match first_failure {
        None => Ok(output),
        Some((program, failure)) => Err(failure.into_error(program.to_string(), output)),
    }
}
