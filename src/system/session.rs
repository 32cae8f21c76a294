use std::sync::LazyLock;

use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{RaggedPattern, rows, trim};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

/// USER TTY FROM LOGIN@ IDLE JCPU PCPU WHAT
static W_ROW: LazyLock<RaggedPattern> = LazyLock::new(|| RaggedPattern::new(8));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggedOn {
    pub user: String,
    #[serde(rename = "TTY")]
    pub tty: String,
    pub from: String,
    pub login: String,
    pub idle: String,
    #[serde(rename = "JCPU")]
    pub jcpu: String,
    #[serde(rename = "PCPU")]
    pub pcpu: String,
    pub what: String,
}

/// `w` without its header, minus its own session row. Column widths are
/// passed to the `w` process alone.
pub fn pipeline(user_len: u16, from_len: u16) -> Pipeline {
    Pipeline::of(
        CommandSpec::new("w")
            .arg("-ih")
            .env("PROCPS_USERLEN", user_len)
            .env("PROCPS_FROMLEN", from_len),
    )
    .pipe(
        CommandSpec::new("grep")
            .args(["-v", "w -ih"])
            .tolerate_exit(1),
    )
}

pub fn collect(
    runner: &dyn Runner,
    user_len: u16,
    from_len: u16,
) -> Result<Vec<LoggedOn>, CollectError> {
    let output = runner.run(&pipeline(user_len, from_len))?;
    parse(&output).map_err(|err| CollectError::parse(Metric::LoggedOn, err))
}

pub fn parse(output: &str) -> Result<Vec<LoggedOn>, ParseError> {
    rows(output)
        .map(|line| {
            let columns = W_ROW.extract(line)?;
            let &[user, tty, from, login, idle, jcpu, pcpu, what] = columns.as_slice() else {
                return Err(ParseError::Pattern {
                    columns: W_ROW.columns(),
                    line: line.to_string(),
                });
            };
            Ok(LoggedOn {
                user: user.to_string(),
                tty: tty.to_string(),
                from: from.to_string(),
                login: login.to_string(),
                idle: idle.to_string(),
                jcpu: jcpu.to_string(),
                pcpu: pcpu.to_string(),
                what: trim(what).to_string(),
            })
        })
        .collect()
}
