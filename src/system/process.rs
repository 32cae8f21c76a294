use std::sync::LazyLock;

use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{RaggedPattern, parse_float, rows, trim};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

/// USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND
static PS_ROW: LazyLock<RaggedPattern> = LazyLock::new(|| RaggedPattern::new(11));

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Top {
    /// Banner lines of `top`, verbatim.
    pub header: Vec<String>,
    /// Sorted by resident set size, largest first.
    pub processes: Vec<Process>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Process {
    pub user: String,
    pub pid: f64,
    pub cpu: f64,
    pub mem: f64,
    pub vsz: f64,
    pub rss: f64,
    pub tty: String,
    pub stat: String,
    pub start: String,
    pub time: String,
    pub command: String,
}

pub fn header_pipeline(lines: usize) -> Pipeline {
    Pipeline::of(CommandSpec::new("top").args(["-b", "-n", "1"]))
        .pipe(CommandSpec::new("head").arg("-n").arg(lines.to_string()))
}

pub fn table_pipeline() -> Pipeline {
    Pipeline::of(CommandSpec::new("ps").arg("aux"))
        .pipe(CommandSpec::new("tail").args(["-n", "+2"]))
        .pipe(
            CommandSpec::new("grep")
                .args(["-v", "ps aux"])
                .tolerate_exit(1),
        )
}

pub fn collect(runner: &dyn Runner, header_lines: usize) -> Result<Top, CollectError> {
    let banner = runner.run(&header_pipeline(header_lines))?;
    let table = runner.run(&table_pipeline())?;

    Ok(Top {
        header: parse_header(&banner),
        processes: parse_table(&table).map_err(|err| CollectError::parse(Metric::Top, err))?,
    })
}

pub fn parse_header(output: &str) -> Vec<String> {
    rows(output).map(str::to_string).collect()
}

/// Parses `ps aux` rows. Rows with both VSZ and RSS at zero (kernel threads)
/// are dropped before any numeric parsing.
pub fn parse_table(output: &str) -> Result<Vec<Process>, ParseError> {
    let mut processes = Vec::new();

    for line in rows(output) {
        let columns = PS_ROW.extract(line)?;
        let &[user, pid, cpu, mem, vsz, rss, tty, stat, start, time, command] =
            columns.as_slice()
        else {
            return Err(ParseError::Pattern {
                columns: PS_ROW.columns(),
                line: line.to_string(),
            });
        };

        if vsz == "0" && rss == "0" {
            continue;
        }

        processes.push(Process {
            user: user.to_string(),
            pid: parse_float("pid", pid)?,
            cpu: parse_float("%cpu", cpu)?,
            mem: parse_float("%mem", mem)?,
            vsz: parse_float("vsz", vsz)?,
            rss: parse_float("rss", rss)?,
            tty: tty.to_string(),
            stat: stat.to_string(),
            start: start.to_string(),
            time: time.to_string(),
            command: trim(command).to_string(),
        });
    }

    processes.sort_by(|a, b| b.rss.total_cmp(&a.rss));
    Ok(processes)
}
