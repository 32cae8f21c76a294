use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{parse_float, parse_int, split_fields, trim};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cpu {
    pub processors: u32,
    pub model_name: String,
    /// Clock speed of the first processor in MHz.
    pub speed: f64,
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    /// `running/total` scheduling entities.
    pub processes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadAverage {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub processes: String,
}

fn cpuinfo() -> CommandSpec {
    CommandSpec::new("cat").arg("/proc/cpuinfo")
}

pub fn processors_pipeline() -> Pipeline {
    Pipeline::of(cpuinfo()).pipe(
        CommandSpec::new("grep")
            .args(["-c", "^processor"])
            .tolerate_exit(1),
    )
}

/// Value of the first `/proc/cpuinfo` line starting with `prefix`.
pub fn cpuinfo_field_pipeline(prefix: &str) -> Pipeline {
    Pipeline::of(cpuinfo())
        .pipe(CommandSpec::new("grep").arg(prefix).tolerate_exit(1))
        .pipe(CommandSpec::new("head").args(["-n", "1"]))
        .pipe(CommandSpec::new("awk").args(["-F:", "{print $2;}"]))
}

pub fn loadavg_pipeline() -> Pipeline {
    Pipeline::of(CommandSpec::new("cat").arg("/proc/loadavg"))
        .pipe(CommandSpec::new("awk").arg(r#"{print $1";"$2";"$3";"$4;}"#))
}

pub fn collect(runner: &dyn Runner) -> Result<Cpu, CollectError> {
    let fail = |err| CollectError::parse(Metric::Cpu, err);

    let processors = parse_processors(&runner.run(&processors_pipeline())?).map_err(fail)?;
    let model_name = trim(&runner.run(&cpuinfo_field_pipeline("^model name"))?).to_string();
    let speed = parse_float("cpu MHz", &runner.run(&cpuinfo_field_pipeline("^cpu MHz"))?)
        .map_err(fail)?;
    let load = parse_loadavg(&runner.run(&loadavg_pipeline())?).map_err(fail)?;

    Ok(Cpu {
        processors,
        model_name,
        speed,
        load1: load.load1,
        load5: load.load5,
        load15: load.load15,
        processes: load.processes,
    })
}

pub fn parse_processors(output: &str) -> Result<u32, ParseError> {
    let processors: u32 = parse_int("processors", output)?;
    if processors == 0 {
        return Err(ParseError::OutOfRange {
            field: "processors",
            value: 0,
        });
    }
    Ok(processors)
}

/// Parses `load1;load5;load15;running/total`.
pub fn parse_loadavg(output: &str) -> Result<LoadAverage, ParseError> {
    let line = trim(output);
    if line.is_empty() {
        return Err(ParseError::NoOutput);
    }
    let fields = split_fields(line, 4)?;
    Ok(LoadAverage {
        load1: parse_float("load1", fields[0])?,
        load5: parse_float("load5", fields[1])?,
        load15: parse_float("load15", fields[2])?,
        processes: trim(fields[3]).to_string(),
    })
}
