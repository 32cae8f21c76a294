use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{parse_int, rows, split_fields, trim};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskUsage {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    pub usage_percentage: u8,
    pub mounted_on: String,
}

pub fn pipeline() -> Pipeline {
    Pipeline::of(CommandSpec::new("df").arg("-hP")).pipe(
        CommandSpec::new("awk").arg(r#"{print $1";"$2";"$3";"$4";"$5";"$6;}"#),
    )
}

pub fn collect(runner: &dyn Runner) -> Result<Vec<DiskUsage>, CollectError> {
    let output = runner.run(&pipeline())?;
    parse(&output).map_err(|err| CollectError::parse(Metric::Disk, err))
}

/// One record per mount, header rows skipped. Only the percentage is parsed.
pub fn parse(output: &str) -> Result<Vec<DiskUsage>, ParseError> {
    let mut disks = Vec::new();
    for line in rows(output).skip(1) {
        if line.starts_with("Filesystem;") {
            continue;
        }
        let fields = split_fields(line, 6)?;
        disks.push(DiskUsage {
            filesystem: fields[0].to_string(),
            size: fields[1].to_string(),
            used: fields[2].to_string(),
            available: fields[3].to_string(),
            usage_percentage: parse_percentage(fields[4])?,
            mounted_on: fields[5].to_string(),
        });
    }
    Ok(disks)
}

fn parse_percentage(value: &str) -> Result<u8, ParseError> {
    let percentage: i64 = parse_int("use%", trim(value).trim_matches('%'))?;
    match u8::try_from(percentage) {
        Ok(p) if p <= 100 => Ok(p),
        _ => Err(ParseError::OutOfRange {
            field: "use%",
            value: percentage,
        }),
    }
}
