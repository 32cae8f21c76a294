use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{rows, split_fields};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

/// One address of one network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Interface {
    pub name: String,
    /// Address family as printed by `ip`: `inet`, `inet6`, `link`, ...
    #[serde(rename = "Type")]
    pub kind: String,
    pub value: String,
}

impl Interface {
    /// Parses a `name;family;address` row.
    pub fn from_row(line: &str) -> Result<Self, ParseError> {
        let fields = split_fields(line, 3)?;
        Ok(Interface {
            name: fields[0].to_string(),
            kind: fields[1].to_string(),
            value: fields[2].to_string(),
        })
    }
}

pub fn pipeline() -> Pipeline {
    Pipeline::of(CommandSpec::new("ip").args(["-o", "addr"]))
        .pipe(CommandSpec::new("awk").arg(r#"{print $2";"$3";"$4;}"#))
}

pub fn collect(runner: &dyn Runner) -> Result<Vec<Interface>, CollectError> {
    let output = runner.run(&pipeline())?;
    parse(&output).map_err(|err| CollectError::parse(Metric::Network, err))
}

pub fn parse(output: &str) -> Result<Vec<Interface>, ParseError> {
    rows(output).map(Interface::from_row).collect()
}
