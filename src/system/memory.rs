use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{DELIMITER, parse_int, rows, split_fields, trim};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

/// One row of `free`: megabytes plus their human-readable rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemoryData {
    pub total_m: u64,
    pub total_h: String,
    pub used_m: u64,
    pub used_h: String,
    pub free_m: u64,
    pub free_h: String,
}

impl MemoryData {
    /// Fills every human-readable field left empty with `<N>M`.
    fn fill_human_fallbacks(&mut self) {
        for (human, machine) in [
            (&mut self.total_h, self.total_m),
            (&mut self.used_h, self.used_m),
            (&mut self.free_h, self.free_m),
        ] {
            if human.is_empty() {
                *human = format!("{machine}M");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memory {
    #[serde(rename = "RAM")]
    pub ram: MemoryData,
    pub swap: MemoryData,
    pub total: MemoryData,
}

const LABELS: [&str; 3] = ["Mem:", "Swap:", "Total:"];

impl Memory {
    fn row_mut(&mut self, label: &str) -> Option<&mut MemoryData> {
        match label {
            "Mem:" => Some(&mut self.ram),
            "Swap:" => Some(&mut self.swap),
            "Total:" => Some(&mut self.total),
            _ => None,
        }
    }

    fn fill_human_fallbacks(&mut self) {
        self.ram.fill_human_fallbacks();
        self.swap.fill_human_fallbacks();
        self.total.fill_human_fallbacks();
    }
}

fn free(flags: &str) -> Pipeline {
    Pipeline::of(CommandSpec::new("free").arg(flags))
        .pipe(CommandSpec::new("awk").arg(r#"{print $1";"$2";"$3";"$4;}"#))
}

pub fn machine_pipeline() -> Pipeline {
    free("-tm")
}

pub fn human_pipeline() -> Pipeline {
    free("-th")
}

pub fn collect(runner: &dyn Runner) -> Result<Memory, CollectError> {
    let machine = runner.run(&machine_pipeline())?;
    let mut memory =
        parse_machine(&machine).map_err(|err| CollectError::parse(Metric::Mem, err))?;

    match runner.run(&human_pipeline()) {
        Ok(human) => apply_human(&mut memory, &human),
        Err(err) => {
            tracing::warn!(error = %err, "human-readable memory pass failed, using megabytes");
        }
    }
    memory.fill_human_fallbacks();

    Ok(memory)
}

/// Megabyte pass. The column header is skipped and all three rows are required.
pub fn parse_machine(output: &str) -> Result<Memory, ParseError> {
    let mut found: [Option<MemoryData>; 3] = Default::default();

    for line in rows(output).skip(1) {
        let fields = split_fields(line, 4)?;
        let Some(slot) = LABELS.iter().position(|label| *label == trim(fields[0])) else {
            continue;
        };
        found[slot] = Some(MemoryData {
            total_m: parse_int("total", fields[1])?,
            used_m: parse_int("used", fields[2])?,
            free_m: parse_int("free", fields[3])?,
            ..MemoryData::default()
        });
    }

    let [ram, swap, total] = found;
    Ok(Memory {
        ram: ram.ok_or(ParseError::MissingRow(LABELS[0]))?,
        swap: swap.ok_or(ParseError::MissingRow(LABELS[1]))?,
        total: total.ok_or(ParseError::MissingRow(LABELS[2]))?,
    })
}

/// Human-readable pass, merged by row label. Missing or short rows leave the
/// fields empty for the fallback to fill.
pub fn apply_human(memory: &mut Memory, output: &str) {
    for line in rows(output).skip(1) {
        let mut fields = line.splitn(4, DELIMITER).map(trim);
        let Some(data) = fields.next().and_then(|label| memory.row_mut(label)) else {
            continue;
        };
        data.total_h = fields.next().unwrap_or_default().to_string();
        data.used_h = fields.next().unwrap_or_default().to_string();
        data.free_h = fields.next().unwrap_or_default().to_string();
    }
}
