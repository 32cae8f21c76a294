use std::str::FromStr;

use regex::Regex;

use crate::error::ParseError;

/// Field separator emitted by the `awk` reformatting stages.
pub const DELIMITER: char = ';';

const TRIM_CHARS: [char; 5] = ['\t', '\n', '\x0c', '\r', ' '];

pub fn trim(input: &str) -> &str {
    input.trim_matches(&TRIM_CHARS[..])
}

/// Lines of the trimmed output. Empty output has no rows.
pub fn rows(output: &str) -> impl Iterator<Item = &str> {
    let body = trim(output);
    body.split('\n').filter(move |_| !body.is_empty())
}

/// Splits a delimiter-joined row into exactly `arity` fields. The last field
/// keeps any further delimiters.
pub fn split_fields(line: &str, arity: usize) -> Result<Vec<&str>, ParseError> {
    let fields: Vec<&str> = line.splitn(arity, DELIMITER).collect();
    if fields.len() < arity {
        return Err(ParseError::Shape {
            expected: arity,
            line: line.to_string(),
        });
    }
    Ok(fields)
}

pub fn parse_int<T>(field: &'static str, value: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    trim(value).parse().map_err(|source| ParseError::Int {
        field,
        value: value.to_string(),
        source,
    })
}

pub fn parse_float(field: &'static str, value: &str) -> Result<f64, ParseError> {
    trim(value).parse().map_err(|source| ParseError::Float {
        field,
        value: value.to_string(),
        source,
    })
}

/// Fixed number of whitespace-separated columns where the last column is the
/// rest of the line, embedded whitespace included.
#[derive(Debug, Clone)]
pub struct RaggedPattern {
    columns: usize,
    regex: Regex,
}

impl RaggedPattern {
    pub fn new(columns: usize) -> Self {
        assert!(columns > 0, "a ragged pattern needs at least one column");
        let mut source = String::from("^");
        for _ in 1..columns {
            source.push_str(r"(\S+)\s+");
        }
        source.push_str("(.*)$");
        let regex = Regex::new(&source).expect("ragged column pattern is valid");
        RaggedPattern { columns, regex }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Captured columns, or `None` when the line has too few columns.
    pub fn captures<'a>(&self, line: &'a str) -> Option<Vec<&'a str>> {
        let caps = self.regex.captures(line)?;
        Some(
            (1..=self.columns)
                .map(|i| caps.get(i).map_or("", |m| m.as_str()))
                .collect(),
        )
    }

    /// Like [`RaggedPattern::captures`] but a mismatch is an error.
    pub fn extract<'a>(&self, line: &'a str) -> Result<Vec<&'a str>, ParseError> {
        self.captures(line).ok_or_else(|| ParseError::Pattern {
            columns: self.columns,
            line: line.to_string(),
        })
    }
}
