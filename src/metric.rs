use std::fmt;
use std::str::FromStr;

use crate::error::CollectError;

/// Every metric the dashboard can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Hostname,
    Ip,
    Cpu,
    Mem,
    Disk,
    Top,
    LoggedOn,
    Passwd,
    Network,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Hostname,
        Metric::Ip,
        Metric::Cpu,
        Metric::Mem,
        Metric::Disk,
        Metric::Top,
        Metric::LoggedOn,
        Metric::Passwd,
        Metric::Network,
    ];

    /// Dispatch key used by the HTTP layer.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Hostname => "hostname",
            Metric::Ip => "ip",
            Metric::Cpu => "cpu",
            Metric::Mem => "mem",
            Metric::Disk => "disk",
            Metric::Top => "top",
            Metric::LoggedOn => "logged_on",
            Metric::Passwd => "passwd",
            Metric::Network => "network",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.key() == s)
            .ok_or_else(|| CollectError::UnknownMetric(s.to_string()))
    }
}
