use crate::config::CollectorsConfig;
use crate::error::CollectError;
use crate::fault;
use crate::metric::Metric;
use crate::pipeline::{ProcessRunner, Runner};

use super::snapshot::Snapshot;
use super::{account, cpu, disk, host, memory, network, process, session};

/// Dispatches metrics to their collectors. Holds no collected state: every
/// call spawns its own processes and returns a fresh snapshot, so one
/// `Collector` can serve concurrent requests.
pub struct Collector {
    runner: Box<dyn Runner>,
    settings: CollectorsConfig,
    hostname: String,
}

impl Collector {
    /// Live collector. Fails when the host name cannot be determined, since
    /// the `ip` metric depends on it.
    pub fn new(settings: CollectorsConfig) -> Result<Self, CollectError> {
        let host = host::hostname()?;
        Ok(Self::with_runner(
            Box::new(ProcessRunner),
            settings,
            host.hostname,
        ))
    }

    pub fn with_runner(
        runner: Box<dyn Runner>,
        settings: CollectorsConfig,
        hostname: impl Into<String>,
    ) -> Self {
        Collector {
            runner,
            settings,
            hostname: hostname.into(),
        }
    }

    /// Host name resolved at construction, used for the `ip` lookup.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn collect(&self, metric: Metric) -> Result<Snapshot, CollectError> {
        let runner = self.runner.as_ref();
        let settings = &self.settings;

        let result = fault::guard(metric, || match metric {
            Metric::Hostname => host::hostname().map(Snapshot::Host),
            Metric::Ip => host::ip(&self.hostname).map(Snapshot::Ip),
            Metric::Cpu => cpu::collect(runner).map(Snapshot::Cpu),
            Metric::Mem => memory::collect(runner).map(Snapshot::Memory),
            Metric::Disk => disk::collect(runner).map(Snapshot::Disk),
            Metric::Top => process::collect(runner, settings.top_header_lines).map(Snapshot::Top),
            Metric::LoggedOn => {
                session::collect(runner, settings.w_user_len, settings.w_from_len)
                    .map(Snapshot::LoggedOn)
            }
            Metric::Passwd => account::collect(runner, settings.system_uid_max).map(Snapshot::Users),
            Metric::Network => network::collect(runner).map(Snapshot::Network),
        });

        if let Err(err) = &result {
            tracing::warn!(metric = %metric, error = %err, "collection failed");
        }
        result
    }

    /// String-keyed entry point for the HTTP layer.
    pub fn invoke(&self, key: &str) -> Result<Snapshot, CollectError> {
        let metric: Metric = key.parse()?;
        self.collect(metric)
    }
}
