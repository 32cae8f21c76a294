#![allow(dead_code)]

use std::collections::HashMap;
use std::io;

use sysdash::Collector;
use sysdash::config::CollectorsConfig;
use sysdash::pipeline::{Pipeline, Runner};
use sysdash::system::{account, cpu, disk, memory, network, process, session};
use sysdash::PipelineError;

pub const CPU_COUNT: &str = "4\n";
pub const CPU_MODEL: &str = " Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz\n";
pub const CPU_MHZ: &str = " 1992.002\n";
pub const LOADAVG: &str = "0.52;0.58;0.59;2/1234\n";

pub const FREE_M: &str = "\
total;used;free;shared
Mem:;15923;4211;8020
Swap:;2047;0;2047
Total:;17970;4211;10067
";

pub const FREE_H: &str = "\
total;used;free;shared
Mem:;15Gi;4.1Gi;7.8Gi
Swap:;2.0Gi;0B;2.0Gi
Total:;17Gi;4.1Gi;9.8Gi
";

pub const DF: &str = "\
Filesystem;Size;Used;Avail;Capacity;Mounted
/dev/sda1;40G;12G;26G;32%;/
tmpfs;7.8G;0;7.8G;0%;/dev/shm
/dev/sda2;457G;301G;133G;70%;/home
";

pub const TOP_HEADER: &str = "\
top - 10:14:02 up 3 days,  1:02,  2 users,  load average: 0.52, 0.58, 0.59
Tasks: 212 total,   1 running, 211 sleeping,   0 stopped,   0 zombie
%Cpu(s):  2.1 us,  0.8 sy,  0.0 ni, 96.9 id,  0.1 wa,  0.0 hi,  0.1 si,  0.0 st
MiB Mem :  15923.4 total,   8020.1 free,   4211.7 used,   3691.6 buff/cache
MiB Swap:   2048.0 total,   2048.0 free,      0.0 used.  11318.2 avail Mem
";

pub const PS: &str = "\
root         1  0.0  0.1 167744 11892 ?        Ss   Oct16   0:04 /sbin/init splash
root         2  0.0  0.0      0     0 ?        S    Oct16   0:00 [kthreadd]
postgres   812  0.3  1.9 215332 160204 ?       Ss   Oct16   2:11 postgres: checkpointer
alice     4242 12.5  4.0 3418200 330112 pts/0  Sl+  09:15   1:02 /usr/bin/python3 -m http.server 8000
";

pub const W: &str = "\
alice    pts/0    192.168.1.20     09:12    3:05   0.21s  0.21s -bash
bob      pts/1    10.0.0.7         10:01    0.00s  1.02s  0.88s vim /etc/hosts
";

pub const PASSWD: &str = "\
system;root;root;/root;/bin/bash
system;daemon;daemon;/usr/sbin;/usr/sbin/nologin
user;nobody;nobody;/nonexistent;/usr/sbin/nologin
user;alice;Alice Example,,,;/home/alice;/bin/zsh
";

pub const IP_ADDR: &str = "\
lo;inet;127.0.0.1/8
lo;inet6;::1/128
eth0;inet;10.0.0.5/24
eth0;inet6;fe80::5054:ff:fe12:3456/64
";

/// Serves canned output keyed by the rendered pipeline. Unknown pipelines
/// fail the way a missing program would.
#[derive(Default)]
pub struct FixtureRunner {
    outputs: HashMap<String, String>,
}

impl FixtureRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pipeline: Pipeline, output: &str) -> Self {
        self.outputs.insert(pipeline.to_string(), output.to_string());
        self
    }

    pub fn without(mut self, pipeline: Pipeline) -> Self {
        self.outputs.remove(&pipeline.to_string());
        self
    }

    pub fn healthy() -> Self {
        let settings = CollectorsConfig::default();
        Self::new()
            .with(cpu::processors_pipeline(), CPU_COUNT)
            .with(cpu::cpuinfo_field_pipeline("^model name"), CPU_MODEL)
            .with(cpu::cpuinfo_field_pipeline("^cpu MHz"), CPU_MHZ)
            .with(cpu::loadavg_pipeline(), LOADAVG)
            .with(memory::machine_pipeline(), FREE_M)
            .with(memory::human_pipeline(), FREE_H)
            .with(disk::pipeline(), DF)
            .with(process::header_pipeline(settings.top_header_lines), TOP_HEADER)
            .with(process::table_pipeline(), PS)
            .with(
                session::pipeline(settings.w_user_len, settings.w_from_len),
                W,
            )
            .with(account::pipeline(settings.system_uid_max), PASSWD)
            .with(network::pipeline(), IP_ADDR)
    }
}

impl Runner for FixtureRunner {
    fn run(&self, pipeline: &Pipeline) -> Result<String, PipelineError> {
        let key = pipeline.to_string();
        match self.outputs.get(&key) {
            Some(output) => Ok(output.clone()),
            None => Err(PipelineError::Spawn {
                program: key,
                source: io::Error::from(io::ErrorKind::NotFound),
                partial_output: String::new(),
            }),
        }
    }
}

pub fn collector(runner: FixtureRunner) -> Collector {
    Collector::with_runner(Box::new(runner), CollectorsConfig::default(), "127.0.0.1")
}
