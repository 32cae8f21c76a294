use serde::Serialize;

use super::account::User;
use super::cpu::Cpu;
use super::disk::DiskUsage;
use super::host::Host;
use super::memory::Memory;
use super::network::Interface;
use super::process::Top;
use super::session::LoggedOn;

/// Point-in-time record of one metric. Serializes as the bare record, the
/// way the dashboard front end consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Host(Host),
    Ip(Vec<String>),
    Cpu(Cpu),
    Memory(Memory),
    Disk(Vec<DiskUsage>),
    Top(Top),
    LoggedOn(Vec<LoggedOn>),
    Users(Vec<User>),
    Network(Vec<Interface>),
}
