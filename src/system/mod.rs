pub mod account;
pub mod collector;
pub mod cpu;
pub mod disk;
pub mod host;
pub mod memory;
pub mod network;
pub mod process;
pub mod session;
pub mod snapshot;
