use std::net::ToSocketAddrs;

use serde::Serialize;
use sysinfo::System;

use crate::error::CollectError;
use crate::parse::trim;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Host {
    pub hostname: String,
}

/// Name of the machine as reported by the OS.
pub fn hostname() -> Result<Host, CollectError> {
    let name = System::host_name().ok_or(CollectError::HostIdentity)?;
    let name = trim(&name);
    if name.is_empty() {
        return Err(CollectError::HostIdentity);
    }
    Ok(Host {
        hostname: name.to_string(),
    })
}

/// Forward lookup of `hostname` through the system resolver. Addresses are
/// returned in resolver order without duplicates.
pub fn ip(hostname: &str) -> Result<Vec<String>, CollectError> {
    let lookup_error = |reason: String| CollectError::Lookup {
        host: hostname.to_string(),
        reason,
    };

    let addrs = (hostname, 0)
        .to_socket_addrs()
        .map_err(|err| lookup_error(err.to_string()))?;

    let mut result: Vec<String> = Vec::new();
    for addr in addrs {
        let ip = addr.ip().to_string();
        if !result.contains(&ip) {
            result.push(ip);
        }
    }

    if result.is_empty() {
        return Err(lookup_error("no address found".to_string()));
    }
    Ok(result)
}
