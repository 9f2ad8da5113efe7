//! Supervisord endpoint discovery from the host's listening-socket table.
//!
//! Runs once at startup; the resulting endpoint set is immutable for the
//! process lifetime. Supervisord instances restarted on a different port
//! require an exporter restart to be picked up.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::endpoint::parse_endpoint;
use crate::runner::CommandRunner;

/// Command listing active TCP listening sockets with owning-process info.
/// The 4th whitespace-delimited field of each line is the local address.
const LIST_SOCKETS_CMD: &str = "ss -tlp";

/// Field index of the local address in `ss -tlp` output.
const LOCAL_ADDR_FIELD: usize = 3;

/// Discovers the set of supervisord endpoints listening on the local host.
///
/// Each listening-socket line mentioning `process_name` contributes its local
/// address, prefixed with an assumed `http://` scheme and filtered through
/// endpoint validation. Duplicates collapse; iteration order is the sorted
/// endpoint string. A failed or empty enumeration yields an empty set — the
/// caller decides whether that is fatal.
pub fn discover_endpoints(runner: &dyn CommandRunner, process_name: &str) -> BTreeSet<String> {
    let output = match runner.run(LIST_SOCKETS_CMD) {
        Ok(out) => out,
        Err(e) => {
            warn!(error = %e, "listening-socket enumeration failed");
            return BTreeSet::new();
        }
    };

    let mut endpoints = BTreeSet::new();
    for line in output.lines() {
        if !line.contains(process_name) {
            continue;
        }
        let Some(addr) = line.split_whitespace().nth(LOCAL_ADDR_FIELD) else {
            continue;
        };
        let url = format!("http://{addr}");
        if parse_endpoint(&url).is_some() {
            endpoints.insert(url);
        } else {
            debug!(addr, "skipping unusable local address");
        }
    }
    endpoints
}
