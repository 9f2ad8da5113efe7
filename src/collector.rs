//! Per-endpoint supervisord status collection.
//!
//! One query per endpoint per cycle, no retries: an endpoint that fails to
//! answer is reported as down for this cycle and re-attempted on the next
//! scheduled run.

use tracing::warn;

use crate::runner::CommandRunner;

/// Signatures in supervisorctl output that mean the daemon did not answer.
/// supervisorctl reports transport failures inline on stdout rather than
/// through its exit status.
const UNREACHABLE_MARKERS: [&str; 2] = ["refused", "error: <class"];

/// Status of one managed process instance, as reported by supervisorctl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStatus {
    pub name: String,
    pub state: String,
}

/// Outcome of querying one endpoint for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStatus {
    /// Connection refused, client error, or the query command itself failed.
    Unreachable,
    /// Daemon answered; one entry per parseable status line.
    Reachable(Vec<ProcessStatus>),
}

/// Queries one supervisord endpoint for the status of its managed processes.
pub fn query_endpoint(
    runner: &dyn CommandRunner,
    supervisorctl: &str,
    endpoint: &str,
) -> EndpointStatus {
    let command = format!("{supervisorctl} -s {endpoint} status");
    let output = match runner.run(&command) {
        Ok(out) => out,
        Err(e) => {
            warn!(endpoint, error = %e, "status query failed");
            return EndpointStatus::Unreachable;
        }
    };
    if UNREACHABLE_MARKERS.iter().any(|m| output.contains(m)) {
        return EndpointStatus::Unreachable;
    }
    EndpointStatus::Reachable(parse_status_output(&output))
}

/// Parses supervisorctl status output into `(name, state)` pairs.
///
/// Expected shape, one managed process per line:
/// `<name> <state> <detail...>`. Lines with fewer than two tokens are
/// silently skipped — a tolerated data-quality gap, not an error.
pub fn parse_status_output(output: &str) -> Vec<ProcessStatus> {
    let mut statuses = Vec::new();
    for line in output.trim_end_matches('\n').lines() {
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(state)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        statuses.push(ProcessStatus {
            name: name.to_string(),
            state: state.to_string(),
        });
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockRunner;

    #[test]
    fn test_reachable_endpoint_parses_status_lines() {
        let runner = MockRunner::new().with_output(
            "-s http://127.0.0.1:9001 status",
            "myapp_1 RUNNING   pid 1001, uptime 2:03:04\nmyapp_2 FATAL     Exited too quickly\n",
        );
        let status = query_endpoint(&runner, "supervisorctl", "http://127.0.0.1:9001");
        let EndpointStatus::Reachable(procs) = status else {
            panic!("expected reachable");
        };
        assert_eq!(procs.len(), 2);
        assert_eq!(procs[0].name, "myapp_1");
        assert_eq!(procs[0].state, "RUNNING");
        assert_eq!(procs[1].state, "FATAL");
    }

    #[test]
    fn test_connection_refused_is_unreachable() {
        let runner = MockRunner::new().with_output(
            "status",
            "http://127.0.0.1:9001 refused connection\n",
        );
        let status = query_endpoint(&runner, "supervisorctl", "http://127.0.0.1:9001");
        assert_eq!(status, EndpointStatus::Unreachable);
    }

    #[test]
    fn test_python_client_error_is_unreachable() {
        let runner = MockRunner::new().with_output(
            "status",
            "error: <class 'xmlrpc.client.Fault'>, <Fault 6: 'SHUTDOWN_STATE'>\n",
        );
        let status = query_endpoint(&runner, "supervisorctl", "http://127.0.0.1:9001");
        assert_eq!(status, EndpointStatus::Unreachable);
    }

    #[test]
    fn test_failed_command_is_unreachable() {
        let runner = MockRunner::new();
        let status = query_endpoint(&runner, "supervisorctl", "http://127.0.0.1:9001");
        assert_eq!(status, EndpointStatus::Unreachable);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let parsed = parse_status_output("good_1 RUNNING extra\nlonetoken\n\nother_2 STOPPED\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "good_1");
        assert_eq!(parsed[1].name, "other_2");
    }

    #[test]
    fn test_empty_output_parses_to_no_processes() {
        assert!(parse_status_output("").is_empty());
        assert!(parse_status_output("\n").is_empty());
    }
}
