//! Rendering of one cycle's aggregate into metrics exposition text.
//!
//! Wire contract: one `supervisor_up{url="..."} <0|1>` line per endpoint,
//! then a fatal and a running `supervisor_proc` line per (endpoint, group).
//! Iteration over the aggregate's ordered maps makes the document
//! deterministic (sorted by endpoint, then group key); consumers must not
//! rely on line order regardless.

use std::fmt::Write;

use crate::aggregate::CycleAggregate;

const NAMESPACE: &str = "supervisor";

/// Renders the full exposition document for one completed cycle.
pub fn render(aggregate: &CycleAggregate) -> String {
    let mut out = String::new();

    for (endpoint, up) in &aggregate.up {
        let value = if *up { 1 } else { 0 };
        let _ = writeln!(out, "{NAMESPACE}_up{{url=\"{endpoint}\"}} {value}");
    }

    for ((endpoint, group), counts) in &aggregate.counts {
        let _ = writeln!(
            out,
            "{NAMESPACE}_proc{{url=\"{endpoint}\",proc=\"{group}\",status=\"fatal\"}} {}",
            counts.fatal
        );
        let _ = writeln!(
            out,
            "{NAMESPACE}_proc{{url=\"{endpoint}\",proc=\"{group}\",status=\"running\"}} {}",
            counts.running
        );
    }

    out
}
