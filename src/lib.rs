//! supervisor-exporter — Prometheus-style exporter for supervisord daemons.
//!
//! Polls every supervisord instance listening on the local host, aggregates
//! per-process-group running/fatal counts and serves the rendered exposition
//! document over a unix domain socket.
//!
//! Provides:
//! - `endpoint` — endpoint address validation and normalization
//! - `runner` — shell command execution seam (real + mock)
//! - `discovery` — supervisord endpoint discovery from the listening-socket table
//! - `collector` — per-endpoint status query and parsing
//! - `aggregate` — per-(endpoint, process group) counters
//! - `render` — metrics exposition text rendering
//! - `snapshot` — published snapshot store and single-flight collection gate
//! - `scheduler` — collection cycle and periodic tick loop
//! - `server` — HTTP exposition endpoint

pub mod aggregate;
pub mod collector;
pub mod discovery;
pub mod endpoint;
pub mod render;
pub mod runner;
pub mod scheduler;
pub mod server;
pub mod snapshot;
