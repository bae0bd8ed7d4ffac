//! `salesdash` library crate.
//!
//! The binary (`salesdash`) is a thin wrapper around this library so that:
//!
//! - the preparer and KPI code are testable without spawning processes
//! - modules are reusable (other front-ends, notebooks, etc.)
//! - code stays easy to navigate as the project grows
//!
//! Data flow: CSV (or the built-in sample) -> [`io::ingest`] -> [`domain::Dataset`]
//! -> [`kpi::compute_kpis`] -> [`domain::KpiSummary`], with [`chart`], [`report`],
//! [`plot`] and [`tui`] layered on top for presentation.

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod kpi;
pub mod plot;
pub mod report;
pub mod telemetry;
pub mod tui;
