//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - sales records and the validated `Dataset`
//! - derived KPI results (`KpiSummary`, `PeriodValue`, `TrendDirection`)
//! - session settings (`DashboardConfig`, `Theme`, `ColumnAliases`)

pub mod types;

pub use types::*;
