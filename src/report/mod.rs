//! Reporting utilities: number formatting, KPI cards, tables and run summaries.

pub mod format;

pub use format::*;
