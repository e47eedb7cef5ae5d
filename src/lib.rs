//! Bee Cycle sales dashboard: load a sales table, filter it by territory
//! group and price range, aggregate it, and describe the resulting charts.

pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod format;
