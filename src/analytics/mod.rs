//! Client-side aggregation of usage rows into chart series.
//!
//! The backend already stores usage per (model, hour); this module re-buckets
//! to the selected granularity, fills short timelines to a fixed window, and
//! derives totals and per-minute rates for the summary cards.

mod bucket;
mod series;

pub use bucket::*;
pub use series::*;
