//! # pm-stats
//!
//! Read-side aggregation over a user's property graph.
//!
//! - [`compute_stats`] folds property snapshots into the dashboard summary
//! - [`build_activity_feed`] merges recent maintenance and payments into one
//!   time-ordered feed
//! - [`load_dashboard`] fetches both through a [`DashboardSource`] and turns
//!   any fetch failure into zero/empty results

pub mod activity;
pub mod dashboard;
pub mod stats;

pub use activity::{build_activity_feed, ActivityEntry, ActivityKind, FEED_LIMIT};
pub use dashboard::{
    feed_or_empty, load_dashboard, stats_or_default, DashboardSource, DashboardView,
    DataFetchFailure, RECENT_LIMIT,
};
pub use stats::{compute_property_stats, compute_stats, occupancy_rate, PropertyStats, StatsSummary};

#[cfg(test)]
pub(crate) mod fixtures;
