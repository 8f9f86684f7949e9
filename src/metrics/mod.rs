//! Metrics for the match function
//!
//! This module provides in-process metrics collection for ticket handling
//! and match building.

pub mod collector;

pub use collector::{MatchMetrics, MetricsCollector, MetricsTimer, TicketMetrics};
