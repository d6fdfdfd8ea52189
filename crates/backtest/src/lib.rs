//! Backtesting engine for lottery staking strategies.
//!
//! [`BacktestEngine`] replays historical draws one day at a time. Each day a
//! prediction model ranks candidate heads, a staking strategy sizes stakes,
//! the risk limiter clamps them and the payout calculator settles them against
//! the day's draw.

pub mod cache;
pub mod charts;
pub mod data_provider;
pub mod engine;
pub mod error;
pub mod payout;
pub mod report;
pub mod summary;
pub mod timeline;

pub use cache::{CacheKey, PredictionCache};
pub use charts::{ChartPoint, ChartSeries};
pub use data_provider::InMemoryDrawProvider;
pub use engine::BacktestEngine;
pub use error::BacktestError;
pub use payout::{PayoutCalculator, Resolution};
pub use report::{BacktestReport, ConfigEcho, RunError, RunLog, RunStatistics};
pub use summary::{StopReason, SummaryStats};
pub use timeline::{Bet, PredictionOutcome, TimelineEntry};
