mod backtest;
mod catalog;
mod serve;

pub use backtest::{run_backtest, BacktestArgs};
pub use catalog::{list_models, list_strategies};
pub use serve::run_server;
