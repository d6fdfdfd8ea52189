//! Day-by-day backtest loop.
//!
//! Days are simulated strictly in date order: each day's capital is final
//! before the next day's stakes are sized. Independent runs share nothing
//! mutable, so separate `run` calls may execute concurrently.

use std::sync::Arc;

use chrono::NaiveDate;
use lottery_core::{
    coalesce_by_date, BacktestConfig, DrawHistoryProvider, DrawRecord, EngineSettings, ModelError,
    PredictionModel, PredictionSet, ProviderError, ScoreRequest, StrategyDescriptor,
};
use lottery_models::ModelRegistry;
use lottery_strategy::{
    build_strategy, DayOutcome, DaySnapshot, PluginRegistry, RiskLevel, RiskLimiter,
    StakeContext, StakingStrategy, StrategyKind, StrategyState,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, PredictionCache};
use crate::charts::ChartSeries;
use crate::error::BacktestError;
use crate::payout::PayoutCalculator;
use crate::report::{BacktestReport, ConfigEcho, RunError, RunLog};
use crate::summary::{daily_return, StopReason, SummaryStats};
use crate::timeline::{Bet, PredictionOutcome, TimelineEntry};

/// Draws available to one run: warm-up history followed by the run's days.
struct DrawWindow {
    draws: Vec<DrawRecord>,
    first_day: usize,
}

impl DrawWindow {
    fn days(&self) -> &[DrawRecord] {
        &self.draws[self.first_day..]
    }

    /// Every draw strictly before the `offset`-th run day.
    fn before(&self, offset: usize) -> &[DrawRecord] {
        &self.draws[..self.first_day + offset]
    }
}

/// Mutable state threaded through the day loop.
struct RunState {
    capital: Decimal,
    peak: Option<Decimal>,
    halted: bool,
    strategy_state: StrategyState,
    snapshots: Vec<DaySnapshot>,
}

/// Everything one run needs that does not change between days.
struct RunPlan<'a> {
    config: &'a BacktestConfig,
    model_name: String,
    model: &'a dyn PredictionModel,
    strategy: &'a dyn StakingStrategy,
    limiter: RiskLimiter,
    payout: PayoutCalculator,
}

/// Runs backtests against a draw history provider.
pub struct BacktestEngine {
    provider: Arc<dyn DrawHistoryProvider>,
    models: ModelRegistry,
    plugins: PluginRegistry,
    settings: EngineSettings,
}

impl BacktestEngine {
    /// Creates an engine with the built-in models, no plugins and default settings.
    #[must_use]
    pub fn new(provider: Arc<dyn DrawHistoryProvider>) -> Self {
        Self {
            provider,
            models: ModelRegistry::with_defaults(),
            plugins: PluginRegistry::new(),
            settings: EngineSettings::default(),
        }
    }

    #[must_use]
    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    #[must_use]
    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    #[must_use]
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Runs one backtest.
    ///
    /// # Errors
    ///
    /// Returns an error, before any day is simulated, when the config is
    /// invalid, the model or strategy cannot be resolved, or the provider has
    /// no draws for the range. Errors raised later end the run early and are
    /// reported through [`BacktestReport::error`].
    pub async fn run(&self, config: &BacktestConfig) -> Result<BacktestReport, BacktestError> {
        config.validate()?;
        let model = self.resolve_model(&config.model)?;
        let strategy = build_strategy(&config.strategy, config.top_k, &self.plugins)?;
        let window = self.load_draws(config).await?;

        let mut cache = PredictionCache::new();
        Ok(self.simulate(config, model.as_ref(), strategy.as_ref(), &window, &mut cache))
    }

    /// Runs the same config once per strategy descriptor.
    ///
    /// Draws are fetched once and each date is scored once; only the staking
    /// strategy differs between the returned reports.
    ///
    /// # Errors
    ///
    /// Fails like [`run`](Self::run) if any descriptor cannot be resolved.
    pub async fn compare_strategies(
        &self,
        config: &BacktestConfig,
        strategies: &[StrategyDescriptor],
    ) -> Result<Vec<BacktestReport>, BacktestError> {
        config.validate()?;
        let model = self.resolve_model(&config.model)?;
        let built = strategies
            .iter()
            .map(|descriptor| build_strategy(descriptor, config.top_k, &self.plugins))
            .collect::<Result<Vec<_>, _>>()?;
        let window = self.load_draws(config).await?;

        let mut cache = PredictionCache::new();
        let mut reports = Vec::with_capacity(built.len());
        for (descriptor, strategy) in strategies.iter().zip(&built) {
            let mut variant = config.clone();
            variant.strategy = descriptor.clone();
            reports.push(self.simulate(
                &variant,
                model.as_ref(),
                strategy.as_ref(),
                &window,
                &mut cache,
            ));
        }

        let (hits, misses) = cache.stats();
        info!(
            strategies = strategies.len(),
            cache_hits = hits,
            cache_misses = misses,
            "strategy comparison finished"
        );
        Ok(reports)
    }

    fn resolve_model(&self, name: &str) -> Result<Arc<dyn PredictionModel>, BacktestError> {
        self.models
            .get(name)
            .ok_or_else(|| BacktestError::UnknownModel(name.to_string()))
    }

    /// Fetches the run range plus all earlier draws as warm-up history.
    async fn load_draws(&self, config: &BacktestConfig) -> Result<DrawWindow, BacktestError> {
        let region = config.region.as_deref();
        let (start, end) = (config.date_start, config.date_end);

        let range = self.provider.fetch(region, start, end).await?;
        let days = coalesce_by_date(
            range
                .into_iter()
                .filter(|d| d.date >= start && d.date <= end)
                .collect(),
        );
        if days.is_empty() {
            return Err(BacktestError::DataUnavailable {
                region: config.region.clone(),
                start,
                end,
            });
        }

        let warmup = match start.pred_opt() {
            Some(before) => match self.provider.fetch(region, NaiveDate::MIN, before).await {
                Ok(draws) => coalesce_by_date(draws.into_iter().filter(|d| d.date < start).collect()),
                Err(ProviderError::NoData { .. }) => Vec::new(),
                Err(e) => return Err(BacktestError::Provider(e)),
            },
            None => Vec::new(),
        };

        let first_day = warmup.len();
        let mut draws = warmup;
        draws.extend(days);
        Ok(DrawWindow { draws, first_day })
    }

    fn simulate(
        &self,
        config: &BacktestConfig,
        model: &dyn PredictionModel,
        strategy: &dyn StakingStrategy,
        window: &DrawWindow,
        cache: &mut PredictionCache,
    ) -> BacktestReport {
        let plan = RunPlan {
            config,
            model_name: ModelRegistry::canonical_name(&config.model),
            model,
            strategy,
            limiter: RiskLimiter::new(self.settings.currency_scale),
            payout: PayoutCalculator::new(
                config.payout_rules.clone(),
                self.settings.currency_scale,
            ),
        };
        let mut state = RunState {
            capital: config.capital,
            peak: None,
            halted: false,
            strategy_state: strategy.initial_state(),
            snapshots: Vec::new(),
        };

        info!(
            model = %plan.model_name,
            strategy = strategy.name(),
            capital = %config.capital,
            days = window.days().len(),
            warmup_draws = window.first_day,
            "starting backtest"
        );

        let mut timeline = Vec::with_capacity(window.days().len());
        let mut error = None;
        for (offset, draw) in window.days().iter().enumerate() {
            if state.halted {
                let gap = drawdown(state.peak, state.capital);
                timeline.push(TimelineEntry::halted(draw.date, state.capital, gap));
                continue;
            }

            match self.simulate_day(&plan, &mut state, window, offset, draw, cache) {
                Ok(entry) => timeline.push(entry),
                Err(run_error) => {
                    warn!(
                        date = %run_error.date,
                        kind = %run_error.kind,
                        message = %run_error.message,
                        "backtest aborted"
                    );
                    error = Some(run_error);
                    break;
                }
            }
        }

        let stop_reason = if error.is_some() {
            StopReason::Aborted
        } else if state.halted {
            StopReason::CapitalDepleted
        } else {
            StopReason::Completed
        };
        let summary = SummaryStats::from_timeline(config.capital, &timeline, stop_reason);
        let charts = ChartSeries::from_timeline(&timeline);
        let logs = RunLog::from_timeline(&timeline);

        info!(
            final_balance = %summary.final_balance,
            total_bets = summary.total_bets,
            total_wins = summary.total_wins,
            stop_reason = ?summary.stop_reason,
            "backtest finished"
        );

        BacktestReport {
            config: ConfigEcho {
                config: config.clone(),
                strategy_risk_level: risk_level(&config.strategy),
            },
            summary,
            timeline,
            charts,
            logs,
            error,
        }
    }

    fn simulate_day(
        &self,
        plan: &RunPlan<'_>,
        state: &mut RunState,
        window: &DrawWindow,
        offset: usize,
        draw: &DrawRecord,
        cache: &mut PredictionCache,
    ) -> Result<TimelineEntry, RunError> {
        let config = plan.config;
        let date = draw.date;
        let capital_start = state.capital;

        let predictions = self
            .predict(plan, window.before(offset), date, cache)
            .map_err(|e| RunError {
                date,
                kind: "model_error".to_string(),
                message: e.to_string(),
            })?;

        let ctx = StakeContext {
            date,
            day_index: offset,
            capital: capital_start,
            predictions: &predictions,
            history: &state.snapshots,
            risk_limits: &config.risk_limits,
            payout_rules: &config.payout_rules,
        };
        let proposal = plan
            .strategy
            .propose(&ctx, &state.strategy_state)
            .map_err(|e| RunError {
                date,
                kind: e.kind().to_string(),
                message: e.to_string(),
            })?;

        let clamped = plan
            .limiter
            .clamp(capital_start, &proposal, &config.risk_limits);
        let heads = draw.heads(config.digits);

        let mut bets = Vec::with_capacity(clamped.len());
        for committed in clamped {
            let resolution = plan
                .payout
                .resolve(&committed.number, committed.stake, &heads)
                .ok_or_else(|| {
                    overflow(date, format!("payout on '{}' overflowed", committed.number))
                })?;
            let (rank, probability) = predictions
                .get(&committed.number)
                .map_or((0, 0.0), |p| (p.rank, p.probability));
            bets.push(Bet {
                date,
                number: committed.number,
                stake: committed.stake,
                rank,
                probability,
                hit: resolution.hit,
                payout_net: resolution.payout_net,
            });
        }

        let stake_total: Decimal = bets.iter().map(|b| b.stake).sum();
        let pnl = bets
            .iter()
            .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(b.payout_net))
            .ok_or_else(|| overflow(date, "daily pnl overflowed".to_string()))?;
        let capital_end = capital_start
            .checked_add(pnl)
            .ok_or_else(|| overflow(date, "capital overflowed".to_string()))?;
        let any_hit = bets.iter().any(|b| b.hit);

        let peak = state.peak.map_or(capital_end, |p| p.max(capital_end));
        state.peak = Some(peak);
        let halted =
            capital_end <= Decimal::ZERO || capital_end <= self.settings.min_viable_stake();

        let outcomes: Vec<PredictionOutcome> = predictions
            .entries
            .iter()
            .map(|p| PredictionOutcome {
                rank: p.rank,
                number: p.number.clone(),
                probability: p.probability,
                hit: heads.contains(&p.number),
            })
            .collect();
        let hits = outcomes
            .iter()
            .filter(|p| p.hit)
            .map(|p| p.number.clone())
            .collect();

        debug!(
            %date,
            %capital_start,
            %capital_end,
            %stake_total,
            bets = bets.len(),
            any_hit,
            "simulated day"
        );
        if halted {
            warn!(%date, %capital_end, "capital depleted, halting");
        }

        state.strategy_state = plan.strategy.advance(
            std::mem::take(&mut state.strategy_state),
            &DayOutcome {
                bets_placed: bets.len(),
                any_hit,
            },
        );
        state.snapshots.push(DaySnapshot {
            date,
            capital_end,
            pnl,
            hit: any_hit,
        });
        let keep = self.settings.history_snapshot_len;
        if state.snapshots.len() > keep {
            let excess = state.snapshots.len() - keep;
            state.snapshots.drain(..excess);
        }
        state.capital = capital_end;
        state.halted = halted;

        Ok(TimelineEntry {
            date,
            capital_start,
            capital_end,
            stake_total,
            pnl,
            bets,
            predictions: outcomes,
            hits,
            drawdown: drawdown(Some(peak), capital_end),
            daily_return: daily_return(pnl, capital_start),
            capital_halted: halted,
        })
    }

    /// Scores a day from the draws before it, through the cache.
    fn predict(
        &self,
        plan: &RunPlan<'_>,
        prior: &[DrawRecord],
        date: NaiveDate,
        cache: &mut PredictionCache,
    ) -> Result<PredictionSet, ModelError> {
        let config = plan.config;
        let request = ScoreRequest {
            date,
            lookback_draws: config.lookback_draws,
            digits: config.digits,
            top_k: config.top_k,
            seed: config.seed,
        };
        let key = CacheKey::new(&plan.model_name, config.region.as_deref(), &request);

        cache.get_or_score(key, || {
            let set = plan.model.score(prior, &request)?;
            set.validate(config.digits, config.top_k)
                .map_err(|reason| ModelError::InvalidOutput {
                    model: plan.model_name.clone(),
                    reason,
                })?;
            Ok(set)
        })
    }
}

fn overflow(date: NaiveDate, message: String) -> RunError {
    RunError {
        date,
        kind: "arithmetic_overflow".to_string(),
        message,
    }
}

fn drawdown(peak: Option<Decimal>, capital: Decimal) -> Decimal {
    peak.map_or(Decimal::ZERO, |p| (p - capital).max(Decimal::ZERO))
}

fn risk_level(descriptor: &StrategyDescriptor) -> RiskLevel {
    descriptor
        .kind
        .parse::<StrategyKind>()
        .map_or(RiskLevel::Variable, StrategyKind::risk_level)
}
