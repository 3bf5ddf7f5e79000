use log::{debug, error, info, warn};
use sentinel_core::{Decision, DecisionRequest, RiskScore, RiskWarning};

/// Port for decision telemetry
///
/// The engine stays a pure function; anything that wants to watch it
/// (logs, metrics, audit trails) is injected through this trait.
/// All hooks default to no-ops.
pub trait DecisionObserver: Send + Sync {
    /// A composite score was computed (current or historical)
    fn on_score(&self, _score: &RiskScore) {}

    /// A non-fatal condition was raised
    fn on_warning(&self, _warning: &RiskWarning) {}

    /// A decision was produced
    fn on_decision(&self, _decision: &Decision) {}

    /// A decision failed closed
    fn on_failure(&self, _request: &DecisionRequest, _reason: &str) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {}

/// Observer that writes to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl DecisionObserver for LogObserver {
    fn on_score(&self, score: &RiskScore) {
        debug!(
            "[RISK] Score {} (corr={} lev={} liq={} reg={})",
            score,
            score.components.correlation,
            score.components.leverage,
            score.components.liquidity,
            score.components.regulatory
        );
    }

    fn on_warning(&self, warning: &RiskWarning) {
        warn!("[RISK] {}", warning);
    }

    fn on_decision(&self, decision: &Decision) {
        let trend = decision
            .trend_classification()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        info!(
            "[RISK] {} {} {}: level={} score={:.3} trend={} sizing={:?} long={}@{}x short={}@{}x hedge={} ({})",
            decision.request.as_of,
            decision.request.symbol,
            decision.request.side,
            decision.risk_score.level,
            decision.risk_score.value,
            trend,
            decision.sizing.sizing_type,
            decision.sizing.long_equity_pct,
            decision.sizing.long_leverage,
            decision.sizing.short_equity_pct,
            decision.sizing.short_leverage,
            decision.gold_hedge.recommended,
            decision.gold_hedge.reason
        );
    }

    fn on_failure(&self, request: &DecisionRequest, reason: &str) {
        error!(
            "[RISK] Decision failed for {} as of {}: {}",
            request.symbol, request.as_of, reason
        );
    }
}
