use async_trait::async_trait;

use crate::{error::VpResult, prediction::PredictionOutcome};

#[cfg(test)]
pub mod fake_predictor;
pub mod http_predictor;

/// Remote model that turns a symbol into a prediction.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, symbol: &str) -> VpResult<PredictionOutcome>;
}
