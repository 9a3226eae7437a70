use std::sync::Arc;

use log::{debug, warn};

use crate::{
    ds::{PredictionService, http_predictor::HttpPredictor},
    error::SubmitError,
    prediction::PredictionOutcome,
    presenter::{self, RenderModel},
};

/// Turns one symbol into one request and routes its outcome to the presenter.
#[derive(Clone)]
pub struct RequestController {
    service: Arc<dyn PredictionService>,
}

impl RequestController {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self { service }
    }

    pub async fn from_config() -> Self {
        Self::new(Arc::new(HttpPredictor::from_config().await))
    }

    pub async fn submit(&self, symbol_raw: &str) -> Result<RenderModel, SubmitError> {
        let symbol = normalize_symbol(symbol_raw)?;
        self.request(&symbol).await
    }

    /// Issues exactly one request for an already trimmed symbol, never retries.
    pub async fn request(&self, symbol: &str) -> Result<RenderModel, SubmitError> {
        match self.service.predict(symbol).await {
            Ok(PredictionOutcome::Success(response)) => {
                presenter::render(&response).map_err(|err| {
                    warn!("[Render Error] [{symbol}] {err}");
                    SubmitError::Transport
                })
            }
            Ok(PredictionOutcome::Failure { error, traceback }) => {
                warn!("[Service Error] [{symbol}] {error}");
                if let Some(traceback) = traceback {
                    debug!("[Service Traceback] [{symbol}]\n{traceback}");
                }

                Err(SubmitError::Service(error))
            }
            Err(err) => {
                warn!("[Transport Error] [{symbol}] {err}");
                Err(SubmitError::Transport)
            }
        }
    }
}

pub fn normalize_symbol(symbol_raw: &str) -> Result<String, SubmitError> {
    let symbol = symbol_raw.trim();
    if symbol.is_empty() {
        Err(SubmitError::Validation)
    } else {
        Ok(symbol.to_string())
    }
}
