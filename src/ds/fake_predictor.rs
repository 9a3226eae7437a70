use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    ds::PredictionService,
    error::{VpError, VpResult},
    prediction::{NextWeek, PastWeek, PredictionOutcome, PredictionResponse},
};

pub enum Reply {
    Outcome(PredictionOutcome),
    Status(u16),
}

/// Answers every request with the same reply and records the symbols it was asked for.
pub struct FakePredictor {
    reply: Reply,
    requests: Mutex<Vec<String>>,
}

impl FakePredictor {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(vec![]),
        }
    }

    pub fn success(response: PredictionResponse) -> Self {
        Self::new(Reply::Outcome(PredictionOutcome::Success(response)))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PredictionService for FakePredictor {
    async fn predict(&self, symbol: &str) -> VpResult<PredictionOutcome> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(symbol.to_string());
        }

        match &self.reply {
            Reply::Outcome(outcome) => Ok(outcome.clone()),
            Reply::Status(status) => Err(VpError::HttpStatusError {
                status: status.to_string(),
                request: "http://127.0.0.1:5000/predict".to_string(),
            }),
        }
    }
}

pub fn aapl_response(past_len: usize, predictions: &[f64]) -> PredictionResponse {
    PredictionResponse {
        company_name: "AAPL".to_string(),
        stock_symbol: "AAPL".to_string(),
        current_price: 100.0,
        past_week: PastWeek {
            dates: (0..past_len).map(|i| format!("03/{:02}/2025", i + 3)).collect(),
            prices: (0..past_len).map(|i| 95.0 + i as f64).collect(),
            change_percent: 2.5,
        },
        next_week: NextWeek {
            dates: (0..predictions.len())
                .map(|i| format!("03/{:02}/2025", i + 17))
                .collect(),
            predictions: predictions.to_vec(),
            change_percent: 21.0,
        },
    }
}
