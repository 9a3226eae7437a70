use serde::Deserialize;

use crate::error::{VpError, VpResult};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PastWeek {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    pub change_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NextWeek {
    pub dates: Vec<String>,
    pub predictions: Vec<f64>,
    pub change_percent: f64,
}

/// A prediction that passed validation, every price field is present and consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionResponse {
    pub company_name: String,
    pub stock_symbol: String,
    pub current_price: f64,
    pub past_week: PastWeek,
    pub next_week: NextWeek,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PredictionOutcome {
    Success(PredictionResponse),
    Failure {
        error: String,
        traceback: Option<String>,
    },
}

/// Body as sent by the service, either shape fits.
#[derive(Debug, Default, Deserialize)]
struct PredictionPayload {
    error: Option<String>,
    traceback: Option<String>,
    company_name: Option<String>,
    stock_symbol: Option<String>,
    current_price: Option<f64>,
    past_week: Option<PastWeek>,
    next_week: Option<NextWeek>,
}

impl PredictionOutcome {
    pub fn from_slice(bytes: &[u8]) -> VpResult<Self> {
        let payload: PredictionPayload = serde_json::from_slice(bytes)?;
        payload.try_into()
    }
}

impl TryFrom<PredictionPayload> for PredictionOutcome {
    type Error = VpError;

    fn try_from(payload: PredictionPayload) -> Result<Self, Self::Error> {
        // An empty error string does not mark a failure
        if let Some(error) = payload.error.filter(|e| !e.is_empty()) {
            return Ok(Self::Failure {
                error,
                traceback: payload.traceback,
            });
        }

        let response = PredictionResponse {
            company_name: required(payload.company_name, "company_name")?,
            stock_symbol: required(payload.stock_symbol, "stock_symbol")?,
            current_price: required(payload.current_price, "current_price")?,
            past_week: required(payload.past_week, "past_week")?,
            next_week: required(payload.next_week, "next_week")?,
        };
        response.validate()?;

        Ok(Self::Success(response))
    }
}

impl PredictionResponse {
    pub fn validate(&self) -> VpResult<()> {
        if !self.current_price.is_finite() || self.current_price <= 0.0 {
            return Err(invalid(format!(
                "Current price must be positive, got {}",
                self.current_price
            )));
        }

        check_window(
            "past_week",
            &self.past_week.dates,
            &self.past_week.prices,
            self.past_week.change_percent,
        )?;
        check_window(
            "next_week",
            &self.next_week.dates,
            &self.next_week.predictions,
            self.next_week.change_percent,
        )?;

        Ok(())
    }
}

fn check_window(name: &str, dates: &[String], values: &[f64], change_percent: f64) -> VpResult<()> {
    if dates.len() != values.len() {
        return Err(invalid(format!(
            "{name} has {} dates but {} values",
            dates.len(),
            values.len()
        )));
    }

    if dates.is_empty() {
        return Err(VpError::NoData {
            code: "EMPTY_WINDOW",
            message: format!("{name} is empty"),
        });
    }

    if !change_percent.is_finite() || values.iter().any(|v| !v.is_finite()) {
        return Err(invalid(format!("{name} contains a non-finite number")));
    }

    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> VpResult<T> {
    value.ok_or_else(|| VpError::Invalid {
        code: "MISSING_FIELD",
        message: format!("Missing field '{field}'"),
    })
}

fn invalid(message: String) -> VpError {
    VpError::Invalid {
        code: "INVALID_RESPONSE",
        message,
    }
}
