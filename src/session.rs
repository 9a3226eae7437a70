use log::debug;

use crate::{
    controller::{RequestController, normalize_symbol},
    error::SubmitError,
    presenter::{ChartSeries, RenderModel},
};

#[derive(Clone, Debug, PartialEq)]
pub enum UiState {
    Idle,
    Loading { symbol: String },
    Results(Box<RenderModel>),
    Error(SubmitError),
}

/// A submission accepted by the session, its outcome must be handed back with the same generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub generation: u64,
    pub symbol: String,
}

/// The live chart, built once per render and dropped before the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceChart {
    pub id: u64,
    pub series: ChartSeries,
    pub actual_points: Vec<[f64; 2]>,
    pub predicted_points: Vec<[f64; 2]>,
}

/// Owns everything one view displays: the state machine, the current model and the chart.
#[derive(Debug)]
pub struct RenderSession {
    state: UiState,
    chart: Option<PriceChart>,
    generation: u64,
    charts_built: u64,
}

impl PriceChart {
    fn new(id: u64, series: &ChartSeries) -> Self {
        Self {
            id,
            series: series.clone(),
            actual_points: series.actual_points(),
            predicted_points: series.predicted_points(),
        }
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSession {
    pub fn new() -> Self {
        Self {
            state: UiState::Idle,
            chart: None,
            generation: 0,
            charts_built: 0,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn chart(&self) -> Option<&PriceChart> {
        self.chart.as_ref()
    }

    pub fn charts_built(&self) -> u64 {
        self.charts_built
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, UiState::Loading { .. })
    }

    pub fn model(&self) -> Option<&RenderModel> {
        match &self.state {
            UiState::Results(model) => Some(model.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match &self.state {
            UiState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Clears the previous result and chart, then enters loading unless the symbol is empty.
    ///
    /// Any submission still in flight is superseded, its outcome will be ignored by [`Self::finish`].
    pub fn begin(&mut self, symbol_raw: &str) -> Result<Submission, SubmitError> {
        self.destroy_chart();
        self.generation += 1;

        match normalize_symbol(symbol_raw) {
            Ok(symbol) => {
                self.state = UiState::Loading {
                    symbol: symbol.clone(),
                };

                Ok(Submission {
                    generation: self.generation,
                    symbol,
                })
            }
            Err(err) => {
                self.state = UiState::Error(err.clone());
                Err(err)
            }
        }
    }

    /// Applies an outcome, returns false if it belongs to a superseded submission.
    pub fn finish(
        &mut self,
        generation: u64,
        outcome: Result<RenderModel, SubmitError>,
    ) -> bool {
        if generation != self.generation || !self.is_loading() {
            debug!("[Session] Discard outcome of stale submission #{generation}");
            return false;
        }

        self.destroy_chart();

        match outcome {
            Ok(model) => {
                self.charts_built += 1;
                self.chart = Some(PriceChart::new(self.charts_built, &model.chart));
                self.state = UiState::Results(Box::new(model));
            }
            Err(err) => {
                self.state = UiState::Error(err);
            }
        }

        true
    }

    pub async fn submit(&mut self, controller: &RequestController, symbol_raw: &str) -> &UiState {
        if let Ok(Submission { generation, symbol }) = self.begin(symbol_raw) {
            let outcome = controller.request(&symbol).await;
            self.finish(generation, outcome);
        }

        &self.state
    }

    fn destroy_chart(&mut self) {
        if let Some(chart) = self.chart.take() {
            debug!("[Session] Destroy chart #{}", chart.id);
        }
    }
}
