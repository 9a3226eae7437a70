pub use crate::{
    config::Config,
    controller::RequestController,
    error::SubmitError,
    presenter::{PercentCell, RenderModel, Sign, TableRow},
    session::{RenderSession, UiState},
};
use crate::{
    CONFIG, config,
    ds::http_predictor,
    error::VpResult,
};

pub async fn check() -> VpResult<()> {
    http_predictor::check_api().await
}

pub async fn get_config() -> VpResult<Config> {
    Ok(CONFIG.read().await.clone())
}

pub async fn predict(symbol_raw: &str) -> Result<RenderModel, SubmitError> {
    RequestController::from_config()
        .await
        .submit(symbol_raw)
        .await
}

pub async fn set_config(key: &str, value: &str) -> VpResult<()> {
    let mut config = CONFIG.write().await;

    let mut updated = config.clone();
    updated.set(key, value)?;
    config::store(&updated)?;

    *config = updated;

    Ok(())
}
