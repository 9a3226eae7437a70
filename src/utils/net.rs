use std::{collections::HashMap, time::Duration};

use log::debug;
use reqwest::Method;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::error::{VpError, VpResult};

pub async fn http_get(
    url: &str,
    path: Option<&str>,
    query: &HashMap<String, String>,
    timeout_secs: u64,
    max_retries: u64,
) -> VpResult<Vec<u8>> {
    let request_url = if let Some(path) = path {
        &join_url(url, path)?
    } else {
        url
    };

    let client = build_client(timeout_secs, max_retries);
    let response = client
        .request(Method::GET, request_url)
        .timeout(Duration::from_secs(timeout_secs))
        .query(query)
        .send()
        .await?;

    read_success_body(response, request_url).await
}

/// Sends a form-encoded POST, `max_retries` of 0 sends exactly one request.
pub async fn http_post_form(
    url: &str,
    path: Option<&str>,
    form: &HashMap<String, String>,
    timeout_secs: u64,
    max_retries: u64,
) -> VpResult<Vec<u8>> {
    let request_url = if let Some(path) = path {
        &join_url(url, path)?
    } else {
        url
    };

    let client = build_client(timeout_secs, max_retries);
    let response = client
        .request(Method::POST, request_url)
        .timeout(Duration::from_secs(timeout_secs))
        .form(form)
        .send()
        .await?;

    read_success_body(response, request_url).await
}

pub fn join_url(base_url: &str, extend_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(extend_url.split('/').filter(|s| !s.is_empty()));

    Ok(url.to_string())
}

fn build_client(timeout_secs: u64, max_retries: u64) -> ClientWithMiddleware {
    // Retry bounds panic when the upper bound is below one second
    let timeout_secs = timeout_secs.max(1);
    let mut builder = ClientBuilder::new(reqwest::Client::new());

    if max_retries > 0 {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(timeout_secs))
            .jitter(Jitter::Bounded)
            .base(2)
            .build_with_total_retry_duration_and_max_retries(Duration::from_secs(
                max_retries * timeout_secs,
            ));
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    builder.build()
}

async fn read_success_body(response: reqwest::Response, request_url: &str) -> VpResult<Vec<u8>> {
    if response.status().is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        debug!("[HTTP Status Error] {response:?}");

        Err(VpError::HttpStatusError {
            status: response.status().to_string(),
            request: request_url.to_string(),
        })
    }
}
