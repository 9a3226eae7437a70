use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;

use crate::{
    CONFIG,
    ds::PredictionService,
    error::{VpError, VpResult},
    prediction::PredictionOutcome,
    utils::net::{http_get, http_post_form},
};

pub struct HttpPredictor {
    predict_api: String,
    timeout_secs: u64,
}

impl HttpPredictor {
    pub fn new(predict_api: &str, timeout_secs: u64) -> Self {
        Self {
            predict_api: predict_api.to_string(),
            timeout_secs,
        }
    }

    pub async fn from_config() -> Self {
        let config = CONFIG.read().await;
        Self::new(&config.predict_api, config.timeout_secs)
    }
}

#[async_trait]
impl PredictionService for HttpPredictor {
    async fn predict(&self, symbol: &str) -> VpResult<PredictionOutcome> {
        let mut form: HashMap<String, String> = HashMap::new();
        form.insert("stock_symbol".to_string(), symbol.to_string());

        debug!("[POST] {}/predict {form:?}", self.predict_api);

        let bytes = http_post_form(
            &self.predict_api,
            Some("/predict"),
            &form,
            self.timeout_secs,
            0,
        )
        .await?;

        PredictionOutcome::from_slice(&bytes)
    }
}

pub async fn check_api() -> VpResult<()> {
    let (predict_api, timeout_secs) = {
        let config = CONFIG.read().await;
        (config.predict_api.clone(), config.timeout_secs)
    };

    let bytes = http_get(&predict_api, None, &HashMap::new(), timeout_secs, 3).await?;
    if bytes.is_empty() {
        return Err(VpError::Invalid {
            code: "INVALID_RESPONSE",
            message: "Empty response".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    use super::*;
    use crate::{controller::RequestController, error::SubmitError};

    const SUCCESS_BODY: &str = r#"{
        "success": true,
        "company_name": "AAPL",
        "stock_symbol": "AAPL",
        "current_price": 100.0,
        "past_week": {"dates": ["03/03/2025", "03/04/2025"], "prices": [98.0, 100.0], "change_percent": 2.04},
        "next_week": {"dates": ["03/05/2025", "03/06/2025"], "predictions": [110.0, 121.0], "change_percent": 21.0}
    }"#;

    struct LocalServer {
        url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl LocalServer {
        /// Answers every connection with the same status line and body.
        async fn start(status_line: &'static str, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(vec![]));

            let recorded = requests.clone();
            tokio::spawn(async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    let request = read_request(&mut stream).await;
                    recorded.lock().unwrap().push(request);

                    let response = format!(
                        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            });

            Self { url, requests }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut data: Vec<u8> = vec![];
        let mut buf = [0u8; 1024];

        loop {
            let n = stream.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&data).to_string()
    }

    #[tokio::test]
    async fn test_predict_posts_symbol_form() {
        let server = LocalServer::start("200 OK", SUCCESS_BODY).await;
        let predictor = HttpPredictor::new(&server.url, 5);

        let outcome = predictor.predict("AAPL").await.unwrap();

        match outcome {
            PredictionOutcome::Success(response) => {
                assert_eq!(response.stock_symbol, "AAPL");
                assert_eq!(response.next_week.predictions, vec![110.0, 121.0]);
            }
            PredictionOutcome::Failure { .. } => panic!("expected success"),
        }

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("POST /predict HTTP/1.1\r\n"));
        assert!(
            requests[0]
                .to_lowercase()
                .contains("content-type: application/x-www-form-urlencoded")
        );
        assert!(requests[0].ends_with("\r\n\r\nstock_symbol=AAPL"));
    }

    #[tokio::test]
    async fn test_predict_service_error_body() {
        let server = LocalServer::start(
            "200 OK",
            r#"{"error": "Unknown symbol", "traceback": "Traceback"}"#,
        )
        .await;
        let controller = RequestController::new(Arc::new(HttpPredictor::new(&server.url, 5)));

        assert_eq!(
            controller.submit("ZZZZ").await,
            Err(SubmitError::Service("Unknown symbol".to_string()))
        );
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_predict_server_error_is_transport_error() {
        let server = LocalServer::start("500 Internal Server Error", "{}").await;
        let controller = RequestController::new(Arc::new(HttpPredictor::new(&server.url, 5)));

        assert_eq!(controller.submit("AAPL").await, Err(SubmitError::Transport));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_predict_malformed_body_is_transport_error() {
        let server = LocalServer::start("200 OK", "<html>not json</html>").await;
        let controller = RequestController::new(Arc::new(HttpPredictor::new(&server.url, 5)));

        assert_eq!(controller.submit("AAPL").await, Err(SubmitError::Transport));
        assert_eq!(server.requests().len(), 1);
    }
}
