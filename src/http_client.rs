use crate::page::Page;
use actix_web::{HttpResponse, http::StatusCode};
use anyhow::{Context, Result, ensure};
use log::error;
use reqwest::{Client, Response, Url};

/// Create the HTTP client used to talk to the device
///
/// No request timeout is configured: the device answers slowly while it
/// scans or writes flash and every call is awaited by a single request.
pub fn device_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create device HTTP client")
}

/// Validate a device base address and strip trailing slashes
///
/// Only plain `http` is accepted: the board's web server has no TLS.
///
/// # Examples
/// ```
/// use esp_settings_ui::http_client::parse_base_url;
///
/// assert_eq!(
///     parse_base_url("http://192.168.4.1/").unwrap(),
///     "http://192.168.4.1"
/// );
/// assert!(parse_base_url("https://192.168.4.1").is_err());
/// ```
pub fn parse_base_url(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).context(format!("failed to parse device url {base_url:?}"))?;

    ensure!(
        url.scheme() == "http",
        "failed since device url {base_url:?} is not http"
    );
    ensure!(
        url.host_str().is_some(),
        "failed since device url {base_url:?} has no host"
    );

    Ok(base_url.trim_end_matches('/').to_string())
}

/// Trait for converting service results into HTTP responses
pub trait ServiceResultResponse {
    fn into_response(self) -> HttpResponse;
}

impl ServiceResultResponse for Page {
    fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(self.render())
    }
}

/// Handle Result and convert data to Response
///
/// Failures are logged and rendered as an error page. They almost always
/// stem from the device, hence `502 Bad Gateway`.
///
/// # Arguments
/// * `result` - The Result to handle
/// * `operation` - Context message describing the operation
pub fn handle_service_result<T>(result: Result<T>, operation: &str) -> HttpResponse
where
    T: ServiceResultResponse,
{
    match result {
        Ok(data) => data.into_response(),
        Err(e) => {
            error!("{operation} failed: {e:#}");
            Page::error(format!("{operation} failed: {e:#}"))
                .with_status(StatusCode::BAD_GATEWAY)
                .into_response()
        }
    }
}

/// Handle HTTP response by checking status and extracting body
///
/// # Arguments
/// * `res` - The HTTP response to handle
/// * `context_msg` - Context message describing the request (e.g., "GET /info")
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err` - If the status is not successful or reading the body fails
pub async fn handle_http_response(res: Response, context_msg: &str) -> Result<String> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;

    ensure!(
        status.is_success(),
        "{context_msg} failed with status {status} and body: {body}"
    );

    Ok(body)
}
