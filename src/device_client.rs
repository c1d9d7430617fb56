use crate::{
    http_client::{device_http_client, handle_http_response, parse_base_url},
    settings::{FormPayload, Schema, SettingsEnvelope},
    wifi::{ScanResult, WifiInfo},
};
use anyhow::{Context, Result};
use log::{debug, info};
#[cfg(feature = "mock")]
use mockall::automock;
use reqwest::{Client, header::CONTENT_TYPE};
use trait_variant::make;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait DeviceClient {
    /// Current settings schema including values
    async fn settings(&self) -> Result<Schema>;
    /// Store a serialized settings form on the device
    async fn apply_settings(&self, payload: FormPayload) -> Result<()>;
    /// Revert every setting to its default
    async fn erase_settings(&self) -> Result<()>;
    /// Reboot the board; returns once the request is acknowledged
    async fn restart(&self) -> Result<()>;
    async fn wifi_info(&self) -> Result<WifiInfo>;
    async fn wifi_scan(&self) -> Result<ScanResult>;
    /// Join the network named in `payload` (`ssid`, `passwd`), sent unescaped
    async fn wifi_connect(&self, payload: FormPayload) -> Result<()>;
}

/// [`DeviceClient`] talking HTTP to the board
#[derive(Clone, Debug)]
pub struct EspDeviceClient {
    client: Client,
    base_url: String,
}

impl EspDeviceClient {
    // API endpoint constants
    const SETTINGS_ENDPOINT: &str = "/settings";
    const SET_SETTINGS_ENDPOINT: &str = "/settings?action=set";
    const ERASE_SETTINGS_ENDPOINT: &str = "/settings?action=erase";
    const RESTART_ENDPOINT: &str = "/settings?action=restart";
    const INFO_ENDPOINT: &str = "/info";
    const SCAN_ENDPOINT: &str = "/scan";
    const CONNECT_ENDPOINT: &str = "/connect";

    pub fn new(base_url: &str) -> Result<Self> {
        Ok(EspDeviceClient {
            client: device_http_client()?,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        // Normalize path to always start with a single "/"
        let normalized_path = path.trim_start_matches('/');
        format!("{}/{normalized_path}", self.base_url)
    }

    /// GET request to the device
    async fn get(&self, path: &str) -> Result<String> {
        let url = self.build_url(path);
        info!("GET {url}");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context(format!("failed to send GET request to {url}"))?;

        handle_http_response(res, &format!("GET {url}")).await
    }

    /// POST request to the device with a `key=value&...` body
    async fn post_form(&self, path: &str, body: String) -> Result<String> {
        let url = self.build_url(path);
        info!("POST {url}");
        debug!("POST {url} with body: {body}");

        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .context(format!("failed to send POST request to {url}"))?;

        handle_http_response(res, &format!("POST {url}")).await
    }
}

impl DeviceClient for EspDeviceClient {
    async fn settings(&self) -> Result<Schema> {
        let body = self.get(Self::SETTINGS_ENDPOINT).await?;
        let envelope: SettingsEnvelope =
            serde_json::from_str(&body).context("failed to parse settings")?;
        Ok(envelope.data)
    }

    async fn apply_settings(&self, payload: FormPayload) -> Result<()> {
        let ack = self
            .post_form(Self::SET_SETTINGS_ENDPOINT, payload.encode())
            .await?;
        debug!("settings acknowledged: {ack}");
        Ok(())
    }

    async fn erase_settings(&self) -> Result<()> {
        let ack = self.get(Self::ERASE_SETTINGS_ENDPOINT).await?;
        debug!("erase acknowledged: {ack}");
        Ok(())
    }

    async fn restart(&self) -> Result<()> {
        self.get(Self::RESTART_ENDPOINT).await?;
        Ok(())
    }

    async fn wifi_info(&self) -> Result<WifiInfo> {
        let body = self.get(Self::INFO_ENDPOINT).await?;
        serde_json::from_str(&body).context("failed to parse wifi info")
    }

    async fn wifi_scan(&self) -> Result<ScanResult> {
        let body = self.get(Self::SCAN_ENDPOINT).await?;
        serde_json::from_str(&body).context("failed to parse wifi scan")
    }

    async fn wifi_connect(&self, payload: FormPayload) -> Result<()> {
        self.post_form(Self::CONNECT_ENDPOINT, payload.encode_literal())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod build_url {
        use super::*;

        fn create_test_client() -> EspDeviceClient {
            EspDeviceClient::new("http://192.168.4.1/").expect("valid base url")
        }

        #[test]
        fn normalizes_path_with_leading_slash() {
            let client = create_test_client();
            let url = client.build_url("/settings");
            assert_eq!(url, "http://192.168.4.1/settings");
        }

        #[test]
        fn normalizes_path_without_leading_slash() {
            let client = create_test_client();
            let url = client.build_url("info");
            assert_eq!(url, "http://192.168.4.1/info");
        }

        #[test]
        fn normalizes_path_with_multiple_leading_slashes() {
            let client = create_test_client();
            let url = client.build_url("///scan");
            assert_eq!(url, "http://192.168.4.1/scan");
        }

        #[test]
        fn keeps_query() {
            let client = create_test_client();
            let url = client.build_url(EspDeviceClient::SET_SETTINGS_ENDPOINT);
            assert_eq!(url, "http://192.168.4.1/settings?action=set");
        }

        #[test]
        fn handles_empty_path() {
            let client = create_test_client();
            let url = client.build_url("");
            assert_eq!(url, "http://192.168.4.1/");
        }
    }

    mod new {
        use super::*;

        #[test]
        fn rejects_invalid_base_url() {
            assert!(EspDeviceClient::new("192.168.4.1").is_err());
        }

        #[test]
        fn keeps_port_and_path_prefix() {
            let client = EspDeviceClient::new("http://esp.local:8080/api/").expect("valid base url");
            assert_eq!(client.base_url(), "http://esp.local:8080/api");
            assert_eq!(client.build_url("/info"), "http://esp.local:8080/api/info");
        }
    }

    mod constants {
        use super::*;

        #[test]
        fn api_endpoints_are_correctly_defined() {
            assert_eq!(EspDeviceClient::SETTINGS_ENDPOINT, "/settings");
            assert_eq!(EspDeviceClient::ERASE_SETTINGS_ENDPOINT, "/settings?action=erase");
            assert_eq!(EspDeviceClient::RESTART_ENDPOINT, "/settings?action=restart");
            assert_eq!(EspDeviceClient::INFO_ENDPOINT, "/info");
            assert_eq!(EspDeviceClient::SCAN_ENDPOINT, "/scan");
            assert_eq!(EspDeviceClient::CONNECT_ENDPOINT, "/connect");
        }
    }
}
