//! Wifi status, scan and connect workflows

use crate::{
    device_client::DeviceClient,
    markup::Element,
    settings::FormPayload,
    wifi::{StatusPanel, render_scan},
};
use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use serde_valid::Validate;
use tokio::sync::RwLock;

/// Where the scan table posts a connect request
pub const CONNECT_PATH: &str = "/wifi/connect";

/// Credentials for the station interface
///
/// The device splits the body on `&` and never decodes it, so neither
/// field may contain one.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ConnectRequest {
    #[validate(min_length = 1)]
    #[validate(max_length = 32)]
    #[validate(pattern = r"^[^&]*$")]
    pub ssid: String,
    #[validate(max_length = 64)]
    #[validate(pattern = r"^[^&]*$")]
    #[serde(default)]
    pub passwd: String,
}

impl ConnectRequest {
    fn to_payload(&self) -> FormPayload {
        let mut payload = FormPayload::new();
        payload.push("ssid", self.ssid.as_str());
        payload.push("passwd", self.passwd.as_str());
        payload
    }
}

/// Service for the station interface of the device
pub struct WifiService;

impl WifiService {
    /// Re-render the status panel from one `/info` request
    ///
    /// On failure the panel keeps its previous content and the error is
    /// returned to the caller.
    pub async fn refresh<Client: DeviceClient>(
        client: &Client,
        panel: &RwLock<StatusPanel>,
        icon_size: u32,
    ) -> Result<()> {
        let info = client
            .wifi_info()
            .await
            .context("failed to fetch wifi info")?;

        *panel.write().await = StatusPanel::from_info(&info, icon_size);
        Ok(())
    }

    pub async fn scan<Client: DeviceClient>(client: &Client, icon_size: u32) -> Result<Element> {
        let result = client
            .wifi_scan()
            .await
            .context("failed to scan for access points")?;

        info!("found {} access points", result.scan.len());
        Ok(render_scan(&result, icon_size, CONNECT_PATH))
    }

    pub async fn connect<Client: DeviceClient>(
        client: &Client,
        request: &ConnectRequest,
    ) -> Result<()> {
        info!("connect to {:?}", request.ssid);

        request.validate().context("connect validation failed")?;

        client
            .wifi_connect(request.to_payload())
            .await
            .context("failed to connect")
    }
}
