use crate::{
    device_client::DeviceClient,
    http_client::{ServiceResultResponse, handle_service_result},
    markup::Element,
    page::{Notice, Page},
    services::{
        settings::SettingsService,
        wifi::{ConnectRequest, WifiService},
    },
    settings::{
        FormPayload, FormState, SettingsForm,
        render::{DEFAULTS_PATH, RESTART_PATH},
    },
    wifi::{StatusPanel, render_icon},
};
use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use anyhow::Result;
use log::{debug, error, warn};
use serde::Deserialize;
use serde_valid::Validate;
use tokio::sync::RwLock;

const SETTINGS_CHANGED: &str = "board config changed";
const REVERT_QUESTION: &str = "Do you want to revert default settings?";
const REVERTED: &str = "Board settings reset to defaults";
const RESTART_QUESTION: &str = "Do you want to reset the board?";
const RESTARTED: &str = "Board reset - disconnected";

#[derive(Debug, Deserialize)]
pub struct IconQuery {
    width: Option<u32>,
    height: Option<u32>,
    rssi: i32,
    #[serde(default = "open_auth_mode")]
    auth: String,
}

fn open_auth_mode() -> String {
    crate::wifi::icon::OPEN_AUTH_MODE.to_string()
}

pub struct Api<Client>
where
    Client: DeviceClient,
{
    pub device_client: Client,
    pub settings_form: SettingsForm,
    pub status_panel: RwLock<StatusPanel>,
    /// Last form delivered by the device, for re-rendering failed submits
    pub last_form: RwLock<Option<FormState>>,
    pub icon_size: u32,
}

impl<Client> Api<Client>
where
    Client: DeviceClient,
{
    pub fn new(device_client: Client, settings_form: SettingsForm, icon_size: u32) -> Self {
        Api {
            device_client,
            settings_form,
            status_panel: RwLock::new(StatusPanel::default()),
            last_form: RwLock::new(None),
            icon_size,
        }
    }

    pub async fn index(api: web::Data<Self>) -> impl Responder {
        debug!("index() called");

        if let Err(e) =
            WifiService::refresh(&api.device_client, &api.status_panel, api.icon_size).await
        {
            warn!("wifi status refresh failed: {e:#}");
        }

        let page = match SettingsService::load_form(&api.device_client, &api.settings_form).await
        {
            Ok(state) => {
                api.remember_form(&state).await;
                api.settings_page(&state).await
            }
            Err(e) => {
                error!("load_form failed: {e:#}");
                api.status_page()
                    .await
                    .with_notice(Notice::Error(format!("{e:#}")))
                    .with_status(StatusCode::BAD_GATEWAY)
            }
        };

        page.into_response()
    }

    pub async fn submit_settings(
        body: web::Form<Vec<(String, String)>>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("submit_settings() called");

        let submitted = FormPayload::from(body.into_inner());
        let state = match SettingsService::prepare_submission(
            &api.device_client,
            &api.settings_form,
            &submitted,
        )
        .await
        {
            Ok(state) => {
                api.remember_form(&state).await;
                state
            }
            Err(e) => {
                error!("submit_settings failed: {e:#}");
                let last_form = api.last_form.read().await.clone();
                let state = SettingsService::restore_submission(last_form.as_ref(), &submitted);
                return api
                    .settings_page(&state)
                    .await
                    .with_notice(Notice::Error(format!("{e:#}")))
                    .with_status(StatusCode::BAD_GATEWAY)
                    .into_response();
            }
        };

        // the page keeps the submitted values either way
        let page = api.settings_page(&state).await;
        let page = match SettingsService::submit(&api.device_client, &state).await {
            Ok(()) => page.with_notice(Notice::Success(SETTINGS_CHANGED.to_string())),
            Err(e) => {
                error!("submit_settings failed: {e:#}");
                page.with_notice(Notice::Error(format!("{e:#}")))
                    .with_status(StatusCode::BAD_GATEWAY)
            }
        };

        page.into_response()
    }

    pub async fn confirm_defaults() -> impl Responder {
        debug!("confirm_defaults() called");
        Page::confirm(REVERT_QUESTION, DEFAULTS_PATH).into_response()
    }

    pub async fn reset_defaults(api: web::Data<Self>) -> impl Responder {
        debug!("reset_defaults() called");
        handle_service_result(api.reset_defaults_page().await, "reset_defaults")
    }

    pub async fn confirm_restart() -> impl Responder {
        debug!("confirm_restart() called");
        Page::confirm(RESTART_QUESTION, RESTART_PATH).into_response()
    }

    pub async fn restart(api: web::Data<Self>) -> impl Responder {
        debug!("restart() called");

        let result = SettingsService::restart_device(&api.device_client)
            .await
            .map(|()| Page::new("restart").with_notice(Notice::Success(RESTARTED.to_string())));

        handle_service_result(result, "restart")
    }

    pub async fn wifi(api: web::Data<Self>) -> impl Responder {
        debug!("wifi() called");

        let refreshed =
            WifiService::refresh(&api.device_client, &api.status_panel, api.icon_size).await;
        let page = api.status_page().await;

        let page = match refreshed {
            Ok(()) => page,
            Err(e) => {
                error!("wifi refresh failed: {e:#}");
                page.with_notice(Notice::Error(format!("{e:#}")))
                    .with_status(StatusCode::BAD_GATEWAY)
            }
        };

        page.into_response()
    }

    pub async fn wifi_scan(api: web::Data<Self>) -> impl Responder {
        debug!("wifi_scan() called");

        let result = WifiService::scan(&api.device_client, api.icon_size)
            .await
            .map(|table| Page::new("scan").with_section(table));

        handle_service_result(result, "wifi_scan")
    }

    pub async fn wifi_connect(
        body: web::Form<ConnectRequest>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("wifi_connect() called: {:?}", body.ssid);

        if let Err(e) = body.validate() {
            warn!("wifi_connect rejected: {e}");
            return Page::error(format!("connect validation failed: {e}"))
                .with_status(StatusCode::BAD_REQUEST)
                .into_response();
        }

        let result = WifiService::connect(&api.device_client, &body)
            .await
            .map(|()| {
                Page::new("wifi").with_notice(Notice::Success(format!(
                    "connecting to {}",
                    body.ssid
                )))
            });

        handle_service_result(result, "wifi_connect")
    }

    pub async fn wifi_icon(query: web::Query<IconQuery>, api: web::Data<Self>) -> impl Responder {
        debug!("wifi_icon() called: {query:?}");

        let width = query.width.unwrap_or(api.icon_size);
        let height = query.height.unwrap_or(width);

        HttpResponse::Ok()
            .content_type("image/svg+xml")
            .body(render_icon(width, height, query.rssi, &query.auth).to_string())
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
    }

    pub async fn healthcheck(api: web::Data<Self>) -> impl Responder {
        debug!("healthcheck() called");

        match api.device_client.wifi_info().await {
            Ok(_) => HttpResponse::Ok().finish(),
            Err(e) => {
                error!("healthcheck failed: {e:#}");
                HttpResponse::ServiceUnavailable().body(e.to_string())
            }
        }
    }

    async fn reset_defaults_page(&self) -> Result<Page> {
        let state = SettingsService::reset_to_defaults(&self.device_client, &self.settings_form)
            .await?;
        self.remember_form(&state).await;

        Ok(self
            .settings_page(&state)
            .await
            .with_notice(Notice::Success(REVERTED.to_string())))
    }

    async fn remember_form(&self, state: &FormState) {
        *self.last_form.write().await = Some(state.clone());
    }

    async fn settings_page(&self, state: &FormState) -> Page {
        Page::new("settings")
            .with_section(section("settings", self.settings_form.render(state)))
            .with_section(self.status_section().await)
    }

    async fn status_page(&self) -> Page {
        Page::new("wifi").with_section(self.status_section().await)
    }

    async fn status_section(&self) -> Element {
        section("wifi", self.status_panel.read().await.to_element())
    }
}

fn section(title: &str, content: Element) -> Element {
    Element::new("section")
        .child(Element::new("h2").text(title))
        .child(content)
}
