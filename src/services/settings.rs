//! Settings form workflows

use crate::{
    device_client::DeviceClient,
    settings::{FormPayload, FormState, SettingsForm},
};
use anyhow::{Context, Result};
use log::{info, warn};

const UNSAVED_SECTION: &str = "Unsaved changes";

/// Service for reading and writing the device settings
pub struct SettingsService;

impl SettingsService {
    /// Fetch the schema and build the editable form from it
    ///
    /// Inconsistent settings are only logged; the form is still built so
    /// the user can fix them.
    pub async fn load_form<Client: DeviceClient>(
        client: &Client,
        form: &SettingsForm,
    ) -> Result<FormState> {
        let schema = client
            .settings()
            .await
            .context("failed to fetch settings")?;

        for inconsistency in schema.check() {
            warn!("inconsistent setting {inconsistency}");
        }

        Ok(form.build(&schema))
    }

    /// Current form with the browser's submission applied
    pub async fn prepare_submission<Client: DeviceClient>(
        client: &Client,
        form: &SettingsForm,
        submitted: &FormPayload,
    ) -> Result<FormState> {
        let mut state = Self::load_form(client, form).await?;
        state.apply(submitted);
        Ok(state)
    }

    /// Form to show again when the schema could not be re-fetched
    ///
    /// The submission is applied to the last form the device delivered, or
    /// shown as raw values if there is none yet.
    pub fn restore_submission(
        last_form: Option<&FormState>,
        submitted: &FormPayload,
    ) -> FormState {
        match last_form {
            Some(form) => {
                let mut state = form.clone();
                state.apply(submitted);
                state
            }
            None => FormState::from_submission(UNSAVED_SECTION, submitted),
        }
    }

    /// Send every control of `state` to the device
    pub async fn submit<Client: DeviceClient>(client: &Client, state: &FormState) -> Result<()> {
        let payload = state.serialize();
        info!("submitting {} settings values", payload.pairs().len());

        client
            .apply_settings(payload)
            .await
            .context("failed to apply settings")
    }

    /// Revert to defaults, then fetch the reverted form
    ///
    /// The fetch only starts once the erase has been acknowledged.
    pub async fn reset_to_defaults<Client: DeviceClient>(
        client: &Client,
        form: &SettingsForm,
    ) -> Result<FormState> {
        client
            .erase_settings()
            .await
            .context("failed to revert default settings")?;

        Self::load_form(client, form).await
    }

    pub async fn restart_device<Client: DeviceClient>(client: &Client) -> Result<()> {
        client.restart().await.context("failed to restart board")
    }
}
