pub mod form;
pub mod payload;
pub mod render;
pub mod schema;

pub use form::FormState;
pub use payload::FormPayload;
pub use render::SettingsForm;
pub use schema::{Schema, SettingsEnvelope};
