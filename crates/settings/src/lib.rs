//! Layered configuration for the site controllers.
pub mod error;
pub mod state;

pub use error::{SettingsError, SettingsResult};
pub use state::{
    ChatElements, ChatSettings, DEFAULT_FAILURE_MESSAGE, ENV_PREFIX, GapPolicy, NavSettings,
    SettingsStore, SiteSettings,
};
