use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{ExtractSnafu, SerializeSettingsSnafu, SettingsResult};

pub const DEFAULT_ENDPOINT_PATH: &str = "/ask";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Désolé, une erreur s'est produite lors de la communication avec l'IA. Veuillez réessayer plus tard.";
pub const DEFAULT_INPUT_ID: &str = "user-input";
pub const DEFAULT_SEND_ID: &str = "send-btn";
pub const DEFAULT_MESSAGES_ID: &str = "chat-messages";
pub const DEFAULT_INDICATOR_ID: &str = "typing-indicator";

/// Distance from the viewport top, in CSS pixels, that decides the current section.
pub const DEFAULT_ACTIVATION_OFFSET: f64 = 100.0;
pub const DEFAULT_SCROLLED_THRESHOLD: f64 = 50.0;
pub const DEFAULT_NAVBAR_ID: &str = "main-nav";
pub const DEFAULT_LINK_SELECTOR: &str = ".navbar-nav .nav-link";
pub const DEFAULT_SECTION_SELECTOR: &str = "section[id], footer[id]";
pub const DEFAULT_TOP_SENTINEL: &str = "top";

/// Prefix for environment overrides, e.g. `ATELIER_CHAT__ENDPOINT_PATH`.
pub const ENV_PREFIX: &str = "ATELIER_";

/// Element ids the chat controller binds to at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatElements {
    #[serde(default = "default_input_id")]
    pub input_id: String,
    #[serde(default = "default_send_id")]
    pub send_id: String,
    #[serde(default = "default_messages_id")]
    pub messages_id: String,
    #[serde(default = "default_indicator_id")]
    pub indicator_id: String,
}

impl Default for ChatElements {
    fn default() -> Self {
        Self {
            input_id: default_input_id(),
            send_id: default_send_id(),
            messages_id: default_messages_id(),
            indicator_id: default_indicator_id(),
        }
    }
}

impl ChatElements {
    fn normalized(self) -> Self {
        Self {
            input_id: or_default(self.input_id, DEFAULT_INPUT_ID),
            send_id: or_default(self.send_id, DEFAULT_SEND_ID),
            messages_id: or_default(self.messages_id, DEFAULT_MESSAGES_ID),
            indicator_id: or_default(self.indicator_id, DEFAULT_INDICATOR_ID),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
    /// Shown verbatim for every failed exchange, whatever the cause.
    #[serde(default = "default_failure_message")]
    pub failure_message: String,
    #[serde(default = "default_true")]
    pub render_markdown: bool,
    #[serde(default)]
    pub lock_input_while_pending: bool,
    #[serde(default)]
    pub elements: ChatElements,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint_path: default_endpoint_path(),
            failure_message: default_failure_message(),
            render_markdown: true,
            lock_input_while_pending: false,
            elements: ChatElements::default(),
        }
    }
}

impl ChatSettings {
    pub fn normalized(mut self) -> Self {
        let endpoint_path = self.endpoint_path.trim();
        self.endpoint_path = if endpoint_path.is_empty() {
            default_endpoint_path()
        } else if endpoint_path.starts_with('/') || endpoint_path.contains("://") {
            endpoint_path.to_string()
        } else {
            format!("/{endpoint_path}")
        };
        self.failure_message = or_default(self.failure_message, DEFAULT_FAILURE_MESSAGE);
        self.elements = self.elements.normalized();
        self
    }
}

/// What the highlighter selects when no section spans the activation offset mid-page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Keep whatever was selected last.
    #[default]
    Retain,
    /// Fall back to the top sentinel.
    Top,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSettings {
    #[serde(default = "default_activation_offset")]
    pub activation_offset: f64,
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold: f64,
    #[serde(default)]
    pub gap_policy: GapPolicy,
    #[serde(default = "default_navbar_id")]
    pub navbar_id: String,
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
    #[serde(default = "default_section_selector")]
    pub section_selector: String,
    #[serde(default = "default_top_sentinel")]
    pub top_sentinel: String,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            activation_offset: DEFAULT_ACTIVATION_OFFSET,
            scrolled_threshold: DEFAULT_SCROLLED_THRESHOLD,
            gap_policy: GapPolicy::default(),
            navbar_id: default_navbar_id(),
            link_selector: default_link_selector(),
            section_selector: default_section_selector(),
            top_sentinel: default_top_sentinel(),
        }
    }
}

impl NavSettings {
    pub fn normalized(mut self) -> Self {
        self.activation_offset = non_negative_or(self.activation_offset, DEFAULT_ACTIVATION_OFFSET);
        self.scrolled_threshold =
            non_negative_or(self.scrolled_threshold, DEFAULT_SCROLLED_THRESHOLD);
        self.navbar_id = or_default(self.navbar_id, DEFAULT_NAVBAR_ID);
        self.link_selector = or_default(self.link_selector, DEFAULT_LINK_SELECTOR);
        self.section_selector = or_default(self.section_selector, DEFAULT_SECTION_SELECTOR);
        self.top_sentinel = or_default(self.top_sentinel, DEFAULT_TOP_SENTINEL);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub nav: NavSettings,
}

impl SiteSettings {
    /// Layers defaults, an optional JSON document, then `ATELIER_` environment overrides.
    pub fn figment(json: Option<&str>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(SiteSettings::default()));
        if let Some(json) = json {
            figment = figment.merge(Json::string(json));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn extract(json: Option<&str>) -> SettingsResult<Self> {
        let settings = Self::figment(json)
            .extract::<SiteSettings>()
            .context(ExtractSnafu {
                stage: "extract-site-settings",
            })?;
        Ok(settings.normalized())
    }

    pub fn normalized(self) -> Self {
        Self {
            chat: self.chat.normalized(),
            nav: self.nav.normalized(),
        }
    }

    pub fn to_json_pretty(&self) -> SettingsResult<String> {
        serde_json::to_string_pretty(self).context(SerializeSettingsSnafu {
            stage: "serialize-site-settings",
        })
    }
}

/// Shared, swappable view of the current settings.
///
/// Readers take a snapshot per operation, so an update applies to the next
/// exchange or scroll tick rather than one already running.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<ArcSwap<SiteSettings>>,
}

impl SettingsStore {
    pub fn new(settings: SiteSettings) -> Self {
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings.normalized())),
        }
    }

    /// Loads layered settings, falling back to defaults when extraction fails.
    pub fn load(json: Option<&str>) -> Self {
        match SiteSettings::extract(json) {
            Ok(settings) => Self::new(settings),
            Err(error) => {
                tracing::warn!("failed to load site settings: {}. using defaults", error);
                Self::new(SiteSettings::default())
            }
        }
    }

    pub fn settings(&self) -> Arc<SiteSettings> {
        self.settings.load_full()
    }

    pub fn update(&self, settings: SiteSettings) {
        self.settings.store(Arc::new(settings.normalized()));
        tracing::info!("site settings replaced");
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SiteSettings::default())
    }
}

fn or_default(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_negative_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        default
    }
}

fn default_true() -> bool {
    true
}

fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

fn default_failure_message() -> String {
    DEFAULT_FAILURE_MESSAGE.to_string()
}

fn default_input_id() -> String {
    DEFAULT_INPUT_ID.to_string()
}

fn default_send_id() -> String {
    DEFAULT_SEND_ID.to_string()
}

fn default_messages_id() -> String {
    DEFAULT_MESSAGES_ID.to_string()
}

fn default_indicator_id() -> String {
    DEFAULT_INDICATOR_ID.to_string()
}

fn default_activation_offset() -> f64 {
    DEFAULT_ACTIVATION_OFFSET
}

fn default_scrolled_threshold() -> f64 {
    DEFAULT_SCROLLED_THRESHOLD
}

fn default_navbar_id() -> String {
    DEFAULT_NAVBAR_ID.to_string()
}

fn default_link_selector() -> String {
    DEFAULT_LINK_SELECTOR.to_string()
}

fn default_section_selector() -> String {
    DEFAULT_SECTION_SELECTOR.to_string()
}

fn default_top_sentinel() -> String {
    DEFAULT_TOP_SENTINEL.to_string()
}
