use snafu::Snafu;
use wasm_bindgen::JsValue;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BindError {
    #[snafu(display("no global `window` on `{stage}`"))]
    MissingWindow { stage: &'static str },
    #[snafu(display("window has no document on `{stage}`"))]
    MissingDocument { stage: &'static str },
    #[snafu(display("element '#{id}' was not found on `{stage}`"))]
    MissingElement { stage: &'static str, id: String },
    #[snafu(display("element '#{id}' is not a {expected} on `{stage}`"))]
    WrongElementType {
        stage: &'static str,
        id: String,
        expected: &'static str,
    },
    #[snafu(display("DOM call failed on `{stage}`: {details}"))]
    Dom { stage: &'static str, details: String },
    #[snafu(display("failed to configure the answer service on `{stage}`: {source}"))]
    AnswerService {
        stage: &'static str,
        source: atelier_answer::AnswerError,
    },
    #[snafu(display("invalid settings on `{stage}`: {source}"))]
    Settings {
        stage: &'static str,
        source: atelier_settings::SettingsError,
    },
}

pub type BindResult<T> = Result<T, BindError>;

impl BindError {
    pub(crate) fn dom(stage: &'static str, value: JsValue) -> Self {
        Self::Dom {
            stage,
            details: format!("{value:?}"),
        }
    }
}

impl From<BindError> for JsValue {
    fn from(error: BindError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
