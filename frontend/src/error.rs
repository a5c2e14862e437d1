use wasm_bindgen::{JsCast, JsValue};

/// Failure while attaching an enhancement to the page.
///
/// None of these are fatal: the start hook logs them and moves on to the next
/// initializer, so the page stays usable with whatever did attach.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("javascript call failed: {0}")]
    Js(String),
    #[error("`{0}` is not available in this environment")]
    MissingGlobal(&'static str),
    #[error("invalid enhancement config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for EnhanceError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<web_sys::js_sys::Error>()
                    .map(|err| String::from(err.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value));
        EnhanceError::Js(message)
    }
}

pub type Result<T> = std::result::Result<T, EnhanceError>;
