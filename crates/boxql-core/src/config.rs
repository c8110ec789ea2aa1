use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};

///
/// StoreConfig
///
/// Per-store policy for the query layer.
/// `debug` promotes per-condition log lines from TRACE to DEBUG;
/// `metrics` disables all metrics recording when false.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub debug: bool,
    pub metrics: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            debug: false,
            metrics: true,
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, InternalError> {
        serde_json::from_str(json).map_err(|err| {
            InternalError::new(
                ErrorClass::Unsupported,
                ErrorOrigin::Config,
                format!("invalid store config: {err}"),
            )
        })
    }

    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn without_metrics(mut self) -> Self {
        self.metrics = false;
        self
    }
}
