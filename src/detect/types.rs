use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::platform::Platform;

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionRequest {
    pub url: String,
}

/// Wire shape: `{platform, storeId, error?}`. `storeId` is always present,
/// `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub platform: Platform,
    pub store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionResult {
    /// An identifier is only kept for a recognized platform.
    pub fn detected(platform: Platform, store_id: Option<String>) -> Self {
        let store_id = if platform.is_known() { store_id } else { None };
        DetectionResult { platform, store_id, error: None }
    }

    pub fn failed(error: &DetectError) -> Self {
        DetectionResult { platform: Platform::Error, store_id: None, error: Some(error.to_string()) }
    }
}
