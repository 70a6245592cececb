use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "sleuth.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl Meta {
    pub fn took(started: std::time::Instant) -> Self {
        Meta { duration_ms: Some(started.elapsed().as_millis()) }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        let res_val = serde_json::to_value(result)?;
        Ok(Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            result: Some(res_val),
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_result_envelope() {
        let result = json!({"platform": "Salla", "storeId": "4821"});
        let env = Envelope::result("detect", &result, None).expect("to serialize result");
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"schema_version\":\"sleuth.v1\""));
        assert!(s.contains("\"op\":\"detect\""));
        assert!(s.contains("\"storeId\":\"4821\""));
        assert!(!s.contains("\"meta\""));
    }

    #[test]
    fn meta_carries_duration() {
        let env = Envelope::result("detect", &json!({}), Some(Meta { duration_ms: Some(12) })).unwrap();
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["meta"]["duration_ms"], 12);
    }
}
