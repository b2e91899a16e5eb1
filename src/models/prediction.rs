//! Prediction request/response bodies

use serde::{Deserialize, Deserializer, Serialize};

use crate::logic::pipeline::Decision;

/// `POST /predict` body. `image` is a `<metadata>,<base64>` string.
///
/// Outer `None` means the key is absent, `Some(None)` means it is `null`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
}

/// Marks a key as present even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub cheating: bool,
    pub confidence: f32,
}

impl From<Decision> for PredictResponse {
    fn from(decision: Decision) -> Self {
        Self {
            cheating: decision.cheating,
            confidence: decision.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_image_absent_vs_null() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.image, None);

        let req: PredictRequest = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(req.image, Some(None));

        let req: PredictRequest =
            serde_json::from_str(r#"{"image": "data:image/png;base64,AAAA", "extra": 1}"#).unwrap();
        assert_eq!(req.image, Some(Some("data:image/png;base64,AAAA".to_string())));
    }

    #[test]
    fn test_request_image_wrong_type() {
        assert!(serde_json::from_str::<PredictRequest>(r#"{"image": 42}"#).is_err());
    }

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_string(&PredictResponse { cheating: true, confidence: 0.73 }).unwrap();
        assert_eq!(body, r#"{"cheating":true,"confidence":0.73}"#);
    }
}
