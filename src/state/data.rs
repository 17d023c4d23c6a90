/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the history store and the UI layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One past analysis: the first image of the request and the model's answer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    /// Data URL of the first uploaded image
    pub image: String,
    /// Model output, shown as-is
    pub result: String,
    /// Missing on records written before timestamps were kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysed_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    pub fn new(image: String, result: String) -> Self {
        Self {
            image,
            result,
            analysed_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_timestamp_parses() {
        let json = r#"{"image":"data:image/png;base64,AAAA","result":"Make - Ford"}"#;
        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.result, "Make - Ford");
        assert!(record.analysed_at.is_none());
    }

    #[test]
    fn test_new_record_is_stamped() {
        let record = AnalysisRecord::new("data:image/png;base64,AAAA".into(), "ok".into());
        assert!(record.analysed_at.is_some());
    }
}
