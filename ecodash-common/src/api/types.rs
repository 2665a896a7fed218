//! Shared assessment API types
//!
//! The collection endpoint is owned by the backend pipeline and has shipped
//! three different response envelopes over time: `{"items": [...]}`, a bare
//! array, and `{"Items": [...]}`. [`AssessmentEnvelope`] is the
//! compatibility shim that accepts all three and normalizes to a flat,
//! order-preserving record list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One backend-produced compliance assessment.
///
/// Read-only projection: the dashboard never mutates these. Field presence
/// is not guaranteed by the backend, so everything defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Backend record identifier
    #[serde(default)]
    pub assessment_id: Option<String>,

    /// Identifier correlating back to an uploaded artifact.
    /// May be the storage key, a derived form of it, or a bare filename.
    #[serde(default)]
    pub file_id: Option<String>,

    /// Original source filename as the backend saw it
    #[serde(default)]
    pub source_file: Option<String>,

    /// Backend-side timestamp (kept verbatim; format is not ours to enforce)
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Overall compliance score, 0-100
    #[serde(default)]
    pub compliance_score: f64,

    /// Data quality score, 0-100
    #[serde(default)]
    pub data_quality_score: f64,

    #[serde(default)]
    pub total_violations: i64,

    #[serde(default)]
    pub critical_violations: i64,

    /// e.g. "compliant", "at_risk", "non_compliant"
    #[serde(default)]
    pub overall_status: Option<String>,

    /// Detail payload (violations, strengths, next steps); opaque to us
    #[serde(default)]
    pub assessment_data: Option<Value>,
}

/// Response envelope compatibility shim for `GET /assessments`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AssessmentEnvelope {
    /// `{"items": [...]}`
    LowercaseItems { items: Vec<AssessmentRecord> },
    /// `{"Items": [...]}` (DynamoDB-style casing)
    UppercaseItems {
        #[serde(rename = "Items")]
        items: Vec<AssessmentRecord>,
    },
    /// Bare `[...]`
    Bare(Vec<AssessmentRecord>),
}

impl AssessmentEnvelope {
    /// Normalize to a flat ordered record list
    pub fn into_records(self) -> Vec<AssessmentRecord> {
        match self {
            AssessmentEnvelope::LowercaseItems { items } => items,
            AssessmentEnvelope::UppercaseItems { items } => items,
            AssessmentEnvelope::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(file_id: &str) -> String {
        format!(
            r#"{{"assessment_id":"a-1","file_id":"{}","source_file":"report.csv",
                "timestamp":"2026-08-01T12:00:00Z","compliance_score":72.5,
                "data_quality_score":88.0,"total_violations":3,"critical_violations":1,
                "overall_status":"at_risk"}}"#,
            file_id
        )
    }

    #[test]
    fn test_lowercase_items_envelope() {
        let body = format!(r#"{{"items":[{}]}}"#, record_json("raw-data/report.csv"));
        let envelope: AssessmentEnvelope = serde_json::from_str(&body).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_id.as_deref(), Some("raw-data/report.csv"));
        assert_eq!(records[0].compliance_score, 72.5);
    }

    #[test]
    fn test_uppercase_items_envelope() {
        let body = format!(r#"{{"Items":[{}]}}"#, record_json("report.csv"));
        let envelope: AssessmentEnvelope = serde_json::from_str(&body).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_id.as_deref(), Some("report.csv"));
    }

    #[test]
    fn test_bare_array_envelope() {
        let body = format!(r#"[{},{}]"#, record_json("a.csv"), record_json("b.csv"));
        let envelope: AssessmentEnvelope = serde_json::from_str(&body).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_id.as_deref(), Some("a.csv"));
        assert_eq!(records[1].file_id.as_deref(), Some("b.csv"));
    }

    #[test]
    fn test_all_envelopes_normalize_identically() {
        let inner = record_json("raw-data/q3.pdf");
        let shapes = [
            format!(r#"{{"items":[{}]}}"#, inner),
            format!(r#"[{}]"#, inner),
            format!(r#"{{"Items":[{}]}}"#, inner),
        ];
        let normalized: Vec<Vec<AssessmentRecord>> = shapes
            .iter()
            .map(|body| {
                serde_json::from_str::<AssessmentEnvelope>(body)
                    .unwrap()
                    .into_records()
            })
            .collect();
        assert_eq!(normalized[0], normalized[1]);
        assert_eq!(normalized[1], normalized[2]);
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let body = r#"{"items":[{"file_id":"x.csv"}]}"#;
        let envelope: AssessmentEnvelope = serde_json::from_str(body).unwrap();
        let records = envelope.into_records();
        assert_eq!(records[0].compliance_score, 0.0);
        assert_eq!(records[0].total_violations, 0);
        assert_eq!(records[0].critical_violations, 0);
        assert!(records[0].overall_status.is_none());
    }

    #[test]
    fn test_order_preserved_across_normalization() {
        let body = format!(
            r#"{{"items":[{},{},{}]}}"#,
            record_json("1.csv"),
            record_json("2.csv"),
            record_json("3.csv")
        );
        let records = serde_json::from_str::<AssessmentEnvelope>(&body)
            .unwrap()
            .into_records();
        let ids: Vec<_> = records.iter().filter_map(|r| r.file_id.clone()).collect();
        assert_eq!(ids, vec!["1.csv", "2.csv", "3.csv"]);
    }
}
