//! Two-phase decoding of the fetched group records.

use crate::error::{Error, Result};
use crate::models::EcGroup;
use serde_json::Value;

/// Raw concatenated records of one fetch, kept for post-mortem inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    pub bytes: Vec<u8>,
    /// Unix timestamp (seconds) of the fetch.
    pub fetched_at: i64,
}

impl RawPayload {
    pub fn from_records(records: &[Value], fetched_at: i64) -> Result<RawPayload> {
        let bytes = serde_json::to_vec(records).map_err(|e| Error::Decode {
            record: "*".to_string(),
            path: ".".to_string(),
            message: format!("Error serializing records: {e}"),
            raw_saved: None,
        })?;
        Ok(RawPayload { bytes, fetched_at })
    }
}

/// Typed groups together with the payload they were decoded from.
#[derive(Debug)]
pub struct Decoded {
    pub payload: RawPayload,
    pub groups: Result<Vec<EcGroup>>,
}

/// Decode a payload: generic records first, then each record into an [`EcGroup`].
pub fn decode(payload: RawPayload) -> Decoded {
    let groups = decode_groups(&payload.bytes);
    Decoded { payload, groups }
}

fn decode_groups(bytes: &[u8]) -> Result<Vec<EcGroup>> {
    let records: Vec<Value> = serde_json::from_slice(bytes).map_err(|e| Error::Decode {
        record: "*".to_string(),
        path: ".".to_string(),
        message: e.to_string(),
        raw_saved: None,
    })?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let id = record.get("id").cloned().unwrap_or(Value::Null);
            let group: std::result::Result<EcGroup, _> = serde_path_to_error::deserialize(record);
            group.map_err(|e| {
                log::error!("Error decoding group record #{i} (id={id}) at {}", e.path());
                Error::Decode {
                    record: format!("#{i} (id={id})"),
                    path: e.path().to_string(),
                    message: e.into_inner().to_string(),
                    raw_saved: None,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(records: Value) -> RawPayload {
        RawPayload::from_records(records.as_array().unwrap(), 1_700_000_000).unwrap()
    }

    #[test]
    fn test_decode_fixture() {
        let json = std::fs::read("src/tests/test_data/ecgroups_test_01.json").unwrap();
        let decoded = decode(RawPayload {
            bytes: json,
            fetched_at: 1,
        });
        let groups = decoded.groups.expect("fixture should decode");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, "grp-aws-euw1");
        assert_eq!(groups[0].ec_vms.len(), 3);
        assert!(groups[2].ec_vms.is_empty());
    }

    #[test]
    fn test_decode_keeps_payload() {
        let p = payload(json!([{"id": 1, "name": "g1"}]));
        let bytes = p.bytes.clone();
        let decoded = decode(p);
        assert_eq!(decoded.payload.bytes, bytes);
        assert_eq!(decoded.groups.unwrap()[0].name, "g1");
    }

    #[test]
    fn test_decode_empty() {
        let decoded = decode(payload(json!([])));
        assert!(decoded.groups.unwrap().is_empty());
    }

    #[test]
    fn test_decode_strict_failure_reports_path() {
        let decoded = decode(payload(json!([
            {"id": 1, "name": "ok"},
            {"id": 2, "name": "bad", "ecVMs": [{"id": "not-a-number"}]}
        ])));
        match decoded.groups.unwrap_err() {
            Error::Decode { record, path, .. } => {
                assert_eq!(record, "#1 (id=2)");
                assert_eq!(path, "ecVMs[0].id");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!decoded.payload.bytes.is_empty());
    }

    #[test]
    fn test_decode_structural_failure() {
        let decoded = decode(RawPayload {
            bytes: b"{not json".to_vec(),
            fetched_at: 0,
        });
        assert!(matches!(decoded.groups, Err(Error::Decode { .. })));
    }
}
