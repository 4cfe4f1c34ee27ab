//! Record data model

use serde::{Deserialize, Serialize};

/// Unit of data stored and cached: key + name + value
///
/// The key is the record's identity and never changes once the record
/// exists. Name and value are opaque strings to every layer above the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique record key
    #[serde(rename = "_id")]
    pub key: String,

    /// Display name
    pub name: String,

    /// Payload value
    pub value: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_encoding_uses_id_field() {
        let record = Record::new("1", "Item1", "Value1");
        let json = serde_json::to_string(&record).unwrap();

        // Stored payloads carry the key under "_id"
        assert!(json.contains("\"_id\":\"1\""));

        let decoded: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }
}
