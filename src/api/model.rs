use serde::{Deserialize, Serialize};

/// A provider-held resource record set, as returned by the records endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Rrset {
    pub rrset_values: Vec<String>,
    pub rrset_ttl: u32,
}

impl Rrset {
    /// The value the provider currently publishes for this record, if any.
    ///
    /// Only the first value matters here; these records hold a single address.
    pub fn current_value(&self) -> Option<&str> {
        self.rrset_values.first().map(String::as_str)
    }
}

/// Body sent on both create and update calls.
#[derive(Debug, Serialize)]
pub struct RrsetPayload<'a> {
    pub rrset_ttl: u32,
    pub rrset_values: [&'a str; 1],
}

/// Provider-side state of one record, as seen by a single fetch.
///
/// `Absent` is reserved for a definitive 404; transport failures and other error statuses are
/// kept separate so they can never be mistaken for a missing record.
#[derive(Debug)]
pub enum RecordState {
    Present(Rrset),
    Absent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_to_provider_shape() {
        let payload = RrsetPayload { rrset_ttl: 600, rrset_values: ["203.0.113.7"] };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "rrset_ttl": 600, "rrset_values": ["203.0.113.7"] })
        );
    }

    #[test]
    fn rrset_ignores_extra_fields() {
        let rrset: Rrset = serde_json::from_value(serde_json::json!({
            "rrset_name": "www",
            "rrset_type": "A",
            "rrset_ttl": 300,
            "rrset_values": ["198.51.100.1"],
        }))
        .unwrap();

        assert_eq!(rrset.current_value(), Some("198.51.100.1"));
        assert_eq!(rrset.rrset_ttl, 300);
    }

    #[test]
    fn empty_value_list_has_no_current_value() {
        let rrset = Rrset { rrset_values: vec![], rrset_ttl: 300 };
        assert_eq!(rrset.current_value(), None);
    }
}
