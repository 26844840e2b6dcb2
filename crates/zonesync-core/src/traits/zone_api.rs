// # Zone API Trait
//
// Defines the interface for reading and mutating a DNS zone's records.
// The reconciler is the only consumer.
//
// ## Implementations
//
// - Linode Domains: `zonesync-provider-linode` crate
// - Tests: in-memory fake holding a mutable record list
//
// ## Constraints
//
// Implementations are single-shot: one API call per method invocation,
// no internal retry or backoff (owned by the control loop's interval),
// no caching of the record list (the reconciler re-fetches every pass
// to avoid stale-state divergence).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// DNS record type, as far as the reconciler cares
///
/// Anything that is not an address record deserializes to [`RecordType::Other`]
/// and is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
    /// Any other record type, out of scope
    #[serde(other)]
    Other,
}

/// One record owned by the remote zone
///
/// The reconciler only reads these and requests mutations through the
/// trait; it never edits a record in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Provider-assigned record identifier
    pub id: u64,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record name; the zone apex is the empty string
    pub name: String,
    /// The address string the record points at
    pub target: String,
}

impl ZoneRecord {
    /// Whether this record is an apex address record of the given type
    pub fn is_apex(&self, record_type: RecordType) -> bool {
        self.record_type == record_type && self.name.is_empty()
    }
}

/// Request payload for creating a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCreate {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record name; empty for the zone apex
    pub name: String,
    /// The address the record should point at
    pub target: String,
}

impl RecordCreate {
    /// Create an apex address record payload
    pub fn apex(record_type: RecordType, target: impl Into<String>) -> Self {
        Self {
            record_type,
            name: String::new(),
            target: target.into(),
        }
    }
}

/// Trait for zone record access
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// List every record in the zone
    async fn list_zone_records(&self, zone_id: u64) -> Result<Vec<ZoneRecord>, crate::Error>;

    /// Create a record in the zone
    async fn create_zone_record(
        &self,
        zone_id: u64,
        record: &RecordCreate,
    ) -> Result<(), crate::Error>;

    /// Delete a record from the zone
    async fn delete_zone_record(&self, zone_id: u64, record_id: u64) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

// Shared clients can be handed to the engine directly.
#[async_trait]
impl<T: ZoneApi + ?Sized> ZoneApi for std::sync::Arc<T> {
    async fn list_zone_records(&self, zone_id: u64) -> Result<Vec<ZoneRecord>, crate::Error> {
        (**self).list_zone_records(zone_id).await
    }

    async fn create_zone_record(
        &self,
        zone_id: u64,
        record: &RecordCreate,
    ) -> Result<(), crate::Error> {
        (**self).create_zone_record(zone_id, record).await
    }

    async fn delete_zone_record(&self, zone_id: u64, record_id: u64) -> Result<(), crate::Error> {
        (**self).delete_zone_record(zone_id, record_id).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
