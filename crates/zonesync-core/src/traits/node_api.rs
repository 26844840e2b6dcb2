// # Node API Trait
//
// Defines the read-only interface for observing cluster membership and
// node addressing. The observer is the only consumer.
//
// ## Implementations
//
// - Linode LKE: `zonesync-provider-linode` crate
// - Tests: in-memory fake in the contract test suite

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A reference to one member node of a cluster pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Provider-assigned instance identifier
    pub id: u64,
}

/// The IPv6 SLAAC address assigned to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaacAddress {
    /// The address string
    pub address: String,
    /// Whether the address is publicly routable
    #[serde(rename = "public")]
    pub is_public: bool,
}

/// The addresses assigned to one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeAddresses {
    /// Public IPv4 addresses (a node may have none)
    pub ipv4_public: Vec<String>,
    /// IPv6 SLAAC address, if the node has one
    pub ipv6_slaac: Option<SlaacAddress>,
}

/// Trait for cluster node observation
///
/// Implementations perform single-shot reads against the provider API
/// and surface every failure; the control loop's fixed interval is the
/// only retry mechanism, so implementations must not retry internally.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// List the member nodes of a cluster pool
    async fn list_cluster_nodes(
        &self,
        cluster_id: u64,
        pool_id: u64,
    ) -> Result<Vec<NodeRef>, crate::Error>;

    /// Fetch the addresses assigned to one node
    async fn node_addresses(&self, node_id: u64) -> Result<NodeAddresses, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

// Shared clients can be handed to the engine directly.
#[async_trait]
impl<T: NodeApi + ?Sized> NodeApi for std::sync::Arc<T> {
    async fn list_cluster_nodes(
        &self,
        cluster_id: u64,
        pool_id: u64,
    ) -> Result<Vec<NodeRef>, crate::Error> {
        (**self).list_cluster_nodes(cluster_id, pool_id).await
    }

    async fn node_addresses(&self, node_id: u64) -> Result<NodeAddresses, crate::Error> {
        (**self).node_addresses(node_id).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
