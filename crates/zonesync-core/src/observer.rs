//! IP observer
//!
//! Queries the cluster's current member nodes and collects their public
//! addresses into a canonical [`AddressSnapshot`].
//!
//! Observation is all-or-nothing: any per-node fetch failure aborts the
//! whole cycle's snapshot rather than returning a partial one, so the
//! caller never mistakes a half-observed cluster for a shrunken one.

use tracing::debug;

use crate::error::Result;
use crate::snapshot::AddressSnapshot;
use crate::traits::NodeApi;

/// Observe the cluster's current public addresses
///
/// Fetches the pool's member nodes, then each node's addresses. Every
/// public IPv4 address is collected; the IPv6 SLAAC address is collected
/// only when the provider marks it publicly routable. A node that
/// contributes no address to a family is not an error.
pub async fn observe(
    api: &dyn NodeApi,
    cluster_id: u64,
    pool_id: u64,
) -> Result<AddressSnapshot> {
    let nodes = api.list_cluster_nodes(cluster_id, pool_id).await?;
    debug!(cluster_id, pool_id, nodes = nodes.len(), "observing cluster pool");

    let mut ipv4 = Vec::new();
    let mut ipv6 = Vec::new();

    for node in &nodes {
        let addresses = api.node_addresses(node.id).await?;
        ipv4.extend(addresses.ipv4_public);
        if let Some(slaac) = addresses.ipv6_slaac
            && slaac.is_public
        {
            ipv6.push(slaac.address);
        }
    }

    Ok(AddressSnapshot::new(ipv4, ipv6))
}
