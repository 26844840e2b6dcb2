// # Linode Provider
//
// Binds the core capability traits to the Linode API v4:
//
// - `NodeApi` over LKE cluster pools and instance addressing
// - `ZoneApi` over the Domains record endpoints
//
// ## Constraints
//
// - One HTTP request per trait call (plus pagination follow-ups for
//   record listing); no internal retry, backoff or caching — the
//   control loop's interval owns retry.
// - The API token never appears in logs or `Debug` output.
//
// ## API Reference
//
// - Linode API v4: https://www.linode.com/docs/api/
// - Pool nodes:    GET  `/lke/clusters/{cluster}/pools/{pool}`
// - Instance IPs:  GET  `/linode/instances/{instance}/ips`
// - List records:  GET  `/domains/{domain}/records?page=N`
// - Create record: POST `/domains/{domain}/records`
// - Delete record: DELETE `/domains/{domain}/records/{record}`

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use zonesync_core::traits::{
    NodeAddresses, NodeApi, NodeRef, RecordCreate, SlaacAddress, ZoneApi, ZoneRecord,
};
use zonesync_core::{Error, Result};

/// Linode API base URL
const LINODE_API_BASE: &str = "https://api.linode.com/v4";

/// HTTP timeout for API requests
const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Provider name used in errors and logs
const PROVIDER: &str = "linode";

/// Linode API client implementing both capability traits
pub struct LinodeClient {
    /// Personal access token; never logged
    token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// API base URL, overridable for tests
    base_url: String,
}

// The Debug implementation intentionally does not expose the token
impl std::fmt::Debug for LinodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinodeClient")
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LinodeClient {
    /// Create a client against the production API
    ///
    /// Fails with a configuration error if the token is empty; a
    /// missing credential is fatal at startup, not a retry condition.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, LINODE_API_BASE)
    }

    /// Create a client against an explicit base URL
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::config("Linode API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            token,
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::http(format!("GET {path}: {e}")))?;
        let response = check_status(path, response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::http(format!("GET {path}: invalid body: {e}")))
    }
}

/// Map a non-success response to a provider error with a body excerpt
async fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    Err(Error::provider(
        PROVIDER,
        format!("{path} returned {status}: {excerpt}"),
    ))
}

/// Paginated response envelope used by Linode list endpoints
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    page: u32,
    pages: u32,
}

/// One node entry in an LKE pool response
#[derive(Debug, Deserialize)]
struct PoolNode {
    instance_id: u64,
}

/// LKE pool response; only the node list matters here
#[derive(Debug, Deserialize)]
struct Pool {
    nodes: Vec<PoolNode>,
}

/// One entry of an instance's public IPv4 list
#[derive(Debug, Deserialize)]
struct Ipv4Entry {
    address: String,
}

#[derive(Debug, Deserialize)]
struct InstanceIpv4 {
    #[serde(default)]
    public: Vec<Ipv4Entry>,
}

#[derive(Debug, Deserialize)]
struct InstanceIpv6 {
    slaac: Option<SlaacAddress>,
}

/// Response of `/linode/instances/{id}/ips`
#[derive(Debug, Deserialize)]
struct InstanceIps {
    ipv4: InstanceIpv4,
    ipv6: Option<InstanceIpv6>,
}

#[async_trait]
impl NodeApi for LinodeClient {
    async fn list_cluster_nodes(&self, cluster_id: u64, pool_id: u64) -> Result<Vec<NodeRef>> {
        let pool: Pool = self
            .get_json(&format!("/lke/clusters/{cluster_id}/pools/{pool_id}"))
            .await?;
        Ok(pool
            .nodes
            .into_iter()
            .map(|node| NodeRef { id: node.instance_id })
            .collect())
    }

    async fn node_addresses(&self, node_id: u64) -> Result<NodeAddresses> {
        let ips: InstanceIps = self
            .get_json(&format!("/linode/instances/{node_id}/ips"))
            .await?;
        Ok(NodeAddresses {
            ipv4_public: ips.ipv4.public.into_iter().map(|ip| ip.address).collect(),
            ipv6_slaac: ips.ipv6.and_then(|v6| v6.slaac),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[async_trait]
impl ZoneApi for LinodeClient {
    async fn list_zone_records(&self, zone_id: u64) -> Result<Vec<ZoneRecord>> {
        let mut records = Vec::new();
        let mut page = 1u32;
        loop {
            let envelope: Page<ZoneRecord> = self
                .get_json(&format!("/domains/{zone_id}/records?page={page}"))
                .await?;
            records.extend(envelope.data);
            if envelope.page >= envelope.pages {
                break;
            }
            page = envelope.page + 1;
        }
        Ok(records)
    }

    async fn create_zone_record(&self, zone_id: u64, record: &RecordCreate) -> Result<()> {
        let path = format!("/domains/{zone_id}/records");
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, target = %record.target, "POST");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await
            .map_err(|e| Error::http(format!("POST {path}: {e}")))?;
        check_status(&path, response).await?;
        Ok(())
    }

    async fn delete_zone_record(&self, zone_id: u64, record_id: u64) -> Result<()> {
        let path = format!("/domains/{zone_id}/records/{record_id}");
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::http(format!("DELETE {path}: {e}")))?;
        check_status(&path, response).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
