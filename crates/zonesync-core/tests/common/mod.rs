//! Test doubles and common utilities for the contract tests
//!
//! In-memory fakes for both provider traits. All interior state lives
//! behind `Arc`s so a fake can be cloned, handed to the engine boxed,
//! and still inspected from the test.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonesync_core::error::{Error, Result};
use zonesync_core::traits::{
    NodeAddresses, NodeApi, NodeRef, RecordCreate, RecordType, ZoneApi, ZoneRecord,
};

/// Sentinel for "never inject a failure"
const NEVER: usize = usize::MAX;

/// A fake NodeApi backed by in-memory node and address tables
#[derive(Clone)]
pub struct FakeNodeApi {
    nodes: Arc<Mutex<Vec<NodeRef>>>,
    addresses: Arc<Mutex<HashMap<u64, NodeAddresses>>>,
    /// When set, list_cluster_nodes fails
    fail_list: Arc<Mutex<bool>>,
    /// When set, node_addresses fails for this node id
    fail_node: Arc<Mutex<Option<u64>>>,
    list_calls: Arc<AtomicUsize>,
    address_calls: Arc<AtomicUsize>,
}

impl FakeNodeApi {
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(Mutex::new(Vec::new())),
            addresses: Arc::new(Mutex::new(HashMap::new())),
            fail_list: Arc::new(Mutex::new(false)),
            fail_node: Arc::new(Mutex::new(None)),
            list_calls: Arc::new(AtomicUsize::new(0)),
            address_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a node with the given addresses
    pub fn add_node(&self, id: u64, addresses: NodeAddresses) {
        self.nodes.lock().unwrap().push(NodeRef { id });
        self.addresses.lock().unwrap().insert(id, addresses);
    }

    /// Replace one node's addresses
    pub fn set_addresses(&self, id: u64, addresses: NodeAddresses) {
        self.addresses.lock().unwrap().insert(id, addresses);
    }

    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    pub fn fail_node(&self, node_id: Option<u64>) {
        *self.fail_node.lock().unwrap() = node_id;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn address_calls(&self) -> usize {
        self.address_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeApi for FakeNodeApi {
    async fn list_cluster_nodes(&self, _cluster_id: u64, _pool_id: u64) -> Result<Vec<NodeRef>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_list.lock().unwrap() {
            return Err(Error::observe("injected list failure"));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn node_addresses(&self, node_id: u64) -> Result<NodeAddresses> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_node.lock().unwrap() == Some(node_id) {
            return Err(Error::observe(format!(
                "injected address failure for node {node_id}"
            )));
        }
        self.addresses
            .lock()
            .unwrap()
            .get(&node_id)
            .cloned()
            .ok_or_else(|| Error::observe(format!("unknown node {node_id}")))
    }

    fn provider_name(&self) -> &'static str {
        "fake-nodes"
    }
}

/// A fake ZoneApi holding a mutable record list
///
/// Creates and deletes are journaled so tests can assert exactly which
/// mutations a pass issued and in which order.
#[derive(Clone)]
pub struct FakeZoneApi {
    records: Arc<Mutex<Vec<ZoneRecord>>>,
    next_id: Arc<AtomicU64>,
    /// Targets of deleted records, in call order
    deleted: Arc<Mutex<Vec<String>>>,
    /// Create payloads, in call order
    created: Arc<Mutex<Vec<RecordCreate>>>,
    /// Fail the Nth mutation (0-based count across deletes and creates)
    fail_after_mutations: Arc<AtomicUsize>,
    mutations: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl FakeZoneApi {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1000)),
            deleted: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            fail_after_mutations: Arc::new(AtomicUsize::new(NEVER)),
            mutations: Arc::new(AtomicUsize::new(0)),
            list_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Seed a record, returning its id
    pub fn seed_record(&self, record_type: RecordType, name: &str, target: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(ZoneRecord {
            id,
            record_type,
            name: name.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Allow `n` mutations, then fail every further one
    pub fn fail_after_mutations(&self, n: usize) {
        self.fail_after_mutations.store(n, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<ZoneRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Apex targets of the given type currently in the zone, sorted
    pub fn apex_targets(&self, record_type: RecordType) -> Vec<String> {
        let mut targets: Vec<String> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_apex(record_type))
            .map(|r| r.target.clone())
            .collect();
        targets.sort();
        targets
    }

    pub fn deleted_targets(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn created_records(&self) -> Vec<RecordCreate> {
        self.created.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_mutation_allowed(&self) -> Result<()> {
        let allowed = self.fail_after_mutations.load(Ordering::SeqCst);
        if self.mutations.load(Ordering::SeqCst) >= allowed {
            return Err(Error::zone("injected mutation failure"));
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ZoneApi for FakeZoneApi {
    async fn list_zone_records(&self, _zone_id: u64) -> Result<Vec<ZoneRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_zone_record(&self, _zone_id: u64, record: &RecordCreate) -> Result<()> {
        self.check_mutation_allowed()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(ZoneRecord {
            id,
            record_type: record.record_type,
            name: record.name.clone(),
            target: record.target.clone(),
        });
        self.created.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn delete_zone_record(&self, _zone_id: u64, record_id: u64) -> Result<()> {
        self.check_mutation_allowed()?;
        let mut records = self.records.lock().unwrap();
        let position = records.iter().position(|r| r.id == record_id);
        match position {
            Some(index) => {
                let record = records.remove(index);
                self.deleted.lock().unwrap().push(record.target);
                Ok(())
            }
            None => Err(Error::zone(format!("no such record {record_id}"))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake-zone"
    }
}

/// A NodeApi whose calls never complete
///
/// Signals entry on a channel so a test knows the engine is blocked
/// inside a provider call before acting on it.
pub struct HangingNodeApi {
    entered_tx: tokio::sync::mpsc::UnboundedSender<()>,
}

impl HangingNodeApi {
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<()>) {
        let (entered_tx, entered_rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { entered_tx }, entered_rx)
    }
}

#[async_trait]
impl NodeApi for HangingNodeApi {
    async fn list_cluster_nodes(&self, _cluster_id: u64, _pool_id: u64) -> Result<Vec<NodeRef>> {
        let _ = self.entered_tx.send(());
        std::future::pending().await
    }

    async fn node_addresses(&self, _node_id: u64) -> Result<NodeAddresses> {
        let _ = self.entered_tx.send(());
        std::future::pending().await
    }

    fn provider_name(&self) -> &'static str {
        "hanging-nodes"
    }
}

/// Addresses helper: a node with public IPv4s and an optional SLAAC address
pub fn node_addresses(ipv4: &[&str], slaac: Option<(&str, bool)>) -> NodeAddresses {
    NodeAddresses {
        ipv4_public: ipv4.iter().map(|s| s.to_string()).collect(),
        ipv6_slaac: slaac.map(|(address, is_public)| zonesync_core::traits::SlaacAddress {
            address: address.to_string(),
            is_public,
        }),
    }
}
