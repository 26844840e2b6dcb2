// # zonesync-core
//
// Core library for the cluster-to-zone DNS synchronizer.
//
// ## Architecture Overview
//
// This library keeps a DNS zone's apex A/AAAA records converged on the
// public addresses of a managed cluster's nodes:
//
// - **NodeApi**: Trait for reading cluster membership and node addresses
// - **ZoneApi**: Trait for reading and mutating zone records
// - **observer**: Builds a canonical [`AddressSnapshot`] from node state
// - **reconcile**: Minimal-diff delete/create pass per address family
// - **SyncEngine**: Fixed-interval control loop with change suppression
//
// ## Design Principles
//
// 1. **One direction per cycle**: observe → snapshot → reconcile
// 2. **Minimal diff**: records whose target is already desired are never touched
// 3. **Retry by repetition**: no in-cycle retries, the polling interval is
//    the only retry mechanism
// 4. **Library-first**: the engine's tick is directly callable, so every
//    behavior is testable without timers or a network

pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod reconcile;
pub mod snapshot;
pub mod traits;

// Re-export core types for convenience
pub use config::SyncConfig;
pub use engine::{EngineEvent, SyncEngine, TickOutcome};
pub use error::{Error, Result};
pub use reconcile::ReconcileOutcome;
pub use snapshot::AddressSnapshot;
pub use traits::{NodeApi, ZoneApi};
