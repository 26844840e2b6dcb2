//! Core traits for the synchronizer
//!
//! This module defines the abstract provider interfaces the control
//! loop consumes. Production code binds them to a real cloud client;
//! tests bind them to in-memory fakes.
//!
//! - [`NodeApi`]: Read cluster membership and node addresses
//! - [`ZoneApi`]: Read and mutate zone records

pub mod node_api;
pub mod zone_api;

pub use node_api::{NodeAddresses, NodeApi, NodeRef, SlaacAddress};
pub use zone_api::{RecordCreate, RecordType, ZoneApi, ZoneRecord};
