//! Zone reconciler
//!
//! Computes and applies the minimal set of record deletions and
//! creations needed to make the zone's apex address records match a
//! desired snapshot. Records of other types or other names are never
//! touched.
//!
//! ## Guarantees
//!
//! - Deletions run before creations within a family, so an address that
//!   moves between records is never transiently duplicated.
//! - Addresses already correctly represented are not touched at all;
//!   running the same pass twice issues zero mutations the second time.
//! - A failed provider call aborts the remaining operations and is
//!   surfaced as-is. Partially applied state is accepted; the next
//!   cycle's pass completes convergence.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::Result;
use crate::snapshot::AddressSnapshot;
use crate::traits::{RecordCreate, RecordType, ZoneApi, ZoneRecord};

/// Mutation counts from one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    /// Records deleted across both families
    pub deleted: usize,
    /// Records created across both families
    pub created: usize,
}

impl ReconcileOutcome {
    /// Whether the pass issued no mutations at all
    pub fn is_noop(&self) -> bool {
        self.deleted == 0 && self.created == 0
    }
}

/// Converge the zone's apex address records on the desired snapshot
///
/// Lists the zone once, then runs the two-phase diff independently for
/// A/IPv4 and AAAA/IPv6.
pub async fn reconcile(
    api: &dyn ZoneApi,
    zone_id: u64,
    desired: &AddressSnapshot,
) -> Result<ReconcileOutcome> {
    let records = api.list_zone_records(zone_id).await?;
    debug!(zone_id, records = records.len(), "listed zone records");

    let mut outcome = ReconcileOutcome::default();
    reconcile_family(api, zone_id, RecordType::A, desired.ipv4(), &records, &mut outcome).await?;
    reconcile_family(api, zone_id, RecordType::Aaaa, desired.ipv6(), &records, &mut outcome)
        .await?;

    if outcome.is_noop() {
        debug!(zone_id, "zone already converged");
    } else {
        info!(
            zone_id,
            deleted = outcome.deleted,
            created = outcome.created,
            "zone reconciled"
        );
    }
    Ok(outcome)
}

/// One diff-and-apply pass for a single address family
///
/// Phase one walks the apex candidates of the matching type: targets
/// not in the desired set are deleted, the rest are marked as already
/// present. Phase two creates a record for each desired address not
/// marked present.
async fn reconcile_family(
    api: &dyn ZoneApi,
    zone_id: u64,
    record_type: RecordType,
    desired: &[String],
    records: &[ZoneRecord],
    outcome: &mut ReconcileOutcome,
) -> Result<()> {
    let goal: HashSet<&str> = desired.iter().map(String::as_str).collect();
    let mut existing: HashSet<&str> = HashSet::new();

    for record in records.iter().filter(|r| r.is_apex(record_type)) {
        if goal.contains(record.target.as_str()) {
            existing.insert(record.target.as_str());
        } else {
            debug!(
                zone_id,
                record_id = record.id,
                target = %record.target,
                ?record_type,
                "deleting stale record"
            );
            api.delete_zone_record(zone_id, record.id).await?;
            outcome.deleted += 1;
        }
    }

    for target in desired {
        if !existing.contains(target.as_str()) {
            debug!(zone_id, target = %target, ?record_type, "creating record");
            let create = RecordCreate::apex(record_type, target.clone());
            api.create_zone_record(zone_id, &create).await?;
            outcome.created += 1;
        }
    }

    Ok(())
}
