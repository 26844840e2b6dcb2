//! Canonical address snapshots
//!
//! A snapshot is the observed desired state for one cycle: every public
//! IPv4 and IPv6 address belonging to the cluster's nodes, deduplicated
//! and sorted so that two snapshots covering the same address set are
//! byte-for-byte comparable after serialization.

/// A canonical, immutable set of observed public addresses
///
/// Construction always sorts and dedups both sequences; there is no way
/// to build a non-canonical snapshot. A snapshot is produced fresh each
/// cycle by the observer and superseded by the next cycle's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressSnapshot {
    ipv4: Vec<String>,
    ipv6: Vec<String>,
}

impl AddressSnapshot {
    /// Build a canonical snapshot from raw observed addresses
    pub fn new(mut ipv4: Vec<String>, mut ipv6: Vec<String>) -> Self {
        ipv4.sort();
        ipv4.dedup();
        ipv6.sort();
        ipv6.dedup();
        Self { ipv4, ipv6 }
    }

    /// Observed public IPv4 addresses, sorted and deduplicated
    pub fn ipv4(&self) -> &[String] {
        &self.ipv4
    }

    /// Observed public IPv6 addresses, sorted and deduplicated
    pub fn ipv6(&self) -> &[String] {
        &self.ipv6
    }

    /// Cheap string digest for change detection between cycles
    ///
    /// Both families joined by commas with a comma separating them.
    /// Identical address sets always fingerprint identically because
    /// snapshots are canonical by construction. The loop compares this
    /// against the last applied fingerprint to suppress redundant
    /// reconciliation passes.
    pub fn fingerprint(&self) -> String {
        format!("{},{}", self.ipv4.join(","), self.ipv6.join(","))
    }

    /// Whether the snapshot holds no addresses at all
    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_sorts_and_dedups() {
        let snapshot = AddressSnapshot::new(
            vec![
                "9.9.9.9".to_string(),
                "1.1.1.1".to_string(),
                "9.9.9.9".to_string(),
            ],
            vec!["2001:db8::2".to_string(), "2001:db8::1".to_string()],
        );

        assert_eq!(snapshot.ipv4(), ["1.1.1.1", "9.9.9.9"]);
        assert_eq!(snapshot.ipv6(), ["2001:db8::1", "2001:db8::2"]);
    }

    #[test]
    fn same_addresses_fingerprint_identically() {
        let a = AddressSnapshot::new(
            vec!["2.2.2.2".to_string(), "1.1.1.1".to_string()],
            vec!["2001:db8::1".to_string()],
        );
        let b = AddressSnapshot::new(
            vec!["1.1.1.1".to_string(), "2.2.2.2".to_string(), "1.1.1.1".to_string()],
            vec!["2001:db8::1".to_string()],
        );

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), "1.1.1.1,2.2.2.2,2001:db8::1");
    }

    #[test]
    fn empty_snapshot_fingerprint_is_not_the_sentinel() {
        // The loop's "never reconciled" sentinel is the empty string;
        // an observed-empty snapshot must still differ from it so the
        // first cycle reconciles even when the cluster has no nodes.
        let empty = AddressSnapshot::default();
        assert_eq!(empty.fingerprint(), ",");
        assert!(!empty.fingerprint().is_empty());
    }
}
