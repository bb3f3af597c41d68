// ── Minimal-prefix sizing ──
//
// Every block reserves its network and broadcast addresses, so a request
// for `n` hosts needs a power-of-two block of at least `n + 2` addresses.
// The /31 point-to-point and /32 host-route conventions are not applied:
// blocks of one or two addresses have zero usable hosts.

use crate::addr::MAX_PREFIX;

/// Addresses consumed by the network and broadcast identifiers.
const RESERVED_ADDRESSES: u64 = 2;

/// Smallest prefix whose block holds `host_count` usable hosts.
///
/// Returns `Some(32)` for zero hosts and `None` when no IPv4 block is
/// large enough (more than 2^32 - 2 hosts).
pub fn minimal_prefix(host_count: u32) -> Option<u8> {
    if host_count == 0 {
        return Some(MAX_PREFIX);
    }

    let needed = u64::from(host_count) + RESERVED_ADDRESSES;
    (0..=MAX_PREFIX)
        .rev()
        .find(|&prefix| block_size(prefix) >= needed)
}

/// Number of addresses in a block with the given prefix (`2^(32 - prefix)`).
pub fn block_size(prefix: u8) -> u64 {
    1_u64 << (MAX_PREFIX - prefix.min(MAX_PREFIX))
}

/// Usable hosts in a block: everything except network and broadcast.
pub fn usable_hosts(block_size: u64) -> u64 {
    block_size.saturating_sub(RESERVED_ADDRESSES)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_hosts_is_a_host_route() {
        assert_eq!(minimal_prefix(0), Some(32));
    }

    #[test]
    fn reserves_network_and_broadcast() {
        assert_eq!(minimal_prefix(1), Some(30));
        assert_eq!(minimal_prefix(2), Some(30));
        assert_eq!(minimal_prefix(3), Some(29));
        assert_eq!(minimal_prefix(6), Some(29));
        assert_eq!(minimal_prefix(10), Some(28));
        assert_eq!(minimal_prefix(50), Some(26));
        assert_eq!(minimal_prefix(100), Some(25));
        assert_eq!(minimal_prefix(126), Some(25));
        assert_eq!(minimal_prefix(127), Some(24));
        assert_eq!(minimal_prefix(254), Some(24));
        assert_eq!(minimal_prefix(255), Some(23));
    }

    #[test]
    fn largest_requests() {
        assert_eq!(minimal_prefix(u32::MAX - 1), Some(0));
        assert_eq!(minimal_prefix(u32::MAX), None);
        assert_eq!(minimal_prefix((1 << 31) - 2), Some(1));
        assert_eq!(minimal_prefix((1 << 31) - 1), Some(0));
    }

    #[test]
    fn prefix_never_grows_as_hosts_increase() {
        // Every count below u32::MAX fits somewhere, so each lookup is Some.
        let mut previous = minimal_prefix(0).unwrap();
        let counts = (1..5_000).chain((5_000..u32::MAX).step_by(9_999_991));
        for hosts in counts {
            let current = minimal_prefix(hosts).unwrap();
            assert!(current <= previous, "{hosts} hosts: /{current} > /{previous}");
            previous = current;
        }
    }

    #[test]
    fn chosen_block_is_the_smallest_that_fits() {
        for hosts in 1..2_000_u32 {
            let prefix = minimal_prefix(hosts).unwrap_or_default();
            let needed = u64::from(hosts) + 2;
            assert!(block_size(prefix) >= needed);
            assert!(block_size(prefix + 1) < needed, "{hosts} hosts fit in /{}", prefix + 1);
        }
    }

    #[test]
    fn block_sizes() {
        assert_eq!(block_size(32), 1);
        assert_eq!(block_size(31), 2);
        assert_eq!(block_size(24), 256);
        assert_eq!(block_size(0), 1 << 32);
    }

    #[test]
    fn usable_hosts_never_negative() {
        assert_eq!(usable_hosts(1), 0);
        assert_eq!(usable_hosts(2), 0);
        assert_eq!(usable_hosts(4), 2);
        assert_eq!(usable_hosts(256), 254);
    }
}
