// ── Allocation domain model ──
//
// Input requirements and the immutable output records. Field names
// serialize in camelCase and addresses as dotted-decimal strings, which
// is the shape of the exported JSON document.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::addr;
use crate::error::CoreError;
use crate::sizing;

// ── SubnetRequirement ───────────────────────────────────────────────

/// A named request for a number of usable hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetRequirement {
    /// Display label; not required to be unique.
    pub name: String,
    /// Usable hosts needed. Zero means "no request" and is skipped.
    #[serde(alias = "hosts")]
    pub host_count: u32,
}

impl SubnetRequirement {
    pub fn new(name: impl Into<String>, host_count: u32) -> Self {
        Self {
            name: name.into(),
            host_count,
        }
    }
}

// ── AllocatedSubnet ─────────────────────────────────────────────────

/// One placed subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedSubnet {
    pub name: String,
    pub needed_hosts: u32,
    pub prefix_length: u8,
    pub block_size: u64,
    pub network_address: Ipv4Addr,
    pub broadcast_address: Ipv4Addr,
    pub usable_hosts: u64,
    pub first_usable: Ipv4Addr,
    pub last_usable: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    /// Network/broadcast overhead plus unused host slots.
    pub wasted_addresses: u64,
}

impl AllocatedSubnet {
    /// Derive every field for a block of `prefix` starting at `network`.
    ///
    /// `network` is the allocation cursor and is taken as-is; the caller
    /// guarantees the block ends inside 32-bit space.
    pub(crate) fn place(requirement: &SubnetRequirement, network: u32, prefix: u8) -> Self {
        let block_size = sizing::block_size(prefix);
        let usable_hosts = sizing::usable_hosts(block_size);
        let broadcast = network.saturating_add(host_span(block_size));

        let (first, last) = if usable_hosts > 0 {
            (network + 1, broadcast - 1)
        } else {
            (network, network)
        };

        Self {
            name: requirement.name.clone(),
            needed_hosts: requirement.host_count,
            prefix_length: prefix,
            block_size,
            network_address: Ipv4Addr::from(network),
            broadcast_address: Ipv4Addr::from(broadcast),
            usable_hosts,
            first_usable: Ipv4Addr::from(first),
            last_usable: Ipv4Addr::from(last),
            subnet_mask: Ipv4Addr::from(addr::mask_from_prefix(prefix)),
            wildcard_mask: Ipv4Addr::from(addr::wildcard_from_prefix(prefix)),
            wasted_addresses: block_size - u64::from(requirement.host_count),
        }
    }

    pub fn network(&self) -> u32 {
        u32::from(self.network_address)
    }

    pub fn broadcast(&self) -> u32 {
        u32::from(self.broadcast_address)
    }

    /// `network/prefix` notation for this subnet.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network_address, self.prefix_length)
    }
}

/// `block_size - 1` narrowed to 32 bits (a /0 spans `u32::MAX`).
fn host_span(block_size: u64) -> u32 {
    u32::try_from(block_size.saturating_sub(1)).unwrap_or(u32::MAX)
}

// ── AllocationResult ────────────────────────────────────────────────

/// Aggregate outcome of one allocation run.
///
/// `error` is set exactly when the run failed; the other fields are then
/// zero and `subnets` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Placed subnets in allocation order (largest first).
    pub subnets: Vec<AllocatedSubnet>,
    pub total_needed: u64,
    pub total_allocated: u64,
    pub utilization_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AllocationResult {
    /// A failed run carrying only the error message.
    pub fn failed(error: &CoreError) -> Self {
        Self {
            subnets: Vec::new(),
            total_needed: 0,
            total_allocated: 0,
            utilization_pct: 0.0,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ip(s: &str) -> u32 {
        addr::parse_address(s).unwrap()
    }

    #[test]
    fn requirement_accepts_hosts_alias() {
        let req: SubnetRequirement = serde_json::from_str(r#"{"name":"Lab","hosts":12}"#).unwrap();
        assert_eq!(req, SubnetRequirement::new("Lab", 12));

        let req: SubnetRequirement =
            serde_json::from_str(r#"{"name":"Lab","hostCount":12}"#).unwrap();
        assert_eq!(req.host_count, 12);
    }

    #[test]
    fn place_derives_every_field() {
        let subnet = AllocatedSubnet::place(
            &SubnetRequirement::new("C", 10),
            ip("192.168.0.192"),
            28,
        );

        insta::assert_json_snapshot!(subnet, @r#"
        {
          "name": "C",
          "neededHosts": 10,
          "prefixLength": 28,
          "blockSize": 16,
          "networkAddress": "192.168.0.192",
          "broadcastAddress": "192.168.0.207",
          "usableHosts": 14,
          "firstUsable": "192.168.0.193",
          "lastUsable": "192.168.0.206",
          "subnetMask": "255.255.255.240",
          "wildcardMask": "0.0.0.15",
          "wastedAddresses": 6
        }
        "#);
    }

    #[test]
    fn place_host_route() {
        let subnet = AllocatedSubnet::place(&SubnetRequirement::new("lo", 0), ip("10.0.0.9"), 32);
        assert_eq!(subnet.block_size, 1);
        assert_eq!(subnet.usable_hosts, 0);
        assert_eq!(subnet.broadcast_address, subnet.network_address);
        assert_eq!(subnet.first_usable, subnet.network_address);
        assert_eq!(subnet.last_usable, subnet.network_address);
        assert_eq!(subnet.cidr(), "10.0.0.9/32");
    }

    #[test]
    fn place_whole_space() {
        let subnet =
            AllocatedSubnet::place(&SubnetRequirement::new("all", u32::MAX - 1), 0, 0);
        assert_eq!(subnet.block_size, 1 << 32);
        assert_eq!(subnet.broadcast(), u32::MAX);
        assert_eq!(subnet.last_usable, Ipv4Addr::new(255, 255, 255, 254));
        assert_eq!(subnet.wasted_addresses, 2);
    }

    #[test]
    fn failed_result_is_zeroed() {
        let err = CoreError::CapacityExceeded {
            parent: "10.0.0.0/30".into(),
            name: "X".into(),
            hosts: 10,
        };
        let result = AllocationResult::failed(&err);
        assert!(!result.is_ok());
        assert!(result.subnets.is_empty());
        assert_eq!(result.total_needed, 0);
        assert_eq!(result.total_allocated, 0);
        assert!(result.utilization_pct.abs() < f64::EPSILON);
        assert_eq!(result.error.as_deref(), Some(err.to_string().as_str()));
    }

    #[test]
    fn error_field_omitted_on_success() {
        let result = AllocationResult {
            subnets: Vec::new(),
            total_needed: 0,
            total_allocated: 0,
            utilization_pct: 0.0,
            error: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("utilizationPct").is_some());
    }
}
