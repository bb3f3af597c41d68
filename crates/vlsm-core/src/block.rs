// ── CIDR block value type ──

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::addr::{self, MAX_PREFIX};
use crate::error::CoreError;
use crate::sizing;

/// A normalized IPv4 block: network address plus prefix length.
///
/// Construction always clears host bits, so `192.168.1.5/24` and
/// `192.168.1.0/24` produce the same block. Input is corrected, never
/// rejected, for having host bits set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Block {
    network: u32,
    prefix: u8,
}

impl Block {
    /// Build a block, masking `address` down to its network address.
    pub fn new(address: u32, prefix: u8) -> Self {
        let prefix = prefix.min(MAX_PREFIX);
        Self {
            network: address & addr::mask_from_prefix(prefix),
            prefix,
        }
    }

    pub fn network(&self) -> u32 {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> u32 {
        addr::mask_from_prefix(self.prefix)
    }

    pub fn wildcard(&self) -> u32 {
        addr::wildcard_from_prefix(self.prefix)
    }

    /// Last address of the block (all host bits set).
    pub fn broadcast(&self) -> u32 {
        self.network | self.wildcard()
    }

    /// Total addresses in the block; a /0 holds 2^32.
    pub fn capacity(&self) -> u64 {
        u64::from(self.broadcast()) - u64::from(self.network) + 1
    }

    pub fn usable_hosts(&self) -> u64 {
        sizing::usable_hosts(self.capacity())
    }

    /// First assignable address, or the network address when none exist.
    pub fn first_usable(&self) -> u32 {
        if self.usable_hosts() > 0 {
            self.network + 1
        } else {
            self.network
        }
    }

    /// Last assignable address, or the network address when none exist.
    pub fn last_usable(&self) -> u32 {
        if self.usable_hosts() > 0 {
            self.broadcast() - 1
        } else {
            self.network
        }
    }

    /// Whether `address` lies inside `[network, broadcast]`.
    pub fn contains(&self, address: u32) -> bool {
        address & self.mask() == self.network
    }
}

impl FromStr for Block {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, prefix) = addr::parse_cidr(s)?;
        Ok(Self::new(address, prefix))
    }
}

impl TryFrom<String> for Block {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Block> for String {
    fn from(block: Block) -> Self {
        block.to_string()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.network), self.prefix)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn host_bits_are_cleared() {
        let block: Block = "192.168.1.5/24".parse().unwrap();
        assert_eq!(addr::format_address(block.network()), "192.168.1.0");
        assert_eq!(block.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn slash_24_details() {
        let block: Block = "10.1.2.0/24".parse().unwrap();
        assert_eq!(addr::format_address(block.broadcast()), "10.1.2.255");
        assert_eq!(block.capacity(), 256);
        assert_eq!(block.usable_hosts(), 254);
        assert_eq!(addr::format_address(block.first_usable()), "10.1.2.1");
        assert_eq!(addr::format_address(block.last_usable()), "10.1.2.254");
    }

    #[test]
    fn whole_address_space() {
        let block: Block = "8.8.8.8/0".parse().unwrap();
        assert_eq!(block.network(), 0);
        assert_eq!(block.broadcast(), u32::MAX);
        assert_eq!(block.capacity(), 1 << 32);
    }

    #[test]
    fn tiny_blocks_have_no_usable_hosts() {
        let host: Block = "10.0.0.7/32".parse().unwrap();
        assert_eq!(host.capacity(), 1);
        assert_eq!(host.usable_hosts(), 0);
        assert_eq!(host.first_usable(), host.network());
        assert_eq!(host.last_usable(), host.network());

        let p2p: Block = "10.0.0.7/31".parse().unwrap();
        assert_eq!(addr::format_address(p2p.network()), "10.0.0.6");
        assert_eq!(p2p.capacity(), 2);
        assert_eq!(p2p.usable_hosts(), 0);
        assert_eq!(p2p.last_usable(), p2p.network());
    }

    #[test]
    fn contains_checks_the_range() {
        let block: Block = "172.16.0.0/12".parse().unwrap();
        assert!(block.contains(addr::parse_address("172.31.255.255").unwrap()));
        assert!(!block.contains(addr::parse_address("172.32.0.0").unwrap()));
    }

    #[test]
    fn serde_uses_cidr_text() {
        let block: Block = serde_json::from_str("\"10.0.0.9/8\"").unwrap();
        assert_eq!(serde_json::to_string(&block).unwrap(), "\"10.0.0.0/8\"");
        assert!(serde_json::from_str::<Block>("\"10.0.0.0\"").is_err());
    }
}
