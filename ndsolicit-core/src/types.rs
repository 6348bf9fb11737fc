//! Common types used throughout ndsolicit

use std::fmt;

/// Hop limit mandated by RFC 4861 for every Neighbor Discovery message.
///
/// Receivers drop ND packets whose hop limit is anything else, so this is
/// not a tunable.
pub const NDP_HOP_LIMIT: u8 = 255;

/// IPv6 next-header value for ICMPv6
pub const IPPROTO_ICMPV6: u8 = 58;

/// Length of an IPv6 address in bytes
pub const IPV6_ADDR_LEN: usize = 16;

/// Link-layer (hardware) address of an interface.
///
/// Usually a 6-byte Ethernet MAC, but other link types carry other
/// lengths, so the bytes are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HardwareAddr(Vec<u8>);

impl HardwareAddr {
    /// Create a hardware address from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Empty address, used for interfaces without a link layer
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Get bytes as slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<[u8; 6]> for HardwareAddr {
    fn from(mac: [u8; 6]) -> Self {
        Self(mac.to_vec())
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "none");
        }
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
