//! IPv6 addressing helpers: solicited-node multicast and the checksum
//! pseudo-header

use bytes::{BufMut, BytesMut};
use ndsolicit_core::{Error, Result, IPPROTO_ICMPV6, IPV6_ADDR_LEN};
use std::net::Ipv6Addr;

/// Solicited-node multicast prefix (ff02::1:ff00:0/104)
pub const SOLICITED_NODE_PREFIX: [u8; 13] = [
    0xFF, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xFF,
];

/// Size of the IPv6 pseudo-header in bytes
pub const PSEUDO_HEADER_LEN: usize = 40;

/// Solicited-node multicast group of `target`: the fixed prefix followed
/// by the low 24 bits of the unicast address.
pub fn solicited_node_multicast(target: Ipv6Addr) -> Ipv6Addr {
    let target = target.octets();
    let mut group = [0u8; IPV6_ADDR_LEN];
    group[..13].copy_from_slice(&SOLICITED_NODE_PREFIX);
    group[13..].copy_from_slice(&target[13..]);
    Ipv6Addr::from(group)
}

/// [`solicited_node_multicast`] over raw bytes.
///
/// # Errors
///
/// `InvalidAddressLength` unless `target` is exactly 16 bytes.
pub fn solicited_node_from_slice(target: &[u8]) -> Result<Ipv6Addr> {
    if target.len() != IPV6_ADDR_LEN {
        return Err(Error::InvalidAddressLength {
            expected: IPV6_ADDR_LEN,
            actual: target.len(),
        });
    }

    let mut octets = [0u8; IPV6_ADDR_LEN];
    octets.copy_from_slice(target);
    Ok(solicited_node_multicast(Ipv6Addr::from(octets)))
}

/// Whether `addr` lies in ff02::1:ff00:0/104
pub fn is_solicited_node(addr: &Ipv6Addr) -> bool {
    addr.octets()[..13] == SOLICITED_NODE_PREFIX
}

/// IPv6 pseudo-header (RFC 8200 §8.1), used only for checksums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoHeader {
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
    pub upper_layer_length: u32,
    pub next_header: u8,
}

impl PseudoHeader {
    /// Pseudo-header for an ICMPv6 message of `length` bytes
    pub fn icmpv6(source: Ipv6Addr, destination: Ipv6Addr, length: u32) -> Self {
        Self {
            source,
            destination,
            upper_layer_length: length,
            next_header: IPPROTO_ICMPV6,
        }
    }

    pub fn to_bytes(&self) -> [u8; PSEUDO_HEADER_LEN] {
        let mut buffer = BytesMut::with_capacity(PSEUDO_HEADER_LEN);

        buffer.put_slice(&self.source.octets());
        buffer.put_slice(&self.destination.octets());
        buffer.put_u32(self.upper_layer_length);
        // Three zero bytes, then next header
        buffer.put_bytes(0, 3);
        buffer.put_u8(self.next_header);

        let mut bytes = [0u8; PSEUDO_HEADER_LEN];
        bytes.copy_from_slice(&buffer);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solicited_node_scenario() {
        let target: Ipv6Addr = "2001:db8::abcd:ef01:2345".parse().unwrap();
        assert_eq!(
            solicited_node_multicast(target),
            "ff02::1:ff01:2345".parse::<Ipv6Addr>().unwrap()
        );
    }

    #[test]
    fn test_solicited_node_loopback_boundary() {
        assert_eq!(
            solicited_node_multicast(Ipv6Addr::LOCALHOST),
            "ff02::1:ff00:0001".parse::<Ipv6Addr>().unwrap()
        );
    }

    #[test]
    fn test_solicited_node_prefix_and_suffix() {
        let targets = [
            Ipv6Addr::UNSPECIFIED,
            "fe80::a8bb:ccff:fedd:eeff".parse().unwrap(),
            "2001:db8:ffff:ffff:ffff:ffff:ffff:ffff".parse().unwrap(),
            "fd00::12:3456".parse().unwrap(),
        ];
        for target in targets {
            let group = solicited_node_multicast(target).octets();
            assert_eq!(&group[..13], &SOLICITED_NODE_PREFIX, "{}", target);
            assert_eq!(&group[13..], &target.octets()[13..], "{}", target);
            assert!(is_solicited_node(&Ipv6Addr::from(group)));
        }
    }

    #[test]
    fn test_solicited_node_from_slice() {
        let target = "2001:db8::1".parse::<Ipv6Addr>().unwrap().octets();
        assert_eq!(
            solicited_node_from_slice(&target).unwrap(),
            "ff02::1:ff00:1".parse::<Ipv6Addr>().unwrap()
        );
    }

    #[test]
    fn test_solicited_node_from_slice_wrong_length() {
        for len in [0usize, 4, 15, 17] {
            let bytes = vec![0u8; len];
            match solicited_node_from_slice(&bytes) {
                Err(Error::InvalidAddressLength { expected, actual }) => {
                    assert_eq!(expected, 16);
                    assert_eq!(actual, len);
                }
                other => panic!("expected InvalidAddressLength, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_pseudo_header_layout() {
        let src: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let dst: Ipv6Addr = "ff02::1:ff00:2".parse().unwrap();
        let bytes = PseudoHeader::icmpv6(src, dst, 32).to_bytes();

        assert_eq!(&bytes[0..16], &src.octets());
        assert_eq!(&bytes[16..32], &dst.octets());
        assert_eq!(&bytes[32..36], &[0, 0, 0, 32]);
        assert_eq!(&bytes[36..40], &[0, 0, 0, 58]);
    }
}
