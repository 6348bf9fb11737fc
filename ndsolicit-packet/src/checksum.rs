//! Checksum calculations for ICMPv6
//!
//! The Internet Checksum (RFC 1071) and its ICMPv6 form, which covers an
//! IPv6 pseudo-header in addition to the message itself (RFC 4443 §2.3).

use crate::ipv6::PseudoHeader;
use ndsolicit_core::{Error, Result, IPV6_ADDR_LEN};
use std::net::Ipv6Addr;

/// Calculates the Internet Checksum as defined in RFC 1071.
///
/// The data is treated as a sequence of big-endian 16-bit words, an odd
/// trailing byte is padded with zero, the words are summed with end-around
/// carry and the one's complement of the sum is returned.
///
/// # Examples
///
/// ```
/// use ndsolicit_packet::checksum::internet_checksum;
///
/// let data = vec![0x87, 0x00, 0x00, 0x00];
/// let checksum = internet_checksum(&data);
/// assert_eq!(checksum, !0x8700);
/// ```
pub fn internet_checksum(data: &[u8]) -> u16 {
    !fold(accumulate(0, data))
}

/// Validates an Internet checksum.
///
/// Summing data that already contains its checksum yields 0 (or 0xFFFF,
/// which is the same value in one's complement).
pub fn validate_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(data);
    result == 0 || result == 0xFFFF
}

/// ICMPv6 checksum over the pseudo-header and `message`.
///
/// `message` must carry zero in its checksum field. The addresses are
/// taken as raw bytes and must be exactly 16 bytes long.
pub fn icmpv6_checksum(source: &[u8], destination: &[u8], message: &[u8]) -> Result<u16> {
    let source = address_from_slice("source", source)?;
    let destination = address_from_slice("destination", destination)?;

    let pseudo = PseudoHeader::icmpv6(source, destination, message.len() as u32);
    Ok(pseudo_header_checksum(&pseudo, message))
}

/// Checksum of `message` under an already built pseudo-header
pub fn pseudo_header_checksum(pseudo: &PseudoHeader, message: &[u8]) -> u16 {
    let sum = accumulate(0, &pseudo.to_bytes());
    // 40-byte pseudo-header keeps message words aligned
    !fold(accumulate(sum, message))
}

/// Recompute over pseudo-header + message (checksum included) and
/// check the result is zero.
pub fn verify_icmpv6(source: Ipv6Addr, destination: Ipv6Addr, message: &[u8]) -> bool {
    let pseudo = PseudoHeader::icmpv6(source, destination, message.len() as u32);
    let mut data = pseudo.to_bytes().to_vec();
    data.extend_from_slice(message);
    validate_checksum(&data)
}

fn address_from_slice(which: &'static str, bytes: &[u8]) -> Result<Ipv6Addr> {
    let octets: [u8; IPV6_ADDR_LEN] = bytes.try_into().map_err(|_| Error::ChecksumInput {
        which,
        actual: bytes.len(),
    })?;
    Ok(Ipv6Addr::from(octets))
}

fn accumulate(mut sum: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    if let Some(&byte) = chunks.remainder().first() {
        sum += (byte as u32) << 8;
    }

    sum
}

fn fold(mut sum: u32) -> u16 {
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}
