//! IPv6 Neighbor Discovery message structures (RFC 4861)

use crate::checksum::pseudo_header_checksum;
use crate::ipv6::PseudoHeader;
use bytes::{BufMut, BytesMut};
use ndsolicit_core::{Error, HardwareAddr, Result};
use std::net::Ipv6Addr;

/// Fixed part of a Neighbor Solicitation: type, code, checksum,
/// reserved and target address
pub const NS_HEADER_LEN: usize = 24;

/// Offset of the checksum field inside an ICMPv6 message
pub const CHECKSUM_OFFSET: usize = 2;

/// Largest option the 8-bit length field can describe
pub const MAX_OPTION_LEN: usize = 255 * 8;

/// ICMPv6 type of a Neighbor Solicitation
pub const ICMPV6_NEIGHBOR_SOLICITATION: u8 = 135;

/// ND option type of the Source Link-Layer Address option
pub const OPTION_SOURCE_LL_ADDR: u8 = 1;

/// ND option in type-length-value form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdpOption {
    pub option_type: u8,
    pub data: Vec<u8>,
}

impl NdpOption {
    pub fn new(option_type: u8, data: Vec<u8>) -> Self {
        Self { option_type, data }
    }

    /// Source Link-Layer Address
    pub fn source_ll_addr(addr: &HardwareAddr) -> Self {
        Self::new(OPTION_SOURCE_LL_ADDR, addr.as_bytes().to_vec())
    }

    /// Length field value, in units of 8 octets
    pub fn length_units(&self) -> usize {
        (2 + self.data.len()).div_ceil(8)
    }

    /// Encoded size in bytes, padding included
    pub fn encoded_len(&self) -> usize {
        self.length_units() * 8
    }

    /// Encode option to bytes (Type + Length + Data + zero padding)
    ///
    /// # Errors
    ///
    /// `Serialization` if the data is empty or too long for the 8-bit
    /// length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = BytesMut::with_capacity(self.encoded_len());
        self.write_to(&mut buffer)?;
        Ok(buffer.to_vec())
    }

    fn write_to(&self, buffer: &mut BytesMut) -> Result<()> {
        if self.data.is_empty() {
            return Err(Error::serialization(format!(
                "option type {} has no data",
                self.option_type
            )));
        }

        let units = self.length_units();
        if units > u8::MAX as usize {
            return Err(Error::serialization(format!(
                "option type {} data is {} bytes, at most {} fit",
                self.option_type,
                self.data.len(),
                MAX_OPTION_LEN - 2
            )));
        }

        buffer.put_u8(self.option_type);
        buffer.put_u8(units as u8);
        buffer.put_slice(&self.data);
        buffer.put_bytes(0, units * 8 - 2 - self.data.len());
        Ok(())
    }
}

/// Neighbor Solicitation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborSolicitation {
    /// Checksum as last computed; zero until [`Self::compute_checksum`]
    pub checksum: u16,
    pub target_address: Ipv6Addr,
    pub options: Vec<NdpOption>,
}

impl NeighborSolicitation {
    pub fn new(target: Ipv6Addr) -> Self {
        Self {
            checksum: 0,
            target_address: target,
            options: vec![],
        }
    }

    pub fn with_source_ll(mut self, addr: &HardwareAddr) -> Self {
        self.options.push(NdpOption::source_ll_addr(addr));
        self
    }

    /// Total ICMPv6 message length in bytes
    pub fn encoded_len(&self) -> usize {
        let options: usize = self.options.iter().map(NdpOption::encoded_len).sum();
        NS_HEADER_LEN + options
    }

    /// Compute and store the checksum for the given addresses
    pub fn compute_checksum(&mut self, source: Ipv6Addr, destination: Ipv6Addr) -> Result<u16> {
        self.checksum = 0;
        let unchecked = self.to_bytes()?;
        let pseudo = PseudoHeader::icmpv6(source, destination, unchecked.len() as u32);
        self.checksum = pseudo_header_checksum(&pseudo, &unchecked);
        Ok(self.checksum)
    }

    /// Serialize with the stored checksum
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = BytesMut::with_capacity(self.encoded_len());

        buffer.put_u8(ICMPV6_NEIGHBOR_SOLICITATION);
        buffer.put_u8(0); // Code
        buffer.put_u16(self.checksum);
        buffer.put_u32(0); // Reserved
        buffer.put_slice(&self.target_address.octets());

        for option in &self.options {
            option.write_to(&mut buffer)?;
        }

        Ok(buffer.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::verify_icmpv6;

    fn mac() -> HardwareAddr {
        HardwareAddr::from([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])
    }

    #[test]
    fn test_ethernet_option_is_one_unit() {
        let bytes = NdpOption::source_ll_addr(&mac()).to_bytes().unwrap();
        assert_eq!(bytes, vec![1, 1, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_option_padding_for_other_lengths() {
        let cases = [(1usize, 1usize), (7, 2), (8, 2), (14, 2), (15, 3), (20, 3)];
        for (hw_len, units) in cases {
            let addr = HardwareAddr::new(vec![0x11; hw_len]);
            let bytes = NdpOption::source_ll_addr(&addr).to_bytes().unwrap();
            assert_eq!(bytes[1] as usize, units, "length for {} bytes", hw_len);
            assert_eq!(bytes.len(), units * 8, "size for {} bytes", hw_len);
            assert!(bytes[2 + hw_len..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_empty_option_rejected() {
        let result = NdpOption::source_ll_addr(&HardwareAddr::empty()).to_bytes();
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_oversized_option_rejected() {
        let fits = HardwareAddr::new(vec![0x22; MAX_OPTION_LEN - 2]);
        assert_eq!(NdpOption::source_ll_addr(&fits).length_units(), 255);
        assert!(NdpOption::source_ll_addr(&fits).to_bytes().is_ok());

        let too_long = HardwareAddr::new(vec![0x22; MAX_OPTION_LEN - 1]);
        assert!(matches!(
            NdpOption::source_ll_addr(&too_long).to_bytes(),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_neighbor_solicitation_layout() {
        let target: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let ns = NeighborSolicitation::new(target).with_source_ll(&mac());

        let bytes = ns.to_bytes().unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(ns.encoded_len(), 32);
        assert_eq!(bytes[0], 135);
        assert_eq!(bytes[1], 0);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(&bytes[8..24], &target.octets());
        assert_eq!(&bytes[24..32], &[1, 1, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_compute_checksum_is_stored_and_repeatable() {
        let target: Ipv6Addr = "fe80::1".parse().unwrap();
        let source: Ipv6Addr = "fe80::2".parse().unwrap();
        let group: Ipv6Addr = "ff02::1:ff00:1".parse().unwrap();
        let mut ns = NeighborSolicitation::new(target).with_source_ll(&mac());

        let checksum = ns.compute_checksum(source, group).unwrap();
        assert_eq!(ns.checksum, checksum);

        let bytes = ns.to_bytes().unwrap();
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), checksum);
        assert!(verify_icmpv6(source, group, &bytes));

        // the stored checksum is not folded into a second computation
        assert_eq!(ns.compute_checksum(source, group).unwrap(), checksum);
    }
}
