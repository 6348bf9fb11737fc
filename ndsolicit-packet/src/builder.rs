//! Neighbor Solicitation builder with a fluent API
//!
//! Ties the pieces together: solicited-node destination, message layout,
//! Source Link-Layer Address option and the pseudo-header checksum.

use crate::checksum::icmpv6_checksum;
use crate::ipv6::{solicited_node_from_slice, solicited_node_multicast};
use crate::ndp::{NeighborSolicitation, CHECKSUM_OFFSET};
use ndsolicit_core::{Error, HardwareAddr, RawSender, Result, SendContext, IPV6_ADDR_LEN};
use std::net::Ipv6Addr;
use tracing::debug;

/// A serialized solicitation and where it must go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSolicitation {
    /// ICMPv6 message bytes, checksum filled in
    pub bytes: Vec<u8>,
    pub source: Ipv6Addr,
    pub target: Ipv6Addr,
    /// Solicited-node multicast group of the target
    pub destination: Ipv6Addr,
    pub checksum: u16,
}

/// Builder for Neighbor Solicitation packets
///
/// # Examples
///
/// ```
/// use ndsolicit_core::HardwareAddr;
/// use ndsolicit_packet::NeighborSolicitationBuilder;
///
/// let built = NeighborSolicitationBuilder::new()
///     .source("2001:db8::1".parse().unwrap())
///     .target("2001:db8::abcd:ef01:2345".parse().unwrap())
///     .hardware_addr(HardwareAddr::from([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]))
///     .build()
///     .unwrap();
///
/// assert_eq!(built.destination, "ff02::1:ff01:2345".parse::<std::net::Ipv6Addr>().unwrap());
/// assert_eq!(built.bytes.len(), 32);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NeighborSolicitationBuilder {
    source: Option<Ipv6Addr>,
    target: Option<Ipv6Addr>,
    hardware_addr: Option<HardwareAddr>,
}

impl NeighborSolicitationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source address used in the pseudo-header and on the wire
    pub fn source(mut self, source: Ipv6Addr) -> Self {
        self.source = Some(source);
        self
    }

    /// Address being resolved
    pub fn target(mut self, target: Ipv6Addr) -> Self {
        self.target = Some(target);
        self
    }

    /// Link-layer address advertised in the Source Link-Layer option
    pub fn hardware_addr(mut self, addr: HardwareAddr) -> Self {
        self.hardware_addr = Some(addr);
        self
    }

    /// Build the packet
    ///
    /// # Errors
    ///
    /// `Serialization` if a field is missing or the hardware address is
    /// empty or too long for the option length field.
    pub fn build(self) -> Result<BuiltSolicitation> {
        let source = self
            .source
            .ok_or_else(|| Error::serialization("Neighbor Solicitation needs a source address"))?;
        let target = self
            .target
            .ok_or_else(|| Error::serialization("Neighbor Solicitation needs a target address"))?;
        let hardware_addr = self.hardware_addr.ok_or_else(|| {
            Error::serialization("Neighbor Solicitation needs a source hardware address")
        })?;
        if hardware_addr.is_empty() {
            return Err(Error::serialization(format!(
                "Cannot solicit {} from {}: source hardware address is empty",
                target, source
            )));
        }

        let destination = solicited_node_multicast(target);
        let mut ns = NeighborSolicitation::new(target).with_source_ll(&hardware_addr);
        let checksum = ns.compute_checksum(source, destination)?;

        Ok(BuiltSolicitation {
            bytes: ns.to_bytes()?,
            source,
            target,
            destination,
            checksum,
        })
    }

    /// Build the packet and hand it to `sender` for one transmission on
    /// the given interface.
    pub fn send<S: RawSender + ?Sized>(
        self,
        sender: &mut S,
        interface: &str,
        interface_index: u32,
    ) -> Result<BuiltSolicitation> {
        let built = self.build()?;
        let ctx = SendContext::new(interface, interface_index, built.source, built.destination);

        debug!(
            interface = interface,
            source = %built.source,
            destination = %built.destination,
            bytes = built.bytes.len(),
            checksum = built.checksum,
            "Sending Neighbor Solicitation"
        );

        sender.send(&built.bytes, &ctx)?;

        debug!(
            "Sent Neighbor Solicitation for {} to {} (source {})",
            built.target, built.destination, built.source
        );
        Ok(built)
    }
}

/// Build a solicitation from raw address bytes.
///
/// # Errors
///
/// `InvalidAddressLength` if `target` is not 16 bytes, `ChecksumInput` if
/// `source` is not 16 bytes, `Serialization` for a bad hardware address.
pub fn build_from_octets(source: &[u8], target: &[u8], hardware_addr: &[u8]) -> Result<Vec<u8>> {
    let destination = solicited_node_from_slice(target)?;
    if hardware_addr.is_empty() {
        return Err(Error::serialization("source hardware address is empty"));
    }

    let mut target_octets = [0u8; IPV6_ADDR_LEN];
    target_octets.copy_from_slice(target);
    let ns = NeighborSolicitation::new(Ipv6Addr::from(target_octets))
        .with_source_ll(&HardwareAddr::new(hardware_addr));

    let mut bytes = ns.to_bytes()?;
    let checksum = icmpv6_checksum(source, &destination.octets(), &bytes)?;
    bytes[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&checksum.to_be_bytes());
    Ok(bytes)
}
