//! Neighbor Solicitation construction for ndsolicit
//!
//! This crate builds the ICMPv6 payload of an IPv6 Neighbor Solicitation
//! (RFC 4861 §4.3). The IPv6 header itself is left to the kernel raw
//! socket, so only the pseudo-header is modelled here.
//!
//! - [`ipv6`] - solicited-node multicast derivation and the pseudo-header
//! - [`checksum`] - Internet checksum and the ICMPv6 pseudo-header checksum
//! - [`ndp`] - Neighbor Solicitation and ND option encoding
//! - [`builder`] - fluent builder that produces (and optionally sends) a packet
//!
//! # Quick Start
//!
//! ```rust
//! use ndsolicit_core::{HardwareAddr, MemorySender};
//! use ndsolicit_packet::NeighborSolicitationBuilder;
//!
//! let mut sender = MemorySender::new();
//! NeighborSolicitationBuilder::new()
//!     .source("fe80::1".parse().unwrap())
//!     .target("fe80::2".parse().unwrap())
//!     .hardware_addr(HardwareAddr::from([0x02, 0, 0, 0, 0, 0x01]))
//!     .send(&mut sender, "eth0", 2)
//!     .unwrap();
//!
//! assert_eq!(sender.sent().len(), 1);
//! ```

pub mod builder;
pub mod checksum;
pub mod ipv6;
pub mod ndp;

// Re-export commonly used types for convenience
pub use builder::{build_from_octets, BuiltSolicitation, NeighborSolicitationBuilder};
pub use checksum::{icmpv6_checksum, internet_checksum, validate_checksum};
pub use ipv6::{solicited_node_from_slice, solicited_node_multicast, PseudoHeader};
pub use ndp::{NdpOption, NeighborSolicitation};
