//! ndsolicit Core Library
//!
//! This crate provides the error type, shared types, interface and
//! gateway lookup, and the raw ICMPv6 transport used to emit IPv6
//! Neighbor Solicitations.

pub mod config;
pub mod error;
pub mod interface;
pub mod route;
pub mod sender;
pub mod socket;
pub mod types;

// Re-export commonly used types
pub use config::SendOptions;
pub use error::{Error, Result};
pub use interface::{Interface, InterfaceSource, StaticInterfaces, SystemInterfaces};
pub use route::{ProcRouteTable, RouteTable, StaticRoute};
pub use sender::{MemorySender, RawSender, SendContext, SentPacket};
pub use socket::Icmpv6Sender;
pub use types::*;
