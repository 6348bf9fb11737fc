//! Error types for ndsolicit

use std::io;
use std::net::Ipv6Addr;
use thiserror::Error;

/// Result type alias for ndsolicit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ndsolicit
#[derive(Error, Debug)]
pub enum Error {
    /// An address slice did not hold exactly 16 bytes
    #[error("Invalid IPv6 address length: expected {expected} bytes, got {actual}")]
    InvalidAddressLength { expected: usize, actual: usize },

    /// The NDP message could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pseudo-header input was not a 16-byte address
    #[error("Checksum input error: {which} address is {actual} bytes, expected 16")]
    ChecksumInput { which: &'static str, actual: usize },

    /// Raw socket creation refused by the OS
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// The single outbound write failed
    #[error("Failed to send NS from {src} to {dst} on '{interface}': {error}")]
    SendFailure {
        interface: String,
        src: Ipv6Addr,
        dst: Ipv6Addr,
        #[source]
        error: io::Error,
    },

    /// Missing or invalid user input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Interface address or route lookup failure
    #[error("Discovery error: {0}")]
    Discovery(String),
}

impl Error {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a discovery error with a custom message
    pub fn discovery<S: Into<String>>(msg: S) -> Self {
        Error::Discovery(msg.into())
    }

    /// Create a serialization error with a custom message
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Error::Serialization(msg.into())
    }

    /// Whether this error must stop the run before any packet is sent.
    ///
    /// Send-time failures (`PermissionDenied`, `SendFailure`, packet
    /// encoding) are scoped to a single source address.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::Discovery(_) | Error::InterfaceNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_failure_mentions_context() {
        let err = Error::SendFailure {
            interface: "eth0".to_string(),
            src: "2001:db8::1".parse().unwrap(),
            dst: "ff02::1:ff00:1".parse().unwrap(),
            error: io::Error::other("network unreachable"),
        };
        let msg = err.to_string();
        assert!(msg.contains("eth0"));
        assert!(msg.contains("2001:db8::1"));
        assert!(msg.contains("ff02::1:ff00:1"));
        assert!(msg.contains("network unreachable"));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::configuration("missing --iface").is_precondition());
        assert!(Error::discovery("no default route").is_precondition());
        assert!(Error::InterfaceNotFound("eth9".into()).is_precondition());
        assert!(!Error::PermissionDenied("raw socket".into()).is_precondition());
        assert!(!Error::serialization("empty hardware address").is_precondition());
    }
}
