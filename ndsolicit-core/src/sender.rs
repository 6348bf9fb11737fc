//! Raw sender capability and its in-memory implementation

use crate::{Error, Result, NDP_HOP_LIMIT};
use std::io;
use std::net::Ipv6Addr;

/// Metadata consumed by one outbound write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendContext {
    /// Interface name, for diagnostics and device binding
    pub interface: String,
    /// Outgoing interface index, carried in the packet-info control message
    pub interface_index: u32,
    /// Source address, carried in the packet-info control message
    pub source: Ipv6Addr,
    /// Solicited-node multicast destination
    pub destination: Ipv6Addr,
    hop_limit: u8,
}

impl SendContext {
    pub fn new(
        interface: impl Into<String>,
        interface_index: u32,
        source: Ipv6Addr,
        destination: Ipv6Addr,
    ) -> Self {
        Self {
            interface: interface.into(),
            interface_index,
            source,
            destination,
            hop_limit: NDP_HOP_LIMIT,
        }
    }

    /// Always [`NDP_HOP_LIMIT`]
    pub fn hop_limit(&self) -> u8 {
        self.hop_limit
    }

    /// Wrap a transport error with this context
    pub fn send_failure(&self, error: io::Error) -> Error {
        Error::SendFailure {
            interface: self.interface.clone(),
            src: self.source,
            dst: self.destination,
            error,
        }
    }
}

/// Capability to put one serialized ICMPv6 message on the wire.
///
/// Implementations make a single attempt per call and release any OS
/// resources before returning.
pub trait RawSender {
    /// Send `packet` as described by `ctx`, returning the bytes written
    fn send(&mut self, packet: &[u8], ctx: &SendContext) -> Result<usize>;
}

impl<S: RawSender + ?Sized> RawSender for &mut S {
    fn send(&mut self, packet: &[u8], ctx: &SendContext) -> Result<usize> {
        (**self).send(packet, ctx)
    }
}

impl<S: RawSender + ?Sized> RawSender for Box<S> {
    fn send(&mut self, packet: &[u8], ctx: &SendContext) -> Result<usize> {
        (**self).send(packet, ctx)
    }
}

/// A packet captured by [`MemorySender`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPacket {
    pub data: Vec<u8>,
    pub context: SendContext,
}

/// Sender that records packets instead of writing them to a socket
#[derive(Debug, Default)]
pub struct MemorySender {
    sent: Vec<SentPacket>,
    attempts: usize,
    fail_sources: Vec<Ipv6Addr>,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send whose source is `source`
    pub fn fail_from(mut self, source: Ipv6Addr) -> Self {
        self.fail_sources.push(source);
        self
    }

    /// Packets accepted so far
    pub fn sent(&self) -> &[SentPacket] {
        &self.sent
    }

    /// Number of send calls, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl RawSender for MemorySender {
    fn send(&mut self, packet: &[u8], ctx: &SendContext) -> Result<usize> {
        self.attempts += 1;

        if self.fail_sources.contains(&ctx.source) {
            return Err(ctx.send_failure(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "simulated send failure",
            )));
        }

        self.sent.push(SentPacket {
            data: packet.to_vec(),
            context: ctx.clone(),
        });
        Ok(packet.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(source: &str) -> SendContext {
        SendContext::new(
            "eth0",
            2,
            source.parse().unwrap(),
            "ff02::1:ff00:1".parse().unwrap(),
        )
    }

    #[test]
    fn test_context_hop_limit_is_fixed() {
        assert_eq!(ctx("2001:db8::1").hop_limit(), 255);
    }

    #[test]
    fn test_memory_sender_records() {
        let mut sender = MemorySender::new();
        let written = sender.send(&[135, 0, 0, 0], &ctx("2001:db8::1")).unwrap();
        assert_eq!(written, 4);
        assert_eq!(sender.attempts(), 1);
        assert_eq!(sender.sent().len(), 1);
        assert_eq!(sender.sent()[0].data, vec![135, 0, 0, 0]);
        assert_eq!(sender.sent()[0].context.interface_index, 2);
    }

    #[test]
    fn test_memory_sender_failure() {
        let bad: Ipv6Addr = "2001:db8::bad".parse().unwrap();
        let mut sender = MemorySender::new().fail_from(bad);

        let err = sender.send(&[135], &ctx("2001:db8::bad")).unwrap_err();
        assert!(matches!(err, Error::SendFailure { src, .. } if src == bad));

        sender.send(&[135], &ctx("2001:db8::1")).unwrap();
        assert_eq!(sender.attempts(), 2);
        assert_eq!(sender.sent().len(), 1);
    }

    #[test]
    fn test_sender_by_mut_ref() {
        fn send_via<S: RawSender>(mut sender: S) -> Result<usize> {
            sender.send(&[1, 2], &ctx("2001:db8::1"))
        }

        let mut sender = MemorySender::new();
        send_via(&mut sender).unwrap();
        assert_eq!(sender.sent().len(), 1);
    }
}
