//! Raw ICMPv6 socket transport

use crate::sender::{RawSender, SendContext};
use crate::{Error, Result, SendOptions};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddrV6;
use tracing::{debug, trace};

/// Sends each packet through a freshly opened raw ICMPv6 socket.
///
/// The socket lives for exactly one [`RawSender::send`] call and is closed
/// when it goes out of scope, whether the write succeeded or not.
#[derive(Debug, Clone, Default)]
pub struct Icmpv6Sender {
    options: SendOptions,
}

impl Icmpv6Sender {
    pub fn new(options: SendOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    /// Open and configure a socket for `ctx`.
    fn open(&self, ctx: &SendContext) -> Result<Socket> {
        let socket = Socket::new(Domain::IPV6, Type::RAW, Some(Protocol::ICMPV6)).map_err(|e| {
            match e.kind() {
                io::ErrorKind::PermissionDenied => Error::PermissionDenied(format!(
                    "cannot open raw ICMPv6 socket for '{}' ({}); run as root or grant CAP_NET_RAW",
                    ctx.interface, e
                )),
                _ => ctx.send_failure(e),
            }
        })?;

        let hops = u32::from(ctx.hop_limit());
        socket
            .set_multicast_hops_v6(hops)
            .map_err(|e| ctx.send_failure(e))?;
        socket
            .set_unicast_hops_v6(hops)
            .map_err(|e| ctx.send_failure(e))?;
        socket
            .set_multicast_if_v6(ctx.interface_index)
            .map_err(|e| ctx.send_failure(e))?;

        #[cfg(any(target_os = "android", target_os = "fuchsia", target_os = "linux"))]
        if self.options.bind_device {
            socket
                .bind_device(Some(ctx.interface.as_bytes()))
                .map_err(|e| ctx.send_failure(e))?;
        }

        if let Some(timeout) = self.options.write_timeout {
            socket
                .set_write_timeout(Some(timeout))
                .map_err(|e| ctx.send_failure(e))?;
        }

        debug!(
            interface = %ctx.interface,
            index = ctx.interface_index,
            hop_limit = ctx.hop_limit(),
            timeout = ?self.options.write_timeout,
            "Raw ICMPv6 socket ready"
        );

        Ok(socket)
    }
}

impl RawSender for Icmpv6Sender {
    fn send(&mut self, packet: &[u8], ctx: &SendContext) -> Result<usize> {
        let socket = self.open(ctx)?;
        let written = write_with_pktinfo(&socket, packet, ctx).map_err(|e| ctx.send_failure(e))?;

        trace!(
            bytes = written,
            source = %ctx.source,
            destination = %ctx.destination,
            "Packet written"
        );
        Ok(written)
    }
}

/// Write with an `IPV6_PKTINFO` control message selecting the source
/// address and outgoing interface.
#[cfg(target_os = "linux")]
fn write_with_pktinfo(socket: &Socket, packet: &[u8], ctx: &SendContext) -> io::Result<usize> {
    use nix::sys::socket::{sendmsg, ControlMessage, MsgFlags, SockaddrIn6};
    use std::io::IoSlice;
    use std::os::fd::AsRawFd;

    let info = libc::in6_pktinfo {
        ipi6_addr: libc::in6_addr {
            s6_addr: ctx.source.octets(),
        },
        ipi6_ifindex: ctx.interface_index,
    };
    let cmsgs = [ControlMessage::Ipv6PacketInfo(&info)];
    let iov = [IoSlice::new(packet)];
    let dest = SockaddrIn6::from(SocketAddrV6::new(
        ctx.destination,
        0,
        0,
        ctx.interface_index,
    ));

    sendmsg(
        socket.as_raw_fd(),
        &iov,
        &cmsgs,
        MsgFlags::empty(),
        Some(&dest),
    )
    .map_err(io::Error::from)
}

/// Without packet-info support the scope id picks the interface and the
/// kernel picks the source address.
#[cfg(not(target_os = "linux"))]
fn write_with_pktinfo(socket: &Socket, packet: &[u8], ctx: &SendContext) -> io::Result<usize> {
    let dest = socket2::SockAddr::from(SocketAddrV6::new(
        ctx.destination,
        0,
        0,
        ctx.interface_index,
    ));
    socket.send_to(packet, &dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_options_are_kept() {
        let sender = Icmpv6Sender::new(SendOptions::new().with_timeout_ms(500));
        assert_eq!(
            sender.options().write_timeout,
            Some(Duration::from_millis(500))
        );
        assert!(sender.options().bind_device);
    }

    #[test]
    fn test_send_without_privilege_reports_error() {
        // Either we lack CAP_NET_RAW (PermissionDenied) or the bogus
        // interface makes the socket setup or write fail; no success.
        let mut sender = Icmpv6Sender::default();
        let ctx = SendContext::new(
            "ndsolicit-test0",
            u32::MAX,
            "2001:db8::1".parse().unwrap(),
            "ff02::1:ff00:1".parse().unwrap(),
        );
        match sender.send(&[135, 0, 0, 0], &ctx) {
            Err(Error::PermissionDenied(_)) | Err(Error::SendFailure { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
