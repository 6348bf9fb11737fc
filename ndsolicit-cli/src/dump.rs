//! Human-readable rendering of dry-run packets and interface listings

use ndsolicit_core::{Interface, SentPacket};
use std::fmt::Write;

/// Hex dump, 16 bytes per line with an offset column
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        let _ = write!(out, "  {:04x}:", i * 16);
        for byte in chunk {
            let _ = write!(out, " {:02x}", byte);
        }
        out.push('\n');
    }
    out
}

/// Describe a packet captured by a dry run
pub fn describe_packet(packet: &SentPacket) -> String {
    let ctx = &packet.context;
    format!(
        "NS {} -> {} on {} (index {}, hop limit {}, {} bytes)\n{}",
        ctx.source,
        ctx.destination,
        ctx.interface,
        ctx.interface_index,
        ctx.hop_limit(),
        packet.data.len(),
        hex_dump(&packet.data)
    )
}

/// One block per interface: header line plus one line per IPv6 network
pub fn describe_interface(iface: &Interface) -> String {
    let mut out = format!("{}\n", iface);
    if iface.ipv6.is_empty() {
        out.push_str("    (no IPv6 addresses)\n");
    }
    for net in &iface.ipv6 {
        let _ = writeln!(out, "    {}", net);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndsolicit_core::{HardwareAddr, SendContext};

    #[test]
    fn test_hex_dump_lines() {
        let data: Vec<u8> = (0u8..20).collect();
        let dump = hex_dump(&data);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  0000: 00 01 02"));
        assert_eq!(lines[1], "  0010: 10 11 12 13");
    }

    #[test]
    fn test_describe_packet() {
        let packet = SentPacket {
            data: vec![0x87, 0x00],
            context: SendContext::new(
                "eth0",
                2,
                "2001:db8::1".parse().unwrap(),
                "ff02::1:ff00:2".parse().unwrap(),
            ),
        };
        let text = describe_packet(&packet);
        assert!(text.starts_with("NS 2001:db8::1 -> ff02::1:ff00:2 on eth0"));
        assert!(text.contains("hop limit 255"));
        assert!(text.contains("0000: 87 00"));
    }

    #[test]
    fn test_describe_interface() {
        let iface = Interface::new("eth0", 2, HardwareAddr::from([2, 0, 0, 0, 0, 1]))
            .with_ipv6("2001:db8::1".parse().unwrap(), 64)
            .unwrap();
        let text = describe_interface(&iface);
        assert!(text.contains("eth0"));
        assert!(text.contains("2001:db8::1/64"));

        let bare = Interface::new("lo", 1, HardwareAddr::empty());
        assert!(describe_interface(&bare).contains("no IPv6 addresses"));
    }
}
