//! Default gateway discovery from the kernel IPv6 routing table

use crate::{Error, Result};
use std::fs;
use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location of the Linux IPv6 routing table
pub const PROC_IPV6_ROUTE: &str = "/proc/net/ipv6_route";

/// Route is usable
pub const RTF_UP: u32 = 0x0001;
/// Destination is reached through a gateway
pub const RTF_GATEWAY: u32 = 0x0002;

/// One entry of the IPv6 routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Route {
    pub destination: Ipv6Addr,
    pub prefix_len: u8,
    pub next_hop: Ipv6Addr,
    pub metric: u32,
    pub flags: u32,
    pub device: String,
}

impl Ipv6Route {
    /// A usable `::/0` route through a gateway
    pub fn is_default_gateway(&self) -> bool {
        self.prefix_len == 0
            && self.destination.is_unspecified()
            && !self.next_hop.is_unspecified()
            && self.flags & (RTF_UP | RTF_GATEWAY) == (RTF_UP | RTF_GATEWAY)
    }
}

/// Something that can name the default IPv6 gateway
pub trait RouteTable {
    /// Resolve the default gateway, preferring routes out of `interface`
    fn default_gateway(&self, interface: &str) -> Result<Ipv6Addr>;
}

/// Routing table read from procfs
#[derive(Debug, Clone)]
pub struct ProcRouteTable {
    path: PathBuf,
}

impl Default for ProcRouteTable {
    fn default() -> Self {
        Self::new(PROC_IPV6_ROUTE)
    }
}

impl ProcRouteTable {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read and parse every route in the table
    pub fn routes(&self) -> Result<Vec<Ipv6Route>> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            Error::discovery(format!(
                "Failed to read routing table {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(parse_ipv6_routes(&contents))
    }
}

impl RouteTable for ProcRouteTable {
    fn default_gateway(&self, interface: &str) -> Result<Ipv6Addr> {
        let routes = self.routes()?;
        select_default_gateway(&routes, interface).ok_or_else(|| {
            Error::discovery(format!(
                "No IPv6 default route found in {}",
                self.path.display()
            ))
        })
    }
}

/// Gateway fixed up front, for tests and explicit overrides
#[derive(Debug, Clone, Copy)]
pub struct StaticRoute(pub Option<Ipv6Addr>);

impl RouteTable for StaticRoute {
    fn default_gateway(&self, _interface: &str) -> Result<Ipv6Addr> {
        self.0
            .ok_or_else(|| Error::discovery("No IPv6 default route configured"))
    }
}

/// Parse the text format of `/proc/net/ipv6_route`.
///
/// Each line holds ten whitespace separated columns: destination,
/// destination prefix length, source, source prefix length, next hop,
/// metric, reference count, use count, flags and device name. Numbers are
/// hexadecimal. Lines that do not parse are skipped.
pub fn parse_ipv6_routes(contents: &str) -> Vec<Ipv6Route> {
    contents.lines().filter_map(parse_route_line).collect()
}

fn parse_route_line(line: &str) -> Option<Ipv6Route> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 10 {
        return None;
    }

    let route = Ipv6Route {
        destination: parse_hex_addr(fields[0])?,
        prefix_len: u8::from_str_radix(fields[1], 16).ok()?,
        next_hop: parse_hex_addr(fields[4])?,
        metric: u32::from_str_radix(fields[5], 16).ok()?,
        flags: u32::from_str_radix(fields[8], 16).ok()?,
        device: fields[9].to_string(),
    };
    Some(route)
}

fn parse_hex_addr(hex: &str) -> Option<Ipv6Addr> {
    if hex.len() != 32 {
        return None;
    }
    u128::from_str_radix(hex, 16).ok().map(Ipv6Addr::from)
}

/// Pick the default gateway: lowest metric on `interface`, else lowest
/// metric on any device.
pub fn select_default_gateway(routes: &[Ipv6Route], interface: &str) -> Option<Ipv6Addr> {
    let candidates: Vec<&Ipv6Route> = routes.iter().filter(|r| r.is_default_gateway()).collect();

    let on_interface = candidates
        .iter()
        .filter(|r| r.device == interface)
        .min_by_key(|r| r.metric);

    let chosen = match on_interface {
        Some(route) => Some(*route),
        None => candidates.iter().min_by_key(|r| r.metric).copied(),
    }?;

    debug!(
        gateway = %chosen.next_hop,
        device = %chosen.device,
        metric = chosen.metric,
        "Selected IPv6 default route"
    );
    Some(chosen.next_hop)
}
