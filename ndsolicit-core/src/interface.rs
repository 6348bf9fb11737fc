//! Network interface lookup

use crate::{Error, HardwareAddr, Result};
use ipnetwork::{IpNetwork, Ipv6Network};
use pnet_datalink::{self, NetworkInterface};
use std::fmt;
use std::net::Ipv6Addr;

/// Network interface as seen by the solicitation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Interface name (e.g., "eth0", "en0")
    pub name: String,
    /// Interface index
    pub index: u32,
    /// Link-layer address, empty when the interface has none
    pub hardware_addr: HardwareAddr,
    /// IPv6 addresses assigned to the interface, in kernel order
    pub ipv6: Vec<Ipv6Network>,
    /// Is interface up?
    pub is_up: bool,
    /// Is interface a loopback?
    pub is_loopback: bool,
}

impl Interface {
    /// Create a new interface
    pub fn new(name: impl Into<String>, index: u32, hardware_addr: HardwareAddr) -> Self {
        Self {
            name: name.into(),
            index,
            hardware_addr,
            ipv6: Vec::new(),
            is_up: true,
            is_loopback: false,
        }
    }

    /// Add an IPv6 address with its prefix length
    pub fn with_ipv6(mut self, addr: Ipv6Addr, prefix: u8) -> Result<Self> {
        let network = Ipv6Network::new(addr, prefix).map_err(|e| {
            Error::configuration(format!("Invalid prefix /{} for {}: {}", prefix, addr, e))
        })?;
        self.ipv6.push(network);
        Ok(self)
    }

    /// Get interface by name from the operating system
    pub fn by_name(name: &str) -> Result<Self> {
        SystemInterfaces.by_name(name)
    }

    /// IPv6 addresses without their prefix lengths
    pub fn ipv6_addrs(&self) -> Vec<Ipv6Addr> {
        self.ipv6.iter().map(|net| net.ip()).collect()
    }
}

impl From<&NetworkInterface> for Interface {
    fn from(iface: &NetworkInterface) -> Self {
        // pnet reports 00:00:00:00:00:00 for links without an address
        let hardware_addr = match iface.mac {
            Some(mac) => {
                let bytes = [mac.0, mac.1, mac.2, mac.3, mac.4, mac.5];
                if bytes == [0u8; 6] {
                    HardwareAddr::empty()
                } else {
                    HardwareAddr::from(bytes)
                }
            }
            None => HardwareAddr::empty(),
        };

        let ipv6 = iface
            .ips
            .iter()
            .filter_map(|network| match network {
                IpNetwork::V6(net) => Some(*net),
                IpNetwork::V4(_) => None,
            })
            .collect();

        Self {
            name: iface.name.clone(),
            index: iface.index,
            hardware_addr,
            ipv6,
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (index {}, {}, {}{})",
            self.name,
            self.index,
            self.hardware_addr,
            if self.is_up { "up" } else { "down" },
            if self.is_loopback { ", loopback" } else { "" }
        )
    }
}

/// Source of interface descriptors
pub trait InterfaceSource {
    /// Look up one interface by name
    fn by_name(&self, name: &str) -> Result<Interface> {
        self.list()?
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
    }

    /// List all interfaces
    fn list(&self) -> Result<Vec<Interface>>;
}

/// Interfaces reported by the operating system through `pnet_datalink`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn list(&self) -> Result<Vec<Interface>> {
        let interfaces = pnet_datalink::interfaces();

        if interfaces.is_empty() {
            return Err(Error::discovery(
                "No network interfaces found. Are you running with sufficient privileges?",
            ));
        }

        Ok(interfaces.iter().map(Interface::from).collect())
    }
}

/// Fixed set of interfaces, for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticInterfaces {
    interfaces: Vec<Interface>,
}

impl StaticInterfaces {
    pub fn new(interfaces: Vec<Interface>) -> Self {
        Self { interfaces }
    }
}

impl InterfaceSource for StaticInterfaces {
    fn list(&self) -> Result<Vec<Interface>> {
        Ok(self.interfaces.clone())
    }
}
