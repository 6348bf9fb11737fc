//! Solicitation runner
//!
//! Resolves the interface (and, in gateway mode, the default gateway),
//! then drives one build-and-send per (source, target) pair. Pairs are
//! processed one after another; a failed pair never stops the others.

use crate::args::Cli;
use ndsolicit_core::{
    Error, Interface, InterfaceSource, RawSender, Result, RouteTable, SendOptions,
};
use ndsolicit_packet::{BuiltSolicitation, NeighborSolicitationBuilder};
use std::net::{IpAddr, Ipv6Addr};
use tracing::{error, info, warn};


/// Which addresses to solicit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One explicit (source, target) pair
    Manual { source: Ipv6Addr, target: Ipv6Addr },
    /// Every IPv6 address on the interface toward the default gateway
    Gateway,
}

/// Validated run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub interface: String,
    pub mode: Mode,
    pub options: SendOptions,
    pub dry_run: bool,
}

impl RunConfig {
    /// Validate command-line input.
    ///
    /// # Errors
    ///
    /// `Configuration` for a missing interface, missing `--src`/`--dst` in
    /// manual mode, or an address that is not valid IPv6.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let interface = match cli.interface.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(Error::configuration("--iface parameter is required")),
        };

        let mode = if cli.gateway {
            if cli.source.is_some() || cli.target.is_some() {
                warn!("--src/--dst are ignored in gateway mode");
            }
            Mode::Gateway
        } else {
            match (cli.source.as_deref(), cli.target.as_deref()) {
                (Some(source), Some(target)) => Mode::Manual {
                    source: parse_ipv6("source", source)?,
                    target: parse_ipv6("target", target)?,
                },
                _ => {
                    return Err(Error::configuration(
                        "in manual mode, --src and --dst parameters are required",
                    ))
                }
            }
        };

        let options = SendOptions::new()
            .with_timeout_ms(cli.timeout_ms)
            .with_bind_device(!cli.no_bind_device);

        Ok(Self {
            interface,
            mode,
            options,
            dry_run: cli.dry_run,
        })
    }
}

/// Parse an IPv6 address given on the command line
pub fn parse_ipv6(kind: &str, value: &str) -> Result<Ipv6Addr> {
    match value.trim().parse::<IpAddr>() {
        Ok(IpAddr::V6(addr)) => Ok(addr),
        Ok(IpAddr::V4(_)) => Err(Error::configuration(format!(
            "Invalid {} IP address: {} is IPv4, an IPv6 address is required",
            kind, value
        ))),
        Err(_) => Err(Error::configuration(format!(
            "Invalid {} IP address: {}",
            kind, value
        ))),
    }
}

/// Outcome of one (source, target) pair
#[derive(Debug)]
pub struct Attempt {
    pub source: Ipv6Addr,
    pub target: Ipv6Addr,
    pub outcome: Result<BuiltSolicitation>,
}

impl Attempt {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a run did
#[derive(Debug)]
pub struct RunReport {
    pub interface: Interface,
    pub mode: Mode,
    pub attempts: Vec<Attempt>,
}

impl RunReport {
    pub fn sent(&self) -> usize {
        self.attempts.iter().filter(|a| a.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempts.len() - self.sent()
    }
}

/// Execute `config` against the given collaborators.
///
/// Returns `Err` only for failures that end the run: precondition
/// failures in either mode, and the single send in manual mode. In
/// gateway mode per-source failures are logged and recorded in the
/// report.
pub fn run<S: RawSender + ?Sized>(
    config: &RunConfig,
    interfaces: &dyn InterfaceSource,
    routes: &dyn RouteTable,
    sender: &mut S,
) -> Result<RunReport> {
    let interface = interfaces.by_name(&config.interface)?;

    match config.mode {
        Mode::Manual { source, target } => {
            let built = solicit(sender, &interface, source, target)?;
            info!("Sent NS request from {} for {}", source, target);
            Ok(RunReport {
                interface,
                mode: config.mode,
                attempts: vec![Attempt {
                    source,
                    target,
                    outcome: Ok(built),
                }],
            })
        }
        Mode::Gateway => {
            info!("Auto gateway mode on interface {}", interface.name);

            let gateway = routes.default_gateway(&interface.name)?;
            info!("Discovered IPv6 gateway {}", gateway);

            let sources = interface.ipv6_addrs();
            if sources.is_empty() {
                return Err(Error::discovery(format!(
                    "No IPv6 addresses found on interface '{}'",
                    interface.name
                )));
            }
            info!(
                "Found {} IPv6 addresses on interface '{}'",
                sources.len(),
                interface.name
            );

            let attempts = sources
                .into_iter()
                .map(|source| {
                    let outcome = solicit(&mut *sender, &interface, source, gateway);
                    match &outcome {
                        Ok(_) => info!("Sent NS request from {} to gateway {}", source, gateway),
                        Err(e) => error!("Failed to send NS request from {}: {}", source, e),
                    }
                    Attempt {
                        source,
                        target: gateway,
                        outcome,
                    }
                })
                .collect();

            Ok(RunReport {
                interface,
                mode: config.mode,
                attempts,
            })
        }
    }
}

/// Build and send one solicitation from `source` for `target`
pub fn solicit<S: RawSender + ?Sized>(
    sender: &mut S,
    interface: &Interface,
    source: Ipv6Addr,
    target: Ipv6Addr,
) -> Result<BuiltSolicitation> {
    NeighborSolicitationBuilder::new()
        .source(source)
        .target(target)
        .hardware_addr(interface.hardware_addr.clone())
        .send(sender, &interface.name, interface.index)
}
