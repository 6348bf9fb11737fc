//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ndsolicit")]
#[command(
    version,
    about = "Send an IPv6 Neighbor Solicitation (NS) packet",
    long_about = "Send an IPv6 Neighbor Solicitation (NS) packet.\n\n\
        Manual mode:       ndsolicit --iface <IFACE> --src <SOURCE> --dst <TARGET>\n\
        Auto gateway mode: ndsolicit --iface <IFACE> --gateway\n\n\
        Opening the raw ICMPv6 socket requires root or CAP_NET_RAW."
)]
pub struct Cli {
    /// Network interface to send on (e.g., eth0)
    #[arg(short = 'i', long = "iface", value_name = "INTERFACE")]
    pub interface: Option<String>,

    /// (Manual mode) Source IPv6 address
    #[arg(short = 's', long = "src", value_name = "IPV6")]
    pub source: Option<String>,

    /// (Manual mode) Target IPv6 address to solicit
    #[arg(short = 'd', long = "dst", value_name = "IPV6")]
    pub target: Option<String>,

    /// (Auto mode) Discover the default gateway and solicit it from every
    /// IPv6 address on the interface. Per-address failures are logged and
    /// do not change the exit status.
    #[arg(short = 'g', long)]
    pub gateway: bool,

    /// Write timeout for the raw socket in milliseconds (0 = no timeout)
    #[arg(
        long,
        value_name = "MILLIS",
        env = "NDSOLICIT_TIMEOUT_MS",
        default_value_t = 0
    )]
    pub timeout_ms: u64,

    /// Do not bind the raw socket to the interface by name
    #[arg(long)]
    pub no_bind_device: bool,

    /// Build packets and print them instead of sending
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List network interfaces with their IPv6 addresses
    Interfaces,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_manual_mode_args() {
        let cli = Cli::try_parse_from([
            "ndsolicit",
            "--iface",
            "eth0",
            "--src",
            "2001:db8::1",
            "--dst",
            "2001:db8::2",
        ])
        .unwrap();
        assert_eq!(cli.interface.as_deref(), Some("eth0"));
        assert_eq!(cli.source.as_deref(), Some("2001:db8::1"));
        assert_eq!(cli.target.as_deref(), Some("2001:db8::2"));
        assert!(!cli.gateway);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_gateway_mode_short_flags() {
        let cli = Cli::try_parse_from(["ndsolicit", "-i", "eth0", "-g", "-vv"]).unwrap();
        assert!(cli.gateway);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_interfaces_subcommand() {
        let cli = Cli::try_parse_from(["ndsolicit", "interfaces"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Interfaces));
    }

    #[test]
    fn test_timeout_from_environment() {
        // no other test reads the default timeout
        std::env::set_var("NDSOLICIT_TIMEOUT_MS", "250");
        let from_env = Cli::try_parse_from(["ndsolicit", "-i", "eth0", "-g"]);
        let args = ["ndsolicit", "-i", "eth0", "-g", "--timeout-ms", "40"];
        let from_flag = Cli::try_parse_from(args);
        std::env::remove_var("NDSOLICIT_TIMEOUT_MS");

        assert_eq!(from_env.unwrap().timeout_ms, 250);
        assert_eq!(from_flag.unwrap().timeout_ms, 40);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["ndsolicit", "-v", "-q"]).is_err());
    }
}
