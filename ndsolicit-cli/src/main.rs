use clap::Parser;
use ndsolicit_cli::dump::{describe_interface, describe_packet};
use ndsolicit_cli::{logging, run, Cli, Commands, Mode, RunConfig};
use ndsolicit_core::{
    Icmpv6Sender, InterfaceSource, MemorySender, ProcRouteTable, Result, SystemInterfaces,
};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version are not failures
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(Commands::Interfaces) => list_interfaces(),
        None => solicit(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(precondition = e.is_precondition(), "{}", e);
            ExitCode::from(1)
        }
    }
}

fn list_interfaces() -> Result<()> {
    for iface in SystemInterfaces.list()? {
        print!("{}", describe_interface(&iface));
    }
    Ok(())
}

fn solicit(cli: &Cli) -> Result<()> {
    let config = match RunConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Run with --help for usage.");
            return Err(e);
        }
    };
    let routes = ProcRouteTable::default();

    let report = if config.dry_run {
        let mut sender = MemorySender::new();
        let report = run(&config, &SystemInterfaces, &routes, &mut sender)?;
        for packet in sender.sent() {
            print!("{}", describe_packet(packet));
        }
        report
    } else {
        let mut sender = Icmpv6Sender::new(config.options.clone());
        run(&config, &SystemInterfaces, &routes, &mut sender)?
    };

    // Gateway mode succeeds as a process even when some sources failed
    if config.mode == Mode::Gateway {
        println!(
            "{} of {} solicitations sent on {}",
            report.sent(),
            report.attempts.len(),
            report.interface.name
        );
    }
    Ok(())
}
