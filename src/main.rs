//! Binary entry point.
use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

use homesync::cli::{self, Cli};
use homesync::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    // These two produce plain stdout output and need no logging setup.
    match &args.command {
        cli::Command::Completions(opts) => {
            clap_complete::generate(
                opts.shell,
                &mut Cli::command(),
                "homesync",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        cli::Command::Version => {
            println!("homesync {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let command_name = match &args.command {
        cli::Command::Backup(_) => "backup",
        cli::Command::Restore(_) => "restore",
        cli::Command::Uninstall(_) => "uninstall",
        cli::Command::List => "list",
        cli::Command::Completions(_) | cli::Command::Version => unreachable!("handled above"),
    };

    logging::init_subscriber(args.verbose, command_name);
    let log = logging::Logger::new(command_name);

    match args.command {
        cli::Command::Backup(opts) => commands::backup::run(&args.global, &opts, &log),
        cli::Command::Restore(opts) => commands::restore::run(&args.global, &opts, &log),
        cli::Command::Uninstall(opts) => commands::uninstall::run(&args.global, &opts, &log),
        cli::Command::List => commands::list::run(&args.global),
        cli::Command::Completions(_) | cli::Command::Version => unreachable!("handled above"),
    }
}
