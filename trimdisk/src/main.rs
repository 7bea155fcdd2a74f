use clap::Parser;
use clap::error::ErrorKind;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug};
use trimdisk_core::TrimError;
use trimdisk_core::trim::{self, NativeSystem};

/// Discard (TRIM) every block of a whole disk or partition.
///
/// Make sure you have a backup or the data is not needed anymore, and never
/// run this against a mounted or otherwise busy device.
#[derive(Parser)]
#[command(name = "trimdisk")]
#[command(override_usage = "trimdisk <device>", version)]
struct Cli {
    /// Character device node of the disk or partition
    device: PathBuf,

    /// Log each step to standard error
    #[arg(short, long)]
    verbose: bool,
}

/// Installs a stderr subscriber, quiet unless `verbose` is set.
///
/// The level comes from the command line only.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prints the diagnostic for `err` and returns its exit status.
fn fail(err: &TrimError) -> ExitCode {
    eprintln!("{}", style(err).red().for_stderr());
    ExitCode::from(err.exit_code())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        // Any other parse failure means the device operand is missing or
        // there is more than one.
        Err(_) => return fail(&TrimError::Usage),
    };

    init_logging(cli.verbose);
    debug!(device = %cli.device.display(), "starting");

    match trim::run(&NativeSystem, &cli.device) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
