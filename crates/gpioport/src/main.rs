mod exit;
mod logging;

use std::fs::File;
use std::os::fd::AsFd;
use std::path::PathBuf;

use clap::Parser;
use gpioport_gpio::{Gpio, Sysfs, DEFAULT_SYSFS_ROOT};
use gpioport_port::Port;
use tracing::{error, info};

use crate::exit::{CliError, SUCCESS};
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "gpioport",
    version,
    about = "Drive one sysfs GPIO pin over framed terms on stdin/stdout"
)]
struct Cli {
    /// Root of the sysfs GPIO class directory.
    #[arg(long, value_name = "DIR", env = "GPIOPORT_SYSFS_ROOT", default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", env = "GPIOPORT_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", env = "GPIOPORT_LOG_LEVEL", default_value = "warn")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(()) => std::process::exit(SUCCESS),
        Err(err) => {
            error!(code = err.code, "{err}");
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Read the raw descriptor: `Stdin` buffers ahead of what poll can see.
    let input = std::io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map(File::from)
        .map_err(|err| exit::io_error("duplicate stdin", err))?;
    let output = std::io::stdout().lock();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        sysfs_root = %cli.sysfs_root.display(),
        pid = std::process::id(),
        "starting gpio port"
    );
    let gpio = Gpio::new(Sysfs::new(cli.sysfs_root));
    Port::new(input, output, gpio)
        .run()
        .map_err(exit::port_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["gpioport"]).expect("no args should parse");
        assert_eq!(cli.sysfs_root, PathBuf::from("/sys/class/gpio"));
        assert_eq!(cli.log_format, LogFormat::Text);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "gpioport",
            "--sysfs-root",
            "/tmp/fake-gpio",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("overrides should parse");

        assert_eq!(cli.sysfs_root, PathBuf::from("/tmp/fake-gpio"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_unknown_level() {
        let err = Cli::try_parse_from(["gpioport", "--log-level", "loud"])
            .expect_err("unknown level should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
