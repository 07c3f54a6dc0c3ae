//! Runtime configuration.
//!
//! There is no configuration file. Everything is set here and only the
//! verbosity can be changed from the command line.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

/// Drive a thermal receipt printer from a push-button.
#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Args {
    /// Log debug messages too
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// BCM number of the status led pin.
    pub led_pin: u8,
    /// BCM number of the button pin, wired to ground.
    pub button_pin: u8,
    pub control: slip_control::Config,
    pub serial_path: PathBuf,
    pub baud_rate: u32,
    pub quotes_url: String,
    pub quotes_timeout: Duration,
    /// Directory polled for images to print.
    pub queue_directory: PathBuf,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            led_pin: 18,
            button_pin: 23,
            control: slip_control::Config::default(),
            serial_path: PathBuf::from("/dev/serial0"),
            baud_rate: 19_200,
            quotes_url: String::from("https://www.adafruit.com/api/quotes.php"),
            quotes_timeout: Duration::from_secs(10),
            queue_directory: default_queue_directory(),
            verbose: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        Self {
            verbose: args.verbose,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

// The queue lives next to the installed binary.
fn default_queue_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("queue")))
        .unwrap_or_else(|| PathBuf::from("queue"))
}
