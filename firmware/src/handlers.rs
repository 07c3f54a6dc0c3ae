//! Actions run in reaction to the button and the timers.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::Result;
use crate::system::power::PowerControl;
use crate::system::printer::{Justification, Printer};
use crate::system::quote::{Quote, QuoteSource};

/// Collaborators available to the handlers.
pub struct Devices {
    pub printer: Box<dyn Printer>,
    pub quotes: Box<dyn QuoteSource>,
    pub power: Box<dyn PowerControl>,
}

/// Behavior of the device.
///
/// Every handler runs to completion on the loop thread, with the status
/// led lit. Errors are logged by the caller and the loop carries on.
pub trait Handlers {
    /// Button was briefly tapped.
    ///
    /// # Errors
    ///
    /// Any error of the devices used.
    fn tap(&mut self, devices: &mut Devices, now: NaiveDateTime) -> Result<()>;

    /// Button was held down. Expected to shut the host down, even when
    /// nothing else works.
    ///
    /// # Errors
    ///
    /// Any error of the devices used.
    fn hold(&mut self, devices: &mut Devices) -> Result<()>;

    /// Called on every spool interval, before the spool is drained.
    ///
    /// # Errors
    ///
    /// Any error of the devices used.
    fn interval(&mut self, _devices: &mut Devices) -> Result<()> {
        Ok(())
    }

    /// Called once a day, after the configured time of day.
    ///
    /// # Errors
    ///
    /// Any error of the devices used.
    fn daily(&mut self, _devices: &mut Devices) -> Result<()> {
        Ok(())
    }
}

/// Greet on boot, print a release slip with a quote on tap, say goodbye
/// and power off on hold.
#[derive(Debug, Default)]
pub struct Greeter;

/// How long after the tap the mail gets released.
const QUARANTINE_DAYS: i64 = 2;

impl Handlers for Greeter {
    fn tap(&mut self, devices: &mut Devices, now: NaiveDateTime) -> Result<()> {
        let printer = devices.printer.as_mut();
        printer.feed(6)?;

        let release = now + TimeDelta::days(QUARANTINE_DAYS);
        printer.print(&format!(
            "Your mail can be released from quarantine on {}.",
            release.format("%A, %e %B at %H:%M")
        ))?;
        printer.feed(3)?;

        match devices.quotes.fetch_quote() {
            Ok(quote) => print_quote(printer, &quote)?,
            Err(err) => log::warn!("Skipping quote: {}", err),
        }

        printer.set_justification(Justification::Center)?;
        printer.print_line("Share and Enjoy <3")?;
        printer.set_justification(Justification::Left)?;
        printer.feed(3)
    }

    fn hold(&mut self, devices: &mut Devices) -> Result<()> {
        if let Err(err) = say_goodbye(devices.printer.as_mut()) {
            log::warn!("Failed to print farewell: {}", err);
        }
        devices.power.shutdown_now()
    }
}

fn say_goodbye(printer: &mut dyn Printer) -> Result<()> {
    printer.print("Goodbye!")?;
    printer.feed(3)
}

fn print_quote(printer: &mut dyn Printer, quote: &Quote) -> Result<()> {
    printer.print_line(&quote.text)?;
    printer.set_justification(Justification::Right)?;
    printer.print_line(&format!("- {}", quote.author))?;
    printer.set_justification(Justification::Left)?;
    printer.feed(3)
}

/// Printed once the device is up.
///
/// # Errors
///
/// Fails with `Error::Printer` when the printer cannot be written to.
pub fn greet(printer: &mut dyn Printer) -> Result<()> {
    printer.print("Hello!")?;
    printer.feed(3)
}
