//! Stand-ins for the board, used to drive the loop off the hardware.
//!
//! All fakes are cheap handles over shared state, keep a clone to inspect
//! or steer a fake after it was moved into the system.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::convert::Infallible;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::error::{Error, Result};
use crate::handlers::Devices;
use crate::spool::Spool;
use crate::system::button::ButtonPin;
use crate::system::clock::Clock;
use crate::system::led::Led;
use crate::system::power::PowerControl;
use crate::system::printer::{Justification, Printer};
use crate::system::quote::{Quote, QuoteSource};
use crate::system::System;

/// Button input, low while pressed.
#[derive(Debug, Clone, Default)]
pub struct FakeButton {
    down: Rc<Cell<bool>>,
}

impl FakeButton {
    pub fn press(&self) {
        self.down.set(true);
    }

    pub fn release(&self) {
        self.down.set(false);
    }
}

impl ErrorType for FakeButton {
    type Error = Infallible;
}

impl InputPin for FakeButton {
    fn is_high(&mut self) -> std::result::Result<bool, Self::Error> {
        Ok(!self.down.get())
    }

    fn is_low(&mut self) -> std::result::Result<bool, Self::Error> {
        Ok(self.down.get())
    }
}

/// Led output remembering every level it was set to.
#[derive(Debug, Clone, Default)]
pub struct FakeLed {
    history: Rc<RefCell<Vec<bool>>>,
}

impl FakeLed {
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }

    #[must_use]
    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }

    pub fn clear(&self) {
        self.history.borrow_mut().clear();
    }
}

impl ErrorType for FakeLed {
    type Error = Infallible;
}

impl OutputPin for FakeLed {
    fn set_low(&mut self) -> std::result::Result<(), Self::Error> {
        self.history.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> std::result::Result<(), Self::Error> {
        self.history.borrow_mut().push(true);
        Ok(())
    }
}

/// Clock standing still until advanced.
///
/// Local time moves together with the wall-clock time, starting at the
/// given moment.
#[derive(Debug, Clone)]
pub struct FakeClock {
    now: Rc<Cell<f64>>,
    start: f64,
    local_start: NaiveDateTime,
}

impl FakeClock {
    #[must_use]
    pub fn new(now: f64, local: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            start: now,
            local_start: local,
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Default for FakeClock {
    /// Early morning, before the daily trigger.
    fn default() -> Self {
        let local = NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|date| date.and_hms_opt(5, 0, 0))
            .unwrap_or_default();
        Self::new(1_000.0, local)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn local(&self) -> NaiveDateTime {
        let elapsed = TimeDelta::milliseconds(((self.now.get() - self.start) * 1000.0) as i64);
        self.local_start + elapsed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterCommand {
    Print(String),
    PrintLine(String),
    Feed(u8),
    Justify(Justification),
    Image(PathBuf, bool),
}

/// Printer recording what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingPrinter {
    commands: Rc<RefCell<Vec<PrinterCommand>>>,
    broken_images: Rc<RefCell<HashSet<PathBuf>>>,
    undecodable_images: Rc<RefCell<HashSet<PathBuf>>>,
    jammed_feed: Rc<Cell<bool>>,
    disconnected: Rc<Cell<bool>>,
}

impl RecordingPrinter {
    #[must_use]
    pub fn commands(&self) -> Vec<PrinterCommand> {
        self.commands.borrow().clone()
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    /// All text printed, lines ended by a newline.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for command in self.commands.borrow().iter() {
            match command {
                PrinterCommand::Print(printed) => text.push_str(printed),
                PrinterCommand::PrintLine(printed) => {
                    text.push_str(printed);
                    text.push('\n');
                }
                _ => (),
            }
        }
        text
    }

    #[must_use]
    pub fn images(&self) -> Vec<PathBuf> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                PrinterCommand::Image(path, _) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// Make writes of the given image fail.
    pub fn break_on(&self, path: impl Into<PathBuf>) {
        self.broken_images.borrow_mut().insert(path.into());
    }

    /// Make the given image fail to load.
    pub fn reject(&self, path: impl Into<PathBuf>) {
        self.undecodable_images.borrow_mut().insert(path.into());
    }

    /// Make paper feeds fail.
    pub fn jam_feed(&self) {
        self.jammed_feed.set(true);
    }

    /// Make every command fail.
    pub fn disconnect(&self) {
        self.disconnected.set(true);
    }

    fn record(&self, command: PrinterCommand) -> Result<()> {
        if self.disconnected.get() {
            return Err(not_responding());
        }
        self.commands.borrow_mut().push(command);
        Ok(())
    }
}

fn not_responding() -> Error {
    Error::Printer(io::Error::new(
        io::ErrorKind::TimedOut,
        "printer not responding",
    ))
}

impl Printer for RecordingPrinter {
    fn print(&mut self, text: &str) -> Result<()> {
        self.record(PrinterCommand::Print(text.to_string()))
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        self.record(PrinterCommand::PrintLine(text.to_string()))
    }

    fn feed(&mut self, lines: u8) -> Result<()> {
        if self.jammed_feed.get() {
            return Err(not_responding());
        }
        self.record(PrinterCommand::Feed(lines))
    }

    fn set_justification(&mut self, justification: Justification) -> Result<()> {
        self.record(PrinterCommand::Justify(justification))
    }

    fn print_image(&mut self, path: &Path, high_density: bool) -> Result<()> {
        if self.undecodable_images.borrow().contains(path) {
            return Err(Error::Image(image::ImageError::IoError(io::Error::new(
                io::ErrorKind::InvalidData,
                "not an image",
            ))));
        }
        if self.broken_images.borrow().contains(path) {
            return Err(not_responding());
        }
        self.record(PrinterCommand::Image(path.to_path_buf(), high_density))
    }
}

/// Quote source answering from a script, failing once it runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedQuotes {
    quotes: Rc<RefCell<VecDeque<Quote>>>,
    requests: Rc<Cell<usize>>,
}

impl ScriptedQuotes {
    pub fn push(&self, text: &str, author: &str) {
        self.quotes.borrow_mut().push_back(Quote {
            text: text.to_string(),
            author: author.to_string(),
        });
    }

    #[must_use]
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl QuoteSource for ScriptedQuotes {
    fn fetch_quote(&mut self) -> Result<Quote> {
        self.requests.set(self.requests.get() + 1);
        self.quotes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::Quote(String::from("service unreachable")))
    }
}

/// Power control counting shutdown requests instead of halting.
#[derive(Debug, Clone, Default)]
pub struct RecordingPower {
    shutdowns: Rc<Cell<usize>>,
}

impl RecordingPower {
    #[must_use]
    pub fn shutdowns(&self) -> usize {
        self.shutdowns.get()
    }
}

impl PowerControl for RecordingPower {
    fn shutdown_now(&mut self) -> Result<()> {
        self.shutdowns.set(self.shutdowns.get() + 1);
        Ok(())
    }
}

/// Spool held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySpool {
    entries: Rc<RefCell<Vec<PathBuf>>>,
    unlistable: Rc<Cell<bool>>,
    undeletable: Rc<RefCell<HashSet<PathBuf>>>,
}

impl MemorySpool {
    pub fn add(&self, entry: impl Into<PathBuf>) {
        self.entries.borrow_mut().push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<PathBuf> {
        self.entries.borrow().clone()
    }

    pub fn fail_listing(&self, fail: bool) {
        self.unlistable.set(fail);
    }

    pub fn fail_removing(&self, entry: impl Into<PathBuf>) {
        self.undeletable.borrow_mut().insert(entry.into());
    }
}

impl Spool for MemorySpool {
    fn pending(&mut self) -> Result<Vec<PathBuf>> {
        if self.unlistable.get() {
            return Err(Error::filesystem(
                "queue",
                io::Error::new(io::ErrorKind::NotFound, "queue is gone"),
            ));
        }
        Ok(self.entries())
    }

    fn remove(&mut self, entry: &Path) -> Result<()> {
        if self.undeletable.borrow().contains(entry) {
            return Err(Error::filesystem(
                entry,
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        self.entries.borrow_mut().retain(|pending| pending != entry);
        Ok(())
    }
}

/// Handles to every fake of a system built by `fake_system`.
#[derive(Debug, Clone, Default)]
pub struct Fakes {
    pub button: FakeButton,
    pub led: FakeLed,
    pub clock: FakeClock,
    pub printer: RecordingPrinter,
    pub quotes: ScriptedQuotes,
    pub power: RecordingPower,
    pub spool: MemorySpool,
}

impl Fakes {
    #[must_use]
    pub fn system(&self) -> System<FakeButton, FakeLed, FakeClock> {
        System {
            button: ButtonPin::new(self.button.clone()),
            led: Led::new(self.led.clone()),
            clock: self.clock.clone(),
            devices: Devices {
                printer: Box::new(self.printer.clone()),
                quotes: Box::new(self.quotes.clone()),
                power: Box::new(self.power.clone()),
            },
            spool: Box::new(self.spool.clone()),
        }
    }
}
