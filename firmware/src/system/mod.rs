pub mod button;
pub mod clock;
pub mod led;
pub mod power;
pub mod printer;
pub mod quote;

use rppal::gpio::{self, Gpio};
use rppal::uart::{Parity, Uart};

use crate::config::Config;
use crate::error::Result;
use crate::handlers::Devices;
use crate::spool::{DirectorySpool, Spool};

use button::ButtonPin;
use clock::{Clock, SystemClock};
use led::Led;
use power::SystemPower;
use printer::{SerialLink, ThermalPrinter};
use quote::HttpQuoteSource;

/// Everything the main loop drives.
pub struct System<B, L, C: Clock> {
    pub button: ButtonPin<B>,
    pub led: Led<L>,
    pub clock: C,
    pub devices: Devices,
    pub spool: Box<dyn Spool>,
}

impl System<gpio::InputPin, gpio::OutputPin, SystemClock> {
    /// Initialize system abstraction of the board.
    ///
    /// # Errors
    ///
    /// Fails when the queue directory cannot be created, the pins cannot be
    /// claimed, or the printer link cannot be opened.
    pub fn init(config: &Config) -> Result<Self> {
        let spool = DirectorySpool::open(&config.queue_directory)?;

        let gpio = Gpio::new()?;
        let button = gpio.get(config.button_pin)?.into_input_pullup();
        let led = gpio.get(config.led_pin)?.into_output_low();
        log::debug!(
            "Claimed button on GPIO {} and led on GPIO {}",
            config.button_pin,
            config.led_pin
        );

        let uart = Uart::with_path(&config.serial_path, config.baud_rate, Parity::None, 8, 1)?;
        let printer = ThermalPrinter::new(SerialLink::new(uart)?)?;
        log::debug!(
            "Opened printer on {} at {} baud",
            config.serial_path.display(),
            config.baud_rate
        );

        let quotes = HttpQuoteSource::new(&config.quotes_url, config.quotes_timeout)?;

        Ok(Self {
            button: ButtonPin::new(button),
            led: Led::new(led),
            clock: SystemClock,
            devices: Devices {
                printer: Box::new(printer),
                quotes: Box::new(quotes),
                power: Box::new(SystemPower),
            },
            spool: Box::new(spool),
        })
    }
}
