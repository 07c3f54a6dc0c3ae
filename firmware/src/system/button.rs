use embedded_hal::digital::InputPin;

use crate::error::{Error, Result};

/// The push-button, pulled up and shorted to ground when pressed.
#[derive(Debug)]
pub struct ButtonPin<P> {
    pin: P,
}

impl<P: InputPin> ButtonPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// # Errors
    ///
    /// Fails with `Error::Gpio` when the pin cannot be read.
    pub fn is_down(&mut self) -> Result<bool> {
        self.pin
            .is_low()
            .map_err(|err| Error::Gpio(format!("{err:?}")))
    }
}
