use embedded_hal::digital::{OutputPin, PinState};

/// The status led.
///
/// The led is advisory only, a failure to drive it is logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct Led<P> {
    pin: P,
}

impl<P: OutputPin> Led<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn set(&mut self, on: bool) {
        if let Err(err) = self.pin.set_state(PinState::from(on)) {
            log::debug!("Failed to drive the status led: {:?}", err);
        }
    }

    /// Keep the led lit until the returned guard is dropped.
    pub fn busy(&mut self) -> Busy<'_, P> {
        self.set(true);
        Busy { led: self }
    }
}

/// Scope during which the led signals ongoing work.
pub struct Busy<'a, P: OutputPin> {
    led: &'a mut Led<P>,
}

impl<P: OutputPin> Drop for Busy<'_, P> {
    fn drop(&mut self) {
        self.led.set(false);
    }
}
