//! The main loop.

use embedded_hal::digital::{InputPin, OutputPin};
use slip_control::{indicator, ButtonEvent, LoopState};

use crate::handlers::{greet, Devices, Handlers};
use crate::spool::{self, Spool};
use crate::system::button::ButtonPin;
use crate::system::clock::Clock;
use crate::system::led::Led;
use crate::system::System;

/// Single-threaded loop sampling the button and running the timers.
///
/// Each tick, in this order: sample the button and dispatch its event,
/// update the status led, check the daily trigger, check the spool timer.
/// Handlers block the loop while they run.
pub struct App<B: InputPin, L: OutputPin, C: Clock> {
    state: LoopState,
    button: ButtonPin<B>,
    led: Led<L>,
    clock: C,
    devices: Devices,
    spool: Box<dyn Spool>,
    handlers: Box<dyn Handlers>,
}

impl<B: InputPin, L: OutputPin, C: Clock> App<B, L, C> {
    /// Greet and take the first reading of the button.
    pub fn start(
        system: System<B, L, C>,
        handlers: Box<dyn Handlers>,
        config: slip_control::Config,
    ) -> Self {
        let System {
            mut button,
            mut led,
            clock,
            mut devices,
            spool,
        } = system;

        {
            let _busy = led.busy();
            if let Err(err) = greet(devices.printer.as_mut()) {
                log::error!("Failed to print greeting: {}", err);
            }
        }

        let down = button.is_down().unwrap_or_else(|err| {
            log::warn!("Failed to read initial button state: {}", err);
            false
        });
        let state = LoopState::new(config, down, clock.now());
        log::info!("Ready");

        Self {
            state,
            button,
            led,
            clock,
            devices,
            spool,
            handlers,
        }
    }

    /// Busy-poll forever. Only a shutdown of the host ends it.
    pub fn run(mut self) -> ! {
        loop {
            self.tick();
            std::hint::spin_loop();
        }
    }

    pub fn tick(&mut self) {
        let now = self.clock.now();

        match self.button.is_down() {
            Ok(down) => {
                if let Some(event) = self.state.sample_button(down, now) {
                    self.dispatch(event);
                }
            }
            Err(err) => log::debug!("Failed to sample button: {}", err),
        }

        self.led.set(indicator::level(now, false));

        if self.state.check_daily(self.clock.minute_of_day()) {
            let _busy = self.led.busy();
            if let Err(err) = self.handlers.daily(&mut self.devices) {
                log::error!("Daily action failed: {}", err);
            }
        }

        if self.state.check_spool(now) {
            let _busy = self.led.busy();
            if let Err(err) = self.handlers.interval(&mut self.devices) {
                log::error!("Interval action failed: {}", err);
            }
            let report = spool::drain(self.spool.as_mut(), self.devices.printer.as_mut());
            if report.printed + report.failed > 0 {
                log::info!(
                    "Spool drained, {} printed, {} failed",
                    report.printed,
                    report.failed
                );
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    fn dispatch(&mut self, event: ButtonEvent) {
        let _busy = self.led.busy();
        let result = match event {
            ButtonEvent::Tap => {
                log::info!("Tap");
                self.handlers.tap(&mut self.devices, self.clock.local())
            }
            ButtonEvent::HoldStart => {
                log::info!("Hold");
                self.handlers.hold(&mut self.devices)
            }
        };
        if let Err(err) = result {
            log::error!("Action for {:?} failed: {}", event, err);
        }
    }
}
