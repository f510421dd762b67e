//! User application (App1) side of the switch.
//!
//! The user application blinks its own heartbeat and returns control to
//! the updater when the user clicks the button, so a new image can be
//! downloaded.
use super::{debounce::Debouncer, heartbeat::Heartbeat, interfaces::Switch, slot::Slot};
use crate::{
    config::Config,
    error::Error,
    hal::{gpio::InputPin, led::Toggle, time::Delay},
};
use core::convert::Infallible;

pub struct UserApp<SW, DLY, BTN, LED>
where
    SW: Switch,
    DLY: Delay,
    BTN: InputPin,
    LED: Toggle,
{
    switch: SW,
    delay: DLY,
    button: BTN,
    led: LED,
    config: Config,
    debouncer: Debouncer,
    heartbeat: Heartbeat,
}

impl<SW, DLY, BTN, LED> UserApp<SW, DLY, BTN, LED>
where
    SW: Switch,
    DLY: Delay,
    BTN: InputPin,
    LED: Toggle,
{
    /// Builds the user application loop. `config.heartbeat` is normally
    /// [`USER_HEARTBEAT`](crate::config::USER_HEARTBEAT). The button is
    /// active low.
    pub fn new(
        switch: SW,
        delay: DLY,
        button: BTN,
        led: LED,
        config: Config,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            switch,
            delay,
            button,
            led,
            config,
            debouncer: Debouncer::new(config.press_confirm, config.release_confirm),
            heartbeat: Heartbeat::new(config.heartbeat),
        })
    }

    /// Only returns if switching to the updater failed.
    pub fn run(mut self) -> Result<Infallible, Error> {
        log_info!("-- User Application Running --");
        loop {
            self.step()?;
        }
    }

    pub fn step(&mut self) -> Result<(), Error> {
        let elapsed = self.config.poll_interval;
        self.delay.delay(elapsed);
        self.heartbeat.tick(&mut self.led, elapsed);
        if self.debouncer.update(self.button.is_low(), elapsed).is_some() {
            log_info!("User requested switch to updater");
            match self.switch.execute(Slot::Updater)? {}
        }
        Ok(())
    }
}
