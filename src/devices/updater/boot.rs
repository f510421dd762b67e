//! Decisions to hand control straight to the user application.
use super::Updater;
use crate::{
    devices::{
        interfaces::{ResetCause, ResetReason, Switch, Transport, UpdateEngine, Validator},
        slot::Slot,
    },
    error::Error,
    hal::{gpio::InputPin, led::Toggle, time::Delay},
};

impl<ENG, TRP, VAL, SW, DLY, BTN, LED> Updater<ENG, TRP, VAL, SW, DLY, BTN, LED>
where
    ENG: UpdateEngine,
    TRP: Transport,
    VAL: Validator,
    SW: Switch,
    DLY: Delay,
    BTN: InputPin,
    LED: Toggle,
{
    /// Boots the user application right away after a power-on, pin or
    /// watchdog reset, if it is valid.
    ///
    /// A software reset means another application asked for the updater,
    /// so the updater stays. Returns normally when no switch happened.
    pub fn startup<R: ResetCause>(&mut self, reset: &mut R) -> Result<(), Error> {
        let reason = reset.reason();
        if reason.is_software() {
            log_info!("Software reset, staying in updater");
            return Ok(());
        }

        if let Err(error) = self.validator.validate(Slot::User) {
            log_info!("No valid user application on {} reset", reason);
            if error != Error::VerifyFailed {
                error.report();
            }
            return Ok(());
        }

        // The switch itself resets the device, and a stale reason would be
        // read back as ours.
        while reset.reason() != ResetReason::None {
            reset.clear();
        }
        log_info!("Valid user application found. Switching...");
        match self.switch.execute(Slot::User)? {}
    }

    /// Handles a debounced click on the user button: boots the installed
    /// user application if it is valid, otherwise carries on silently.
    pub fn user_request(&mut self) -> Result<(), Error> {
        match self.validator.validate(Slot::User) {
            Ok(()) => {
                log_info!("User requested switch to user application");
                self.transport.stop();
                match self.switch.execute(Slot::User)? {}
            }
            Err(_) => {
                log_info!("User requested switch, but no valid user application");
                Ok(())
            }
        }
    }
}
