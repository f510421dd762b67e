//! Update session supervision.
//!
//! Every poll advances the engine by one step and counts one tick. Two
//! thresholds bound the time to recovery: an exchange with no successful
//! packet for the stall timeout is abandoned and restarted, and an updater
//! that sits idle for the no-image timeout gives up on updates and boots
//! the installed user application, if there is one.
use super::Updater;
use crate::{
    devices::{
        interfaces::{SessionState, Switch, Transport, UpdateEngine, Validator},
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
    /// Advances the session by one engine step and applies the restart
    /// and timeout policy.
    ///
    /// Returns an error only when the device can't go on updating: the
    /// idle timeout expired with no valid user application, or a switch
    /// attempt failed.
    pub fn poll(&mut self) -> Result<(), Error> {
        let outcome = self.engine.resume(&mut self.session.state, self.config.poll_interval);
        self.session.ticks = self.session.ticks.saturating_add(1);

        match self.session.state {
            SessionState::Finished => self.finish()?,
            SessionState::Failed => {
                log_warn!("Update session failed. Restarting...");
                self.restart();
            }
            SessionState::Updating => self.supervise(outcome),
            SessionState::Idle => (),
        }

        if self.session.state == SessionState::Idle
            && self.session.ticks >= self.config.no_image_ticks()
        {
            self.give_up()?;
        }
        Ok(())
    }

    /// A complete image arrived: boot it if it validates, otherwise wait
    /// for the host to send it again.
    fn finish(&mut self) -> Result<(), Error> {
        match self.validator.validate(Slot::User) {
            Ok(()) => {
                log_info!("Update complete. Switching to user application...");
                self.transport.stop();
                match self.switch.execute(Slot::User)? {}
            }
            Err(Error::VerifyFailed) => {
                log_warn!("Downloaded image failed verification. Restarting session...");
                self.restart();
            }
            Err(error) => {
                log_error!("Downloaded image could not be validated. Restarting session...");
                error.report();
                self.restart();
            }
        }
        Ok(())
    }

    fn supervise(&mut self, outcome: Result<(), Error>) {
        match outcome {
            Ok(()) => self.session.ticks = 0,
            Err(Error::Timeout) => {
                if self.session.ticks >= self.config.stall_ticks() {
                    log_warn!("Update exchange stalled. Restarting session...");
                    self.restart();
                }
            }
            Err(error) => {
                log_warn!("Update exchange error. Restarting session...");
                error.report();
                // The transport may still be sending the error response
                self.session.ticks = 0;
                self.delay.delay(self.config.poll_interval);
                self.restart();
            }
        }
    }

    /// Nothing arrived for the whole idle window. Booting a valid user
    /// application is the only way forward; without one the device halts.
    fn give_up(&mut self) -> Result<(), Error> {
        log_warn!("No update received. Attempting to boot user application...");
        self.transport.stop();
        match self.validator.validate(Slot::User) {
            Ok(()) => match self.switch.execute(Slot::User)? {},
            Err(error) => {
                error.report();
                Err(Error::NoValidImage)
            }
        }
    }

    /// Starts a fresh session and discards whatever the transport held.
    pub(crate) fn restart(&mut self) {
        self.session.state = self.engine.init();
        self.session.ticks = 0;
        self.transport.reset();
    }
}

#[cfg(test)]
mod test {
    use crate::{
        devices::{
            doubles::*,
            interfaces::SessionState,
            slot::Slot,
            updater::{test::updater, Session},
        },
        error::Error,
        hal::time::Milliseconds,
    };

    const STALL_TICKS: usize = 250;
    const NO_IMAGE_TICKS: usize = 15_000;

    #[test]
    fn successful_exchanges_keep_resetting_the_stall_counter() {
        // Given
        let engine = FakeEngine::default().otherwise(Ok(()), SessionState::Updating);
        let mut updater = updater(engine, FakeValidator::default());

        // When
        for _ in 0..2 * NO_IMAGE_TICKS {
            updater.poll().unwrap();
        }

        // Then
        assert_eq!(updater.session, Session { state: SessionState::Updating, ticks: 0 });
        assert_eq!(updater.engine.inits, 0);
        assert!(updater.transport.events.is_empty());
    }

    #[test]
    fn stalled_exchange_restarts_exactly_at_the_threshold() {
        // Given
        let mut script = vec![(Ok(()), SessionState::Updating)];
        script.extend((0..STALL_TICKS).map(|_| (Err(Error::Timeout), SessionState::Updating)));
        let mut updater = updater(FakeEngine::scripted(&script), FakeValidator::default());
        updater.poll().unwrap();

        // When
        for _ in 0..STALL_TICKS - 1 {
            updater.poll().unwrap();
        }

        // Then
        assert_eq!(updater.session.ticks, STALL_TICKS as u32 - 1);
        assert_eq!(updater.engine.inits, 0);
        assert!(updater.transport.events.is_empty());

        // When
        updater.poll().unwrap();

        // Then
        assert_eq!(updater.engine.inits, 1);
        assert_eq!(updater.transport.events, vec![TransportEvent::Reset]);
        assert_eq!(updater.session, Session { state: SessionState::Idle, ticks: 0 });
    }

    #[test]
    fn other_exchange_errors_restart_after_a_grace_delay() {
        // Given
        let engine = FakeEngine::scripted(&[
            (Ok(()), SessionState::Updating),
            (Err(Error::Timeout), SessionState::Updating),
            (Err(Error::Protocol), SessionState::Updating),
        ]);
        let mut updater = updater(engine, FakeValidator::default());

        // When
        (0..3).for_each(|_| updater.poll().unwrap());

        // Then
        assert_eq!(updater.delay.periods, vec![Milliseconds(20)]);
        assert_eq!(updater.engine.inits, 1);
        assert_eq!(updater.transport.events, vec![TransportEvent::Reset]);
        assert_eq!(updater.session, Session { state: SessionState::Idle, ticks: 0 });
        assert_eq!(updater.engine.timeouts, vec![Milliseconds(20); 3]);
    }

    #[test]
    fn corrupt_packets_during_the_exchange_also_get_the_grace_delay() {
        // Given
        let engine = FakeEngine::scripted(&[(Err(Error::VerifyFailed), SessionState::Updating)]);
        let mut updater = updater(engine, FakeValidator::default());

        // When
        updater.poll().unwrap();

        // Then
        assert_eq!(updater.delay.periods, vec![Milliseconds(20)]);
        assert_eq!(updater.engine.inits, 1);
    }

    #[test]
    fn failed_sessions_always_restart() {
        // Given
        let engine = FakeEngine::scripted(&[
            (Ok(()), SessionState::Updating),
            (Ok(()), SessionState::Failed),
        ]);
        let mut updater = updater(engine, FakeValidator::default());

        // When
        updater.poll().unwrap();
        updater.poll().unwrap();

        // Then
        assert_eq!(updater.engine.inits, 1);
        assert_eq!(updater.transport.events, vec![TransportEvent::Reset]);
        assert!(updater.delay.periods.is_empty());
        assert_eq!(updater.session.state, SessionState::Idle);
    }

    #[test]
    fn corrupted_image_restarts_the_session_instead_of_halting() {
        // Given
        let engine = FakeEngine::scripted(&[
            (Ok(()), SessionState::Updating),
            (Ok(()), SessionState::Finished),
        ]);
        let mut updater = updater(engine, FakeValidator::default());

        // When
        updater.poll().unwrap();
        let result = updater.poll();

        // Then
        assert_eq!(result, Ok(()));
        assert_eq!(updater.validator.calls, vec![Slot::User]);
        assert!(updater.switch.executed.is_empty());
        assert_eq!(updater.engine.inits, 1);
        assert_eq!(updater.transport.events, vec![TransportEvent::Reset]);
        assert_eq!(updater.session, Session { state: SessionState::Idle, ticks: 0 });
    }

    #[test]
    fn unverifiable_image_also_restarts_the_session() {
        // Given
        let engine = FakeEngine::scripted(&[(Ok(()), SessionState::Finished)]);
        let mut validator = FakeValidator::default();
        validator.error = Error::DeviceError("Validator busy");
        let mut updater = updater(engine, validator);

        // When
        let result = updater.poll();

        // Then
        assert_eq!(result, Ok(()));
        assert_eq!(updater.engine.inits, 1);
        assert_eq!(updater.transport.events, vec![TransportEvent::Reset]);
    }

    #[test]
    fn valid_image_is_booted_exactly_once_with_no_further_changes() {
        // Given
        let engine = FakeEngine::scripted(&[
            (Ok(()), SessionState::Updating),
            (Ok(()), SessionState::Finished),
        ]);
        let mut validator = FakeValidator::default();
        validator.valid = [false, true];
        let mut updater = updater(engine, validator);
        updater.poll().unwrap();

        // When
        let result = updater.poll();

        // Then
        assert_eq!(result, Err(INTERCEPTED));
        assert_eq!(updater.switch.executed, vec![Slot::User]);
        assert_eq!(updater.transport.events, vec![TransportEvent::Stop]);
        assert_eq!(updater.engine.inits, 0);
        assert_eq!(updater.session, Session { state: SessionState::Finished, ticks: 1 });
    }

    #[test]
    fn idle_timeout_without_valid_image_is_fatal_exactly_once() {
        // Given
        let mut updater = updater(FakeEngine::default(), FakeValidator::default());

        // When
        let results: Vec<_> = (0..NO_IMAGE_TICKS).map(|_| updater.poll()).collect();

        // Then
        assert!(results[..NO_IMAGE_TICKS - 1].iter().all(Result::is_ok));
        assert_eq!(results[NO_IMAGE_TICKS - 1], Err(Error::NoValidImage));
        assert!(Error::NoValidImage.is_fatal());
        assert_eq!(updater.transport.events, vec![TransportEvent::Stop]);
        assert_eq!(updater.validator.calls, vec![Slot::User]);
        assert!(updater.switch.executed.is_empty());
    }

    #[test]
    fn idle_timeout_boots_an_image_that_became_valid() {
        // Given
        let mut updater = updater(FakeEngine::default(), FakeValidator::default());
        for _ in 0..NO_IMAGE_TICKS - 1 {
            updater.poll().unwrap();
        }

        // When
        updater.validator.valid = [false, true];
        let result = updater.poll();

        // Then
        assert_eq!(result, Err(INTERCEPTED));
        assert_eq!(updater.switch.executed, vec![Slot::User]);
        assert_eq!(updater.transport.events, vec![TransportEvent::Stop]);
    }

    #[test]
    fn idle_timeout_does_not_fire_while_updating() {
        // Given (one success, then timeouts that never reach idle)
        let mut script = vec![(Ok(()), SessionState::Updating)];
        script.extend((0..STALL_TICKS - 1).map(|_| (Err(Error::Timeout), SessionState::Updating)));
        let engine = FakeEngine::scripted(&script).otherwise(Ok(()), SessionState::Updating);
        let mut updater = updater(engine, FakeValidator::default());

        // When
        for _ in 0..NO_IMAGE_TICKS + 1 {
            updater.poll().unwrap();
        }

        // Then
        assert!(updater.validator.calls.is_empty());
        assert!(updater.transport.events.is_empty());
    }
}
