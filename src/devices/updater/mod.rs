//! Updater application (App0).
//!
//! This module contains the update orchestration: the session state
//! machine ([`session`]), the image switch decisions ([`boot`]) and the
//! main loop tying them to the heartbeat LED and the user button.
//! Construction is left to the platform, which owns the concrete engine,
//! transport and pins.
use super::{
    debounce::Debouncer,
    heartbeat::Heartbeat,
    interfaces::{ResetCause, SessionState, Switch, Transport, UpdateEngine, Validator},
    metadata::{MetadataAccess, MetadataGuard},
};
use crate::{
    config::Config,
    error::Error,
    hal::{flash, gpio::InputPin, led::Toggle, time::Delay},
};
use core::convert::Infallible;

pub mod boot;
pub mod session;

/// Volatile state of the update exchange.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    pub state: SessionState,
    /// Polls since the last activity boundary.
    pub ticks: u32,
}

pub struct Updater<ENG, TRP, VAL, SW, DLY, BTN, LED>
where
    ENG: UpdateEngine,
    TRP: Transport,
    VAL: Validator,
    SW: Switch,
    DLY: Delay,
    BTN: InputPin,
    LED: Toggle,
{
    pub(crate) engine: ENG,
    pub(crate) transport: TRP,
    pub(crate) validator: VAL,
    pub(crate) switch: SW,
    pub(crate) delay: DLY,
    pub(crate) button: BTN,
    pub(crate) led: LED,
    pub(crate) session: Session,
    pub(crate) config: Config,
    pub(crate) debouncer: Debouncer,
    pub(crate) heartbeat: Heartbeat,
}

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
    /// Builds an updater. The button is active low.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: ENG,
        transport: TRP,
        validator: VAL,
        switch: SW,
        delay: DLY,
        button: BTN,
        led: LED,
        config: Config,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            engine,
            transport,
            validator,
            switch,
            delay,
            button,
            led,
            session: Session::default(),
            config,
            debouncer: Debouncer::new(config.press_confirm, config.release_confirm),
            heartbeat: Heartbeat::new(config.heartbeat),
        })
    }

    /// Main updater routine.
    ///
    /// Runs [`start`](Self::start), then supervises update sessions until
    /// an image is installed, the user asks for the installed one, or the
    /// idle timeout expires. Only returns on failure; the caller is expected
    /// to halt.
    pub fn run<F, M, R, const ROW: usize>(
        mut self,
        metadata: &mut MetadataGuard<F, M, ROW>,
        reset: &mut R,
    ) -> Result<Infallible, Error>
    where
        F: flash::ReadWrite,
        M: MetadataAccess<F, ROW>,
        R: ResetCause,
        Error: From<F::Error>,
    {
        self.start(metadata, reset)?;
        loop {
            self.step()?;
        }
    }

    /// Startup sequence:
    ///
    /// * Initialises the update engine.
    /// * Repairs the redundant metadata. Failure here is fatal.
    /// * Hands control to the user application straight away if this is
    ///   not a software reset and the user application is valid.
    /// * Otherwise starts the transport.
    pub fn start<F, M, R, const ROW: usize>(
        &mut self,
        metadata: &mut MetadataGuard<F, M, ROW>,
        reset: &mut R,
    ) -> Result<(), Error>
    where
        F: flash::ReadWrite,
        M: MetadataAccess<F, ROW>,
        R: ResetCause,
        Error: From<F::Error>,
    {
        log_info!("-- Updater Initialised --");
        self.session = Session { state: self.engine.init(), ticks: 0 };
        let repair = metadata.repair()?;
        log_info!("Metadata check complete: {}", repair);

        self.startup(reset)?;

        log_info!("Starting update transport");
        self.transport.start();
        Ok(())
    }

    /// One iteration of the main loop: a session poll, the heartbeat and
    /// the user button.
    pub fn step(&mut self) -> Result<(), Error> {
        self.poll()?;
        let elapsed = self.config.poll_interval;
        self.heartbeat.tick(&mut self.led, elapsed);
        if self.debouncer.update(self.button.is_low(), elapsed).is_some() {
            self.user_request()?;
        }
        Ok(())
    }

    pub fn session(&self) -> Session { self.session }
}
