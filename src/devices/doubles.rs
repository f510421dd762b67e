//! Fakes for the external collaborators of the orchestrator.
use super::{
    interfaces::{
        ResetCause, ResetReason, SessionState, Switch, Transport, UpdateEngine, Validator,
    },
    slot::Slot,
    switch_signal::{ReadSwitchSignal, SwitchRequest, WriteSwitchSignal},
};
use crate::{error::Error, hal::time::Milliseconds};
use std::{collections::VecDeque, convert::Infallible, vec::Vec};

/// Returned by [`FakeSwitch`] in place of diverging.
pub const INTERCEPTED: Error = Error::DeviceError("Switch intercepted [TESTING ONLY]");

type Outcome = (Result<(), Error>, SessionState);

/// Engine replaying a script of outcomes, then repeating a fallback one.
#[derive(Debug)]
pub struct FakeEngine {
    pub script: VecDeque<Outcome>,
    pub fallback: Outcome,
    pub inits: usize,
    pub timeouts: Vec<Milliseconds>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            script: VecDeque::new(),
            fallback: (Ok(()), SessionState::Idle),
            inits: 0,
            timeouts: Vec::new(),
        }
    }
}

impl FakeEngine {
    pub fn scripted(script: &[Outcome]) -> Self {
        Self { script: script.iter().cloned().collect(), ..Default::default() }
    }

    pub fn otherwise(self, result: Result<(), Error>, state: SessionState) -> Self {
        Self { fallback: (result, state), ..self }
    }
}

impl UpdateEngine for FakeEngine {
    fn init(&mut self) -> SessionState {
        self.inits += 1;
        SessionState::Idle
    }

    fn resume(&mut self, state: &mut SessionState, timeout: Milliseconds) -> Result<(), Error> {
        self.timeouts.push(timeout);
        let (result, next) = self.script.pop_front().unwrap_or(self.fallback);
        *state = next;
        result
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Start,
    Stop,
    Reset,
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    pub events: Vec<TransportEvent>,
}

impl Transport for FakeTransport {
    fn start(&mut self) { self.events.push(TransportEvent::Start); }
    fn stop(&mut self) { self.events.push(TransportEvent::Stop); }
    fn reset(&mut self) { self.events.push(TransportEvent::Reset); }
}

/// Validator with a fixed verdict per slot. Nothing is valid by default.
#[derive(Debug)]
pub struct FakeValidator {
    pub valid: [bool; 2],
    /// Reported for invalid slots.
    pub error: Error,
    pub calls: Vec<Slot>,
}

impl Default for FakeValidator {
    fn default() -> Self {
        Self { valid: [false; 2], error: Error::VerifyFailed, calls: Vec::new() }
    }
}

impl Validator for FakeValidator {
    fn validate(&mut self, slot: Slot) -> Result<(), Error> {
        self.calls.push(slot);
        if self.valid[slot.index() as usize] {
            Ok(())
        } else {
            Err(self.error)
        }
    }
}

/// Records switch requests and returns [`INTERCEPTED`] instead of diverging.
#[derive(Debug, Default)]
pub struct FakeSwitch {
    pub executed: Vec<Slot>,
}

impl Switch for FakeSwitch {
    fn execute(&mut self, slot: Slot) -> Result<Infallible, Error> {
        self.executed.push(slot);
        Err(INTERCEPTED)
    }
}

#[derive(Debug)]
pub struct FakeResetCause {
    pub reason: ResetReason,
    /// Clears to ignore before the reason actually goes away.
    pub stubborn: usize,
    pub clears: usize,
}

impl FakeResetCause {
    pub fn new(reason: ResetReason) -> Self { Self { reason, stubborn: 0, clears: 0 } }
}

impl ResetCause for FakeResetCause {
    fn reason(&self) -> ResetReason { self.reason }

    fn clear(&mut self) {
        self.clears += 1;
        if self.stubborn > 0 {
            self.stubborn -= 1;
        } else {
            self.reason = ResetReason::None;
        }
    }
}

#[derive(Debug)]
pub struct FakeSignal {
    pub word: u32,
}

impl Default for FakeSignal {
    fn default() -> Self { Self { word: SwitchRequest::None.encode() } }
}

impl ReadSwitchSignal for FakeSignal {
    fn read_switch_request(&self) -> SwitchRequest { SwitchRequest::decode(self.word) }
}

impl WriteSwitchSignal for FakeSignal {
    fn write_switch_request(&mut self, request: SwitchRequest) { self.word = request.encode(); }
}
