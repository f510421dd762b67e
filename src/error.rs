//! Error type for the update orchestrator as a whole.

/// Top level error type. Driver specific errors are converted into
/// it through [`Convertible`], so they can be propagated with `?`
/// from any layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Error caused by a low level peripheral driver
    DriverError(&'static str),
    /// Error caused by a faulty configuration
    ConfigurationError(&'static str),
    /// Error caused by a high level device driver
    DeviceError(&'static str),
    /// A flash read cycle failed.
    FlashRead,
    /// A flash program/erase cycle failed.
    FlashWrite,
    /// A metadata row is malformed or fails its integrity check.
    MetadataInvalid,
    /// An application image failed its integrity or signature check.
    VerifyFailed,
    /// No activity within the expected window.
    Timeout,
    /// The update exchange failed for any other reason.
    Protocol,
    /// The switch primitive refused to hand control to a slot.
    SlotNotBootable,
    /// No update arrived within the idle window and the user
    /// application is not valid either.
    NoValidImage,
}

/// Implemented by driver errors that can be expressed as a top level [`Error`].
pub trait Convertible {
    fn into(self) -> Error;
}

impl<T: Convertible> From<T> for Error {
    fn from(t: T) -> Self { t.into() }
}

impl Error {
    /// Whether this error must stop the device rather than restart the
    /// update session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::FlashRead
                | Error::FlashWrite
                | Error::NoValidImage
                | Error::ConfigurationError(_)
                | Error::DriverError(_)
        )
    }

    /// Reports the error through the logger.
    pub fn report(&self) {
        match self {
            Error::DriverError(text) => {
                log_error!("[Driver Error] -> {}", text);
            }
            Error::ConfigurationError(text) => {
                log_error!("[Configuration Error] -> {}", text);
            }
            Error::DeviceError(text) => {
                log_error!("[Device Error] -> {}", text);
            }
            Error::FlashRead => {
                log_error!("[Flash Error] -> Read cycle failed");
            }
            Error::FlashWrite => {
                log_error!("[Flash Error] -> Program/erase cycle failed");
            }
            Error::MetadataInvalid => {
                log_error!("[Logic Error] -> Metadata row is invalid");
            }
            Error::VerifyFailed => {
                log_error!("[Logic Error] -> Application image failed verification");
            }
            Error::Timeout => {
                log_error!("[Session Error] -> No activity from host");
            }
            Error::Protocol => {
                log_error!("[Session Error] -> Update exchange failed");
            }
            Error::SlotNotBootable => {
                log_error!("[Logic Error] -> Slot does not hold a bootable vector table");
            }
            Error::NoValidImage => {
                log_error!("[Logic Error] -> No update received and no valid application");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug)]
    enum FakeDriverError {
        Busy,
    }

    impl Convertible for FakeDriverError {
        fn into(self) -> Error {
            match self {
                FakeDriverError::Busy => Error::DriverError("Fake driver busy"),
            }
        }
    }

    fn failing_driver_call() -> Result<(), FakeDriverError> { Err(FakeDriverError::Busy) }

    fn propagating_call() -> Result<(), Error> {
        failing_driver_call()?;
        Ok(())
    }

    #[test]
    fn driver_errors_propagate_through_question_mark() {
        assert_eq!(propagating_call(), Err(Error::DriverError("Fake driver busy")));
    }

    #[test]
    fn only_storage_and_terminal_errors_are_fatal() {
        assert!(Error::FlashWrite.is_fatal());
        assert!(Error::NoValidImage.is_fatal());
        assert!(!Error::VerifyFailed.is_fatal());
        assert!(!Error::Timeout.is_fatal());
        assert!(!Error::Protocol.is_fatal());
        assert!(!Error::MetadataInvalid.is_fatal());
    }
}
