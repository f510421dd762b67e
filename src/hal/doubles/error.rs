use crate::error::{Convertible, Error};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FakeError {
    Read,
    Write,
}

impl Convertible for FakeError {
    fn into(self) -> Error {
        match self {
            FakeError::Read => Error::FlashRead,
            FakeError::Write => Error::FlashWrite,
        }
    }
}
