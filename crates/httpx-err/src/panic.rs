//! Turning recovered panic payloads into errors.

use std::any::Any;

use httpx_core::BoxError;
use thiserror::Error;

use crate::response::HttpError;

/// Error standing in for a panic whose payload is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanicError {
    /// The handler panicked with a message.
    #[error("handler panicked: {0}")]
    Message(String),

    /// The handler panicked with a payload that is neither an error nor a string.
    #[error("handler panicked with a non-string payload")]
    NonString,
}

/// Converts a panic payload into an error.
///
/// Payloads that already are errors ([`HttpError`], [`BoxError`],
/// [`anyhow::Error`]) pass through unchanged, so `std::panic::panic_any`
/// with an `HttpError` still produces its response. String payloads become
/// [`PanicError::Message`].
pub fn panic_to_error(payload: Box<dyn Any + Send>) -> BoxError {
    let payload = match payload.downcast::<HttpError>() {
        Ok(err) => return err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<BoxError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(err) => return (*err).into(),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<&'static str>() {
        Ok(message) => return Box::new(PanicError::Message((*message).to_string())),
        Err(payload) => payload,
    };
    match payload.downcast::<String>() {
        Ok(message) => Box::new(PanicError::Message(*message)),
        Err(_) => Box::new(PanicError::NonString),
    }
}
