//! The interface generated bindings run behind.

use thiserror::Error;

use crate::codec;

#[derive(Debug, Error)]
pub enum PrecompileError {
    #[error("execution reverted: {0}")]
    Reverted(String),
    #[error(transparent)]
    Codec(#[from] codec::Error),
}

pub trait Precompile {
    /// Whether running `input` leaves state untouched.
    fn is_static(&self, input: &[u8]) -> bool;

    fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError>;
}

/// Accepts any input and does nothing.
#[derive(Debug, Default, Copy, Clone)]
pub struct BlankPrecompile;

impl Precompile for BlankPrecompile {
    fn is_static(&self, _input: &[u8]) -> bool {
        true
    }

    fn run(&self, _input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
        Ok(Vec::new())
    }
}
