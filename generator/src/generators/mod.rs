mod common;

#[cfg(feature = "generator-rust")]
mod rust;
#[cfg(feature = "generator-solidity")]
mod solidity;

#[cfg(not(any(feature = "generator-rust", feature = "generator-solidity")))]
compile_error!("At least one generator must be enabled");

use clap::ValueEnum;
use dt_datamod::{is_reserved_type_name, Field};

pub use common::GenerateError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Generator {
    #[cfg(feature = "generator-rust")]
    Rust,
    #[cfg(feature = "generator-solidity")]
    Solidity,
}

impl Default for Generator {
    #[cfg(feature = "generator-rust")]
    fn default() -> Self {
        Self::Rust
    }

    #[cfg(not(feature = "generator-rust"))]
    fn default() -> Self {
        Self::Solidity
    }
}

impl Generator {
    /// Emits bindings for a row named `name` holding `fields`.
    pub fn generate(&self, name: &str, fields: &[Field]) -> Result<String, GenerateError> {
        if is_reserved_type_name(name) {
            return Err(GenerateError::ReservedName(name.to_owned()));
        }
        match *self {
            #[cfg(feature = "generator-rust")]
            Self::Rust => rust::generate(name, fields),
            #[cfg(feature = "generator-solidity")]
            Self::Solidity => solidity::generate(name, fields),
        }
    }
}
