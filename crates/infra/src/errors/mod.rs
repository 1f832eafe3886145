//! Infrastructure error newtype and conversions

mod conversions;

pub use conversions::InfraError;
