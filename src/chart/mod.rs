//! Chart Module
//!
//! Pure chart computation over an [`EphemerisProvider`](crate::ephemeris::EphemerisProvider):
//! assembly of full charts, aspect detection and minor-body extras.

pub mod aspects;
mod assembler;
mod extras;

pub use aspects::{detect_aspects, ASPECT_BODIES};
pub use assembler::ChartAssembler;
pub use extras::ExtrasCalculator;
