//! Correlation functionals.

pub mod pbe;
pub mod pw92;
pub mod pz;

pub use pbe::PBECorrelation;
pub use pw92::PW92;
pub use pz::PZ81;
