pub mod bitset;
pub mod codes;
pub mod parameters;
pub mod random;
pub mod uf;

pub use bitset::BitString;
pub use codes::{RotatedPlanarCode, StabilizerType, SurfaceCode, ToricCode};
pub use uf::{decode, peel, spanning_trees, uf_decode, DecodeOutcome};
