//! Flap drum indexing
//!
//! Maps printed symbols to drum slots and computes how many flaps the drum
//! must turn to get from one slot to another.

pub mod alphabet;
pub mod index;

pub use alphabet::{AlphabetError, FlapAlphabet, DEFAULT_ALPHABET, MAX_FLAPS};
pub use index::{flap_distance, FlapIndex};
