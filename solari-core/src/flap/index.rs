//! Slot lookup and flap distance
//!
//! The drum only turns counterclockwise, and each counterclockwise flap
//! moves the display from slot `n` to slot `n - 1` (wrapping). Reaching a
//! higher slot therefore means going almost all the way around.

use super::alphabet::FlapAlphabet;

/// Counterclockwise flaps from `current` to `target` on a drum of `flaps` slots
///
/// Always in `0..flaps`. Zero when already there.
pub fn flap_distance(current: u8, target: u8, flaps: u8) -> u8 {
    if flaps == 0 {
        return 0;
    }
    (current as i16 - target as i16).rem_euclid(flaps as i16) as u8
}

/// Symbol-to-slot index over a validated alphabet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlapIndex {
    alphabet: FlapAlphabet,
}

impl FlapIndex {
    pub fn new(alphabet: FlapAlphabet) -> Self {
        Self { alphabet }
    }

    pub fn flaps(&self) -> u8 {
        self.alphabet.len()
    }

    pub fn alphabet(&self) -> &FlapAlphabet {
        &self.alphabet
    }

    /// Slot showing `c`, or `None` if no flap carries it
    pub fn char_to_slot(&self, c: char) -> Option<u8> {
        self.alphabet.slot_of(c)
    }

    /// Symbol printed on `slot`; out-of-range slots wrap
    pub fn symbol(&self, slot: u8) -> char {
        let flaps = self.flaps().max(1);
        self.alphabet.symbol_at(slot % flaps).unwrap_or('?')
    }

    /// Counterclockwise flaps from `current` to `target`
    pub fn distance(&self, current: u8, target: u8) -> u8 {
        flap_distance(current, target, self.flaps())
    }

    /// Slot shown after turning `flaps` flaps counterclockwise from `slot`
    pub fn advance(&self, slot: u8, flaps: u8) -> u8 {
        let n = self.flaps().max(1) as i16;
        (slot as i16 - flaps as i16).rem_euclid(n) as u8
    }
}
