//! Home position sensor trait

/// A single digital sensor line marking the home position
///
/// Implementations return the raw electrical level without debouncing or
/// polarity handling; [`crate::sensor::HallSensor`] does both.
pub trait HomeSensor {
    /// Sample the line once; `true` means the line reads high
    fn level(&mut self) -> bool;
}

impl<T: HomeSensor + ?Sized> HomeSensor for &mut T {
    fn level(&mut self) -> bool {
        (**self).level()
    }
}
