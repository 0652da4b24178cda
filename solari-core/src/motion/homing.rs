//! Homing against the drum magnet
//!
//! The stepper runs open loop, so the only absolute reference is the single
//! magnet on the flap drum. Homing drives the drum counterclockwise until the
//! hall sensor fires, optionally backs off clockwise until the sensor clears
//! and re-approaches slowly so the final approach always comes from the same
//! side, then applies the fixed calibration offset for this build.
//!
//! A positive offset can leave the drum parked inside the magnet window, so
//! the back-off always runs until the sensor reads clear rather than a fixed
//! step count. Single-phase homing starting on the magnet backs off first.
//!
//! ```text
//! Idle ─▶ FastSeek ─┬─▶ (Single) ──────────────────────────▶ Homed
//!                   └─▶ BackOff ─▶ SlowSeek ─▶ offset ─▶ Homed
//!          any step bound exhausted ────────────────────────▶ Failed
//! ```

use embedded_hal::delay::DelayNs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{DisplayConfig, HomingConfig};
use crate::motion::sequencer::StepSequencer;
use crate::sensor::HallSensor;
use crate::traits::{CoilDriver, Direction, HomeSensor};

/// Direction the drum turns while looking for home
pub const SEEK_DIRECTION: Direction = Direction::CounterClockwise;

/// Homing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhaseMode {
    /// One pass at the normal step delay
    Single,
    /// Fast seek, back off, slow re-approach
    #[default]
    CoarseFine,
}

/// Where the home offset is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OffsetPolicy {
    /// Extra physical steps past the trigger; home slot is reported as-is
    #[default]
    TriggerStep,
    /// Extra physical steps, and the offset is also added to the reported
    /// home slot modulo the flap count
    CalibratedIndex,
}

/// Homing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingState {
    /// Homing not yet run
    Idle,
    /// Stepping toward home at the normal step delay
    FastSeek,
    /// Stepping away from the trigger point
    BackOff,
    /// Re-approaching home at the slow step delay
    SlowSeek,
    /// Last homing run succeeded
    Homed,
    /// Last homing run exhausted a step bound
    Failed,
}

/// Homing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// Sensor not triggered within two revolutions
    FastSeekTimeout { steps: u32 },
    /// Sensor not re-triggered within one flap after backing off
    SlowSeekTimeout { steps: u32 },
    /// Sensor still active after stepping a flap past the back-off
    SensorStuck { steps: u32 },
}

impl core::fmt::Display for HomingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HomingError::FastSeekTimeout { steps } => {
                write!(f, "home sensor not triggered within {} steps", steps)
            }
            HomingError::SlowSeekTimeout { steps } => {
                write!(f, "home sensor lost on slow approach after {} steps", steps)
            }
            HomingError::SensorStuck { steps } => {
                write!(f, "home sensor still active after {} steps off the magnet", steps)
            }
        }
    }
}

/// Result of a successful homing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingOutcome {
    /// Slot the display is now showing
    pub slot: u8,
    /// Steps until the first trigger
    pub fast_steps: u32,
    /// Clockwise steps taken to clear the magnet window
    pub backoff_steps: u32,
    /// Steps until the second trigger (0 for single-phase homing)
    pub slow_steps: u32,
    /// Offset steps applied after the final trigger
    pub offset_steps: u32,
}

/// Homing state machine
pub struct HomingController {
    config: HomingConfig,
    steps_per_revolution: u32,
    steps_per_flap: u32,
    flaps: u8,
    step_delay_us: u32,
    state: HomingState,
}

impl HomingController {
    /// Create a homing controller for a validated display configuration
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            config: config.homing,
            steps_per_revolution: config.steps_per_revolution,
            steps_per_flap: config.steps_per_flap(),
            flaps: config.flaps(),
            step_delay_us: config.step_delay_us,
            state: HomingState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> HomingState {
        self.state
    }

    /// Step bound for the fast seek (two full revolutions)
    pub fn fast_seek_limit(&self) -> u32 {
        self.steps_per_revolution.saturating_mul(2)
    }

    /// Step bound for the slow re-approach (one flap)
    pub fn slow_seek_limit(&self) -> u32 {
        self.steps_per_flap
    }

    /// Step bound for clearing the magnet after `min_steps` of back-off
    pub fn backoff_limit(&self, min_steps: u32) -> u32 {
        min_steps + self.steps_per_flap
    }

    /// Slot reported after a successful run
    pub fn calibrated_slot(&self) -> u8 {
        match self.config.offset_policy {
            OffsetPolicy::TriggerStep => self.config.home_slot,
            OffsetPolicy::CalibratedIndex => {
                let slot = i64::from(self.config.home_slot) + i64::from(self.config.home_offset_steps);
                slot.rem_euclid(i64::from(self.flaps)) as u8
            }
        }
    }

    /// Run the homing sequence
    ///
    /// Coils are released on every exit path. Failures are returned to the
    /// caller and never retried here.
    pub fn home<C, S, D>(
        &mut self,
        sequencer: &mut StepSequencer<C>,
        sensor: &mut HallSensor<S>,
        delay: &mut D,
    ) -> Result<HomingOutcome, HomingError>
    where
        C: CoilDriver,
        S: HomeSensor,
        D: DelayNs,
    {
        let result = self.run(sequencer, sensor, delay);
        sequencer.release();
        self.state = match result {
            Ok(_) => HomingState::Homed,
            Err(_) => HomingState::Failed,
        };
        result
    }

    fn run<C, S, D>(
        &mut self,
        sequencer: &mut StepSequencer<C>,
        sensor: &mut HallSensor<S>,
        delay: &mut D,
    ) -> Result<HomingOutcome, HomingError>
    where
        C: CoilDriver,
        S: HomeSensor,
        D: DelayNs,
    {
        let mut backoff_steps = 0;
        if self.config.phase_mode == PhaseMode::Single && sensor.read(delay).is_home() {
            // Parked on the magnet: leave it so the seek meets the window edge
            self.state = HomingState::BackOff;
            backoff_steps = self.back_off(sequencer, sensor, delay, 0, self.step_delay_us)?;
        }

        self.state = HomingState::FastSeek;
        let fast_limit = self.fast_seek_limit();
        let fast_steps = seek(sequencer, sensor, delay, fast_limit, self.step_delay_us)
            .ok_or(HomingError::FastSeekTimeout { steps: fast_limit })?;

        let (slow_steps, offset_delay_us) = match self.config.phase_mode {
            PhaseMode::Single => (0, self.step_delay_us),
            PhaseMode::CoarseFine => {
                let slow_us = self.config.slow_step_delay_us;

                self.state = HomingState::BackOff;
                let min_steps = u32::from(self.config.backoff_steps);
                backoff_steps = self.back_off(sequencer, sensor, delay, min_steps, slow_us)?;

                self.state = HomingState::SlowSeek;
                let slow_limit = self.slow_seek_limit();
                let steps = seek(sequencer, sensor, delay, slow_limit, slow_us)
                    .ok_or(HomingError::SlowSeekTimeout { steps: slow_limit })?;
                (steps, slow_us)
            }
        };

        let offset = self.config.home_offset_steps;
        let direction = if offset >= 0 {
            SEEK_DIRECTION
        } else {
            SEEK_DIRECTION.opposite()
        };
        let offset_steps = offset.unsigned_abs();
        for _ in 0..offset_steps {
            sequencer.step(direction);
            delay.delay_us(offset_delay_us);
        }

        Ok(HomingOutcome {
            slot: self.calibrated_slot(),
            fast_steps,
            backoff_steps,
            slow_steps,
            offset_steps,
        })
    }

    /// Step clockwise until the sensor reads clear
    ///
    /// At least `min_steps` are taken before the first sample. Fails with
    /// [`HomingError::SensorStuck`] if the magnet is still seen one flap
    /// past that.
    fn back_off<C, S, D>(
        &self,
        sequencer: &mut StepSequencer<C>,
        sensor: &mut HallSensor<S>,
        delay: &mut D,
        min_steps: u32,
        step_delay_us: u32,
    ) -> Result<u32, HomingError>
    where
        C: CoilDriver,
        S: HomeSensor,
        D: DelayNs,
    {
        let limit = self.backoff_limit(min_steps);
        for n in 1..=limit {
            sequencer.step(SEEK_DIRECTION.opposite());
            delay.delay_us(step_delay_us);
            if n >= min_steps && !sensor.read(delay).is_home() {
                return Ok(n);
            }
        }
        Err(HomingError::SensorStuck { steps: limit })
    }
}

/// Step toward home until the sensor fires
///
/// Each step is followed by its settle delay before the sensor is sampled.
/// Returns the number of steps taken, or `None` if `limit` steps pass
/// without a trigger.
fn seek<C, S, D>(
    sequencer: &mut StepSequencer<C>,
    sensor: &mut HallSensor<S>,
    delay: &mut D,
    limit: u32,
    step_delay_us: u32,
) -> Option<u32>
where
    C: CoilDriver,
    S: HomeSensor,
    D: DelayNs,
{
    for n in 1..=limit {
        sequencer.step(SEEK_DIRECTION);
        delay.delay_us(step_delay_us);
        if sensor.read(delay).is_home() {
            return Some(n);
        }
    }
    None
}
