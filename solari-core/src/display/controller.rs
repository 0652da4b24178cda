//! Top-level display orchestration
//!
//! The controller must home before it accepts display commands. A failed
//! startup homing halts the session. A failed re-home keeps the believed
//! position but marks it unreliable until the next successful re-home.
//!
//! Everything here is blocking: each step is followed by its settle delay,
//! and a move or homing run always finishes or exhausts its step bound.

use embedded_hal::delay::DelayNs;
use solari_protocol::{Command, Reply};

use crate::config::{ConfigError, DisplayConfig};
use crate::flap::FlapIndex;
use crate::motion::{HomingController, HomingError, HomingOutcome, StepSequencer};
use crate::sensor::{HallReading, HallSensor};
use crate::state::{Event, State};
use crate::traits::{CoilDriver, Direction, HomeSensor};

/// Direction of every flap move
pub const MOVE_DIRECTION: Direction = Direction::CounterClockwise;

/// Display command errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Startup homing has not completed
    NotHomed,
    /// Session ended after a fatal startup failure
    Halted,
    /// No flap carries this character
    InvalidCharacter(char),
    /// Homing did not find the magnet
    Homing(HomingError),
}

impl From<HomingError> for DisplayError {
    fn from(e: HomingError) -> Self {
        DisplayError::Homing(e)
    }
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::NotHomed => f.write_str("display not homed"),
            DisplayError::Halted => f.write_str("display halted"),
            DisplayError::InvalidCharacter(c) => write!(f, "no flap for '{}'", c),
            DisplayError::Homing(e) => write!(f, "{}", e),
        }
    }
}

/// Result of a successful `go_to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// Target was already showing; the motor did not move
    AlreadyShowing { slot: u8 },
    /// Drum turned `flaps` flaps counterclockwise
    Moved { from: u8, to: u8, flaps: u8 },
}

/// Snapshot of the controller for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayStatus {
    pub state: State,
    /// Believed slot
    pub slot: u8,
    pub symbol: char,
    /// Position backed by a successful homing
    pub trusted: bool,
}

/// Split-flap display controller
///
/// Generic over the coil bank, the raw hall input and the blocking delay
/// so the same logic runs on hardware and in host tests.
pub struct DisplayController<C, S, D> {
    sequencer: StepSequencer<C>,
    sensor: HallSensor<S>,
    delay: D,
    homing: HomingController,
    index: FlapIndex,
    steps_per_flap: u32,
    step_delay_us: u32,
    position: u8,
    state: State,
}

impl<C, S, D> DisplayController<C, S, D>
where
    C: CoilDriver,
    S: HomeSensor,
    D: DelayNs,
{
    /// Create a controller; coils start released and the state is `Boot`
    pub fn new(config: &DisplayConfig, coils: C, sensor: S, delay: D) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            sequencer: StepSequencer::new(coils, config.step_mode),
            sensor: HallSensor::new(sensor, config.sensor),
            delay,
            homing: HomingController::new(config),
            index: FlapIndex::new(config.alphabet.clone()),
            steps_per_flap: config.steps_per_flap(),
            step_delay_us: config.step_delay_us,
            position: config.homing.home_slot,
            state: State::Boot,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Believed slot; meaningless before the first successful homing
    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn index(&self) -> &FlapIndex {
        &self.index
    }

    pub fn status(&self) -> DisplayStatus {
        DisplayStatus {
            state: self.state,
            slot: self.position,
            symbol: self.index.symbol(self.position),
            trusted: self.state.position_trusted(),
        }
    }

    /// Startup homing
    ///
    /// On failure the controller is `Halted` with coils released, and the
    /// caller is expected to end the session.
    pub fn start(&mut self) -> Result<HomingOutcome, DisplayError> {
        match self.state {
            State::Boot => self.run_homing(),
            State::Halted => Err(DisplayError::Halted),
            _ => self.rehome(),
        }
    }

    /// Re-run homing on demand
    ///
    /// On success the position resets to the calibrated home slot. On
    /// failure the position is left unchanged and marked unreliable.
    pub fn rehome(&mut self) -> Result<HomingOutcome, DisplayError> {
        match self.state {
            State::Boot => self.start(),
            State::Halted => Err(DisplayError::Halted),
            _ => self.run_homing(),
        }
    }

    /// Turn the drum until `c` shows
    ///
    /// Characters with no flap are rejected without moving the motor.
    pub fn go_to(&mut self, c: char) -> Result<MoveOutcome, DisplayError> {
        match self.state {
            State::Halted => return Err(DisplayError::Halted),
            s if !s.accepts_moves() => return Err(DisplayError::NotHomed),
            _ => {}
        }

        let target = self
            .index
            .char_to_slot(c)
            .ok_or(DisplayError::InvalidCharacter(c))?;

        if target == self.position {
            return Ok(MoveOutcome::AlreadyShowing { slot: target });
        }

        let from = self.position;
        let flaps = self.index.distance(from, target);

        self.apply(Event::MoveStarted);
        for _ in 0..flaps {
            self.advance_one_flap();
        }
        self.sequencer.release();
        self.apply(Event::MoveFinished);

        Ok(MoveOutcome::Moved {
            from,
            to: target,
            flaps,
        })
    }

    /// Debounced hall reading at the current drum angle
    pub fn sense(&mut self) -> HallReading {
        self.sensor.read(&mut self.delay)
    }

    /// Run startup homing and report the result as a reply
    pub fn startup(&mut self) -> Reply {
        match self.start() {
            Ok(outcome) => Reply::Ready {
                slot: outcome.slot,
                symbol: self.index.symbol(outcome.slot),
            },
            Err(e) => Self::error_reply(e),
        }
    }

    /// Execute one command and build its reply
    pub fn dispatch(&mut self, command: Command) -> Reply {
        if self.state.is_halted() {
            return Reply::Halted;
        }

        match command {
            Command::Show(c) => match self.go_to(c) {
                Ok(MoveOutcome::AlreadyShowing { slot }) => {
                    Reply::AlreadyShowing(self.index.symbol(slot))
                }
                Ok(MoveOutcome::Moved { from, to, flaps }) => Reply::Moved {
                    from: self.index.symbol(from),
                    to: self.index.symbol(to),
                    flaps,
                },
                Err(e) => Self::error_reply(e),
            },
            Command::Home => match self.rehome() {
                Ok(outcome) => Reply::Homed {
                    slot: outcome.slot,
                    symbol: self.index.symbol(outcome.slot),
                },
                Err(e) => Self::error_reply(e),
            },
            Command::Status => {
                let status = self.status();
                Reply::Status {
                    slot: status.slot,
                    symbol: status.symbol,
                    trusted: status.trusted,
                }
            }
            Command::Hall => Reply::Hall {
                home_detected: self.sense().is_home(),
            },
            Command::Invalid => Reply::Rejected,
        }
    }

    /// Dispatch commands from `commands` until it runs dry or the session halts
    pub fn serve<I, F>(&mut self, commands: I, mut sink: F)
    where
        I: IntoIterator<Item = Command>,
        F: FnMut(Reply),
    {
        for command in commands {
            sink(self.dispatch(command));
            if self.state.is_halted() {
                break;
            }
        }
    }

    /// Release the coils and hand back the hardware
    pub fn release(mut self) -> (C, S, D) {
        self.sequencer.release();
        (self.sequencer.into_coils(), self.sensor.into_inner(), self.delay)
    }

    fn run_homing(&mut self) -> Result<HomingOutcome, DisplayError> {
        self.apply(Event::HomingStarted);
        match self
            .homing
            .home(&mut self.sequencer, &mut self.sensor, &mut self.delay)
        {
            Ok(outcome) => {
                self.position = outcome.slot;
                self.apply(Event::HomingSucceeded);
                Ok(outcome)
            }
            Err(e) => {
                self.apply(Event::HomingFailed);
                Err(e.into())
            }
        }
    }

    /// One flap counterclockwise, ending with the coils still energized
    fn advance_one_flap(&mut self) {
        for _ in 0..self.steps_per_flap {
            self.sequencer.step(MOVE_DIRECTION);
            self.delay.delay_us(self.step_delay_us);
        }
        self.position = self.index.advance(self.position, 1);
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }

    fn error_reply(error: DisplayError) -> Reply {
        match error {
            DisplayError::NotHomed => Reply::NotHomed,
            DisplayError::Halted => Reply::Halted,
            DisplayError::InvalidCharacter(c) => Reply::UnknownSymbol(c),
            DisplayError::Homing(HomingError::FastSeekTimeout { steps }) => {
                Reply::HomingFailed { steps }
            }
            DisplayError::Homing(HomingError::SlowSeekTimeout { steps }) => {
                Reply::HomeLost { steps }
            }
            DisplayError::Homing(HomingError::SensorStuck { steps }) => {
                Reply::SensorStuck { steps }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::motion::PhaseMode;
    use crate::testing::{FakeDelay, RecordingCoils, ScriptedSensor, SimCoils, SimDrum, SimHall};

    const MAGNET_START: i64 = 1000;
    const MAGNET_WIDTH: i64 = 12;
    const TRIGGER_ANGLE: i64 = MAGNET_START + MAGNET_WIDTH - 1;

    type SimController = DisplayController<SimCoils, SimHall, FakeDelay>;

    fn rig(config: &DisplayConfig) -> (SimDrum, FakeDelay, SimController) {
        let drum = SimDrum::new(
            config.step_mode.pattern(),
            config.steps_per_revolution as i64,
            Some((MAGNET_START, MAGNET_WIDTH)),
        );
        let delay = FakeDelay::default();
        let controller =
            DisplayController::new(config, drum.coils(), drum.hall(), delay.clone()).unwrap();
        (drum, delay, controller)
    }

    fn started() -> (SimDrum, FakeDelay, SimController) {
        let (drum, delay, mut controller) = rig(&DisplayConfig::default());
        controller.start().unwrap();
        (drum, delay, controller)
    }

    #[test]
    fn test_commands_rejected_before_homing() {
        let (drum, _, mut controller) = rig(&DisplayConfig::default());
        assert_eq!(controller.state(), State::Boot);
        assert_eq!(controller.go_to('A'), Err(DisplayError::NotHomed));
        assert_eq!(controller.dispatch(Command::Show('A')), Reply::NotHomed);
        assert_eq!(drum.steps_taken(), 0);
    }

    #[test]
    fn test_startup_homes_to_home_slot() {
        let (drum, _, mut controller) = rig(&DisplayConfig::default());
        assert_eq!(controller.startup(), Reply::Ready { slot: 18, symbol: 'I' });
        assert_eq!(controller.state(), State::Ready);
        assert_eq!(controller.position(), 18);
        assert_eq!(drum.angle(), TRIGGER_ANGLE);
        assert!(!drum.is_energized());
    }

    #[test]
    fn test_move_from_i_to_q() {
        let (drum, delay, mut controller) = started();
        let steps_before = drum.steps_taken();
        let time_before = delay.elapsed_us();

        let outcome = controller.go_to('Q').unwrap();

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: 18,
                to: 26,
                flaps: 28
            }
        );
        assert_eq!(controller.position(), 26);
        assert_eq!(controller.state(), State::Ready);
        assert_eq!(drum.steps_taken() - steps_before, 28 * 113);
        assert_eq!(drum.angle(), (TRIGGER_ANGLE - 28 * 113).rem_euclid(4096));
        assert_eq!(delay.elapsed_us() - time_before, 28 * 113 * 2_000);
        assert!(!drum.is_energized());
    }

    #[test]
    fn test_repeat_target_is_noop() {
        let (drum, _, mut controller) = started();
        controller.go_to('Q').unwrap();
        let steps = drum.steps_taken();

        assert_eq!(
            controller.go_to('q'),
            Ok(MoveOutcome::AlreadyShowing { slot: 26 })
        );
        assert_eq!(drum.steps_taken(), steps);
    }

    #[test]
    fn test_invalid_character_never_moves() {
        let (drum, _, mut controller) = started();
        let steps = drum.steps_taken();

        assert_eq!(
            controller.go_to('#'),
            Err(DisplayError::InvalidCharacter('#'))
        );
        assert_eq!(drum.steps_taken(), steps);
        assert_eq!(controller.state(), State::Ready);
    }

    #[test]
    fn test_startup_failure_halts() {
        let (drum, _, mut controller) = rig(&DisplayConfig::default());
        drum.remove_magnet();

        assert_eq!(
            controller.start(),
            Err(DisplayError::Homing(HomingError::FastSeekTimeout { steps: 8192 }))
        );
        assert_eq!(controller.state(), State::Halted);
        assert!(!drum.is_energized());

        let steps = drum.steps_taken();
        assert_eq!(controller.go_to('A'), Err(DisplayError::Halted));
        assert_eq!(controller.rehome(), Err(DisplayError::Halted));
        assert_eq!(controller.dispatch(Command::Status), Reply::Halted);
        assert_eq!(drum.steps_taken(), steps);
    }

    #[test]
    fn test_startup_failure_reply() {
        let (drum, _, mut controller) = rig(&DisplayConfig::default());
        drum.remove_magnet();
        assert_eq!(controller.startup(), Reply::HomingFailed { steps: 8192 });
        assert!(controller.state().is_halted());
    }

    #[test]
    fn test_slow_approach_failure_reply() {
        let config = DisplayConfig::default();
        // Magnet seen on the first fast step only
        let sensor = ScriptedSensor::new(&[false; 5], true);
        let mut controller =
            DisplayController::new(&config, RecordingCoils::default(), sensor, FakeDelay::default())
                .unwrap();

        assert_eq!(
            controller.startup(),
            Reply::HomeLost {
                steps: config.steps_per_flap()
            }
        );
        assert!(controller.state().is_halted());
    }

    #[test]
    fn test_rehome_with_offset_lands_on_same_angle() {
        let mut config = DisplayConfig::default();
        config.homing.home_offset_steps = 7;
        let (drum, _, mut controller) = rig(&config);

        controller.start().unwrap();
        assert_eq!(drum.angle(), TRIGGER_ANGLE - 7);

        for _ in 0..2 {
            controller.rehome().unwrap();
            assert_eq!(drum.angle(), TRIGGER_ANGLE - 7);
            assert_eq!(controller.position(), config.homing.home_slot);
        }

        // And after a full move away
        controller.go_to('Q').unwrap();
        controller.rehome().unwrap();
        assert_eq!(drum.angle(), TRIGGER_ANGLE - 7);
    }

    #[test]
    fn test_failed_rehome_keeps_position() {
        let (drum, _, mut controller) = started();
        controller.go_to('Q').unwrap();
        drum.remove_magnet();

        let result = controller.rehome();

        assert!(matches!(result, Err(DisplayError::Homing(_))));
        assert_eq!(controller.position(), 26);
        assert_eq!(controller.state(), State::Unreliable);
        assert!(!controller.status().trusted);
        assert!(!drum.is_energized());

        // Moves are still allowed but stay unreliable
        assert_eq!(
            controller.go_to('R'),
            Ok(MoveOutcome::Moved {
                from: 26,
                to: 27,
                flaps: 35
            })
        );
        assert_eq!(controller.state(), State::Unreliable);
    }

    #[test]
    fn test_rehome_resets_position() {
        let (drum, _, mut controller) = started();
        controller.go_to('Q').unwrap();

        let outcome = controller.rehome().unwrap();

        assert_eq!(outcome.slot, 18);
        assert_eq!(controller.position(), 18);
        assert_eq!(controller.state(), State::Ready);
        assert_eq!(drum.angle(), TRIGGER_ANGLE);
    }

    #[test]
    fn test_rehome_before_start_is_startup() {
        let (drum, _, mut controller) = rig(&DisplayConfig::default());
        drum.remove_magnet();
        assert!(controller.rehome().is_err());
        assert_eq!(controller.state(), State::Halted);
    }

    #[test]
    fn test_serve_script() {
        let (_, _, mut controller) = started();
        let script = [
            Command::Show('q'),
            Command::Show('Q'),
            Command::Show('#'),
            Command::Invalid,
            Command::Status,
            Command::Home,
            Command::Hall,
        ];
        let mut replies = Vec::new();

        controller.serve(script, |reply| replies.push(reply));

        assert_eq!(
            replies,
            [
                Reply::Moved {
                    from: 'I',
                    to: 'Q',
                    flaps: 28
                },
                Reply::AlreadyShowing('Q'),
                Reply::UnknownSymbol('#'),
                Reply::Rejected,
                Reply::Status {
                    slot: 26,
                    symbol: 'Q',
                    trusted: true
                },
                Reply::Homed { slot: 18, symbol: 'I' },
                Reply::Hall {
                    home_detected: true
                },
            ]
        );
    }

    #[test]
    fn test_serve_stops_when_halted() {
        let (drum, _, mut controller) = rig(&DisplayConfig::default());
        drum.remove_magnet();
        let mut replies = Vec::new();

        controller.serve(
            [Command::Home, Command::Show('A'), Command::Status],
            |reply| replies.push(reply),
        );

        assert_eq!(replies, [Reply::HomingFailed { steps: 8192 }]);
    }

    #[test]
    fn test_single_phase_full_step() {
        let mut config = DisplayConfig::default();
        config.step_mode = crate::motion::StepMode::FullStep;
        config.steps_per_revolution = 2048;
        config.homing.phase_mode = PhaseMode::Single;
        let (drum, _, mut controller) = rig(&config);

        controller.start().unwrap();
        let before = drum.steps_taken();
        controller.go_to('0').unwrap();

        assert_eq!(controller.position(), 0);
        assert_eq!(drum.steps_taken() - before, 18 * 56);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = DisplayConfig::default();
        config.sensor.samples = 0;
        let drum = SimDrum::new(config.step_mode.pattern(), 4096, None);
        let result = DisplayController::new(&config, drum.coils(), drum.hall(), FakeDelay::default());
        assert!(matches!(result, Err(ConfigError::NoSamples)));
    }
}
