//! Test doubles for the hardware traits

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::motion::StepPattern;
use crate::traits::{CoilDriver, CoilState, HomeSensor};

/// Coil bank that records every write
#[derive(Debug, Default)]
pub struct RecordingCoils {
    pub writes: Vec<CoilState>,
}

impl RecordingCoils {
    /// Last written coil state
    pub fn current(&self) -> CoilState {
        self.writes.last().copied().unwrap_or(CoilState::OFF)
    }
}

impl CoilDriver for RecordingCoils {
    fn energize(&mut self, state: CoilState) {
        self.writes.push(state);
    }
}

/// Delay that only accumulates requested time
#[derive(Debug, Default, Clone)]
pub struct FakeDelay {
    pub elapsed_ns: Rc<RefCell<u64>>,
}

impl FakeDelay {
    pub fn elapsed_us(&self) -> u64 {
        *self.elapsed_ns.borrow() / 1_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.elapsed_ns.borrow_mut() += u64::from(ns);
    }
}

/// Sensor that replays a fixed sequence of levels, then holds `idle`
#[derive(Debug)]
pub struct ScriptedSensor {
    pub levels: VecDeque<bool>,
    pub idle: bool,
    pub reads: usize,
}

impl ScriptedSensor {
    pub fn new(levels: &[bool], idle: bool) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            idle,
            reads: 0,
        }
    }
}

impl HomeSensor for ScriptedSensor {
    fn level(&mut self) -> bool {
        self.reads += 1;
        self.levels.pop_front().unwrap_or(self.idle)
    }
}

/// Physical state of a simulated flap drum
#[derive(Debug)]
pub struct Drum {
    pattern: StepPattern,
    /// Pattern entry the rotor is aligned with (sequencers start at 0)
    last_index: usize,
    /// Net steps taken, clockwise positive
    pub position: i64,
    pub steps_per_revolution: i64,
    /// Magnet window `[start, start + width)` in steps, if a magnet is fitted
    pub magnet: Option<(i64, i64)>,
    /// Coils currently energized
    pub energized: bool,
    pub steps_taken: u64,
}

impl Drum {
    /// Shaft angle in steps, wrapped to one revolution
    pub fn angle(&self) -> i64 {
        self.position.rem_euclid(self.steps_per_revolution)
    }

    fn magnet_present(&self) -> bool {
        match self.magnet {
            Some((start, width)) => {
                let offset = (self.angle() - start).rem_euclid(self.steps_per_revolution);
                offset < width
            }
            None => false,
        }
    }
}

/// Simulated motor + hall sensor sharing one drum
///
/// The coil side infers direction from successive pattern entries, the same
/// way the real rotor follows the field.
#[derive(Debug, Clone)]
pub struct SimDrum {
    pub drum: Rc<RefCell<Drum>>,
}

impl SimDrum {
    pub fn new(pattern: StepPattern, steps_per_revolution: i64, magnet: Option<(i64, i64)>) -> Self {
        Self {
            drum: Rc::new(RefCell::new(Drum {
                pattern,
                last_index: 0,
                position: 0,
                steps_per_revolution,
                magnet,
                energized: false,
                steps_taken: 0,
            })),
        }
    }

    pub fn coils(&self) -> SimCoils {
        SimCoils {
            drum: self.drum.clone(),
        }
    }

    pub fn hall(&self) -> SimHall {
        SimHall {
            drum: self.drum.clone(),
        }
    }

    pub fn position(&self) -> i64 {
        self.drum.borrow().position
    }

    pub fn angle(&self) -> i64 {
        self.drum.borrow().angle()
    }

    pub fn is_energized(&self) -> bool {
        self.drum.borrow().energized
    }

    pub fn steps_taken(&self) -> u64 {
        self.drum.borrow().steps_taken
    }

    pub fn set_position(&self, position: i64) {
        self.drum.borrow_mut().position = position;
    }

    pub fn remove_magnet(&self) {
        self.drum.borrow_mut().magnet = None;
    }
}

pub struct SimCoils {
    drum: Rc<RefCell<Drum>>,
}

impl CoilDriver for SimCoils {
    fn energize(&mut self, state: CoilState) {
        let mut drum = self.drum.borrow_mut();
        if state.is_off() {
            drum.energized = false;
            return;
        }
        let index = drum
            .pattern
            .index_of(state)
            .expect("coil state outside the step table");
        let last = drum.last_index;
        let len = drum.pattern.len();
        if index == (last + 1) % len {
            drum.position += 1;
            drum.steps_taken += 1;
        } else if index == (last + len - 1) % len {
            drum.position -= 1;
            drum.steps_taken += 1;
        }
        drum.last_index = index;
        drum.energized = true;
    }
}

/// Active-low hall switch looking at the simulated drum
pub struct SimHall {
    drum: Rc<RefCell<Drum>>,
}

impl HomeSensor for SimHall {
    fn level(&mut self) -> bool {
        !self.drum.borrow().magnet_present()
    }
}
