//! Display controller task
//!
//! Owns the display and runs every motor operation. Moves and homing runs
//! block the executor for their whole duration: step settle times and
//! sensor sample spacing are real waits, not cooperative pacing.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Delay, Timer};

use solari_core::display::DisplayController;
use solari_drivers::{HallSwitch, StatusLed, Uln2003};
use solari_protocol::{Command, Reply};

use crate::channels::{COMMAND_CHANNEL, REPLY_CHANNEL};

/// The display as wired on the board
pub type Display = DisplayController<Uln2003<Output<'static>>, HallSwitch<Input<'static>>, Delay>;

/// Startup blink count and period
const BOOT_BLINKS: u8 = 3;
const BOOT_BLINK_MS: u64 = 200;

/// Time for console TX to flush the final reply before halting
const HALT_FLUSH_MS: u64 = 100;

/// Controller task - homes the drum, then serves console commands
#[embassy_executor::task]
pub async fn controller_task(mut display: Display, mut led: StatusLed<Output<'static>>) {
    info!("Controller task started");

    for _ in 0..BOOT_BLINKS {
        led.set(true);
        Timer::after_millis(BOOT_BLINK_MS).await;
        led.set(false);
        Timer::after_millis(BOOT_BLINK_MS).await;
    }

    info!("Startup homing");
    let reply = display.startup();
    led.show(display.state());
    REPLY_CHANNEL.send(reply).await;

    if display.state().is_halted() {
        error!("Startup homing failed: {:?}", reply);
        Timer::after_millis(HALT_FLUSH_MS).await;
        // Homing already released the coils; make it explicit before aborting
        let _ = display.release();
        defmt::panic!("no home reference, session halted");
    }

    let status = display.status();
    info!("Ready at slot {} ({})", status.slot, status.symbol);

    loop {
        let command = COMMAND_CHANNEL.receive().await;

        if command == Command::Home {
            led.set(false);
        }

        let before = display.state();
        let reply = display.dispatch(command);
        let after = display.state();

        if before != after {
            info!("State: {:?} -> {:?}", before, after);
        }
        log_reply(&reply);

        led.show(after);
        REPLY_CHANNEL.send(reply).await;
    }
}

fn log_reply(reply: &Reply) {
    match reply {
        Reply::Moved { from, to, flaps } => info!("Moved {} -> {} ({} flaps)", from, to, flaps),
        Reply::Homed { slot, symbol } => info!("Homed at slot {} ({})", slot, symbol),
        Reply::HomingFailed { steps } => {
            warn!("Home not found after {} steps, position unreliable", steps)
        }
        Reply::HomeLost { steps } => {
            warn!("Home lost on slow approach after {} steps, position unreliable", steps)
        }
        Reply::SensorStuck { steps } => {
            error!("Hall sensor still active after {} steps off the magnet", steps)
        }
        r if r.is_error() => warn!("Command failed: {:?}", r),
        r => debug!("Reply: {:?}", r),
    }
}
