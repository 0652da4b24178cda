//! Solari - Split-Flap Display Firmware
//!
//! Main firmware binary for RP2040-based split-flap display units.
//! One unit drives one flap drum: a 28BYJ-48 stepper through a ULN2003,
//! a hall switch for the home magnet, and a status LED. Commands arrive
//! as text lines on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use solari_core::display::DisplayController;
use solari_drivers::{HallSwitch, StatusLed, Uln2003};
use solari_hal_rp2040::{claim_display_pins, PinBank, PinBankPeripherals};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Solari firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Split off the console peripherals; everything else is taken by number
    let (mut bank_pins, console) = PinBankPeripherals::from_peripherals(p);
    let mut bank = PinBank::new(&mut bank_pins);

    let pins = match claim_display_pins(&mut bank, &config.pins) {
        Ok(pins) => pins,
        Err(e) => defmt::panic!("Failed to claim display pins: {}", e),
    };

    let coil_polarity = config.pins.coils.map(|pin| pin.inverted);
    let coils = Uln2003::new(pins.coils, coil_polarity);
    let hall = HallSwitch::new(pins.hall, config.pins.hall.inverted);
    let led = StatusLed::new(pins.led, config.pins.led.inverted);
    info!("Display pins initialized");

    let display = match DisplayController::new(&config, coils, hall, Delay) {
        Ok(display) => display,
        Err(e) => defmt::panic!("Invalid display configuration: {}", e),
    };

    // Setup UART for the command console
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(console.uart0, console.console_tx, console.console_rx, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for console");

    // Spawn tasks
    spawner.spawn(tasks::console_rx_task(rx)).unwrap();
    spawner.spawn(tasks::console_tx_task(tx)).unwrap();
    spawner.spawn(tasks::controller_task(display, led)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
