//! Display configuration loading
//!
//! `display.toml` is compiled into the image. If it fails to parse or names
//! pins this board cannot provide, the built-in defaults are used so the
//! unit still comes up.

use defmt::*;

use solari_core::config::{parse_config, DisplayConfig};
use solari_hal_rp2040::gpio::check_pin_map;

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> DisplayConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            error!("Failed to parse display.toml: {}", e);
            error!("Using default configuration");
            DisplayConfig::default()
        }
    };

    let config = match check_pin_map(&config.pins) {
        Ok(()) => config,
        Err(e) => {
            error!("Pin map unusable: {}", e);
            error!("Using default configuration");
            DisplayConfig::default()
        }
    };

    info!(
        "Drum: {} flaps, {} steps/flap ({:?}), {} us/step",
        config.flaps(),
        config.steps_per_flap(),
        config.step_mode,
        config.step_delay_us
    );
    info!(
        "Homing: {:?}, offset {} steps ({:?}), home slot {}",
        config.homing.phase_mode,
        config.homing.home_offset_steps,
        config.homing.offset_policy,
        config.homing.home_slot
    );

    config
}
