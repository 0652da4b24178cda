//! Minimal TOML parser for display configuration
//!
//! Handles only the subset `display.toml` uses. It does NOT support the full
//! TOML grammar and never allocates.
//!
//! Supported:
//! - `[section]` headers: `motor`, `flaps`, `sensor`, `homing`, `pins`
//! - `key = value` with string, integer and boolean values
//! - Pin strings like `"gpio11"`, `"!gpio12"` (inverted), `"^gpio18"` (pull-up)
//! - Comments (`# ...`), including trailing comments outside strings
//!
//! Keys that are absent keep their defaults. The parsed config is validated
//! before it is returned.

use super::hardware::PinConfig;
use super::types::{ConfigError, DisplayConfig};
use crate::flap::FlapAlphabet;
use crate::motion::{OffsetPolicy, PhaseMode, StepMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Motor,
    Flaps,
    Sensor,
    Homing,
    Pins,
}

/// Parse and validate a TOML display configuration
pub fn parse_config(input: &str) -> Result<DisplayConfig, ConfigError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for (number, line) in input.lines().enumerate() {
        let line_no = (number + 1).min(u16::MAX as usize) as u16;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ConfigError::Syntax { line: line_no });
            }
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ConfigError::UnknownSection { line: line_no })?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ConfigError::Syntax { line: line_no })?;
        apply_value(section, key, value, line_no, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "motor" => Some(Section::Motor),
        "flaps" => Some(Section::Flaps),
        "sensor" => Some(Section::Sensor),
        "homing" => Some(Section::Homing),
        "pins" => Some(Section::Pins),
        _ => None,
    }
}

/// Drop a trailing `# comment` unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Option<&str> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

/// Parse an integer value, allowing `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).ok()?;
    }
    digits.parse().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio18"
fn parse_pin(value: &str) -> Option<PinConfig> {
    let mut s = parse_string(value)?;
    let mut inverted = false;
    let mut pull_up = false;

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let pin = s.strip_prefix("gpio")?.parse().ok()?;

    Some(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

fn parse_step_mode(value: &str) -> Option<StepMode> {
    match parse_string(value)? {
        "full" | "full_step" => Some(StepMode::FullStep),
        "half" | "half_step" => Some(StepMode::HalfStep),
        _ => None,
    }
}

fn parse_phase_mode(value: &str) -> Option<PhaseMode> {
    match parse_string(value)? {
        "single" => Some(PhaseMode::Single),
        "coarse_fine" => Some(PhaseMode::CoarseFine),
        _ => None,
    }
}

fn parse_offset_policy(value: &str) -> Option<OffsetPolicy> {
    match parse_string(value)? {
        "trigger_step" => Some(OffsetPolicy::TriggerStep),
        "calibrated_index" => Some(OffsetPolicy::CalibratedIndex),
        _ => None,
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    line: u16,
    config: &mut DisplayConfig,
) -> Result<(), ConfigError> {
    let invalid = ConfigError::InvalidValue { line };
    let bad_pin = ConfigError::InvalidPin { line };

    match (section, key) {
        (Section::Motor, "step_mode") => {
            config.step_mode = parse_step_mode(value).ok_or(invalid)?
        }
        (Section::Motor, "steps_per_revolution") => {
            config.steps_per_revolution = parse_int(value).ok_or(invalid)?
        }
        (Section::Motor, "step_delay_us") => {
            config.step_delay_us = parse_int(value).ok_or(invalid)?
        }

        (Section::Flaps, "alphabet") => {
            let symbols = parse_string(value).ok_or(invalid)?;
            config.alphabet = FlapAlphabet::new(symbols)?;
        }

        (Section::Sensor, "samples") => config.sensor.samples = parse_int(value).ok_or(invalid)?,
        (Section::Sensor, "sample_interval_us") => {
            config.sensor.sample_interval_us = parse_int(value).ok_or(invalid)?
        }
        (Section::Sensor, "active_low") => {
            config.sensor.active_low = parse_bool(value).ok_or(invalid)?
        }

        (Section::Homing, "mode") => {
            config.homing.phase_mode = parse_phase_mode(value).ok_or(invalid)?
        }
        (Section::Homing, "offset_policy") => {
            config.homing.offset_policy = parse_offset_policy(value).ok_or(invalid)?
        }
        (Section::Homing, "offset_steps") => {
            config.homing.home_offset_steps = parse_int(value).ok_or(invalid)?
        }
        (Section::Homing, "backoff_steps") => {
            config.homing.backoff_steps = parse_int(value).ok_or(invalid)?
        }
        (Section::Homing, "home_slot") => {
            config.homing.home_slot = parse_int(value).ok_or(invalid)?
        }
        (Section::Homing, "home_symbol") => {
            // Resolved against whatever alphabet has been read so far
            let symbol = parse_string(value).ok_or(invalid)?;
            let mut chars = symbol.chars();
            let slot = match (chars.next(), chars.next()) {
                (Some(c), None) => config.alphabet.slot_of(c),
                _ => None,
            };
            config.homing.home_slot = slot.ok_or(invalid)?;
        }
        (Section::Homing, "slow_step_delay_us") => {
            config.homing.slow_step_delay_us = parse_int(value).ok_or(invalid)?
        }

        (Section::Pins, "coil_a") => config.pins.coils[0] = parse_pin(value).ok_or(bad_pin)?,
        (Section::Pins, "coil_b") => config.pins.coils[1] = parse_pin(value).ok_or(bad_pin)?,
        (Section::Pins, "coil_c") => config.pins.coils[2] = parse_pin(value).ok_or(bad_pin)?,
        (Section::Pins, "coil_d") => config.pins.coils[3] = parse_pin(value).ok_or(bad_pin)?,
        (Section::Pins, "hall") => config.pins.hall = parse_pin(value).ok_or(bad_pin)?,
        (Section::Pins, "led") => config.pins.led = parse_pin(value).ok_or(bad_pin)?,

        _ => return Err(ConfigError::UnknownKey { line }),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flap::AlphabetError;

    const FULL_CONFIG: &str = r##"
# Departure board unit 3
[motor]
step_mode = "full"
steps_per_revolution = 2_048
step_delay_us = 3000   # slower for the heavy drum

[flaps]
alphabet = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#"

[sensor]
samples = 7
sample_interval_us = 500
active_low = true

[homing]
mode = "single"
offset_policy = "calibrated_index"
offset_steps = -12
backoff_steps = 3
home_symbol = "#"
slow_step_delay_us = 6000

[pins]
coil_a = "gpio6"
coil_b = "gpio7"
coil_c = "gpio8"
coil_d = "gpio9"
hall = "^!gpio15"
led = "gpio25"
"##;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("\"gpio11\"").unwrap();
        assert_eq!(pin, PinConfig::new(11));

        let pin = parse_pin("\"!gpio12\"").unwrap();
        assert_eq!(pin, PinConfig::inverted(12));

        let pin = parse_pin("\"^gpio4\"").unwrap();
        assert_eq!(pin, PinConfig::with_pullup(4));

        let pin = parse_pin("\"^!gpio5\"").unwrap();
        assert!(pin.inverted && pin.pull_up);
        assert_eq!(pin.pin, 5);

        assert_eq!(parse_pin("\"gp5\""), None);
        assert_eq!(parse_pin("gpio5"), None);
        assert_eq!(parse_pin("\"gpio\""), None);
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a = 1 # note"), "a = 1 ");
        assert_eq!(strip_comment("alphabet = \"AB#\" # x"), "alphabet = \"AB#\" ");
        assert_eq!(strip_comment("# whole line"), "");
    }

    #[test]
    fn test_parse_int_separators() {
        assert_eq!(parse_int::<u32>("4_096"), Some(4096));
        assert_eq!(parse_int::<i32>("-12"), Some(-12));
        assert_eq!(parse_int::<u8>("300"), None);
        assert_eq!(parse_int::<u32>("\"12\""), None);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(DisplayConfig::default()));
        assert_eq!(parse_config("# nothing\n\n"), Ok(DisplayConfig::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL_CONFIG).unwrap();
        assert_eq!(config.step_mode, StepMode::FullStep);
        assert_eq!(config.steps_per_revolution, 2048);
        assert_eq!(config.step_delay_us, 3000);
        assert_eq!(config.flaps(), 38);
        assert_eq!(config.steps_per_flap(), 53);
        assert_eq!(config.sensor.samples, 7);
        assert_eq!(config.sensor.sample_interval_us, 500);
        assert_eq!(config.homing.phase_mode, PhaseMode::Single);
        assert_eq!(config.homing.offset_policy, OffsetPolicy::CalibratedIndex);
        assert_eq!(config.homing.home_offset_steps, -12);
        assert_eq!(config.homing.backoff_steps, 3);
        assert_eq!(config.homing.home_slot, 37);
        assert_eq!(config.homing.slow_step_delay_us, 6000);
        assert_eq!(config.pins.coils[3].pin, 9);
        assert!(config.pins.hall.inverted);
        assert!(config.pins.hall.pull_up);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[homing]\noffset_steps = 40\n").unwrap();
        let expected = DisplayConfig {
            homing: crate::config::HomingConfig {
                home_offset_steps: 40,
                ..Default::default()
            },
            ..DisplayConfig::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert_eq!(
            parse_config("[motor]\nwhat\n"),
            Err(ConfigError::Syntax { line: 2 })
        );
        assert_eq!(
            parse_config("\n[stepper]\n"),
            Err(ConfigError::UnknownSection { line: 2 })
        );
        assert_eq!(
            parse_config("[motor]\nspeed = 3\n"),
            Err(ConfigError::UnknownKey { line: 2 })
        );
        assert_eq!(
            parse_config("steps_per_revolution = 4096\n"),
            Err(ConfigError::UnknownKey { line: 1 })
        );
        assert_eq!(
            parse_config("[motor]\nstep_mode = \"quarter\"\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[pins]\n\nled = \"pin25\"\n"),
            Err(ConfigError::InvalidPin { line: 3 })
        );
        assert_eq!(
            parse_config("[motor\n"),
            Err(ConfigError::Syntax { line: 1 })
        );
        assert_eq!(
            parse_config("[motor]\nsteps_per_revolution = 3_000_000_000\n"),
            Err(ConfigError::TooManySteps)
        );
    }

    #[test]
    fn test_alphabet_and_validation_errors() {
        assert_eq!(
            parse_config("[flaps]\nalphabet = \"AAB\"\n"),
            Err(ConfigError::Alphabet(AlphabetError::Duplicate('A')))
        );
        // Default home slot 18 is off a 3-flap drum
        assert_eq!(
            parse_config("[flaps]\nalphabet = \"ABC\"\n"),
            Err(ConfigError::HomeSlotOutOfRange(18))
        );
        assert_eq!(
            parse_config("[pins]\nled = \"gpio2\"\n"),
            Err(ConfigError::PinConflict(2))
        );
    }

    #[test]
    fn test_home_symbol_unknown() {
        assert_eq!(
            parse_config("[homing]\nhome_symbol = \"#\"\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
    }
}
