//! Build script for solari-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Most flaps the firmware can index
const MAX_FLAPS: usize = 64;

/// GPIO0/GPIO1 carry the console UART
const RESERVED_PINS: [i64; 2] = [0, 1];

const PIN_KEYS: [&str; 6] = ["coil_a", "coil_b", "coil_c", "coil_d", "hall", "led"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate display.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        fail(
            "display.toml not found!",
            &["The firmware embeds display.toml from the solari-firmware directory."],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read display.toml", &[&e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in display.toml", &lines)
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    let flaps = validate_flaps(&config, &mut errors);
    validate_motor(&config, flaps, &mut errors);
    validate_sensor(&config, &mut errors);
    validate_homing(&config, flaps, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid display configuration", &lines);
    }

    println!("cargo:warning=display.toml validated successfully");
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(toml::Value::as_table)
}

fn integer(config: &toml::Value, section_name: &str, key: &str) -> Option<i64> {
    section(config, section_name)?.get(key)?.as_integer()
}

fn string<'a>(config: &'a toml::Value, section_name: &str, key: &str) -> Option<&'a str> {
    section(config, section_name)?.get(key)?.as_str()
}

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for name in ["motor", "flaps", "sensor", "homing", "pins"] {
        match config.get(name) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", name)),
            None => errors.push(format!("Missing [{}] section", name)),
        }
    }
}

/// Returns the number of flaps, if the alphabet is usable
fn validate_flaps(config: &toml::Value, errors: &mut Vec<String>) -> Option<usize> {
    let alphabet = match string(config, "flaps", "alphabet") {
        Some(a) => a,
        None => {
            errors.push("[flaps] missing 'alphabet'".to_string());
            return None;
        }
    };

    let count = alphabet.chars().count();
    if count == 0 || count > MAX_FLAPS {
        errors.push(format!("[flaps] alphabet must have 1-{} symbols", MAX_FLAPS));
        return None;
    }

    let mut seen = HashSet::new();
    for c in alphabet.chars() {
        if !(c.is_ascii_graphic() || c == ' ') {
            errors.push(format!("[flaps] '{}' is not printable ASCII", c.escape_default()));
            return None;
        }
        if !seen.insert(c.to_ascii_uppercase()) {
            errors.push(format!("[flaps] '{}' appears twice", c));
            return None;
        }
    }

    Some(count)
}

fn validate_motor(config: &toml::Value, flaps: Option<usize>, errors: &mut Vec<String>) {
    if let Some(mode) = string(config, "motor", "step_mode") {
        if !["half", "half_step", "full", "full_step"].contains(&mode) {
            errors.push("[motor] step_mode must be 'half' or 'full'".to_string());
        }
    }

    match integer(config, "motor", "steps_per_revolution") {
        Some(steps) => {
            if steps <= 0 || steps > (u32::MAX / 2) as i64 {
                errors.push(format!(
                    "[motor] steps_per_revolution must be 1-{}",
                    u32::MAX / 2
                ));
            } else if let Some(flaps) = flaps {
                if (steps as usize) < flaps {
                    errors.push("[motor] fewer steps per revolution than flaps".to_string());
                }
            }
        }
        None => errors.push("[motor] missing 'steps_per_revolution'".to_string()),
    }

    if let Some(delay) = integer(config, "motor", "step_delay_us") {
        if delay <= 0 || delay > u32::MAX as i64 {
            errors.push("[motor] step_delay_us must be positive".to_string());
        }
    }
}

fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(samples) = integer(config, "sensor", "samples") {
        if !(1..=255).contains(&samples) {
            errors.push("[sensor] samples must be 1-255".to_string());
        }
    }
    if let Some(interval) = integer(config, "sensor", "sample_interval_us") {
        if interval < 0 || interval > u32::MAX as i64 {
            errors.push("[sensor] sample_interval_us out of range".to_string());
        }
    }
}

fn validate_homing(config: &toml::Value, flaps: Option<usize>, errors: &mut Vec<String>) {
    if let Some(mode) = string(config, "homing", "mode") {
        if !["single", "coarse_fine"].contains(&mode) {
            errors.push("[homing] mode must be 'single' or 'coarse_fine'".to_string());
        }
    }

    if let Some(policy) = string(config, "homing", "offset_policy") {
        if !["trigger_step", "calibrated_index"].contains(&policy) {
            errors.push(
                "[homing] offset_policy must be 'trigger_step' or 'calibrated_index'".to_string(),
            );
        }
    }

    if let Some(slot) = integer(config, "homing", "home_slot") {
        if let Some(flaps) = flaps {
            if slot < 0 || slot as usize >= flaps {
                errors.push(format!("[homing] home_slot must be 0-{}", flaps - 1));
            }
        }
    }

    if let Some(symbol) = string(config, "homing", "home_symbol") {
        let alphabet = string(config, "flaps", "alphabet").unwrap_or_default();
        let found = symbol.chars().count() == 1
            && alphabet
                .chars()
                .any(|c| symbol.chars().all(|s| s.eq_ignore_ascii_case(&c)));
        if !found {
            errors.push(format!("[homing] home_symbol '{}' is not on the drum", symbol));
        }
    }

    if let Some(delay) = integer(config, "homing", "slow_step_delay_us") {
        if delay <= 0 || delay > u32::MAX as i64 {
            errors.push("[homing] slow_step_delay_us must be positive".to_string());
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let mut used = HashSet::new();

    for key in PIN_KEYS {
        let value = match string(config, "pins", key) {
            Some(v) => v,
            None => continue,
        };

        let number = value
            .trim_start_matches(['!', '^'])
            .strip_prefix("gpio")
            .and_then(|n| n.parse::<i64>().ok());

        match number {
            Some(n) if (0..30).contains(&n) => {
                if RESERVED_PINS.contains(&n) {
                    errors.push(format!("[pins] {}: gpio{} is reserved for the console", key, n));
                } else if !used.insert(n) {
                    errors.push(format!("[pins] {}: gpio{} assigned twice", key, n));
                }
            }
            _ => errors.push(format!("[pins] {}: '{}' is not a valid pin", key, value)),
        }
    }
}
