//! Build script for nowdrive-firmware
//!
//! - Adds the esp-hal and defmt linker scripts
//! - Validates link.toml at compile time
//! - Generates the link settings the firmware compiles in

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// ESP-NOW primary master key length
const PMK_LEN: usize = 16;

fn main() {
    setup_linker();
    let settings = validate_config();
    generate_config(&settings);
}

/// Link settings read from link.toml
struct LinkSettings {
    channel: u8,
    pmk: String,
    long_range: bool,
    enqueue_timeout_ms: u32,
}

/// Add the linker scripts
fn setup_linker() {
    println!("cargo:rustc-link-arg=-Tlinkall.x");
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate link.toml and extract its settings
fn validate_config() -> LinkSettings {
    println!("cargo:rerun-if-changed=link.toml");

    let config_path = Path::new("link.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: link.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a link.toml radio configuration file.     ║\n\
            ║  Please create one in the nowdrive-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read link.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in link.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let settings = LinkSettings {
        channel: read_channel(&config, &mut errors),
        pmk: read_pmk(&config, &mut errors),
        long_range: read_long_range(&config, &mut errors),
        enqueue_timeout_ms: read_enqueue_timeout(&config, &mut errors),
    };

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid link configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=link.toml validated successfully");
    settings
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_channel(config: &toml::Value, errors: &mut Vec<String>) -> u8 {
    match config.get("link").and_then(|l| l.get("channel")) {
        Some(toml::Value::Integer(ch)) if (1..=14).contains(ch) => *ch as u8,
        Some(toml::Value::Integer(_)) => {
            errors.push("[link] channel must be 1-14".to_string());
            1
        }
        Some(_) => {
            errors.push("[link] channel must be an integer".to_string());
            1
        }
        None => {
            errors.push("[link] missing 'channel'".to_string());
            1
        }
    }
}

fn read_pmk(config: &toml::Value, errors: &mut Vec<String>) -> String {
    match config.get("link").and_then(|l| l.get("pmk")) {
        Some(toml::Value::String(pmk)) => {
            if !pmk.is_ascii() || pmk.len() != PMK_LEN {
                errors.push(format!("[link] pmk must be exactly {} ASCII characters", PMK_LEN));
            }
            pmk.clone()
        }
        Some(_) => {
            errors.push("[link] pmk must be a string".to_string());
            String::new()
        }
        None => {
            errors.push("[link] missing 'pmk'".to_string());
            String::new()
        }
    }
}

fn read_long_range(config: &toml::Value, errors: &mut Vec<String>) -> bool {
    match config.get("link").and_then(|l| l.get("long_range")) {
        Some(toml::Value::Boolean(lr)) => *lr,
        Some(_) => {
            errors.push("[link] long_range must be true or false".to_string());
            false
        }
        // Optional
        None => false,
    }
}

fn read_enqueue_timeout(config: &toml::Value, errors: &mut Vec<String>) -> u32 {
    match config.get("ingest").and_then(|i| i.get("enqueue_timeout_ms")) {
        Some(toml::Value::Integer(ms)) if *ms > 0 && *ms <= u32::MAX as i64 => *ms as u32,
        Some(_) => {
            errors.push("[ingest] enqueue_timeout_ms must be a positive integer".to_string());
            512
        }
        // Optional
        None => 512,
    }
}

/// Write the validated settings as constants for src/config.rs
fn generate_config(settings: &LinkSettings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let generated = format!(
        "/// Wi-Fi channel\n\
         pub const CHANNEL: u8 = {};\n\
         /// ESP-NOW primary master key\n\
         pub const PMK: &str = {:?};\n\
         /// 802.11 long-range mode\n\
         pub const LONG_RANGE: bool = {};\n\
         /// Receive queue enqueue timeout\n\
         pub const ENQUEUE_TIMEOUT_MS: u32 = {};\n",
        settings.channel, settings.pmk, settings.long_range, settings.enqueue_timeout_ms
    );
    fs::write(out_dir.join("link_config.rs"), generated).unwrap();
}
