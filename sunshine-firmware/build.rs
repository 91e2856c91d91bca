//! Build script for sunshine-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml at compile time
//! - Records the build time as the initial wall clock

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    validate_config();
    write_build_epoch(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// The watch has no RTC backup; it starts from the build time until the
/// companion sends a time sync.
fn write_build_epoch(out_dir: &Path) {
    let epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut f = File::create(out_dir.join("build_epoch.rs")).unwrap();
    writeln!(f, "pub const BUILD_EPOCH_MS: u64 = {};", epoch_ms).unwrap();
}

/// Validate face.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=face.toml");

    let config_path = Path::new("face.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds face.toml as its face configuration.        ║\n\
            ║  Please create one in the sunshine-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
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
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_clock(&config, &mut errors);
    validate_theme(&config, &mut errors);
    validate_layout(&config, "round", &mut errors);
    validate_layout(&config, "square", &mut errors);
    validate_power(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid face.toml                                        ║\n\
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

    println!("cargo:warning=face.toml validated successfully");
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

/// Look up a required `[section]` table
fn section<'a>(
    config: &'a toml::Value,
    path: &[&str],
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    let mut value = config;
    for key in path {
        match value.get(key) {
            Some(v) => value = v,
            None => {
                errors.push(format!("Missing [{}] section", path.join(".")));
                return None;
            }
        }
    }
    match value {
        toml::Value::Table(t) => Some(t),
        _ => {
            errors.push(format!("[{}] must be a table", path.join(".")));
            None
        }
    }
}

/// Check an optional integer key against an inclusive range
fn check_int(
    table: &toml::value::Table,
    name: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", name, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", name, key)),
    }
}

fn check_bool(table: &toml::value::Table, name: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = table.get(key) {
        if !value.is_bool() {
            errors.push(format!("[{}] {} must be true or false", name, key));
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = section(config, &["display"], errors) else {
        return;
    };
    check_int(display, "display", "width", 1, 1024, errors);
    check_int(display, "display", "height", 1, 1024, errors);
    check_int(display, "display", "icon_native_size", 1, 1024, errors);
    check_bool(display, "display", "round", errors);
    check_bool(display, "display", "low_bit_ambient", errors);
}

fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(clock) = section(config, &["clock"], errors) else {
        return;
    };
    check_int(clock, "clock", "utc_offset_minutes", -1440, 1440, errors);
}

fn validate_theme(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(theme) = section(config, &["theme"], errors) else {
        return;
    };
    for key in ["background", "primary_text", "secondary_text"] {
        match theme.get(key) {
            None => {}
            Some(toml::Value::String(s)) if is_hex_color(s) => {}
            Some(_) => errors.push(format!("[theme] {} must be \"#RRGGBB\"", key)),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn validate_layout(config: &toml::Value, shape: &str, errors: &mut Vec<String>) {
    let name = format!("layout.{}", shape);
    let Some(layout) = section(config, &["layout", shape], errors) else {
        return;
    };
    for key in ["time_text_size", "date_text_size", "temperature_text_size"] {
        check_int(layout, &name, key, 1, 255, errors);
    }
    for key in ["time_y", "date_y", "high_y", "low_y", "icon_x", "icon_y"] {
        check_int(layout, &name, key, -1024, 1024, errors);
    }
}

fn validate_power(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(power) = section(config, &["power"], errors) else {
        return;
    };
    check_int(power, "power", "ambient_timeout_s", 1, 65535, errors);
    check_int(power, "power", "sleep_timeout_s", 1, 65535, errors);

    if let (Some(toml::Value::Integer(ambient)), Some(toml::Value::Integer(sleep))) =
        (power.get("ambient_timeout_s"), power.get("sleep_timeout_s"))
    {
        if sleep <= ambient {
            errors.push("[power] sleep_timeout_s must exceed ambient_timeout_s".to_string());
        }
    }
}
