//! Minimal TOML parser for face configuration
//!
//! Handles only the subset `face.toml` uses, not full TOML.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] and [section.subsection] headers
//! - Comments (# ...), including trailing comments
//!
//! Unknown keys are ignored so older firmware accepts newer files.

use super::types::{ConfigError, FaceConfig, LayoutMetrics, Rgb};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Parsed values failed validation
    Config(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Config(err)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Clock,
    Theme,
    RoundLayout,
    SquareLayout,
    Power,
}

/// Parse TOML text into a validated [`FaceConfig`]
///
/// Keys missing from the file keep their default value.
pub fn parse_config(input: &str) -> Result<FaceConfig, ParseError> {
    let mut config = FaceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = line
                .find(']')
                .map(|end| &line[1..end])
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "clock" => Ok(Section::Clock),
        "theme" => Ok(Section::Theme),
        "layout.round" => Ok(Section::RoundLayout),
        "layout.square" => Ok(Section::SquareLayout),
        "power" => Ok(Section::Power),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip a trailing comment; a # inside a string is a colour
    let mut in_string = false;
    let comment = value.char_indices().find(|&(_, c)| {
        if c == '"' {
            in_string = !in_string;
        }
        c == '#' && !in_string
    });
    let value = match comment {
        Some((hash_pos, _)) => value[..hash_pos].trim(),
        None => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a "#RRGGBB" colour
fn parse_color(value: &str) -> Result<Rgb, ParseError> {
    Rgb::from_hex(parse_string(value)?).ok_or(ParseError::InvalidValue)
}

fn apply_layout(layout: &mut LayoutMetrics, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "time_text_size" => layout.time_text_size = parse_int(value)?,
        "date_text_size" => layout.date_text_size = parse_int(value)?,
        "temperature_text_size" => layout.temperature_text_size = parse_int(value)?,
        "time_y" => layout.time_y = parse_int(value)?,
        "date_y" => layout.date_y = parse_int(value)?,
        "high_y" => layout.high_y = parse_int(value)?,
        "low_y" => layout.low_y = parse_int(value)?,
        "icon_x" => layout.icon_x = parse_int(value)?,
        "icon_y" => layout.icon_y = parse_int(value)?,
        _ => {}
    }
    Ok(())
}

fn apply_value(
    config: &mut FaceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Display => match key {
            "width" => config.display.width = parse_int(value)?,
            "height" => config.display.height = parse_int(value)?,
            "round" => config.display.round = parse_bool(value)?,
            "low_bit_ambient" => config.display.low_bit_ambient = parse_bool(value)?,
            "icon_native_size" => config.display.icon_native_size = parse_int(value)?,
            _ => {}
        },
        Section::Clock => {
            if key == "utc_offset_minutes" {
                config.clock.utc_offset_minutes = parse_int(value)?;
            }
        }
        Section::Theme => match key {
            "background" => config.theme.background = parse_color(value)?,
            "primary_text" => config.theme.primary_text = parse_color(value)?,
            "secondary_text" => config.theme.secondary_text = parse_color(value)?,
            _ => {}
        },
        Section::RoundLayout => apply_layout(&mut config.round_layout, key, value)?,
        Section::SquareLayout => apply_layout(&mut config.square_layout, key, value)?,
        Section::Power => match key {
            "ambient_timeout_s" => config.power.ambient_timeout_s = parse_int(value)?,
            "sleep_timeout_s" => config.power.sleep_timeout_s = parse_int(value)?,
            _ => {}
        },
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("width = 240"), Some(("width", "240")));
        assert_eq!(
            parse_key_value("background = \"#000000\" # black"),
            Some(("background", "\"#000000\""))
        );
        assert_eq!(parse_key_value("width ="), None);
        assert_eq!(parse_key_value("no equals"), None);
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("display"), Ok(Section::Display));
        assert_eq!(parse_section_header(" layout.round "), Ok(Section::RoundLayout));
        assert_eq!(parse_section_header("layout"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config_str = r##"
# Waveshare round LCD
[display]
width = 240
height = 240
round = true
low_bit_ambient = true

[clock]
utc_offset_minutes = -300

[theme]
background = "#000000"

[layout.square]
time_y = 60 # baseline

[power]
ambient_timeout_s = 10
sleep_timeout_s = 30
"##;

        let config = parse_config(config_str).unwrap();
        assert!(config.display.low_bit_ambient);
        assert_eq!(config.clock.utc_offset_minutes, -300);
        assert_eq!(config.theme.background, Rgb::BLACK);
        assert_eq!(config.theme.primary_text, Rgb::WHITE);
        assert_eq!(config.square_layout.time_y, 60);
        assert_eq!(config.round_layout, LayoutMetrics::round());
        assert_eq!(config.power.sleep_timeout_s, 30);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config(""), Ok(FaceConfig::default()));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let config = parse_config("[display]\nbrightness = 7\n").unwrap();
        assert_eq!(config, FaceConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[display]\nround = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[theme]\nbackground = \"blue\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\nwidth = -1\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[bogus]\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_validation_failure() {
        let input = "[power]\nambient_timeout_s = 60\nsleep_timeout_s = 30\n";
        assert_eq!(
            parse_config(input),
            Err(ParseError::Config(ConfigError::TimeoutOrder))
        );
    }
}
