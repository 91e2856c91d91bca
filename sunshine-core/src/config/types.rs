//! Configuration type definitions

/// 24-bit colour from the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse "#RRGGBB"
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }
}

/// Panel geometry and capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
    /// Round panel; picks the round layout until insets say otherwise
    pub round: bool,
    /// Panel supports only 1-bit colour in ambient mode
    pub low_bit_ambient: bool,
    /// Edge length of the weather icon artwork before scaling
    pub icon_native_size: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            round: true,
            low_bit_ambient: false,
            icon_native_size: 100,
        }
    }
}

/// Initial zone before the companion sends one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub utc_offset_minutes: i16,
}

/// Face colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Theme {
    /// Interactive-mode background; ambient is always black
    pub background: Rgb,
    /// Time and high temperature
    pub primary_text: Rgb,
    /// Date and low temperature
    pub secondary_text: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x03, 0xA9, 0xF4),
            primary_text: Rgb::WHITE,
            secondary_text: Rgb::new(0xB3, 0xE5, 0xFC),
        }
    }
}

/// Text sizes (pixel heights) and baseline offsets for one panel shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutMetrics {
    pub time_text_size: u8,
    pub date_text_size: u8,
    pub temperature_text_size: u8,
    pub time_y: i32,
    pub date_y: i32,
    pub high_y: i32,
    pub low_y: i32,
    /// Top-left corner of the scaled icon
    pub icon_x: i32,
    pub icon_y: i32,
}

impl LayoutMetrics {
    pub const fn round() -> Self {
        Self {
            time_text_size: 20,
            date_text_size: 13,
            temperature_text_size: 18,
            time_y: 90,
            date_y: 118,
            high_y: 165,
            low_y: 165,
            icon_x: 36,
            icon_y: 140,
        }
    }

    pub const fn square() -> Self {
        Self {
            time_text_size: 20,
            date_text_size: 10,
            temperature_text_size: 13,
            time_y: 70,
            date_y: 96,
            high_y: 145,
            low_y: 145,
            icon_x: 20,
            icon_y: 122,
        }
    }
}

/// Input-idle timeouts driving ambient and sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerConfig {
    pub ambient_timeout_s: u16,
    pub sleep_timeout_s: u16,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            ambient_timeout_s: 15,
            sleep_timeout_s: 60,
        }
    }
}

/// Configuration validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width, height or icon size is zero
    ZeroDimension,
    /// A text size is zero
    ZeroTextSize,
    /// UTC offset outside ±24h
    OffsetOutOfRange,
    /// Sleep must come after ambient
    TimeoutOrder,
}

/// Complete face configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceConfig {
    pub display: DisplayConfig,
    pub clock: ClockConfig,
    pub theme: Theme,
    pub round_layout: LayoutMetrics,
    pub square_layout: LayoutMetrics,
    pub power: PowerConfig,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            clock: ClockConfig::default(),
            theme: Theme::default(),
            round_layout: LayoutMetrics::round(),
            square_layout: LayoutMetrics::square(),
            power: PowerConfig::default(),
        }
    }
}

impl FaceConfig {
    /// Layout for the given panel shape
    pub fn layout(&self, round: bool) -> &LayoutMetrics {
        if round {
            &self.round_layout
        } else {
            &self.square_layout
        }
    }

    /// Edge length of the icon as drawn (40% of native, truncated)
    pub fn icon_size(&self) -> u32 {
        u32::from(self.display.icon_native_size) * 40 / 100
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.width == 0 || d.height == 0 || d.icon_native_size == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        for layout in [&self.round_layout, &self.square_layout] {
            if layout.time_text_size == 0
                || layout.date_text_size == 0
                || layout.temperature_text_size == 0
            {
                return Err(ConfigError::ZeroTextSize);
            }
        }
        if i32::from(self.clock.utc_offset_minutes).abs() >= 24 * 60 {
            return Err(ConfigError::OffsetOutOfRange);
        }
        if self.power.sleep_timeout_s <= self.power.ambient_timeout_s {
            return Err(ConfigError::TimeoutOrder);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(FaceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#03A9F4"), Some(Rgb::new(0x03, 0xA9, 0xF4)));
        assert_eq!(Rgb::from_hex("#ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("03A9F4"), None);
        assert_eq!(Rgb::from_hex("#03A9F"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
        assert_eq!(Rgb::from_hex("#+3A9F4"), None);
    }

    #[test]
    fn test_icon_size_truncates() {
        let mut config = FaceConfig::default();
        config.display.icon_native_size = 99;
        assert_eq!(config.icon_size(), 39);
        config.display.icon_native_size = 100;
        assert_eq!(config.icon_size(), 40);
    }

    #[test]
    fn test_validate_timeouts() {
        let mut config = FaceConfig::default();
        config.power.sleep_timeout_s = config.power.ambient_timeout_s;
        assert_eq!(config.validate(), Err(ConfigError::TimeoutOrder));
    }

    #[test]
    fn test_layout_by_shape() {
        let config = FaceConfig::default();
        assert_eq!(config.layout(true), &LayoutMetrics::round());
        assert_eq!(config.layout(false), &LayoutMetrics::square());
    }
}
