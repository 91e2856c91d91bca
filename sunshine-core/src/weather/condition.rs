//! Weather condition code lookup
//!
//! Codes follow the OpenWeatherMap condition groups (2xx thunderstorm,
//! 3xx drizzle, 5xx rain, 6xx snow, 7xx atmosphere, 800 clear, 80x clouds).

/// Icon bucket for a condition code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WeatherIcon {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    LightClouds,
    Clouds,
    /// Code outside every known range
    Unknown,
}

impl WeatherIcon {
    pub const ALL: [WeatherIcon; 9] = [
        WeatherIcon::Thunderstorm,
        WeatherIcon::Drizzle,
        WeatherIcon::Rain,
        WeatherIcon::Snow,
        WeatherIcon::Atmosphere,
        WeatherIcon::Clear,
        WeatherIcon::LightClouds,
        WeatherIcon::Clouds,
        WeatherIcon::Unknown,
    ];

    /// Map a condition code to its icon
    pub fn from_condition_code(code: i32) -> Self {
        match code {
            200..=232 => WeatherIcon::Thunderstorm,
            300..=321 => WeatherIcon::Drizzle,
            500..=504 => WeatherIcon::Rain,
            // Freezing rain is drawn as snow
            511 => WeatherIcon::Snow,
            520..=531 => WeatherIcon::Rain,
            600..=622 => WeatherIcon::Snow,
            701..=761 => WeatherIcon::Atmosphere,
            // Tornado
            781 => WeatherIcon::Thunderstorm,
            800 => WeatherIcon::Clear,
            801 => WeatherIcon::LightClouds,
            802..=804 => WeatherIcon::Clouds,
            _ => WeatherIcon::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeatherIcon::Thunderstorm => "thunderstorm",
            WeatherIcon::Drizzle => "drizzle",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Atmosphere => "atmosphere",
            WeatherIcon::Clear => "clear",
            WeatherIcon::LightClouds => "light clouds",
            WeatherIcon::Clouds => "clouds",
            WeatherIcon::Unknown => "unknown",
        }
    }
}
