//! Display mode state
//!
//! Visibility and power mode as reported by the platform. Pure state; the
//! face engine reconciles the redraw scheduler after every mutation.

/// Visibility, power mode and display capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayModeState {
    visible: bool,
    ambient_mode: bool,
    /// Set once from the capability query
    low_bit_ambient: Option<bool>,
}

impl DisplayModeState {
    /// Invisible, interactive, capability unknown
    pub const fn new() -> Self {
        Self {
            visible: false,
            ambient_mode: false,
            low_bit_ambient: None,
        }
    }

    /// Returns true if visibility changed
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Returns true if the power mode changed
    pub fn set_ambient_mode(&mut self, ambient: bool) -> bool {
        let changed = self.ambient_mode != ambient;
        self.ambient_mode = ambient;
        changed
    }

    /// Record the low-bit ambient capability
    ///
    /// Only the first report is kept. Returns true if it was accepted.
    pub fn set_low_bit_ambient(&mut self, low_bit: bool) -> bool {
        if self.low_bit_ambient.is_some() {
            return false;
        }
        self.low_bit_ambient = Some(low_bit);
        true
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn ambient_mode(&self) -> bool {
        self.ambient_mode
    }

    pub fn low_bit_ambient(&self) -> bool {
        self.low_bit_ambient.unwrap_or(false)
    }

    /// Periodic redraws are allowed only while visible and interactive
    pub fn should_run_timer(&self) -> bool {
        self.visible && !self.ambient_mode
    }

    /// Whether the time text may be drawn anti-aliased this frame
    ///
    /// Low-bit ambient panels can only show fully on/off pixels.
    pub fn time_anti_alias(&self) -> bool {
        !(self.ambient_mode && self.low_bit_ambient())
    }
}
