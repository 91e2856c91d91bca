//! Side effects requested by the face engine

use heapless::Vec;

use crate::scheduler::TimerCommand;
use crate::sync::channel::{LinkCommand, Notice, MAX_COMMANDS};

/// Diagnostic for the caller to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceNotice {
    Link(Notice),
    /// Timer fired with a cancelled or superseded token
    StaleTick,
    /// Platform callback after destroy
    Destroyed,
}

/// Requests produced by one callback
///
/// The caller applies them in field order: timer, link commands, then the
/// redraw request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Invalidate: schedule one future draw
    pub redraw: bool,
    pub timer: Option<TimerCommand>,
    pub link: Vec<LinkCommand, MAX_COMMANDS>,
    pub notice: Option<FaceNotice>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn notice(notice: FaceNotice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    /// True if there is nothing to do
    pub fn is_empty(&self) -> bool {
        !self.redraw && self.timer.is_none() && self.link.is_empty()
    }
}
