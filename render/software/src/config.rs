//! Renderer configuration, fixed for the life of a `SoftwareRenderer`.

use serde::{Deserialize, Serialize};

use crate::RenderError;

pub const MAX_SCREEN_WIDTH: usize = 4096;
/// Visplane rows are stored as `u16` with `u16::MAX` meaning unset
pub const MAX_SCREEN_HEIGHT: usize = 2048;

/// Column and span width. Low detail renders a half width view and writes
/// every pixel twice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Detail {
    #[default]
    High,
    Low,
}

impl Detail {
    /// `detailshift`
    #[inline]
    pub const fn shift(self) -> u32 {
        match self {
            Detail::High => 0,
            Detail::Low => 1,
        }
    }
}

/// What happens when a frame needs more drawsegs, visplanes, sprites or
/// openings than the original fixed arrays held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowMode {
    /// Storage grows as needed
    #[default]
    Grow,
    /// Classic limits. Extra drawsegs and sprites are dropped, running out
    /// of visplanes or openings is an error.
    Vanilla,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub detail: Detail,
    #[serde(default)]
    pub overflow: OverflowMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            detail: Detail::High,
            overflow: OverflowMode::Grow,
        }
    }
}

impl RenderConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Columns the geometry is worked out for
    #[inline]
    pub fn view_width(&self) -> usize {
        self.width >> self.detail.shift()
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let bad = self.width < 2
            || self.height < 2
            || self.width > MAX_SCREEN_WIDTH
            || self.height > MAX_SCREEN_HEIGHT
            || self.view_width() < 2;
        if bad {
            return Err(RenderError::ViewSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
