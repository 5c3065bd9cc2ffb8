//! Timings and speeds of the keymap

use crate::keystate::Duration;
use crate::mouse::{MouseConfig, Speed, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// A tap-hold key released before this is a tap, otherwise it was a hold
    pub tapping_term: Duration,
    /// How long the tap of a tap-hold key stays in the report
    pub tap_release: Duration,
    /// Pressing a tap-hold key again this soon after a tap repeats the tap key while held
    pub tap_repeat: Duration,
    /// Alt is let go this long after the last app switcher key is released
    pub app_switch_timeout: Duration,
    pub mouse: MouseConfig,
}

pub const TAPPING_TERM: Duration = 200;
pub const TAP_RELEASE: Duration = 10;
pub const TAP_REPEAT: Duration = TAPPING_TERM;
pub const APP_SWITCH_TIMEOUT: Duration = 1000;

impl Default for Config {
    fn default() -> Self {
        Config {
            tapping_term: TAPPING_TERM,
            tap_release: TAP_RELEASE,
            tap_repeat: TAP_REPEAT,
            app_switch_timeout: APP_SWITCH_TIMEOUT,
            mouse: MouseConfig::default(),
        }
    }
}

impl Default for MouseConfig {
    fn default() -> Self {
        MouseConfig {
            cursor: [
                Step { offset: 2, interval: 12 },
                Step { offset: 8, interval: 16 },
                Step { offset: 12, interval: 16 },
            ],
            wheel: [
                Step { offset: 1, interval: 120 },
                Step { offset: 1, interval: 60 },
                Step { offset: 1, interval: 20 },
            ],
            default_speed: Speed::Medium,
        }
    }
}
