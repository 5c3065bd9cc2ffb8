//! Alt-Tab application switcher: Alt stays down between taps of the switcher keys

use crate::keystate::{Duration, Instant, Layer};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AppSwitcher {
    /// Switcher keys currently down
    held: u8,
    /// Layer the switcher was started from, `Some` while Alt is down
    layer: Option<Layer>,
    release_at: Option<Instant>,
}

impl AppSwitcher {
    pub const fn new() -> Self {
        AppSwitcher {
            held: 0,
            layer: None,
            release_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.layer.is_some()
    }

    pub fn press(&mut self, layer: Layer) {
        self.held = self.held.saturating_add(1);
        if self.layer.is_none() {
            debug!("app switcher on layer {=u8}", layer);
            self.layer = Some(layer);
        }
        self.release_at = None;
    }

    pub fn release(&mut self, now: Instant, timeout: Duration) {
        self.held = self.held.saturating_sub(1);
        if self.held == 0 {
            self.release_at = Some(now + timeout);
        }
    }

    /// Let go of Alt once the timeout passes or the switcher's layer is left
    pub fn tick(&mut self, now: Instant, top: Layer) {
        let Some(layer) = self.layer else {
            return;
        };
        if self.held > 0 {
            return;
        }
        let expired = self.release_at.map_or(false, |at| at <= now);
        if expired || top != layer {
            debug!("app switcher done");
            self.layer = None;
            self.release_at = None;
        }
    }
}
