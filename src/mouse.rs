//! Mouse keys: constant-speed cursor and wheel movement, buttons and the button lock

use crate::keystate::{Duration, Instant};

pub const BUTTON1: u8 = 1 << 0;
pub const BUTTON2: u8 = 1 << 1;
pub const BUTTON3: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseKey {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    Button1,
    Button2,
    Button3,
}

impl MouseKey {
    /// Cursor direction, `y` grows downwards
    pub const fn cursor(self) -> (i8, i8) {
        match self {
            MouseKey::Up => (0, -1),
            MouseKey::Down => (0, 1),
            MouseKey::Left => (-1, 0),
            MouseKey::Right => (1, 0),
            MouseKey::UpLeft => (-1, -1),
            MouseKey::UpRight => (1, -1),
            MouseKey::DownLeft => (-1, 1),
            MouseKey::DownRight => (1, 1),
            _ => (0, 0),
        }
    }

    /// Wheel direction as `(pan, vertical)`, scrolling up is positive
    pub const fn wheel(self) -> (i8, i8) {
        match self {
            MouseKey::WheelUp => (0, 1),
            MouseKey::WheelDown => (0, -1),
            MouseKey::WheelLeft => (-1, 0),
            MouseKey::WheelRight => (1, 0),
            _ => (0, 0),
        }
    }

    pub const fn button(self) -> u8 {
        match self {
            MouseKey::Button1 => BUTTON1,
            MouseKey::Button2 => BUTTON2,
            MouseKey::Button3 => BUTTON3,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Slow = 0,
    Medium = 1,
    Fast = 2,
}

/// Move by `offset` every `interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub offset: i8,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseConfig {
    /// Indexed by [`Speed`]
    pub cursor: [Step; 3],
    /// Indexed by [`Speed`]
    pub wheel: [Step; 3],
    /// Speed when no speed key is held
    pub default_speed: Speed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
    pub pan: i8,
}

impl MouseReport {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Movement waiting for the host
///
/// The host polls less often than the keymap scans, so steps are added up until a report is
/// accepted rather than overwritten by the idle scans in between.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MouseQueue {
    pending: MouseReport,
    sent_buttons: u8,
}

impl MouseQueue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, report: &MouseReport) {
        let pending = &mut self.pending;
        pending.buttons = report.buttons;
        pending.x = pending.x.saturating_add(report.x);
        pending.y = pending.y.saturating_add(report.y);
        pending.wheel = pending.wheel.saturating_add(report.wheel);
        pending.pan = pending.pan.saturating_add(report.pan);
    }

    /// The report to send, `None` when the host is already up to date
    pub fn next(&self) -> Option<MouseReport> {
        let motion = MouseReport {
            buttons: 0,
            ..self.pending
        };
        if !motion.is_idle() || self.pending.buttons != self.sent_buttons {
            Some(self.pending)
        } else {
            None
        }
    }

    /// The host accepted the report from [`MouseQueue::next`]
    pub fn sent(&mut self) {
        self.sent_buttons = self.pending.buttons;
        self.pending = MouseReport {
            buttons: self.pending.buttons,
            ..Default::default()
        };
    }
}

/// Mouse keys held during one scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    cursor: (i8, i8),
    wheel: (i8, i8),
    buttons: u8,
}

impl MouseInput {
    pub fn add(&mut self, key: MouseKey) {
        let (x, y) = key.cursor();
        let (pan, wheel) = key.wheel();
        self.cursor = (
            self.cursor.0.saturating_add(x),
            self.cursor.1.saturating_add(y),
        );
        self.wheel = (
            self.wheel.0.saturating_add(pan),
            self.wheel.1.saturating_add(wheel),
        );
        self.buttons |= key.button();
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MouseKeys {
    speed: Speed,
    locked: u8,
    cursor_due: Option<Instant>,
    wheel_due: Option<Instant>,
}

impl MouseKeys {
    pub const fn new(speed: Speed) -> Self {
        MouseKeys {
            speed,
            locked: 0,
            cursor_due: None,
            wheel_due: None,
        }
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Latch button 1, or let go of it if it was already latched
    pub fn toggle_lock(&mut self) {
        self.locked ^= BUTTON1;
        debug!("mouse lock {=u8}", self.locked);
    }

    /// Clicking any mouse button releases the latch
    pub fn click(&mut self, key: MouseKey) {
        if key.button() != 0 && self.locked != 0 {
            debug!("mouse lock released by click");
            self.locked = 0;
        }
    }

    pub fn tick(&mut self, input: MouseInput, now: Instant, config: &MouseConfig) -> MouseReport {
        let mut report = MouseReport {
            buttons: input.buttons | self.locked,
            ..Default::default()
        };

        let (x, y) = (input.cursor.0.signum(), input.cursor.1.signum());
        let cursor = config.cursor[self.speed as usize];
        if let Some(offset) = step(&mut self.cursor_due, x != 0 || y != 0, now, cursor) {
            let offset = if x != 0 && y != 0 {
                times_inv_sqrt2(offset)
            } else {
                offset
            };
            report.x = x * offset;
            report.y = y * offset;
        }

        let (pan, wheel) = (input.wheel.0.signum(), input.wheel.1.signum());
        let scroll = config.wheel[self.speed as usize];
        if let Some(offset) = step(&mut self.wheel_due, pan != 0 || wheel != 0, now, scroll) {
            report.pan = pan * offset;
            report.wheel = wheel * offset;
        }

        report
    }
}

/// Offset to move by now, if the previous step's interval has passed
fn step(due: &mut Option<Instant>, moving: bool, now: Instant, step: Step) -> Option<i8> {
    if !moving {
        *due = None;
        return None;
    }
    match *due {
        Some(at) if at > now => None,
        _ => {
            *due = Some(now + step.interval);
            Some(step.offset)
        }
    }
}

/// Diagonal steps cover the same distance as straight ones
fn times_inv_sqrt2(offset: i8) -> i8 {
    let scaled = (offset as i16 * 181) >> 8;
    scaled.max(1) as i8
}
