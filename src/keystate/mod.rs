use heapless::Vec;
pub use usbd_human_interface_device::page::Keyboard;

use crate::config::Config;
use crate::mouse::{MouseInput, MouseKey, MouseKeys, MouseReport, Speed};
use crate::send_string::{SendString, FIRMWARE_INFO};
use crate::switcher::AppSwitcher;

use button::{ButtonState, Edge};
use layer::{LayerStack, LayerState, TriLayer};
use taphold::TapHoldState;

pub mod button;
pub mod layer;
/// Shorthand for `use keystate::KeyShorthand::*` and QMK-like key names
pub mod prelude;
pub mod taphold;

/// Shared state
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Shared;
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct KeyState<State> {
    state: State,
    shared: Shared,
}

/// Something which is like a key (button, layer, tap-hold etc)
trait Keyish {
    /// Whether this can move on to the current layer
    fn is_finished(&self) -> bool;
}

pub type Layer = u8;
/// Milliseconds
pub type Duration = u64;
/// Milliseconds
pub type Instant = u64;

/// Consumer control keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Media {
    PrevTrack,
    PlayPause,
    Stop,
    NextTrack,
    VolumeUp,
    VolumeDown,
}

/// Keys handled by the keymap rather than sent as they are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Custom {
    /// Latch mouse button 1, until tapped again or a mouse button is clicked
    ButtonLock,
    /// Alt-Tab
    AppNext,
    /// Alt-Shift-Tab
    AppPrev,
    /// Type out the firmware name and version
    FirmwareInfo,
    /// Mouse keys move at this speed while held
    MouseSpeed(Speed),
}

impl Custom {
    /// Keyboard keys sent while the key is held
    fn held_keys(self) -> &'static [Keyboard] {
        match self {
            Custom::AppNext => &[Keyboard::Tab],
            Custom::AppPrev => &[Keyboard::LeftShift, Keyboard::Tab],
            _ => &[],
        }
    }
}

/// Shorthand for `use keystate::KeyShorthand::*` and for using Kb, La, LT to create a keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShorthand {
    Kb(Keyboard),
    /// Momentary layer
    La(Layer),
    /// Layer when held, key when tapped
    LT(Layer, Keyboard),
    Ms(MouseKey),
    Md(Media),
    Cu(Custom),
    /// Whatever the layer below has
    Tr,
    No,
}

impl From<Keyboard> for KeyShorthand {
    fn from(key: Keyboard) -> Self {
        KeyShorthand::Kb(key)
    }
}

/// Actual keys containing key-state
#[derive(Debug, PartialEq, Eq)]
enum Key {
    Transparent,
    Button(ButtonState<Keyboard>),
    Layer(LayerState),
    TapHold(TapHoldState),
    Mouse(ButtonState<MouseKey>),
    Media(ButtonState<Media>),
    Custom(ButtonState<Custom>),
}
impl Key {
    fn new(key: KeyShorthand) -> Self {
        match key {
            KeyShorthand::Kb(key) => Key::Button(ButtonState::new(key)),
            KeyShorthand::La(layer) => Key::Layer(LayerState::new(layer)),
            KeyShorthand::LT(layer, tap) => Key::TapHold(TapHoldState::new(layer, tap)),
            KeyShorthand::Ms(key) => Key::Mouse(ButtonState::new(key)),
            KeyShorthand::Md(key) => Key::Media(ButtonState::new(key)),
            KeyShorthand::Cu(key) => Key::Custom(ButtonState::new(key)),
            KeyShorthand::Tr => Key::Transparent,
            KeyShorthand::No => Key::Button(ButtonState::new(Keyboard::NoEventIndicated)),
        }
    }
}
impl Keyish for Key {
    fn is_finished(&self) -> bool {
        match self {
            Key::Transparent => true,
            Key::Button(button) => button.is_finished(),
            Key::Layer(layer) => layer.is_finished(),
            Key::TapHold(tap_hold) => tap_hold.is_finished(),
            Key::Mouse(button) => button.is_finished(),
            Key::Media(button) => button.is_finished(),
            Key::Custom(button) => button.is_finished(),
        }
    }
}
#[derive(Debug, PartialEq, Eq)]
struct Keys<const LAYERS: usize> {
    current: Layer,
    layers: [Key; LAYERS],
    /// Pressed while a tap-hold key was undecided, not acted on yet
    waiting: bool,
}

impl<const LAYERS: usize> Keys<LAYERS> {
    /// Topmost active layer that has something other than transparent at this key
    fn resolve(&self, active: &LayerStack<LAYERS>) -> Layer {
        active
            .iter()
            .find(|layer| {
                !matches!(
                    self.layers.get(*layer as usize),
                    Some(Key::Transparent) | None
                )
            })
            .unwrap_or(0)
    }
}

pub const MEDIA_ROLLOVER: usize = 4;

/// Everything sent to the host after a scan
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report<const ROLLOVER: usize> {
    pub keys: Vec<Keyboard, ROLLOVER>,
    pub mouse: MouseReport,
    pub media: Vec<Media, MEDIA_ROLLOVER>,
}

impl<const ROLLOVER: usize> Report<ROLLOVER> {
    pub fn clear(&mut self) {
        self.keys.clear();
        self.mouse = MouseReport::default();
        self.media.clear();
    }
}

#[derive(Debug, Default)]
pub struct KeymapFlags {
    pub rollover: bool,
}

fn push<T, const N: usize>(out: &mut Vec<T, N>, item: T, flags: &mut KeymapFlags) {
    if out.push(item).is_err() {
        flags.rollover = true;
    }
}

#[derive(Debug)]
pub struct Keymap<const SIZE: usize, const LAYERS: usize> {
    config: Config,
    layers: LayerStack<LAYERS>,
    keys: [Keys<LAYERS>; SIZE],
    mouse: MouseKeys,
    switcher: AppSwitcher,
    typist: SendString,
    pub flags: KeymapFlags,
}

impl<const SIZE: usize, const LAYERS: usize> Keymap<SIZE, LAYERS> {
    pub fn new(keymap: [[KeyShorthand; SIZE]; LAYERS], config: Config) -> Self {
        let keys: [Keys<LAYERS>; SIZE] = core::array::from_fn(|key| Keys {
            current: 0,
            layers: core::array::from_fn(|layer| Key::new(keymap[layer][key])),
            waiting: false,
        });
        Keymap {
            mouse: MouseKeys::new(config.mouse.default_speed),
            config,
            keys,
            layers: LayerStack::new(None),
            switcher: AppSwitcher::new(),
            typist: SendString::new(),
            flags: Default::default(),
        }
    }

    /// `adjust` is on whenever both `lower` and `upper` are
    pub fn with_tri_layer(mut self, lower: Layer, upper: Layer, adjust: Layer) -> Self {
        self.layers = LayerStack::new(Some(TriLayer {
            lower,
            upper,
            adjust,
        }));
        self
    }

    pub fn active_layer(&self) -> Layer {
        self.layers.top()
    }

    pub fn process<const ROLLOVER: usize>(
        &mut self,
        keypresses: &[bool; SIZE],
        report: &mut Report<ROLLOVER>,
        now: Instant,
    ) {
        let mut mouse = MouseInput::default();

        // A key let go while waiting on a tap-hold key makes that a hold
        let interrupted = self
            .keys
            .iter()
            .zip(keypresses)
            .any(|(key, pressed)| key.waiting && !pressed);

        // Tap-hold keys first, the rest read the layers they decide
        let mut undecided = false;
        let mut tapped = false;
        for (key, pressed) in self.keys.iter_mut().zip(keypresses) {
            if key.layers[key.current as usize].is_finished() {
                key.current = key.resolve(&self.layers)
            };
            if let Key::TapHold(state) = &mut key.layers[key.current as usize] {
                let was_waiting = state.is_waiting();
                state.taphold_transition(
                    *pressed,
                    interrupted,
                    now,
                    &self.config,
                    &mut self.layers,
                );
                undecided |= state.is_waiting();
                tapped |= was_waiting && state.get_key().is_some();
                if let Some(key) = state.get_key() {
                    push(&mut report.keys, key, &mut self.flags);
                }
            }
        }
        // After a tap the held back keys go out on the next scan, behind the tap key
        let hold_back = undecided || tapped;

        for (key, pressed) in self.keys.iter_mut().zip(keypresses) {
            if matches!(key.layers[key.current as usize], Key::TapHold(_)) {
                continue;
            }
            if key.layers[key.current as usize].is_finished() {
                if hold_back && (key.waiting || *pressed) {
                    key.waiting = true;
                    continue;
                }
                key.current = key.resolve(&self.layers)
            };
            // Replay a press that was held back, even if the key is already up again
            let pressed = *pressed || core::mem::take(&mut key.waiting);

            match &mut key.layers[key.current as usize] {
                Key::Transparent | Key::TapHold(_) => (),
                Key::Button(state) => {
                    state.key_transition(pressed);
                    match state.get_key() {
                        Some(Keyboard::NoEventIndicated) | None => (),
                        Some(key) => push(&mut report.keys, key, &mut self.flags),
                    }
                }
                Key::Layer(state) => state.layer_transition(pressed, &mut self.layers),
                Key::Mouse(state) => {
                    if let Some(Edge::Press) = state.key_transition(pressed) {
                        self.mouse.click(state.key());
                    }
                    if let Some(key) = state.get_key() {
                        mouse.add(key);
                    }
                }
                Key::Media(state) => {
                    state.key_transition(pressed);
                    if let Some(key) = state.get_key() {
                        push(&mut report.media, key, &mut self.flags);
                    }
                }
                Key::Custom(state) => {
                    let custom = state.key();
                    match (state.key_transition(pressed), custom) {
                        (Some(Edge::Press), Custom::ButtonLock) => self.mouse.toggle_lock(),
                        (Some(Edge::Press), Custom::AppNext | Custom::AppPrev) => {
                            self.switcher.press(self.layers.top())
                        }
                        (Some(Edge::Release), Custom::AppNext | Custom::AppPrev) => self
                            .switcher
                            .release(now, self.config.app_switch_timeout),
                        (Some(Edge::Press), Custom::FirmwareInfo) => {
                            if !self.typist.start(FIRMWARE_INFO) {
                                debug!("still typing");
                            }
                        }
                        (Some(Edge::Press), Custom::MouseSpeed(speed)) => {
                            self.mouse.set_speed(speed)
                        }
                        (Some(Edge::Release), Custom::MouseSpeed(_)) => {
                            self.mouse.set_speed(self.config.mouse.default_speed)
                        }
                        _ => (),
                    }
                    if state.get_key().is_some() {
                        for key in custom.held_keys() {
                            push(&mut report.keys, *key, &mut self.flags);
                        }
                    }
                }
            }
        }

        self.switcher.tick(now, self.layers.top());
        if self.switcher.is_active() {
            push(&mut report.keys, Keyboard::LeftAlt, &mut self.flags);
        }

        report.mouse = self.mouse.tick(mouse, now, &self.config.mouse);

        if self.typist.is_busy() {
            report.keys.clear();
            self.typist.step(&mut report.keys);
        }
    }
}
