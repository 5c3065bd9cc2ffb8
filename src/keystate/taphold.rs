use super::layer::LayerStack;
use super::Instant;
use super::KeyState;
use super::Keyboard;
use super::Keyish;
use super::Layer;
use super::Shared;
use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
pub struct Unpressed {
    layer: Layer,
    tap: Keyboard,
}
/// Pressed, not yet known whether it is a tap or a hold. The layer is still off.
#[derive(Debug, PartialEq, Eq)]
pub struct Wait {
    layer: Layer,
    tap: Keyboard,
    tap_deadline: Instant,
}
/// Held past the tapping term (or interrupted), the layer is on
#[derive(Debug, PartialEq, Eq)]
pub struct Hold {
    layer: Layer,
    tap: Keyboard,
}
/// Released quickly, `tap` is sent until `release_timeout`
#[derive(Debug, PartialEq, Eq)]
pub struct Tap {
    layer: Layer,
    tap: Keyboard,
    release_timeout: Instant,
    again_timeout: Instant,
}
/// Tap sent, another press before `again_timeout` repeats it
#[derive(Debug, PartialEq, Eq)]
pub struct TapAgain {
    layer: Layer,
    tap: Keyboard,
    again_timeout: Instant,
}
/// Pressed again soon after a tap, `tap` is held down
#[derive(Debug, PartialEq, Eq)]
pub struct Repeat {
    layer: Layer,
    tap: Keyboard,
}

impl KeyState<Unpressed> {
    fn start(&self, tap_deadline: Instant) -> KeyState<Wait> {
        KeyState {
            state: Wait {
                layer: self.state.layer,
                tap: self.state.tap,
                tap_deadline,
            },
            shared: self.shared,
        }
    }
}

impl KeyState<Wait> {
    fn hold(&self) -> KeyState<Hold> {
        KeyState {
            state: Hold {
                layer: self.state.layer,
                tap: self.state.tap,
            },
            shared: self.shared,
        }
    }

    fn tap(&self, release_timeout: Instant, again_timeout: Instant) -> KeyState<Tap> {
        KeyState {
            state: Tap {
                layer: self.state.layer,
                tap: self.state.tap,
                release_timeout,
                again_timeout,
            },
            shared: self.shared,
        }
    }

    fn release(&self) -> KeyState<Unpressed> {
        KeyState {
            state: Unpressed {
                layer: self.state.layer,
                tap: self.state.tap,
            },
            shared: self.shared,
        }
    }
}

impl KeyState<Hold> {
    fn release(&self) -> KeyState<Unpressed> {
        KeyState {
            state: Unpressed {
                layer: self.state.layer,
                tap: self.state.tap,
            },
            shared: self.shared,
        }
    }
}

impl KeyState<Tap> {
    fn tap_again(&self) -> KeyState<TapAgain> {
        KeyState {
            state: TapAgain {
                layer: self.state.layer,
                tap: self.state.tap,
                again_timeout: self.state.again_timeout,
            },
            shared: self.shared,
        }
    }
}

impl KeyState<TapAgain> {
    fn repeat(&self) -> KeyState<Repeat> {
        KeyState {
            state: Repeat {
                layer: self.state.layer,
                tap: self.state.tap,
            },
            shared: self.shared,
        }
    }

    fn start(&self, tap_deadline: Instant) -> KeyState<Wait> {
        KeyState {
            state: Wait {
                layer: self.state.layer,
                tap: self.state.tap,
                tap_deadline,
            },
            shared: self.shared,
        }
    }

    fn timeout(&self) -> KeyState<Unpressed> {
        KeyState {
            state: Unpressed {
                layer: self.state.layer,
                tap: self.state.tap,
            },
            shared: self.shared,
        }
    }
}

impl KeyState<Repeat> {
    fn release(&self) -> KeyState<Unpressed> {
        KeyState {
            state: Unpressed {
                layer: self.state.layer,
                tap: self.state.tap,
            },
            shared: self.shared,
        }
    }
}

/// Layer while held, a key when tapped
#[derive(Debug, PartialEq, Eq)]
pub enum TapHoldState {
    Unpressed(KeyState<Unpressed>),
    Wait(KeyState<Wait>),
    Hold(KeyState<Hold>),
    Tap(KeyState<Tap>),
    TapAgain(KeyState<TapAgain>),
    Repeat(KeyState<Repeat>),
}

impl Keyish for TapHoldState {
    fn is_finished(&self) -> bool {
        matches!(self, TapHoldState::Unpressed(_))
    }
}

impl TapHoldState {
    pub fn new(layer: Layer, tap: Keyboard) -> Self {
        Self::Unpressed(KeyState {
            state: Unpressed { layer, tap },
            shared: Shared,
        })
    }

    /// Other keys wait while this is undecided
    pub fn is_waiting(&self) -> bool {
        matches!(self, TapHoldState::Wait(_))
    }

    /// `interrupted` means a key pressed during the wait has already been released, which makes
    /// this a hold even inside the tapping term
    pub fn taphold_transition<const N: usize>(
        &mut self,
        pressed: bool,
        interrupted: bool,
        now: Instant,
        config: &Config,
        layers: &mut LayerStack<N>,
    ) {
        match &self {
            Self::Unpressed(state) if pressed => {
                *self = Self::Wait(state.start(now + config.tapping_term))
            }
            Self::Unpressed(_state) => (),

            Self::Wait(state) if !pressed && now < state.state.tap_deadline => {
                trace!("tap {=u8}", state.state.layer);
                *self = Self::Tap(state.tap(now + config.tap_release, now + config.tap_repeat))
            }
            Self::Wait(state) if !pressed => *self = Self::Unpressed(state.release()),
            Self::Wait(state) if interrupted || state.state.tap_deadline <= now => {
                layers.activate(state.state.layer);
                *self = Self::Hold(state.hold())
            }
            Self::Wait(_state) => (),

            Self::Hold(state) if !pressed => {
                layers.deactivate(state.state.layer);
                *self = Self::Unpressed(state.release())
            }
            Self::Hold(_state) => (),

            // Pressed again, one scan without the tap so the repeat is a new press
            Self::Tap(state) if pressed || state.state.release_timeout <= now => {
                *self = Self::TapAgain(state.tap_again())
            }
            Self::Tap(_state) => (),

            Self::TapAgain(state) if state.state.again_timeout <= now => {
                if pressed {
                    *self = Self::Wait(state.start(now + config.tapping_term))
                } else {
                    *self = Self::Unpressed(state.timeout())
                }
            }
            Self::TapAgain(state) if pressed => *self = Self::Repeat(state.repeat()),
            Self::TapAgain(_state) => (),

            Self::Repeat(state) if !pressed => *self = Self::Unpressed(state.release()),
            Self::Repeat(_state) => (),
        }
    }

    pub fn get_key(&self) -> Option<Keyboard> {
        match self {
            // None
            Self::Unpressed(_) => None,
            Self::Wait(_) => None,
            Self::Hold(_) => None,
            Self::TapAgain(_) => None,
            // Some
            Self::Tap(state) => Some(state.state.tap),
            Self::Repeat(state) => Some(state.state.tap),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn config() -> Config {
        Config {
            tapping_term: 4,
            tap_release: 2,
            tap_repeat: 6,
            ..Config::default()
        }
    }

    #[test]
    fn get_keys_taphold_nothing() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);
        for now in 0..10 {
            state.taphold_transition(false, false, now, &config(), &mut layers);
            assert_eq!(state.get_key(), None);
            assert_eq!(layers.top(), 0);
        }
    }

    #[test]
    fn get_keys_taphold_tap() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);

        state.taphold_transition(true, false, 0, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert!(state.is_waiting());
        assert_eq!(layers.top(), 0);
        state.taphold_transition(true, false, 3, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert_eq!(layers.top(), 0);

        state.taphold_transition(false, false, 3, &config(), &mut layers);
        assert_eq!(state.get_key(), Some(Keyboard::Tab));
        assert_eq!(layers.top(), 0);
        assert!(!state.is_finished());
        state.taphold_transition(false, false, 4, &config(), &mut layers);
        assert_eq!(state.get_key(), Some(Keyboard::Tab));
        state.taphold_transition(false, false, 5, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert!(!state.is_finished());
        state.taphold_transition(false, false, 9, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert!(state.is_finished());
    }

    #[test]
    fn get_keys_taphold_hold() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);

        state.taphold_transition(true, false, 0, &config(), &mut layers);
        for now in 1..4 {
            state.taphold_transition(true, false, now, &config(), &mut layers);
            assert_eq!(layers.top(), 0);
        }
        for now in 4..10 {
            state.taphold_transition(true, false, now, &config(), &mut layers);
            assert_eq!(state.get_key(), None);
            assert_eq!(layers.top(), 1);
        }
        state.taphold_transition(false, false, 10, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert_eq!(layers.top(), 0);
        assert!(state.is_finished());
    }

    #[test]
    fn get_keys_taphold_interrupted() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);

        state.taphold_transition(true, false, 0, &config(), &mut layers);
        state.taphold_transition(true, true, 1, &config(), &mut layers);
        assert_eq!(layers.top(), 1);
        state.taphold_transition(false, false, 2, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert_eq!(layers.top(), 0);
    }

    #[test]
    /// Released exactly at the tapping term counts as a hold
    fn get_keys_taphold_at_term() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);

        state.taphold_transition(true, false, 0, &config(), &mut layers);
        state.taphold_transition(false, false, 4, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert_eq!(layers.top(), 0);
        assert!(state.is_finished());
    }

    #[test]
    /// Tap then press again repeats the tap key while held
    fn get_keys_taphold_repeat() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);

        state.taphold_transition(true, false, 0, &config(), &mut layers);
        state.taphold_transition(false, false, 1, &config(), &mut layers);
        assert_eq!(state.get_key(), Some(Keyboard::Tab));
        state.taphold_transition(true, false, 2, &config(), &mut layers);
        // Released for a scan so the host sees a new press
        assert_eq!(state.get_key(), None);
        for now in 3..20 {
            state.taphold_transition(true, false, now, &config(), &mut layers);
            assert_eq!(state.get_key(), Some(Keyboard::Tab));
            assert_eq!(layers.top(), 0);
        }
        state.taphold_transition(false, false, 20, &config(), &mut layers);
        assert_eq!(state.get_key(), None);
        assert!(state.is_finished());
    }

    #[test]
    /// A press after the repeat window is a new tap-or-hold
    fn get_keys_taphold_press_after_repeat() {
        let mut state = TapHoldState::new(1, Keyboard::Tab);
        let mut layers = LayerStack::<2>::new(None);

        state.taphold_transition(true, false, 0, &config(), &mut layers);
        state.taphold_transition(false, false, 1, &config(), &mut layers);
        state.taphold_transition(false, false, 3, &config(), &mut layers);
        state.taphold_transition(true, false, 7, &config(), &mut layers);
        assert!(state.is_waiting());
        state.taphold_transition(true, false, 11, &config(), &mut layers);
        assert_eq!(layers.top(), 1);
        assert_eq!(state.get_key(), None);
    }
}
