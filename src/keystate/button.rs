use super::KeyState;
use super::Keyish;
use super::Shared;

#[derive(Debug, PartialEq, Eq)]
pub struct Unpressed<K> {
    pub(super) key: K,
}
#[derive(Debug, PartialEq, Eq)]
pub struct Pressed<K> {
    pub(super) key: K,
}

/// Which way a button just moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Press,
    Release,
}

impl<K: Copy> KeyState<Unpressed<K>> {
    fn press(&self) -> KeyState<Pressed<K>> {
        KeyState {
            state: Pressed {
                key: self.state.key,
            },
            shared: self.shared,
        }
    }
}

impl<K: Copy> KeyState<Pressed<K>> {
    fn release(&self) -> KeyState<Unpressed<K>> {
        KeyState {
            state: Unpressed {
                key: self.state.key,
            },
            shared: self.shared,
        }
    }
}

/// A key that is down while held: keyboard keys, mouse keys, media keys and custom keys
#[derive(Debug, PartialEq, Eq)]
pub enum ButtonState<K> {
    Unpressed(KeyState<Unpressed<K>>),
    Pressed(KeyState<Pressed<K>>),
}

impl<K> Keyish for ButtonState<K> {
    fn is_finished(&self) -> bool {
        matches!(self, ButtonState::Unpressed(_))
    }
}

impl<K: Copy> ButtonState<K> {
    pub fn new(key: K) -> Self {
        Self::Unpressed(KeyState {
            state: Unpressed { key },
            shared: Shared,
        })
    }

    pub fn key_transition(&mut self, pressed: bool) -> Option<Edge> {
        match &self {
            Self::Unpressed(state) if pressed => {
                *self = Self::Pressed(state.press());
                Some(Edge::Press)
            }
            Self::Pressed(state) if !pressed => {
                *self = Self::Unpressed(state.release());
                Some(Edge::Release)
            }
            _ => None,
        }
    }

    /// The key, whether or not it is pressed
    pub fn key(&self) -> K {
        match self {
            ButtonState::Unpressed(KeyState { state, .. }) => state.key,
            ButtonState::Pressed(KeyState { state, .. }) => state.key,
        }
    }

    pub fn get_key(&self) -> Option<K> {
        match self {
            ButtonState::Unpressed(_) => None,
            ButtonState::Pressed(KeyState { state, .. }) => Some(state.key),
        }
    }
}
