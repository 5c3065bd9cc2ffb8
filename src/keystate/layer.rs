use super::KeyState;
use super::Keyish;
use super::Layer;
use super::Shared;

use heapless::Vec;

#[derive(Debug, PartialEq, Eq)]
pub struct Unpressed {
    layer: Layer,
}
#[derive(Debug, PartialEq, Eq)]
pub struct ShiftedLayer {
    layer: Layer,
}

impl KeyState<Unpressed> {
    fn shift(&self) -> KeyState<ShiftedLayer> {
        KeyState {
            state: ShiftedLayer {
                layer: self.state.layer,
            },
            shared: self.shared,
        }
    }
}

impl KeyState<ShiftedLayer> {
    fn release(&self) -> KeyState<Unpressed> {
        KeyState {
            state: Unpressed {
                layer: self.state.layer,
            },
            shared: self.shared,
        }
    }
}

/// Momentary layer key: the layer is on for as long as the key is held
#[derive(Debug, PartialEq, Eq)]
pub enum LayerState {
    Unpressed(KeyState<Unpressed>),
    Pressed(KeyState<ShiftedLayer>),
}

impl Keyish for LayerState {
    fn is_finished(&self) -> bool {
        matches!(self, LayerState::Unpressed(_))
    }
}

impl LayerState {
    pub fn new(layer: Layer) -> Self {
        Self::Unpressed(KeyState {
            state: Unpressed { layer },
            shared: Shared,
        })
    }

    pub fn layer_transition<const N: usize>(&mut self, pressed: bool, layers: &mut LayerStack<N>) {
        match &self {
            Self::Unpressed(state) if pressed => {
                layers.activate(state.state.layer);
                *self = Self::Pressed(state.shift());
            }
            Self::Pressed(state) if !pressed => {
                layers.deactivate(state.state.layer);
                *self = Self::Unpressed(state.release());
            }
            _ => (),
        }
    }
}

/// When both `lower` and `upper` are on, `adjust` is on as well
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriLayer {
    pub lower: Layer,
    pub upper: Layer,
    pub adjust: Layer,
}

/// Layers on top of the base layer, the most recently activated last
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LayerStack<const N: usize> {
    active: Vec<Layer, N>,
    tri_layer: Option<TriLayer>,
}

impl<const N: usize> LayerStack<N> {
    pub fn new(tri_layer: Option<TriLayer>) -> Self {
        LayerStack {
            active: Vec::new(),
            tri_layer,
        }
    }

    /// Move `layer` to the top
    pub fn activate(&mut self, layer: Layer) {
        self.active.retain(|active| *active != layer);
        if self.active.push(layer).is_err() {
            warn!("no room for layer {=u8}", layer);
        }
        self.update_tri_layer();
        trace!("layer {=u8} on, top {=u8}", layer, self.top());
    }

    pub fn deactivate(&mut self, layer: Layer) {
        self.active.retain(|active| *active != layer);
        self.update_tri_layer();
        trace!("layer {=u8} off, top {=u8}", layer, self.top());
    }

    pub fn is_active(&self, layer: Layer) -> bool {
        layer == 0 || self.active.contains(&layer)
    }

    /// The layer lookups start from
    pub fn top(&self) -> Layer {
        self.active.last().copied().unwrap_or(0)
    }

    /// Active layers from the top down, ending with the base layer
    pub fn iter(&self) -> impl Iterator<Item = Layer> + '_ {
        self.active
            .iter()
            .rev()
            .copied()
            .chain(core::iter::once(0))
    }

    fn update_tri_layer(&mut self) {
        let Some(TriLayer {
            lower,
            upper,
            adjust,
        }) = self.tri_layer
        else {
            return;
        };
        self.active.retain(|active| *active != adjust);
        if self.is_active(lower) && self.is_active(upper) {
            self.active.push(adjust).ok();
        }
    }
}
