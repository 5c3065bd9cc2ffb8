//! The receiver's RGB LED shows the active layer

use embedded_hal::digital::v2::OutputPin;

use crate::keymap::{ADJUST, BASE, FN, NUM};
use crate::keystate::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Off,
    Red,
    Blue,
    Magenta,
}

impl Color {
    /// Which of the red, green and blue channels are lit
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            Color::Off => (false, false, false),
            Color::Red => (true, false, false),
            Color::Blue => (false, false, true),
            Color::Magenta => (true, false, true),
        }
    }
}

/// `None` leaves the LED as it was
pub fn layer_color(layer: Layer) -> Option<Color> {
    match layer {
        BASE => Some(Color::Off),
        FN => Some(Color::Blue),
        NUM => Some(Color::Red),
        ADJUST => Some(Color::Magenta),
        _ => None,
    }
}

/// Common-anode RGB LED, a channel is lit when its pin is low
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    color: Option<Color>,
}

impl<E, R: OutputPin<Error = E>, G: OutputPin<Error = E>, B: OutputPin<Error = E>>
    RgbLed<R, G, B>
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        RgbLed {
            red,
            green,
            blue,
            color: None,
        }
    }

    pub fn set(&mut self, color: Color) -> Result<(), E> {
        if self.color == Some(color) {
            return Ok(());
        }
        let (red, green, blue) = color.channels();
        self.red.set_state((!red).into())?;
        self.green.set_state((!green).into())?;
        self.blue.set_state((!blue).into())?;
        self.color = Some(color);
        Ok(())
    }

    pub fn show_layer(&mut self, layer: Layer) -> Result<(), E> {
        match layer_color(layer) {
            Some(color) => self.set(color),
            None => Ok(()),
        }
    }

    pub fn free(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}
