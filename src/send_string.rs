//! Types out strings, one character every other scan

use heapless::Vec;

use crate::keystate::Keyboard;

/// What the firmware-info key types
pub const FIRMWARE_INFO: &str = concat!("mitosis/binarycode @ ", env!("CARGO_PKG_VERSION"));

/// Key code and whether shift is needed to type `c` on a US layout
pub fn ascii_key(c: u8) -> Option<(Keyboard, bool)> {
    let key = match c {
        b'a'..=b'z' => (Keyboard::from(Into::<u8>::into(Keyboard::A) + (c - b'a')), false),
        b'A'..=b'Z' => (Keyboard::from(Into::<u8>::into(Keyboard::A) + (c - b'A')), true),
        b'1'..=b'9' => (
            Keyboard::from(Into::<u8>::into(Keyboard::Keyboard1) + (c - b'1')),
            false,
        ),
        b'0' => (Keyboard::Keyboard0, false),
        b'!' => (Keyboard::Keyboard1, true),
        b'@' => (Keyboard::Keyboard2, true),
        b'#' => (Keyboard::Keyboard3, true),
        b'$' => (Keyboard::Keyboard4, true),
        b'%' => (Keyboard::Keyboard5, true),
        b'^' => (Keyboard::Keyboard6, true),
        b'&' => (Keyboard::Keyboard7, true),
        b'*' => (Keyboard::Keyboard8, true),
        b'(' => (Keyboard::Keyboard9, true),
        b')' => (Keyboard::Keyboard0, true),
        b' ' => (Keyboard::Space, false),
        b'\n' => (Keyboard::ReturnEnter, false),
        b'\t' => (Keyboard::Tab, false),
        b'-' => (Keyboard::Minus, false),
        b'_' => (Keyboard::Minus, true),
        b'=' => (Keyboard::Equal, false),
        b'+' => (Keyboard::Equal, true),
        b'[' => (Keyboard::LeftBrace, false),
        b'{' => (Keyboard::LeftBrace, true),
        b']' => (Keyboard::RightBrace, false),
        b'}' => (Keyboard::RightBrace, true),
        b'\\' => (Keyboard::Backslash, false),
        b'|' => (Keyboard::Backslash, true),
        b';' => (Keyboard::Semicolon, false),
        b':' => (Keyboard::Semicolon, true),
        b'\'' => (Keyboard::Apostrophe, false),
        b'"' => (Keyboard::Apostrophe, true),
        b'`' => (Keyboard::Grave, false),
        b'~' => (Keyboard::Grave, true),
        b',' => (Keyboard::Comma, false),
        b'<' => (Keyboard::Comma, true),
        b'.' => (Keyboard::Dot, false),
        b'>' => (Keyboard::Dot, true),
        b'/' => (Keyboard::ForwardSlash, false),
        b'?' => (Keyboard::ForwardSlash, true),
        _ => return None,
    };
    Some(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Press,
    Release,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SendString {
    text: &'static [u8],
    pos: usize,
    phase: Phase,
}

impl Default for SendString {
    fn default() -> Self {
        Self::new()
    }
}

impl SendString {
    pub const fn new() -> Self {
        SendString {
            text: &[],
            pos: 0,
            phase: Phase::Press,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pos < self.text.len()
    }

    /// Start typing `text`, unless already typing something
    pub fn start(&mut self, text: &'static str) -> bool {
        if self.is_busy() {
            return false;
        }
        debug!("typing {=str}", text);
        self.text = text.as_bytes();
        self.pos = 0;
        self.phase = Phase::Press;
        true
    }

    /// Put this scan's keys into `keys`: a character, or nothing between characters
    pub fn step<const N: usize>(&mut self, keys: &mut Vec<Keyboard, N>) {
        if self.phase == Phase::Release {
            self.pos += 1;
            self.phase = Phase::Press;
            return;
        }
        while let Some(&c) = self.text.get(self.pos) {
            if let Some((key, shift)) = ascii_key(c) {
                if shift {
                    keys.push(Keyboard::LeftShift).ok();
                }
                keys.push(key).ok();
                self.phase = Phase::Release;
                return;
            }
            trace!("cannot type {=u8}", c);
            self.pos += 1;
        }
    }
}
