//! Frames from the wireless receiver
//!
//! Both halves talk to an nRF receiver, which answers each [`REQUEST`] with two bytes per matrix
//! row (the low and high five columns) followed by [`END_OF_FRAME`].

use core::fmt;

use heapless::Vec;

use crate::keymap::{COLS, ROWS, SIZE};

/// Asks the receiver for the current matrix
pub const REQUEST: u8 = b's';
/// Key bits only use the low five bits, so this cannot be a row byte
pub const END_OF_FRAME: u8 = 0xE0;
pub const FRAME_LEN: usize = 2 * ROWS + 1;

const HALF: usize = COLS / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The last byte was not [`END_OF_FRAME`], bytes were lost or garbled
    Terminator(u8),
    /// The receiver did not answer in time
    Timeout,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Terminator(byte) => write!(f, "bad end of frame {byte:#04x}"),
            FrameError::Timeout => write!(f, "receiver timed out"),
        }
    }
}

/// Fills `keys` from a frame, leaving it untouched if the frame is bad
pub fn decode(frame: &[u8; FRAME_LEN], keys: &mut [bool; SIZE]) -> Result<(), FrameError> {
    match frame[FRAME_LEN - 1] {
        END_OF_FRAME => (),
        byte => return Err(FrameError::Terminator(byte)),
    }
    for row in 0..ROWS {
        let bits = frame[row * 2] as u16 | (frame[row * 2 + 1] as u16) << HALF;
        for col in 0..COLS {
            keys[row * COLS + col] = bits & (1 << col) != 0;
        }
    }
    Ok(())
}

/// Collects a frame one byte at a time
#[derive(Debug, Default)]
pub struct FrameReader {
    buf: Vec<u8, FRAME_LEN>,
}

impl FrameReader {
    pub fn new() -> Self {
        Default::default()
    }

    /// Start over, e.g. after sending a new request
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Returns the frame once complete
    pub fn push(&mut self, byte: u8) -> Option<[u8; FRAME_LEN]> {
        self.buf.push(byte).ok()?;
        if !self.buf.is_full() {
            return None;
        }
        let mut frame = [0; FRAME_LEN];
        frame.copy_from_slice(&self.buf);
        self.buf.clear();
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    fn frame(rows: [u16; ROWS]) -> [u8; FRAME_LEN] {
        let mut frame = [0; FRAME_LEN];
        for (row, bits) in rows.iter().enumerate() {
            frame[row * 2] = (bits & 0x1f) as u8;
            frame[row * 2 + 1] = (bits >> HALF) as u8;
        }
        frame[FRAME_LEN - 1] = END_OF_FRAME;
        frame
    }

    #[test]
    fn empty_frame() {
        let mut keys = [true; SIZE];
        decode(&frame([0; ROWS]), &mut keys).unwrap();
        assert_eq!(keys, [false; SIZE]);
    }

    #[test]
    fn both_halves() {
        let mut keys = [false; SIZE];
        // Row 0 column 0 (Q), row 2 column 9 (slash), row 4 column 5
        decode(&frame([1, 0, 1 << 9, 0, 1 << 5]), &mut keys).unwrap();
        let pressed: std::vec::Vec<usize> = (0..SIZE).filter(|i| keys[*i]).collect();
        assert_eq!(pressed, [0, 29, 45]);
    }

    #[test]
    fn bad_terminator_keeps_keys() {
        let mut keys = [false; SIZE];
        keys[3] = true;
        let mut bad = frame([0x3ff; ROWS]);
        bad[FRAME_LEN - 1] = 0x1f;
        assert_eq!(decode(&bad, &mut keys), Err(FrameError::Terminator(0x1f)));
        assert!(keys[3]);
        assert_eq!(keys.iter().filter(|key| **key).count(), 1);
    }

    #[test]
    fn reader_collects_frames() {
        let mut reader = FrameReader::new();
        let expected = frame([1, 2, 3, 4, 5]);
        for byte in &expected[..FRAME_LEN - 1] {
            assert_eq!(reader.push(*byte), None);
        }
        assert_eq!(reader.push(expected[FRAME_LEN - 1]), Some(expected));
        assert_eq!(reader.push(0), None);
        reader.reset();
        for byte in &expected[..FRAME_LEN - 1] {
            assert_eq!(reader.push(*byte), None);
        }
        assert_eq!(reader.push(expected[FRAME_LEN - 1]), Some(expected));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FrameError::Terminator(0x1f).to_string(),
            "bad end of frame 0x1f"
        );
        assert_eq!(FrameError::Timeout.to_string(), "receiver timed out");
    }
}
