#![no_std]
//! Keymap for the Mitosis wireless split keyboard: layers, custom keys and the layer LED

#[macro_use]
mod fmt;

pub mod config;
pub mod keymap;
pub mod keystate;
pub mod led;
pub mod link;
pub mod mouse;
pub mod send_string;
pub mod switcher;
