//! For ease and shorthand
pub use super::KeyShorthand::*;
pub use super::Keyboard::*;

use super::{Custom, KeyShorthand, Media};
use crate::mouse::{MouseKey, Speed};

pub const NOP: super::Keyboard = NoEventIndicated;

pub const K0: super::Keyboard = Keyboard0;
pub const K1: super::Keyboard = Keyboard1;
pub const K2: super::Keyboard = Keyboard2;
pub const K3: super::Keyboard = Keyboard3;
pub const K4: super::Keyboard = Keyboard4;
pub const K5: super::Keyboard = Keyboard5;
pub const K6: super::Keyboard = Keyboard6;
pub const K7: super::Keyboard = Keyboard7;
pub const K8: super::Keyboard = Keyboard8;
pub const K9: super::Keyboard = Keyboard9;

pub const LSFT: super::Keyboard = LeftShift;
pub const LCTL: super::Keyboard = LeftControl;
pub const LALT: super::Keyboard = LeftAlt;
pub const LGUI: super::Keyboard = LeftGUI;
pub const RSFT: super::Keyboard = RightShift;
pub const RCTL: super::Keyboard = RightControl;
pub const RALT: super::Keyboard = RightAlt;
pub const RGUI: super::Keyboard = RightGUI;

pub const ESC: super::Keyboard = Escape;
pub const TAB: super::Keyboard = Tab;
pub const SPC: super::Keyboard = Space;
pub const ENT: super::Keyboard = ReturnEnter;
pub const BSPC: super::Keyboard = DeleteBackspace;
pub const DEL: super::Keyboard = DeleteForward;
pub const INS: super::Keyboard = Insert;
pub const APP: super::Keyboard = Application;
pub const PGUP: super::Keyboard = PageUp;
pub const PGDN: super::Keyboard = PageDown;
pub const HOME: super::Keyboard = Home;
pub const END: super::Keyboard = End;

pub const SCLN: super::Keyboard = Semicolon;
pub const QUOT: super::Keyboard = Apostrophe;
pub const GRV: super::Keyboard = Grave;
pub const COMM: super::Keyboard = Comma;
pub const DOT: super::Keyboard = Dot;
pub const SLSH: super::Keyboard = ForwardSlash;
pub const BSLS: super::Keyboard = Backslash;
pub const MINS: super::Keyboard = Minus;
pub const EQL: super::Keyboard = Equal;
pub const LBRC: super::Keyboard = LeftBrace;
pub const RBRC: super::Keyboard = RightBrace;

pub const PAST: super::Keyboard = KeypadMultiply;
pub const PPLS: super::Keyboard = KeypadAdd;
pub const PMNS: super::Keyboard = KeypadSubtract;

pub const MS_U: KeyShorthand = Ms(MouseKey::Up);
pub const MS_D: KeyShorthand = Ms(MouseKey::Down);
pub const MS_L: KeyShorthand = Ms(MouseKey::Left);
pub const MS_R: KeyShorthand = Ms(MouseKey::Right);
pub const MS_UL: KeyShorthand = Ms(MouseKey::UpLeft);
pub const MS_UR: KeyShorthand = Ms(MouseKey::UpRight);
pub const MS_DL: KeyShorthand = Ms(MouseKey::DownLeft);
pub const MS_DR: KeyShorthand = Ms(MouseKey::DownRight);
pub const WH_U: KeyShorthand = Ms(MouseKey::WheelUp);
pub const WH_D: KeyShorthand = Ms(MouseKey::WheelDown);
pub const WH_L: KeyShorthand = Ms(MouseKey::WheelLeft);
pub const WH_R: KeyShorthand = Ms(MouseKey::WheelRight);
pub const BTN1: KeyShorthand = Ms(MouseKey::Button1);
pub const BTN2: KeyShorthand = Ms(MouseKey::Button2);
pub const BTN3: KeyShorthand = Ms(MouseKey::Button3);
pub const ACL0: KeyShorthand = Cu(Custom::MouseSpeed(Speed::Slow));
pub const ACL1: KeyShorthand = Cu(Custom::MouseSpeed(Speed::Medium));
pub const ACL2: KeyShorthand = Cu(Custom::MouseSpeed(Speed::Fast));
pub const LOCK: KeyShorthand = Cu(Custom::ButtonLock);

pub const MPRV: KeyShorthand = Md(Media::PrevTrack);
pub const MPLY: KeyShorthand = Md(Media::PlayPause);
pub const MSTP: KeyShorthand = Md(Media::Stop);
pub const MNXT: KeyShorthand = Md(Media::NextTrack);
pub const VOLU: KeyShorthand = Md(Media::VolumeUp);
pub const VOLD: KeyShorthand = Md(Media::VolumeDown);

pub const APP_N: KeyShorthand = Cu(Custom::AppNext);
pub const APP_P: KeyShorthand = Cu(Custom::AppPrev);
pub const INFO: KeyShorthand = Cu(Custom::FirmwareInfo);

/// Falls through to the layer below
pub const ___: KeyShorthand = Tr;
pub const XXX: KeyShorthand = No;
