//! The Mitosis layout
//!
//! Five rows of ten columns, the outer columns of the two thumb rows have no keys.

use crate::config::Config;
use crate::keystate::{KeyShorthand, Keymap, Layer};

// Export as pub so that it can be used from macro
#[doc(hidden)]
pub use paste::paste;

pub const ROWS: usize = 5;
pub const COLS: usize = 10;
pub const SIZE: usize = ROWS * COLS;
pub const LAYERS: usize = 4;
/// Physical keys
pub const KEYS: usize = 3 * COLS + 2 * (COLS - 2);

pub const BASE: Layer = 0;
pub const NUM: Layer = 1;
pub const FN: Layer = 2;
/// On while both NUM and FN are
pub const ADJUST: Layer = 3;

pub type KeymapT = Keymap<SIZE, LAYERS>;

/// Matrix index of a physical position
pub const fn index(row: usize, col: usize) -> usize {
    row * COLS + col
}

/// Spreads the physical keys over the matrix, leaving the thumb rows' outer columns empty
pub fn layout(keys: [KeyShorthand; KEYS]) -> [KeyShorthand; SIZE] {
    let mut matrix = [KeyShorthand::No; SIZE];
    let mut keys = keys.into_iter();
    for row in 0..ROWS {
        let cols = if row < 3 { 0..COLS } else { 1..COLS - 1 };
        for col in cols {
            if let Some(key) = keys.next() {
                matrix[index(row, col)] = key;
            }
        }
    }
    matrix
}

#[rustfmt::skip]
#[macro_export]
macro_rules! make_key {
    (___) => { $crate::keystate::KeyShorthand::Tr };
    (XXX) => { $crate::keystate::KeyShorthand::No };

    ((MO $layer:tt)) => { $crate::keystate::KeyShorthand::La($layer) };
    ((LT $layer:tt $tap:ident)) => {
        $crate::keystate::KeyShorthand::LT($layer, $crate::keystate::prelude::$tap)
    };

    // Have numbers translate to number keys
    ($n:literal) => {
        $crate::keystate::KeyShorthand::Kb(
            $crate::keymap::paste! { $crate::keystate::prelude::[<K $n>] },
        )
    };

    // Keyboard keys and the custom keys of the prelude
    ($i:ident) => {
        $crate::keystate::KeyShorthand::from($crate::keystate::prelude::$i)
    };
}

#[macro_export]
macro_rules! make_layer {
    ( $( $t:tt ),* $(,)? ) => {
        $crate::keymap::layout([ $( $crate::keymap::make_key!($t) ),* ])
    };
}

// Export the macros
pub use make_key;
pub use make_layer;

// For alignment with `vi]:EasyAlign <C-r>4<CR>*,
#[rustfmt::skip]
pub fn layers() -> [[KeyShorthand; SIZE]; LAYERS] {
    [
        make_layer![
            Q,    W,    E,    R,    T,             Y,    U,    I,    O,    P,
            A,    S,    D,    F,    G,             H,    J,    K,    L,    SCLN,
            Z,    X,    C,    V,    B,             N,    M,    COMM, DOT,  SLSH,
                  XXX,  XXX,  LCTL, SPC,         LSFT, XXX,  XXX,  BSPC,
                  XXX,  LGUI, ESC,  (LT FN TAB), (LT NUM DEL), ENT, XXX, XXX,
        ],
        make_layer![
            TAB,  ___,  ___,  MINS, EQL,           RBRC, PAST, PPLS, PMNS, LBRC,
            1,    2,    3,    4,    5,             6,    7,    8,    9,    0,
            F1,   F2,   F3,   F4,   F5,            F6,   F7,   F8,   F9,   F10,
                  F11,  F12,  ___,  ___,           ___,  ___,  ___,  ___,
                  ___,  ___,  ___,  ___,           ___,  ___,  ___,  ___,
        ],
        make_layer![
            GRV,   MS_UL, MS_U,  MS_UR, ___,       WH_U,  WH_L, BTN3, WH_R, LBRC,
            MS_DL, MS_L,  MS_D,  MS_R,  MS_DR,     WH_D,  BTN1, BTN2, LOCK, QUOT,
            APP,   MPRV,  MPLY,  MSTP,  MNXT,      APP_N, BSPC, DEL,  INS,  BSLS,
                   VOLU,  ___,   ___,   ___,       ___,   ___,  PGUP, ___,
                   VOLD,  APP_P, ___,   ___,       ___,   HOME, PGDN, END,
        ],
        make_layer![
            INFO, XXX,  XXX,  XXX,  XXX,           XXX,  XXX,  XXX,  XXX,  XXX,
            ACL0, ACL1, ACL2, XXX,  XXX,           XXX,  XXX,  XXX,  XXX,  XXX,
            XXX,  XXX,  XXX,  XXX,  XXX,           XXX,  XXX,  XXX,  XXX,  XXX,
                  ___,  ___,  ___,  ___,           ___,  ___,  ___,  ___,
                  ___,  ___,  ___,  ___,           ___,  ___,  ___,  ___,
        ],
    ]
}

pub fn keymap() -> KeymapT {
    Keymap::new(layers(), Config::default()).with_tri_layer(NUM, FN, ADJUST)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::keystate::prelude::*;
    use crate::keystate::{Media, Report};
    use crate::led::{layer_color, Color};
    use crate::config::TAPPING_TERM;
    use crate::mouse::{BUTTON1, BUTTON2};

    const FN_KEY: usize = index(4, 4);
    const NUM_KEY: usize = index(4, 5);

    fn press(keys: &[usize]) -> [bool; SIZE] {
        let mut pressed = [false; SIZE];
        for key in keys {
            pressed[*key] = true;
        }
        pressed
    }

    #[test]
    fn layout_skips_missing_keys() {
        let [base, num, fn_layer, adjust] = layers();
        assert_eq!(base[index(0, 0)], Kb(Q));
        assert_eq!(base[index(2, 9)], Kb(SLSH));
        assert_eq!(base[index(3, 0)], No);
        assert_eq!(base[index(3, 3)], Kb(LCTL));
        assert_eq!(base[index(3, 8)], Kb(BSPC));
        assert_eq!(base[index(3, 9)], No);
        assert_eq!(base[FN_KEY], LT(FN, Tab));
        assert_eq!(base[NUM_KEY], LT(NUM, DeleteForward));
        assert_eq!(base[index(4, 9)], No);
        assert_eq!(num[index(1, 0)], Kb(Keyboard1));
        assert_eq!(num[index(1, 9)], Kb(Keyboard0));
        assert_eq!(num[index(3, 2)], Kb(F12));
        assert_eq!(fn_layer[index(0, 1)], MS_UL);
        assert_eq!(adjust[index(0, 0)], INFO);
    }

    #[test]
    fn base_layer_types() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[index(0, 0), index(3, 4)]), &mut report, 0);
        assert_eq!(report.keys, [Q, Space]);
        assert_eq!(layer_color(keymap.active_layer()), Some(Color::Off));
    }

    #[test]
    fn fn_tap_is_tab() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        assert_eq!(keymap.active_layer(), BASE);
        report.clear();
        keymap.process(&press(&[]), &mut report, 50);
        assert_eq!(report.keys, [Tab]);
        assert_eq!(keymap.active_layer(), BASE);
    }

    #[test]
    fn fn_tap_rolled_into_next_key() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        let a = index(1, 0);
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        report.clear();
        keymap.process(&press(&[FN_KEY, a]), &mut report, 30);
        assert!(report.keys.is_empty());
        report.clear();
        keymap.process(&press(&[a]), &mut report, 60);
        assert_eq!(report.keys, [Tab]);
        report.clear();
        keymap.process(&press(&[a]), &mut report, 61);
        assert_eq!(report.keys, [Tab, A]);
        assert!(report.mouse.is_idle());
        assert_eq!(keymap.active_layer(), BASE);
        report.clear();
        keymap.process(&press(&[]), &mut report, 90);
        assert!(report.keys.is_empty());
    }

    #[test]
    fn fn_double_tap_holds_tab() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        report.clear();
        keymap.process(&press(&[]), &mut report, 10);
        assert_eq!(report.keys, [Tab]);
        report.clear();
        keymap.process(&press(&[FN_KEY]), &mut report, 30);
        assert!(report.keys.is_empty());
        report.clear();
        keymap.process(&press(&[FN_KEY]), &mut report, 31);
        assert_eq!(report.keys, [Tab]);
        report.clear();
        keymap.process(&press(&[FN_KEY]), &mut report, 500);
        assert_eq!(report.keys, [Tab]);
        assert_eq!(keymap.active_layer(), BASE);
        report.clear();
        keymap.process(&press(&[]), &mut report, 501);
        assert!(report.keys.is_empty());
    }

    #[test]
    fn fn_hold_moves_mouse_diagonally() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        keymap.process(&press(&[FN_KEY]), &mut report, TAPPING_TERM);
        assert_eq!(keymap.active_layer(), FN);
        assert_eq!(layer_color(keymap.active_layer()), Some(Color::Blue));
        report.clear();
        keymap.process(&press(&[FN_KEY, index(0, 3)]), &mut report, TAPPING_TERM + 1);
        assert_eq!((report.mouse.x, report.mouse.y), (5, -5));
        assert!(report.keys.is_empty());

        report.clear();
        keymap.process(&press(&[]), &mut report, 300);
        assert!(report.keys.is_empty());
        assert!(report.mouse.is_idle());
    }

    #[test]
    fn fn_button_lock_until_click() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        keymap.process(&press(&[FN_KEY]), &mut report, TAPPING_TERM);
        keymap.process(&press(&[FN_KEY, index(1, 8)]), &mut report, TAPPING_TERM + 1);
        keymap.process(&press(&[]), &mut report, 300);
        report.clear();
        keymap.process(&press(&[]), &mut report, 301);
        assert_eq!(report.mouse.buttons, BUTTON1);

        // Right click lets go of the locked left button
        keymap.process(&press(&[FN_KEY]), &mut report, 400);
        keymap.process(&press(&[FN_KEY]), &mut report, 400 + TAPPING_TERM);
        report.clear();
        keymap.process(&press(&[FN_KEY, index(1, 7)]), &mut report, 401 + TAPPING_TERM);
        assert_eq!(report.mouse.buttons, BUTTON2);
        report.clear();
        keymap.process(&press(&[]), &mut report, 700);
        assert_eq!(report.mouse.buttons, 0);
    }

    #[test]
    fn fn_media() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        keymap.process(&press(&[FN_KEY]), &mut report, TAPPING_TERM);
        report.clear();
        keymap.process(&press(&[FN_KEY, index(2, 2)]), &mut report, TAPPING_TERM + 1);
        assert_eq!(report.media, [Media::PlayPause]);
    }

    #[test]
    fn num_layer_numbers() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[NUM_KEY]), &mut report, 0);
        keymap.process(&press(&[NUM_KEY]), &mut report, TAPPING_TERM);
        assert_eq!(layer_color(keymap.active_layer()), Some(Color::Red));
        report.clear();
        keymap.process(
            &press(&[NUM_KEY, index(1, 4), index(0, 1)]),
            &mut report,
            TAPPING_TERM + 1,
        );
        // Transparent falls through to W
        assert_eq!(report.keys, [W, Keyboard5]);
    }

    #[test]
    fn adjust_types_firmware_info() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        keymap.process(&press(&[FN_KEY, NUM_KEY]), &mut report, 0);
        assert_eq!(keymap.active_layer(), BASE);
        keymap.process(&press(&[FN_KEY, NUM_KEY]), &mut report, TAPPING_TERM);
        assert_eq!(keymap.active_layer(), ADJUST);
        assert_eq!(layer_color(keymap.active_layer()), Some(Color::Magenta));

        report.clear();
        keymap.process(
            &press(&[FN_KEY, NUM_KEY, index(0, 0)]),
            &mut report,
            TAPPING_TERM + 1,
        );
        assert_eq!(report.keys, [M]);
    }

    #[test]
    fn app_switcher_until_fn_released() {
        let mut keymap = keymap();
        let mut report: Report<8> = Default::default();
        let app_next = index(2, 5);
        keymap.process(&press(&[FN_KEY]), &mut report, 0);
        report.clear();
        keymap.process(&press(&[FN_KEY, app_next]), &mut report, 300);
        assert_eq!(report.keys, [Tab, LeftAlt]);
        report.clear();
        keymap.process(&press(&[FN_KEY]), &mut report, 301);
        assert_eq!(report.keys, [LeftAlt]);
        report.clear();
        keymap.process(&press(&[FN_KEY, app_next]), &mut report, 302);
        assert_eq!(report.keys, [Tab, LeftAlt]);
        report.clear();
        keymap.process(&press(&[FN_KEY]), &mut report, 303);
        report.clear();
        keymap.process(&press(&[]), &mut report, 304);
        assert!(report.keys.is_empty());
    }
}
