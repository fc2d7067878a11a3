//! Direction symbols to key codes.
//! Sequence symbols map onto the mac virtual keycodes the StreamDock hotkey action expects.

// ANSI layout positions
pub const VK_A: i32 = 0x00;
pub const VK_S: i32 = 0x01;
pub const VK_D: i32 = 0x02;
pub const VK_W: i32 = 0x0D;

/// Keycode slots that carry no key.
pub const VK_NONE: i32 = -1;

/// `None` for symbols outside the table; the caller decides whether that is an error.
pub fn key_code(symbol: char) -> Option<i32> {
    match symbol {
        's' => Some(VK_S),
        'w' => Some(VK_W),
        'a' => Some(VK_A),
        'd' => Some(VK_D),
        _ => None,
    }
}
