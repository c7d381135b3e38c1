//! Front-panel key emulation

/// The four front-panel keys, numbered as in the user manual. The
/// device navigates its whole menu system with these, so in principle
/// any front-panel change can be scripted by sending the right key
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftKey {
    Key1,
    Key2,
    Key3,
    Key4,
}

impl SoftKey {
    /// Key 1 on a GMC-300 is the left-arrow (back) key.
    pub const LEFT_ARROW: Self = Self::Key1;
    /// Key 2 is the up-arrow key.
    pub const UP_ARROW: Self = Self::Key2;
    /// Key 3 is the down-arrow key.
    pub const DOWN_ARROW: Self = Self::Key3;
    /// Key 4 is the enter/menu key.
    pub const ENTER: Self = Self::Key4;

    /// ASCII digit embedded in the key-press frame: `'0'` through `'3'`.
    pub fn wire(self) -> u8 {
        match self {
            SoftKey::Key1 => b'0',
            SoftKey::Key2 => b'1',
            SoftKey::Key3 => b'2',
            SoftKey::Key4 => b'3',
        }
    }
}
