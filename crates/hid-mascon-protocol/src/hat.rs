//! D-pad to hat switch resolution.

/// Hat switch value reported for a released D-pad.
pub const HAT_NEUTRAL: u8 = 8;

/// Compass direction encoded in the hat switch nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    Neutral,
}

impl HatDirection {
    /// Combine the four D-pad inputs into one direction.
    ///
    /// Diagonals are matched before cardinals, clockwise from up-right. Opposite
    /// directions held together never cancel: up+down reports up, left+right
    /// reports right.
    pub fn resolve(up: bool, right: bool, down: bool, left: bool) -> Self {
        if up && right {
            HatDirection::UpRight
        } else if right && down {
            HatDirection::DownRight
        } else if down && left {
            HatDirection::DownLeft
        } else if left && up {
            HatDirection::UpLeft
        } else if up {
            HatDirection::Up
        } else if right {
            HatDirection::Right
        } else if down {
            HatDirection::Down
        } else if left {
            HatDirection::Left
        } else {
            HatDirection::Neutral
        }
    }

    /// Wire nibble: 0 = up, clockwise in 45 degree steps, 8 = neutral.
    pub fn to_nibble(self) -> u8 {
        match self {
            HatDirection::Up => 0,
            HatDirection::UpRight => 1,
            HatDirection::Right => 2,
            HatDirection::DownRight => 3,
            HatDirection::Down => 4,
            HatDirection::DownLeft => 5,
            HatDirection::Left => 6,
            HatDirection::UpLeft => 7,
            HatDirection::Neutral => HAT_NEUTRAL,
        }
    }

    pub fn from_nibble(value: u8) -> Self {
        match value {
            0 => HatDirection::Up,
            1 => HatDirection::UpRight,
            2 => HatDirection::Right,
            3 => HatDirection::DownRight,
            4 => HatDirection::Down,
            5 => HatDirection::DownLeft,
            6 => HatDirection::Left,
            7 => HatDirection::UpLeft,
            _ => HatDirection::Neutral,
        }
    }
}

/// Per-direction magnitudes as stored by the binding layer; non-zero means held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DpadState {
    pub up: u8,
    pub right: u8,
    pub down: u8,
    pub left: u8,
}

impl DpadState {
    pub fn direction(&self) -> HatDirection {
        HatDirection::resolve(self.up != 0, self.right != 0, self.down != 0, self.left != 0)
    }

    /// Hat switch nibble for the current D-pad state.
    pub fn hat_switch(&self) -> u8 {
        self.direction().to_nibble()
    }
}
