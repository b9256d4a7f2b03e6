//! Cursor movement through the position history.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ToStart,
    Back,
    Forward,
    ToEnd,
}

impl Navigation {
    /// Cursor after applying this step to a history of `len` entries.
    /// Stepping past either end stays put.
    pub fn target(self, cursor: usize, len: usize) -> usize {
        let last = len.saturating_sub(1);
        match self {
            Navigation::ToStart => 0,
            Navigation::Back => cursor.saturating_sub(1),
            Navigation::Forward => (cursor + 1).min(last),
            Navigation::ToEnd => last,
        }
    }
}

impl FromStr for Navigation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Navigation::ToStart),
            "back" | "prev" => Ok(Navigation::Back),
            "forward" | "next" => Ok(Navigation::Forward),
            "end" => Ok(Navigation::ToEnd),
            _ => Err(format!("unknown navigation: {s}")),
        }
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Navigation::ToStart => "start",
            Navigation::Back => "back",
            Navigation::Forward => "forward",
            Navigation::ToEnd => "end",
        };
        f.write_str(name)
    }
}

/// Which navigation buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationControls {
    pub start: bool,
    pub back: bool,
    pub forward: bool,
    pub end: bool,
}

impl NavigationControls {
    pub fn for_cursor(cursor: usize, len: usize) -> Self {
        let at_start = cursor == 0;
        let at_end = cursor + 1 >= len;
        Self {
            start: !at_start,
            back: !at_start,
            forward: !at_end,
            end: !at_end,
        }
    }
}
