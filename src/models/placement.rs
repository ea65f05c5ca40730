use serde::{Deserialize, Serialize};

/// English ordinal suffix with the 11/12/13 exception.
pub fn ordinal_suffix(i: u64) -> &'static str {
    let (j, k) = (i % 10, i % 100);
    match j {
        1 if k != 11 => "st",
        2 if k != 12 => "nd",
        3 if k != 13 => "rd",
        _ => "th",
    }
}

/// "1st", "2nd", "13th", "102nd", ...
pub fn ordinal_label(i: u64) -> String {
    format!("{}{}", i, ordinal_suffix(i))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_position(position: u64) -> Option<Self> {
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

/// Display decoration for a podium position; empty past third place.
pub fn medal_marker(position: u64) -> &'static str {
    Medal::for_position(position).map(|m| m.marker()).unwrap_or("")
}
