use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two houses, each with its own feed and cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Commons,
    Lords,
}

impl Chamber {
    /// Sync order: Commons first, then Lords.
    pub const ALL: [Chamber; 2] = [Chamber::Commons, Chamber::Lords];

    /// Name used in report headings, e.g. "Commons Vote".
    pub fn name(self) -> &'static str {
        match self {
            Chamber::Commons => "Commons",
            Chamber::Lords => "Lords",
        }
    }

    /// House number as used by the Members API.
    pub fn house_number(self) -> u8 {
        match self {
            Chamber::Commons => 1,
            Chamber::Lords => 2,
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown chamber: {0} (expected \"commons\" or \"lords\")")]
pub struct UnknownChamber(String);

impl FromStr for Chamber {
    type Err = UnknownChamber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "commons" => Ok(Chamber::Commons),
            "lords" => Ok(Chamber::Lords),
            _ => Err(UnknownChamber(s.to_string())),
        }
    }
}
