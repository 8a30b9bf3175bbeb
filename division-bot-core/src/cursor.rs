//! The cursor document shared by the post-backed and file-backed stores.
//!
//! Both stores persist the same two-key YAML document:
//!
//! ```yaml
//! last_commons_vote: 1825
//! last_lords_vote: 3124
//! ```

use serde::{Deserialize, Serialize};

use crate::chamber::Chamber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorDocument {
    pub last_commons_vote: i64,
    pub last_lords_vote: i64,
}

impl CursorDocument {
    pub fn get(&self, chamber: Chamber) -> i64 {
        match chamber {
            Chamber::Commons => self.last_commons_vote,
            Chamber::Lords => self.last_lords_vote,
        }
    }

    pub fn set(&mut self, chamber: Chamber, division_id: i64) {
        match chamber {
            Chamber::Commons => self.last_commons_vote = division_id,
            Chamber::Lords => self.last_lords_vote = division_id,
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
