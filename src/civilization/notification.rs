use serde::{Deserialize, Serialize};

use map::HexCoord;

/// A human-readable event for the UI, optionally pinned to a tile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub location: Option<HexCoord>,
}

impl Notification {
    pub fn new(text: impl Into<String>, location: Option<HexCoord>) -> Self {
        Self { text: text.into(), location }
    }
}
