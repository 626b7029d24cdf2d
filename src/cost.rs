use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Per-finger effort table in milliseconds.
///
/// `press[f][row]` is the cost of pressing finger `f` into `row`; `travel[f]`
/// is the cost of moving finger `f` by one row. Entries may be missing for
/// rows a finger cannot reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub press: Vec<Vec<u32>>,
    #[serde(default)]
    pub travel: Vec<u32>,
}

impl Default for CostTable {
    /// Thumb, index, middle, ring and pinky of the reference five-finger keyer.
    fn default() -> Self {
        Self {
            press: vec![
                vec![60, 40, 60],
                vec![50, 130],
                vec![55, 140],
                vec![60, 150],
                vec![70],
            ],
            travel: vec![80, 100, 110, 150, 130],
        }
    }
}

impl CostTable {
    pub fn press_cost(&self, finger: usize, row: u8) -> Option<u32> {
        self.press.get(finger)?.get(row as usize).copied()
    }

    pub fn travel_cost(&self, finger: usize) -> Option<u32> {
        self.travel.get(finger).copied()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse cost table JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }
}
