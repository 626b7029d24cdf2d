use serde::{Deserialize, Serialize};

pub const PLAN_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub version: u32,
    pub fingers: usize,
    pub frames: Vec<Frame>,
    /// Input characters with no chord in the layout, in text order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedChar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedChar {
    /// Character position in the input text.
    pub index: usize,
    pub ch: char,
}

/// Even plan positions are press frames, odd positions are release frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Press(PressFrame),
    Release(ReleaseFrame),
}

impl Frame {
    pub fn labels(&self) -> Vec<String> {
        match self {
            Frame::Press(p) => p.labels(),
            Frame::Release(r) => r.labels(),
        }
    }
}

/// Rows to press into, as 1-based digits; `None` leaves the finger alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressFrame {
    pub rows: Vec<Option<u8>>,
}

impl PressFrame {
    pub fn empty(finger_count: usize) -> Self {
        Self {
            rows: vec![None; finger_count],
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.map(|d| d.to_string()).unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFrame {
    pub fingers: Vec<FingerRelease>,
}

impl ReleaseFrame {
    pub fn idle(finger_count: usize) -> Self {
        Self {
            fingers: vec![FingerRelease::Idle; finger_count],
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.fingers.iter().map(|f| f.as_str().to_string()).collect()
    }

    /// True if the frame lifts at least one finger, i.e. transmits the held chord.
    pub fn transmits(&self) -> bool {
        self.fingers.contains(&FingerRelease::Release)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerRelease {
    /// Not involved in this step.
    #[default]
    #[serde(rename = "")]
    Idle,
    /// Stays pressed.
    Hold,
    /// Lifted now.
    Release,
}

impl FingerRelease {
    pub fn as_str(self) -> &'static str {
        match self {
            FingerRelease::Idle => "",
            FingerRelease::Hold => "hold",
            FingerRelease::Release => "release",
        }
    }
}
