use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Result};

/// Widest chord a `FingerSet` can describe.
pub const MAX_FINGERS: usize = 32;

/// Fixed-width bit-set of finger indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FingerSet(u32);

impl FingerSet {
    pub const EMPTY: FingerSet = FingerSet(0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, finger: usize) -> bool {
        self.0 & (1 << finger) != 0
    }

    pub fn insert(&mut self, finger: usize) {
        self.0 |= 1 << finger;
    }

    pub fn remove(&mut self, finger: usize) {
        self.0 &= !(1 << finger);
    }

    pub fn intersection(self, other: FingerSet) -> FingerSet {
        FingerSet(self.0 & other.0)
    }

    /// Fingers in `self` that are not in `other`.
    pub fn difference(self, other: FingerSet) -> FingerSet {
        FingerSet(self.0 & !other.0)
    }

    /// Finger indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let finger = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(finger)
        })
    }
}

/// Target configuration for one character: per finger, either unpressed or a 0-based row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    rows: Vec<Option<u8>>,
}

impl Chord {
    /// Parse the digit form used by layout tables: '0' is unpressed, `d` is row `d - 1`.
    pub fn parse(s: &str) -> Result<Self> {
        let rows = s
            .chars()
            .enumerate()
            .map(|(idx, c)| match c.to_digit(10) {
                Some(0) => Ok(None),
                Some(d) => Ok(Some((d - 1) as u8)),
                None => Err(anyhow!(
                    "invalid chord {s:?}: finger {idx} has {c:?}, expected a digit"
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        ensure!(!rows.is_empty(), "chord must not be empty");
        ensure!(
            rows.len() <= MAX_FINGERS,
            "chord {s:?} has {} fingers; at most {MAX_FINGERS} are supported",
            rows.len()
        );

        Ok(Self { rows })
    }

    pub fn finger_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, finger: usize) -> Option<u8> {
        self.rows.get(finger).copied().flatten()
    }

    pub fn pressed(&self) -> FingerSet {
        let mut set = FingerSet::EMPTY;
        for (finger, row) in self.rows.iter().enumerate() {
            if row.is_some() {
                set.insert(finger);
            }
        }
        set
    }
}

impl FromStr for Chord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Chord::parse(s)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            match row {
                Some(r) => write!(f, "{}", r + 1)?,
                None => f.write_str("0")?,
            }
        }
        Ok(())
    }
}

/// Which fingers are held down, and which row each finger sits over.
///
/// `row(f)` is only meaningful for fingers that are pressed or have been
/// positioned for pressing; untouched fingers report row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingers {
    pressed: FingerSet,
    rows: Vec<u8>,
}

impl Fingers {
    /// All fingers released.
    pub fn new(finger_count: usize) -> Self {
        debug_assert!(finger_count <= MAX_FINGERS);
        Self {
            pressed: FingerSet::EMPTY,
            rows: vec![0; finger_count],
        }
    }

    pub fn from_chord(chord: &Chord) -> Self {
        let mut fingers = Self::new(chord.finger_count());
        for finger in 0..chord.finger_count() {
            if let Some(row) = chord.row(finger) {
                fingers.press(finger);
                fingers.set_row(finger, row);
            }
        }
        fingers
    }

    pub fn finger_count(&self) -> usize {
        self.rows.len()
    }

    pub fn pressed(&self) -> FingerSet {
        self.pressed
    }

    pub fn is_pressed(&self, finger: usize) -> bool {
        self.pressed.contains(finger)
    }

    pub fn is_all_released(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn press(&mut self, finger: usize) {
        self.pressed.insert(finger);
    }

    pub fn release(&mut self, finger: usize) {
        self.pressed.remove(finger);
    }

    pub fn release_all(&mut self, fingers: FingerSet) {
        self.pressed = self.pressed.difference(fingers);
    }

    pub fn row(&self, finger: usize) -> u8 {
        self.rows[finger]
    }

    pub fn set_row(&mut self, finger: usize, row: u8) {
        self.rows[finger] = row;
    }

    /// The chord currently held, i.e. what a release right now would transmit.
    pub fn held_chord(&self) -> Chord {
        let rows = (0..self.finger_count())
            .map(|f| self.is_pressed(f).then(|| self.rows[f]))
            .collect();
        Chord { rows }
    }
}
