use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, ensure, Context, Result};
use serde::Deserialize;

use crate::fingers::Chord;

/// Character to chord table. A character may have alias chords; the first one
/// is its primary chord.
#[derive(Debug, Clone)]
pub struct Layout {
    finger_count: usize,
    chords: BTreeMap<char, Vec<Chord>>,
    by_chord: HashMap<Chord, char>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonChords {
    One(String),
    Many(Vec<String>),
}

impl Layout {
    pub fn from_map<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut chords = BTreeMap::new();
        let mut finger_count: Option<usize> = None;

        for (c, patterns) in entries {
            ensure!(!patterns.is_empty(), "character {c:?} has no chords");
            let parsed = patterns
                .iter()
                .map(|p| Chord::parse(p.as_ref()).with_context(|| format!("for character {c:?}")))
                .collect::<Result<Vec<_>>>()?;

            for chord in &parsed {
                let width = *finger_count.get_or_insert(chord.finger_count());
                ensure!(
                    chord.finger_count() == width,
                    "chord {chord} for {c:?} has {} fingers; layout uses {width}",
                    chord.finger_count()
                );
            }
            chords.insert(c, parsed);
        }

        let finger_count = finger_count.ok_or_else(|| anyhow!("layout has no chords"))?;

        let mut by_chord = HashMap::new();
        for (c, list) in &chords {
            for chord in list {
                by_chord.entry(chord.clone()).or_insert(*c);
            }
        }

        Ok(Self {
            finger_count,
            chords,
            by_chord,
        })
    }

    /// JSON object mapping single characters to a chord string or a list of chord strings.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, JsonChords> =
            serde_json::from_str(json).context("failed to parse layout JSON")?;

        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let c = single_char(&key)
                .ok_or_else(|| anyhow!("layout key {key:?} must be exactly one character"))?;
            let patterns = match value {
                JsonChords::One(p) => vec![p],
                JsonChords::Many(ps) => ps,
            };
            entries.push((c, patterns));
        }

        Self::from_map(entries)
    }

    /// The layout generator's text format: `<char> -> <chord>[, <alias>...]`
    /// lines following a `Chord Assignments:` header.
    pub fn from_assignments_str(text: &str) -> Result<Self> {
        let mut entries: Vec<(char, Vec<String>)> = Vec::new();
        let mut in_assignments = false;

        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.starts_with("Chord Assignments:") {
                in_assignments = true;
                continue;
            }
            if !in_assignments || line.is_empty() || is_separator(line) {
                continue;
            }

            let Some((char_part, chord_part)) = line.split_once("->") else {
                continue;
            };

            let c = parse_assignment_char(char_part).ok_or_else(|| {
                anyhow!("line {}: cannot read character from {char_part:?}", line_no + 1)
            })?;
            let patterns = chord_part
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            entries.push((c, patterns));
        }

        Self::from_map(entries)
    }

    /// Load JSON for `.json` files and the assignments format otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let layout = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_assignments_str(&text)
        };
        layout.with_context(|| format!("in {}", path.display()))
    }

    pub fn finger_count(&self) -> usize {
        self.finger_count
    }

    pub fn primary(&self, c: char) -> Option<&Chord> {
        self.chords.get(&c).and_then(|list| list.first())
    }

    pub fn chords(&self, c: char) -> &[Chord] {
        self.chords.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Character produced by `chord`; the lowest character wins when several share it.
    pub fn char_for_chord(&self, chord: &Chord) -> Option<char> {
        self.by_chord.get(chord).copied()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut it = s.chars();
    let c = it.next()?;
    it.next().is_none().then_some(c)
}

/// Rule lines start with `=` or `-` and contain a run of ten of that mark.
fn is_separator(line: &str) -> bool {
    ['=', '-'].into_iter().any(|mark| {
        line.starts_with(mark) && line.contains(&mark.to_string().repeat(10))
    })
}

fn parse_assignment_char(part: &str) -> Option<char> {
    let stripped = part.trim();
    if stripped.len() > 2 && stripped.starts_with('\'') && stripped.ends_with('\'') {
        return unescape(&stripped[1..stripped.len() - 1]);
    }
    // Unquoted: first non-space character, which may itself be a control character.
    part.trim_start().chars().next()
}

fn unescape(body: &str) -> Option<char> {
    let mut chars = body.chars();
    let c = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        },
        c => c,
    };
    chars.next().is_none().then_some(c)
}
