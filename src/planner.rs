use anyhow::{ensure, Result};
use tracing::warn;

use crate::cost::CostTable;
use crate::fingers::{Fingers, MAX_FINGERS};
use crate::layout::Layout;
use crate::model::{FingerRelease, Frame, Plan, ReleaseFrame, SkippedChar, PLAN_VERSION};
use crate::transition::transition_to;

/// Plans finger motion for one layout and cost table.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    layout: &'a Layout,
    costs: &'a CostTable,
}

impl<'a> Planner<'a> {
    pub fn new(layout: &'a Layout, costs: &'a CostTable) -> Result<Self> {
        let fingers = layout.finger_count();
        ensure!(
            (1..=MAX_FINGERS).contains(&fingers),
            "layout finger count must be between 1 and {MAX_FINGERS}, got {fingers}"
        );
        if costs.press.len() < fingers {
            warn!(
                fingers,
                cost_rows = costs.press.len(),
                "cost table does not cover every finger; uncovered fingers are never re-pressed"
            );
        }
        Ok(Self { layout, costs })
    }

    /// Press and release frames for typing `text`, alternating press then
    /// release, with a final release that transmits the last chord.
    ///
    /// Characters missing from the layout produce no frames and are listed in
    /// `Plan::skipped`.
    pub fn finger_plan(&self, text: &str) -> Plan {
        let finger_count = self.layout.finger_count();
        let mut fingers = Fingers::new(finger_count);
        let mut frames = Vec::new();
        let mut skipped = Vec::new();

        for (index, ch) in text.chars().enumerate() {
            let Some(chord) = self.layout.primary(ch) else {
                warn!(index, ch = ?ch, "character not found in layout; skipping");
                skipped.push(SkippedChar { index, ch });
                continue;
            };

            let transition = transition_to(&mut fingers, chord, self.costs);

            // Nothing is held before the first chord, so its release frame is empty.
            if !frames.is_empty() {
                frames.push(Frame::Release(transition.release));
            }
            frames.push(Frame::Press(transition.press));
        }

        if !frames.is_empty() {
            let mut last = ReleaseFrame::idle(finger_count);
            for finger in fingers.pressed().iter() {
                last.fingers[finger] = FingerRelease::Release;
            }
            frames.push(Frame::Release(last));
        }

        Plan {
            version: PLAN_VERSION,
            fingers: finger_count,
            frames,
            skipped,
        }
    }

    /// Total transition effort of typing `text`.
    ///
    /// Unlike `finger_plan`, every alias chord of a character is considered and
    /// the cheapest is taken. Scoring starts with the thumb over row 1, and an
    /// unknown character drops the hand back to that resting position.
    pub fn score_text(&self, text: &str) -> u64 {
        let mut fingers = self.scoring_rest();
        let mut total = 0u64;

        for ch in text.chars() {
            match self.layout.chords(ch) {
                [] => fingers = self.scoring_rest(),
                [only] => total += transition_to(&mut fingers, only, self.costs).cost,
                options => {
                    let mut best: Option<(u64, Fingers)> = None;
                    for chord in options {
                        let mut candidate = fingers.clone();
                        let cost = transition_to(&mut candidate, chord, self.costs).cost;
                        if best.as_ref().map_or(true, |(best_cost, _)| cost < *best_cost) {
                            best = Some((cost, candidate));
                        }
                    }
                    if let Some((cost, next)) = best {
                        total += cost;
                        fingers = next;
                    }
                }
            }
        }

        total
    }

    /// Hand position the scorer starts from and falls back to: all released,
    /// thumb over row 1, other fingers over row 0.
    fn scoring_rest(&self) -> Fingers {
        let mut fingers = Fingers::new(self.layout.finger_count());
        fingers.set_row(0, 1);
        fingers
    }
}

/// Convenience wrapper for a single planning pass.
pub fn finger_plan(text: &str, layout: &Layout, costs: &CostTable) -> Result<Plan> {
    Ok(Planner::new(layout, costs)?.finger_plan(text))
}
