use anyhow::{anyhow, ensure, Result};

use crate::fingers::{Chord, Fingers, MAX_FINGERS};
use crate::layout::Layout;
use crate::model::{FingerRelease, Frame, Plan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub frames: usize,
    pub press_frames: usize,
    pub release_frames: usize,
    /// Press entries across all press frames, held fingers included.
    pub presses: usize,
    pub releases: usize,
    pub holds: usize,
}

pub fn stats(plan: &Plan) -> PlanStats {
    let mut out = PlanStats {
        frames: plan.frames.len(),
        ..Default::default()
    };

    for frame in &plan.frames {
        match frame {
            Frame::Press(p) => {
                out.press_frames += 1;
                out.presses += p.rows.iter().flatten().count();
            }
            Frame::Release(r) => {
                out.release_frames += 1;
                for f in &r.fingers {
                    match f {
                        FingerRelease::Release => out.releases += 1,
                        FingerRelease::Hold => out.holds += 1,
                        FingerRelease::Idle => {}
                    }
                }
            }
        }
    }

    out
}

/// Apply a plan to an all-released hand and collect the chords it transmits.
///
/// Fails if a frame is physically impossible: pressing a held finger into a
/// different row, holding or releasing a finger that is up, or leaving any
/// finger down at the end.
pub fn replay(plan: &Plan) -> Result<Vec<Chord>> {
    ensure!(
        (1..=MAX_FINGERS).contains(&plan.fingers),
        "plan finger count must be between 1 and {MAX_FINGERS}, got {}",
        plan.fingers
    );
    let mut fingers = Fingers::new(plan.fingers);
    let mut transmitted = Vec::new();

    for (idx, frame) in plan.frames.iter().enumerate() {
        match frame {
            Frame::Press(p) => {
                ensure!(
                    p.rows.len() == plan.fingers,
                    "frame {idx}: press frame has {} fingers, plan has {}",
                    p.rows.len(),
                    plan.fingers
                );
                for (finger, digit) in p.rows.iter().enumerate() {
                    let Some(digit) = *digit else {
                        continue;
                    };
                    let row = digit
                        .checked_sub(1)
                        .ok_or_else(|| anyhow!("frame {idx}: finger {finger} has row digit 0"))?;
                    if fingers.is_pressed(finger) {
                        ensure!(
                            fingers.row(finger) == row,
                            "frame {idx}: finger {finger} asked for row {digit} while held at row {}",
                            fingers.row(finger) + 1
                        );
                        continue;
                    }
                    fingers.set_row(finger, row);
                    fingers.press(finger);
                }
            }
            Frame::Release(r) => {
                ensure!(
                    r.fingers.len() == plan.fingers,
                    "frame {idx}: release frame has {} fingers, plan has {}",
                    r.fingers.len(),
                    plan.fingers
                );
                if r.transmits() {
                    transmitted.push(fingers.held_chord());
                }
                for (finger, action) in r.fingers.iter().enumerate() {
                    match action {
                        FingerRelease::Idle => {}
                        FingerRelease::Hold => {
                            ensure!(
                                fingers.is_pressed(finger),
                                "frame {idx}: finger {finger} held but not pressed"
                            );
                        }
                        FingerRelease::Release => {
                            ensure!(
                                fingers.is_pressed(finger),
                                "frame {idx}: finger {finger} released but not pressed"
                            );
                            fingers.release(finger);
                        }
                    }
                }
            }
        }
    }

    ensure!(
        fingers.is_all_released(),
        "plan ends with fingers still pressed: {:?}",
        fingers.pressed().iter().collect::<Vec<_>>()
    );

    Ok(transmitted)
}

/// Replay a plan and map every transmitted chord back to its character.
pub fn simulate_typed_text(plan: &Plan, layout: &Layout) -> Result<String> {
    ensure!(
        plan.fingers == layout.finger_count(),
        "plan uses {} fingers but layout has {}",
        plan.fingers,
        layout.finger_count()
    );

    replay(plan)?
        .iter()
        .map(|chord| {
            layout
                .char_for_chord(chord)
                .ok_or_else(|| anyhow!("transmitted chord {chord} is not in the layout"))
        })
        .collect()
}
