use crate::model::{FingerRelease, Frame, Plan};

/// One console line per frame, e.g. `press   1 . 2 . .` or `release R H . . .`.
pub fn plan_trace(plan: &Plan) -> Vec<String> {
    plan.frames.iter().map(frame_line).collect()
}

fn frame_line(frame: &Frame) -> String {
    let (label, cells): (&str, Vec<String>) = match frame {
        Frame::Press(p) => (
            "press",
            p.rows
                .iter()
                .map(|r| r.map_or_else(|| ".".to_string(), |d| d.to_string()))
                .collect(),
        ),
        Frame::Release(r) => (
            "release",
            r.fingers
                .iter()
                .map(|f| {
                    match f {
                        FingerRelease::Idle => ".",
                        FingerRelease::Hold => "H",
                        FingerRelease::Release => "R",
                    }
                    .to_string()
                })
                .collect(),
        ),
    };

    format!("{label:<8}{}", cells.join(" "))
}
