use tracing::debug;

use crate::cost::CostTable;
use crate::fingers::{Chord, FingerSet, Fingers};
use crate::model::{FingerRelease, PressFrame, ReleaseFrame};

/// Frames and effort for moving from one chord to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Lifts that transmit the previously held chord.
    pub release: ReleaseFrame,
    /// Presses that form the target chord.
    pub press: PressFrame,
    /// Travel, press and re-press effort in cost-table units.
    pub cost: u64,
}

/// Move `fingers` to `target`, mutating it in place.
///
/// A finger that has to change row while held is lifted first, which also
/// transmits the previous chord. Otherwise the previous chord is transmitted
/// by a roll (some fingers lift while others press) or, as a last resort, by
/// lifting and re-pressing the cheapest finger shared by both chords.
pub fn transition_to(fingers: &mut Fingers, target: &Chord, costs: &CostTable) -> Transition {
    let finger_count = fingers.finger_count();
    let target_pressed = target.pressed();
    let mut cost = 0u64;

    let mut re_press_needed = !fingers.is_all_released();
    let mut released_by_move: Option<usize> = None;

    for finger in target_pressed.iter() {
        let Some(target_row) = target.row(finger) else {
            continue;
        };
        let current_row = fingers.row(finger);
        if current_row == target_row {
            continue;
        }

        if fingers.is_pressed(finger) {
            debug!(finger, "previous chord released by a move");
            re_press_needed = false;
            fingers.release(finger);
            // Only the last moved finger is tracked.
            released_by_move = Some(finger);
        }
        fingers.set_row(finger, target_row);

        let distance = u64::from(current_row.abs_diff(target_row));
        cost += u64::from(costs.travel_cost(finger).unwrap_or(0)) * distance;
    }

    let to_release = fingers.pressed().difference(target_pressed);
    let to_press = target_pressed.difference(fingers.pressed());

    let mut to_repress: Option<usize> = None;
    if re_press_needed {
        if !to_release.is_empty() && !to_press.is_empty() {
            debug!("previous chord released by a roll");
        } else if let Some((finger, press_cost)) =
            cheapest_re_press(fingers, fingers.pressed().intersection(target_pressed), costs)
        {
            debug!(finger, "previous chord released by a re-press");
            fingers.release(finger);
            to_repress = Some(finger);
            cost += 2 * u64::from(press_cost);
        }
    }

    fingers.release_all(to_release);

    let mut press = PressFrame::empty(finger_count);
    for finger in target_pressed.iter() {
        press.rows[finger] = target.row(finger).map(|row| row + 1);
    }

    let mut release = ReleaseFrame::idle(finger_count);
    for finger in fingers.pressed().iter() {
        release.fingers[finger] = FingerRelease::Hold;
    }
    let lifted = to_release
        .iter()
        .chain(released_by_move)
        .chain(to_repress);
    for finger in lifted {
        release.fingers[finger] = FingerRelease::Release;
    }

    for finger in target_pressed.difference(fingers.pressed()).iter() {
        fingers.press(finger);
        cost += u64::from(costs.press_cost(finger, fingers.row(finger)).unwrap_or(0));
    }

    Transition {
        release,
        press,
        cost,
    }
}

/// Lowest press cost among `candidates` at their current rows; the lowest
/// index wins ties and fingers without a cost entry are never chosen.
fn cheapest_re_press(
    fingers: &Fingers,
    candidates: FingerSet,
    costs: &CostTable,
) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for finger in candidates.iter() {
        let Some(cost) = costs.press_cost(finger, fingers.row(finger)) else {
            continue;
        };
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((finger, cost));
        }
    }
    best
}
