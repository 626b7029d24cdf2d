use pretty_assertions::assert_eq;

use chordplan::cost::CostTable;
use chordplan::layout::Layout;
use chordplan::model::{FingerRelease, Frame, SkippedChar};
use chordplan::planner::{finger_plan, Planner};
use chordplan::sim::{replay, simulate_typed_text, stats};

fn hello_layout() -> Layout {
    Layout::from_map([
        ('h', vec!["10000"]),
        ('e', vec!["01000"]),
        ('l', vec!["00100"]),
        ('o', vec!["11000"]),
        (' ', vec!["20000"]),
        ('w', vec!["02000"]),
        ('r', vec!["01100"]),
        ('d', vec!["00011"]),
    ])
    .expect("layout should parse")
}

fn labels(frames: &[Frame]) -> Vec<Vec<String>> {
    frames.iter().map(Frame::labels).collect()
}

#[test]
fn single_character_plan_is_press_then_release() {
    let layout = Layout::from_map([('a', vec!["10000"])]).unwrap();
    let plan = finger_plan("a", &layout, &CostTable::default()).unwrap();

    assert_eq!(plan.fingers, 5);
    assert_eq!(
        labels(&plan.frames),
        vec![
            vec!["1", "", "", "", ""],
            vec!["release", "", "", "", ""],
        ]
    );
    assert!(plan.skipped.is_empty());
}

#[test]
fn unknown_characters_are_skipped() {
    let layout = Layout::from_map([('a', vec!["10000"])]).unwrap();
    let costs = CostTable::default();
    let planner = Planner::new(&layout, &costs).unwrap();

    let reference = planner.finger_plan("a");
    let trailing = planner.finger_plan("ab");
    let leading = planner.finger_plan("ba");

    assert_eq!(trailing.frames, reference.frames);
    assert_eq!(leading.frames, reference.frames);
    assert_eq!(trailing.skipped, vec![SkippedChar { index: 1, ch: 'b' }]);
    assert_eq!(leading.skipped, vec![SkippedChar { index: 0, ch: 'b' }]);
}

#[test]
fn text_without_known_characters_has_no_frames() {
    let layout = hello_layout();
    let costs = CostTable::default();
    let plan = Planner::new(&layout, &costs).unwrap().finger_plan("xyz");

    assert!(plan.frames.is_empty());
    assert_eq!(plan.skipped.len(), 3);
}

#[test]
fn frames_alternate_and_count_two_per_character() {
    let layout = hello_layout();
    let costs = CostTable::default();
    let plan = Planner::new(&layout, &costs)
        .unwrap()
        .finger_plan("hello, world!");

    // ',' and '!' are not in the layout.
    assert_eq!(plan.frames.len(), 2 * 11);
    for (idx, frame) in plan.frames.iter().enumerate() {
        match frame {
            Frame::Press(p) => {
                assert_eq!(idx % 2, 0, "press frame at odd index {idx}");
                assert_eq!(p.rows.len(), 5);
            }
            Frame::Release(r) => {
                assert_eq!(idx % 2, 1, "release frame at even index {idx}");
                assert_eq!(r.fingers.len(), 5);
            }
        }
    }

    let s = stats(&plan);
    assert_eq!(s.press_frames, 11);
    assert_eq!(s.release_frames, 11);
}

#[test]
fn planning_is_deterministic() {
    let layout = hello_layout();
    let costs = CostTable::default();
    let planner = Planner::new(&layout, &costs).unwrap();

    assert_eq!(
        planner.finger_plan("hello world"),
        planner.finger_plan("hello world")
    );
}

#[test]
fn replay_types_the_input_text_and_ends_released() {
    let layout = hello_layout();
    let plan = finger_plan("hello world", &layout, &CostTable::default()).unwrap();

    let transmitted = replay(&plan).expect("plan should be physically valid");
    assert_eq!(transmitted.len(), 11);
    assert_eq!(simulate_typed_text(&plan, &layout).unwrap(), "hello world");
}

#[test]
fn repeated_letters_re_press_to_transmit() {
    let layout = hello_layout();
    let plan = finger_plan("ll", &layout, &CostTable::default()).unwrap();

    assert_eq!(
        labels(&plan.frames),
        vec![
            vec!["", "", "1", "", ""],
            vec!["", "", "release", "", ""],
            vec!["", "", "1", "", ""],
            vec!["", "", "release", "", ""],
        ]
    );
}

#[test]
fn only_the_last_moved_finger_is_marked_released() {
    let layout = Layout::from_map([('a', vec!["11000"]), ('b', vec!["22000"])]).unwrap();
    let plan = finger_plan("ab", &layout, &CostTable::default()).unwrap();

    assert_eq!(
        labels(&plan.frames),
        vec![
            vec!["1", "1", "", "", ""],
            vec!["", "release", "", "", ""],
            vec!["2", "2", "", "", ""],
            vec!["release", "release", "", "", ""],
        ]
    );
    // Finger 0 was lifted too but its frame entry says nothing, so the
    // plan cannot be replayed.
    let err = replay(&plan).unwrap_err();
    assert!(err.to_string().contains("finger 0"), "{err}");
}

#[test]
fn final_frame_releases_every_held_finger() {
    let layout = hello_layout();
    let plan = finger_plan("ed", &layout, &CostTable::default()).unwrap();

    let Some(Frame::Release(last)) = plan.frames.last() else {
        panic!("plan must end with a release frame");
    };
    assert_eq!(
        last.fingers,
        vec![
            FingerRelease::Idle,
            FingerRelease::Idle,
            FingerRelease::Idle,
            FingerRelease::Release,
            FingerRelease::Release,
        ]
    );
}

#[test]
fn plan_serializes_frames_as_labels() {
    let layout = hello_layout();
    let plan = finger_plan("o ", &layout, &CostTable::default()).unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["version"], 1);
    assert_eq!(json["frames"][0]["type"], "press");
    assert_eq!(
        json["frames"][0]["rows"],
        serde_json::json!([1, 1, null, null, null])
    );
    assert_eq!(json["frames"][1]["type"], "release");
    assert_eq!(
        json["frames"][1]["fingers"],
        serde_json::json!(["release", "release", "", "", ""])
    );
    assert!(json.get("skipped").is_none());

    let back: chordplan::model::Plan = serde_json::from_value(json).unwrap();
    assert_eq!(back, plan);
}

#[test]
fn score_adds_transition_costs() {
    let layout = Layout::from_map([
        ('a', vec!["10000"]),
        ('b', vec!["01000"]),
        ('x', vec!["20000"]),
    ])
    .unwrap();
    let costs = CostTable::default();
    let planner = Planner::new(&layout, &costs).unwrap();

    // The thumb rests over row 1, so 'a' travels one row first.
    let first_a = 80 + 60;
    assert_eq!(planner.score_text(""), 0);
    assert_eq!(planner.score_text("ab"), first_a + 50);
    assert_eq!(planner.score_text("aa"), first_a + (2 * 60 + 60));
    assert_eq!(planner.score_text("ax"), first_a + (80 + 40));
    // The unknown '?' drops the hand back to rest, so the second 'a' needs no re-press.
    assert_eq!(planner.score_text("a?a"), first_a + first_a);
}

#[test]
fn score_starts_with_thumb_over_second_row() {
    let layout = Layout::from_map([('x', vec!["20000"]), ('a', vec!["10000"])]).unwrap();
    let costs = CostTable::default();
    let planner = Planner::new(&layout, &costs).unwrap();

    assert_eq!(planner.score_text("x"), 40);
    assert_eq!(planner.score_text("a?x"), 80 + 60 + 40);
}

#[test]
fn score_picks_cheapest_alias() {
    let layout = Layout::from_map([('a', vec!["10000", "01000"]), ('b', vec!["10000"])]).unwrap();
    let costs = CostTable::default();
    let planner = Planner::new(&layout, &costs).unwrap();

    // Rolling onto the alias (50) beats re-pressing the thumb (180).
    assert_eq!(planner.score_text("ba"), 80 + 60 + 50);
    // Plans always use the primary chord.
    let plan = planner.finger_plan("ba");
    assert_eq!(plan.frames[1].labels(), vec!["release", "", "", "", ""]);
    assert_eq!(plan.frames[2].labels(), vec!["1", "", "", "", ""]);
}
