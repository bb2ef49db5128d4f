use super::*;
use crate::narration::binder::AudioHandle;

fn segments(items: usize) -> Vec<ScriptSegment> {
    let mut out = vec![ScriptSegment {
        kind: SegmentKind::Intro,
        text: "intro".to_string(),
    }];
    for i in 0..items {
        out.push(ScriptSegment {
            kind: SegmentKind::Item(i),
            text: format!("item {i}"),
        });
    }
    out.push(ScriptSegment {
        kind: SegmentKind::Ending,
        text: "ending".to_string(),
    });
    out
}

fn narrations(durations: &[f64]) -> Vec<NarrationResult> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| NarrationResult {
            segment: ScriptSegment {
                kind: SegmentKind::Item(i),
                text: format!("item {i}"),
            },
            audio: AudioHandle::new(format!("narration_{i:03}.mp3")),
            duration_secs: *d,
        })
        .collect()
}

fn config() -> TimelineConfig {
    TimelineConfig {
        intro_secs: 3.0,
        ending_secs: 2.0,
        item_padding_secs: 0.5,
    }
}

fn frame(scene_index: usize) -> RenderedFrame {
    RenderedFrame {
        scene_index,
        width: 2,
        height: 2,
        data: vec![0; 16],
    }
}

#[test]
fn two_items_lay_out_end_to_end() {
    let plan = ScenePlan::build(&segments(2), &narrations(&[4.0, 5.0]), &config()).unwrap();
    let starts: Vec<f64> = plan.scenes().iter().map(|s| s.start_secs).collect();
    let durations: Vec<f64> = plan.scenes().iter().map(|s| s.duration_secs).collect();
    assert_eq!(starts, vec![0.0, 3.0, 7.5, 13.0]);
    assert_eq!(durations, vec![3.0, 4.5, 5.5, 2.0]);
    assert_eq!(plan.total_secs(), 15.0);
    assert_eq!(plan.item_count(), 2);
}

#[test]
fn scenes_are_contiguous_for_awkward_durations() {
    let ds = [0.1, 0.2, 1.0 / 3.0, 7.77, 2.05];
    let plan = ScenePlan::build(&segments(ds.len()), &narrations(&ds), &config()).unwrap();
    let scenes = plan.scenes();
    assert_eq!(scenes[0].start_secs, 0.0);
    for pair in scenes.windows(2) {
        assert_eq!(pair[1].start_secs, pair[0].start_secs + pair[0].duration_secs);
    }
    let last = scenes.last().unwrap();
    assert_eq!(plan.total_secs(), last.start_secs + last.duration_secs);
}

#[test]
fn narration_count_mismatch_is_a_timeline_error() {
    for ds in [&[4.0][..], &[4.0, 5.0, 6.0][..]] {
        let err = ScenePlan::build(&segments(2), &narrations(ds), &config()).unwrap_err();
        assert!(matches!(err, NewsreelError::Timeline(_)), "{err}");
    }
}

#[test]
fn zero_items_is_intro_then_ending() {
    let plan = ScenePlan::build(&segments(0), &[], &config()).unwrap();
    assert_eq!(plan.scenes().len(), 2);
    assert_eq!(plan.total_secs(), 5.0);
}

#[test]
fn malformed_segment_order_is_rejected() {
    let mut segs = segments(2);
    segs.swap(1, 2);
    let err = ScenePlan::build(&segs, &narrations(&[1.0, 1.0]), &config()).unwrap_err();
    assert!(matches!(err, NewsreelError::Timeline(_)));

    let mut segs = segments(1);
    segs.pop();
    let err = ScenePlan::build(&segs, &narrations(&[1.0]), &config()).unwrap_err();
    assert!(matches!(err, NewsreelError::Timeline(_)));

    let err = ScenePlan::build(&[], &[], &config()).unwrap_err();
    assert!(matches!(err, NewsreelError::Timeline(_)));
}

#[test]
fn narration_for_non_item_segment_is_rejected() {
    let mut narr = narrations(&[1.0]);
    narr[0].segment.kind = SegmentKind::Intro;
    let err = ScenePlan::build(&segments(1), &narr, &config()).unwrap_err();
    assert!(matches!(err, NewsreelError::Timeline(_)));
}

#[test]
fn unusable_narration_duration_is_rejected() {
    let err = ScenePlan::build(&segments(1), &narrations(&[0.0]), &config()).unwrap_err();
    assert!(matches!(err, NewsreelError::Timeline(_)));
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = TimelineConfig {
        item_padding_secs: -0.1,
        ..config()
    };
    let err = ScenePlan::build(&segments(1), &narrations(&[1.0]), &cfg).unwrap_err();
    assert!(matches!(err, NewsreelError::Validation(_)));
}

#[test]
fn frame_span_rounds_to_nearest_frame() {
    let plan = ScenePlan::build(&segments(2), &narrations(&[4.0, 5.0]), &config()).unwrap();
    let fps = Fps::integer(30).unwrap();
    let spans: Vec<(u64, u64)> = plan
        .scenes()
        .iter()
        .map(|s| {
            let r = s.frame_span(fps);
            (r.start.0, r.end.0)
        })
        .collect();
    assert_eq!(spans, vec![(0, 90), (90, 225), (225, 390), (390, 450)]);
}

#[test]
fn attach_frames_matches_by_scene_index() {
    let plan = ScenePlan::build(&segments(2), &narrations(&[4.0, 5.0]), &config()).unwrap();
    let timeline = plan
        .attach_frames(vec![frame(3), frame(1), frame(0), frame(2)])
        .unwrap();
    assert_eq!(timeline.len(), 4);
    for (i, scene) in timeline.scenes().iter().enumerate() {
        assert_eq!(scene.scene_index, i);
        assert_eq!(scene.frame.scene_index, i);
    }
    assert_eq!(timeline.durations(), vec![3.0, 4.5, 5.5, 2.0]);
    assert_eq!(timeline.total_secs(), 15.0);
}

#[test]
fn attach_frames_rejects_gaps_duplicates_and_strays() {
    let plan = ScenePlan::build(&segments(1), &narrations(&[1.0]), &config()).unwrap();
    for frames in [
        vec![frame(0), frame(1)],
        vec![frame(0), frame(1), frame(1)],
        vec![frame(0), frame(1), frame(2), frame(7)],
    ] {
        let err = plan.attach_frames(frames).unwrap_err();
        assert!(matches!(err, NewsreelError::Timeline(_)), "{err}");
    }
}

#[test]
fn from_scenes_checks_order_and_contiguity() {
    let plan = ScenePlan::build(&segments(1), &narrations(&[1.0]), &config()).unwrap();
    let tl = plan
        .attach_frames(vec![frame(0), frame(1), frame(2)])
        .unwrap();

    let rebuilt = SceneTimeline::from_scenes(tl.scenes().to_vec()).unwrap();
    assert_eq!(rebuilt, tl);

    let mut gapped = tl.scenes().to_vec();
    gapped[2].start_secs += 0.25;
    assert!(SceneTimeline::from_scenes(gapped).is_err());

    let mut swapped = tl.scenes().to_vec();
    swapped.swap(0, 1);
    assert!(SceneTimeline::from_scenes(swapped).is_err());
}
