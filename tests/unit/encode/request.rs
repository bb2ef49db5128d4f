use super::*;
use crate::audio::pcm::{MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::narration::binder::{AudioHandle, NarrationResult};
use crate::script::{ScriptSegment, SegmentKind};
use crate::timeline::plan::{ScenePlan, TimelineConfig};

fn timeline(narration: &[f64], frame_size: (u32, u32)) -> SceneTimeline {
    let mut segments = vec![ScriptSegment {
        kind: SegmentKind::Intro,
        text: "i".into(),
    }];
    let mut narrations = Vec::new();
    for (i, d) in narration.iter().enumerate() {
        let seg = ScriptSegment {
            kind: SegmentKind::Item(i),
            text: format!("s{i}"),
        };
        narrations.push(NarrationResult {
            segment: seg.clone(),
            audio: AudioHandle::new("x.mp3"),
            duration_secs: *d,
        });
        segments.push(seg);
    }
    segments.push(ScriptSegment {
        kind: SegmentKind::Ending,
        text: "e".into(),
    });
    let cfg = TimelineConfig {
        intro_secs: 3.0,
        ending_secs: 2.0,
        item_padding_secs: 0.5,
    };
    let plan = ScenePlan::build(&segments, &narrations, &cfg).unwrap();
    let frames = (0..segments.len())
        .map(|i| RenderedFrame {
            scene_index: i,
            width: frame_size.0,
            height: frame_size.1,
            data: vec![255; (frame_size.0 * frame_size.1 * 4) as usize],
        })
        .collect();
    plan.attach_frames(frames).unwrap()
}

fn silence(secs: f64) -> AudioTrack {
    let frames = (secs * f64::from(MIX_SAMPLE_RATE)).round() as usize;
    AudioTrack {
        sample_rate: MIX_SAMPLE_RATE,
        channels: MIX_CHANNELS,
        interleaved_f32: vec![0.0; frames * 2],
    }
}

fn fps() -> Fps {
    Fps::integer(30).unwrap()
}

#[test]
fn matching_audio_builds_request() {
    let tl = timeline(&[4.0, 5.0], (4, 2));
    let req = EncodingRequest::build(&tl, silence(15.0), fps()).unwrap();
    assert_eq!(req.frames.len(), 4);
    assert_eq!(req.durations, vec![3.0, 4.5, 5.5, 2.0]);
    assert_eq!(req.total_secs(), 15.0);
    assert_eq!((req.width(), req.height()), (4, 2));
}

#[test]
fn drift_within_one_frame_is_accepted() {
    let tl = timeline(&[4.0, 5.0], (2, 2));
    EncodingRequest::build(&tl, silence(15.0 + 0.03), fps()).unwrap();
    EncodingRequest::build(&tl, silence(15.0 - 0.03), fps()).unwrap();
}

#[test]
fn drift_beyond_one_frame_is_a_sync_error() {
    let tl = timeline(&[4.0, 5.0], (2, 2));
    for audio_secs in [15.05, 14.9, 0.0] {
        let err = EncodingRequest::build(&tl, silence(audio_secs), fps()).unwrap_err();
        assert!(matches!(err, NewsreelError::Sync(_)), "{audio_secs}: {err}");
    }
}

#[test]
fn mismatched_frame_sizes_are_rejected() {
    let mut tl = timeline(&[1.0], (2, 2));
    let odd = timeline(&[1.0], (4, 4));
    let mut scenes = tl.scenes().to_vec();
    scenes[1].frame = odd.scenes()[1].frame.clone();
    tl = SceneTimeline::from_scenes(scenes).unwrap();
    let err = EncodingRequest::build(&tl, silence(6.5), fps()).unwrap_err();
    assert!(matches!(err, NewsreelError::Validation(_)));
}

#[test]
fn empty_timeline_is_a_validation_error() {
    let tl = SceneTimeline::from_scenes(Vec::new()).unwrap();
    let err = EncodingRequest::build(&tl, silence(0.0), fps()).unwrap_err();
    assert!(matches!(err, NewsreelError::Validation(_)));
}
