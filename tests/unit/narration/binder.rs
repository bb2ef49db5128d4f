use std::sync::Mutex;

use super::*;
use crate::script::SegmentKind;

/// Writes a placeholder file and reports a duration derived from the text length.
struct FakeTts {
    calls: Mutex<Vec<(String, VoiceId)>>,
    duration: Option<f64>,
    write_file: bool,
}

impl FakeTts {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            duration: None,
            write_file: true,
        }
    }
}

impl Synthesize for FakeTts {
    fn synthesize(&self, text: &str, voice: VoiceId, out_path: &Path) -> NewsreelResult<Narration> {
        self.calls.lock().unwrap().push((text.to_string(), voice));
        if self.write_file {
            std::fs::write(out_path, b"fake").unwrap();
        }
        Ok(Narration {
            audio: AudioHandle::new(out_path),
            duration_secs: self.duration.unwrap_or(text.len() as f64 / 10.0),
        })
    }
}

fn segments(n: usize) -> Vec<ScriptSegment> {
    (0..n)
        .map(|i| ScriptSegment {
            kind: SegmentKind::Item(i),
            text: format!("Story {}: {}", i + 1, "x".repeat(10 * (i + 1))),
        })
        .collect()
}

#[test]
fn voice_parsing_accepts_only_known_voices() {
    assert_eq!(VoiceId::default().as_str(), "zh-CN-XiaoxiaoNeural");
    assert_eq!(
        " en-GB-SoniaNeural ".parse::<VoiceId>().unwrap().as_str(),
        "en-GB-SoniaNeural"
    );
    let err = "en-US-NobodyNeural".parse::<VoiceId>().unwrap_err();
    assert!(matches!(err, NewsreelError::Narration(_)));
    assert_eq!(VoiceId::all().count(), VOICES.len());
}

#[test]
fn voice_serde_uses_plain_string() {
    let v: VoiceId = serde_json::from_str("\"zh-CN-YunxiNeural\"").unwrap();
    assert_eq!(serde_json::to_string(&v).unwrap(), "\"zh-CN-YunxiNeural\"");
    assert!(serde_json::from_str::<VoiceId>("\"bogus\"").is_err());
}

#[test]
fn results_follow_input_order_with_parallel_workers() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeTts::new());
    let binder = NarrationBinder::new(fake.clone(), VoiceId::default(), dir.path()).with_workers(4);

    let segs = segments(6);
    let results = binder.synthesize(&segs).unwrap();

    assert_eq!(results.len(), 6);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.segment, segs[i]);
        assert_eq!(r.audio.path(), dir.path().join(format!("narration_{i:03}.mp3")));
        assert!((r.duration_secs - segs[i].text.len() as f64 / 10.0).abs() < 1e-12);
    }
    assert_eq!(fake.calls.lock().unwrap().len(), 6);
}

#[test]
fn sequential_and_parallel_agree() {
    let dir = tempfile::tempdir().unwrap();
    let segs = segments(4);
    let seq = NarrationBinder::new(Arc::new(FakeTts::new()), VoiceId::default(), dir.path())
        .synthesize(&segs)
        .unwrap();
    let par = NarrationBinder::new(Arc::new(FakeTts::new()), VoiceId::default(), dir.path())
        .with_workers(3)
        .synthesize(&segs)
        .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn non_positive_duration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let fake = FakeTts {
            duration: Some(bad),
            ..FakeTts::new()
        };
        let binder = NarrationBinder::new(Arc::new(fake), VoiceId::default(), dir.path());
        let err = binder.synthesize(&segments(1)).unwrap_err();
        assert!(matches!(err, NewsreelError::Narration(_)), "{bad}: {err}");
    }
}

#[test]
fn missing_audio_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeTts {
        write_file: false,
        ..FakeTts::new()
    };
    let binder = NarrationBinder::new(Arc::new(fake), VoiceId::default(), dir.path());
    let err = binder.synthesize(&segments(2)).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn collaborator_errors_become_narration_errors() {
    struct Failing;
    impl Synthesize for Failing {
        fn synthesize(&self, _: &str, _: VoiceId, _: &Path) -> NewsreelResult<Narration> {
            Err(NewsreelError::validation("service unavailable"))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let binder = NarrationBinder::new(Arc::new(Failing), VoiceId::default(), dir.path());
    let err = binder.synthesize(&segments(3)).unwrap_err();
    assert!(matches!(err, NewsreelError::Narration(_)));
    assert!(err.to_string().contains("service unavailable"));
}

#[test]
fn zero_workers_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let binder = NarrationBinder::new(Arc::new(FakeTts::new()), VoiceId::default(), dir.path())
        .with_workers(0);
    assert!(binder.synthesize(&segments(1)).is_err());
}

#[test]
fn empty_segment_list_yields_no_results() {
    let dir = tempfile::tempdir().unwrap();
    let binder = NarrationBinder::new(Arc::new(FakeTts::new()), VoiceId::default(), dir.path());
    assert!(binder.synthesize(&[]).unwrap().is_empty());
}
