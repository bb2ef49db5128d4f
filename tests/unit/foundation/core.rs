use super::*;

#[test]
fn fps_rejects_zero_and_converts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());

    let fps = Fps::integer(30).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_round(7.5), 225);
    assert_eq!(fps.secs_to_frames_round(-1.0), 0);
}

#[test]
fn canvas_validation() {
    assert!(
        Canvas {
            width: 1920,
            height: 1080
        }
        .validate()
        .is_ok()
    );
    assert!(
        Canvas {
            width: 0,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 11,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 70_000,
            height: 10
        }
        .validate()
        .is_err()
    );
}

#[test]
fn rgba_lerp_endpoints() {
    let a = Rgba8::rgb(10, 22, 40);
    let b = Rgba8::rgb(25, 42, 70);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 7.0), b);
    assert_eq!(Rgba8::WHITE.with_alpha(0).a, 0);
}
