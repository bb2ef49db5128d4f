use super::*;

fn frame(data: Vec<u8>) -> RenderedFrame {
    RenderedFrame {
        scene_index: 0,
        width: 1,
        height: 1,
        data,
    }
}

#[test]
fn flatten_premul_half_red_over_black() {
    let out = frame(vec![128, 0, 0, 128]).to_opaque_rgba8([0, 0, 0]).unwrap();
    assert_eq!(out, vec![128, 0, 0, 255]);
}

#[test]
fn transparent_pixel_becomes_background() {
    let out = frame(vec![0, 0, 0, 0]).to_opaque_rgba8([10, 20, 30]).unwrap();
    assert_eq!(out, vec![10, 20, 30, 255]);
}

#[test]
fn size_mismatch_is_rejected() {
    assert!(frame(vec![0, 0, 0]).validate().is_err());
}

#[test]
fn save_png_roundtrips_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("f.png");
    let f = RenderedFrame {
        scene_index: 3,
        width: 2,
        height: 2,
        data: vec![255; 16],
    };
    f.save_png(&path).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (2, 2));
}
