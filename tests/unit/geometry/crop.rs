use super::*;

#[test]
fn top_left_of_full_hd() {
    let c = resolve_crop(CropQuadrant::TopLeft, 1920, 1080).unwrap();
    assert_eq!(
        c.rect,
        CropRect {
            x: 0,
            y: 0,
            width: 960,
            height: 540
        }
    );
    assert_eq!(c.filter().as_deref(), Some("crop=960:540:0:0"));
}

#[test]
fn odd_dimensions_give_extra_pixel_to_right_and_bottom() {
    let br = resolve_crop(CropQuadrant::BottomRight, 1921, 1081).unwrap();
    assert_eq!(
        br.rect,
        CropRect {
            x: 960,
            y: 540,
            width: 961,
            height: 541
        }
    );

    let tr = resolve_crop(CropQuadrant::TopRight, 1921, 1081).unwrap();
    assert_eq!((tr.rect.x, tr.rect.width, tr.rect.height), (960, 961, 540));

    let bl = resolve_crop(CropQuadrant::BottomLeft, 1921, 1081).unwrap();
    assert_eq!((bl.rect.y, bl.rect.width, bl.rect.height), (540, 960, 541));
}

#[test]
fn quadrants_stay_inside_frame() {
    for q in CropQuadrant::ALL {
        for (w, h) in [(2, 2), (3, 5), (1920, 1080), (3841, 2161)] {
            let c = resolve_crop(q, w, h).unwrap();
            assert!(c.rect.x + c.rect.width <= w);
            assert!(c.rect.y + c.rect.height <= h);
        }
    }
}

#[test]
fn full_frame_is_distinguishable_from_a_crop() {
    let c = resolve_crop(CropQuadrant::None, 1920, 1080).unwrap();
    assert!(c.is_full_frame());
    assert_eq!(c.filter(), None);
    assert_eq!((c.rect.width, c.rect.height), (1920, 1080));

    let q = resolve_crop(CropQuadrant::TopLeft, 1920, 1080).unwrap();
    assert!(!q.is_full_frame());
}

#[test]
fn degenerate_frames_are_rejected() {
    assert!(matches!(
        resolve_crop(CropQuadrant::None, 0, 1080),
        Err(DrivecamError::InvalidCropGeometry(_))
    ));
    assert!(matches!(
        resolve_crop(CropQuadrant::TopLeft, 1, 1080),
        Err(DrivecamError::InvalidCropGeometry(_))
    ));
    assert!(resolve_crop(CropQuadrant::BottomRight, 1, 1).is_err());
}

#[test]
fn quadrant_parsing() {
    assert_eq!("0".parse::<CropQuadrant>().unwrap(), CropQuadrant::None);
    assert_eq!("4".parse::<CropQuadrant>().unwrap(), CropQuadrant::BottomRight);
    assert_eq!("full".parse::<CropQuadrant>().unwrap(), CropQuadrant::None);
    assert_eq!(
        "Top-Right".parse::<CropQuadrant>().unwrap(),
        CropQuadrant::TopRight
    );
    assert!("5".parse::<CropQuadrant>().is_err());
    assert!("middle".parse::<CropQuadrant>().is_err());
    for q in CropQuadrant::ALL {
        assert_eq!(CropQuadrant::from_index(q.index()).unwrap(), q);
    }
}
