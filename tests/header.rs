use neurovol::{minc, AxisName, HeaderModel, RawAxis, RawHeader, Space, VolumeError};
use pretty_assertions::assert_eq;

mod util;

#[test]
fn offsets_follow_storage_order() {
    let raw = RawHeader {
        order: Some(vec!["zspace".into(), "yspace".into(), "xspace".into()]),
        xspace: Some(RawAxis::new(30, 0., 1.)),
        yspace: Some(RawAxis::new(20, 0., 1.)),
        zspace: Some(RawAxis::new(10, 0., 1.)),
        ..Default::default()
    };
    let header = HeaderModel::normalize(raw).unwrap();
    assert_eq!(header.axis(Space::Z).offset, 20 * 30);
    assert_eq!(header.axis(Space::Y).offset, 30);
    assert_eq!(header.axis(Space::X).offset, 1);
    assert_eq!(header.element_count(), 6000);
    assert_eq!(header.dimensionality(), 3);
}

#[test]
fn offsets_of_x_major_order() {
    let text = util::minc_header_json(&["xspace", "zspace", "yspace"], [4, 5, 6], "SHORT");
    let header = HeaderModel::normalize(minc::read_header(&text).unwrap()).unwrap();
    assert_eq!(header.order(), &[Space::X, Space::Z, Space::Y]);
    assert_eq!(header.axis(Space::X).offset, 6 * 5);
    assert_eq!(header.axis(Space::Z).offset, 5);
    assert_eq!(header.axis(Space::Y).offset, 1);
}

#[test]
fn slice_planes() {
    let header = util::zyx_header([30, 20, 10], [1., 1., 1.]);

    let x = header.plane(Space::X);
    assert_eq!((x.width_space, x.height_space), (Space::Y, Space::Z));
    assert_eq!((x.width, x.height), (20, 10));

    let y = header.plane(Space::Y);
    assert_eq!((y.width_space, y.height_space), (Space::X, Space::Z));
    assert_eq!((y.width, y.height), (30, 10));

    let z = header.plane(Space::Z);
    assert_eq!((z.width_space, z.height_space), (Space::X, Space::Y));
    assert_eq!((z.width, z.height), (30, 20));
}

#[test]
fn time_axis_is_stripped_from_order() {
    let raw: RawHeader = serde_json::from_str(
        r#"{
            "order": ["time", "zspace", "yspace", "xspace"],
            "xspace": {"space_length": 4, "start": 0, "step": 1},
            "yspace": {"space_length": 3, "start": 0, "step": 1},
            "zspace": {"space_length": 2, "start": 0, "step": 1},
            "time": {"space_length": "5", "start": "0", "step": "2.5"}
        }"#,
    )
    .unwrap();
    let header = HeaderModel::normalize(raw).unwrap();
    assert_eq!(header.order(), &[Space::Z, Space::Y, Space::X]);
    let time = header.time().unwrap();
    assert_eq!(time.name, AxisName::Time);
    assert_eq!(time.offset, 24);
    assert_eq!(time.step, 2.5);
    assert_eq!(header.frames(), 5);
    assert_eq!(header.frame_len(), 24);
    assert_eq!(header.element_count(), 120);
    assert_eq!(header.dimensionality(), 4);
    assert_eq!(header.get(AxisName::Time), Some(time));
}

#[test]
fn four_entry_order_without_time_axis() {
    let raw = RawHeader {
        order: Some(vec![
            "time".into(),
            "zspace".into(),
            "yspace".into(),
            "xspace".into(),
        ]),
        xspace: Some(RawAxis::new(2, 0., 1.)),
        yspace: Some(RawAxis::new(2, 0., 1.)),
        zspace: Some(RawAxis::new(2, 0., 1.)),
        ..Default::default()
    };
    match HeaderModel::normalize(raw) {
        Err(VolumeError::HeaderParse(..)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn repeated_axis_in_order() {
    let raw = RawHeader {
        order: Some(vec!["zspace".into(), "zspace".into(), "xspace".into()]),
        xspace: Some(RawAxis::new(2, 0., 1.)),
        yspace: Some(RawAxis::new(2, 0., 1.)),
        zspace: Some(RawAxis::new(2, 0., 1.)),
        ..Default::default()
    };
    match HeaderModel::normalize(raw) {
        Err(VolumeError::FormatParse(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn non_numeric_field() {
    let raw: RawHeader = serde_json::from_str(
        r#"{
            "order": ["zspace", "yspace", "xspace"],
            "xspace": {"space_length": 4, "start": "left", "step": 1},
            "yspace": {"space_length": 3, "start": 0, "step": 1},
            "zspace": {"space_length": 2, "start": 0, "step": 1}
        }"#,
    )
    .unwrap();
    match HeaderModel::normalize(raw) {
        Err(VolumeError::HeaderParse(field, _)) => assert_eq!(field, "xspace.start"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_axis() {
    let raw = RawHeader {
        order: Some(vec!["zspace".into(), "yspace".into(), "xspace".into()]),
        xspace: Some(RawAxis::new(2, 0., 1.)),
        zspace: Some(RawAxis::new(2, 0., 1.)),
        ..Default::default()
    };
    match HeaderModel::normalize(raw) {
        Err(VolumeError::HeaderParse(field, _)) => assert_eq!(field, "yspace"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn cosines_default_to_standard_basis() {
    let raw = RawHeader {
        order: Some(vec!["zspace".into(), "yspace".into(), "xspace".into()]),
        xspace: Some(RawAxis::new(2, 0., 1.)),
        yspace: Some(RawAxis::new(2, 0., 1.).with_cosines([0., 0.8, 0.6])),
        zspace: Some(RawAxis::new(2, 0., 1.)),
        ..Default::default()
    };
    let header = HeaderModel::normalize(raw).unwrap();
    assert_eq!(header.axis(Space::X).direction_cosines, [1., 0., 0.]);
    assert_eq!(header.axis(Space::Y).direction_cosines, [0., 0.8, 0.6]);
    assert_eq!(header.axis(Space::Z).direction_cosines, [0., 0., 1.]);
}

#[test]
fn voxel_origin_sums_starts_along_cosines() {
    let raw = RawHeader {
        order: Some(vec!["zspace".into(), "yspace".into(), "xspace".into()]),
        xspace: Some(RawAxis::new(2, -10., 1.)),
        yspace: Some(RawAxis::new(2, 5., 1.).with_cosines([0., 0., 1.])),
        zspace: Some(RawAxis::new(2, 3., 1.).with_cosines([0., 1., 0.])),
        ..Default::default()
    };
    let header = HeaderModel::normalize(raw).unwrap();
    assert_eq!(header.voxel_origin(), [-10., 3., 5.]);
}

#[test]
fn oversized_axes() {
    let raw: RawHeader = serde_json::from_str(
        r#"{
            "order": ["zspace", "yspace", "xspace"],
            "xspace": {"space_length": "1e15", "start": 0, "step": 1},
            "yspace": {"space_length": "1e15", "start": 0, "step": 1},
            "zspace": {"space_length": 1, "start": 0, "step": 1}
        }"#,
    )
    .unwrap();
    match HeaderModel::normalize(raw) {
        Err(VolumeError::HeaderParse(field, _)) => assert_eq!(field, "space_length"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn oversized_minc_volume_with_empty_payload() {
    // 2^32 * 2^32 samples would wrap to zero
    let text = r#"{
        "order": ["zspace", "yspace", "xspace"],
        "xspace": {"space_length": "4294967296", "start": 0, "step": 1},
        "yspace": {"space_length": "4294967296", "start": 0, "step": 1},
        "zspace": {"space_length": "1", "start": 0, "step": 1},
        "datatype": "CHAR"
    }"#;
    match minc::read_volume(text, &[], &neurovol::ReaderOptions::default()) {
        Err(VolumeError::HeaderParse(..)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
