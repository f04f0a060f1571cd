//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use byteordered::{ByteOrdered, Endianness};
use flate2::write::GzEncoder;
use flate2::Compression;
use neurovol::{HeaderModel, NiftiHeader, RawAxis, RawHeader, Samples, VolumeData};
use std::io::Write;

/// Serialize the grid fields of a NIfTI-1 header, followed by the voxel
/// payload at `max(vox_offset, 352)`.
pub fn nifti_bytes(h: &NiftiHeader, voxels: &[u8]) -> Vec<u8> {
    let e = h.endianness;
    let mut buf = vec![0u8; 352];
    {
        let mut w = ByteOrdered::runtime(&mut buf[..], e);
        w.write_i32(h.sizeof_hdr).unwrap();
    }
    {
        let mut w = ByteOrdered::runtime(&mut buf[40..], e);
        for v in &h.dim {
            w.write_u16(*v).unwrap();
        }
    }
    {
        let mut w = ByteOrdered::runtime(&mut buf[70..], e);
        w.write_i16(h.datatype).unwrap();
        w.write_i16(h.bitpix).unwrap();
        w.write_i16(0).unwrap();
        for v in &h.pixdim {
            w.write_f32(*v).unwrap();
        }
        w.write_f32(h.vox_offset).unwrap();
        w.write_f32(h.scl_slope).unwrap();
        w.write_f32(h.scl_inter).unwrap();
    }
    {
        let mut w = ByteOrdered::runtime(&mut buf[252..], e);
        w.write_i16(h.qform_code).unwrap();
        w.write_i16(h.sform_code).unwrap();
        for v in &[
            h.quatern_b,
            h.quatern_c,
            h.quatern_d,
            h.quatern_x,
            h.quatern_y,
            h.quatern_z,
        ] {
            w.write_f32(*v).unwrap();
        }
        for row in &[h.srow_x, h.srow_y, h.srow_z] {
            for v in row {
                w.write_f32(*v).unwrap();
            }
        }
    }
    buf[344..348].copy_from_slice(&h.magic);

    let offset = if h.vox_offset > 352. {
        h.vox_offset as usize
    } else {
        352
    };
    buf.resize(offset, 0);
    buf.extend_from_slice(voxels);
    buf
}

/// Encode 16-bit samples with the given byte order.
pub fn i16_bytes(values: &[i16], e: Endianness) -> Vec<u8> {
    let mut w = ByteOrdered::runtime(Vec::new(), e);
    for v in values {
        w.write_i16(*v).unwrap();
    }
    w.into_inner()
}

/// Encode single precision samples with the given byte order.
pub fn f32_bytes(values: &[f32], e: Endianness) -> Vec<u8> {
    let mut w = ByteOrdered::runtime(Vec::new(), e);
    for v in values {
        w.write_f32(*v).unwrap();
    }
    w.into_inner()
}

/// Gzip compress a buffer.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut e = GzEncoder::new(Vec::new(), Compression::default());
    e.write_all(bytes).unwrap();
    e.finish().unwrap()
}

/// A MINC style JSON header with unit steps and no explicit cosines.
pub fn minc_header_json(order: &[&str], lengths: [usize; 3], datatype: &str) -> String {
    let order: Vec<String> = order.iter().map(|s| format!("\"{}\"", s)).collect();
    format!(
        r#"{{
            "order": [{}],
            "xspace": {{"space_length": "{}", "start": "0", "step": "1"}},
            "yspace": {{"space_length": "{}", "start": "0", "step": "1"}},
            "zspace": {{"space_length": "{}", "start": "0", "step": "1"}},
            "datatype": "{}"
        }}"#,
        order.join(", "),
        lengths[0],
        lengths[1],
        lengths[2],
        datatype
    )
}

/// A `z, y, x` ordered header with the given lengths and steps, x first.
pub fn zyx_header(lengths: [usize; 3], steps: [f64; 3]) -> HeaderModel {
    let raw = RawHeader {
        order: Some(vec!["zspace".into(), "yspace".into(), "xspace".into()]),
        xspace: Some(RawAxis::new(lengths[0], 0., steps[0])),
        yspace: Some(RawAxis::new(lengths[1], 0., steps[1])),
        zspace: Some(RawAxis::new(lengths[2], 0., steps[2])),
        ..Default::default()
    };
    HeaderModel::normalize(raw).unwrap()
}

/// A byte volume holding `0, 1, 2, ...` in storage order.
pub fn counting_volume(header: HeaderModel) -> VolumeData {
    let n = header.element_count();
    VolumeData::new(header, Samples::Uint8((0..n).map(|v| v as u8).collect())).unwrap()
}
