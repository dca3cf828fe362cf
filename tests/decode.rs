use image::{DynamicImage, Rgba, RgbaImage};
use image2ico::{EncodeOptions, FrameSpec, IconDir, IconEncoder};
use std::io::Cursor;

//===========================================================================//

fn checkerboard(size: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(size, size, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 160, 128])
        }
    }))
}

//===========================================================================//

#[test]
fn read_back_directory() {
    let sizes =
        [FrameSpec::square(16), FrameSpec::new(48, 32), FrameSpec::square(256)];
    let options = EncodeOptions::default().with_sizes(sizes.iter().cloned());
    let output = IconEncoder::new(options).encode(&checkerboard(64)).unwrap();
    let icondir = IconDir::read(Cursor::new(&output)).unwrap();
    assert_eq!(icondir.entries().len(), sizes.len());
    let mut expected_offset = 6 + 16 * sizes.len() as u32;
    for (spec, entry) in sizes.iter().zip(icondir.entries()) {
        assert_eq!(entry.width(), spec.width());
        assert_eq!(entry.height(), spec.height());
        assert_eq!(entry.record().bits_per_pixel(), 32);
        assert_eq!(entry.record().color_planes(), 1);
        assert_eq!(entry.record().num_colors(), 0);
        assert_eq!(entry.record().data_offset(), expected_offset);
        assert_eq!(entry.is_png(), spec.width() == 256);
        expected_offset += entry.record().data_size();
    }
    assert_eq!(output.len(), expected_offset as usize);
}

#[test]
fn decode_with_independent_reader() {
    // Every frame must decode, at the right size, with a reader that knows
    // nothing about how the file was written.
    let source = checkerboard(64);
    let output = IconEncoder::default().encode(&source).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(&output)).unwrap();
    let expected = [16, 24, 32, 48, 256];
    assert_eq!(icondir.entries().len(), expected.len());
    for (&size, entry) in expected.iter().zip(icondir.entries()) {
        assert_eq!(entry.width(), size);
        assert_eq!(entry.height(), size);
        assert_eq!(entry.is_png(), size == 256);
        let decoded = entry.decode().unwrap();
        assert_eq!(decoded.width(), size);
        assert_eq!(decoded.height(), size);
    }
}

#[test]
fn bmp_frame_pixels_survive() {
    // A 16x16 source rendered at 16x16 keeps its pixels exactly, so the
    // decoded frame must match the source, including partial alpha.
    let source = checkerboard(16);
    let output =
        image2ico::encode_icon(&source, &[FrameSpec::square(16)]).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(&output)).unwrap();
    let entry = &icondir.entries()[0];
    assert!(!entry.is_png());
    let decoded = entry.decode().unwrap();
    assert_eq!(decoded.rgba_data(), source.to_rgba8().as_raw().as_slice());
}

#[test]
fn png_frame_pixels_survive() {
    let source = checkerboard(256);
    let output =
        image2ico::encode_icon(&source, &[FrameSpec::square(256)]).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(&output)).unwrap();
    let entry = &icondir.entries()[0];
    assert!(entry.is_png());
    let decoded = entry.decode().unwrap();
    assert_eq!(decoded.rgba_data(), source.to_rgba8().as_raw().as_slice());
}

#[test]
fn decode_source_from_memory() {
    let mut png_data = Vec::new();
    checkerboard(32)
        .write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
        .unwrap();
    let source = image2ico::decode(&png_data).unwrap();
    assert_eq!((source.width(), source.height()), (32, 32));
    let output =
        image2ico::encode_icon(&source, &[FrameSpec::square(32)]).unwrap();
    assert_eq!(&output[..6], b"\x00\x00\x01\x00\x01\x00");
}

#[test]
fn palette_source_expands_to_rgba() {
    // A 4x4 indexed PNG whose columns alternate between an opaque red and a
    // half-transparent blue palette entry.
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, 4, 4);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
        encoder.set_trns(vec![255, 128]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0u8, 1, 0, 1].repeat(4)).unwrap();
    }
    let source = image2ico::decode(&png_data).unwrap();
    let output =
        image2ico::encode_icon(&source, &[FrameSpec::square(4)]).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(&output)).unwrap();
    let entry = &icondir.entries()[0];
    assert!(!entry.is_png());
    assert_eq!(entry.bits_per_pixel(), 32);
    let decoded = entry.decode().unwrap();
    let expected_row: &[u8] = b"\
        \xff\x00\x00\xff\x00\x00\xff\x80\
        \xff\x00\x00\xff\x00\x00\xff\x80";
    for row in decoded.rgba_data().chunks_exact(16) {
        assert_eq!(row, expected_row);
    }
}

//===========================================================================//
