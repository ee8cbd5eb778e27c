extern crate icopack;

use icopack::{
    build_icon, from_fn, recommended_sizes, Filter, IconDirectory, IconSize,
    Memoized, RgbaRasterizer, SizePreset,
};
use std::io::{self, Cursor};

//===========================================================================//

// A checkerboard with a transparent border, so that resampling has something
// to do.
fn source(width: u32, height: u32) -> RgbaRasterizer {
    let mut rgba = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let light = (x / 4 + y / 4) % 2 == 0;
            let value = if light { 0xee } else { 0x22 };
            let alpha = if border { 0 } else { 0xff };
            rgba.extend_from_slice(&[value, value / 2, 0x80, alpha]);
        }
    }
    RgbaRasterizer::new(width, height, rgba).unwrap()
}

fn sides(sizes: &[IconSize]) -> Vec<u32> {
    sizes.iter().map(|size| size.width()).collect()
}

//===========================================================================//

#[test]
fn recommended_sizes_for_small_sources() {
    assert_eq!(sides(&recommended_sizes(40, 40)), vec![16, 32]);
    assert_eq!(sides(&recommended_sizes(10, 10)), vec![32]);
}

#[test]
fn build_icon_from_recommended_sizes() {
    let mut source = source(100, 80);
    let sizes = recommended_sizes(source.width(), source.height());
    assert_eq!(sides(&sizes), vec![16, 32, 48, 64]);
    let file = build_icon(&mut source, &sizes).unwrap();
    let icondir = IconDirectory::read(Cursor::new(&file)).unwrap();
    assert_eq!(icondir.images().len(), 4);
    for (image, &size) in icondir.images().iter().zip(sizes.iter()) {
        assert_eq!(image.size(), size);
        assert!(image.is_png());
        image.validate().unwrap();
    }
}

#[test]
fn presets_ignore_source_resolution() {
    for filter in Filter::ALL.iter().copied() {
        let mut source = source(12, 12).with_filter(filter);
        let sizes = SizePreset::Windows.sizes();
        let file = build_icon(&mut source, sizes).unwrap();
        let icondir = IconDirectory::read(Cursor::new(&file)).unwrap();
        assert_eq!(icondir.images().len(), sizes.len());
        assert_eq!(icondir.images()[6].size(), IconSize::square(256).unwrap());
    }
}

#[test]
fn memoization_does_not_change_output() {
    let sizes = SizePreset::Favicon.sizes();
    let plain = build_icon(&mut source(64, 64), sizes).unwrap();
    let mut memoized = Memoized::new(source(64, 64));
    let first = build_icon(&mut memoized, sizes).unwrap();
    let second = build_icon(&mut memoized, sizes).unwrap();
    assert_eq!(memoized.num_cached(), sizes.len());
    assert_eq!(plain, first);
    assert_eq!(plain, second);
}

#[test]
fn rasterizer_failure_aborts_the_build() {
    let mut rasterized = Vec::new();
    let result = {
        let mut flaky = from_fn(|size: IconSize| {
            rasterized.push(size.width());
            if size.width() == 32 {
                Err(io::Error::new(io::ErrorKind::InvalidData, "bad source"))
            } else {
                Ok(vec![0x89; 10])
            }
        });
        build_icon(&mut flaky, SizePreset::Canonical.sizes())
    };
    let error = result.unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    assert_eq!(rasterized, vec![16, 32]);
}

#[test]
fn source_decoded_from_png() {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, 20, 20);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0x40; 20 * 20 * 3]).unwrap();
    }
    let mut source = RgbaRasterizer::from_png(png_data.as_slice()).unwrap();
    assert_eq!((source.width(), source.height()), (20, 20));
    let file = build_icon(&mut source, &recommended_sizes(20, 20)).unwrap();
    let icondir = IconDirectory::read(Cursor::new(&file)).unwrap();
    assert_eq!(icondir.images().len(), 1);
    assert_eq!(icondir.images()[0].size(), IconSize::square(16).unwrap());
}

//===========================================================================//
