//! Image output.
//!
//! Rendering finishes in memory before anything is written, so an I/O
//! failure here never affects the rendered buffer.

use crate::error::RenderResult;
use crate::renderer::{color_to_rgb8, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the image as plain-text PPM (P3): header, then one `r g b` line
/// per pixel, row-major from the top-left.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> RenderResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the image as a P3 PPM file.
pub fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let file = File::create(path.as_ref())?;
    write_ppm(image, BufWriter::new(file))?;
    log::info!("Image saved as {}", path.as_ref().display());
    Ok(())
}

/// Save the image as an 8-bit PNG, gamma-corrected like the PPM output.
pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let rgb = image::RgbImage::from_fn(image.width, image.height, |x, y| {
        image::Rgb(color_to_rgb8(image.get(x, y)))
    });
    rgb.save(path.as_ref())?;
    log::info!("Image saved as {}", path.as_ref().display());
    Ok(())
}

/// Save the image, choosing the format from the file extension.
///
/// `.png` writes PNG; anything else writes P3 PPM.
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        save_png(image, path)
    } else {
        save_ppm(image, path)
    }
}
