//! Plain-text PPM (P3) output.

use std::io::{self, Write};

use crate::renderer::{color_to_rgb, ImageBuffer};

/// Write `image` as a P3 stream: header, then one `R G B` line per pixel,
/// row-major from the top row.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()
}
