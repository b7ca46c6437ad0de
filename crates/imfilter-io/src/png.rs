//! PNG image format support
//!
//! Every PNG variant is decoded to 8-bit RGB: palettes and sub-byte gray
//! depths are expanded, 16-bit samples are stripped to their high byte,
//! gray is replicated and alpha is dropped. Output is always RGB8.

use crate::{IoError, IoResult};
use imfilter_core::{ImageFormat, Pix, SAMPLES_PER_PIXEL, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "PNG bit depth {:?} after expansion",
            output_info.bit_depth
        )));
    }

    let samples = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG color type: {:?}",
                other
            )));
        }
    };

    let width = output_info.width;
    let height = output_info.height;
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let mut rgb = Vec::with_capacity(width as usize * height as usize * SAMPLES_PER_PIXEL);
    for y in 0..height as usize {
        let row_start = y * bytes_per_row;
        let row = data
            .get(row_start..row_start + width as usize * samples)
            .ok_or_else(|| IoError::InvalidData("truncated PNG row".to_string()))?;
        for px in row.chunks_exact(samples) {
            if samples < 3 {
                rgb.extend_from_slice(&color::gray_to_rgb(px[0]));
            } else {
                rgb.extend_from_slice(&px[..3]);
            }
        }
    }

    let mut pix_mut = Pix::from_raw(width, height, rgb)?.to_mut();
    pix_mut.set_informat(ImageFormat::Png);
    Ok(pix_mut.into())
}

/// Write a PNG image (8-bit RGB)
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, pix.width(), pix.height());
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(pix.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_rgb() {
        let mut pix_mut = Pix::new(5, 5).unwrap().to_mut();
        pix_mut.set_rgb(0, 0, [255, 0, 0]).unwrap();
        pix_mut.set_rgb(1, 1, [0, 255, 0]).unwrap();
        pix_mut.set_rgb(2, 2, [0, 0, 255]).unwrap();
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();

        let pix2 = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix2.informat(), ImageFormat::Png);
        assert_eq!(pix2.get_rgb(0, 0), Some([255, 0, 0]));
        assert_eq!(pix2.get_rgb(1, 1), Some([0, 255, 0]));
        assert_eq!(pix2.get_rgb(2, 2), Some([0, 0, 255]));
        assert!(pix2.equals(&pix));
    }

    #[test]
    fn test_png_read_grayscale_replicates() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 3, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 100, 255]).unwrap();
            writer.finish().unwrap();
        }

        let pix = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some([0, 0, 0]));
        assert_eq!(pix.get_rgb(1, 0), Some([100, 100, 100]));
        assert_eq!(pix.get_rgb(2, 0), Some([255, 255, 255]));
    }

    #[test]
    fn test_png_read_rgba_drops_alpha() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 2, 1);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer
                .write_image_data(&[10, 20, 30, 0, 40, 50, 60, 255])
                .unwrap();
            writer.finish().unwrap();
        }

        let pix = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some([10, 20, 30]));
        assert_eq!(pix.get_rgb(1, 0), Some([40, 50, 60]));
    }

    #[test]
    fn test_png_read_garbage() {
        let result = read_png(Cursor::new(b"\x89PNG\r\n\x1a\nnot really".to_vec()));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}
