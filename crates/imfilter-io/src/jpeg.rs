//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate (8-bit grayscale and
//! 24-bit RGB) and writes baseline RGB JPEG using `jpeg-encoder`.

use crate::{IoError, IoResult};
use imfilter_core::{ImageFormat, Pix, SAMPLES_PER_PIXEL, color};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::{Read, Write};

/// Quality used when encoding JPEG output.
pub const DEFAULT_QUALITY: u8 = 95;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let rgb = match info.pixel_format {
        PixelFormat::RGB24 => pixels,
        PixelFormat::L8 => {
            let mut rgb = Vec::with_capacity(pixels.len() * SAMPLES_PER_PIXEL);
            for &g in &pixels {
                rgb.extend_from_slice(&color::gray_to_rgb(g));
            }
            rgb
        }
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "JPEG pixel format {:?}",
                other
            )));
        }
    };

    let mut pix_mut = Pix::from_raw(width, height, rgb)?.to_mut();
    pix_mut.set_informat(ImageFormat::Jpeg);
    Ok(pix_mut.into())
}

/// Write a `Pix` as an RGB JPEG with the given quality (1-100).
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let width = u16::try_from(pix.width()).map_err(|_| {
        IoError::EncodeError(format!("JPEG width {} exceeds 65535", pix.width()))
    })?;
    let height = u16::try_from(pix.height()).map_err(|_| {
        IoError::EncodeError(format!("JPEG height {} exceeds 65535", pix.height()))
    })?;

    let encoder = jpeg_encoder::Encoder::new(writer, quality);
    encoder
        .encode(pix.data(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_roundtrip_flat_color() {
        // A flat block survives lossy coding within a small tolerance
        let pix = Pix::new_filled(16, 16, [200, 100, 50]).unwrap();
        let mut buffer = Vec::new();
        write_jpeg(&pix, &mut buffer, DEFAULT_QUALITY).unwrap();

        let pix2 = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!(pix2.dimensions(), (16, 16));
        assert_eq!(pix2.informat(), ImageFormat::Jpeg);
        let diff = pix.count_pixel_diffs(&pix2).unwrap();
        assert!(diff.max_diff <= 4, "max diff {}", diff.max_diff);
    }

    #[test]
    fn test_jpeg_read_garbage() {
        let result = read_jpeg(Cursor::new(vec![0xFF, 0xD8, 0xFF, 0x00, 0x01]));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}
