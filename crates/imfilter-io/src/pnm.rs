//! PNM (Portable Any Map) format support
//!
//! Reads binary PGM (P5) and PPM (P6) with maxval up to 255 and writes
//! binary PPM (P6). ASCII variants and 16-bit samples are not supported.

use crate::{IoError, IoResult};
use imfilter_core::{ImageFormat, Pix, SAMPLES_PER_PIXEL, color};
use std::io::{BufRead, Read, Write};

/// Read one byte, or `None` at end of stream.
fn next_byte<R: BufRead>(reader: &mut R) -> IoResult<Option<u8>> {
    let buf = reader.fill_buf()?;
    let Some(&b) = buf.first() else {
        return Ok(None);
    };
    reader.consume(1);
    Ok(Some(b))
}

/// Read the next whitespace-delimited header token, skipping `#` comments.
///
/// Consumes exactly one whitespace byte after the token, which for the
/// final header field is the separator before the raster.
fn next_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    loop {
        match next_byte(reader)? {
            None if token.is_empty() => {
                return Err(IoError::InvalidData("truncated PNM header".to_string()));
            }
            None => return Ok(token),
            Some(b'#') if token.is_empty() => {
                while let Some(b) = next_byte(reader)? {
                    if b == b'\n' {
                        break;
                    }
                }
            }
            Some(b) if b.is_ascii_whitespace() => {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
            Some(b) => token.push(b as char),
        }
    }
}

fn header_value<R: BufRead>(reader: &mut R, field: &str) -> IoResult<u32> {
    let token = next_token(reader)?;
    token
        .parse::<u32>()
        .map_err(|_| IoError::InvalidData(format!("bad PNM {}: '{}'", field, token)))
}

/// Read a binary PNM image (P5/P6) from a reader.
///
/// # Arguments
/// * `reader` - A buffered reader positioned at the `P5`/`P6` magic
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Pix> {
    let magic = next_token(&mut reader)?;
    let channels = match magic.as_str() {
        "P5" => 1,
        "P6" => 3,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM magic '{}' (only P5/P6 are supported)",
                other
            )));
        }
    };

    let width = header_value(&mut reader, "width")?;
    let height = header_value(&mut reader, "height")?;
    let maxval = header_value(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "PNM maxval {} (expected 1..=255)",
            maxval
        )));
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            IoError::InvalidData(format!("PNM dimensions {}x{} are too large", width, height))
        })?;

    // The buffer grows only with bytes actually present in the stream
    let mut raster = Vec::new();
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut raster)?;
    if raster.len() != expected {
        return Err(IoError::InvalidData(format!(
            "truncated PNM raster: expected {} bytes, got {}",
            expected,
            raster.len()
        )));
    }

    if maxval != 255 {
        for v in raster.iter_mut() {
            *v = ((u32::from(*v).min(maxval) * 255) / maxval) as u8;
        }
    }

    let rgb = if channels == 1 {
        let mut rgb = Vec::with_capacity(raster.len() * SAMPLES_PER_PIXEL);
        for &g in &raster {
            rgb.extend_from_slice(&color::gray_to_rgb(g));
        }
        rgb
    } else {
        raster
    };

    let mut pix_mut = Pix::from_raw(width, height, rgb)?.to_mut();
    pix_mut.set_informat(ImageFormat::Pnm);
    Ok(pix_mut.into())
}

/// Write a `Pix` as binary PPM (P6) to a writer.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", pix.width(), pix.height())?;
    writer.write_all(pix.data())?;
    writer.flush()?;
    Ok(())
}
