//! Binary PGM (`P5`) codec.
//!
//! The header is the magic `P5` followed by width, height and maximum value as
//! whitespace-separated ASCII decimals. `#` starts a comment that runs to the
//! end of the line. Exactly one whitespace byte separates the maximum value
//! from `width * height` single-byte samples in row-major order.
//!
//! Only 8-bit images (max value 1..=255) are supported.

use crate::image::GrayImage;
use crate::util::{SubLocateError, SubLocateResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

const MAGIC: &str = "P5";
const MAX_TOKEN_LEN: usize = 20;

/// Decodes a binary PGM image from a reader.
///
/// The magic is validated before anything else is consumed, so a non-`P5`
/// stream fails with [`SubLocateError::Format`] without reading pixel data.
pub fn decode<R: Read>(reader: &mut R) -> SubLocateResult<GrayImage> {
    let magic = read_token(reader)?.ok_or_else(|| SubLocateError::format("empty file"))?;
    if magic != MAGIC {
        return Err(SubLocateError::format(format!(
            "expected magic {MAGIC}, found {magic:?}"
        )));
    }

    let width = read_header_value(reader, "width")?;
    let height = read_header_value(reader, "height")?;
    let max_value = read_header_value(reader, "max value")?;
    if width == 0 || height == 0 {
        return Err(SubLocateError::InvalidDimensions { width, height });
    }
    if max_value == 0 || max_value > u8::MAX as usize {
        return Err(SubLocateError::format(format!(
            "unsupported max value {max_value}"
        )));
    }

    let len = width
        .checked_mul(height)
        .ok_or(SubLocateError::InvalidDimensions { width, height })?;
    // The header is untrusted: grow the buffer with the bytes actually present
    // instead of allocating `len` up front.
    let mut data = Vec::new();
    reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut data)
        .map_err(|err| SubLocateError::format(format!("failed to read pixel data: {err}")))?;
    if data.len() < len {
        return Err(SubLocateError::format(format!(
            "truncated pixel data, expected {len} samples, found {}",
            data.len()
        )));
    }

    GrayImage::with_max_value(data, width, height, max_value as u8)
}

/// Decodes a binary PGM image from an in-memory buffer.
pub fn decode_bytes(bytes: &[u8]) -> SubLocateResult<GrayImage> {
    let mut cursor = bytes;
    decode(&mut cursor)
}

/// Encodes an image as binary PGM.
pub fn encode<W: Write>(writer: &mut W, image: &GrayImage) -> std::io::Result<()> {
    write!(
        writer,
        "{MAGIC}\n{} {}\n{}\n",
        image.width(),
        image.height(),
        image.max_value()
    )?;
    writer.write_all(image.data())
}

/// Encodes an image into a new byte buffer.
pub fn encode_to_vec(image: &GrayImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.data().len() + 32);
    // Writing into a Vec cannot fail.
    let _ = encode(&mut out, image);
    out
}

/// Loads a binary PGM image from disk.
pub fn read_pgm<P: AsRef<Path>>(path: P) -> SubLocateResult<GrayImage> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| SubLocateError::io(path, err))?;
    let mut reader = BufReader::new(file);
    decode(&mut reader)
}

/// Saves an image to disk as binary PGM, replacing any existing file.
pub fn write_pgm<P: AsRef<Path>>(path: P, image: &GrayImage) -> SubLocateResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| SubLocateError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image).map_err(|err| SubLocateError::io(path, err))?;
    writer.flush().map_err(|err| SubLocateError::io(path, err))
}

fn read_header_value<R: Read>(reader: &mut R, field: &'static str) -> SubLocateResult<usize> {
    let token = read_token(reader)?
        .ok_or_else(|| SubLocateError::format(format!("missing {field} in header")))?;
    token
        .parse::<usize>()
        .map_err(|_| SubLocateError::format(format!("invalid {field} {token:?}")))
}

/// Reads one header token, skipping leading whitespace and comments.
///
/// Consumes exactly one trailing whitespace byte. Returns `None` at end of
/// stream before any token byte.
fn read_token<R: Read>(reader: &mut R) -> SubLocateResult<Option<String>> {
    let mut byte = loop {
        match next_byte(reader)? {
            None => return Ok(None),
            Some(b'#') => skip_comment(reader)?,
            Some(b) if b.is_ascii_whitespace() => {}
            Some(b) => break b,
        }
    };

    let mut token = Vec::new();
    loop {
        token.push(byte);
        if token.len() > MAX_TOKEN_LEN {
            return Err(SubLocateError::format("header token too long"));
        }
        match next_byte(reader)? {
            None => break,
            Some(b) if b.is_ascii_whitespace() => break,
            Some(b) => byte = b,
        }
    }

    String::from_utf8(token)
        .map(Some)
        .map_err(|_| SubLocateError::format("header is not ASCII"))
}

fn skip_comment<R: Read>(reader: &mut R) -> SubLocateResult<()> {
    while let Some(b) = next_byte(reader)? {
        if b == b'\n' || b == b'\r' {
            break;
        }
    }
    Ok(())
}

fn next_byte<R: Read>(reader: &mut R) -> SubLocateResult<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(SubLocateError::format(format!(
                    "failed to read header: {err}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_bytes, encode_to_vec};
    use crate::image::GrayImage;
    use crate::util::SubLocateError;
    use std::io::Read;

    #[test]
    fn decodes_header_with_comments() {
        let mut bytes = b"P5\n# made by hand\n3 2\n# max\n200\n".to_vec();
        bytes.extend_from_slice(&[0, 1, 2, 100, 150, 200]);
        let img = decode_bytes(&bytes).unwrap();
        assert_eq!((img.width(), img.height(), img.max_value()), (3, 2, 200));
        assert_eq!(img.get(2, 1), Some(200));
    }

    #[test]
    fn pixel_bytes_may_look_like_whitespace() {
        let mut bytes = b"P5 2 1 255 ".to_vec();
        bytes.extend_from_slice(&[b'\n', b' ']);
        let img = decode_bytes(&bytes).unwrap();
        assert_eq!(img.data(), &[b'\n', b' ']);
    }

    #[test]
    fn wrong_magic_stops_before_pixel_data() {
        let bytes = b"P2\n2 2\n255\nABCD".to_vec();
        let mut cursor = bytes.as_slice();
        let err = decode(&mut cursor).err().unwrap();
        assert!(matches!(err, SubLocateError::Format { .. }));
        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"2 2\n255\nABCD");
    }

    #[test]
    fn truncated_pixels_are_a_format_error() {
        let bytes = b"P5\n2 2\n255\n\x01\x02\x03".to_vec();
        let err = decode_bytes(&bytes).err().unwrap();
        assert!(matches!(err, SubLocateError::Format { .. }));
    }

    #[test]
    fn huge_declared_size_is_a_format_error() {
        let bytes = b"P5\n4294967295 4294967295\n255\n\x00".to_vec();
        let err = decode_bytes(&bytes).err().unwrap();
        assert!(matches!(err, SubLocateError::Format { .. }));
    }

    #[test]
    fn overflowing_declared_size_is_rejected() {
        let header = format!("P5\n{} 2\n255\n", usize::MAX);
        let err = decode_bytes(header.as_bytes()).err().unwrap();
        assert!(matches!(err, SubLocateError::InvalidDimensions { .. }));
    }

    #[test]
    fn wide_max_value_is_rejected() {
        let bytes = b"P5\n1 1\n65535\n\x00\x00".to_vec();
        let err = decode_bytes(&bytes).err().unwrap();
        assert!(matches!(err, SubLocateError::Format { .. }));
    }

    #[test]
    fn encoded_header_matches_layout() {
        let img = GrayImage::with_max_value(vec![7, 8], 2, 1, 100).unwrap();
        let bytes = encode_to_vec(&img);
        assert_eq!(bytes, b"P5\n2 1\n100\n\x07\x08");
        let back = decode_bytes(&bytes).unwrap();
        assert_eq!(back.data(), img.data());
    }
}
