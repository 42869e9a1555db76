// ============================================================================
// PPM DECODER — binary P6 header + raw RGB triples into an RGBA pixel buffer
// ============================================================================
//
// Accepted layout:
//   "P6" WS width WS height WS maxval WS1 <width * height * 3 raw bytes>
//
// WS is any run of space / tab / CR / LF, and may contain `#` comments that
// run to the end of their line.  Exactly one whitespace byte separates maxval
// from the pixel data.  Only maxval 255 (8 bits per channel) is decoded.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

/// The only maximum sample value this decoder accepts.
pub const SUPPORTED_MAXVAL: u32 = 255;

/// Cap on the up-front allocation for pixel data.  A header can claim any
/// size; the buffer only grows past this as bytes actually arrive.
const PREALLOC_LIMIT: usize = 64 * 1024 * 1024;

/// One decoded pixel.  Layout matches `wgpu::TextureFormat::Rgba8Unorm`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// P6 carries no transparency, so every decoded pixel is opaque.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Decoded image: `width * height` opaque pixels in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, 4 per pixel, ready for a texture upload.
    pub fn as_rgba_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at column `x`, row `y` (row 0 is the first row in the file).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Width over height, or `1.0` for a degenerate image.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Everything that can go wrong turning bytes into a `PixelBuffer`.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not a binary PPM (P6) file: magic number {found:?}")]
    InvalidFormat { found: String },

    #[error("unsupported PPM variant: {reason}")]
    UnsupportedFormat { reason: String },

    #[error("malformed PPM header: {reason}")]
    InvalidHeader { reason: String },

    #[error("pixel data truncated: expected {expected} bytes, found {actual}")]
    TruncatedData { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Open `path` and decode it as a binary PPM.
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer, DecodeError> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decode a binary PPM from any byte stream.
///
/// Reads the header one byte at a time, so pass a buffered reader when the
/// source is a file or socket.  Bytes after the last pixel are left unread.
pub fn decode<R: Read>(reader: R) -> Result<PixelBuffer, DecodeError> {
    let mut header = HeaderReader { inner: reader };
    header.expect_magic()?;

    let width = header.next_value("width")?;
    let height = header.next_value("height")?;
    let maxval = header.next_value("maxval")?;

    if maxval != SUPPORTED_MAXVAL {
        return Err(DecodeError::UnsupportedFormat {
            reason: format!("maxval {maxval}, only 8-bit samples (maxval {SUPPORTED_MAXVAL}) are supported"),
        });
    }

    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| too_large(width, height))?;
    let expected = pixel_count
        .checked_mul(3)
        .ok_or_else(|| too_large(width, height))?;

    let mut raw = Vec::with_capacity(expected.min(PREALLOC_LIMIT));
    header
        .inner
        .take(expected as u64)
        .read_to_end(&mut raw)?;

    if raw.len() < expected {
        return Err(DecodeError::TruncatedData {
            expected,
            actual: raw.len(),
        });
    }

    let pixels = raw
        .chunks_exact(3)
        .map(|rgb| Rgba::opaque(rgb[0], rgb[1], rgb[2]))
        .collect();

    Ok(PixelBuffer {
        width,
        height,
        pixels,
    })
}

fn too_large(width: u32, height: u32) -> DecodeError {
    DecodeError::InvalidHeader {
        reason: format!("{width}x{height} image is too large to address"),
    }
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n' | b'\r' | b'\t')
}

/// Byte-level cursor over the ASCII header.
struct HeaderReader<R> {
    inner: R,
}

impl<R: Read> HeaderReader<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn expect_magic(&mut self) -> Result<(), DecodeError> {
        let first = self.next_byte()?;
        let second = self.next_byte()?;
        if first == Some(b'P') && second == Some(b'6') {
            return Ok(());
        }
        let found = [first, second]
            .into_iter()
            .flatten()
            .map(|b| std::ascii::escape_default(b).to_string())
            .collect();
        Err(DecodeError::InvalidFormat { found })
    }

    /// Consume everything up to and including the next newline.
    fn skip_comment(&mut self, field: &str) -> Result<(), DecodeError> {
        while let Some(byte) = self.next_byte()? {
            if byte == b'\n' {
                return Ok(());
            }
        }
        Err(DecodeError::InvalidHeader {
            reason: format!("end of file inside a comment before {field}"),
        })
    }

    /// Read the next decimal field.  The single separator (or comment) that
    /// ends the digits is consumed, nothing after it.
    fn next_value(&mut self, field: &str) -> Result<u32, DecodeError> {
        let mut token = String::new();
        loop {
            let Some(byte) = self.next_byte()? else {
                return Err(DecodeError::InvalidHeader {
                    reason: format!("end of file while reading {field}"),
                });
            };
            match byte {
                b'#' => {
                    self.skip_comment(field)?;
                    if !token.is_empty() {
                        break;
                    }
                }
                b if is_separator(b) => {
                    if !token.is_empty() {
                        break;
                    }
                }
                b'0'..=b'9' => token.push(byte as char),
                other => {
                    return Err(DecodeError::InvalidHeader {
                        reason: format!(
                            "unexpected byte '{}' in {field}",
                            std::ascii::escape_default(other)
                        ),
                    });
                }
            }
        }

        token.parse::<u32>().map_err(|_| DecodeError::InvalidHeader {
            reason: format!("{field} {token} does not fit in 32 bits"),
        })
    }
}
