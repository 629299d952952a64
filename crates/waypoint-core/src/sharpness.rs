//! Blur detection for captured photos.
//!
//! Sharpness is the variance of the 4-neighbour Laplacian over an 8-bit luma
//! preview. Edges produce large second derivatives; a blurred or featureless
//! frame produces values near zero.

use crate::error::{Result, WorkflowError};

/// Grayscale preview of a captured frame, row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl LumaFrame {
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` when the buffer length does not
    /// match `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(WorkflowError::invalid_input("frame").with_reason(format!(
                "{} bytes do not form a {width}x{height} frame",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Parse a binary PGM (`P5`, maxval ≤ 255).
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` for anything else.
    pub fn from_pgm(bytes: &[u8]) -> Result<Self> {
        let invalid = |reason: &str| WorkflowError::invalid_input("pgm").with_reason(reason);

        let mut fields = Vec::with_capacity(4);
        let mut pos = 0;
        while fields.len() < 4 {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < bytes.len() && bytes[pos] == b'#' {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                continue;
            }
            let start = pos;
            while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if start == pos {
                return Err(invalid("truncated header"));
            }
            fields.push(&bytes[start..pos]);
        }
        // Exactly one whitespace byte separates the header from the raster
        pos += 1;

        if fields[0] != b"P5" {
            return Err(invalid("not a binary PGM"));
        }
        let parse = |field: &[u8]| {
            std::str::from_utf8(field)
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| invalid("malformed header number"))
        };
        let width = parse(fields[1])?;
        let height = parse(fields[2])?;
        let maxval = parse(fields[3])?;
        if maxval == 0 || maxval > 255 {
            return Err(invalid("only 8-bit PGM is supported"));
        }

        let expected = width
            .checked_mul(height)
            .ok_or_else(|| invalid("image too large"))?;
        let end = pos
            .checked_add(expected)
            .ok_or_else(|| invalid("image too large"))?;
        let raster = bytes.get(pos..end).ok_or_else(|| invalid("truncated raster"))?;
        Self::new(width, height, raster.to_vec())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn at(&self, x: usize, y: usize) -> f64 {
        f64::from(self.pixels[y * self.width + x])
    }
}

/// Variance of the Laplacian over the frame interior.
///
/// Frames smaller than 3x3 have no interior and score 0.
pub fn laplacian_variance(frame: &LumaFrame) -> f64 {
    if frame.width < 3 || frame.height < 3 {
        return 0.0;
    }

    let mut count = 0.0;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 1..frame.height - 1 {
        for x in 1..frame.width - 1 {
            let value = frame.at(x - 1, y) + frame.at(x + 1, y) + frame.at(x, y - 1)
                + frame.at(x, y + 1)
                - 4.0 * frame.at(x, y);
            count += 1.0;
            sum += value;
            sum_sq += value * value;
        }
    }
    let mean = sum / count;
    sum_sq / count - mean * mean
}

/// Outcome of a sharpness check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpnessReport {
    pub variance: f64,
    pub threshold: f64,
}

impl SharpnessReport {
    pub fn is_blurry(&self) -> bool {
        self.variance < self.threshold
    }
}

/// Score a frame against a threshold.
pub fn assess(frame: &LumaFrame, threshold: f64) -> SharpnessReport {
    SharpnessReport {
        variance: laplacian_variance(frame),
        threshold,
    }
}

#[cfg(test)]
pub(crate) fn checkerboard(size: usize) -> LumaFrame {
    let pixels = (0..size * size)
        .map(|i| if (i / size + i % size) % 2 == 0 { 255 } else { 0 })
        .collect();
    LumaFrame::new(size, size, pixels).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_frame_is_blurry() {
        let frame = LumaFrame::new(8, 8, vec![128; 64]).unwrap();
        let report = assess(&frame, 100.0);
        assert_eq!(report.variance, 0.0);
        assert!(report.is_blurry());
    }

    #[test]
    fn test_checkerboard_is_sharp() {
        let report = assess(&checkerboard(8), 100.0);
        assert!(report.variance > 1_000_000.0);
        assert!(!report.is_blurry());
    }

    #[test]
    fn test_gentle_gradient_is_blurry() {
        // A linear ramp has zero second derivative
        let pixels = (0..16 * 16).map(|i| (i % 16) as u8 * 4).collect();
        let frame = LumaFrame::new(16, 16, pixels).unwrap();
        assert!(assess(&frame, 100.0).is_blurry());
    }

    #[test]
    fn test_tiny_frame_scores_zero() {
        let frame = LumaFrame::new(2, 2, vec![0, 255, 255, 0]).unwrap();
        assert_eq!(laplacian_variance(&frame), 0.0);
    }

    #[test]
    fn test_frame_size_mismatch() {
        assert!(LumaFrame::new(4, 4, vec![0; 15]).is_err());
    }

    #[test]
    fn test_parse_pgm() {
        let mut bytes = b"P5\n# preview\n3 2\n255\n".to_vec();
        bytes.extend_from_slice(&[0, 10, 20, 30, 40, 50]);
        let frame = LumaFrame::from_pgm(&bytes).unwrap();
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.at(2, 1), 50.0);
    }

    #[test]
    fn test_parse_pgm_rejects_other_formats() {
        assert!(LumaFrame::from_pgm(b"P2\n1 1\n255\n0").is_err());
        assert!(LumaFrame::from_pgm(b"P5\n4 4\n255\n\x00\x01").is_err());
        assert!(LumaFrame::from_pgm(b"P5\n1 1\n65535\n\x00\x00").is_err());
        assert!(LumaFrame::from_pgm(b"\xFF\xD8\xFF").is_err());
    }

    #[test]
    fn test_parse_pgm_rejects_oversized_dimensions() {
        let err = LumaFrame::from_pgm(b"P5\n18446744073709551615 1\n255\n\x00").unwrap_err();
        assert!(err.to_string().contains("image too large"));
        assert!(LumaFrame::from_pgm(b"P5\n4294967296 4294967296\n255\n\x00").is_err());
    }
}
