//! Opening the input stack.
//!
//! The launcher decodes the stack once to make sure the workbench gets something it can display,
//! then hands over the path together with the frame count and the frames the session will process.

use crate::error::DatasetError;
use crate::models::TimeRange;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::BufReader;
use tiff::decoder::{Decoder, Limits};

/// A stack the workbench can operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub path: Utf8PathBuf,
    pub frame_count: u32,
    /// Requested time range clamped to the frames that exist.
    pub time_range: TimeRange,
}

/// Turns a stack path into a usable [`Dataset`].
pub trait DatasetLoader {
    fn load(&self, path: &Utf8Path, time_range: TimeRange) -> Result<Dataset, DatasetError>;
}

/// Loader for classic and BigTIFF stacks.
///
/// Every frame is decoded once, so a stack only counts as usable when all of its pixel data is
/// present and all frames share the dimensions of the first one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TiffStackLoader;

impl TiffStackLoader {
    pub fn new() -> Self {
        Self
    }

    /// Number of frames in the stack.
    pub fn count_frames(&self, path: &Utf8Path) -> Result<u32, DatasetError> {
        let not_a_tiff = |reason: String| DatasetError::NotATiff {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| not_a_tiff(e.to_string()))?
            .with_limits(Limits::unlimited());

        let expected = decoder
            .dimensions()
            .map_err(|e| not_a_tiff(e.to_string()))?;
        let mut frames: u32 = 0;
        loop {
            let dimensions = decoder
                .dimensions()
                .map_err(|e| not_a_tiff(format!("frame {frames}: {e}")))?;
            if dimensions != expected {
                return Err(not_a_tiff(format!(
                    "frame {frames} is {}x{}, the stack is {}x{}",
                    dimensions.0, dimensions.1, expected.0, expected.1
                )));
            }
            decoder
                .read_image()
                .map_err(|e| not_a_tiff(format!("frame {frames}: {e}")))?;
            frames = frames.saturating_add(1);

            if !decoder.more_images() {
                break;
            }
            decoder
                .next_image()
                .map_err(|e| not_a_tiff(format!("frame {frames}: {e}")))?;
        }

        tracing::debug!("{} holds {} frame(s) of {}x{}", path, frames, expected.0, expected.1);
        Ok(frames)
    }
}

impl DatasetLoader for TiffStackLoader {
    fn load(&self, path: &Utf8Path, time_range: TimeRange) -> Result<Dataset, DatasetError> {
        let frame_count = self.count_frames(path)?;
        let last = frame_count - 1;

        if time_range.min > last {
            return Err(DatasetError::EmptyRange {
                path: path.to_path_buf(),
                frames: frame_count,
                min: time_range.min,
                max: time_range.max,
            });
        }

        let effective = TimeRange {
            min: time_range.min,
            max: time_range.max.min(last),
        };

        tracing::info!(
            "Opened {} ({} frames, processing {}..={})",
            path,
            frame_count,
            effective.min,
            effective.max
        );

        Ok(Dataset {
            path: path.to_path_buf(),
            frame_count,
            time_range: effective,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;
    use tiff::encoder::{TiffEncoder, colortype};

    /// Encodes one 8-bit grey frame per entry of `sizes`.
    fn encode_frames(sizes: &[(u32, u32)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        for (index, &(width, height)) in sizes.iter().enumerate() {
            let pixels: Vec<u8> = (0..width * height)
                .map(|i| (i as usize + index) as u8)
                .collect();
            encoder
                .write_image::<colortype::Gray8>(width, height, &pixels)
                .unwrap();
        }
        drop(encoder);
        cursor.into_inner()
    }

    fn stack_bytes(frames: usize) -> Vec<u8> {
        encode_frames(&vec![(4, 3); frames])
    }

    fn write_stack(bytes: &[u8]) -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("stack.tif")).unwrap();
        fs::write(&path, bytes).unwrap();
        (temp_dir, path)
    }

    /// Little-endian header followed by `count` image directories without any entries.
    fn directories_without_images(count: u32) -> Vec<u8> {
        let mut bytes = b"II".to_vec();
        bytes.extend_from_slice(&42u16.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());
        for i in 0..count {
            bytes.extend_from_slice(&0u16.to_le_bytes());
            let next = if i + 1 == count { 0 } else { 8 + 6 * (i + 1) };
            bytes.extend_from_slice(&next.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_count_frames() {
        let (_temp_dir, path) = write_stack(&stack_bytes(5));
        assert_eq!(TiffStackLoader::new().count_frames(&path).unwrap(), 5);
    }

    #[test]
    fn test_single_frame() {
        let (_temp_dir, path) = write_stack(&stack_bytes(1));
        assert_eq!(TiffStackLoader::new().count_frames(&path).unwrap(), 1);
    }

    #[test]
    fn test_rejects_non_tiff() {
        let (_temp_dir, path) = write_stack(b"\x89PNG\r\n\x1a\n0000");
        assert!(matches!(
            TiffStackLoader::new().count_frames(&path),
            Err(DatasetError::NotATiff { .. })
        ));
    }

    #[test]
    fn test_rejects_directories_without_pixel_data() {
        let (_temp_dir, path) = write_stack(&directories_without_images(5));
        let err = TiffStackLoader::new()
            .load(&path, TimeRange::default())
            .unwrap_err();
        assert!(matches!(err, DatasetError::NotATiff { .. }));
    }

    #[test]
    fn test_rejects_mixed_frame_sizes() {
        let (_temp_dir, path) = write_stack(&encode_frames(&[(4, 3), (4, 3), (2, 2)]));
        let err = TiffStackLoader::new().count_frames(&path).unwrap_err();
        assert!(
            matches!(&err, DatasetError::NotATiff { reason, .. } if reason.contains("frame 2")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_rejects_truncated_file() {
        let bytes = stack_bytes(3);
        let (_temp_dir, path) = write_stack(&bytes[..bytes.len() / 2]);
        assert!(TiffStackLoader::new().count_frames(&path).is_err());
    }

    #[test]
    fn test_load_clamps_unbounded_range() {
        let (_temp_dir, path) = write_stack(&stack_bytes(10));
        let dataset = TiffStackLoader::new()
            .load(&path, TimeRange { min: 2, max: TimeRange::UNBOUNDED })
            .unwrap();
        assert_eq!(dataset.frame_count, 10);
        assert_eq!(dataset.time_range, TimeRange { min: 2, max: 9 });
    }

    #[test]
    fn test_load_range_past_end() {
        let (_temp_dir, path) = write_stack(&stack_bytes(3));
        let err = TiffStackLoader::new()
            .load(&path, TimeRange { min: 3, max: 4 })
            .unwrap_err();
        assert!(matches!(err, DatasetError::EmptyRange { frames: 3, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TiffStackLoader::new()
            .load(Utf8Path::new("/definitely/not/here.tif"), TimeRange::default())
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
