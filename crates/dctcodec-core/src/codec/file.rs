//! File-path and encoded-image conveniences around the in-memory codec.
//!
//! Rasters are read and written with the `image` crate. Decoded RGB pixels
//! are reordered to BGR before compression, so a container produced by
//! [`compress_file`] is byte-identical to [`compress`] on
//! the same BGR image.
//!
//! Output files are written in one pass. If writing fails after the file has
//! been created, the partial file is removed before the error is returned.

use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Write};
use std::path::Path;

use image::ImageFormat;
use log::{debug, warn};

use super::compress::compress;
use super::decompress::decompress;
use super::types::{CodecError, CompressionStats, DecompressionStats, Image};
use super::Stopwatch;

/// Read a raster file into a BGR image.
///
/// # Errors
///
/// Returns `CodecError::UnreadableInput` if the file is missing or is not a
/// decodable image.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image, CodecError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| CodecError::UnreadableInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Image::from_rgb_image(img.into_rgb8())
}

/// Write an image to `path`, choosing the format from the file extension.
pub fn save_image(image: &Image, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).map_err(|e| {
        CodecError::ImageEncoding(format!(
            "unsupported output format for {}: {}",
            path.display(),
            e
        ))
    })?;
    let bytes = encode_image(image, format)?;
    write_output(path, &bytes)
}

/// Compress the raster at `input` and write the container to `output`.
///
/// `original_size` in the returned stats is the size of the input file.
pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    factor: i32,
) -> Result<CompressionStats, CodecError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let stopwatch = Stopwatch::start();

    let image = load_image(input)?;
    let (bytes, stats) = compress(&image, factor)?;
    write_output(output, &bytes)?;

    let original_size = fs::metadata(input)
        .map_err(|source| CodecError::Io {
            path: input.to_path_buf(),
            source,
        })?
        .len() as usize;

    debug!(
        "wrote container {} ({} bytes)",
        output.display(),
        bytes.len()
    );
    Ok(CompressionStats::new(
        original_size,
        bytes.len(),
        stats.clamped_coefficients,
        stopwatch.elapsed_ms(),
    ))
}

/// Decompress the container at `input` and write the image to `output`.
///
/// The output format follows the extension of `output` (PNG or JPEG).
pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<DecompressionStats, CodecError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let stopwatch = Stopwatch::start();

    let bytes = fs::read(input).map_err(|e| CodecError::UnreadableInput {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;
    let (image, mut stats) = decompress(&bytes)?;
    save_image(&image, output)?;

    debug!("wrote image {}", output.display());
    stats.elapsed_ms = stopwatch.elapsed_ms();
    Ok(stats)
}

/// Compress encoded image bytes (PNG or JPEG) without touching the filesystem.
///
/// `original_size` is the raw pixel size, width * height * 3.
pub fn compress_encoded(
    bytes: &[u8],
    factor: i32,
) -> Result<(Vec<u8>, CompressionStats), CodecError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CodecError::InvalidImageData(e.to_string()))?;
    let image = Image::from_rgb_image(img.into_rgb8())?;
    compress(&image, factor)
}

/// Decompress container bytes straight to PNG bytes.
pub fn decompress_to_png(bytes: &[u8]) -> Result<(Vec<u8>, DecompressionStats), CodecError> {
    let (image, stats) = decompress(bytes)?;
    let png = encode_image(&image, ImageFormat::Png)?;
    Ok((png, stats))
}

fn encode_image(image: &Image, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
    let dynamic = image.to_dynamic_image().ok_or_else(|| {
        CodecError::ImageEncoding("pixel buffer does not match image dimensions".to_string())
    })?;

    let mut buffer = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut buffer, format)
        .map_err(|e| CodecError::ImageEncoding(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Write `bytes` to `path`, removing the file again if the write fails.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    write_output_with(path, |file| write_all(file, bytes))
}

/// Create `path` and hand it to `write`. On a write error the partial file
/// is removed and the error is returned as `CodecError::Io`.
fn write_output_with<F>(path: &Path, write: F) -> Result<(), CodecError>
where
    F: FnOnce(File) -> io::Result<()>,
{
    let io_error = |source: io::Error| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    if let Err(source) = write(file) {
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove partial output {}: {}", path.display(), e);
        }
        return Err(io_error(source));
    }
    Ok(())
}

fn write_all(file: File, bytes: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn gradient_rgb(width: u32, height: u32) -> image::RgbImage {
        image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 8) as u8, (y * 8) as u8, 128])
        })
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.png");
        let container = dir.path().join("source.dct");
        let restored = dir.path().join("restored.png");
        gradient_rgb(20, 12).save(&source).unwrap();

        let stats = compress_file(&source, &container, 5).unwrap();
        assert_eq!(stats.original_size as u64, fs::metadata(&source).unwrap().len());
        assert_eq!(stats.compressed_size as u64, fs::metadata(&container).unwrap().len());

        let stats = decompress_file(&container, &restored).unwrap();
        assert_eq!((stats.width, stats.height), (20, 12));

        let img = image::open(&restored).unwrap();
        assert_eq!(img.width(), 20);
        assert_eq!(img.height(), 12);
    }

    #[test]
    fn test_file_and_memory_containers_match() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.png");
        let container = dir.path().join("out.dct");
        gradient_rgb(17, 9).save(&source).unwrap();

        compress_file(&source, &container, 7).unwrap();
        let on_disk = fs::read(&container).unwrap();

        let image = load_image(&source).unwrap();
        let (in_memory, _) = compress(&image, 7).unwrap();
        assert_eq!(on_disk, in_memory);

        let png = fs::read(&source).unwrap();
        let (encoded, _) = compress_encoded(&png, 7).unwrap();
        assert_eq!(encoded, in_memory);
    }

    #[test]
    fn test_load_image_is_bgr() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("pixel.png");
        image::RgbImage::from_raw(1, 1, vec![200, 100, 50])
            .unwrap()
            .save(&source)
            .unwrap();

        let image = load_image(&source).unwrap();
        assert_eq!(image.pixels(), &[50, 100, 200]);
    }

    #[test]
    fn test_missing_input_is_unreadable() {
        let dir = tempdir().unwrap();
        let result = compress_file(dir.path().join("missing.png"), dir.path().join("out.dct"), 5);
        assert!(matches!(result, Err(CodecError::UnreadableInput { .. })));
        assert!(!dir.path().join("out.dct").exists());

        let result = decompress_file(dir.path().join("missing.dct"), dir.path().join("out.png"));
        assert!(matches!(result, Err(CodecError::UnreadableInput { .. })));
    }

    #[test]
    fn test_corrupt_container_leaves_no_output() {
        let dir = tempdir().unwrap();
        let container = dir.path().join("broken.dct");
        let output = dir.path().join("out.png");
        fs::write(&container, [3u8, 0, 0, 0, 16]).unwrap();

        let result = decompress_file(&container, &output);
        assert!(matches!(result, Err(CodecError::CorruptContainer(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_unwritable_output_is_io_error() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.png");
        gradient_rgb(8, 8).save(&source).unwrap();

        let output = dir.path().join("no_such_dir").join("out.dct");
        let result = compress_file(&source, &output, 5);
        assert!(matches!(result, Err(CodecError::Io { .. })));
    }

    #[test]
    fn test_failed_write_removes_partial_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("partial.dct");

        let result = write_output_with(&output, |mut file| {
            file.write_all(&[3, 0, 0, 0, 16, 0])?;
            file.sync_all()?;
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
        });

        match result {
            Err(CodecError::Io { path, source }) => {
                assert_eq!(path, output);
                assert_eq!(source.kind(), io::ErrorKind::WriteZero);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_successful_write_keeps_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("full.dct");
        write_output(&output, &[1, 2, 3]).unwrap();
        assert_eq!(fs::read(&output).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_output_extension() {
        let image = Image::from_bgr(8, 8, vec![128u8; 192]).unwrap();
        let dir = tempdir().unwrap();
        let result = save_image(&image, dir.path().join("out.unknown"));
        assert!(matches!(result, Err(CodecError::ImageEncoding(_))));
    }

    #[test]
    fn test_decompress_to_png() {
        let image = Image::from_bgr(10, 6, vec![128u8; 180]).unwrap();
        let (bytes, _) = compress(&image, 5).unwrap();
        let (png, stats) = decompress_to_png(&bytes).unwrap();

        // PNG signature
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!((stats.width, stats.height), (10, 6));

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 10);
        assert_eq!(decoded.height(), 6);
    }

    #[test]
    fn test_compress_encoded_rejects_garbage() {
        assert!(matches!(
            compress_encoded(&[0, 1, 2, 3], 5),
            Err(CodecError::InvalidImageData(_))
        ));
    }
}
