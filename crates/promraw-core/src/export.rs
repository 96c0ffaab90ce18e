//! PNG encoding and data URI packaging.

use crate::error::EngineResult;
use crate::surface::RasterSurface;
use base64::{Engine, engine::general_purpose::STANDARD};

/// Prefix of every exported image URI.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Suggested file name when the export is saved to disk.
pub const DEFAULT_EXPORT_FILENAME: &str = "promraw-drawing.png";

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> EngineResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
        writer.finish()?;
    }
    Ok(png_data)
}

/// Encode the whole surface as PNG.
pub fn surface_to_png(surface: &RasterSurface) -> EngineResult<Vec<u8>> {
    encode_png(surface.pixels(), surface.width(), surface.height())
}

/// Wrap PNG bytes in a self-contained `data:` URI.
pub fn png_data_uri(png_data: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png_data))
}

/// Extract the PNG bytes from a URI produced by [`png_data_uri`].
pub fn decode_png_data_uri(uri: &str) -> Option<Vec<u8>> {
    let payload = uri.strip_prefix(PNG_DATA_URI_PREFIX)?;
    STANDARD.decode(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgba;
    use kurbo::Point;
    use std::io::Cursor;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_surface() {
        let mut surface = RasterSurface::default();
        surface.fill_disc(Point::new(10.0, 10.0), 3.0, Rgba::BLACK, 1.0);
        let png_data = surface_to_png(&surface).unwrap();
        assert_eq!(&png_data[..8], &PNG_SIGNATURE);

        let decoder = png::Decoder::new(Cursor::new(png_data));
        let mut reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (800, 600));
        assert_eq!(info.color_type, png::ColorType::Rgba);

        let mut buf = vec![0; reader.output_buffer_size()];
        reader.next_frame(&mut buf).unwrap();
        assert_eq!(buf, surface.pixels());
    }

    #[test]
    fn test_data_uri_roundtrip() {
        let surface = RasterSurface::new(4, 3, Rgba::WHITE);
        let png_data = surface_to_png(&surface).unwrap();
        let uri = png_data_uri(&png_data);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_png_data_uri(&uri), Some(png_data));
        assert_eq!(decode_png_data_uri("data:image/jpeg;base64,AAAA"), None);
    }

    #[test]
    fn test_mismatched_buffer_is_error() {
        assert!(encode_png(&[0; 7], 2, 2).is_err());
    }
}
