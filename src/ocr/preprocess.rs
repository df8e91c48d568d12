use image::{GrayImage, ImageBuffer, Luma, Rgba};

/// Maximum Manhattan RGB distance from pure white for a pixel to count as text.
pub const WHITE_TOLERANCE: u32 = 60;

/// Binarization cut-off applied after masking.
pub const BINARY_THRESHOLD: u8 = 127;

/// Isolates bright UI text from the dark settings background.
///
/// Pixels within `WHITE_TOLERANCE` of (255, 255, 255) are kept and all others
/// zeroed; the result is then inverse-thresholded at `BINARY_THRESHOLD`, so
/// text comes out black (0) on a white (255) background.
///
/// A kept pixel has every channel at 195 or above, so the per-channel inverse
/// threshold sends all three channels the same way and a single luma channel
/// holds the whole result.
pub fn isolate_white_text(img: &ImageBuffer<Rgba<u8>, Vec<u8>>) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let distance: u32 = pixel.0[..3].iter().map(|&c| (255 - c) as u32).sum();
        let masked = if distance <= WHITE_TOLERANCE { pixel[0] } else { 0 };

        let value = if masked > BINARY_THRESHOLD { 0u8 } else { 255u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolate_white_text() {
        let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(4, 1);

        // Pure white: text
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        // Exactly at tolerance (20 + 20 + 20): text
        img.put_pixel(1, 0, Rgba([235, 235, 235, 255]));
        // Just past tolerance: background
        img.put_pixel(2, 0, Rgba([235, 235, 234, 255]));
        // Bright yellow highlight: background
        img.put_pixel(3, 0, Rgba([250, 220, 40, 255]));

        let result = isolate_white_text(&img);

        assert_eq!(result.get_pixel(0, 0)[0], 0, "White pixel should become black");
        assert_eq!(result.get_pixel(1, 0)[0], 0, "Near-white pixel should become black");
        assert_eq!(result.get_pixel(2, 0)[0], 255, "Off-white pixel should become white");
        assert_eq!(result.get_pixel(3, 0)[0], 255, "Coloured pixel should become white");
    }

    #[test]
    fn test_alpha_is_ignored() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(2, 2, Rgba([255, 255, 255, 0]));
        let result = isolate_white_text(&img);
        assert!(result.pixels().all(|p| p[0] == 0));
    }
}
