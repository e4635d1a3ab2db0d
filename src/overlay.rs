//! Overlay compositing
//!
//! Loads a static RGBA image once per session, pre-scales it, and stamps it
//! onto live video frames. Pixels with any alpha are copied verbatim; fully
//! transparent pixels leave the frame untouched, so compositing the same
//! frame twice yields the same image as compositing once.

use std::path::Path;

use image::{Rgb, RgbImage, RgbaImage, imageops};

use crate::{Error, Result};

/// Proportional scale applied to the overlay at load time, relative to the
/// overlay's own dimensions
const OVERLAY_SCALE: f32 = 0.3;

/// Vertical placement offset as a fraction of frame height
const TOP_MARGIN: f32 = 0.1;

/// Stamps a pre-scaled overlay onto video frames
pub struct OverlayCompositor {
    overlay: RgbaImage,
}

impl OverlayCompositor {
    /// Load the overlay asset and pre-scale it
    ///
    /// Images without an alpha channel are promoted to RGBA with full
    /// opacity.
    ///
    /// # Errors
    ///
    /// Returns error if the asset is missing or unreadable; the caller
    /// treats this as fatal for the display sub-loop.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Overlay(format!(
                "overlay image not found at {}",
                path.display()
            )));
        }

        let img = image::open(path)
            .map_err(|e| Error::Overlay(format!("cannot load {}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "overlay asset loaded");
        Ok(Self::new(img.to_rgba8()))
    }

    /// Build a compositor from an in-memory RGBA image, pre-scaling it
    #[must_use]
    pub fn new(overlay: RgbaImage) -> Self {
        let (width, height) = overlay.dimensions();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let scaled_width = ((width as f32 * OVERLAY_SCALE) as u32).max(1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let scaled_height = ((height as f32 * OVERLAY_SCALE) as u32).max(1);

        let overlay = imageops::resize(
            &overlay,
            scaled_width,
            scaled_height,
            imageops::FilterType::Triangle,
        );

        Self { overlay }
    }

    /// Scaled overlay dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.overlay.dimensions()
    }

    /// Top-left placement of the overlay on a frame of the given size:
    /// horizontally centered, offset to 10% of frame height from the top
    #[must_use]
    pub fn placement(&self, frame_width: u32, frame_height: u32) -> (u32, u32) {
        let (overlay_width, _) = self.overlay.dimensions();
        let x = frame_width.saturating_sub(overlay_width) / 2;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let y = (frame_height as f32 * TOP_MARGIN) as u32;

        (x, y)
    }

    /// Stamp the overlay onto a frame in place
    ///
    /// Every overlay pixel with nonzero alpha copies its color channels onto
    /// the corresponding frame pixel; zero-alpha pixels are skipped. Overlay
    /// pixels falling outside the frame are clipped.
    pub fn composite(&self, frame: &mut RgbImage) {
        let (frame_width, frame_height) = frame.dimensions();
        let (x_offset, y_offset) = self.placement(frame_width, frame_height);

        for (x, y, pixel) in self.overlay.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }

            let frame_x = x + x_offset;
            let frame_y = y + y_offset;
            if frame_x < frame_width && frame_y < frame_height {
                frame.put_pixel(frame_x, frame_y, Rgb([pixel[0], pixel[1], pixel[2]]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// A 10x10 overlay: opaque red left half, transparent right half.
    /// Pre-scaling by 0.3 brings it down to 3x3.
    fn test_overlay() -> RgbaImage {
        RgbaImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 0])
            }
        })
    }

    #[test]
    fn test_prescale() {
        let compositor = OverlayCompositor::new(test_overlay());
        assert_eq!(compositor.dimensions(), (3, 3));
    }

    #[test]
    fn test_placement_centered() {
        let compositor = OverlayCompositor::new(test_overlay());
        // 3 wide overlay on a 100x50 frame: x = (100-3)/2, y = 50/10
        assert_eq!(compositor.placement(100, 50), (48, 5));
    }

    #[test]
    fn test_zero_alpha_untouched() {
        let compositor = OverlayCompositor::new(RgbaImage::from_pixel(
            10,
            10,
            Rgba([255, 255, 255, 0]),
        ));
        let mut frame = RgbImage::from_pixel(100, 50, Rgb([9, 9, 9]));
        let before = frame.clone();

        compositor.composite(&mut frame);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_opaque_pixels_copied() {
        let compositor = OverlayCompositor::new(RgbaImage::from_pixel(
            10,
            10,
            Rgba([255, 0, 0, 255]),
        ));
        let mut frame = RgbImage::from_pixel(100, 50, Rgb([0, 0, 0]));
        compositor.composite(&mut frame);

        let (x, y) = compositor.placement(100, 50);
        assert_eq!(frame.get_pixel(x, y), &Rgb([255, 0, 0]));
        // Outside the overlay region the frame is untouched
        assert_eq!(frame.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_composite_idempotent() {
        let compositor = OverlayCompositor::new(test_overlay());
        let mut once = RgbImage::from_pixel(100, 50, Rgb([10, 20, 30]));
        compositor.composite(&mut once);

        let mut twice = once.clone();
        compositor.composite(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_oversized_overlay_clipped() {
        // Overlay larger than the frame must not panic
        let compositor = OverlayCompositor::new(RgbaImage::from_pixel(
            400,
            400,
            Rgba([1, 2, 3, 255]),
        ));
        let mut frame = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        compositor.composite(&mut frame);
    }

    #[test]
    fn test_missing_asset() {
        let err = OverlayCompositor::from_path(Path::new("/nonexistent/overlay.png"));
        assert!(err.is_err());
    }
}
