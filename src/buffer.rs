use crate::color::Color;
use crate::error::TracerError;

/// What is known about a single pixel while an image renders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelData {
    /// The accumulated (averaged) color of the pixel's sub-rays.
    pub color: Color,

    /// Whether any sub-ray's closest intersection was a distance tie. The
    /// color of an ambiguous pixel is provisional until the resolution
    /// pass has run.
    pub is_ambiguous: bool,
}

/// Holds an image in memory while it is being rendered.
///
/// Created, filled, resolved and converted within a single render call;
/// it never outlives the call.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    pixels_wide: usize,
    pixels_high: usize,
    array: Vec<PixelData>,
}

impl ImageBuffer {
    pub fn new(pixels_wide: usize, pixels_high: usize) -> ImageBuffer {
        ImageBuffer {
            pixels_wide,
            pixels_high,
            array: vec![Default::default(); pixels_wide * pixels_high],
        }
    }

    pub fn pixels_wide(&self) -> usize {
        self.pixels_wide
    }

    pub fn pixels_high(&self) -> usize {
        self.pixels_high
    }

    /// The pixel at column `i`, row `j`. Out-of-bounds coordinates are a
    /// fatal error, not a silent skip.
    pub fn pixel(&self, i: usize, j: usize) -> Result<&PixelData, TracerError> {
        if i < self.pixels_wide && j < self.pixels_high {
            Ok(&self.array[j * self.pixels_wide + i])
        } else {
            Err(TracerError::PixelOutOfBounds(i, j))
        }
    }

    /// Mutable access to the pixel at column `i`, row `j`.
    pub fn pixel_mut(&mut self, i: usize, j: usize)
        -> Result<&mut PixelData, TracerError> {
        if i < self.pixels_wide && j < self.pixels_high {
            Ok(&mut self.array[j * self.pixels_wide + i])
        } else {
            Err(TracerError::PixelOutOfBounds(i, j))
        }
    }

    /// The maximum red, green or blue value anywhere in the image, used
    /// for scaling the image brightness. Every pixel is validated on the
    /// way through. An all-black image reports 1.0, so that scaling by
    /// the maximum never divides by zero.
    pub fn max_color_value(&self) -> Result<f64, TracerError> {
        let mut max: f64 = 0.0;
        for pixel in &self.array {
            pixel.color.validate()?;
            max = max
                .max(pixel.color.red)
                .max(pixel.color.green)
                .max(pixel.color.blue);
        }

        if max == 0.0 {
            max = 1.0;
        }

        Ok(max)
    }

    /// Second pass over the image: every ambiguous pixel takes the
    /// average color of its immediate non-ambiguous neighbors. A pixel
    /// with no such neighbor keeps its provisional color.
    ///
    /// Flags are left set during the pass, so resolved pixels never feed
    /// other resolutions and the outcome is order-independent.
    pub fn resolve_ambiguous_pixels(&mut self) {
        for j in 0..self.pixels_high {
            for i in 0..self.pixels_wide {
                if self.array[j * self.pixels_wide + i].is_ambiguous {
                    self.resolve_one_pixel(i, j);
                }
            }
        }
    }

    fn resolve_one_pixel(&mut self, i: usize, j: usize) {
        let i_min = i.saturating_sub(1);
        let i_max = (i + 1).min(self.pixels_wide - 1);
        let j_min = j.saturating_sub(1);
        let j_max = (j + 1).min(self.pixels_high - 1);

        let mut color_sum = Color::black();
        let mut found = 0;
        for sj in j_min..=j_max {
            for si in i_min..=i_max {
                let pixel = &self.array[sj * self.pixels_wide + si];
                if !pixel.is_ambiguous {
                    found += 1;
                    color_sum += pixel.color;
                }
            }
        }

        if found > 0 {
            self.array[j * self.pixels_wide + i].color =
                color_sum / found as f64;
        }
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_fatal() {
        let mut buffer = ImageBuffer::new(4, 3);

        assert!(buffer.pixel(3, 2).is_ok());
        assert_eq!(
            buffer.pixel(4, 0).unwrap_err(),
            TracerError::PixelOutOfBounds(4, 0)
        );
        assert_eq!(
            buffer.pixel_mut(0, 3).unwrap_err(),
            TracerError::PixelOutOfBounds(0, 3)
        );
    }

    #[test]
    fn all_black_image_reports_max_of_one() {
        let buffer = ImageBuffer::new(8, 8);

        assert_eq!(buffer.max_color_value().unwrap(), 1.0);
    }

    #[test]
    fn max_color_value_spans_all_channels() {
        let mut buffer = ImageBuffer::new(2, 2);
        buffer.pixel_mut(0, 0).unwrap().color = Color::rgb(0.5, 0.0, 0.0);
        buffer.pixel_mut(1, 1).unwrap().color = Color::rgb(0.0, 0.0, 2.5);

        assert_eq!(buffer.max_color_value().unwrap(), 2.5);
    }

    #[test]
    fn max_color_value_validates_pixels() {
        let mut buffer = ImageBuffer::new(2, 2);
        buffer.pixel_mut(0, 1).unwrap().color = Color::rgb(0.0, -0.5, 0.0);

        assert_eq!(
            buffer.max_color_value().unwrap_err(),
            TracerError::NegativeColor
        );
    }

    #[test]
    fn ambiguous_pixel_takes_neighbor_average() {
        let mut buffer = ImageBuffer::new(3, 3);
        for j in 0..3 {
            for i in 0..3 {
                buffer.pixel_mut(i, j).unwrap().color =
                    Color::rgb(0.5, 0.0, 0.0);
            }
        }

        let center = buffer.pixel_mut(1, 1).unwrap();
        center.color = Color::rgb(100.0, 100.0, 100.0);
        center.is_ambiguous = true;

        buffer.resolve_ambiguous_pixels();

        assert_eq!(
            buffer.pixel(1, 1).unwrap().color,
            Color::rgb(0.5, 0.0, 0.0)
        );
    }

    #[test]
    fn ambiguous_pixel_without_neighbors_keeps_its_color() {
        // A 1x1 image has no neighbors at all.
        let mut buffer = ImageBuffer::new(1, 1);
        let pixel = buffer.pixel_mut(0, 0).unwrap();
        pixel.color = Color::rgb(0.25, 0.5, 0.75);
        pixel.is_ambiguous = true;

        buffer.resolve_ambiguous_pixels();

        assert_eq!(
            buffer.pixel(0, 0).unwrap().color,
            Color::rgb(0.25, 0.5, 0.75)
        );
    }

    #[test]
    fn resolution_ignores_ambiguous_neighbors() {
        let mut buffer = ImageBuffer::new(2, 1);
        {
            let left = buffer.pixel_mut(0, 0).unwrap();
            left.color = Color::rgb(9.0, 9.0, 9.0);
            left.is_ambiguous = true;
        }
        {
            let right = buffer.pixel_mut(1, 0).unwrap();
            right.color = Color::rgb(1.0, 1.0, 1.0);
            right.is_ambiguous = true;
        }

        buffer.resolve_ambiguous_pixels();

        // Neither pixel had a non-ambiguous neighbor; both keep their
        // provisional colors.
        assert_eq!(
            buffer.pixel(0, 0).unwrap().color,
            Color::rgb(9.0, 9.0, 9.0)
        );
        assert_eq!(
            buffer.pixel(1, 0).unwrap().color,
            Color::rgb(1.0, 1.0, 1.0)
        );
    }
}
