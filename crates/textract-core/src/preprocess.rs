//! Image cleanup applied before OCR.
//!
//! Scanned inputs are binarized with a global Otsu threshold: the cutoff is
//! the gray level that maximizes between-class variance of the intensity
//! histogram, and every pixel strictly above it becomes white.

use image::{GrayImage, Luma};

/// Compute the Otsu threshold of a grayscale image.
///
/// Returns 0 for empty or single-level images.
pub fn otsu_level(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for Luma([v]) in image.pixels() {
        histogram[*v as usize] += 1;
    }

    let total = u64::from(image.width()) * u64::from(image.height());
    if total == 0 {
        return 0;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_variance = 0f64;
    let mut best_level = 0u8;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_sum - background_sum) / foreground_weight as f64;
        let diff = background_mean - foreground_mean;
        let variance = background_weight as f64 * foreground_weight as f64 * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Binarize with the Otsu level: `> level` → 255, otherwise 0.
pub fn binarize(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    tracing::trace!(level, "otsu threshold");
    threshold(image, level)
}

fn threshold(image: &GrayImage, level: u8) -> GrayImage {
    let mut out = image.clone();
    for Luma([v]) in out.pixels_mut() {
        *v = if *v > level { 255 } else { 0 };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half `dark`, right half `light`, with a little noise on each side.
    fn bimodal(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let jitter = ((x + y) % 3) as u8;
            if x < width / 2 {
                Luma([dark + jitter])
            } else {
                Luma([light - jitter])
            }
        })
    }

    #[test]
    fn otsu_level_separates_two_modes() {
        let img = bimodal(40, 20, 30, 220);
        let level = otsu_level(&img);
        assert!(level >= 32 && level < 218, "level {level} not between modes");
    }

    #[test]
    fn binarize_maps_modes_to_black_and_white() {
        let img = bimodal(40, 20, 30, 220);
        let out = binarize(&img);
        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(out.get_pixel(0, 0), &Luma([0]));
        assert_eq!(out.get_pixel(39, 19), &Luma([255]));
        assert!(out.pixels().all(|Luma([v])| *v == 0 || *v == 255));
    }

    #[test]
    fn uniform_image_has_zero_level() {
        let img = GrayImage::from_pixel(8, 8, Luma([128]));
        assert_eq!(otsu_level(&img), 0);
        assert!(binarize(&img).pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn all_black_stays_black() {
        let img = GrayImage::from_pixel(8, 8, Luma([0]));
        assert!(binarize(&img).pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn empty_image_does_not_panic() {
        let img = GrayImage::new(0, 0);
        assert_eq!(otsu_level(&img), 0);
        assert_eq!(binarize(&img).dimensions(), (0, 0));
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let img = GrayImage::from_raw(3, 1, vec![99, 100, 101]).unwrap();
        let out = threshold(&img, 100);
        assert_eq!(out.into_raw(), vec![0, 0, 255]);
    }
}
