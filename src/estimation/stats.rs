//! Per-channel aggregation over background samples

use crate::color::conversion::{truncate_f64_channels, ColorRgb};

/// Per-channel median; even-sized sets average the two middle values,
/// truncated
///
/// Returns `None` for an empty sample set.
pub(crate) fn channel_median(samples: &[[u8; 3]]) -> Option<ColorRgb> {
    if samples.is_empty() {
        return None;
    }

    let mut channels = [0.0f64; 3];
    let mut values: Vec<u8> = Vec::with_capacity(samples.len());
    for (c, out) in channels.iter_mut().enumerate() {
        values.clear();
        values.extend(samples.iter().map(|s| s[c]));
        values.sort_unstable();

        let mid = values.len() / 2;
        *out = if values.len() % 2 == 0 {
            (values[mid - 1] as f64 + values[mid] as f64) / 2.0
        } else {
            values[mid] as f64
        };
    }

    Some(truncate_f64_channels(channels))
}

/// Per-channel arithmetic mean, truncated
pub(crate) fn channel_mean(samples: &[[u8; 3]]) -> Option<ColorRgb> {
    if samples.is_empty() {
        return None;
    }

    let mut sums = [0u64; 3];
    for sample in samples {
        for c in 0..3 {
            sums[c] += sample[c] as u64;
        }
    }

    let n = samples.len() as f64;
    Some(truncate_f64_channels(sums.map(|s| s as f64 / n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    #[test]
    fn test_median_odd_and_even() {
        let odd = [[10, 0, 255], [20, 5, 0], [30, 10, 128]];
        assert_eq!(channel_median(&odd), Some(Srgb::new(20, 5, 128)));

        let even = [[10, 0, 0], [20, 1, 0], [30, 2, 0], [200, 3, 0]];
        // 25, 1.5 -> 1, 0
        assert_eq!(channel_median(&even), Some(Srgb::new(25, 1, 0)));
    }

    #[test]
    fn test_median_ignores_outliers() {
        let mut samples = vec![[240, 240, 240]; 9];
        samples.push([0, 0, 0]);
        samples.push([255, 0, 0]);
        assert_eq!(channel_median(&samples), Some(Srgb::new(240, 240, 240)));
    }

    #[test]
    fn test_mean() {
        let samples = [[0, 100, 255], [10, 101, 255]];
        // 100.5 truncates
        assert_eq!(channel_mean(&samples), Some(Srgb::new(5, 100, 255)));
        assert_eq!(channel_mean(&[]), None);
    }
}
