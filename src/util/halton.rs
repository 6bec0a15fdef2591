/// Radical-inverse Halton sequence, used to build the per-frame sub-pixel jitter cycle.
pub fn halton(index: u32, base: u32) -> f32 {
    let mut f = 1.0f32;
    let mut r = 0.0f32;
    let mut i = index;
    while i > 0 {
        f /= base as f32;
        r += f * (i % base) as f32;
        i /= base;
    }
    r
}

/// `subpixOffsets[n] = (Halton(2, n+1) - 0.5, Halton(3, n+1) - 0.5)`.
pub fn subpixel_jitter_sequence(length: u32) -> Vec<[f32; 2]> {
    (0..length)
        .map(|n| {
            [
                halton(n + 1, 2) - 0.5,
                halton(n + 1, 3) - 0.5,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halton_base_2_matches_known_values() {
        assert!((halton(1, 2) - 0.5).abs() < 1e-6);
        assert!((halton(2, 2) - 0.25).abs() < 1e-6);
        assert!((halton(3, 2) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn jitter_sequence_mean_is_within_one_over_n_of_zero() {
        let n = 256;
        let offsets = subpixel_jitter_sequence(n);

        let mean_x: f32 = offsets.iter().map(|o| o[0]).sum::<f32>() / n as f32;
        let mean_y: f32 = offsets.iter().map(|o| o[1]).sum::<f32>() / n as f32;

        let bound = 1.0 / n as f32;
        assert!(mean_x.abs() < bound, "mean_x={mean_x} bound={bound}");
        assert!(mean_y.abs() < bound, "mean_y={mean_y} bound={bound}");
    }
}
