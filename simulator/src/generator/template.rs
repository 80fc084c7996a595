/// Adds a Gaussian bump of `height` centred on `center` to `trace`, keeping the larger value.
pub fn add_gaussian(trace: &mut [f32], center: usize, width: f32, height: f32) {
    let width = width.max(1.0);
    for (idx, value) in trace.iter_mut().enumerate() {
        let d = idx as f32 - center as f32;
        let bump = height * (-(d * d) / (2.0 * width * width)).exp();
        *value = value.max(bump);
    }
}

/// Raises `trace[start..end]` to at least `level`, clipped to the trace length.
pub fn add_plateau(trace: &mut [f32], start: usize, end: usize, level: f32) {
    let end = end.min(trace.len());
    if start >= end {
        return;
    }
    for value in &mut trace[start..end] {
        *value = value.max(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_peaks_at_center() {
        let mut trace = vec![0.0; 50];
        add_gaussian(&mut trace, 20, 3.0, 0.7);
        assert_eq!(trace[20], 0.7);
        assert!(trace[17] < trace[20] && trace[23] < trace[20]);
    }

    #[test]
    fn plateau_is_clipped() {
        let mut trace = vec![0.1; 10];
        add_plateau(&mut trace, 8, 20, 0.9);
        assert_eq!(&trace[7..], &[0.1, 0.9, 0.9]);
        add_plateau(&mut trace, 12, 20, 0.9);
    }
}
