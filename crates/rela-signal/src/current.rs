//! Semantic current: first difference of voltage across row order.

/// ΔV over consecutive rows. Element `i` is `voltage[i] - voltage[i - 1]`;
/// element `0` is `0` (no prior sample).
///
/// Batch computation over the whole ordered sequence: the engine processes
/// complete tables, not live streams, so there is no incremental per-row
/// callback form.
pub fn semantic_current(voltage: &[f64]) -> Vec<f64> {
    voltage
        .iter()
        .enumerate()
        .map(|(i, v)| if i == 0 { 0.0 } else { v - voltage[i - 1] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        assert!(semantic_current(&[]).is_empty());
        assert_eq!(semantic_current(&[4.2]), vec![0.0]);
    }

    #[test]
    fn test_constant_voltage_is_all_zero() {
        let current = semantic_current(&[3.0; 8]);
        assert!(current.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_first_difference() {
        let current = semantic_current(&[10.0, 0.1]);
        assert_eq!(current.len(), 2);
        assert_eq!(current[0], 0.0);
        assert!((current[1] - (-9.9)).abs() < 1e-10);
    }

    #[test]
    fn test_length_preserved() {
        let voltage: Vec<f64> = (0..37).map(|i| 1.0 / (i as f64 + 0.1)).collect();
        assert_eq!(semantic_current(&voltage).len(), voltage.len());
    }
}
