//! Shared descriptive statistics over small sample windows

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

/// Population variance; `None` for an empty slice
pub fn variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(sum_sq / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
    }

    #[test]
    fn test_variance_identical_values() {
        assert_eq!(variance(&[7.0, 7.0, 7.0, 7.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev() {
        // Values 2 and 4: mean 3, population variance 1, stddev 1
        let sd = std_dev(&[2.0, 4.0]).unwrap();
        assert!((sd - 1.0).abs() < 1e-12);
    }
}
