use ndarray::Array1;

pub(crate) fn normalize_vector(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// Turns joint log likelihoods into posterior probabilities.
pub(crate) fn softmax(log_likelihoods: &Array1<f64>) -> Array1<f64> {
    if log_likelihoods.is_empty() {
        return Array1::zeros(0);
    }
    let max = log_likelihoods.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let shifted = log_likelihoods.mapv(|x| (x - max).exp());
    let total = shifted.sum();
    shifted / total
}

/// Index of the largest value; the lowest index wins on ties.
pub(crate) fn argmax(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalize_zero_vector() {
        let v = Array1::<f64>::zeros(4);
        assert_eq!(normalize_vector(&v), Array1::<f64>::zeros(4));
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize_vector(&array![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-12);
        assert!((v[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&array![-1000.0, -1001.0, -1002.0]);
        assert!((p.sum() - 1.0).abs() < 1e-9);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }

    #[test]
    fn test_argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&array![0.5, 2.0, 2.0]), Some(1));
        assert_eq!(argmax(&array![1.0, 1.0]), Some(0));
        assert_eq!(argmax(&Array1::<f64>::zeros(0)), None);
    }
}
