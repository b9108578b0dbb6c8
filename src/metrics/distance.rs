//! Distance metrics used by the k-means reference clustering primitive.

use ndarray::ArrayView1;

/// Euclidean distance
pub fn euclidean_distance(x: &ArrayView1<f64>, y: &ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn euclidean_matches_known_value() {
        let x = array![0.0, 0.0];
        let y = array![3.0, 4.0];
        assert!((euclidean_distance(&x.view(), &y.view()) - 5.0).abs() < 1e-9);
    }
}
