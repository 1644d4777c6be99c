use serde::{Deserialize, Serialize};

/// Dense term-frequency vector over a trigram vocabulary.
///
/// Vectors produced by [`crate::text::vectorize`] are either unit length or
/// all zeros; the zero vector is never divided by its norm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NGramVector {
    data: Vec<f32>,
}

impl NGramVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Euclidean length
    #[inline]
    pub fn norm(&self) -> f32 {
        dot_product(&self.data, &self.data).sqrt()
    }

    /// True when every component is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| *x == 0.0)
    }

    /// Scale to unit length. A zero vector is left untouched.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }

    /// Element-wise accumulate `other` into `self` over the shared prefix
    pub fn accumulate(&mut self, other: &NGramVector) {
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for x in &mut self.data {
            *x *= factor;
        }
    }

    /// Dot product with another vector; equals cosine similarity when both
    /// are unit length and share one vocabulary.
    #[inline]
    pub fn dot(&self, other: &NGramVector) -> f32 {
        dot_product(&self.data, &other.data)
    }
}

/// Sum of pairwise products over the shorter of the two slices.
///
/// Mismatched lengths are not an error here; callers are responsible for
/// comparing vectors built from the same vocabulary.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    let mut dot0 = 0.0f32;
    let mut dot1 = 0.0f32;

    let a_chunks = a.chunks_exact(4);
    let tail = a_chunks.remainder().len();
    for (x, y) in a_chunks.zip(b.chunks_exact(4)) {
        dot0 += x[0] * y[0] + x[1] * y[1];
        dot1 += x[2] * y[2] + x[3] * y[3];
    }

    for i in (len - tail)..len {
        dot0 += a[i] * b[i];
    }

    dot0 + dot1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_orthogonal_and_parallel() {
        let v1 = NGramVector::new(vec![1.0, 0.0]);
        let v2 = NGramVector::new(vec![1.0, 0.0]);
        assert!((v1.dot(&v2) - 1.0).abs() < 1e-6);

        let v3 = NGramVector::new(vec![0.0, 1.0]);
        assert!(v1.dot(&v3).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_uses_shorter_length() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.0, 1.0];
        assert_eq!(dot_product(&a, &b), 3.0);
        assert_eq!(dot_product(&b, &a), 3.0);
        assert_eq!(dot_product(&a, &[]), 0.0);
    }

    #[test]
    fn test_dot_product_chunked_matches_naive() {
        let a: Vec<f32> = (0..11).map(|i| i as f32 * 0.5).collect();
        let b: Vec<f32> = (0..11).map(|i| 1.0 - i as f32 * 0.1).collect();
        let naive: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert!((dot_product(&a, &b) - naive).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        let mut v = NGramVector::zeros(4);
        v.normalize();
        assert!(v.is_zero());
        assert!(v.as_slice().iter().all(|x| !x.is_nan()));
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = NGramVector::new(vec![3.0, 4.0]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.as_slice()[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_accumulate_and_scale() {
        let mut sum = NGramVector::zeros(2);
        sum.accumulate(&NGramVector::new(vec![1.0, 0.0]));
        sum.accumulate(&NGramVector::new(vec![0.0, 1.0]));
        sum.scale(0.5);
        assert_eq!(sum.as_slice(), &[0.5, 0.5]);
    }
}
