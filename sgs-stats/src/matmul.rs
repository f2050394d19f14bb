//! Dense matrix multiply, used to project raster pixels onto PCA components.

use nalgebra::DMatrix;

/// `lhs (m x k) * rhs (k x n) -> (m x n)`, a thin wrapper so callers outside this
/// crate don't need a direct `nalgebra` dependency for the one operation they need.
pub fn matmul(lhs: &DMatrix<f64>, rhs: &DMatrix<f64>) -> DMatrix<f64> {
    lhs * rhs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_multiply_is_noop() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let id = DMatrix::<f64>::identity(2, 2);
        let result = matmul(&a, &id);
        assert_eq!(result, a);
    }
}
