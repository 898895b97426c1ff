//! Стандартизация признаков: (X - mean) / std по каждой колонке

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::config::ZeroVariancePolicy;
use crate::error::{LoaderError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
    n_samples_seen: usize,
    zero_variance: ZeroVariancePolicy,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::with_policy(ZeroVariancePolicy::default())
    }

    pub fn with_policy(zero_variance: ZeroVariancePolicy) -> Self {
        Self {
            mean: None,
            scale: None,
            n_samples_seen: 0,
            zero_variance,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(LoaderError::EmptyTable("no samples to fit".to_string()));
        }

        let mut mean = Array1::zeros(X.ncols());
        let mut scale = Array1::zeros(X.ncols());

        for (j, column) in X.axis_iter(Axis(1)).enumerate() {
            let (m, var, count) = column_stats(column);
            // NaN-колонка не считается константной и останется NaN
            if is_constant(var, m, count) {
                match self.zero_variance {
                    ZeroVariancePolicy::UnitScale => {
                        tracing::debug!("Column {} has zero variance, using unit scale", j);
                        scale[j] = 1.0;
                    }
                    ZeroVariancePolicy::Fail => {
                        return Err(LoaderError::ZeroVariance { column: j });
                    }
                }
            } else {
                scale[j] = var.sqrt();
            }
            mean[j] = m;
        }

        self.mean = Some(mean);
        self.scale = Some(scale);
        self.n_samples_seen = X.nrows();
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = self.fitted(X)?;

        let mut normalized = X.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - mean[i]) / scale[i];
            }
        }

        Ok(normalized)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn inverse_transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = self.fitted(X)?;

        let mut restored = X.clone();
        for mut row in restored.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = *val * scale[i] + mean[i];
            }
        }

        Ok(restored)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    pub fn n_samples_seen(&self) -> usize {
        self.n_samples_seen
    }

    fn fitted(&self, X: &Array2<f64>) -> Result<(&Array1<f64>, &Array1<f64>)> {
        if !self.is_fitted {
            return Err(LoaderError::NotFitted);
        }
        let mean = self.mean.as_ref().ok_or(LoaderError::NotFitted)?;
        let scale = self.scale.as_ref().ok_or(LoaderError::NotFitted)?;
        if X.ncols() != mean.len() {
            return Err(LoaderError::ShapeMismatch {
                expected: mean.len(),
                actual: X.ncols(),
            });
        }
        Ok((mean, scale))
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

/// Среднее, популяционная дисперсия (ddof = 0) и число значений без учёта NaN
fn column_stats(column: ArrayView1<f64>) -> (f64, f64, usize) {
    let count = column.iter().filter(|v| !v.is_nan()).count();
    if count == 0 {
        return (f64::NAN, f64::NAN, 0);
    }

    let n = count as f64;
    let mean = compensated_sum(column.iter().copied().filter(|v| !v.is_nan())) / n;

    // второй проход с поправкой на ошибку округления среднего
    let (sq, dev) = column
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0_f64, 0.0_f64), |(sq, dev), v| {
            let d = v - mean;
            (sq + d * d, dev + d)
        });
    let variance = ((sq - dev * dev / n) / n).max(0.0);

    (mean, variance, count)
}

/// Сумма Ноймайера
fn compensated_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            c += (sum - t) + v;
        } else {
            c += (v - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Порог растёт с числом строк: var <= n*eps*var + (n*mean*eps)^2
fn is_constant(var: f64, mean: f64, count: usize) -> bool {
    let n = count as f64;
    let upper_bound = n * f64::EPSILON * var + (n * mean * f64::EPSILON).powi(2);
    var <= upper_bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const EPS: f64 = 1e-9;

    fn assert_standardized(X: &Array2<f64>) {
        for column in X.axis_iter(Axis(1)) {
            let (m, var, _) = column_stats(column);
            assert!(m.abs() < EPS, "mean {m}");
            assert!((var.sqrt() - 1.0).abs() < EPS, "std {}", var.sqrt());
        }
    }

    #[test]
    fn test_fit_transform_zero_mean_unit_std() {
        let X = array![[10.0, 20.0], [20.0, 40.0], [60.0, -5.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&X).unwrap();
        assert_eq!(scaled.dim(), (3, 2));
        assert_standardized(&scaled);
        assert_eq!(scaler.n_samples_seen(), 3);
    }

    #[test]
    fn test_two_rows_become_plus_minus_one() {
        let X = array![[10.0, 20.0], [20.0, 40.0]];
        let scaled = StandardScaler::new().fit_transform(&X).unwrap();
        assert_eq!(scaled, array![[-1.0, -1.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_single_row_becomes_zero() {
        let X = array![[30.0, 60.0]];
        let scaled = StandardScaler::new().fit_transform(&X).unwrap();
        assert_eq!(scaled, array![[0.0, 0.0]]);
    }

    #[test]
    fn test_zero_variance_fail_policy() {
        let X = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let mut scaler = StandardScaler::with_policy(ZeroVariancePolicy::Fail);
        let err = scaler.fit(&X).unwrap_err();
        assert!(matches!(err, LoaderError::ZeroVariance { column: 1 }));
        assert!(!scaler.is_fitted());
    }

    #[test]
    fn test_nan_ignored_in_stats() {
        let X = array![[1.0], [f64::NAN], [3.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&X).unwrap();
        assert_eq!(scaler.mean().unwrap()[0], 2.0);
        assert_eq!(scaled[[0, 0]], -1.0);
        assert!(scaled[[1, 0]].is_nan());
        assert_eq!(scaled[[2, 0]], 1.0);
    }

    #[test]
    fn test_transform_requires_fit() {
        let err = StandardScaler::new().transform(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, LoaderError::NotFitted));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = scaler.transform(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, LoaderError::ShapeMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_empty_fit() {
        let err = StandardScaler::new().fit(&Array2::zeros((0, 3))).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyTable(_)));
    }

    #[test]
    fn test_inverse_transform_restores_input() {
        let X = array![[1.5, -2.0], [4.0, 8.0], [0.5, 3.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&X).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();
        for (a, b) in restored.iter().zip(X.iter()) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_state_serializes() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0], [3.0]]).unwrap();
        let json = serde_json::to_string(&scaler).unwrap();
        let back: StandardScaler = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scaler);
    }

    #[test]
    fn test_long_constant_column_is_zero_variance() {
        for n in [1_000, 10_000, 100_000] {
            let X = Array2::from_elem((n, 1), 0.1);
            let mut scaler = StandardScaler::new();
            let scaled = scaler.fit_transform(&X).unwrap();
            assert_eq!(scaler.scale().unwrap()[0], 1.0, "n = {n}");
            assert!(scaled.iter().all(|v| v.abs() < 1e-12), "n = {n}");

            let err = StandardScaler::with_policy(ZeroVariancePolicy::Fail)
                .fit(&X)
                .unwrap_err();
            assert!(matches!(err, LoaderError::ZeroVariance { column: 0 }), "n = {n}");
        }
    }

    #[test]
    fn test_long_varying_column_is_standardized() {
        let X = Array2::from_shape_fn((5_000, 1), |(i, _)| 0.1 + (i % 7) as f64);
        let scaled = StandardScaler::with_policy(ZeroVariancePolicy::Fail)
            .fit_transform(&X)
            .unwrap();
        assert_standardized(&scaled);
    }
}
