/// Типы данных загрузчика

use std::fmt;

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::preprocessing::StandardScaler;

/// Идентификатор файла внутри сплита: `PR_PF_<id>.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SplitId {
    Int(i64),
    Float(f64),
    Name(String),
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitId::Int(v) => write!(f, "{}", v),
            SplitId::Name(s) => f.write_str(s),
            SplitId::Float(v) => {
                if v.is_nan() {
                    f.write_str("nan")
                } else if v.is_infinite() {
                    f.write_str(if *v > 0.0 { "inf" } else { "-inf" })
                } else {
                    f.write_str(&float_repr(*v))
                }
            }
        }
    }
}

/// Запись float как в именах файлов сплитов: `1.0`, `0.25`, `1e-05`, `1e+16`.
/// Экспонента при порядке < -4 или >= 16.
fn float_repr(v: f64) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sci = format!("{:e}", v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= 16 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

impl From<i64> for SplitId {
    fn from(v: i64) -> Self {
        SplitId::Int(v)
    }
}

impl From<i32> for SplitId {
    fn from(v: i32) -> Self {
        SplitId::Int(v as i64)
    }
}

impl From<u32> for SplitId {
    fn from(v: u32) -> Self {
        SplitId::Int(v as i64)
    }
}

impl From<u64> for SplitId {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(SplitId::Int)
            .unwrap_or_else(|_| SplitId::Name(v.to_string()))
    }
}

impl From<usize> for SplitId {
    fn from(v: usize) -> Self {
        i64::try_from(v)
            .map(SplitId::Int)
            .unwrap_or_else(|_| SplitId::Name(v.to_string()))
    }
}

impl From<f64> for SplitId {
    fn from(v: f64) -> Self {
        SplitId::Float(v)
    }
}

impl From<f32> for SplitId {
    fn from(v: f32) -> Self {
        // через строку, чтобы 0.1f32 не превратился в 0.10000000149011612
        v.to_string()
            .parse::<f64>()
            .map(SplitId::Float)
            .unwrap_or(SplitId::Float(v as f64))
    }
}

impl From<&str> for SplitId {
    fn from(v: &str) -> Self {
        SplitId::Name(v.to_string())
    }
}

impl From<String> for SplitId {
    fn from(v: String) -> Self {
        SplitId::Name(v)
    }
}

/// Числовая матрица признаков с именами колонок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Self {
        Self { columns, values }
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn column(&self, name: &str) -> Option<Array1<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.values.index_axis(Axis(1), idx).to_owned())
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }
}

/// Результат загрузки пары train/test
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: FeatureMatrix,
    pub test: FeatureMatrix,
    pub train_scaler: StandardScaler,
    pub test_scaler: StandardScaler,
}

impl TrainTestSplit {
    pub fn into_arrays(self) -> (Array2<f64>, Array2<f64>) {
        (self.train.values, self.test.values)
    }
}
