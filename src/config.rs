//! Настройки загрузчика

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};
use crate::types::SplitId;

/// Как масштабировать тестовую выборку
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestScaling {
    /// Отдельный scaler, обученный на самом тесте
    #[default]
    Independent,
    /// Статистики train применяются к test
    TrainStatistics,
}

/// Что делать с колонкой нулевой дисперсии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Масштаб 1.0, колонка становится нулевой
    #[default]
    UnitScale,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_drop_columns")]
    pub drop_columns: Vec<String>,
    #[serde(default = "default_label_column")]
    pub label_column: String,
    #[serde(default)]
    pub test_scaling: TestScaling,
    #[serde(default)]
    pub zero_variance: ZeroVariancePolicy,
}

fn default_base_dir() -> PathBuf { PathBuf::from("./data") }
fn default_file_prefix() -> String { "PR_PF_".to_string() }
fn default_extension() -> String { "csv".to_string() }
fn default_drop_columns() -> Vec<String> {
    vec!["ID".to_string(), "Date".to_string(), "Label".to_string()]
}
fn default_label_column() -> String { "Label".to_string() }

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            file_prefix: default_file_prefix(),
            extension: default_extension(),
            drop_columns: default_drop_columns(),
            label_column: default_label_column(),
            test_scaling: TestScaling::default(),
            zero_variance: ZeroVariancePolicy::default(),
        }
    }
}

impl LoaderConfig {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_test_scaling(mut self, test_scaling: TestScaling) -> Self {
        self.test_scaling = test_scaling;
        self
    }

    pub fn with_zero_variance(mut self, policy: ZeroVariancePolicy) -> Self {
        self.zero_variance = policy;
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoaderError::from_io(e, path))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `<base>/<split_type>split/<part>/<prefix><id>.<ext>`
    fn split_path(&self, split_type: &str, part: &str, id: &SplitId) -> PathBuf {
        self.base_dir
            .join(format!("{}split", split_type))
            .join(part)
            .join(format!("{}{}.{}", self.file_prefix, id, self.extension))
    }

    pub fn train_path(&self, split_type: &str, id: &SplitId) -> PathBuf {
        self.split_path(split_type, "train", id)
    }

    pub fn test_path(&self, split_type: &str, id: &SplitId) -> PathBuf {
        self.split_path(split_type, "test", id)
    }
}
