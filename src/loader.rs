//! Загрузка пары train/test: чтение, удаление служебных колонок, стандартизация

use linfa::DatasetBase;
use ndarray::{Array1, Array2};

use crate::config::{LoaderConfig, TestScaling};
use crate::data::RawTable;
use crate::error::{LoaderError, Result};
use crate::preprocessing::{FeatureExtractor, StandardScaler};
use crate::types::{FeatureMatrix, SplitId, TrainTestSplit};

/// Стандартизованные признаки + метки из колонки `Label`
pub type LabeledDataset = DatasetBase<Array2<f64>, Array1<f64>>;

#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: LoaderConfig,
}

impl DataLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Обе матрицы вместе с именами колонок и обученными scaler'ами
    pub fn load_split(&self, split_type: &str, id: impl Into<SplitId>) -> Result<TrainTestSplit> {
        let id = id.into();
        let (train_table, test_table) = self.read_tables(split_type, &id)?;
        let split = self.split_from_tables(&train_table, &test_table)?;

        tracing::info!(
            "Loaded {}split/{}: train {:?}, test {:?}",
            split_type,
            id,
            split.train.values.dim(),
            split.test.values.dim()
        );
        Ok(split)
    }

    pub fn load_train_test(
        &self,
        split_type: &str,
        id: impl Into<SplitId>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        Ok(self.load_split(split_type, id)?.into_arrays())
    }

    /// То же, что `load_split`, но в виде датасетов linfa с метками.
    /// Метки и признаки берутся из одного прочтения файла.
    pub fn load_labeled(
        &self,
        split_type: &str,
        id: impl Into<SplitId>,
    ) -> Result<(LabeledDataset, LabeledDataset)> {
        let id = id.into();
        let (train_table, test_table) = self.read_tables(split_type, &id)?;

        let train_labels = FeatureExtractor::labels(&train_table, &self.config.label_column)?;
        let test_labels = FeatureExtractor::labels(&test_table, &self.config.label_column)?;
        let split = self.split_from_tables(&train_table, &test_table)?;

        tracing::info!(
            "Loaded labeled {}split/{}: train {:?}, test {:?}",
            split_type,
            id,
            split.train.values.dim(),
            split.test.values.dim()
        );

        let train = DatasetBase::new(split.train.values, train_labels)
            .with_feature_names(split.train.columns);
        let test = DatasetBase::new(split.test.values, test_labels)
            .with_feature_names(split.test.columns);
        Ok((train, test))
    }

    fn read_tables(&self, split_type: &str, id: &SplitId) -> Result<(RawTable, RawTable)> {
        let train_path = self.config.train_path(split_type, id);
        let test_path = self.config.test_path(split_type, id);
        tracing::debug!(
            "Reading split files {} and {}",
            train_path.display(),
            test_path.display()
        );

        let train = RawTable::from_path(&train_path)?;
        let test = RawTable::from_path(&test_path)?;
        Ok((train, test))
    }

    fn split_from_tables(&self, train_table: &RawTable, test_table: &RawTable) -> Result<TrainTestSplit> {
        let train = self.extract(train_table)?;
        let test = self.extract(test_table)?;
        if train.columns != test.columns {
            tracing::warn!(
                "Feature columns differ between train ({:?}) and test ({:?})",
                train.columns,
                test.columns
            );
        }

        let mut train_scaler = StandardScaler::with_policy(self.config.zero_variance);
        let train_values = train_scaler.fit_transform(&train.values)?;

        let (test_values, test_scaler) = match self.config.test_scaling {
            TestScaling::Independent => {
                let mut scaler = StandardScaler::with_policy(self.config.zero_variance);
                let values = scaler.fit_transform(&test.values)?;
                (values, scaler)
            }
            TestScaling::TrainStatistics => {
                (train_scaler.transform(&test.values)?, train_scaler.clone())
            }
        };

        Ok(TrainTestSplit {
            train: FeatureMatrix::new(train.columns, train_values),
            test: FeatureMatrix::new(test.columns, test_values),
            train_scaler,
            test_scaler,
        })
    }

    fn extract(&self, table: &RawTable) -> Result<FeatureMatrix> {
        let features = FeatureExtractor::extract(table, &self.config.drop_columns)?;
        if features.nrows() == 0 {
            return Err(LoaderError::EmptyTable(table.path.display().to_string()));
        }
        Ok(features)
    }
}

/// Загрузка из `./data` с настройками по умолчанию
pub fn load_train_test(
    split_type: &str,
    id: impl Into<SplitId>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    DataLoader::default().load_train_test(split_type, id)
}
