//! Split loader - загрузка и стандартизация train/test сплитов PR_PF

pub mod config;
pub mod data;
pub mod error;
pub mod loader;
pub mod preprocessing;
pub mod types;

pub use config::{LoaderConfig, TestScaling, ZeroVariancePolicy};
pub use error::{LoaderError, Result};
pub use loader::{load_train_test, DataLoader, LabeledDataset};
pub use preprocessing::*;
pub use types::*;
