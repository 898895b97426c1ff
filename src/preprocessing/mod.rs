/// Модуль предобработки данных

pub mod features;
pub mod normalization;

pub use features::FeatureExtractor;
pub use normalization::StandardScaler;
