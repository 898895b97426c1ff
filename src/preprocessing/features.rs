//! Извлечение матрицы признаков из таблицы

use ndarray::{Array1, Array2};

use crate::data::RawTable;
use crate::error::{LoaderError, Result};
use crate::types::FeatureMatrix;

const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Убирает колонки `drop` и приводит остальные к f64.
    /// Все колонки из `drop` обязаны присутствовать.
    pub fn extract(table: &RawTable, drop: &[String]) -> Result<FeatureMatrix> {
        let missing: Vec<String> = drop
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns {
                path: table.path.clone(),
                columns: missing,
            });
        }

        let keep: Vec<usize> = (0..table.headers.len())
            .filter(|&i| !drop.contains(&table.headers[i]))
            .collect();
        if keep.is_empty() {
            return Err(LoaderError::NoFeatures {
                path: table.path.clone(),
            });
        }

        let mut values = Array2::zeros((table.nrows(), keep.len()));
        for (row_idx, record) in table.rows.iter().enumerate() {
            for (j, &col) in keep.iter().enumerate() {
                let cell = record.get(col).unwrap_or("");
                values[[row_idx, j]] = parse_cell(cell).ok_or_else(|| LoaderError::NonNumeric {
                    path: table.path.clone(),
                    row: row_idx,
                    column: table.headers[col].clone(),
                    value: cell.to_string(),
                })?;
            }
        }

        let columns = keep.iter().map(|&i| table.headers[i].clone()).collect();
        Ok(FeatureMatrix::new(columns, values))
    }

    /// Целевая колонка как вектор
    pub fn labels(table: &RawTable, label_column: &str) -> Result<Array1<f64>> {
        let idx = table
            .column_index(label_column)
            .ok_or_else(|| LoaderError::MissingColumns {
                path: table.path.clone(),
                columns: vec![label_column.to_string()],
            })?;

        table
            .column_cells(idx)
            .enumerate()
            .map(|(row, cell)| {
                parse_cell(cell).ok_or_else(|| LoaderError::NonNumeric {
                    path: table.path.clone(),
                    row,
                    column: label_column.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }
}

/// Пустые ячейки и NA-токены -> NaN, true/false -> 1/0
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if NA_TOKENS.contains(&cell) {
        return Some(f64::NAN);
    }
    if cell.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    cell.parse::<f64>().ok()
}
