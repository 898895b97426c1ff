//! CSV -> таблица строковых ячеек

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::error::{LoaderError, Result};

/// Таблица как она лежит в файле: заголовок и строки без приведения типов
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoaderError::from_io(e, path))?;
        let table = Self::from_reader(BufReader::new(file), path)?;

        tracing::debug!(
            "Read {}: {} rows, {} columns",
            path.display(),
            table.nrows(),
            table.headers.len()
        );
        Ok(table)
    }

    /// `path` используется только в сообщениях об ошибках
    pub fn from_reader<R: Read>(reader: R, path: impl Into<PathBuf>) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = csv_reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.into(),
            headers,
            rows,
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Ячейки одной колонки сверху вниз
    pub fn column_cells<'a>(&'a self, idx: usize) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |r| r.get(idx).unwrap_or(""))
    }
}
