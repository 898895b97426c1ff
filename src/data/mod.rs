/// Чтение исходных таблиц

pub mod csv_table;

pub use csv_table::RawTable;
