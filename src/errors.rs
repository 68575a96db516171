use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileParseError {
    #[error("no file name")]
    NoFileName,
    #[error("invalid file name")]
    InvalidFileName,
    #[error("no file extension")]
    NoFileExtension,
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("table dimensions do not match")]
    DimensionsMismatch,
    #[error("column names do not match")]
    ColumnNamesMismatch,
    #[error("unequal column lengths")]
    UnequalColumnLengths,
    #[error("column name {0} not found")]
    ColumnNameNotFound(String),
}

#[derive(Error, Debug)]
pub enum ReadTableError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("csv error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("parse float error in column {column} on line {line}: {source}")]
    ParseFloatError {
        column: String,
        line: usize,
        source: std::num::ParseFloatError,
    },
    #[error("missing header row")]
    MissingHeader,
    #[error("table error: {0}")]
    TableError(#[from] TableError),
}

#[derive(Error, Debug)]
pub enum FitError {
    #[error("empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },
    #[error("dimension mismatch: y has {y_len} rows, x has {x_rows}")]
    DimensionMismatch { y_len: usize, x_rows: usize },
    #[error("insufficient data: {rows} rows, {cols} predictors (need rows > predictors + 1)")]
    InsufficientData { rows: usize, cols: usize },
    #[error("non-finite value in {field} at row {row}")]
    NonFinite { field: &'static str, row: usize },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("file parse error: {0}")]
    FileParseError(#[from] FileParseError),
    #[error("read table error: {0}")]
    ReadTableError(#[from] ReadTableError),
    #[error("table error: {0}")]
    TableError(#[from] TableError),
    #[error("fit error: {0}")]
    FitError(#[from] FitError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
