use std::{path::PathBuf, str::FromStr};

use crate::{FileParseError, ReadTableError, Table};

#[derive(Clone, Debug, PartialEq)]
pub struct File {
    path: PathBuf,
    file_type: FileType,
    gz: bool,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, file_type: FileType, gz: bool) -> Self {
        Self {
            path: path.into(),
            file_type,
            gz,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    #[inline(always)]
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    #[inline(always)]
    pub fn gz(&self) -> bool {
        self.gz
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FileParseError> {
        let path = path.into();
        let extension = path
            .file_name()
            .ok_or(FileParseError::NoFileName)?
            .to_str()
            .ok_or(FileParseError::InvalidFileName)?
            .split('.')
            .filter(|x| !x.is_empty())
            .collect::<Vec<&str>>();
        if extension.len() < 2 {
            return Err(FileParseError::NoFileExtension);
        }
        let gz = extension[extension.len() - 1] == "gz";
        let extension = extension[extension.len() - if gz { 2 } else { 1 }];
        let file_type = FileType::from_str(extension)?;
        Ok(Self {
            path,
            file_type,
            gz,
        })
    }

    pub fn read(&self) -> Result<Table, ReadTableError> {
        let file = std::fs::File::open(&self.path)?;
        if self.gz {
            let decoder = flate2::read::GzDecoder::new(file);
            self.read_from_reader(decoder)
        } else {
            self.read_from_reader(file)
        }
    }

    pub fn read_from_reader(&self, reader: impl std::io::Read) -> Result<Table, ReadTableError> {
        Ok(match self.file_type {
            FileType::Csv => Self::read_delimited(reader, b',')?,
            FileType::Tsv => Self::read_delimited(reader, b'\t')?,
            FileType::Json => serde_json::from_reader(reader)?,
        })
    }

    fn read_delimited(reader: impl std::io::Read, sep: u8) -> Result<Table, ReadTableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(sep)
            .has_headers(true)
            .from_reader(reader);
        let colnames = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();
        if colnames.is_empty() {
            return Err(ReadTableError::MissingHeader);
        }
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); colnames.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for (col, field) in record.iter().enumerate() {
                let field = field.trim();
                let value = if field == "NA" || field.is_empty() {
                    f64::NAN
                } else {
                    field
                        .parse()
                        .map_err(|source| ReadTableError::ParseFloatError {
                            column: colnames[col].clone(),
                            line: row + 2,
                            source,
                        })?
                };
                columns[col].push(value);
            }
        }
        Ok(Table::from_columns(colnames, columns)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Comma-separated values, row major.
    /// Expects the first row to be the column names.
    Csv,
    /// Tab-separated values, row major.
    /// Expects the first row to be the column names.
    Tsv,
    /// Serialized Table type.
    Json,
}

impl FromStr for FileType {
    type Err = FileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "csv" => Self::Csv,
            "tsv" => Self::Tsv,
            "json" => Self::Json,
            _ => return Err(FileParseError::UnsupportedFileType(s.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_log::test;

    use super::*;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.csv", b"a,b\n1,4\n2,5\n3,6\n");
        let table = File::from_path(&path).unwrap().read().unwrap();
        assert_eq!(
            table,
            Table::from_columns(
                names(&["a", "b"]),
                vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]
            )
            .unwrap()
        );
    }

    #[test]
    fn test_csv_quoted_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.csv", b"\"a, a\",b\n1,2\n");
        let table = File::from_path(&path).unwrap().read().unwrap();
        assert_eq!(table.colnames(), ["a, a", "b"]);
        assert_eq!(table.column("a, a").unwrap(), [1.0]);
    }

    #[test]
    fn test_csv_na() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.csv", b"a,b\n1,NA\n2,\n");
        let table = File::from_path(&path).unwrap().read().unwrap();
        assert_eq!(table.column("a").unwrap(), [1.0, 2.0]);
        assert!(table.column("b").unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.tsv", b"a\tb\n1\t4\n2\t5\n");
        let table = File::from_path(&path).unwrap().read().unwrap();
        assert_eq!(
            table,
            Table::from_columns(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![4.0, 5.0]])
                .unwrap()
        );
    }

    #[test]
    fn test_json() {
        let dir = tempfile::tempdir().unwrap();
        let table =
            Table::from_columns(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![4.0, 5.0]])
                .unwrap();
        let path = write_fixture(
            &dir,
            "test.json",
            serde_json::to_string(&table).unwrap().as_bytes(),
        );
        let table2 = File::from_path(&path).unwrap().read().unwrap();
        assert_eq!(table, table2);
    }

    #[test]
    fn test_gz() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"a,b\n1,4\n2,5\n").unwrap();
        let path = write_fixture(&dir, "test.csv.gz", &encoder.finish().unwrap());
        let file = File::from_path(&path).unwrap();
        assert!(file.gz());
        let table = file.read().unwrap();
        assert_eq!(
            table,
            Table::from_columns(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![4.0, 5.0]])
                .unwrap()
        );
    }

    #[test]
    fn test_from_path() {
        let file = File::from_path("tests/test.csv").unwrap();
        assert_eq!(file.file_type(), FileType::Csv);
        let file = File::from_path("tests/test.tsv").unwrap();
        assert_eq!(file.file_type(), FileType::Tsv);
        let file = File::from_path("tests/test.json").unwrap();
        assert_eq!(file.file_type(), FileType::Json);
        let file = File::from_path("tests/test.csv.gz").unwrap();
        assert_eq!(file.file_type(), FileType::Csv);
        assert!(file.gz());
    }

    #[test]
    fn test_from_path_invalid() {
        assert!(matches!(
            File::from_path("tests/test").unwrap_err(),
            FileParseError::NoFileExtension
        ));
        assert!(matches!(
            File::from_path("tests/test.").unwrap_err(),
            FileParseError::NoFileExtension
        ));
        assert!(matches!(
            File::from_path("tests/test.invalid").unwrap_err(),
            FileParseError::UnsupportedFileType(_)
        ));
    }

    #[test]
    fn test_file_not_found() {
        let file = File::new("tests/does_not_exist.csv", FileType::Csv, false);
        assert!(matches!(file.read(), Err(ReadTableError::IoError(_))));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.csv", b"");
        assert!(matches!(
            File::from_path(&path).unwrap().read(),
            Err(ReadTableError::MissingHeader)
        ));
    }

    #[test]
    fn test_ragged_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.csv", b"a,b\n1\n");
        assert!(matches!(
            File::from_path(&path).unwrap().read(),
            Err(ReadTableError::CsvError(_))
        ));
    }

    #[test]
    fn test_bad_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.csv", b"a,b\n1,2\n3,oops\n");
        assert!(matches!(
            File::from_path(&path).unwrap().read(),
            Err(ReadTableError::ParseFloatError { column, line, .. })
                if column == "b" && line == 3
        ));
    }
}
