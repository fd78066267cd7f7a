use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::brackets::{BracketConfigError, FederalBracket, validate_brackets};

/// Errors that can occur when loading a federal bracket table.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Cannot read bracket file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid bracket table: {0}")]
    InvalidTable(#[from] BracketConfigError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the bracket CSV file.
///
/// - `min_income`: lower bound of the bracket (exclusive)
/// - `max_income`: upper bound (inclusive); empty for the top bracket
/// - `base_tax`: tax owed on income up to `min_income`
/// - `rate`: marginal rate as a decimal (e.g. `0.22`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

impl From<BracketRecord> for FederalBracket {
    fn from(record: BracketRecord) -> Self {
        FederalBracket {
            min_income: record.min_income,
            max_income: record.max_income,
            base_tax: record.base_tax,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for federal bracket tables stored as CSV.
///
/// ```csv
/// min_income,max_income,base_tax,rate
/// 0,11925,0,0.10
/// 11925,48475,1192.50,0.12
/// 48475,,5578.50,0.22
/// ```
pub struct BracketLoader;

impl BracketLoader {
    /// Parse and validate a bracket table from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<FederalBracket>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut brackets = Vec::new();
        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            brackets.push(FederalBracket::from(record));
        }

        validate_brackets(&brackets)?;
        Ok(brackets)
    }

    /// Parse the bracket table stored at `path`.
    pub fn load_from_path(path: &Path) -> Result<Vec<FederalBracket>, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TWO_BRACKETS: &str = "\
min_income,max_income,base_tax,rate
0,10000,0,0.10
10000,,1000,0.20
";

    #[test]
    fn parses_bounded_and_unbounded_rows() {
        let brackets = BracketLoader::parse(TWO_BRACKETS.as_bytes()).unwrap();

        assert_eq!(
            brackets,
            vec![
                FederalBracket {
                    min_income: dec!(0),
                    max_income: Some(dec!(10000)),
                    base_tax: dec!(0),
                    rate: dec!(0.10),
                },
                FederalBracket {
                    min_income: dec!(10000),
                    max_income: None,
                    base_tax: dec!(1000),
                    rate: dec!(0.20),
                },
            ]
        );
    }

    #[test]
    fn trims_whitespace_around_fields() {
        let csv = "min_income, max_income, base_tax, rate\n0 , , 0 , 0.10\n";

        let brackets = BracketLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(brackets[0].max_income, None);
        assert_eq!(brackets[0].rate, dec!(0.10));
    }

    #[test]
    fn malformed_amount_is_a_csv_error() {
        let csv = "min_income,max_income,base_tax,rate\nzero,,0,0.10\n";

        let result = BracketLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketLoaderError::CsvParse(_))));
    }

    #[test]
    fn header_only_file_is_an_invalid_table() {
        let result = BracketLoader::parse("min_income,max_income,base_tax,rate\n".as_bytes());

        assert!(matches!(
            result,
            Err(BracketLoaderError::InvalidTable(BracketConfigError::NoBrackets))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BracketLoader::load_from_path(Path::new("/nonexistent/brackets.csv")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/brackets.csv"));
    }
}
