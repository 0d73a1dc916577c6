use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::Deserialize;

use stacker_api::{SparseRow, Value};

use crate::error::EngineError;

/// How a JSON line maps onto a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Objects → maps, arrays → arrays.
    #[default]
    Native,
    /// Top-level arrays → tuples.
    Tuple,
    /// Top-level `{"ncols", "indices", "values"}` objects → sparse rows.
    Sparse,
}

impl FromStr for Layout {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Layout::Native),
            "tuple" => Ok(Layout::Tuple),
            "sparse" => Ok(Layout::Sparse),
            other => Err(EngineError::Config(format!(
                "unknown layout '{other}', expected native, tuple or sparse"
            ))),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Native => "native",
            Layout::Tuple => "tuple",
            Layout::Sparse => "sparse",
        })
    }
}

impl Layout {
    /// Convert one parsed JSON document into a record.
    pub fn record(self, json: serde_json::Value) -> Result<Value, String> {
        match (self, json) {
            (Layout::Tuple, serde_json::Value::Array(fields)) => {
                Ok(Value::Tuple(fields.into_iter().map(Value::from).collect()))
            }
            (Layout::Tuple, other) => Err(format!("expected an array for a tuple record, got {other}")),
            (Layout::Sparse, json) => serde_json::from_value::<SparseRow>(json)
                .map(Value::Sparse)
                .map_err(|e| e.to_string()),
            (Layout::Native, json) => Ok(Value::from(json)),
        }
    }
}

/// Read JSON-lines records. Blank lines are skipped; line numbers in errors are 1-based.
pub fn read_records<R: BufRead>(reader: R, layout: Layout) -> Result<Vec<Value>, EngineError> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input_err = |detail: String| EngineError::Input { line: i + 1, detail };
        let json: serde_json::Value =
            serde_json::from_str(&line).map_err(|e| input_err(e.to_string()))?;
        records.push(layout.record(json).map_err(input_err)?);
    }
    tracing::debug!(records = records.len(), %layout, "read input records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layout_names() {
        assert_eq!("native".parse::<Layout>().unwrap(), Layout::Native);
        assert_eq!(" Tuple ".parse::<Layout>().unwrap(), Layout::Tuple);
        assert_eq!("sparse".parse::<Layout>().unwrap(), Layout::Sparse);
        assert!("csv".parse::<Layout>().is_err());
    }

    #[test]
    fn native_lines() {
        let input = "1\n\n{\"x\": 2}\n[1, 2]\n";
        let records = read_records(input.as_bytes(), Layout::Native).unwrap();
        assert_eq!(
            records,
            vec![
                Value::Int64(1),
                Value::map([("x", Value::Int64(2))]),
                Value::Array(vec![Value::Int64(1), Value::Int64(2)]),
            ]
        );
    }

    #[test]
    fn tuple_lines() {
        let records = read_records("[1, \"a\"]\n".as_bytes(), Layout::Tuple).unwrap();
        assert_eq!(records, vec![Value::Tuple(vec![Value::Int64(1), Value::from("a")])]);

        let err = read_records("[1]\n{\"a\": 1}\n".as_bytes(), Layout::Tuple).unwrap_err();
        assert!(matches!(err, EngineError::Input { line: 2, .. }));
    }

    #[test]
    fn sparse_lines() {
        let input = r#"{"ncols": 4, "indices": [1, 3], "values": [0.5, 2.0]}"#;
        let records = read_records(input.as_bytes(), Layout::Sparse).unwrap();
        let Value::Sparse(row) = &records[0] else {
            panic!("expected sparse row");
        };
        assert_eq!(row.ncols(), 4);
        assert_eq!(row.indices(), &[1, 3]);

        let bad = r#"{"ncols": 2, "indices": [5], "values": [1.0]}"#;
        assert!(read_records(bad.as_bytes(), Layout::Sparse).is_err());
    }

    #[test]
    fn malformed_json_reports_line() {
        let err = read_records("1\n{oops\n".as_bytes(), Layout::Native).unwrap_err();
        assert!(matches!(err, EngineError::Input { line: 2, .. }));
    }
}
