//! Record and dataset types plus the JSONL parser.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

/// A labeled example: the task, its entity references and the canonical answer.
///
/// All three fields are mandatory; a line missing any of them (or carrying a
/// non-string value) fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Names the task, e.g. "Get product details for this mobile phone".
    pub instruction: String,
    /// Entity references, e.g. "Product Name: Widget".
    pub input: String,
    /// The pre-authored response.
    pub output: String,
}

impl Record {
    /// Create a new record.
    pub fn new<I, N, O>(instruction: I, input: N, output: O) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        O: Into<String>,
    {
        Record {
            instruction: instruction.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    /// The text that is vectorized for this record: instruction and input,
    /// never the output.
    pub fn document_text(&self) -> String {
        format!("{} {}", self.instruction, self.input)
    }
}

/// An ordered, immutable sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Iterate records in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// All records as a slice.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Vectorizable text of every record, aligned with dataset positions.
    pub fn documents(&self) -> Vec<String> {
        self.records.iter().map(Record::document_text).collect()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset { records }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Dataset {
            records: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Dataset {
    type Output = Record;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// How the JSONL parser treats a line that is not a valid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// The first malformed line aborts the whole load.
    Strict,
    /// Malformed lines are logged and skipped.
    Lenient,
}

/// Parse newline-delimited JSON records. Blank lines are ignored.
pub fn parse_jsonl(content: &str, policy: ParsePolicy) -> Result<Dataset> {
    let mut records = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Record>(line) {
            Ok(record) => records.push(record),
            Err(e) => match policy {
                ParsePolicy::Strict => {
                    return Err(ParleyError::malformed_record(line_num + 1, e.to_string()));
                }
                ParsePolicy::Lenient => {
                    log::warn!("Skipping malformed record on line {}: {}", line_num + 1, e);
                }
            },
        }
    }

    Ok(Dataset::from(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"instruction": "Get product details for this mobile phone", "input": "Product Name: Widget", "output": "Widget info"}

{"instruction": "Check user profile", "input": "User ID: U-1", "output": "Profile of U-1"}
"#;

    #[test]
    fn test_parse_jsonl() {
        let dataset = parse_jsonl(SAMPLE, ParsePolicy::Strict).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[0].input, "Product Name: Widget");
        assert_eq!(dataset[1].output, "Profile of U-1");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let content = "{\"instruction\": \"a\", \"input\": \"b\", \"output\": \"c\"}\n{\"instruction\": \"x\", \"input\": \"y\"}\n";

        let err = parse_jsonl(content, ParsePolicy::Strict).unwrap_err();
        match err {
            ParleyError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("output"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let dataset = parse_jsonl(content, ParsePolicy::Lenient).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset[0].instruction, "a");
    }

    #[test]
    fn test_non_string_field_is_malformed() {
        let content = r#"{"instruction": "a", "input": 5, "output": "c"}"#;
        assert!(parse_jsonl(content, ParsePolicy::Strict).is_err());
        assert!(parse_jsonl(content, ParsePolicy::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_jsonl("", ParsePolicy::Strict).unwrap().is_empty());
        assert!(parse_jsonl("\n  \n", ParsePolicy::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_document_text_excludes_output() {
        let record = Record::new("Get order details", "Order ID: 42", "Shipped");
        assert_eq!(record.document_text(), "Get order details Order ID: 42");
    }
}
