use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 8;

/// One submission of the retrieval form.
///
/// Serialized in wire order: `rollStart`, `rollEnd`, `semester`, `instituteCode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub roll_start: u32,
    pub roll_end: u32,
    pub semester: u8,
    /// Institute code with admission year, e.g. `0818IT22`.
    pub institute_code: String,
}

impl FormInput {
    pub fn new(
        institute_code: impl Into<String>,
        roll_start: u32,
        roll_end: u32,
        semester: u8,
    ) -> Self {
        Self {
            roll_start,
            roll_end,
            semester,
            institute_code: institute_code.into(),
        }
    }

    /// Number of roll numbers in the range; zero when the range is inverted.
    pub fn roll_count(&self) -> u64 {
        if self.roll_start > self.roll_end {
            return 0;
        }
        u64::from(self.roll_end) - u64::from(self.roll_start) + 1
    }
}

impl Validate for FormInput {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("instituteCode", &self.institute_code)?;
        validate_range("semester", self.semester, MIN_SEMESTER, MAX_SEMESTER)?;
        if self.roll_start > self.roll_end {
            return Err(crate::utils::error::AppError::ValidationError {
                message: format!(
                    "rollStart ({}) must not be greater than rollEnd ({})",
                    self.roll_start, self.roll_end
                ),
            });
        }
        Ok(())
    }
}

/// A row keyed by column name, in column order.
///
/// Parsed CSV rows only hold strings; rows coming back from the analysis
/// service hold whatever JSON the service produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

/// Body of an analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest<'a> {
    pub data: &'a [Record],
    pub prompt: &'a str,
}

/// Rows returned by the analysis service, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    pub rows: Vec<Record>,
}

impl AnalysisResult {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Column names, taken from the first row.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_input_wire_format() {
        let input = FormInput::new("0818IT22", 1001, 1010, 5);
        let body = serde_json::to_string(&input).unwrap();

        assert_eq!(
            body,
            r#"{"rollStart":1001,"rollEnd":1010,"semester":5,"instituteCode":"0818IT22"}"#
        );
    }

    #[test]
    fn test_form_input_validation() {
        assert!(FormInput::new("0818IT22", 1001, 1010, 1).validate().is_ok());
        assert!(FormInput::new("0818IT22", 1001, 1001, 8).validate().is_ok());
        assert!(FormInput::new("0818IT22", 1001, 1010, 0).validate().is_err());
        assert!(FormInput::new("0818IT22", 1001, 1010, 9).validate().is_err());
        assert!(FormInput::new("   ", 1001, 1010, 3).validate().is_err());
        assert!(FormInput::new("0818IT22", 1010, 1001, 3).validate().is_err());
    }

    #[test]
    fn test_roll_count() {
        assert_eq!(FormInput::new("0818IT22", 1001, 1010, 5).roll_count(), 10);
        assert_eq!(FormInput::new("0818IT22", 1001, 1001, 5).roll_count(), 1);
        assert_eq!(FormInput::new("0818IT22", 1010, 1001, 5).roll_count(), 0);
    }

    #[test]
    fn test_roll_count_full_range() {
        let input = FormInput::new("0818IT22", 0, u32::MAX, 1);

        assert!(input.validate().is_ok());
        assert_eq!(input.roll_count(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_analysis_result_columns_follow_first_row() {
        let result: AnalysisResult = serde_json::from_value(json!([
            {"name": "Asha", "marks": 91, "grade": "A"},
            {"name": "Ravi", "marks": 78}
        ]))
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.columns(), vec!["name", "marks", "grade"]);
    }

    #[test]
    fn test_analysis_request_body() {
        let mut row = Record::new();
        row.insert("name", "Asha");
        row.insert("marks", "91");
        let rows = vec![row];

        let request = AnalysisRequest {
            data: &rows,
            prompt: "Find top 5 performers",
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"data": [{"name": "Asha", "marks": "91"}], "prompt": "Find top 5 performers"})
        );
    }
}
