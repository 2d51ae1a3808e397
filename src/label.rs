//! YOLO label-line parsing.
//!
//! A label file holds one object per line:
//! `class_id x_center y_center width height`, whitespace separated, with
//! coordinates normalized to the image size.
//!
//! Two parsing policies exist. The renderer and summarizer treat any
//! malformed line as an error ([`parse_label_line`]), while the box
//! distribution scan simply drops lines it cannot use
//! ([`parse_label_line_lenient`]).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LabelscopeError;
use crate::geometry::NormalizedBox;

/// Number of fields on a detection label line.
pub const LABEL_FIELDS: usize = 5;

/// An object category identifier as written in label files.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Creates a new ClassId.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One parsed label line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRecord {
    pub class_id: ClassId,
    pub bbox: NormalizedBox,
}

/// Parse one label line, failing on anything that is not a detection row.
///
/// A blank line has zero fields and is rejected like any other short row.
/// The class id field is read as a number and truncated, so `3.0` and `3`
/// both yield class 3.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<LabelRecord, LabelscopeError> {
    let trimmed = line.trim();

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(LABEL_FIELDS + 1).collect();
    if tokens.len() != LABEL_FIELDS {
        let found = if tokens.len() > LABEL_FIELDS {
            "more".to_string()
        } else {
            tokens.len().to_string()
        };
        return Err(LabelscopeError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected {LABEL_FIELDS} fields, found {found}"),
        });
    }

    let raw_class = parse_f64_token(tokens[0], "class_id", file_path, line_num)?;
    let class_id = class_id_from_f64(raw_class).ok_or_else(|| LabelscopeError::LabelParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message: format!(
            "invalid class_id '{}'; expected non-negative integer",
            tokens[0]
        ),
    })?;

    let x_center = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let y_center = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let width = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let height = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(LabelRecord {
        class_id,
        bbox: NormalizedBox::new(x_center, y_center, width, height),
    })
}

/// Parse one label line, returning `None` for anything unusable.
///
/// Only the class id, width and height are needed for size statistics, so
/// the center fields are not validated beyond being present. Sizes whose
/// value or product is not finite cannot be binned and count as unusable.
pub fn parse_label_line_lenient(line: &str) -> Option<(ClassId, f64, f64)> {
    let tokens: Vec<&str> = line.split_whitespace().take(LABEL_FIELDS + 1).collect();
    if tokens.len() != LABEL_FIELDS {
        return None;
    }

    let class_id = tokens[0].parse::<u32>().ok().map(ClassId)?;
    let width = tokens[3].parse::<f64>().ok().filter(|v| v.is_finite())?;
    let height = tokens[4].parse::<f64>().ok().filter(|v| v.is_finite())?;
    if !(width * height).is_finite() {
        return None;
    }
    Some((class_id, width, height))
}

/// Read the leading class id of a label line for per-class tallies.
///
/// Only the first field is looked at. A blank line has no class id and is
/// an error.
pub fn parse_class_token(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<ClassId, LabelscopeError> {
    let Some(token) = line.split_whitespace().next() else {
        return Err(LabelscopeError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: "missing class_id".to_string(),
        });
    };

    token
        .parse::<u32>()
        .map(ClassId)
        .map_err(|_| LabelscopeError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid class_id '{token}'; expected non-negative integer"),
        })
}

/// Read and strictly parse a whole label file.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRecord>, LabelscopeError> {
    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        records.push(parse_label_line(line, path, line_idx + 1)?);
    }

    Ok(records)
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), LabelscopeError> {
    let _ = parse_label_line_lenient(input);
    let _ = parse_class_token(input, Path::new("<fuzz>"), 1);
    parse_label_line(input, Path::new("<fuzz>"), 1).map(|_| ())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, LabelscopeError> {
    raw.parse::<f64>()
        .map_err(|_| LabelscopeError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })
}

fn class_id_from_f64(value: f64) -> Option<ClassId> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < 0.0 || truncated > u32::MAX as f64 {
        return None;
    }
    Some(ClassId(truncated as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_label_line_accepts_valid_rows() {
        let parsed = parse_label_line("2 0.5 0.25 0.3 0.1", Path::new("a.txt"), 1)
            .expect("parse should succeed");

        assert_eq!(
            parsed,
            LabelRecord {
                class_id: ClassId(2),
                bbox: NormalizedBox::new(0.5, 0.25, 0.3, 0.1),
            }
        );
    }

    #[test]
    fn parse_label_line_truncates_float_class_ids() {
        let parsed = parse_label_line("3.0 0.5 0.5 0.1 0.1", Path::new("a.txt"), 1)
            .expect("parse should succeed");
        assert_eq!(parsed.class_id, ClassId(3));
    }

    #[test]
    fn parse_label_line_rejects_blank_rows() {
        for blank in ["", "   ", "\t"] {
            let err = parse_label_line(blank, Path::new("a.txt"), 2).unwrap_err();
            let message = err.to_string();
            assert!(matches!(err, LabelscopeError::LabelParse { line: 2, .. }));
            assert!(message.contains("found 0"), "{message}");
        }
    }

    #[test]
    fn parse_label_line_rejects_short_rows() {
        let err = parse_label_line("0 0.1 0.2 0.3", Path::new("a.txt"), 3).unwrap_err();
        assert!(matches!(err, LabelscopeError::LabelParse { line: 3, .. }));
    }

    #[test]
    fn parse_label_line_rejects_long_rows() {
        let err = parse_label_line("0 0.1 0.2 0.3 0.4 0.5", Path::new("a.txt"), 4).unwrap_err();
        assert!(matches!(err, LabelscopeError::LabelParse { .. }));
    }

    #[test]
    fn parse_label_line_rejects_non_numeric_fields() {
        let err = parse_label_line("0 0.1 abc 0.3 0.4", Path::new("a.txt"), 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("y_center"), "{message}");
    }

    #[test]
    fn parse_label_line_rejects_negative_class() {
        let err = parse_label_line("-1 0.1 0.2 0.3 0.4", Path::new("a.txt"), 1).unwrap_err();
        assert!(matches!(err, LabelscopeError::LabelParse { .. }));
    }

    #[test]
    fn lenient_parse_drops_wrong_field_counts() {
        assert_eq!(parse_label_line_lenient("0 0.5 0.5 0.2"), None);
        assert_eq!(parse_label_line_lenient("0 0.5 0.5 0.2 0.4 0.9"), None);
        assert_eq!(parse_label_line_lenient(""), None);
        assert_eq!(
            parse_label_line_lenient("1 0.5 0.5 0.2 0.4"),
            Some((ClassId(1), 0.2, 0.4))
        );
    }

    #[test]
    fn lenient_parse_drops_unparseable_fields() {
        assert_eq!(parse_label_line_lenient("x 0.5 0.5 0.2 0.4"), None);
        assert_eq!(parse_label_line_lenient("1 0.5 0.5 wide 0.4"), None);
        assert_eq!(parse_label_line_lenient("1 0.5 0.5 NaN 0.4"), None);
    }

    #[test]
    fn lenient_parse_drops_boxes_with_overflowing_area() {
        assert_eq!(parse_label_line_lenient("0 0.5 0.5 1e200 1e200"), None);
        assert_eq!(
            parse_label_line_lenient("0 0.5 0.5 1e100 1e100"),
            Some((ClassId(0), 1e100, 1e100))
        );
    }

    #[test]
    fn class_token_only_reads_first_field() {
        let id = parse_class_token("7 garbage", Path::new("a.txt"), 1).expect("parse");
        assert_eq!(id, ClassId(7));
        assert!(parse_class_token("1.5 0 0 0 0", Path::new("a.txt"), 1).is_err());
    }

    #[test]
    fn class_token_rejects_blank_lines() {
        let err = parse_class_token("  ", Path::new("a.txt"), 4).unwrap_err();
        assert!(matches!(err, LabelscopeError::LabelParse { line: 4, .. }));
        assert!(err.to_string().contains("missing class_id"));
    }

    #[test]
    fn read_label_file_rejects_blank_lines() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("img.txt");
        fs::write(&path, "0 0.5 0.5 0.1 0.1\n\n").expect("write labels");

        let err = read_label_file(&path).unwrap_err();
        assert!(matches!(err, LabelscopeError::LabelParse { line: 2, .. }));
    }

    #[cfg(feature = "fuzzing")]
    #[test]
    fn fuzz_entry_runs_strict_parser_on_float_class_ids() {
        assert!(fuzz_parse_label_line("1.0 0.5 0.5 0.1 0.1").is_ok());
        assert!(fuzz_parse_label_line("1.0 0.5 0.5").is_err());
    }

    #[test]
    fn read_label_file_accepts_trailing_newline() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("img.txt");
        fs::write(&path, "0 0.5 0.5 0.1 0.1\n1 0.2 0.2 0.1 0.1\n").expect("write labels");

        assert_eq!(read_label_file(&path).expect("read").len(), 2);
    }

    #[test]
    fn read_label_file_reports_line_numbers() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("img.txt");
        fs::write(&path, "0 0.5 0.5 0.1 0.1\n2 0.5 0.5 0.1 0.1\n1 0.5 0.5\n").expect("write labels");

        let err = read_label_file(&path).unwrap_err();
        assert!(matches!(err, LabelscopeError::LabelParse { line: 3, .. }));
    }
}
