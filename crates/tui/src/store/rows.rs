//! Converting between courses and sheet rows.
use coursedir_client::course::{column, ColumnKind, LearningCenterCourse, CSV_COLUMNS, TAG_SEPARATOR};
use serde_json::{json, Map, Value};
use sheet::Row;

/// The sheet row for a course, with a cell for each of [`CSV_COLUMNS`].
pub fn course_to_row(course: &LearningCenterCourse) -> serde_json::Result<Row> {
    let value = serde_json::to_value(course)?;
    Ok(CSV_COLUMNS
        .iter()
        .map(|c| (c.key.to_string(), cell_text(value.get(c.key))))
        .collect())
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| cell_text(Some(i)))
            .collect::<Vec<_>>()
            .join(&TAG_SEPARATOR.to_string()),
        Some(v) => v.to_string(),
    }
}

/// Build a create input from an imported row.
///
/// Nothing is validated: empty cells are left out, and number and flag cells are converted
/// only when they can be. Anything else goes to the backend as text, to be accepted or
/// refused there. Rows without a school are put in `center_id`.
pub fn row_to_input(row: &Row, center_id: &str) -> Value {
    let mut input = Map::new();
    for (key, text) in row {
        let text = text.trim();
        if key.is_empty() || text.is_empty() {
            continue;
        }

        let kind = column(key).map(|c| c.kind).unwrap_or(ColumnKind::Text);
        input.insert(key.clone(), cell_value(kind, text));
    }

    input
        .entry("learningCenterId")
        .or_insert_with(|| json!(center_id));
    input.entry("isDeleted").or_insert(json!(false));

    Value::Object(input)
}

fn cell_value(kind: ColumnKind, text: &str) -> Value {
    match kind {
        ColumnKind::Text => json!(text),
        ColumnKind::Number => {
            if let Ok(n) = text.parse::<i64>() {
                json!(n)
            } else if let Ok(f) = text.parse::<f64>() {
                json!(f)
            } else {
                json!(text)
            }
        }
        ColumnKind::Flag => match text.to_lowercase().as_str() {
            "true" | "1" | "yes" => json!(true),
            "false" | "0" | "no" => json!(false),
            _ => json!(text),
        },
        ColumnKind::Tags => Value::Array(
            text.split(TAG_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| json!(t))
                .collect(),
        ),
    }
}
