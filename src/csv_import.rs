use serde::Deserialize;
use uuid::Uuid;

use crate::types::NewSet;

/// One line of an import file. All columns arrive as text; validation and
/// parsing happen in [`parse_sets`].
#[derive(Debug, Deserialize)]
struct CsvSetRow {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    exercise_id: Option<String>,
    #[serde(default)]
    reps: Option<String>,
    #[serde(default)]
    weight_kg: Option<String>,
    #[serde(default)]
    rpe: Option<String>,
    #[serde(default)]
    partial_reps: Option<String>,
}

/// Parses CSV text with columns
/// `date, exercise_id, reps, weight_kg, rpe, partial_reps` into set insert
/// rows. Returns the valid rows and the number of rows that failed
/// (missing required fields or unparseable values); callers report only
/// the counts, never row detail. Imported sets are not tied to a workout.
pub fn parse_sets(text: &str) -> (Vec<NewSet>, usize) {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut failed = 0;
    for record in reader.deserialize::<CsvSetRow>() {
        match record.map(row_to_set) {
            Ok(Some(set)) => rows.push(set),
            _ => failed += 1,
        }
    }
    (rows, failed)
}

fn row_to_set(row: CsvSetRow) -> Option<NewSet> {
    let date = non_empty(row.date)?;
    let exercise_id = non_empty(row.exercise_id)?;
    let reps: i32 = non_empty(row.reps)?.parse().ok()?;
    let weight_kg: f64 = non_empty(row.weight_kg)?.parse().ok()?;

    // Optional columns: absent is fine, garbage is not.
    let rpe = match non_empty(row.rpe) {
        Some(value) => Some(value.parse::<f64>().ok()?),
        None => None,
    };
    let partial_reps = match non_empty(row.partial_reps) {
        Some(value) => Some(value.parse::<i32>().ok()?),
        None => None,
    };

    Some(NewSet {
        id: Uuid::new_v4().to_string(),
        workout_id: None,
        exercise_id,
        reps,
        partial_reps,
        weight_kg,
        rpe,
        created_at: date,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_rows_parse_with_optionals() {
        let text = "date,exercise_id,reps,weight_kg,rpe,partial_reps\n\
                    2026-08-04T00:00:00Z,bench,5,100,8,2\n\
                    2026-08-05T00:00:00Z,squat,8,140,,\n";
        let (rows, failed) = parse_sets(text);
        assert_eq!(failed, 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].exercise_id, "bench");
        assert_eq!(rows[0].reps, 5);
        assert_eq!(rows[0].rpe, Some(8.0));
        assert_eq!(rows[0].partial_reps, Some(2));
        assert_eq!(rows[1].rpe, None);
        assert_eq!(rows[1].partial_reps, None);
        assert!(rows[0].workout_id.is_none());
        assert_eq!(rows[0].created_at, "2026-08-04T00:00:00Z");
    }

    #[test]
    fn missing_required_fields_count_as_failed() {
        let text = "date,exercise_id,reps,weight_kg,rpe,partial_reps\n\
                    ,bench,5,100,,\n\
                    2026-08-04,,5,100,,\n\
                    2026-08-04,bench,,100,,\n\
                    2026-08-04,bench,5,,,\n\
                    2026-08-04,bench,5,100,,\n";
        let (rows, failed) = parse_sets(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(failed, 4);
    }

    #[test]
    fn unparseable_values_count_as_failed() {
        let text = "date,exercise_id,reps,weight_kg,rpe,partial_reps\n\
                    2026-08-04,bench,five,100,,\n\
                    2026-08-04,bench,5,heavy,,\n\
                    2026-08-04,bench,5,100,hard,\n";
        let (rows, failed) = parse_sets(text);
        assert!(rows.is_empty());
        assert_eq!(failed, 3);
    }

    #[test]
    fn empty_input_imports_nothing() {
        let (rows, failed) = parse_sets("");
        assert!(rows.is_empty());
        assert_eq!(failed, 0);
    }

    #[test]
    fn each_row_gets_its_own_id() {
        let text = "date,exercise_id,reps,weight_kg,rpe,partial_reps\n\
                    2026-08-04,bench,5,100,,\n\
                    2026-08-04,bench,5,100,,\n";
        let (rows, _) = parse_sets(text);
        assert_ne!(rows[0].id, rows[1].id);
    }
}
