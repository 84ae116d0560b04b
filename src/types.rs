use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::selection::TargetDraft;
use crate::units::{self, Units};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

/// Profile row as stored in `profiles`. `default_units` is null until the
/// user has picked a preference.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub default_units: Option<Units>,
}

/// Catalog exercise. Read-only for the app.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub primary_equipment: Option<String>,
    #[serde(default)]
    pub movement_pattern: Option<String>,
}

/// The (id, name) pair screens pass around instead of the full catalog row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRef {
    pub id: String,
    pub name: String,
}

impl Exercise {
    pub fn to_ref(&self) -> ExerciseRef {
        ExerciseRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// One workout per user per calendar date. `scheduled_date` is the
/// canonical midnight-UTC timestamp string, compared by equality only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub scheduled_date: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct JoinedExercise {
    pub name: String,
}

/// `workout_exercises` row with the embedded exercise name
/// (`select=...,exercises(name)`).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TargetRow {
    pub exercise_id: String,
    #[serde(default)]
    pub target_reps_min: Option<i32>,
    #[serde(default)]
    pub target_reps_max: Option<i32>,
    #[serde(default)]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub target_rpe: Option<f64>,
    #[serde(default)]
    pub exercises: Option<JoinedExercise>,
}

impl TargetRow {
    pub fn exercise_name(&self) -> &str {
        self.exercises
            .as_ref()
            .map(|e| e.name.as_str())
            .unwrap_or(self.exercise_id.as_str())
    }

    /// One-line target description with the weight in the display unit.
    pub fn summary(&self, units: Units) -> String {
        let mut parts = Vec::new();
        match (self.target_reps_min, self.target_reps_max) {
            (None, None) => {}
            (Some(min), None) => parts.push(format!("{} reps", min)),
            (None, Some(max)) => parts.push(format!("{} reps", max)),
            (Some(min), Some(max)) => parts.push(format!("{}-{} reps", min, max)),
        }
        if let Some(kg) = self.target_weight {
            parts.push(format!(
                "{} {}",
                units::format_weight(kg, units),
                units.suffix()
            ));
        }
        if let Some(rpe) = self.target_rpe {
            parts.push(format!("RPE {}", format_rpe(rpe)));
        }
        if parts.is_empty() {
            "Inga mål".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// RPE values are whole numbers; drop the ".0" a numeric column gives back.
pub fn format_rpe(rpe: f64) -> String {
    if rpe.fract() == 0.0 {
        format!("{:.0}", rpe)
    } else {
        rpe.to_string()
    }
}

/// Insert shape for `workout_exercises`. `target_weight` is kilograms.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewTarget {
    pub workout_id: String,
    pub exercise_id: String,
    pub target_reps_min: Option<i32>,
    pub target_reps_max: Option<i32>,
    pub target_weight: Option<f64>,
    pub target_rpe: Option<f64>,
}

/// Logged set as stored in `sets`. `weight_kg` is always kilograms no
/// matter what unit the user types in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRow {
    pub id: String,
    #[serde(default)]
    pub workout_id: Option<String>,
    pub exercise_id: String,
    pub reps: i32,
    #[serde(default)]
    pub partial_reps: Option<i32>,
    pub weight_kg: f64,
    #[serde(default)]
    pub rpe: Option<f64>,
    pub created_at: String,
}

/// Insert shape for `sets`. CSV imports leave `workout_id` null.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewSet {
    pub id: String,
    pub workout_id: Option<String>,
    pub exercise_id: String,
    pub reps: i32,
    pub partial_reps: Option<i32>,
    pub weight_kg: f64,
    pub rpe: Option<f64>,
    pub created_at: String,
}

/// Field update for an edited set.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SetPatch {
    pub reps: i32,
    pub partial_reps: Option<i32>,
    pub weight_kg: f64,
    pub rpe: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseSelectParams {
    pub date: NaiveDate,
    pub workout_id: String,
    pub edit_mode: bool,
    pub preselected: Vec<ExerciseRef>,
    pub drafts: HashMap<String, TargetDraft>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryParams {
    pub date: NaiveDate,
    pub workout_id: String,
    pub selected: Vec<ExerciseRef>,
    pub drafts: HashMap<String, TargetDraft>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogSetParams {
    pub date: NaiveDate,
    /// Known workout id when coming from the detail screen. The logger
    /// resolves (or creates) the workout itself when this is None.
    pub workout_id: Option<String>,
    pub exercise: ExerciseRef,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Login,
    Register,
    ResetPassword,
    Main,
    CreateWorkout { date: NaiveDate },
    ExerciseSelect(ExerciseSelectParams),
    WorkoutSummary(SummaryParams),
    WorkoutDetail { workout_id: String, date: NaiveDate },
    LogSet(LogSetParams),
    Settings,
}
