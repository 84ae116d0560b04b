use std::collections::HashMap;

use crate::types::{ExerciseRef, NewTarget, TargetRow};
use crate::units::{self, Units};

/// Draft target values for one exercise, exactly as typed. Weight is in
/// the unit the user is entering in; conversion to kilograms happens once,
/// when rows are built for persistence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetDraft {
    pub reps_min: String,
    pub reps_max: String,
    pub weight: String,
    pub rpe: String,
}

impl TargetDraft {
    /// Pre-populates a draft from a persisted row, converting the stored
    /// kilograms into the active display unit.
    pub fn from_row(row: &TargetRow, units: Units) -> Self {
        Self {
            reps_min: row.target_reps_min.map(|v| v.to_string()).unwrap_or_default(),
            reps_max: row.target_reps_max.map(|v| v.to_string()).unwrap_or_default(),
            weight: row
                .target_weight
                .map(|kg| units::format_weight(kg, units))
                .unwrap_or_default(),
            rpe: row.target_rpe.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    /// Builds the insert row. Unparseable or empty fields persist as null;
    /// the weight is converted from the entry unit to kilograms here.
    pub fn to_row(&self, workout_id: &str, exercise_id: &str, units: Units) -> NewTarget {
        NewTarget {
            workout_id: workout_id.to_string(),
            exercise_id: exercise_id.to_string(),
            target_reps_min: self.reps_min.trim().parse().ok(),
            target_reps_max: self.reps_max.trim().parse().ok(),
            target_weight: self
                .weight
                .trim()
                .parse::<f64>()
                .ok()
                .map(|w| units::to_kg(w, units)),
            target_rpe: self.rpe.trim().parse().ok(),
        }
    }

    pub fn summary(&self, units: Units) -> String {
        let mut parts = Vec::new();
        match (self.reps_min.trim(), self.reps_max.trim()) {
            ("", "") => {}
            (min, "") => parts.push(format!("{} reps", min)),
            ("", max) => parts.push(format!("{} reps", max)),
            (min, max) => parts.push(format!("{}-{} reps", min, max)),
        }
        if !self.weight.trim().is_empty() {
            parts.push(format!("{} {}", self.weight.trim(), units.suffix()));
        }
        if !self.rpe.trim().is_empty() {
            parts.push(format!("RPE {}", self.rpe.trim()));
        }
        if parts.is_empty() {
            "Inga mål".to_string()
        } else {
            parts.join(" · ")
        }
    }
}

/// Selected exercises and their target drafts for one workout. The two
/// halves stay in sync: every selected exercise has exactly one draft and
/// nothing else does.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    selected: Vec<ExerciseRef>,
    drafts: HashMap<String, TargetDraft>,
}

impl Selection {
    /// Rebuilds a selection from persisted state (the edit flow). Drafts
    /// for exercises not in the list are dropped, missing drafts are
    /// seeded blank, so the invariant holds from the start.
    pub fn from_saved(selected: Vec<ExerciseRef>, drafts: HashMap<String, TargetDraft>) -> Self {
        let mut out = Self::default();
        for exercise in selected {
            let draft = drafts.get(&exercise.id).cloned().unwrap_or_default();
            out.drafts.insert(exercise.id.clone(), draft);
            out.selected.push(exercise);
        }
        out
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|e| e.id == id)
    }

    /// Select seeds a blank draft; deselect removes the draft with the
    /// exercise.
    pub fn toggle(&mut self, exercise: ExerciseRef) {
        if let Some(pos) = self.selected.iter().position(|e| e.id == exercise.id) {
            self.selected.remove(pos);
            self.drafts.remove(&exercise.id);
        } else {
            self.drafts.insert(exercise.id.clone(), TargetDraft::default());
            self.selected.push(exercise);
        }
    }

    /// Round-trips an edited draft back in. Ignored for exercises that are
    /// no longer selected, so a stale editor cannot break the invariant.
    pub fn set_draft(&mut self, id: &str, draft: TargetDraft) {
        if self.is_selected(id) {
            self.drafts.insert(id.to_string(), draft);
        }
    }

    pub fn draft(&self, id: &str) -> Option<&TargetDraft> {
        self.drafts.get(id)
    }

    pub fn selected(&self) -> &[ExerciseRef] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn into_parts(self) -> (Vec<ExerciseRef>, HashMap<String, TargetDraft>) {
        (self.selected, self.drafts)
    }

    /// Gate before any persistence: at least one exercise and a resolved
    /// workout id, otherwise the caller reports the message and makes no
    /// network call.
    pub fn validate_for_save(&self, workout_id: &str) -> Result<(), String> {
        if self.selected.is_empty() {
            return Err("Välj minst en övning".into());
        }
        if workout_id.is_empty() {
            return Err("Passet saknar id, gå tillbaka och försök igen".into());
        }
        Ok(())
    }

    /// Insert rows for every selected exercise, in selection order.
    pub fn to_rows(&self, workout_id: &str, units: Units) -> Vec<NewTarget> {
        self.selected
            .iter()
            .map(|exercise| {
                self.drafts
                    .get(&exercise.id)
                    .cloned()
                    .unwrap_or_default()
                    .to_row(workout_id, &exercise.id, units)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(id: &str) -> ExerciseRef {
        ExerciseRef {
            id: id.to_string(),
            name: format!("Övning {}", id),
        }
    }

    fn keys(sel: &Selection) -> Vec<&str> {
        let mut ids: Vec<&str> = sel.selected().iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    fn draft_keys(sel: &Selection) -> Vec<&str> {
        let mut ids: Vec<&str> = sel.drafts.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn toggle_keeps_selection_and_drafts_in_sync() {
        let mut sel = Selection::default();
        sel.toggle(ex("a"));
        sel.toggle(ex("b"));
        assert_eq!(sel.len(), 2);
        assert_eq!(keys(&sel), draft_keys(&sel));

        sel.toggle(ex("a"));
        assert_eq!(sel.len(), 1);
        assert!(!sel.is_selected("a"));
        assert!(sel.draft("a").is_none());
        assert_eq!(keys(&sel), draft_keys(&sel));
    }

    #[test]
    fn select_seeds_exactly_one_blank_draft() {
        let mut sel = Selection::default();
        sel.toggle(ex("a"));
        assert_eq!(sel.drafts.len(), 1);
        assert_eq!(sel.draft("a"), Some(&TargetDraft::default()));
    }

    #[test]
    fn stale_draft_for_deselected_exercise_is_ignored() {
        let mut sel = Selection::default();
        sel.toggle(ex("a"));
        sel.toggle(ex("a"));
        sel.set_draft(
            "a",
            TargetDraft {
                reps_min: "5".into(),
                ..Default::default()
            },
        );
        assert!(sel.draft("a").is_none());
        assert_eq!(keys(&sel), draft_keys(&sel));
    }

    #[test]
    fn from_saved_reconciles_both_halves() {
        let mut drafts = HashMap::new();
        drafts.insert(
            "a".to_string(),
            TargetDraft {
                reps_min: "5".into(),
                ..Default::default()
            },
        );
        // A draft for an exercise that is not selected must not survive.
        drafts.insert("ghost".to_string(), TargetDraft::default());

        let sel = Selection::from_saved(vec![ex("a"), ex("b")], drafts);
        assert_eq!(keys(&sel), draft_keys(&sel));
        assert_eq!(sel.draft("a").unwrap().reps_min, "5");
        assert_eq!(sel.draft("b"), Some(&TargetDraft::default()));
    }

    #[test]
    fn rows_convert_weight_to_kilograms() {
        let mut sel = Selection::default();
        sel.toggle(ex("a"));
        sel.set_draft(
            "a",
            TargetDraft {
                reps_min: "5".into(),
                reps_max: "8".into(),
                weight: "220".into(),
                rpe: "8".into(),
            },
        );
        let rows = sel.to_rows("w1", Units::Lb);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].workout_id, "w1");
        assert_eq!(rows[0].target_reps_min, Some(5));
        assert_eq!(rows[0].target_reps_max, Some(8));
        assert!((rows[0].target_weight.unwrap() - 99.7903214).abs() < 1e-6);
        assert_eq!(rows[0].target_rpe, Some(8.0));
    }

    #[test]
    fn saving_requires_a_selection_and_a_workout_id() {
        let empty = Selection::default();
        assert!(empty.validate_for_save("w1").is_err());

        let mut sel = Selection::default();
        sel.toggle(ex("a"));
        assert!(sel.validate_for_save("").is_err());
        assert!(sel.validate_for_save("w1").is_ok());

        // Deselecting the last exercise flips the gate back.
        sel.toggle(ex("a"));
        assert!(sel.validate_for_save("w1").is_err());
    }

    #[test]
    fn blank_fields_persist_as_null() {
        let mut sel = Selection::default();
        sel.toggle(ex("a"));
        let rows = sel.to_rows("w1", Units::Kg);
        assert_eq!(rows[0].target_reps_min, None);
        assert_eq!(rows[0].target_weight, None);
        assert_eq!(rows[0].target_rpe, None);
    }
}
