use crate::calendar;
use crate::counters::WorkloadCounters;
use crate::model::Roster;
use crate::scheduler::{Engine, Generation, SchedError};
use crate::title::schedule_title;
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Marque affichée pour une tâche sans personne.
pub const UNFILLED: &str = "—";

/// Une semaine : son libellé et, pour chaque tâche du catalogue, le nom retenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAssignment {
    pub date: String,
    /// Même ordre que le catalogue ; `None` = tâche non pourvue.
    pub slots: Vec<Option<String>>,
}

impl WeekAssignment {
    pub fn unfilled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Nom affichable de la tâche `index` (ou [`UNFILLED`]).
    pub fn display(&self, index: usize) -> &str {
        self.slots
            .get(index)
            .and_then(|s| s.as_deref())
            .unwrap_or(UNFILLED)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().flatten().map(String::as_str)
    }
}

/// Identifiant fort pour un horaire sauvegardé
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horaire généré : immuable, remplacé ou supprimé en bloc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub id: ScheduleId,
    pub title: String,
    pub weeks: Vec<WeekAssignment>,
    pub created_at: DateTime<Utc>,
}

/// Demande de génération : plage de mois (1-12) et jour de la semaine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub start_month: u32,
    pub start_year: i32,
    pub end_month: u32,
    pub end_year: i32,
    pub weekday: Weekday,
}

impl ScheduleRequest {
    pub fn new(start_month: u32, start_year: i32, end_month: u32, end_year: i32) -> Self {
        Self {
            start_month,
            start_year,
            end_month,
            end_year,
            weekday: Weekday::Sat,
        }
    }

    pub fn on(mut self, weekday: Weekday) -> Self {
        self.weekday = weekday;
        self
    }

    fn validate(&self) -> Result<(), SchedError> {
        for month in [self.start_month, self.end_month] {
            if !(1..=12).contains(&month) {
                return Err(SchedError::InvalidMonth(month));
            }
        }
        Ok(())
    }

    pub fn week_labels(&self) -> Vec<String> {
        calendar::week_dates(
            self.start_month,
            self.start_year,
            self.end_month,
            self.end_year,
            self.weekday,
        )
        .into_iter()
        .map(calendar::date_label)
        .collect()
    }

    pub fn title(&self) -> String {
        schedule_title(self.start_month, self.start_year, self.end_month, self.end_year)
    }
}

/// Résultat complet : l'horaire à sauvegarder et les nouveaux compteurs.
#[derive(Debug, Clone)]
pub struct ScheduleOutput {
    pub schedule: GeneratedSchedule,
    pub counters: WorkloadCounters,
}

/// Valide le roster, calcule les semaines, lance le moteur et titre le résultat.
pub fn generate_schedule(
    engine: &Engine,
    roster: &Roster,
    request: &ScheduleRequest,
    counters: &WorkloadCounters,
    now: DateTime<Utc>,
) -> Result<ScheduleOutput, SchedError> {
    request.validate()?;
    roster.validate()?;

    let labels = request.week_labels();
    let Generation { weeks, counters } = engine.generate(&roster.people, &labels, counters);
    Ok(ScheduleOutput {
        schedule: GeneratedSchedule {
            id: ScheduleId::random(),
            title: request.title(),
            weeks,
            created_at: now,
        },
        counters,
    })
}
