use crate::counters::WorkloadCounters;
use crate::model::RosterError;
use crate::schedule::WeekAssignment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Résultat d'une génération : les semaines, et les compteurs mis à jour
/// (une entrée par personne active).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub weeks: Vec<WeekAssignment>,
    pub counters: WorkloadCounters,
}

impl Generation {
    /// Nombre de tâches restées sans personne.
    pub fn unfilled(&self) -> usize {
        self.weeks.iter().map(WeekAssignment::unfilled).sum()
    }
}

/// Paire (indices dans la liste des personnes actives), `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Pair {
    pub a: usize,
    pub b: usize,
}

impl Pair {
    /// Le membre manquant et le membre placé, si un seul des deux l'est.
    pub fn split(&self, assigned: &[bool]) -> Option<(usize, usize)> {
        match (assigned[self.a], assigned[self.b]) {
            (true, false) => Some((self.b, self.a)),
            (false, true) => Some((self.a, self.b)),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("invalid roster: {0}")]
    Roster(#[from] RosterError),
}
