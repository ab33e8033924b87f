use crate::model::{PersonId, Roster};
use crate::schedule::GeneratedSchedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nombre de tâches attribuées à chaque personne, toutes générations confondues.
///
/// Une personne absente compte pour 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkloadCounters(BTreeMap<PersonId, u32>);

impl WorkloadCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &PersonId) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, id: PersonId, count: u32) {
        self.0.insert(id, count);
    }

    pub fn increment(&mut self, id: &PersonId) {
        *self.0.entry(id.clone()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, u32)> {
        self.0.iter().map(|(id, count)| (id, *count))
    }

    /// Écrase les valeurs de `self` par celles de `newer`, garde les autres.
    pub fn merge(&mut self, newer: &WorkloadCounters) {
        for (id, count) in newer.iter() {
            self.0.insert(id.clone(), count);
        }
    }

    /// Ajoute chaque occurrence d'un nom du roster dans l'horaire.
    ///
    /// Les noms inconnus sont ignorés. Retourne le nombre de tâches comptées.
    pub fn tally(&mut self, roster: &Roster, schedule: &GeneratedSchedule) -> usize {
        let mut counted = 0;
        for week in &schedule.weeks {
            for name in week.slots.iter().flatten() {
                if let Some(person) = roster.find_by_name(name) {
                    self.increment(&person.id);
                    counted += 1;
                }
            }
        }
        counted
    }
}

impl FromIterator<(PersonId, u32)> for WorkloadCounters {
    fn from_iter<I: IntoIterator<Item = (PersonId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_default_to_zero() {
        let mut c = WorkloadCounters::new();
        let id = PersonId::new("x");
        assert_eq!(c.get(&id), 0);
        c.increment(&id);
        c.increment(&id);
        assert_eq!(c.get(&id), 2);
        assert_eq!(c.get(&PersonId::new("absent")), 0);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn merge_keeps_untouched_entries() {
        let mut base: WorkloadCounters =
            [(PersonId::new("a"), 3), (PersonId::new("b"), 7)].into_iter().collect();
        let newer: WorkloadCounters = [(PersonId::new("a"), 5)].into_iter().collect();
        base.merge(&newer);
        assert_eq!(base.get(&PersonId::new("a")), 5);
        assert_eq!(base.get(&PersonId::new("b")), 7);
    }

    #[test]
    fn serializes_as_plain_map() {
        let c: WorkloadCounters = [(PersonId::new("a"), 2)].into_iter().collect();
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"a":2}"#);
    }
}
