mod assignment;
mod eligibility;
mod reconcile;
mod types;
mod util;

pub use types::{Generation, SchedError};

use crate::catalog::SlotCatalog;
use crate::counters::WorkloadCounters;
use crate::logging::log_info;
use crate::model::Person;
use crate::schedule::WeekAssignment;
use assignment::{Run, Week};

/// Moteur de répartition : glouton, semaine par semaine, déterministe.
///
/// Pour chaque semaine : tâches les plus rares d'abord, personne la moins
/// chargée parmi les éligibles (égalités départagées par l'ordre du roster),
/// puis une passe qui tente de compléter les paires.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    catalog: SlotCatalog,
}

impl Engine {
    pub fn new(catalog: SlotCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Génère une semaine par libellé. Ne touche à aucun stockage.
    ///
    /// Les personnes inactives sont ignorées ; les compteurs retournés ne
    /// contiennent que les personnes actives. Une tâche sans candidat reste vide.
    pub fn generate(
        &self,
        people: &[Person],
        week_labels: &[String],
        initial: &WorkloadCounters,
    ) -> Generation {
        let mut run = Run::new(people, &self.catalog, initial);
        let mut weeks = Vec::with_capacity(week_labels.len());

        for label in week_labels {
            let mut week = Week::new(run.active.len(), self.catalog.len());
            assignment::fill_week(&mut run, &mut week);
            reconcile::reconcile_pairs(&mut run, &mut week);

            let slots = week
                .holders
                .iter()
                .map(|holder| holder.map(|p| run.name(p).to_string()))
                .collect();
            weeks.push(WeekAssignment {
                date: label.clone(),
                slots,
            });
        }

        let generation = Generation {
            weeks,
            counters: run.counters(),
        };
        log_info!(
            "generated {} week(s) for {} active people, {} unfilled slot(s)",
            generation.weeks.len(),
            run.active.len(),
            generation.unfilled()
        );
        generation
    }
}
