use super::eligibility::Eligibility;
use super::types::Pair;
use super::util;
use crate::catalog::SlotCatalog;
use crate::counters::WorkloadCounters;
use crate::logging::log_debug;
use crate::model::Person;

/// État d'une génération : fixé au départ, sauf la charge qui évolue.
pub(super) struct Run<'a> {
    pub active: Vec<&'a Person>,
    pub eligibility: Eligibility,
    pub pairs: Vec<Pair>,
    pub partners: Vec<Option<usize>>,
    pub order: Vec<usize>,
    pub load: Vec<u32>,
}

impl<'a> Run<'a> {
    pub fn new(people: &'a [Person], catalog: &SlotCatalog, initial: &WorkloadCounters) -> Self {
        let active: Vec<&Person> = people.iter().filter(|p| p.active).collect();
        let eligibility = Eligibility::new(&active, catalog);
        let pairs = util::build_pairs(&active);
        let partners = util::partner_index(active.len(), &pairs);
        let order = eligibility.slot_order(catalog.len());
        let load = active.iter().map(|p| initial.get(&p.id)).collect();
        Self {
            active,
            eligibility,
            pairs,
            partners,
            order,
            load,
        }
    }

    pub fn name(&self, person: usize) -> &str {
        &self.active[person].name
    }

    pub fn counters(&self) -> WorkloadCounters {
        self.active
            .iter()
            .zip(&self.load)
            .map(|(p, load)| (p.id.clone(), *load))
            .collect()
    }
}

/// Une semaine en cours de remplissage.
#[derive(Debug, Clone)]
pub(super) struct Week {
    pub assigned: Vec<bool>,
    pub holders: Vec<Option<usize>>,
}

impl Week {
    pub fn new(people: usize, slots: usize) -> Self {
        Self {
            assigned: vec![false; people],
            holders: vec![None; slots],
        }
    }

    pub fn give(&mut self, run: &mut Run<'_>, slot: usize, person: usize) {
        self.holders[slot] = Some(person);
        self.assigned[person] = true;
        run.load[person] += 1;
    }

    pub fn take_back(&mut self, run: &mut Run<'_>, slot: usize) -> Option<usize> {
        let person = self.holders[slot].take()?;
        self.assigned[person] = false;
        run.load[person] = run.load[person].saturating_sub(1);
        Some(person)
    }
}

/// Remplit les tâches d'une semaine, les plus rares d'abord.
pub(super) fn fill_week(run: &mut Run<'_>, week: &mut Week) {
    for pos in 0..run.order.len() {
        let slot = run.order[pos];
        match pick(run, week, slot) {
            Some(person) => {
                week.give(run, slot, person);
                log_debug!("slot {} -> {} (load {})", slot, run.name(person), run.load[person]);
            }
            None => {
                log_debug!("slot {} left unfilled", slot);
            }
        }
    }
}

fn pick(run: &Run<'_>, week: &Week, slot: usize) -> Option<usize> {
    let mut candidates: Vec<usize> = (0..run.active.len())
        .filter(|&p| !week.assigned[p] && run.eligibility.can_fill(p, slot))
        .collect();

    // le partenaire d'une personne déjà placée passe avant l'équilibrage
    if let Some(partner) = waiting_partner(&run.pairs, &week.assigned, &candidates) {
        candidates = vec![partner];
    }

    let min = candidates.iter().map(|&p| run.load[p]).min()?;
    let pool: Vec<usize> = candidates
        .into_iter()
        .filter(|&p| run.load[p] == min)
        .collect();
    pool.iter()
        .copied()
        .find(|&p| starts_pair(run, week, p))
        .or_else(|| pool.first().copied())
}

fn waiting_partner(pairs: &[Pair], assigned: &[bool], candidates: &[usize]) -> Option<usize> {
    pairs.iter().find_map(|pair| {
        let (missing, _) = pair.split(assigned)?;
        candidates.contains(&missing).then_some(missing)
    })
}

fn starts_pair(run: &Run<'_>, week: &Week, person: usize) -> bool {
    !week.assigned[person] && run.partners[person].is_some_and(|q| !week.assigned[q])
}
