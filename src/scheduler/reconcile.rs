use super::assignment::{Run, Week};
use crate::logging::{log_debug, log_warn};

/// Deuxième passe : place le partenaire manquant d'une paire à moitié placée.
///
/// Le partenaire prend la première tâche (ordre du catalogue) tenue par une
/// personne sans paire et qu'il peut faire. Sinon la paire reste incomplète.
pub(super) fn reconcile_pairs(run: &mut Run<'_>, week: &mut Week) {
    for idx in 0..run.pairs.len() {
        let Some((missing, present)) = run.pairs[idx].split(&week.assigned) else {
            continue;
        };

        let slot = (0..week.holders.len()).find(|&slot| {
            week.holders[slot].is_some_and(|holder| {
                holder != present
                    && run.partners[holder].is_none()
                    && run.eligibility.can_fill(missing, slot)
            })
        });

        match slot {
            Some(slot) => {
                if let Some(bumped) = week.take_back(run, slot) {
                    log_debug!(
                        "slot {}: {} replaced by {} to join {}",
                        slot,
                        run.name(bumped),
                        run.name(missing),
                        run.name(present)
                    );
                }
                week.give(run, slot, missing);
            }
            None => {
                log_warn!(
                    "pair {} / {} left incomplete: no swappable slot",
                    run.name(present),
                    run.name(missing)
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SlotCatalog;
    use crate::counters::WorkloadCounters;
    use crate::model::{Person, PersonId, Roster};

    #[test]
    fn swaps_out_unpaired_holder() {
        let mut roster = Roster::new(vec![
            Person::new("A").with_id("a"),
            Person::new("B").with_id("b"),
            Person::new("C").with_id("c"),
        ]);
        roster.pair(&PersonId::new("a"), &PersonId::new("b")).unwrap();
        let catalog = SlotCatalog::standard();
        let mut run = Run::new(&roster.people, &catalog, &WorkloadCounters::new());
        let mut week = Week::new(3, catalog.len());
        week.give(&mut run, 0, 0);
        week.give(&mut run, 1, 2);

        reconcile_pairs(&mut run, &mut week);

        assert_eq!(week.holders[1], Some(1));
        assert!(!week.assigned[2]);
        assert_eq!(run.load, vec![1, 1, 0]);
    }

    #[test]
    fn first_swappable_slot_in_catalog_order_is_used() {
        let mut roster = Roster::new(vec![
            Person::new("A").with_id("a"),
            Person::new("B").with_id("b"),
            Person::new("C").with_id("c"),
            Person::new("D").with_id("d"),
        ]);
        roster.pair(&PersonId::new("a"), &PersonId::new("b")).unwrap();
        let catalog = SlotCatalog::standard();
        let mut run = Run::new(&roster.people, &catalog, &WorkloadCounters::new());
        let mut week = Week::new(4, catalog.len());
        week.give(&mut run, 0, 0);
        week.give(&mut run, 1, 2);
        week.give(&mut run, 2, 3);

        reconcile_pairs(&mut run, &mut week);

        // C (tâche 1) cède sa place, D (tâche 2) garde la sienne
        assert_eq!(week.holders[1], Some(1));
        assert_eq!(week.holders[2], Some(3));
        assert!(!week.assigned[2]);
        assert_eq!(run.load, vec![1, 1, 0, 1]);
    }

    #[test]
    fn paired_holders_are_never_bumped() {
        let mut roster = Roster::new(vec![
            Person::new("A").with_id("a"),
            Person::new("B").with_id("b"),
            Person::new("C").with_id("c"),
            Person::new("D").with_id("d"),
        ]);
        roster.pair(&PersonId::new("a"), &PersonId::new("b")).unwrap();
        roster.pair(&PersonId::new("c"), &PersonId::new("d")).unwrap();
        let catalog = SlotCatalog::standard();
        let mut run = Run::new(&roster.people, &catalog, &WorkloadCounters::new());
        let mut week = Week::new(4, catalog.len());
        week.give(&mut run, 0, 0);
        week.give(&mut run, 1, 2);

        reconcile_pairs(&mut run, &mut week);

        // aucun détenteur sans paire : rien ne bouge
        assert_eq!(week.holders[0], Some(0));
        assert_eq!(week.holders[1], Some(2));
        assert!(!week.assigned[1]);
        assert!(!week.assigned[3]);
    }
}
