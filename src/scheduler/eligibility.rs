use crate::catalog::SlotCatalog;
use crate::model::Person;

/// Matrice d'éligibilité `[personne][tâche]`, calculée une fois par génération.
#[derive(Debug, Clone)]
pub(super) struct Eligibility {
    cells: Vec<Vec<bool>>,
}

impl Eligibility {
    pub fn new(active: &[&Person], catalog: &SlotCatalog) -> Self {
        let cells = active
            .iter()
            .map(|p| catalog.slots().iter().map(|s| s.can_fill(p)).collect())
            .collect();
        Self { cells }
    }

    pub fn can_fill(&self, person: usize, slot: usize) -> bool {
        self.cells[person][slot]
    }

    pub fn candidates_for(&self, slot: usize) -> usize {
        self.cells.iter().filter(|row| row[slot]).count()
    }

    /// Ordre de remplissage : les tâches les plus rares d'abord.
    ///
    /// Tri stable, l'ordre du catalogue départage les égalités.
    pub fn slot_order(&self, slot_count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..slot_count).collect();
        order.sort_by_key(|&slot| self.candidates_for(slot));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Floor, Role};

    #[test]
    fn scarce_slots_come_first() {
        let people = vec![
            Person::new("A").on_floors(&[Floor::Basement]),
            Person::new("B").on_floors(&[Floor::Basement]),
            Person::new("C").on_floors(&[Floor::Ground]).only_roles(&[Role::Sweep]),
        ];
        let active: Vec<&Person> = people.iter().collect();
        let catalog = SlotCatalog::standard();
        let elig = Eligibility::new(&active, &catalog);

        // sous-sol: 2, rdc: 1, 1er: 0, vadrouilles: 2 chacune
        assert_eq!(elig.slot_order(catalog.len()), vec![2, 1, 0, 3, 4]);
        assert!(elig.can_fill(2, 1));
        assert!(!elig.can_fill(2, 3));
    }
}
