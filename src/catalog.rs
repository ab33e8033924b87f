//! Catalogue des tâches à pourvoir chaque semaine.

use crate::model::{Floor, Person, Role};
use serde::{Deserialize, Serialize};

/// Une tâche hebdomadaire : un rôle, éventuellement lié à un étage.
///
/// Sans étage, la tâche couvre tous les étages (vadrouille).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Floor>,
}

impl Slot {
    pub const fn on_floor(role: Role, floor: Floor) -> Self {
        Self {
            role,
            floor: Some(floor),
        }
    }

    pub const fn all_floors(role: Role) -> Self {
        Self { role, floor: None }
    }

    /// Libellé court, utilisé en en-tête de colonne.
    pub fn label(&self) -> String {
        match self.floor {
            Some(floor) => format!("{} - {}", self.role.label(), floor.label()),
            None => self.role.label().to_string(),
        }
    }

    /// Libellé long, utilisé dans les courriels et les calendriers.
    pub fn task_label(&self) -> String {
        match self.floor {
            Some(_) => self.label(),
            None => format!("{} (tous les étages)", self.role.label()),
        }
    }

    /// Une personne peut-elle prendre cette tâche ?
    pub fn can_fill(&self, person: &Person) -> bool {
        if person.has_reduced_mobility() && !person.role_restrictions.contains(&self.role) {
            return false;
        }
        match self.floor {
            Some(floor) => {
                person.floor_restrictions.is_empty() || person.floor_restrictions.contains(&floor)
            }
            // la vadrouille fait tous les étages
            None => !person.has_reduced_mobility(),
        }
    }
}

/// Liste ordonnée des tâches d'une semaine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCatalog {
    slots: Vec<Slot>,
}

impl SlotCatalog {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// Les cinq tâches de la coop : balayeuse par étage, puis les deux vadrouilles.
    pub fn standard() -> Self {
        Self::new(vec![
            Slot::on_floor(Role::Sweep, Floor::Basement),
            Slot::on_floor(Role::Sweep, Floor::Ground),
            Slot::on_floor(Role::Sweep, Floor::First),
            Slot::all_floors(Role::FrontMop),
            Slot::all_floors(Role::BackMop),
        ])
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
