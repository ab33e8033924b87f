use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
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

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Étage de l'immeuble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Floor {
    #[serde(rename = "sous-sol")]
    Basement,
    #[serde(rename = "rez-de-chaussee")]
    Ground,
    #[serde(rename = "1er-etage")]
    First,
}

impl Floor {
    pub const ALL: [Floor; 3] = [Floor::Basement, Floor::Ground, Floor::First];

    /// Clé stable (JSON, CSV).
    pub fn key(self) -> &'static str {
        match self {
            Floor::Basement => "sous-sol",
            Floor::Ground => "rez-de-chaussee",
            Floor::First => "1er-etage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Floor::Basement => "Sous-sol",
            Floor::Ground => "Rez-de-chaussée",
            Floor::First => "1er étage",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == raw)
    }
}

/// Tâche de ménage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "balayeuse")]
    Sweep,
    #[serde(rename = "vadrouille-avant")]
    FrontMop,
    #[serde(rename = "vadrouille-arriere")]
    BackMop,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Sweep, Role::FrontMop, Role::BackMop];

    pub fn key(self) -> &'static str {
        match self {
            Role::Sweep => "balayeuse",
            Role::FrontMop => "vadrouille-avant",
            Role::BackMop => "vadrouille-arriere",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Sweep => "Balayeuse",
            Role::FrontMop => "Vadrouille avant",
            Role::BackMop => "Vadrouille arrière",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == raw)
    }
}

/// Membre de la coopérative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Vide = tous les étages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub floor_restrictions: Vec<Floor>,
    /// Non vide = mobilité réduite : seulement ces tâches, jamais la vadrouille.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_restrictions: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_with: Option<PersonId>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Person {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: PersonId::random(),
            name: name.into(),
            email: None,
            floor_restrictions: Vec::new(),
            role_restrictions: Vec::new(),
            paired_with: None,
            active: true,
        }
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = PersonId::new(id);
        self
    }

    pub fn with_email<E: Into<String>>(mut self, email: E) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn on_floors(mut self, floors: &[Floor]) -> Self {
        self.floor_restrictions = floors.to_vec();
        self
    }

    pub fn only_roles(mut self, roles: &[Role]) -> Self {
        self.role_restrictions = roles.to_vec();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn has_reduced_mobility(&self) -> bool {
        !self.role_restrictions.is_empty()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RosterError {
    #[error("duplicate person id: {0}")]
    DuplicateId(String),
    #[error("duplicate person name: {0}")]
    DuplicateName(String),
    #[error("empty name for person {0}")]
    EmptyName(String),
    #[error("{0} is paired with itself")]
    SelfPairing(String),
    #[error("{person} is paired with unknown id {partner}")]
    UnknownPartner { person: String, partner: String },
    #[error("pairing {person} -> {partner} is not reciprocated")]
    AsymmetricPairing { person: String, partner: String },
}

/// Liste des membres
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Roster {
    pub people: Vec<Person>,
}

impl Roster {
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    pub fn find_by_name<'a>(&'a self, name: &str) -> Option<&'a Person> {
        self.people.iter().find(|p| p.name == name)
    }
    pub fn find_by_id<'a>(&'a self, id: &PersonId) -> Option<&'a Person> {
        self.people.iter().find(|p| &p.id == id)
    }
    pub fn find_mut_by_id(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| &p.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| p.active)
    }

    /// Lie deux personnes dans les deux sens.
    pub fn pair(&mut self, a: &PersonId, b: &PersonId) -> Result<(), RosterError> {
        if a == b {
            return Err(RosterError::SelfPairing(a.to_string()));
        }
        for (me, other) in [(a, b), (b, a)] {
            if self.find_by_id(me).is_none() {
                return Err(RosterError::UnknownPartner {
                    person: other.to_string(),
                    partner: me.to_string(),
                });
            }
        }
        for (me, other) in [(a, b), (b, a)] {
            if let Some(person) = self.find_mut_by_id(me) {
                person.paired_with = Some(other.clone());
            }
        }
        Ok(())
    }

    /// Vérifie l'intégrité du roster avant génération.
    ///
    /// Une paire vers une personne inactive est acceptée : le moteur l'ignore.
    pub fn validate(&self) -> Result<(), RosterError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for p in &self.people {
            if !ids.insert(&p.id) {
                return Err(RosterError::DuplicateId(p.id.to_string()));
            }
            if p.name.trim().is_empty() {
                return Err(RosterError::EmptyName(p.id.to_string()));
            }
            if !names.insert(p.name.as_str()) {
                return Err(RosterError::DuplicateName(p.name.clone()));
            }
        }

        for p in &self.people {
            let Some(partner_id) = &p.paired_with else {
                continue;
            };
            if partner_id == &p.id {
                return Err(RosterError::SelfPairing(p.name.clone()));
            }
            let partner = self
                .find_by_id(partner_id)
                .ok_or_else(|| RosterError::UnknownPartner {
                    person: p.name.clone(),
                    partner: partner_id.to_string(),
                })?;
            if partner.paired_with.as_ref() != Some(&p.id) {
                return Err(RosterError::AsymmetricPairing {
                    person: p.name.clone(),
                    partner: partner.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_symmetric_and_validates() {
        let a = Person::new("Louise").with_id("a");
        let b = Person::new("Richard C.").with_id("b");
        let mut roster = Roster::new(vec![a, b]);
        roster.pair(&PersonId::new("a"), &PersonId::new("b")).unwrap();

        assert_eq!(roster.people[0].paired_with, Some(PersonId::new("b")));
        assert_eq!(roster.people[1].paired_with, Some(PersonId::new("a")));
        assert!(roster.validate().is_ok());
    }

    #[test]
    fn rejects_broken_pairings() {
        let mut a = Person::new("A").with_id("a");
        a.paired_with = Some(PersonId::new("ghost"));
        let roster = Roster::new(vec![a.clone()]);
        assert!(matches!(
            roster.validate(),
            Err(RosterError::UnknownPartner { .. })
        ));

        a.paired_with = Some(PersonId::new("b"));
        let b = Person::new("B").with_id("b");
        let roster = Roster::new(vec![a.clone(), b]);
        assert!(matches!(
            roster.validate(),
            Err(RosterError::AsymmetricPairing { .. })
        ));

        a.paired_with = Some(PersonId::new("a"));
        assert_eq!(
            Roster::new(vec![a]).validate(),
            Err(RosterError::SelfPairing("A".into()))
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let roster = Roster::new(vec![
            Person::new("Louise").with_id("1"),
            Person::new("Louise").with_id("2"),
        ]);
        assert_eq!(
            roster.validate(),
            Err(RosterError::DuplicateName("Louise".into()))
        );
    }

    #[test]
    fn pairing_with_inactive_person_is_accepted() {
        let mut roster = Roster::new(vec![
            Person::new("A").with_id("a"),
            Person::new("B").with_id("b").inactive(),
        ]);
        roster.pair(&PersonId::new("a"), &PersonId::new("b")).unwrap();
        assert!(roster.validate().is_ok());
        assert_eq!(roster.active().count(), 1);
    }

    #[test]
    fn floor_and_role_keys_roundtrip_through_serde() {
        let p = Person::new("Vivianne")
            .with_id("v")
            .on_floors(&[Floor::Ground])
            .only_roles(&[Role::Sweep]);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"rez-de-chaussee\""));
        assert!(json.contains("\"balayeuse\""));
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(Floor::from_key("1er-etage"), Some(Floor::First));
        assert_eq!(Role::from_key("nope"), None);
    }
}
