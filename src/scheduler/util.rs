use super::types::Pair;
use crate::model::Person;

/// Paires réciproques parmi les personnes actives, sans doublons, dans l'ordre du roster.
///
/// Une référence vers une personne absente de `active` (inactive) est ignorée.
pub(super) fn build_pairs(active: &[&Person]) -> Vec<Pair> {
    let mut seen = vec![false; active.len()];
    let mut out = Vec::new();
    for (i, person) in active.iter().enumerate() {
        if seen[i] {
            continue;
        }
        let Some(partner_id) = &person.paired_with else {
            continue;
        };
        let partner = active.iter().enumerate().find(|(j, p)| {
            *j != i && &p.id == partner_id && p.paired_with.as_ref() == Some(&person.id)
        });
        if let Some((j, _)) = partner {
            seen[i] = true;
            seen[j] = true;
            out.push(Pair {
                a: i.min(j),
                b: i.max(j),
            });
        }
    }
    out
}

/// Partenaire actif de chaque personne, par indice.
pub(super) fn partner_index(len: usize, pairs: &[Pair]) -> Vec<Option<usize>> {
    let mut out = vec![None; len];
    for pair in pairs {
        out[pair.a] = Some(pair.b);
        out[pair.b] = Some(pair.a);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PersonId, Roster};

    #[test]
    fn pairs_are_deduplicated_and_ignore_inactive() {
        let mut roster = Roster::new(vec![
            Person::new("A").with_id("a"),
            Person::new("B").with_id("b"),
            Person::new("C").with_id("c"),
            Person::new("D").with_id("d").inactive(),
        ]);
        roster.pair(&PersonId::new("b"), &PersonId::new("a")).unwrap();
        roster.pair(&PersonId::new("c"), &PersonId::new("d")).unwrap();

        let active: Vec<&Person> = roster.active().collect();
        let pairs = build_pairs(&active);
        assert_eq!(pairs, vec![Pair { a: 0, b: 1 }]);

        let partners = partner_index(active.len(), &pairs);
        assert_eq!(partners, vec![Some(1), Some(0), None]);
    }

    #[test]
    fn one_sided_reference_is_not_a_pair() {
        let mut a = Person::new("A").with_id("a");
        a.paired_with = Some(PersonId::new("b"));
        let b = Person::new("B").with_id("b");
        let active = vec![&a, &b];
        assert!(build_pairs(&active).is_empty());
    }
}
