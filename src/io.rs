use crate::catalog::SlotCatalog;
use crate::counters::WorkloadCounters;
use crate::model::{Floor, Person, Roster, Role};
use crate::schedule::GeneratedSchedule;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de personnes depuis CSV: header `name,email,floors,roles,paired_with,active`
///
/// `floors` et `roles` sont des listes séparées par `;` ; `paired_with` est un nom.
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut roster = Roster::default();
    let mut pairings: Vec<(String, String)> = Vec::new();

    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let mut person = Person::new(name);
        if let Some(email) = non_empty(rec.get(1)) {
            person.email = Some(email.to_string());
        }
        if let Some(raw) = non_empty(rec.get(2)) {
            person.floor_restrictions = parse_list(raw, Floor::from_key)
                .with_context(|| format!("invalid floors for {name}"))?;
        }
        if let Some(raw) = non_empty(rec.get(3)) {
            person.role_restrictions = parse_list(raw, Role::from_key)
                .with_context(|| format!("invalid roles for {name}"))?;
        }
        if let Some(partner) = non_empty(rec.get(4)) {
            pairings.push((name.to_string(), partner.to_string()));
        }
        if let Some(flag) = non_empty(rec.get(5)) {
            person.active =
                parse_bool(flag).with_context(|| format!("invalid active value for {name}"))?;
        }
        roster.people.push(person);
    }

    for (name, partner) in pairings {
        let a = roster
            .find_by_name(&name)
            .map(|p| p.id.clone())
            .with_context(|| format!("unknown person {name}"))?;
        let b = roster
            .find_by_name(&partner)
            .map(|p| p.id.clone())
            .with_context(|| format!("{name} is paired with unknown person {partner}"))?;
        roster.pair(&a, &b)?;
    }
    roster.validate()?;
    Ok(roster)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_list<T>(raw: &str, parse: impl Fn(&str) -> Option<T>) -> anyhow::Result<Vec<T>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| parse(chunk).with_context(|| format!("unknown value: {chunk}")))
        .collect()
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Lignes du tableau d'un horaire : une ligne par étage et par semaine,
/// les vadrouilles sur la première ligne de chaque semaine.
///
/// La première ligne est l'en-tête.
pub fn schedule_rows(schedule: &GeneratedSchedule, catalog: &SlotCatalog) -> Vec<Vec<String>> {
    let mut floors: Vec<Floor> = Vec::new();
    let mut floor_roles: Vec<Role> = Vec::new();
    let mut mops: Vec<usize> = Vec::new();
    for (idx, slot) in catalog.slots().iter().enumerate() {
        match slot.floor {
            Some(floor) => {
                if !floors.contains(&floor) {
                    floors.push(floor);
                }
                if !floor_roles.contains(&slot.role) {
                    floor_roles.push(slot.role);
                }
            }
            None => mops.push(idx),
        }
    }

    let mut header = vec!["Date".to_string(), "Étage".to_string()];
    header.extend(floor_roles.iter().map(|r| r.label().to_string()));
    header.extend(mops.iter().filter_map(|&i| catalog.get(i)).map(|s| s.label()));
    let mut rows = vec![header];

    for week in &schedule.weeks {
        // une vadrouille seule occupe quand même une ligne
        let lines = floors.len().max(1);
        for line in 0..lines {
            let first = line == 0;
            let mut row = vec![if first { week.date.clone() } else { String::new() }];
            match floors.get(line) {
                Some(floor) => {
                    row.push(floor.label().to_string());
                    for role in &floor_roles {
                        let cell = catalog
                            .slots()
                            .iter()
                            .position(|s| s.role == *role && s.floor == Some(*floor))
                            .map(|i| week.display(i).to_string())
                            .unwrap_or_default();
                        row.push(cell);
                    }
                }
                None => row.push(String::new()),
            }
            for &i in &mops {
                row.push(if first {
                    week.display(i).to_string()
                } else {
                    String::new()
                });
            }
            rows.push(row);
        }
    }
    rows
}

/// Tableau texte aligné (titre, en-tête, semaines).
pub fn render_schedule_table(schedule: &GeneratedSchedule, catalog: &SlotCatalog) -> String {
    let rows = schedule_rows(schedule, catalog);
    let cols = rows.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            rows.iter()
                .map(|r| r.get(c).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let fmt_row = |row: &[String]| -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        cells.join(" | ").trim_end().to_string()
    };

    let mut out = format!("{}\n", schedule.title);
    for (idx, row) in rows.iter().enumerate() {
        out.push_str(&fmt_row(row.as_slice()));
        out.push('\n');
        if idx == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    out
}

/// Export CSV d'un horaire, même disposition que le tableau texte.
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    schedule: &GeneratedSchedule,
    catalog: &SlotCatalog,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in schedule_rows(schedule, catalog) {
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des compteurs: header `name,count`, dans l'ordre du roster.
pub fn export_counters_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    counters: &WorkloadCounters,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["name", "count"])?;
    let mut buf = itoa::Buffer::new();
    for p in &roster.people {
        w.write_record([p.name.as_str(), buf.format(counters.get(&p.id))])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ScheduleId, WeekAssignment};
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;

    fn schedule() -> GeneratedSchedule {
        GeneratedSchedule {
            id: ScheduleId::new("s1"),
            title: "Février - Février 2026".into(),
            weeks: vec![WeekAssignment {
                date: "7 février".into(),
                slots: vec![
                    Some("Isabelle".into()),
                    Some("Sarah".into()),
                    None,
                    Some("Alain".into()),
                    Some("Jade".into()),
                ],
            }],
            created_at: Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn table_groups_rows_by_floor() {
        let table = render_schedule_table(&schedule(), &SlotCatalog::standard());
        assert_snapshot!(table.trim_end(), @r"
        Février - Février 2026
        Date      | Étage           | Balayeuse | Vadrouille avant | Vadrouille arrière
        ----------+-----------------+-----------+------------------+-------------------
        7 février | Sous-sol        | Isabelle  | Alain            | Jade
                  | Rez-de-chaussée | Sarah     |                  |
                  | 1er étage       | —         |                  |
        ");
    }

    #[test]
    fn import_people_with_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(
            &path,
            "name,email,floors,roles,paired_with,active\n\
             Louise,louise@example.com,sous-sol,,Richard C.,\n\
             Richard C.,,sous-sol,,,\n\
             Vivianne,,rez-de-chaussee,balayeuse,,oui\n\
             Parker,,,,,non\n",
        )
        .unwrap();

        let roster = import_people_csv(&path).unwrap();
        assert_eq!(roster.people.len(), 4);
        let louise = roster.find_by_name("Louise").unwrap();
        let richard = roster.find_by_name("Richard C.").unwrap();
        assert_eq!(louise.paired_with.as_ref(), Some(&richard.id));
        assert_eq!(richard.paired_with.as_ref(), Some(&louise.id));
        assert_eq!(louise.email.as_deref(), Some("louise@example.com"));

        let viv = roster.find_by_name("Vivianne").unwrap();
        assert_eq!(viv.floor_restrictions, vec![Floor::Ground]);
        assert_eq!(viv.role_restrictions, vec![Role::Sweep]);
        assert!(!roster.find_by_name("Parker").unwrap().active);
    }

    #[test]
    fn import_rejects_unknown_floor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "name,email,floors\nJade,,grenier\n").unwrap();
        assert!(import_people_csv(&path).is_err());
    }

    #[test]
    fn counters_csv_lists_roster_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.csv");
        let roster = Roster::new(vec![
            Person::new("B").with_id("b"),
            Person::new("A").with_id("a"),
        ]);
        let counters: WorkloadCounters =
            [(crate::model::PersonId::new("b"), 12)].into_iter().collect();
        export_counters_csv(&path, &roster, &counters).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,count\nB,12\nA,0\n");
    }
}
