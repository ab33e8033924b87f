//! Fichiers calendrier (iCalendar) : un événement « journée entière » par tâche.

use crate::calendar::parse_date_label;
use crate::catalog::SlotCatalog;
use crate::schedule::WeekAssignment;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

/// Une tâche d'une personne : libellé de semaine + libellé de tâche.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTask {
    pub date: String,
    pub task: String,
}

/// Toutes les tâches attribuées à `name`, dans l'ordre des semaines puis du catalogue.
pub fn member_tasks(name: &str, weeks: &[WeekAssignment], catalog: &SlotCatalog) -> Vec<MemberTask> {
    let mut out = Vec::new();
    for week in weeks {
        for (idx, slot) in catalog.slots().iter().enumerate() {
            if week.slots.get(idx).and_then(|s| s.as_deref()) == Some(name) {
                out.push(MemberTask {
                    date: week.date.clone(),
                    task: slot.task_label(),
                });
            }
        }
    }
    out
}

/// Paramètres fixes du calendrier produit.
#[derive(Debug, Clone)]
pub struct IcsOptions {
    pub organisation: String,
    pub uid_domain: String,
    /// Année appliquée aux libellés « jour mois ».
    pub year: i32,
    pub stamp: DateTime<Utc>,
}

/// Rend le calendrier d'une personne. Un libellé illisible est ignoré.
pub fn render_ics(name: &str, tasks: &[MemberTask], opts: &IcsOptions) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:-//{}//Horaire de menage//FR", escape_text(&opts.organisation)),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
        format!("X-WR-CALNAME:{}", escape_text(&format!("Horaire de ménage - {name}"))),
    ];

    for task in tasks {
        let Some(date) = parse_date_label(&task.date, opts.year) else {
            continue;
        };
        lines.extend(event_lines(name, task, date, opts));
    }

    lines.push("END:VCALENDAR".into());
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn event_lines(name: &str, task: &MemberTask, date: NaiveDate, opts: &IcsOptions) -> Vec<String> {
    let next = date + Duration::days(1);
    vec![
        "BEGIN:VEVENT".into(),
        format!("UID:{}@{}", Uuid::new_v4(), opts.uid_domain),
        format!("DTSTAMP:{}", opts.stamp.format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART;VALUE=DATE:{}", date.format("%Y%m%d")),
        format!("DTEND;VALUE=DATE:{}", next.format("%Y%m%d")),
        format!("SUMMARY:{}", escape_text(&format!("Ménage: {}", task.task))),
        format!(
            "DESCRIPTION:{}",
            escape_text(&format!(
                "Tâche de ménage pour {name} - {}",
                opts.organisation
            ))
        ),
        format!("LOCATION:{}", escape_text(&opts.organisation)),
        "STATUS:CONFIRMED".into(),
        "END:VEVENT".into(),
    ]
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Nom de fichier de la pièce jointe : `horaire-menage-marie-m..ics`.
pub fn attachment_name(name: &str) -> String {
    let slug: Vec<String> = name
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect();
    format!("horaire-menage-{}.ics", slug.join("-"))
}
