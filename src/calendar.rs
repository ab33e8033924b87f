//! Dates des semaines et libellés « jour mois » en français.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Noms de mois en minuscules, tels qu'ils apparaissent dans les libellés.
const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Variantes sans accents acceptées au parsing.
const MONTH_ALIASES: [(&str, u32); 3] = [("fevrier", 2), ("aout", 8), ("decembre", 12)];

/// Nom du mois (1 = janvier), en minuscules.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS_FR.get(idx).copied()
}

/// Nom du mois avec majuscule initiale, pour les titres.
pub fn month_title(month: u32) -> Option<String> {
    let name = month_name(month)?;
    let mut chars = name.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

fn month_from_name(raw: &str) -> Option<u32> {
    let lower = raw.to_lowercase();
    MONTHS_FR
        .iter()
        .position(|m| *m == lower)
        .and_then(|idx| u32::try_from(idx + 1).ok())
        .or_else(|| {
            MONTH_ALIASES
                .iter()
                .find(|(alias, _)| *alias == lower)
                .map(|(_, m)| *m)
        })
}

/// Tous les `weekday` entre le 1er du mois de départ et le dernier jour du mois de fin.
///
/// Mois de 1 à 12. Une plage inversée ou invalide donne une liste vide.
pub fn week_dates(
    start_month: u32,
    start_year: i32,
    end_month: u32,
    end_year: i32,
    weekday: Weekday,
) -> Vec<NaiveDate> {
    let Some(first_day) = NaiveDate::from_ymd_opt(start_year, start_month, 1) else {
        return Vec::new();
    };
    let Some(last_day) = last_day_of_month(end_year, end_month) else {
        return Vec::new();
    };
    if last_day < first_day {
        return Vec::new();
    }

    let offset = (7 + weekday.num_days_from_monday() - first_day.weekday().num_days_from_monday()) % 7;
    let mut current = first_day + Duration::days(i64::from(offset));
    let mut out = Vec::new();
    while current <= last_day {
        out.push(current);
        current += Duration::days(7);
    }
    out
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month.checked_add(1)?)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Libellé d'une semaine : « 7 février » (sans l'année).
pub fn date_label(date: NaiveDate) -> String {
    // month() est toujours dans 1..=12
    let month = MONTHS_FR[date.month0() as usize];
    format!("{} {}", date.day(), month)
}

/// Relit un libellé « <jour> <mois> » pour une année donnée.
///
/// L'année n'étant pas dans le libellé, c'est à l'appelant de la fournir.
/// Retourne `None` si le libellé est mal formé ou la date impossible.
pub fn parse_date_label(label: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = label.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_from_name(parts.next()?)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Accepte `samedi`, `saturday`, `sat`, ou un index 0-6 (0 = dimanche).
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let raw = raw.trim().to_lowercase();
    if let Ok(idx) = raw.parse::<u8>() {
        return match idx {
            0 => Some(Weekday::Sun),
            1 => Some(Weekday::Mon),
            2 => Some(Weekday::Tue),
            3 => Some(Weekday::Wed),
            4 => Some(Weekday::Thu),
            5 => Some(Weekday::Fri),
            6 => Some(Weekday::Sat),
            _ => None,
        };
    }
    match raw.as_str() {
        "dimanche" => Some(Weekday::Sun),
        "lundi" => Some(Weekday::Mon),
        "mardi" => Some(Weekday::Tue),
        "mercredi" => Some(Weekday::Wed),
        "jeudi" => Some(Weekday::Thu),
        "vendredi" => Some(Weekday::Fri),
        "samedi" => Some(Weekday::Sat),
        other => other.parse().ok(),
    }
}
