use crate::calendar::month_title;

/// Titre d'un horaire : « Février - Mars 2026 » ou « Novembre - Février 2026 - 2027 ».
///
/// Un mois hors 1..=12 est rendu par son numéro.
pub fn schedule_title(start_month: u32, start_year: i32, end_month: u32, end_year: i32) -> String {
    let start = month_title(start_month).unwrap_or_else(|| start_month.to_string());
    let end = month_title(end_month).unwrap_or_else(|| end_month.to_string());
    let years = if start_year == end_year {
        start_year.to_string()
    } else {
        format!("{start_year} - {end_year}")
    };
    format!("{start} - {end} {years}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn single_year() {
        assert_snapshot!(schedule_title(2, 2026, 3, 2026), @"Février - Mars 2026");
    }

    #[test]
    fn spans_new_year() {
        assert_snapshot!(schedule_title(11, 2026, 2, 2027), @"Novembre - Février 2026 - 2027");
    }

    #[test]
    fn same_month() {
        assert_eq!(schedule_title(1, 2026, 1, 2026), "Janvier - Janvier 2026");
    }
}
