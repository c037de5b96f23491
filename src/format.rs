use chrono::{Datelike, NaiveDate};

use crate::models::BillStatus;

// Three-letter French month abbreviations, capitalized.
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Format an ISO `YYYY-MM-DD` date as e.g. `4 Avr. 04`.
pub fn format_date(raw: &str) -> Result<String, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")?;
    let month = MONTHS[date.month0() as usize];
    let year = date.year().rem_euclid(100);

    Ok(format!("{} {}. {:02}", date.day(), month, year))
}

/// Display label for a raw status value. Unknown values are shown as-is.
pub fn format_status(raw: &str) -> String {
    match BillStatus::parse(raw) {
        Some(status) => status.label().to_string(),
        None => raw.to_string(),
    }
}
