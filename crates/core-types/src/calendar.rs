use chrono::{Datelike, Month, NaiveDate};

/// The twelve months in calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Resolves a full English month name. Matching is exact and case-sensitive,
/// so "january" and "Jan" are not months.
pub fn month_from_name(name: &str) -> Option<Month> {
    MONTHS.iter().copied().find(|m| m.name() == name)
}

/// Returns the month for a 1-based month number.
pub fn month_from_number(number: u32) -> Option<Month> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// Calendar quarter (1-4) of a 1-based month number.
pub fn quarter_of(month: u32) -> u32 {
    (month + 2) / 3
}

/// The (year, month, quarter, month) calendar fields derived from a date.
pub fn derive_fields(date: NaiveDate) -> (i32, u32, u32, Month) {
    let month = date.month();
    // `month()` is always within 1..=12 for a valid date.
    let month_name = MONTHS[(month - 1) as usize];
    (date.year(), month, quarter_of(month), month_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_case_sensitive() {
        assert_eq!(month_from_name("March"), Some(Month::March));
        assert_eq!(month_from_name("march"), None);
        assert_eq!(month_from_name("Mar"), None);
    }

    #[test]
    fn quarters_follow_calendar() {
        let quarters: Vec<u32> = (1..=12).map(quarter_of).collect();
        assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn month_numbers_outside_range_are_rejected() {
        assert_eq!(month_from_number(0), None);
        assert_eq!(month_from_number(13), None);
        assert_eq!(month_from_number(12), Some(Month::December));
    }

    #[test]
    fn derive_fields_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        assert_eq!(derive_fields(date), (2024, 8, 3, Month::August));
    }
}
