//! Age derivation from birth dates.
//!
//! The evaluation date is always an explicit parameter -- nothing in this
//! module reads the system clock, so every caller (and every test) controls
//! "today".

use chrono::{Datelike, NaiveDate};

/// Date format accepted from form input (HTML `<input type="date">`).
pub const FORMATO_FECHA: &str = "%Y-%m-%d";

/// Whole years elapsed from `nacimiento` to `hoy`.
///
/// The count is decremented by one when the birthday has not yet occurred in
/// the evaluation year, so it increases by exactly 1 on each anniversary.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use padron_core::edad::edad_en;
///
/// let nacimiento = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
/// assert_eq!(edad_en(nacimiento, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), 23);
/// assert_eq!(edad_en(nacimiento, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 24);
/// ```
pub fn edad_en(nacimiento: NaiveDate, hoy: NaiveDate) -> i32 {
    let mut edad = hoy.year() - nacimiento.year();
    if (hoy.month(), hoy.day()) < (nacimiento.month(), nacimiento.day()) {
        edad -= 1;
    }
    edad
}

/// Age for a raw `fecha_nacimiento` form value, or `None` when the value is
/// absent or does not parse as a `%Y-%m-%d` date.
pub fn edad_actual(fecha_nacimiento: Option<&str>, hoy: NaiveDate) -> Option<i32> {
    let fecha = fecha_nacimiento?.trim();
    let nacimiento = NaiveDate::parse_from_str(fecha, FORMATO_FECHA).ok()?;
    Some(edad_en(nacimiento, hoy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_day_before_and_day_of_anniversary() {
        let nacimiento = d(2000, 6, 15);
        assert_eq!(edad_en(nacimiento, d(2024, 6, 14)), 23);
        assert_eq!(edad_en(nacimiento, d(2024, 6, 15)), 24);
        assert_eq!(edad_en(nacimiento, d(2024, 6, 16)), 24);
    }

    #[test]
    fn test_earlier_month_not_yet_birthday() {
        let nacimiento = d(1990, 12, 1);
        assert_eq!(edad_en(nacimiento, d(2024, 1, 31)), 33);
        assert_eq!(edad_en(nacimiento, d(2024, 12, 1)), 34);
    }

    #[test]
    fn test_leap_day_birthday() {
        let nacimiento = d(2004, 2, 29);
        // On non-leap years the birthday counts from March 1st.
        assert_eq!(edad_en(nacimiento, d(2025, 2, 28)), 20);
        assert_eq!(edad_en(nacimiento, d(2025, 3, 1)), 21);
        // On leap years it counts on the 29th itself.
        assert_eq!(edad_en(nacimiento, d(2024, 2, 28)), 19);
        assert_eq!(edad_en(nacimiento, d(2024, 2, 29)), 20);
    }

    #[test]
    fn test_monotonic_over_a_year() {
        // Non-decreasing day by day, +1 exactly on the anniversary.
        let nacimiento = d(2000, 6, 15);
        let mut hoy = d(2023, 6, 15);
        let mut anterior = edad_en(nacimiento, hoy);
        for _ in 0..366 {
            hoy = hoy.succ_opt().unwrap();
            let actual = edad_en(nacimiento, hoy);
            assert!(actual == anterior || actual == anterior + 1);
            if (hoy.month(), hoy.day()) == (6, 15) {
                assert_eq!(actual, anterior + 1);
            }
            anterior = actual;
        }
    }

    #[test]
    fn test_edad_actual_parses_form_value() {
        let hoy = d(2024, 6, 15);
        assert_eq!(edad_actual(Some("2000-06-15"), hoy), Some(24));
        assert_eq!(edad_actual(Some(" 2000-06-16 "), hoy), Some(23));
    }

    #[test]
    fn test_edad_actual_none_for_missing_or_garbage() {
        let hoy = d(2024, 6, 15);
        assert_eq!(edad_actual(None, hoy), None);
        assert_eq!(edad_actual(Some(""), hoy), None);
        assert_eq!(edad_actual(Some("not-a-date"), hoy), None);
        assert_eq!(edad_actual(Some("15/06/2000"), hoy), None);
    }
}
