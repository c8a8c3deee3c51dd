use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::errors::DataError;

pub fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Timestamp columns hold UTC wall-clock time without an offset.
pub fn to_primitive_utc(value: OffsetDateTime) -> Result<PrimitiveDateTime, DataError> {
    let utc = value
        .checked_to_offset(UtcOffset::UTC)
        .ok_or_else(|| DataError::validation(format!("timestamp {value} is out of range in UTC")))?;
    Ok(PrimitiveDateTime::new(utc.date(), utc.time()))
}

pub fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn to_primitive_utc_shifts_offsets() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(13, 20, 30).unwrap();
        let offset = UtcOffset::from_hms(3, 0, 0).unwrap();
        let local = PrimitiveDateTime::new(date, time).assume_offset(offset);
        assert_eq!(format_primitive(to_primitive_utc(local).unwrap()), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn to_primitive_utc_rejects_dates_past_year_9999() {
        let local = OffsetDateTime::parse("9999-12-31T23:00:00-05:00", &Rfc3339).unwrap();
        let err = to_primitive_utc(local).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)), "{err:?}");
    }
}
