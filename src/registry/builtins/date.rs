//! Date builtins (§4.B "date"). Dates are represented as millisecond Unix
//! timestamps, the same numeric currency the surface language's own `Date`
//! arithmetic uses, so they compose with the rest of the numeric builtins
//! without a dedicated `Value` variant.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::value::Value;

use super::super::{ArgType, Category, FunctionRegistry, SafeFunction};

fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis as i64).single()
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(SafeFunction::new("Date.now", Category::Date, 0, Some(0), |_args| {
        Ok(Value::Number(Utc::now().timestamp_millis() as f64))
    }));

    registry.register(SafeFunction::new("Date.today", Category::Date, 0, Some(0), |_args| {
        Ok(Value::String(Utc::now().format("%Y-%m-%d").to_string()))
    }));

    registry.register(
        SafeFunction::new("Date.parse", Category::Date, 1, Some(1), |args| {
            let text = args[0].as_str().ok_or_else(|| format!("expected a string, got {}", args[0].type_name()))?;
            let millis = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
                .map(|naive| Utc.from_utc_datetime(&naive).timestamp_millis() as f64)
                .unwrap_or(f64::NAN);
            Ok(Value::Number(millis))
        })
        .with_type_checks(vec![ArgType::String]),
    );

    registry.register(SafeFunction::new("Date.addDays", Category::Date, 2, Some(2), |args| {
        let base = millis_to_datetime(args[0].to_number()).ok_or_else(|| "invalid timestamp".to_owned())?;
        let shifted = base + Duration::days(args[1].to_number() as i64);
        Ok(Value::Number(shifted.timestamp_millis() as f64))
    }));

    registry.register(SafeFunction::new("Date.diffDays", Category::Date, 2, Some(2), |args| {
        let a = millis_to_datetime(args[0].to_number()).ok_or_else(|| "invalid timestamp".to_owned())?;
        let b = millis_to_datetime(args[1].to_number()).ok_or_else(|| "invalid timestamp".to_owned())?;
        Ok(Value::Number((a - b).num_days() as f64))
    }));
}
