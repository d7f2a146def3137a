//! Reshaping of flat aggregate rows into nested, period-keyed counts.
//!
//! Every function here is pure. Rows are expected to arrive already sorted
//! by their grouping tuple; nothing in this module re-sorts. A row whose
//! leading key (`year`, or the sole period for [`by_period`]) is null is an
//! incomplete bucket and is dropped before its count is looked at.
//!
//! Object key order in the output carries no meaning. The one ordered shape
//! is the per-year month sequence produced by [`by_year_and_month`].

use std::collections::BTreeMap;

use crate::error::{RidesError, RidesResult};
use crate::row::{AggregateRow, GroupValue};

/// `{period: count}`
pub type PeriodCounts = BTreeMap<String, u64>;

/// `{year: [{month: count}, ...]}`
pub type YearMonthSeries = BTreeMap<String, Vec<PeriodCounts>>;

/// `{year: {period: count}}`
pub type YearPeriodCounts = BTreeMap<String, PeriodCounts>;

/// `{year: {period: {key: count}}}`
pub type YearPeriodBreakdown = BTreeMap<String, BTreeMap<String, PeriodCounts>>;

/// Key used for a null value below the leading level.
const NULL_KEY: &str = "null";

/// Parse a store count into an integer.
pub fn parse_count(row: &AggregateRow) -> RidesResult<u64> {
    match row.count() {
        GroupValue::Int(v) if *v >= 0 => Ok(*v as u64),
        GroupValue::Float(v) if *v >= 0.0 && v.fract() == 0.0 && v.is_finite() => Ok(*v as u64),
        GroupValue::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse::<u64>().map_err(|_| {
                RidesError::MalformedAggregateRow(format!("count out of range: {:?}", s))
            })
        }
        GroupValue::Null => Err(RidesError::MalformedAggregateRow(
            "count is missing".to_string(),
        )),
        other => Err(RidesError::MalformedAggregateRow(format!(
            "count is not a non-negative integer: {:?}",
            other
        ))),
    }
}

/// Count of an ungrouped `COUNT(*)` result.
pub fn total_count(rows: &[AggregateRow]) -> RidesResult<u64> {
    match rows {
        [row] => parse_count(row),
        _ => Err(RidesError::MalformedAggregateRow(format!(
            "expected exactly one total row, got {}",
            rows.len()
        ))),
    }
}

fn inner_key(row: &AggregateRow, column: &str) -> String {
    row.get(column)
        .as_key()
        .unwrap_or_else(|| NULL_KEY.to_string())
}

/// Rows with a non-null `leading` column, paired with that key.
fn complete_rows<'a>(
    rows: &'a [AggregateRow],
    leading: &'a str,
) -> impl Iterator<Item = (String, &'a AggregateRow)> + 'a {
    rows.iter()
        .filter_map(move |row| row.get(leading).as_key().map(|key| (key, row)))
}

/// `{period: count}` for a single grouping column.
pub fn by_period(rows: &[AggregateRow], period: &str) -> RidesResult<PeriodCounts> {
    let mut result = PeriodCounts::new();
    for (key, row) in complete_rows(rows, period) {
        result.insert(key, parse_count(row)?);
    }
    Ok(result)
}

/// `{year: [{month: count}, ...]}` keeping row order within each year.
pub fn by_year_and_month(rows: &[AggregateRow]) -> RidesResult<YearMonthSeries> {
    let mut result = YearMonthSeries::new();
    for (year, row) in complete_rows(rows, "year") {
        let entry = PeriodCounts::from([(inner_key(row, "month"), parse_count(row)?)]);
        result.entry(year).or_default().push(entry);
    }
    Ok(result)
}

/// `{year: {month: {day: count}}}`
pub fn by_year_and_month_and_day(rows: &[AggregateRow]) -> RidesResult<YearPeriodBreakdown> {
    nest_three(rows, "month", "day")
}

/// `{year: {day_of_year: count}}`. The store names the day-of-year column `day`.
pub fn by_year_and_day_of_year(rows: &[AggregateRow]) -> RidesResult<YearPeriodCounts> {
    let mut result = YearPeriodCounts::new();
    for (year, row) in complete_rows(rows, "year") {
        result
            .entry(year)
            .or_default()
            .insert(inner_key(row, "day"), parse_count(row)?);
    }
    Ok(result)
}

/// `{year: {month: {membership: count}}}`
pub fn memberships_by_year_and_month(rows: &[AggregateRow]) -> RidesResult<YearPeriodBreakdown> {
    nest_three(rows, "month", "membership")
}

/// `{year: {week: {membership: count}}}`
pub fn memberships_by_year_and_week(rows: &[AggregateRow]) -> RidesResult<YearPeriodBreakdown> {
    nest_three(rows, "week", "membership")
}

fn nest_three(rows: &[AggregateRow], period: &str, leaf: &str) -> RidesResult<YearPeriodBreakdown> {
    let mut result = YearPeriodBreakdown::new();
    for (year, row) in complete_rows(rows, "year") {
        result
            .entry(year)
            .or_default()
            .entry(inner_key(row, period))
            .or_default()
            .insert(inner_key(row, leaf), parse_count(row)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<AggregateRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_by_period_drops_null_periods() {
        let input = rows(json!([
            {"year": 2019, "count": "429"},
            {"year": 2020, "count": "231"},
            {"year": null, "count": "17"},
        ]));

        let result = by_period(&input, "year").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result["2019"], 429);
        assert_eq!(result["2020"], 231);
    }

    #[test]
    fn test_by_period_hour() {
        let input = rows(json!([
            {"hour": 0, "count": 12},
            {"hour": 23.0, "count": "40"},
        ]));

        let result = by_period(&input, "hour").unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"0": 12, "23": 40}));
    }

    #[test]
    fn test_by_year_and_month_example() {
        let input = rows(json!([
            {"year": 2020, "month": 1, "count": "5"},
            {"year": 2020, "month": 2, "count": "3"},
            {"year": null, "month": 1, "count": "9"},
        ]));

        let result = by_year_and_month(&input).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"2020": [{"1": 5}, {"2": 3}]})
        );
    }

    #[test]
    fn test_by_year_and_month_preserves_row_order() {
        let input = rows(json!([
            {"year": 2020, "month": 11, "count": "1"},
            {"year": 2021, "month": 1, "count": "7"},
            {"year": 2020, "month": 2, "count": "2"},
        ]));

        let result = by_year_and_month(&input).unwrap();
        let months: Vec<_> = result["2020"]
            .iter()
            .flat_map(|entry| entry.keys().cloned())
            .collect();
        assert_eq!(months, vec!["11", "2"]);
        assert_eq!(result["2021"], vec![PeriodCounts::from([("1".to_string(), 7)])]);
    }

    #[test]
    fn test_by_year_and_month_and_day() {
        let input = rows(json!([
            {"year": 2020, "month": 1, "day": 1, "count": "300"},
            {"year": 2020, "month": 1, "day": 31, "count": "700"},
            {"year": 2020, "month": 2, "day": 1, "count": "900"},
            {"year": 2021, "month": 1, "day": 1, "count": "30"},
        ]));

        let result = by_year_and_month_and_day(&input).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "2020": {"1": {"1": 300, "31": 700}, "2": {"1": 900}},
                "2021": {"1": {"1": 30}},
            })
        );
    }

    #[test]
    fn test_by_year_and_day_of_year() {
        let input = rows(json!([
            {"year": 2020, "day": 1, "count": "300"},
            {"year": 2020, "day": 365, "count": "543"},
            {"year": null, "day": 2, "count": "1"},
        ]));

        let result = by_year_and_day_of_year(&input).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"2020": {"1": 300, "365": 543}})
        );
    }

    #[test]
    fn test_memberships_by_year_and_week_example() {
        let input = rows(json!([
            {"year": 2021, "week": 3, "membership": "Annual", "count": "10"},
            {"year": 2021, "week": 3, "membership": "Monthly", "count": "4"},
        ]));

        let result = memberships_by_year_and_week(&input).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"2021": {"3": {"Annual": 10, "Monthly": 4}}})
        );
    }

    #[test]
    fn test_memberships_contain_exactly_input_categories() {
        let input = rows(json!([
            {"year": 2021, "month": 1, "membership": "Annual", "count": "10"},
            {"year": 2021, "month": 1, "membership": "Walk-up", "count": "2"},
            {"year": 2021, "month": 2, "membership": "Monthly", "count": "6"},
        ]));

        let result = memberships_by_year_and_month(&input).unwrap();
        let january: Vec<_> = result["2021"]["1"].keys().cloned().collect();
        let february: Vec<_> = result["2021"]["2"].keys().cloned().collect();
        assert_eq!(january, vec!["Annual", "Walk-up"]);
        assert_eq!(february, vec!["Monthly"]);
    }

    #[test]
    fn test_null_inner_key_is_kept() {
        let input = rows(json!([
            {"year": 2021, "week": 3, "membership": null, "count": "1"},
        ]));

        let result = memberships_by_year_and_week(&input).unwrap();
        assert_eq!(result["2021"]["3"]["null"], 1);
    }

    #[test]
    fn test_null_leading_rows_skip_count_parsing() {
        // The incomplete bucket is dropped before its count is examined.
        let input = rows(json!([
            {"year": null, "month": 1, "count": "garbage"},
            {"year": 2020, "month": 1, "count": "1"},
        ]));

        assert!(by_year_and_month(&input).is_ok());
        assert!(by_year_and_month_and_day(&input).is_ok());
        assert!(by_period(&input, "year").is_ok());
    }

    #[test]
    fn test_exclusion_is_idempotent() {
        let input = rows(json!([
            {"year": 2020, "count": "5"},
            {"year": null, "count": "9"},
        ]));

        let once = by_period(&input, "year").unwrap();
        let twice = by_period(&input, "year").unwrap();
        assert_eq!(once, twice);
        assert!(!once.contains_key("null"));
    }

    #[test]
    fn test_malformed_count_fails() {
        for count in [
            json!("abc"),
            json!(null),
            json!(-1),
            json!("-3"),
            json!(1.5),
            json!("+5"),
            json!(" 5"),
            json!(""),
        ] {
            let input = rows(json!([{"year": 2020, "count": count}]));
            assert!(
                matches!(by_period(&input, "year"), Err(RidesError::MalformedAggregateRow(_))),
                "count {} should be rejected",
                count
            );
        }

        let missing = vec![AggregateRow::new().with("year", 2020)];
        assert!(matches!(
            by_year_and_day_of_year(&missing),
            Err(RidesError::MalformedAggregateRow(_))
        ));
    }

    #[test]
    fn test_total_count() {
        let single = rows(json!([{"count": "1234"}]));
        assert_eq!(total_count(&single).unwrap(), 1234);

        assert!(total_count(&[]).is_err());
    }
}
