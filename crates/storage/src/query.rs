//! Aggregate query templates over the `rides` table.
//!
//! An [`AggregateQuery`] is a grouping shape plus an optional station filter.
//! The SQL text and the positional bind list are both generated here so they
//! can be checked without a database.

use rides_common::{BoundingBox, COUNT_COLUMN};

/// A grouping dimension extracted from a ride's start time (or membership).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Year,
    Month,
    Week,
    Day,
    DayOfYear,
    Hour,
    Membership,
}

/// How the store should decode a dimension column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
}

impl Dimension {
    /// Output column name. Day-of-year is reported under `day`.
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::Week => "week",
            Dimension::Day | Dimension::DayOfYear => "day",
            Dimension::Hour => "hour",
            Dimension::Membership => "membership",
        }
    }

    /// SQL expression producing this dimension.
    pub fn expression(&self) -> &'static str {
        match self {
            Dimension::Year => "extract(year from start_time)::int",
            Dimension::Month => "extract(month from start_time)::int",
            Dimension::Week => "extract(week from start_time)::int",
            Dimension::Day => "extract(day from start_time)::int",
            Dimension::DayOfYear => "extract(doy from start_time)::int",
            Dimension::Hour => "date_part('hour', start_time)::int",
            Dimension::Membership => "membership",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Dimension::Membership => ColumnKind::Text,
            _ => ColumnKind::Integer,
        }
    }
}

/// The fixed set of grouping shapes the API answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grouping {
    Total,
    Year,
    YearMonth,
    Hour,
    YearMonthDay,
    YearDayOfYear,
    YearWeekMembership,
    YearMonthMembership,
}

impl Grouping {
    /// Grouping columns in sort order.
    pub fn dimensions(&self) -> &'static [Dimension] {
        use Dimension::*;
        match self {
            Grouping::Total => &[],
            Grouping::Year => &[Year],
            Grouping::YearMonth => &[Year, Month],
            Grouping::Hour => &[Hour],
            Grouping::YearMonthDay => &[Year, Month, Day],
            Grouping::YearDayOfYear => &[Year, DayOfYear],
            Grouping::YearWeekMembership => &[Year, Week, Membership],
            Grouping::YearMonthMembership => &[Year, Month, Membership],
        }
    }
}

/// Station predicate applied to a query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StationFilter {
    #[default]
    Unfiltered,
    /// Ride starts strictly inside the box.
    Start(BoundingBox),
    /// Ride starts strictly inside the first box and ends strictly inside the second.
    StartAndEnd(BoundingBox, BoundingBox),
}

impl StationFilter {
    /// WHERE clause body, or `None` for an unfiltered query.
    pub fn predicate(&self) -> Option<String> {
        match self {
            StationFilter::Unfiltered => None,
            StationFilter::Start(_) => Some(box_predicate("start", 1)),
            StationFilter::StartAndEnd(_, _) => Some(format!(
                "{} AND {}",
                box_predicate("start", 1),
                box_predicate("end", 5)
            )),
        }
    }

    /// Whether a ride with these `(lat, lon)` endpoints passes the filter.
    /// Agrees with [`StationFilter::predicate`]: box edges are excluded.
    pub fn matches(&self, start: (f64, f64), end: (f64, f64)) -> bool {
        match self {
            StationFilter::Unfiltered => true,
            StationFilter::Start(start_box) => start_box.contains(start.0, start.1),
            StationFilter::StartAndEnd(start_box, end_box) => {
                start_box.contains(start.0, start.1) && end_box.contains(end.0, end.1)
            }
        }
    }

    /// Bind values in placeholder order: start box, then end box.
    pub fn binds(&self) -> Vec<f64> {
        match self {
            StationFilter::Unfiltered => Vec::new(),
            StationFilter::Start(start) => start.bind_values().to_vec(),
            StationFilter::StartAndEnd(start, end) => start
                .bind_values()
                .into_iter()
                .chain(end.bind_values())
                .collect(),
        }
    }
}

fn box_predicate(prefix: &str, first: usize) -> String {
    format!(
        "{p}_lat > ${} AND {p}_lat < ${} AND {p}_lon > ${} AND {p}_lon < ${}",
        first,
        first + 1,
        first + 2,
        first + 3,
        p = prefix
    )
}

/// A grouped count over rides, optionally restricted to station(s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateQuery {
    pub grouping: Grouping,
    pub filter: StationFilter,
}

impl AggregateQuery {
    /// Unfiltered query over every ride.
    pub fn global(grouping: Grouping) -> Self {
        Self {
            grouping,
            filter: StationFilter::Unfiltered,
        }
    }

    /// Rides starting at one station.
    pub fn station(grouping: Grouping, bbox: BoundingBox) -> Self {
        Self {
            grouping,
            filter: StationFilter::Start(bbox),
        }
    }

    /// Rides starting at one station and ending at another.
    pub fn between(grouping: Grouping, start: BoundingBox, end: BoundingBox) -> Self {
        Self {
            grouping,
            filter: StationFilter::StartAndEnd(start, end),
        }
    }

    pub fn dimensions(&self) -> &'static [Dimension] {
        self.grouping.dimensions()
    }

    /// Render the SQL text for this query.
    pub fn sql(&self) -> String {
        let dims = self.dimensions();

        let mut select: Vec<String> = dims
            .iter()
            .map(|d| format!("{} AS {}", d.expression(), d.column()))
            .collect();
        select.push(format!("COUNT(*) AS {}", COUNT_COLUMN));

        let mut sql = format!("SELECT {} FROM rides", select.join(", "));

        if let Some(predicate) = self.filter.predicate() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }

        if !dims.is_empty() {
            let columns: Vec<&str> = dims.iter().map(|d| d.column()).collect();
            let columns = columns.join(", ");
            sql.push_str(&format!(" GROUP BY {0} ORDER BY {0}", columns));
        }

        sql
    }

    pub fn binds(&self) -> Vec<f64> {
        self.filter.binds()
    }
}
