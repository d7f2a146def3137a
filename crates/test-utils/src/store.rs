//! In-memory `RideStore` that records every query.
//!
//! Aggregates are either canned rows per grouping, or counted from a list of
//! [`Ride`]s filtered through the query's station predicate.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use rides_common::{AggregateRow, GroupValue, RidesError, RidesResult, COUNT_COLUMN};
use storage::{AggregateQuery, Grouping, RideStore};

/// One ride: start and end `(lat, lon)` plus its grouping column values.
#[derive(Debug, Clone)]
pub struct Ride {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub columns: AggregateRow,
}

impl Ride {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start,
            end,
            columns: AggregateRow::new(),
        }
    }

    /// Set a grouping column such as `year` or `membership`.
    pub fn with(mut self, column: &str, value: impl Into<GroupValue>) -> Self {
        self.columns.set(column, value);
        self
    }
}

#[derive(Default)]
pub struct RecordingStore {
    responses: HashMap<Grouping, Vec<AggregateRow>>,
    rides: Option<Vec<Ride>>,
    example: Option<Value>,
    locations: Vec<Value>,
    fail_with: Option<String>,
    issued: Mutex<Vec<AggregateQuery>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for every query with this grouping.
    pub fn with_rows(mut self, grouping: Grouping, rows: Vec<AggregateRow>) -> Self {
        self.responses.insert(grouping, rows);
        self
    }

    /// Count aggregates from these rides instead of canned rows.
    pub fn with_rides(mut self, rides: Vec<Ride>) -> Self {
        self.rides = Some(rides);
        self
    }

    pub fn with_example(mut self, ride: Value) -> Self {
        self.example = Some(ride);
        self
    }

    pub fn with_locations(mut self, rides: Vec<Value>) -> Self {
        self.locations = rides;
        self
    }

    /// Fail every call with a query failure.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Aggregate queries issued so far.
    pub fn issued(&self) -> Vec<AggregateQuery> {
        self.issued.lock().unwrap().clone()
    }

    /// Group the rides passing the filter by the query's columns, in
    /// first-seen order. Counts come back as text, like `COUNT(*)::text`.
    fn count_rides(rides: &[Ride], query: &AggregateQuery) -> Vec<AggregateRow> {
        let columns: Vec<&str> = query.dimensions().iter().map(|d| d.column()).collect();
        let mut groups: Vec<(Vec<GroupValue>, usize)> = Vec::new();

        for ride in rides {
            if !query.filter.matches(ride.start, ride.end) {
                continue;
            }
            let key: Vec<GroupValue> = columns
                .iter()
                .map(|column| ride.columns.get(column).clone())
                .collect();
            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, count)) => *count += 1,
                None => groups.push((key, 1)),
            }
        }

        // COUNT(*) without GROUP BY still yields one row.
        if columns.is_empty() && groups.is_empty() {
            groups.push((Vec::new(), 0));
        }

        groups
            .into_iter()
            .map(|(key, count)| {
                let mut row = AggregateRow::new();
                for (column, value) in columns.iter().zip(key) {
                    row.set(*column, value);
                }
                row.set(COUNT_COLUMN, count.to_string());
                row
            })
            .collect()
    }

    fn check(&self) -> RidesResult<()> {
        match &self.fail_with {
            Some(message) => Err(RidesError::QueryFailure(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RideStore for RecordingStore {
    async fn aggregate(&self, query: &AggregateQuery) -> RidesResult<Vec<AggregateRow>> {
        self.issued.lock().unwrap().push(*query);
        self.check()?;
        if let Some(rides) = &self.rides {
            return Ok(Self::count_rides(rides, query));
        }
        Ok(self
            .responses
            .get(&query.grouping)
            .cloned()
            .unwrap_or_default())
    }

    async fn example_ride(&self) -> RidesResult<Option<Value>> {
        self.check()?;
        Ok(self.example.clone())
    }

    async fn locations_and_times(&self) -> RidesResult<Vec<Value>> {
        self.check()?;
        Ok(self.locations.clone())
    }

    async fn ping(&self) -> RidesResult<()> {
        self.check()
    }
}
