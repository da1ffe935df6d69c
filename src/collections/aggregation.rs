//! collections::aggregation — reduction to coarser densities.
//!
//! Purpose
//! -------
//! Group hourly values by day, month or month-hour (and daily values by
//! month) and reduce each group to one value, producing the next coarser
//! collection density.
//!
//! Key behaviors
//! -------------
//! - [`HourlyAggregation`] is implemented for every collection keyed by
//!   [`DateTime`] (continuous or not, mutable or not);
//!   [`DailyAggregation`] for every collection keyed by day of year.
//! - `group_by_*` return ordered `(key, values)` pairs: first every key the
//!   header period covers (possibly with no values), then any key found in
//!   the data but outside the period, in encounter order.
//! - `average_*`, `total_*` and `percentile_*` drop empty groups and tag
//!   the result's metadata with `"statistical operation"` =
//!   `"Average"`, `"Total"` or `"<p> Percentile"`.
//!
//! Conventions
//! -----------
//! - Results are mutable, keep the data type, unit and period of the
//!   source and are not marked as validated.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use ndarray::Array1;
use statrs::statistics::Statistics;

use crate::calendar::DateTime;
use crate::calendar::datetime::MINUTES_PER_DAY;
use crate::collections::base::BaseCollection;
use crate::collections::discontinuous::{
    Collection, DailyCollection, MonthlyCollection, MonthlyPerHourCollection,
};
use crate::collections::errors::{CollectionError, CollectionResult};
use crate::collections::header::Header;
use crate::collections::keys::TimeKey;
use crate::collections::mutability::Mutable;
use crate::collections::statistics;

const STATISTICAL_OPERATION: &str = "statistical operation";

/// Reductions of hourly and sub-hourly collections.
pub trait HourlyAggregation: BaseCollection<Key = DateTime> {
    /// Values per day of year.
    fn group_by_day(&self) -> Vec<(u16, Vec<f64>)> {
        let order = self.header().analysis_period().doys_int();
        group_values(self.keys(), self.values(), order, |dt| dt.doy() as u16)
    }

    /// Values per month.
    fn group_by_month(&self) -> Vec<(u8, Vec<f64>)> {
        let order = self.header().analysis_period().months_int();
        group_values(self.keys(), self.values(), order, |dt| dt.month() as u8)
    }

    /// Values per `(month, hour)`.
    fn group_by_month_per_hour(&self) -> Vec<((u8, u8), Vec<f64>)> {
        let order = self.header().analysis_period().months_per_hour();
        group_values(self.keys(), self.values(), order, |dt| (dt.month() as u8, dt.hour() as u8))
    }

    fn average_daily(&self) -> CollectionResult<DailyCollection> {
        reduce_groups(self.header(), self.group_by_day(), Reduction::Average)
    }

    fn total_daily(&self) -> CollectionResult<DailyCollection> {
        reduce_groups(self.header(), self.group_by_day(), Reduction::Total)
    }

    fn percentile_daily(&self, percentile: f64) -> CollectionResult<DailyCollection> {
        reduce_groups(self.header(), self.group_by_day(), Reduction::Percentile(percentile))
    }

    fn average_monthly(&self) -> CollectionResult<MonthlyCollection> {
        reduce_groups(self.header(), self.group_by_month(), Reduction::Average)
    }

    fn total_monthly(&self) -> CollectionResult<MonthlyCollection> {
        reduce_groups(self.header(), self.group_by_month(), Reduction::Total)
    }

    fn percentile_monthly(&self, percentile: f64) -> CollectionResult<MonthlyCollection> {
        reduce_groups(self.header(), self.group_by_month(), Reduction::Percentile(percentile))
    }

    fn average_monthly_per_hour(&self) -> CollectionResult<MonthlyPerHourCollection> {
        reduce_groups(self.header(), self.group_by_month_per_hour(), Reduction::Average)
    }

    fn total_monthly_per_hour(&self) -> CollectionResult<MonthlyPerHourCollection> {
        reduce_groups(self.header(), self.group_by_month_per_hour(), Reduction::Total)
    }

    fn percentile_monthly_per_hour(
        &self, percentile: f64,
    ) -> CollectionResult<MonthlyPerHourCollection> {
        let groups = self.group_by_month_per_hour();
        reduce_groups(self.header(), groups, Reduction::Percentile(percentile))
    }
}

impl<C: BaseCollection<Key = DateTime>> HourlyAggregation for C {}

/// Reductions of daily collections to months.
pub trait DailyAggregation: BaseCollection<Key = u16> {
    /// Values per month, using the header period's leap flag to place days.
    fn group_by_month(&self) -> Vec<(u8, Vec<f64>)> {
        let period = self.header().analysis_period();
        let leap_year = period.is_leap_year();
        group_values(self.keys(), self.values(), period.months_int(), |&doy| {
            let moy = u32::from(doy).saturating_sub(1) * MINUTES_PER_DAY;
            DateTime::from_moy_in_year(moy, leap_year).month() as u8
        })
    }

    fn average_monthly(&self) -> CollectionResult<MonthlyCollection> {
        reduce_groups(self.header(), self.group_by_month(), Reduction::Average)
    }

    fn total_monthly(&self) -> CollectionResult<MonthlyCollection> {
        reduce_groups(self.header(), self.group_by_month(), Reduction::Total)
    }

    fn percentile_monthly(&self, percentile: f64) -> CollectionResult<MonthlyCollection> {
        reduce_groups(self.header(), self.group_by_month(), Reduction::Percentile(percentile))
    }
}

impl<C: BaseCollection<Key = u16>> DailyAggregation for C {}

#[derive(Debug, Clone, Copy)]
enum Reduction {
    Average,
    Total,
    Percentile(f64),
}

impl Reduction {
    fn label(self) -> String {
        match self {
            Reduction::Average => "Average".to_string(),
            Reduction::Total => "Total".to_string(),
            Reduction::Percentile(p) => format!("{p} Percentile"),
        }
    }

    fn apply(self, bucket: &[f64]) -> CollectionResult<f64> {
        match self {
            Reduction::Average => Ok(Statistics::mean(bucket.iter())),
            Reduction::Total => Ok(bucket.iter().sum()),
            Reduction::Percentile(p) => statistics::percentile(bucket, p),
        }
    }
}

/// Bucket `values` by `key_of`, seeding the bucket order with `order`.
fn group_values<K, G>(
    keys: &[K], values: &Array1<f64>, order: Vec<G>, key_of: impl Fn(&K) -> G,
) -> Vec<(G, Vec<f64>)>
where
    G: Copy + Eq + Hash,
{
    let mut slots: HashMap<G, usize> = HashMap::with_capacity(order.len());
    let mut groups: Vec<(G, Vec<f64>)> = Vec::with_capacity(order.len());
    for group in order {
        if let Entry::Vacant(slot) = slots.entry(group) {
            slot.insert(groups.len());
            groups.push((group, Vec::new()));
        }
    }
    for (key, &value) in keys.iter().zip(values.iter()) {
        let group = key_of(key);
        let slot = *slots.entry(group).or_insert_with(|| {
            groups.push((group, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value);
    }
    groups
}

fn reduce_groups<G: TimeKey>(
    header: &Header, groups: Vec<(G, Vec<f64>)>, reduction: Reduction,
) -> CollectionResult<Collection<G, Mutable>> {
    if let Reduction::Percentile(p) = reduction {
        if !(0.0..=100.0).contains(&p) {
            return Err(CollectionError::InvalidPercentile(p));
        }
    }
    let mut keys = Vec::with_capacity(groups.len());
    let mut values = Vec::with_capacity(groups.len());
    for (group, bucket) in groups.into_iter().filter(|(_, bucket)| !bucket.is_empty()) {
        values.push(reduction.apply(&bucket)?);
        keys.push(group);
    }
    let mut header = header.duplicate();
    header.metadata_mut().insert(STATISTICAL_OPERATION.to_string(), reduction.label());
    Collection::new(header, values, keys)
}
