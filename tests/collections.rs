//! Integration tests for analysis periods and data collections.
//!
//! Purpose
//! -------
//! - Validate end-to-end workflows a caller runs against the public API:
//!   building headers and collections, computing statistics, filtering by
//!   pattern, period and statement, aggregating to days and months, and
//!   converting units and types.
//!
//! Coverage
//! --------
//! - `calendar::AnalysisPeriod`: annual and reversed periods feeding
//!   collection lengths.
//! - `collections::discontinuous` and `collections::continuous`:
//!   construction, statistics, immutability, pattern and period filters,
//!   serialization.
//! - `collections::aggregation`: daily and monthly reductions of hourly
//!   data.
//! - `collections::base`: statement filters across aligned collections,
//!   area normalization and time aggregation.
//!
//! Exclusions
//! ----------
//! - Unit-by-unit conversion tables and calendar edge cases; those are
//!   covered by unit tests next to each module.
//! - Python bindings.
use std::collections::BTreeMap;

use rust_datacollections::{
    calendar::{AnalysisPeriod, DateTime},
    collections::{
        BaseCollection, CollectionError, DailyAggregation, DailyCollection, Header,
        HourlyAggregation, HourlyCollection, HourlyContinuousCollection,
        HourlyDiscontinuousCollection, Mutable,
    },
    datatype::DataType,
};

fn period(
    st_month: u32, st_day: u32, st_hour: u32, end_month: u32, end_day: u32, end_hour: u32,
) -> AnalysisPeriod {
    AnalysisPeriod::new(st_month, st_day, st_hour, end_month, end_day, end_hour, 1, false)
        .expect("valid analysis period")
}

fn annual_temperature(values: Vec<f64>) -> HourlyContinuousCollection {
    let header = Header::with_base_unit(DataType::DryBulbTemperature, AnalysisPeriod::default());
    HourlyContinuousCollection::new(header, values).expect("annual collection")
}

/// Hour-of-day profile repeated over the whole year: 0, 1, …, 23 each day.
fn daily_ramp() -> Vec<f64> {
    (0..8760).map(|i| (i % 24) as f64).collect()
}

#[test]
// Purpose
// -------
// Exercise the smallest discontinuous workflow: two hourly values on a
// one-day, two-hour window.
//
// Given
// -----
// - Period 6/21 from hour 12 to hour 13.
// - Values [20, 25] keyed by the period's datetimes.
//
// Expect
// ------
// - Average 22.5, total 45, bounds (20, 25).
// - The collection reports the discontinuous hourly tag.
fn two_hour_window_statistics() {
    let period = period(6, 21, 12, 6, 21, 13);
    let keys = period.datetimes().to_vec();
    assert_eq!(keys.len(), 2);
    let header = Header::with_base_unit(DataType::DryBulbTemperature, period);
    let coll = HourlyDiscontinuousCollection::<Mutable>::new(header, vec![20.0, 25.0], keys)
        .expect("aligned values and keys");

    assert!((coll.average() - 22.5).abs() < 1e-12);
    assert!((coll.total() - 45.0).abs() < 1e-12);
    assert_eq!(coll.bounds(), (20.0, 25.0));
    assert!(!coll.is_continuous());
    assert_eq!(coll.class_name(), "HourlyDiscontinuousCollection");
}

#[test]
// Purpose
// -------
// Check that continuous collections take their length from the period and
// reject mismatched values.
//
// Given
// -----
// - The default annual period, a leap-year annual period and a reversed
//   December-to-January period.
//
// Expect
// ------
// - 8760, 8784 and 1488 samples respectively.
// - One value short of the period fails with `LengthMismatch`.
// - A period that does not span whole days fails with
//   `IncompatiblePeriod`.
fn continuous_length_follows_period() {
    let common = annual_temperature(vec![1.0; 8760]);
    assert_eq!(common.len(), 8760);

    let leap = AnalysisPeriod::annual(1, true).expect("leap annual");
    let header = Header::with_base_unit(DataType::DryBulbTemperature, leap);
    let leap_coll = HourlyContinuousCollection::<Mutable>::new(header, vec![1.0; 8784]).expect("leap");
    assert_eq!(leap_coll.len(), 8784);

    let reversed = period(12, 1, 0, 1, 31, 23);
    assert!(reversed.is_reversed());
    assert_eq!(reversed.len(), 31 * 24 + 31 * 24);
    let header = Header::with_base_unit(DataType::DryBulbTemperature, reversed.clone());
    let short = HourlyContinuousCollection::<Mutable>::new(header.clone(), vec![0.0; reversed.len() - 1]);
    assert!(matches!(short, Err(CollectionError::LengthMismatch { .. })));
    assert!(HourlyContinuousCollection::<Mutable>::new(header, vec![0.0; reversed.len()]).is_ok());

    let partial = period(1, 1, 8, 1, 2, 17);
    let header = Header::with_base_unit(DataType::DryBulbTemperature, partial.clone());
    let err = HourlyContinuousCollection::<Mutable>::new(header, vec![0.0; partial.len()]);
    assert!(matches!(err, Err(CollectionError::IncompatiblePeriod(_))));
}

#[test]
// Purpose
// -------
// Verify that a short pattern repeats over the collection and that the
// result is a discontinuous hourly collection.
//
// Given
// -----
// - A one-day continuous collection of 24 values.
// - Pattern [true, false].
//
// Expect
// ------
// - 12 values survive, the even hours.
fn filter_by_pattern_repeats_over_day() {
    let day = period(1, 1, 0, 1, 1, 23);
    let header = Header::with_base_unit(DataType::DryBulbTemperature, day);
    let coll = HourlyContinuousCollection::<Mutable>::new(header, (0..24).map(f64::from).collect::<Vec<_>>())
        .expect("one day");

    let filtered = coll.filter_by_pattern(&[true, false]).expect("non-empty result");
    assert_eq!(filtered.len(), 12);
    assert!(filtered.datetimes().iter().all(|dt| dt.hour() % 2 == 0));
    assert_eq!(filtered.values()[1], 2.0);
}

#[test]
// Purpose
// -------
// Confirm that immutable collections refuse in-place writes while their
// mutable copies accept them.
//
// Given
// -----
// - An annual continuous collection converted to immutable.
//
// Expect
// ------
// - `set`, `set_values` and `convert_to_unit` fail with `ImmutableWrite`.
// - `to_mutable` gives a copy where the same writes succeed and the
//   immutable original is unchanged.
fn immutable_rejects_writes() {
    let mut frozen = annual_temperature(vec![10.0; 8760]).to_immutable();
    assert!(!frozen.is_mutable());
    assert!(matches!(frozen.set(0, 1.0), Err(CollectionError::ImmutableWrite(_))));
    assert!(matches!(frozen.set_values(vec![0.0; 8760]), Err(CollectionError::ImmutableWrite(_))));
    assert!(matches!(frozen.convert_to_unit("F"), Err(CollectionError::ImmutableWrite(_))));

    let mut thawed = frozen.to_mutable();
    thawed.set(0, 1.0).expect("mutable write");
    thawed.convert_to_unit("F").expect("mutable conversion");
    assert_eq!(thawed.header().unit(), "F");
    assert!((thawed.values()[1] - 50.0).abs() < 1e-9);
    assert_eq!(frozen.values()[0], 10.0);
}

#[test]
// Purpose
// -------
// Aggregate an hourly year to days and months.
//
// Given
// -----
// - An annual collection with the 0..23 ramp repeated each day.
//
// Expect
// ------
// - 365 daily averages of 11.5 keyed 1..=365.
// - Daily totals of 276.
// - Monthly averages of the daily collection are 11.5 for all 12 months.
// - The statistical operation is recorded in the metadata.
fn hourly_to_daily_and_monthly() {
    let coll = annual_temperature(daily_ramp());

    let daily = coll.average_daily().expect("daily averages");
    assert_eq!(daily.len(), 365);
    assert_eq!(daily.doys().first(), Some(&1));
    assert_eq!(daily.doys().last(), Some(&365));
    assert!(daily.values().iter().all(|v| (v - 11.5).abs() < 1e-12));
    assert_eq!(
        daily.header().metadata().get("statistical operation").map(String::as_str),
        Some("Average")
    );

    let totals = coll.total_daily().expect("daily totals");
    assert!(totals.values().iter().all(|v| (v - 276.0).abs() < 1e-9));

    let monthly: rust_datacollections::collections::MonthlyCollection =
        DailyAggregation::average_monthly(&daily).expect("monthly from daily");
    assert_eq!(monthly.months(), &(1..=12).collect::<Vec<u8>>()[..]);
    assert!(monthly.values().iter().all(|v| (v - 11.5).abs() < 1e-12));

    let per_hour = coll.average_monthly_per_hour().expect("monthly per hour");
    assert_eq!(per_hour.len(), 12 * 24);
    assert_eq!(per_hour.values()[5], 5.0);
}

#[test]
// Purpose
// -------
// Filter aligned collections with a shared multi-variable statement.
//
// Given
// -----
// - Temperature ramp `a` and relative humidity `b` (constant 50 except
//   90 during hour 3).
// - Statement `"a > 1 and b < 80"`.
//
// Expect
// ------
// - Both results keep the same datetimes.
// - Hours 0, 1 and 3 are removed from every day.
fn statement_filters_aligned_collections() {
    let temp = annual_temperature(daily_ramp());
    let rh_values: Vec<f64> = (0..8760).map(|i| if i % 24 == 3 { 90.0 } else { 50.0 }).collect();
    let rh_header = Header::with_base_unit(DataType::RelativeHumidity, AnalysisPeriod::default());
    let rh = HourlyContinuousCollection::new(rh_header, rh_values).expect("humidity");

    let filtered = HourlyContinuousCollection::filter_collections_by_statement(
        &[&temp, &rh],
        "a > 1 and b < 80",
    )
    .expect("aligned inputs");
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0].len(), 365 * 21);
    assert_eq!(filtered[0].datetimes(), filtered[1].datetimes());
    assert!(filtered[0].datetimes().iter().all(|dt| ![0, 1, 3].contains(&dt.hour())));

    let bad = HourlyContinuousCollection::filter_collections_by_statement(&[&temp], "a > 1 and b");
    assert!(bad.is_err());
}

#[test]
// Purpose
// -------
// Reduce a continuous collection to a sub-period.
//
// Given
// -----
// - An annual collection filtered to March 1 through March 31 (whole days)
//   and to the daytime hours of the same month.
//
// Expect
// ------
// - Whole days stay continuous with 31 × 24 values.
// - The daytime window becomes discontinuous with 31 × 10 values.
fn filter_by_analysis_period_continuity() {
    let coll = annual_temperature(daily_ramp());

    match coll.filter_by_analysis_period(&period(3, 1, 0, 3, 31, 23)).expect("march") {
        HourlyCollection::Continuous(march) => {
            assert_eq!(march.len(), 31 * 24);
            assert_eq!(march.header().analysis_period().st_month(), 3);
        }
        HourlyCollection::Discontinuous(_) => panic!("whole-day period should stay continuous"),
    }

    let daytime = coll.filter_by_analysis_period(&period(3, 1, 8, 3, 31, 17)).expect("daytime");
    assert!(!daytime.is_continuous());
    assert_eq!(daytime.len(), 31 * 10);
    assert!(daytime.datetimes().iter().all(|dt| (8..=17).contains(&dt.hour())));
}

#[test]
// Purpose
// -------
// Relabel energy data by floor area and power data over time.
//
// Given
// -----
// - Annual energy of 10 kWh per hour with metadata type "Heating".
// - Annual power of 1000 W per hour.
//
// Expect
// ------
// - Normalizing by 5 m2 gives 2 kWh/m2 with type "Heating Intensity".
// - Time-aggregating the power gives 1 kWh per hour as Energy.
// - Time-aggregating energy fails with `NoCompanionType`.
fn normalize_and_time_aggregate() {
    let mut metadata = BTreeMap::new();
    metadata.insert("type".to_string(), "Heating".to_string());
    let header =
        Header::new(DataType::Energy, "kWh", AnalysisPeriod::default(), metadata).expect("header");
    let energy = HourlyContinuousCollection::<Mutable>::new(header, vec![10.0; 8760]).expect("energy");

    let eui = energy.normalize_by_area(5.0, "m2").expect("normalized");
    assert_eq!(eui.header().data_type(), DataType::EnergyIntensity);
    assert_eq!(eui.header().unit(), "kWh/m2");
    assert_eq!(eui.header().metadata().get("type").map(String::as_str), Some("Heating Intensity"));
    assert!((eui.values()[0] - 2.0).abs() < 1e-12);

    let header = Header::with_base_unit(DataType::Power, AnalysisPeriod::default());
    let power = HourlyContinuousCollection::<Mutable>::new(header, vec![1000.0; 8760]).expect("power");
    let aggregated = power.to_time_aggregated().expect("aggregated");
    assert_eq!(aggregated.header().data_type(), DataType::Energy);
    assert_eq!(aggregated.header().unit(), "kWh");
    assert!((aggregated.total() - 8760.0).abs() < 1e-6);

    assert!(matches!(
        energy.to_time_aggregated(),
        Err(CollectionError::NoCompanionType { .. })
    ));
}

#[test]
// Purpose
// -------
// Combine collections arithmetically and through aligned helpers.
//
// Given
// -----
// - Two annual collections and a daily collection on the annual period.
//
// Expect
// ------
// - `a + b` adds pointwise and keeps the left header.
// - `a * 2.0` scales without error.
// - Adding collections of different density or keys is `NotAligned`.
fn arithmetic_between_collections() {
    let a = annual_temperature(daily_ramp());
    let b = annual_temperature(vec![1.0; 8760]);

    let sum = (&a + &b).expect("aligned");
    assert_eq!(sum.values()[5], 6.0);
    assert_eq!(sum.header(), a.header());

    let scaled = &a * 2.0;
    assert_eq!(scaled.values()[23], 46.0);

    let days: Vec<u16> = (1..=365).collect();
    let header = Header::with_base_unit(DataType::DryBulbTemperature, AnalysisPeriod::default());
    let daily = DailyCollection::<Mutable>::new(header, vec![1.0; 365], days).expect("daily");
    let half = daily.filter_by_doys(&(1..=180).collect::<Vec<u16>>()).expect("half year");
    assert!(matches!(&daily + &half, Err(CollectionError::NotAligned { .. })));
    assert!(!a.is_collection_aligned(&a.to_discontinuous()));
}

#[test]
// Purpose
// -------
// Round-trip collections through their dictionary and JSON forms.
//
// Given
// -----
// - A discontinuous collection with explicit datetimes.
// - A continuous annual collection.
//
// Expect
// ------
// - Each rebuilds into an equal collection.
// - The continuous dictionary carries no datetimes.
// - A dictionary with the wrong "type" is rejected.
fn dictionary_round_trip() {
    let keys = vec![
        DateTime::new(1, 1, 5, 0, false).expect("datetime"),
        DateTime::new(2, 3, 7, 0, false).expect("datetime"),
    ];
    let header = Header::with_base_unit(DataType::WindSpeed, AnalysisPeriod::default());
    let coll = HourlyDiscontinuousCollection::new(header, vec![3.0, 4.5], keys).expect("coll");
    let dict = coll.to_dict().expect("serializable");
    let back = HourlyDiscontinuousCollection::from_dict(&dict).expect("round trip");
    assert_eq!(back, coll);

    let json = serde_json::to_string(&coll).expect("serialize");
    let parsed: HourlyDiscontinuousCollection = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, coll);

    let cont = annual_temperature(daily_ramp());
    let cont_dict = cont.to_dict().expect("serializable");
    assert!(cont_dict.get("datetimes").is_none());
    assert_eq!(HourlyContinuousCollection::from_dict(&cont_dict).expect("round trip"), cont);

    assert!(HourlyContinuousCollection::<Mutable>::from_dict(&dict).is_err());
}
