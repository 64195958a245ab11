//! Synthetic hourly popularity for a handful of attractions.
//!
//! For every attraction id and every hour of one day a busyness index is
//! drawn uniformly from the range of the hour's bucket:
//!
//! | Bucket | Hours | Busyness |
//! |--------|-------|----------|
//! | Peak | 10–13, 17–20 | 50–90 |
//! | Shoulder | 8–9, 14–16, 21–22 | 25–60 |
//! | Off-peak | 0–7, 23 | 5–30 |
//!
//! Records are numbered from 1 in attraction-major, hour-minor order.

use crate::models::PopularityRecord;
use chrono::NaiveDate;
use itertools::Itertools;
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::{info, instrument};

pub const HOURS_PER_DAY: u32 = 24;

/// Time-of-day bucket that decides the busyness range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBucket {
    Peak,
    Shoulder,
    OffPeak,
}

impl HourBucket {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            10..=13 | 17..=20 => HourBucket::Peak,
            8..=9 | 14..=16 | 21..=22 => HourBucket::Shoulder,
            _ => HourBucket::OffPeak,
        }
    }

    pub fn busyness_range(self) -> RangeInclusive<u8> {
        match self {
            HourBucket::Peak => 50..=90,
            HourBucket::Shoulder => 25..=60,
            HourBucket::OffPeak => 5..=30,
        }
    }
}

/// Generate one record per attraction id and hour of `on_date`.
#[instrument(level = "info", skip(rng))]
pub fn generate<R: Rng>(
    attraction_ids: RangeInclusive<u32>,
    on_date: NaiveDate,
    rng: &mut R,
) -> Vec<PopularityRecord> {
    let records: Vec<PopularityRecord> = attraction_ids
        .cartesian_product(0..HOURS_PER_DAY)
        .zip(1u32..)
        .map(|((attraction_id, hour), pop_id)| PopularityRecord {
            pop_id,
            attraction_id,
            on_date,
            hour,
            busyness_index: rng.random_range(HourBucket::for_hour(hour).busyness_range()),
        })
        .collect();

    info!(count = records.len(), "Generated popularity records");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn test_hour_buckets() {
        let peak: Vec<u32> = (0..24)
            .filter(|h| HourBucket::for_hour(*h) == HourBucket::Peak)
            .collect();
        let shoulder: Vec<u32> = (0..24)
            .filter(|h| HourBucket::for_hour(*h) == HourBucket::Shoulder)
            .collect();
        let off_peak: Vec<u32> = (0..24)
            .filter(|h| HourBucket::for_hour(*h) == HourBucket::OffPeak)
            .collect();

        assert_eq!(peak, vec![10, 11, 12, 13, 17, 18, 19, 20]);
        assert_eq!(shoulder, vec![8, 9, 14, 15, 16, 21, 22]);
        assert_eq!(off_peak, vec![0, 1, 2, 3, 4, 5, 6, 7, 23]);
    }

    #[test]
    fn test_shape_and_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate(1..=15, day(), &mut rng);

        assert_eq!(records.len(), 360);
        for (i, record) in records.iter().enumerate() {
            let i = i as u32;
            assert_eq!(record.pop_id, i + 1);
            assert_eq!(record.attraction_id, i / 24 + 1);
            assert_eq!(record.hour, i % 24);
            assert_eq!(record.on_date, day());
        }
    }

    #[test]
    fn test_busyness_within_bucket_ranges() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let records = generate(1..=15, day(), &mut rng);

            let noon = &records[12];
            assert_eq!((noon.attraction_id, noon.hour), (1, 12));
            assert!((50..=90).contains(&noon.busyness_index));

            let three_am = &records[3];
            assert_eq!((three_am.attraction_id, three_am.hour), (1, 3));
            assert!((5..=30).contains(&three_am.busyness_index));

            for record in &records {
                let range = HourBucket::for_hour(record.hour).busyness_range();
                assert!(range.contains(&record.busyness_index));
            }
        }
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = generate(1..=3, day(), &mut StdRng::seed_from_u64(42));
        let b = generate(1..=3, day(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
