// src/data_input/sample_table.rs

use chrono::NaiveDateTime;

/// One timestamped reading set from a single polling tick. `values` is
/// positionally aligned with the owning table's channel list; a missing or
/// empty cell is stored as NaN and excluded from mean denominators later.
#[derive(Debug, Clone)]
pub struct RawSample {
    pub timestamp: NaiveDateTime,
    pub values: Vec<f64>,
}

/// An ordered sequence of samples sharing one channel set. Rows are kept in
/// arrival order; callers that need time order take a sorted copy so the
/// source data is never mutated.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub channels: Vec<String>,
    pub rows: Vec<RawSample>,
}

impl SampleTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted copy, ascending by timestamp. Input files are not guaranteed
    /// to arrive in order. Rows sharing a timestamp are ordered by their
    /// value bit patterns, so the sorted order (and any reduction that
    /// accumulates in it) is the same for every arrival order.
    pub fn sorted_by_time(&self) -> SampleTable {
        let mut sorted = self.clone();
        sorted.rows.sort_by(|a, b| {
            a.timestamp.cmp(&b.timestamp).then_with(|| {
                let a_bits = a.values.iter().map(|v| v.to_bits());
                let b_bits = b.values.iter().map(|v| v.to_bits());
                a_bits.cmp(b_bits)
            })
        });
        sorted
    }

    /// Earliest timestamp present in the table, regardless of row order.
    pub fn min_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.iter().map(|row| row.timestamp).min()
    }

    /// Values of one channel column, in row order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .map(move |row| row.values.get(idx).copied().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 29)
            .unwrap()
            .and_hms_opt(10, 0, sec)
            .unwrap()
    }

    #[test]
    fn sorted_by_time_does_not_touch_source() {
        let table = SampleTable {
            channels: vec!["PA Current".to_string()],
            rows: vec![
                RawSample {
                    timestamp: ts(2),
                    values: vec![3.0],
                },
                RawSample {
                    timestamp: ts(0),
                    values: vec![1.0],
                },
                RawSample {
                    timestamp: ts(1),
                    values: vec![2.0],
                },
            ],
        };

        let sorted = table.sorted_by_time();
        assert_eq!(
            sorted.rows.iter().map(|r| r.timestamp).collect::<Vec<_>>(),
            vec![ts(0), ts(1), ts(2)]
        );
        // Arrival order preserved on the source.
        assert_eq!(table.rows[0].timestamp, ts(2));
        assert_eq!(table.min_timestamp(), Some(ts(0)));
    }

    #[test]
    fn equal_timestamps_order_by_value_bits() {
        let rows = |values: [f64; 3]| -> Vec<RawSample> {
            values
                .iter()
                .map(|&v| RawSample {
                    timestamp: ts(0),
                    values: vec![v],
                })
                .collect()
        };
        let forward = SampleTable {
            channels: vec!["PA Current".to_string()],
            rows: rows([0.1, 0.2, 0.3]),
        };
        let reversed = SampleTable {
            channels: forward.channels.clone(),
            rows: rows([0.3, 0.2, 0.1]),
        };

        let a: Vec<f64> = forward.sorted_by_time().column(0).collect();
        let b: Vec<f64> = reversed.sorted_by_time().column(0).collect();
        assert_eq!(a, b);
        assert_eq!(a, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn column_pads_short_rows_with_nan() {
        let table = SampleTable {
            channels: vec!["A".to_string(), "B".to_string()],
            rows: vec![RawSample {
                timestamp: ts(0),
                values: vec![1.0],
            }],
        };
        let col: Vec<f64> = table.column(1).collect();
        assert!(col[0].is_nan());
    }
}
