//! CSV point parsing.
//!
//! The first row is a header. Every other field must be a number; fields are
//! read row by row and paired consecutively into `(x, y)` points, so both the
//! usual `x,y` layout and wider rows of several pairs are accepted. A trailing
//! unpaired field is dropped.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dist2(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for Dataset {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut values: Vec<f64> = Vec::new();
    for (record_idx, record) in reader.records().enumerate() {
        let record = record?;
        for (field_idx, field) in record.iter().enumerate() {
            // f64::from_str accepts "inf" and "NaN"; neither can be plotted.
            let v = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidNumber {
                    value: field.to_string(),
                    record: record_idx + 1,
                    field: field_idx + 1,
                })?;
            values.push(v);
        }
    }

    let points = values
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect();
    Ok(Dataset::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_skipped_and_rows_become_points() {
        let ds = parse_csv(b"x,y\n1,2\n3.5,-4\n").unwrap();
        assert_eq!(ds.points(), &[Point::new(1.0, 2.0), Point::new(3.5, -4.0)]);
    }

    #[test]
    fn wide_rows_are_paired_in_order() {
        let ds = parse_csv(b"a,b,c,d\n1,2,3,4\n5,6,7,8\n").unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.points()[1], Point::new(3.0, 4.0));
        assert_eq!(ds.points()[3], Point::new(7.0, 8.0));
    }

    #[test]
    fn trailing_odd_field_is_dropped() {
        let ds = parse_csv(b"a,b,c\n1,2,3\n").unwrap();
        assert_eq!(ds.points(), &[Point::new(1.0, 2.0)]);
    }

    #[test]
    fn whitespace_around_numbers_is_tolerated() {
        let ds = parse_csv(b"x, y\n 1 , 2\n").unwrap();
        assert_eq!(ds.points(), &[Point::new(1.0, 2.0)]);
    }

    #[test]
    fn non_numeric_field_is_reported_with_position() {
        let err = parse_csv(b"x,y\n1,2\n3,oops\n").unwrap_err();
        match err {
            Error::InvalidNumber {
                value,
                record,
                field,
            } => {
                assert_eq!(value, "oops");
                assert_eq!(record, 2);
                assert_eq!(field, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for (csv, bad) in [
            (&b"x,y\n1,1\ninf,2\n"[..], "inf"),
            (&b"x,y\n1,NaN\n"[..], "NaN"),
            (&b"x,y\n-infinity,0\n"[..], "-infinity"),
        ] {
            match parse_csv(csv) {
                Err(Error::InvalidNumber { value, .. }) => assert_eq!(value, bad),
                other => panic!("expected InvalidNumber for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn header_only_is_empty() {
        let ds = parse_csv(b"x,y\n").unwrap();
        assert!(ds.is_empty());
    }
}
