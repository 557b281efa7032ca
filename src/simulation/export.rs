//! CSV export of accumulation series for charting tools

use super::accumulation::AccumulationSeries;
use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;
use std::io::Write;

/// One exported row: a month of one product's series
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    code: &'a str,
    month: u32,
    date: Option<NaiveDate>,
    principal: f64,
    interest: f64,
    total: f64,
}

/// Streams series rows for any number of products into one CSV
pub struct SeriesCsvWriter<W: Write> {
    writer: Writer<W>,
    start: Option<NaiveDate>,
}

impl<W: Write> SeriesCsvWriter<W> {
    /// Create a writer; when `start` is set each row carries the date its month closes
    pub fn new(inner: W, start: Option<NaiveDate>) -> Self {
        Self {
            writer: Writer::from_writer(inner),
            start,
        }
    }

    /// Append every point of `series` under product `code`
    pub fn write_series(&mut self, code: &str, series: &AccumulationSeries) -> Result<(), csv::Error> {
        match self.start {
            Some(start) => {
                for dated in series.dated_points(start) {
                    self.writer.serialize(ExportRow {
                        code,
                        month: dated.point.month,
                        date: Some(dated.date),
                        principal: dated.point.principal,
                        interest: dated.point.interest,
                        total: dated.point.total,
                    })?;
                }
            }
            None => {
                for point in series {
                    self.writer.serialize(ExportRow {
                        code,
                        month: point.month,
                        date: None,
                        principal: point.principal,
                        interest: point.interest,
                        total: point.total,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W, csv::Error> {
        self.writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ProductDescriptor, ProductKind};
    use crate::simulation::accumulate;

    fn two_month_series() -> AccumulationSeries {
        let product = ProductDescriptor::new("S1", ProductKind::Saving)
            .with_term("2")
            .with_rate("12");
        accumulate(&product, Some(100_000.0))
    }

    #[test]
    fn test_export_without_dates() {
        let mut writer = SeriesCsvWriter::new(Vec::new(), None);
        writer.write_series("S1", &two_month_series()).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "code,month,date,principal,interest,total");
        assert_eq!(lines[1], "S1,1,,100000.0,1000.0,101000.0");
        assert_eq!(lines[2], "S1,2,,200000.0,3000.0,203000.0");
    }

    #[test]
    fn test_export_with_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut writer = SeriesCsvWriter::new(Vec::new(), Some(start));
        writer.write_series("S1", &two_month_series()).unwrap();
        writer.write_series("S2", &AccumulationSeries::empty()).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("S1,1,2025-04-01,"));
        assert!(lines[2].starts_with("S1,2,2025-05-01,"));
    }
}
