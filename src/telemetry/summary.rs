use crate::telemetry::load::Metadata;

/// Quick overview of a metadata file, printed before conversion.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MetadataSummary {
    /// Vehicle identification number.
    pub vin: String,
    /// Number of usable records.
    pub entries: usize,
    /// Number of malformed records that were skipped.
    pub skipped: usize,
    /// Lowest and highest speed in km/h, if any record carries a speed.
    pub speed_range: Option<(f64, f64)>,
    /// First recorded date.
    pub first_date: Option<String>,
    /// Last recorded date.
    pub last_date: Option<String>,
}

impl MetadataSummary {
    /// Summarize parsed metadata.
    pub fn of(meta: &Metadata) -> Self {
        let speed_range = meta
            .records
            .iter()
            .filter_map(|r| r.speed)
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });

        Self {
            vin: meta.vin.clone(),
            entries: meta.records.len(),
            skipped: meta.skipped,
            speed_range,
            first_date: meta.records.iter().find_map(|r| r.date.clone()),
            last_date: meta.records.iter().rev().find_map(|r| r.date.clone()),
        }
    }
}
