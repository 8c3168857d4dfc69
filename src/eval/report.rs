//! Report types for evaluation results.
//!
//! This module defines the data structures for evaluation reports that can
//! be serialized to JSON or CSV. Column schemas are fixed:
//!
//! - Summary: `mse_mean, rmse_mean, mare_mean, mrse_mean, accval_mean,
//!   best_mse, best_img, worst_mse, worst_img`
//! - Detail: `name, mse, rmse, mare, mrse, accval`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::PairMetrics;

/// Detail row for one evaluated prediction/ground-truth pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRecord {
    /// Pair identifier, derived from the prediction file name.
    pub name: String,

    /// Error metrics for this pair.
    #[serde(flatten)]
    pub metrics: PairMetrics,
}

/// Aggregate report over a whole dataset.
///
/// Mean fields and best/worst fields are `None` when no pair survived the
/// skip rule; downstream CSV renders those as empty cells rather than NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Mean MSE across evaluated pairs.
    pub mse_mean: Option<f64>,
    /// Mean RMSE across evaluated pairs.
    pub rmse_mean: Option<f64>,
    /// Mean MARE across evaluated pairs.
    pub mare_mean: Option<f64>,
    /// Mean MRSE across evaluated pairs.
    pub mrse_mean: Option<f64>,
    /// Mean accuracy value across evaluated pairs.
    pub accval_mean: Option<f64>,

    /// Lowest per-pair MSE.
    pub best_mse: Option<f64>,
    /// Prediction file name of the best pair.
    pub best_img: Option<String>,
    /// Highest per-pair MSE.
    pub worst_mse: Option<f64>,
    /// Prediction file name of the worst pair.
    pub worst_img: Option<String>,

    /// Number of pairs that contributed to the aggregates.
    pub evaluated: usize,
    /// Number of pairs excluded by the skip rule.
    pub skipped: usize,

    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl SummaryReport {
    /// Whether no pair survived the skip rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluated == 0
    }

    /// Write the one-row summary CSV with the fixed column schema.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record([
            "mse_mean",
            "rmse_mean",
            "mare_mean",
            "mrse_mean",
            "accval_mean",
            "best_mse",
            "best_img",
            "worst_mse",
            "worst_img",
        ])?;

        wtr.write_record([
            &opt_f64(self.mse_mean),
            &opt_f64(self.rmse_mean),
            &opt_f64(self.mare_mean),
            &opt_f64(self.mrse_mean),
            &opt_f64(self.accval_mean),
            &opt_f64(self.best_mse),
            &self.best_img.clone().unwrap_or_default(),
            &opt_f64(self.worst_mse),
            &self.worst_img.clone().unwrap_or_default(),
        ])?;

        wtr.flush()?;
        Ok(())
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Ordered per-pair records, one row per evaluated pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailReport {
    /// Records in input order.
    pub records: Vec<PairRecord>,

    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl DetailReport {
    /// Create an empty detail report stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Number of evaluated pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Extract one metric as a column, in record order.
    ///
    /// ```ignore
    /// let mse_column = detail.metric_column(|m| m.mse);
    /// ```
    #[must_use]
    pub fn metric_column(&self, select: impl Fn(&PairMetrics) -> f64) -> Vec<f64> {
        self.records.iter().map(|r| select(&r.metrics)).collect()
    }

    /// Write the per-pair CSV with the fixed column schema.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record(["name", "mse", "rmse", "mare", "mrse", "accval"])?;

        for record in &self.records {
            wtr.write_record([
                &record.name,
                &record.metrics.mse.to_string(),
                &record.metrics.rmse.to_string(),
                &record.metrics.mare.to_string(),
                &record.metrics.mrse.to_string(),
                &record.metrics.accval.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the detail report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for DetailReport {
    fn default() -> Self {
        Self::new()
    }
}

fn opt_f64(value: Option<f64>) -> String {
    value.map_or(String::new(), |v| v.to_string())
}

// Timestamps serialize as RFC 3339 strings.
mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics(mse: f64) -> PairMetrics {
        PairMetrics {
            mse,
            rmse: mse.sqrt(),
            mare: 0.1,
            mrse: 0.02,
            accval: 0.9,
        }
    }

    #[test]
    fn test_summary_csv_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let report = SummaryReport {
            mse_mean: Some(2.0),
            rmse_mean: Some(2.0_f64.sqrt()),
            mare_mean: Some(0.1),
            mrse_mean: Some(0.02),
            accval_mean: Some(0.9),
            best_mse: Some(0.0),
            best_img: Some("a.png".to_string()),
            worst_mse: Some(4.0),
            worst_img: Some("b.png".to_string()),
            evaluated: 2,
            skipped: 0,
            timestamp: chrono::Utc::now(),
        };
        report.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "mse_mean,rmse_mean,mare_mean,mrse_mean,accval_mean,best_mse,best_img,worst_mse,worst_img"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("a.png"));
        assert!(row.contains("b.png"));
    }

    #[test]
    fn test_empty_summary_writes_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let report = SummaryReport {
            mse_mean: None,
            rmse_mean: None,
            mare_mean: None,
            mrse_mean: None,
            accval_mean: None,
            best_mse: None,
            best_img: None,
            worst_mse: None,
            worst_img: None,
            evaluated: 0,
            skipped: 3,
            timestamp: chrono::Utc::now(),
        };
        assert!(report.is_empty());
        report.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, ",,,,,,,,");
    }

    #[test]
    fn test_detail_csv_schema_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detailed.csv");

        let mut report = DetailReport::new();
        report.records.push(PairRecord {
            name: "a.png".to_string(),
            metrics: sample_metrics(0.0),
        });
        report.records.push(PairRecord {
            name: "b.png".to_string(),
            metrics: sample_metrics(4.0),
        });
        report.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "name,mse,rmse,mare,mrse,accval");
        assert!(lines[1].starts_with("a.png,0,"));
        assert!(lines[2].starts_with("b.png,4,"));
    }

    #[test]
    fn test_detail_metric_column() {
        let mut report = DetailReport::new();
        for mse in [1.0, 2.0, 3.0] {
            report.records.push(PairRecord {
                name: format!("{mse}.png"),
                metrics: sample_metrics(mse),
            });
        }

        assert_eq!(report.metric_column(|m| m.mse), vec![1.0, 2.0, 3.0]);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_detail_json_roundtrip() {
        let mut report = DetailReport::new();
        report.records.push(PairRecord {
            name: "a.png".to_string(),
            metrics: sample_metrics(2.5),
        });

        let json = serde_json::to_string(&report).unwrap();
        let back: DetailReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records.len(), 1);
        assert_eq!(back.records[0].metrics.mse, 2.5);
        // PairMetrics flattens into the record object.
        assert!(json.contains("\"mse\":2.5"));
    }
}
