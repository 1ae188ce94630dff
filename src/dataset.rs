//! Static customer dataset backing the dashboard

use crate::error::{ArtifactKind, ArtifactUnavailable};
use crate::types::customer::CustomerRecord;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Churned / retained split of a per-customer value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ByChurn<T> {
    pub retained: T,
    pub churned: T,
}

/// Literal class counts in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChurnCounts {
    pub retained: u64,
    pub churned: u64,
}

impl ChurnCounts {
    pub fn total(&self) -> u64 {
        self.retained + self.churned
    }

    /// Churned share in percent (0 for an empty dataset)
    pub fn churn_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.churned as f64 / self.total() as f64 * 100.0
        }
    }
}

/// The loaded dataset. Read once and never modified.
#[derive(Debug, Clone)]
pub struct ChurnDataset {
    path: PathBuf,
    records: Vec<CustomerRecord>,
}

impl ChurnDataset {
    /// Load the dataset CSV from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactUnavailable> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Dataset file not found");
            return Err(ArtifactUnavailable::missing(ArtifactKind::Dataset, path));
        }

        let file = File::open(path)
            .map_err(|e| ArtifactUnavailable::corrupt(ArtifactKind::Dataset, path, e))?;
        let dataset = Self::from_reader(file, path)?;

        info!(
            path = %path.display(),
            records = dataset.len(),
            churned = dataset.churn_counts().churned,
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Parse CSV from any reader; `path` is only used in error messages
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, ArtifactUnavailable> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<CustomerRecord>().enumerate() {
            // header is line 1
            let line = index + 2;
            let record = row.map_err(|e| {
                ArtifactUnavailable::corrupt(ArtifactKind::Dataset, path, format!("line {}: {}", line, e))
            })?;

            if record.churn > 1 {
                return Err(ArtifactUnavailable::corrupt(
                    ArtifactKind::Dataset,
                    path,
                    format!("line {}: Churn must be 0 or 1, got {}", line, record.churn),
                ));
            }
            records.push(record);
        }

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        Self {
            path: PathBuf::new(),
            records,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count churned and retained customers over every row
    pub fn churn_counts(&self) -> ChurnCounts {
        self.records
            .iter()
            .fold(ChurnCounts::default(), |mut counts, record| {
                if record.churned() {
                    counts.churned += 1;
                } else {
                    counts.retained += 1;
                }
                counts
            })
    }

    /// Collect one value per customer, split by churn class
    pub fn split_by_churn<F>(&self, value: F) -> ByChurn<Vec<f64>>
    where
        F: Fn(&CustomerRecord) -> f64,
    {
        let mut split = ByChurn::<Vec<f64>>::default();
        for record in &self.records {
            if record.churned() {
                split.churned.push(value(record));
            } else {
                split.retained.push(value(record));
            }
        }
        split
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Churn,AccountWeeks,ContractRenewal,DataPlan,DataUsage,CustServCalls,DayMins,DayCalls,MonthlyCharge,OverageFee,RoamMins
0,128,1,1,2.7,1,265.1,110,89,9.87,10
0,107,1,1,3.7,1,161.6,123,82,9.78,13.7
0,137,1,0,0,0,243.4,114,52,6.06,12.2
1,84,0,0,0,2,299.4,71,57,3.1,6.6
1,75,0,0,0,3,166.7,113,41,7.42,10.1
";

    #[test]
    fn test_counts_reflect_every_row() {
        let dataset = ChurnDataset::from_reader(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();

        assert_eq!(dataset.len(), 5);
        let counts = dataset.churn_counts();
        assert_eq!(counts, ChurnCounts { retained: 3, churned: 2 });
        assert!((counts.churn_rate() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_by_churn() {
        let dataset = ChurnDataset::from_reader(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();
        let split = dataset.split_by_churn(|r| r.account_weeks as f64);

        assert_eq!(split.retained, vec![128.0, 107.0, 137.0]);
        assert_eq!(split.churned, vec![84.0, 75.0]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChurnDataset::load(dir.path().join("telecom_churn.csv")).unwrap_err();
        assert!(matches!(
            err,
            ArtifactUnavailable::Missing { kind: ArtifactKind::Dataset, .. }
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = ChurnDataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.path(), file.path());
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let data = "Churn,AccountWeeks,DataUsage,CustServCalls,MonthlyCharge\n0,10,1.0,1,20\n0,abc,1.0,1,20\n";
        let err = ChurnDataset::from_reader(data.as_bytes(), Path::new("bad.csv")).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_invalid_churn_label() {
        let data = "Churn,AccountWeeks,DataUsage,CustServCalls,MonthlyCharge\n2,10,1.0,1,20\n";
        let err = ChurnDataset::from_reader(data.as_bytes(), Path::new("bad.csv")).unwrap_err();
        assert!(err.to_string().contains("Churn must be 0 or 1"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "Churn,AccountWeeks,DataUsage,CustServCalls,MonthlyCharge\n";
        let dataset = ChurnDataset::from_reader(data.as_bytes(), Path::new("empty.csv")).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.churn_counts().churn_rate(), 0.0);
    }
}
