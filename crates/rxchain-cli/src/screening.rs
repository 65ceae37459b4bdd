//! # Screening Driver
//!
//! Trains the classifier, predicts a label for each candidate prescription,
//! appends the legitimate ones to a [`Chain`], and renders the console
//! report. Flagged prescriptions never reach the chain.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

use rxchain_classifier::{
    Classifier, ClassifierError, Dataset, FeatureMatrix, Label, LogisticRegression, TrainingConfig,
};
use rxchain_core::{ContentDigest, Record, Status};
use rxchain_ledger::Chain;

/// A candidate prescription: `[quantity, dosage]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Number of prescriptions.
    pub quantity: i64,
    /// Dosage.
    pub dosage: i64,
}

impl Sample {
    /// Sample from a raw quantity and dosage.
    pub const fn new(quantity: i64, dosage: i64) -> Self {
        Self { quantity, dosage }
    }

    fn features(&self) -> [f64; 2] {
        [self.quantity as f64, self.dosage as f64]
    }
}

/// Parses `Q,D`, e.g. `6,15`.
impl FromStr for Sample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, d) = s
            .split_once(',')
            .ok_or_else(|| format!("expected QUANTITY,DOSAGE, got '{s}'"))?;
        let quantity = q
            .trim()
            .parse()
            .map_err(|e| format!("invalid quantity '{}': {e}", q.trim()))?;
        let dosage = d
            .trim()
            .parse()
            .map_err(|e| format!("invalid dosage '{}': {e}", d.trim()))?;
        Ok(Self { quantity, dosage })
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.quantity, self.dosage)
    }
}

/// The three prescriptions screened by `rxchain demo`.
pub const DEMO_SAMPLES: [Sample; 3] = [Sample::new(6, 15), Sample::new(8, 22), Sample::new(4, 10)];

/// What happened to one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// 1-based position in the input.
    pub number: usize,
    /// The screened values.
    pub sample: Sample,
    /// Predicted class.
    pub label: Label,
    /// Digest of the appended block; `None` when flagged.
    pub digest: Option<ContentDigest>,
}

impl Decision {
    /// Returns true if the classifier flagged the sample for potential misuse.
    pub fn is_flagged(&self) -> bool {
        self.label == Label::Misuse
    }
}

/// Build the record stored for the `number`th sample.
pub fn prescription_record(number: usize, sample: Sample, label: Label) -> Record {
    let status = match label {
        Label::Legitimate => Status::Legitimate,
        Label::Misuse => Status::Flagged,
    };
    Record::prescription(
        format!("patient_{number}"),
        format!("medication_{number}"),
        sample.quantity,
        sample.dosage,
        status,
    )
}

/// Classify `samples` and append each legitimate one to `chain`.
///
/// Returns one [`Decision`] per sample, in input order.
pub fn screen<C: Classifier>(
    classifier: &C,
    model: &C::Model,
    samples: &[Sample],
    chain: &mut Chain,
) -> Result<Vec<Decision>, ClassifierError> {
    let rows: Vec<[f64; 2]> = samples.iter().map(Sample::features).collect();
    let labels = classifier.predict(model, &FeatureMatrix::from_rows(&rows)?)?;

    let mut decisions = Vec::with_capacity(samples.len());
    for (i, (sample, label)) in samples.iter().zip(labels).enumerate() {
        let number = i + 1;
        let digest = match label {
            Label::Legitimate => {
                let block = chain.append(prescription_record(number, *sample, label));
                Some(*block.digest())
            }
            Label::Misuse => {
                tracing::info!(number, sample = %sample, "prescription flagged");
                None
            }
        };
        decisions.push(Decision {
            number,
            sample: *sample,
            label,
            digest,
        });
    }
    Ok(decisions)
}

/// Outcome of a full screening run.
#[derive(Debug)]
pub struct ScreeningReport {
    /// One decision per input sample, in order.
    pub decisions: Vec<Decision>,
    /// Chain holding the legitimate prescriptions.
    pub chain: Chain,
}

impl ScreeningReport {
    /// Integrity of the resulting chain.
    pub fn is_valid(&self) -> bool {
        self.chain.validate()
    }

    /// Decisions the classifier flagged, in input order.
    pub fn flagged(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.is_flagged())
    }

    /// Process exit code: 0 when the chain validates.
    pub fn exit_code(&self) -> u8 {
        if self.is_valid() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for ScreeningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.flagged() {
            writeln!(
                f,
                "Prescription {} flagged for potential misuse. Not added to blockchain.",
                d.number
            )?;
        }
        writeln!(f)?;
        writeln!(f, "--- Blockchain Data ---")?;
        write!(f, "{}", self.chain)?;
        writeln!(f, "Is the blockchain valid? {}", self.is_valid())
    }
}

/// Train on the synthetic dataset, then screen `samples` onto a new chain.
pub fn run_screening(config: TrainingConfig, samples: &[Sample]) -> Result<ScreeningReport> {
    let dataset = Dataset::synthetic_prescriptions().context("failed to build training dataset")?;
    let classifier = LogisticRegression::new(config);
    let model = classifier
        .train(&dataset)
        .context("failed to train misuse classifier")?;

    let mut chain = Chain::new();
    let decisions = screen(&classifier, &model, samples, &mut chain)
        .context("failed to screen prescriptions")?;

    tracing::info!(
        screened = decisions.len(),
        recorded = chain.len(),
        "screening complete"
    );
    Ok(ScreeningReport { decisions, chain })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses() {
        assert_eq!("6,15".parse::<Sample>().unwrap(), Sample::new(6, 15));
        assert_eq!(" 8 , 22 ".parse::<Sample>().unwrap(), Sample::new(8, 22));
        assert_eq!(Sample::new(4, 10).to_string(), "4,10");
    }

    #[test]
    fn sample_rejects_bad_input() {
        assert!("6".parse::<Sample>().is_err());
        assert!("6,x".parse::<Sample>().is_err());
        assert!("6.5,10".parse::<Sample>().is_err());
        assert!(",".parse::<Sample>().is_err());
    }

    #[test]
    fn prescription_record_fields() {
        let record = prescription_record(2, Sample::new(8, 22), Label::Misuse);
        assert_eq!(
            record.to_string(),
            r#"{"dosage":22,"medication":"medication_2","patient_id":"patient_2","quantity":8,"status":"flagged"}"#
        );
    }

    #[test]
    fn demo_screening_records_only_legitimate() {
        let report = run_screening(TrainingConfig::default(), &DEMO_SAMPLES).unwrap();
        assert_eq!(report.decisions.len(), 3);

        let legit = report
            .decisions
            .iter()
            .filter(|d| d.label == Label::Legitimate)
            .count();
        assert_eq!(report.chain.len(), legit);
        assert!(report.is_valid());
        assert_eq!(report.exit_code(), 0);

        assert!(report.decisions[1].is_flagged());
        assert!(report.decisions[1].digest.is_none());
        assert!(!report.decisions[2].is_flagged());
        assert!(report.decisions[2].digest.is_some());

        let flagged: Vec<usize> = report.flagged().map(|d| d.number).collect();
        assert_eq!(flagged, vec![2]);
    }

    #[test]
    fn appended_digests_match_chain() {
        let report = run_screening(TrainingConfig::default(), &DEMO_SAMPLES).unwrap();
        let recorded: Vec<ContentDigest> =
            report.decisions.iter().filter_map(|d| d.digest).collect();
        let chained: Vec<ContentDigest> = report.chain.iter().map(|b| *b.digest()).collect();
        assert_eq!(recorded, chained);
    }

    #[test]
    fn report_layout() {
        let report = run_screening(TrainingConfig::default(), &DEMO_SAMPLES).unwrap();
        let text = report.to_string();
        assert!(text.contains(
            "Prescription 2 flagged for potential misuse. Not added to blockchain.\n"
        ));
        assert!(!text.contains("Prescription 3 flagged"));
        assert!(text.contains("\n--- Blockchain Data ---\n"));
        assert!(text.contains("--- Block 1 ---\nHash: "));
        assert!(text.contains("Previous Hash: 0\n"));
        assert!(text.ends_with("Is the blockchain valid? true\n"));
    }

    #[test]
    fn empty_input_yields_empty_valid_chain() {
        let report = run_screening(TrainingConfig::default(), &[]).unwrap();
        assert!(report.decisions.is_empty());
        assert!(report.chain.is_empty());
        assert_eq!(
            report.to_string(),
            "\n--- Blockchain Data ---\nIs the blockchain valid? true\n"
        );
    }

    #[test]
    fn invalid_config_surfaces_error() {
        let config = TrainingConfig {
            test_fraction: 0.0,
            ..TrainingConfig::default()
        };
        assert!(run_screening(config, &DEMO_SAMPLES).is_err());
    }
}
