//! Classification metrics for the fake/real classifiers
//!
//! Accuracy, a per-class precision/recall/F1 report and a 2x2 confusion matrix,
//! rendered in the familiar scikit-learn text layout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::Label;

/// Fraction of predictions equal to the true label; 0.0 for empty input
pub fn accuracy_score(y_true: &[Label], y_pred: &[Label]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Confusion matrix: rows are actual labels, columns predicted, order fake then real
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[Label], y_pred: &[Label]) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (&actual, &predicted) in y_true.iter().zip(y_pred) {
            counts[actual.index()][predicted.index()] += 1;
        }
        Self { counts }
    }

    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        writeln!(f, "[[{:>w$} {:>w$}]", self.counts[0][0], self.counts[0][1], w = width)?;
        write!(f, " [{:>w$} {:>w$}]]", self.counts[1][0], self.counts[1][1], w = width)
    }
}

/// Precision, recall, F1 and support for one row of the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class scores plus accuracy and macro/weighted averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub fake: ClassScores,
    pub real: ClassScores,
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl ClassificationReport {
    pub fn from_predictions(y_true: &[Label], y_pred: &[Label]) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);
        let fake = Self::class_scores(&cm, Label::Fake);
        let real = Self::class_scores(&cm, Label::Real);
        let total = fake.support + real.support;

        let macro_avg = ClassScores {
            precision: (fake.precision + real.precision) / 2.0,
            recall: (fake.recall + real.recall) / 2.0,
            f1: (fake.f1 + real.f1) / 2.0,
            support: total,
        };

        let weighted = |get: fn(&ClassScores) -> f64| {
            if total == 0 {
                0.0
            } else {
                (get(&fake) * fake.support as f64 + get(&real) * real.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassScores {
            precision: weighted(|s| s.precision),
            recall: weighted(|s| s.recall),
            f1: weighted(|s| s.f1),
            support: total,
        };

        Self {
            fake,
            real,
            accuracy: accuracy_score(y_true, y_pred),
            macro_avg,
            weighted_avg,
        }
    }

    pub fn scores(&self, label: Label) -> &ClassScores {
        match label {
            Label::Fake => &self.fake,
            Label::Real => &self.real,
        }
    }

    /// Zero-division cases report 0.0
    fn class_scores(cm: &ConfusionMatrix, label: Label) -> ClassScores {
        let other = match label {
            Label::Fake => Label::Real,
            Label::Real => Label::Fake,
        };
        let tp = cm.get(label, label) as f64;
        let fp = cm.get(other, label) as f64;
        let fn_ = cm.get(label, other) as f64;

        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassScores {
            precision,
            recall,
            f1,
            support: (tp + fn_) as usize,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores| {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, s.precision, s.recall, s.f1, s.support
            )
        };

        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        row(f, Label::Fake.target_name(), &self.fake)?;
        row(f, Label::Real.target_name(), &self.real)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)
    }
}

/// Everything reported for one trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub model: String,
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
    pub train_time_ms: u64,
}

impl Evaluation {
    pub fn new(model: impl Into<String>, y_true: &[Label], y_pred: &[Label], train_time_ms: u64) -> Self {
        Self {
            model: model.into(),
            accuracy: accuracy_score(y_true, y_pred),
            report: ClassificationReport::from_predictions(y_true, y_pred),
            confusion: ConfusionMatrix::from_predictions(y_true, y_pred),
            train_time_ms,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.model)?;
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "Classification report:")?;
        writeln!(f, "{}", self.report)?;
        writeln!(f, "Confusion matrix:")?;
        write!(f, "{}", self.confusion)
    }
}
