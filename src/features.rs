use crate::parse::PatientRecord;

/// Number of predictors taken from a patient record.
///
/// Patient ID and the depression flag are left out.
pub const FEATURE_COUNT: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub target: f64, // 1 if diagnosed, 0 otherwise
}

pub fn bool_to_f64(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl From<&PatientRecord> for Sample {
    fn from(record: &PatientRecord) -> Self {
        let features = vec![
            f64::from(record.age),
            bool_to_f64(record.gender),
            f64::from(record.ethnicity),
            f64::from(record.education_level),
            record.bmi,
            bool_to_f64(record.smoking),
            record.alcohol_consumption,
            record.physical_activity,
            record.diet_quality,
            record.sleep_quality,
            bool_to_f64(record.family_history_alzheimers),
            bool_to_f64(record.cardiovascular_disease),
            bool_to_f64(record.diabetes),
            bool_to_f64(record.head_injury),
            bool_to_f64(record.hypertension),
            f64::from(record.systolic_bp),
            f64::from(record.diastolic_bp),
            record.cholesterol_total,
            record.cholesterol_ldl,
            record.cholesterol_hdl,
            record.cholesterol_triglycerides,
            record.mmse,
            record.functional_assessment,
            bool_to_f64(record.memory_complaints),
            bool_to_f64(record.behavioral_problems),
            record.adl,
            bool_to_f64(record.confusion),
            bool_to_f64(record.disorientation),
            bool_to_f64(record.personality_changes),
            bool_to_f64(record.difficulty_completing_tasks),
            bool_to_f64(record.forgetfulness),
        ];

        Self {
            features,
            target: bool_to_f64(record.diagnosis),
        }
    }
}

pub fn records_to_samples(records: &[PatientRecord]) -> Vec<Sample> {
    records.iter().map(Sample::from).collect()
}

/// Standardizes every feature column to zero mean and unit variance.
///
/// Constant columns are only centered.
pub fn z_score_normalize(samples: &[Sample]) -> Vec<Sample> {
    let Some(width) = samples.first().map(|s| s.features.len()) else {
        return Vec::new();
    };
    let count = samples.len() as f64;

    let mut means = vec![0.0; width];
    for sample in samples {
        for (mean, &value) in means.iter_mut().zip(&sample.features) {
            *mean += value / count;
        }
    }

    let mut std_devs = vec![0.0_f64; width];
    for sample in samples {
        for ((std_dev, &mean), &value) in std_devs.iter_mut().zip(&means).zip(&sample.features) {
            *std_dev += (value - mean).powi(2) / count;
        }
    }
    for std_dev in &mut std_devs {
        *std_dev = std_dev.sqrt();
    }

    samples
        .iter()
        .map(|sample| Sample {
            features: sample
                .features
                .iter()
                .zip(means.iter().zip(&std_devs))
                .map(|(&value, (&mean, &std_dev))| {
                    if std_dev > 0.0 {
                        (value - mean) / std_dev
                    } else {
                        value - mean
                    }
                })
                .collect(),
            target: sample.target,
        })
        .collect()
}
