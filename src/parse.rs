use csv::{ReaderBuilder, StringRecord};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::error::DataError;

pub const FIELD_COUNT: usize = 35;

pub const COLUMNS: [&str; FIELD_COUNT] = [
    "PatientID",
    "Age",
    "Gender",
    "Ethnicity",
    "EducationLevel",
    "BMI",
    "Smoking",
    "AlcoholConsumption",
    "PhysicalActivity",
    "DietQuality",
    "SleepQuality",
    "FamilyHistoryAlzheimers",
    "CardiovascularDisease",
    "Diabetes",
    "Depression",
    "HeadInjury",
    "Hypertension",
    "SystolicBP",
    "DiastolicBP",
    "CholesterolTotal",
    "CholesterolLDL",
    "CholesterolHDL",
    "CholesterolTriglycerides",
    "MMSE",
    "FunctionalAssessment",
    "MemoryComplaints",
    "BehavioralProblems",
    "ADL",
    "Confusion",
    "Disorientation",
    "PersonalityChanges",
    "DifficultyCompletingTasks",
    "Forgetfulness",
    "Diagnosis",
    "DoctorInCharge",
];

/// One patient row of the Alzheimer's table.
///
/// The trailing `DoctorInCharge` column is read but not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub patient_id: u16,

    // demographics
    pub age: u8,
    pub gender: bool, // true if female
    pub ethnicity: u8,
    pub education_level: u8,

    // lifestyle
    pub bmi: f64,
    pub smoking: bool,
    pub alcohol_consumption: f64,
    pub physical_activity: f64,
    pub diet_quality: f64,
    pub sleep_quality: f64,

    // medical history
    pub family_history_alzheimers: bool,
    pub cardiovascular_disease: bool,
    pub diabetes: bool,
    pub depression: bool,
    pub head_injury: bool,
    pub hypertension: bool,

    // clinical measurements
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    pub cholesterol_total: f64,
    pub cholesterol_ldl: f64,
    pub cholesterol_hdl: f64,
    pub cholesterol_triglycerides: f64,

    // cognitive and functional assessments
    pub mmse: f64,
    pub functional_assessment: f64,
    pub memory_complaints: bool,
    pub behavioral_problems: bool,
    pub adl: f64,

    // symptoms
    pub confusion: bool,
    pub disorientation: bool,
    pub personality_changes: bool,
    pub difficulty_completing_tasks: bool,
    pub forgetfulness: bool,

    pub diagnosis: bool,
}

/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their `0`/`f`/`false` counterparts.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl Row<'_> {
    fn raw(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or_default().trim()
    }

    fn error(&self, index: usize, expected: &'static str) -> DataError {
        DataError::Field {
            line: self.line,
            column: COLUMNS[index],
            value: self.raw(index).to_owned(),
            expected,
        }
    }

    fn number<T: FromStr>(&self, index: usize, expected: &'static str) -> Result<T, DataError> {
        self.raw(index)
            .parse()
            .map_err(|_| self.error(index, expected))
    }

    fn flag(&self, index: usize) -> Result<bool, DataError> {
        parse_bool(self.raw(index)).ok_or_else(|| self.error(index, "bool"))
    }

    fn float(&self, index: usize) -> Result<f64, DataError> {
        self.number(index, "f64")
    }

    fn to_record(&self) -> Result<PatientRecord, DataError> {
        Ok(PatientRecord {
            patient_id: self.number(0, "u16")?,
            age: self.number(1, "u8")?,
            gender: self.flag(2)?,
            ethnicity: self.number(3, "u8")?,
            education_level: self.number(4, "u8")?,
            bmi: self.float(5)?,
            smoking: self.flag(6)?,
            alcohol_consumption: self.float(7)?,
            physical_activity: self.float(8)?,
            diet_quality: self.float(9)?,
            sleep_quality: self.float(10)?,
            family_history_alzheimers: self.flag(11)?,
            cardiovascular_disease: self.flag(12)?,
            diabetes: self.flag(13)?,
            depression: self.flag(14)?,
            head_injury: self.flag(15)?,
            hypertension: self.flag(16)?,
            systolic_bp: self.number(17, "u32")?,
            diastolic_bp: self.number(18, "u32")?,
            cholesterol_total: self.float(19)?,
            cholesterol_ldl: self.float(20)?,
            cholesterol_hdl: self.float(21)?,
            cholesterol_triglycerides: self.float(22)?,
            mmse: self.float(23)?,
            functional_assessment: self.float(24)?,
            memory_complaints: self.flag(25)?,
            behavioral_problems: self.flag(26)?,
            adl: self.float(27)?,
            confusion: self.flag(28)?,
            disorientation: self.flag(29)?,
            personality_changes: self.flag(30)?,
            difficulty_completing_tasks: self.flag(31)?,
            forgetfulness: self.flag(32)?,
            diagnosis: self.flag(33)?,
        })
    }
}

/// Reads a header row followed by patient rows.
///
/// The first malformed row aborts the load and nothing is returned.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<PatientRecord>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    if reader.headers()?.is_empty() {
        return Err(DataError::FieldCount {
            line: 1,
            expected: FIELD_COUNT,
            found: 0,
        });
    }

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() != FIELD_COUNT {
            return Err(DataError::FieldCount {
                line,
                expected: FIELD_COUNT,
                found: record.len(),
            });
        }

        records.push(
            Row {
                record: &record,
                line,
            }
            .to_record()?,
        );
    }

    Ok(records)
}

pub fn parse(file_path: impl AsRef<Path>) -> Result<Vec<PatientRecord>, DataError> {
    let file = File::open(file_path.as_ref())?;
    let records = parse_reader(BufReader::new(file))?;

    log::debug!(
        "loaded {} patient records from {}",
        records.len(),
        file_path.as_ref().display()
    );

    Ok(records)
}

impl fmt::Display for PatientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient ID: {}", self.patient_id)?;
        writeln!(f, "Age: {}", self.age)?;
        writeln!(f, "Gender: {}", self.gender)?;
        writeln!(f, "Ethnicity: {}", self.ethnicity)?;
        writeln!(f, "Education: {}", self.education_level)?;
        writeln!(f, "BMI: {:.2}", self.bmi)?;
        writeln!(f, "Smoking: {}", self.smoking)?;
        writeln!(f, "Alcohol Consumption: {:.2}", self.alcohol_consumption)?;
        writeln!(f, "Physical Activity: {:.2}", self.physical_activity)?;
        writeln!(f, "Diet Quality: {:.2}", self.diet_quality)?;
        writeln!(f, "Sleep Quality: {:.2}", self.sleep_quality)?;
        writeln!(f, "Family Alzheimer's: {}", self.family_history_alzheimers)?;
        writeln!(f, "Cardio Disease: {}", self.cardiovascular_disease)?;
        writeln!(f, "Diabetes: {}", self.diabetes)?;
        writeln!(f, "Depression: {}", self.depression)?;
        writeln!(f, "Head Injury: {}", self.head_injury)?;
        writeln!(f, "Hypertension: {}", self.hypertension)?;
        writeln!(f, "Systolic BP: {}", self.systolic_bp)?;
        writeln!(f, "Diastolic BP: {}", self.diastolic_bp)?;
        writeln!(f, "Total Cholesterol: {:.2}", self.cholesterol_total)?;
        writeln!(f, "LDL Cholesterol: {:.2}", self.cholesterol_ldl)?;
        writeln!(f, "HDL Cholesterol: {:.2}", self.cholesterol_hdl)?;
        writeln!(f, "Triglycerides: {:.2}", self.cholesterol_triglycerides)?;
        writeln!(f, "MMSE: {:.2}", self.mmse)?;
        writeln!(f, "Functional Assessment: {:.2}", self.functional_assessment)?;
        writeln!(f, "Memory Complaints: {}", self.memory_complaints)?;
        writeln!(f, "Behavioral Problems: {}", self.behavioral_problems)?;
        writeln!(f, "ADL: {:.2}", self.adl)?;
        writeln!(f, "Confusion: {}", self.confusion)?;
        writeln!(f, "Disorientation: {}", self.disorientation)?;
        writeln!(f, "Personality Changes: {}", self.personality_changes)?;
        writeln!(
            f,
            "Difficulty with Tasks: {}",
            self.difficulty_completing_tasks
        )?;
        writeln!(f, "Forgetfulness: {}", self.forgetfulness)?;
        write!(f, "Diagnosis: {}", self.diagnosis)
    }
}
