//! Manual entry forms for each disease model
//!
//! Each disease has a fixed field schema in the order the server expects.
//! Form state keeps numeric inputs as raw text so half-typed values survive
//! between frames; `to_request` is the only place text becomes numbers.

use crate::types::{DiseaseType, PredictionRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number { min: Option<f64>, max: Option<f64> },
    Flag,
    Sex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn number(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Number { min: Some(0.0), max: None } }
}

const fn ranged(name: &'static str, label: &'static str, min: f64, max: f64) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Number { min: Some(min), max: Some(max) } }
}

const fn unbounded(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Number { min: None, max: None } }
}

const fn flag(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Flag }
}

const fn sex(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Sex }
}

const AGE: FieldSpec = ranged("age", "Age", 0.0, 120.0);

pub const DIABETES_FIELDS: &[FieldSpec] = &[
    AGE,
    sex("gender", "Gender"),
    flag("polyuria", "Polyuria"),
    flag("polydipsia", "Polydipsia"),
    flag("weight_loss", "Weight Loss"),
    flag("weakness", "Weakness"),
    flag("polyphagia", "Polyphagia"),
    flag("genital_thrush", "Genital Thrush"),
    flag("visual_blurring", "Visual Blurring"),
    flag("itching", "Itching"),
    flag("irritability", "Irritability"),
    flag("delayed_healing", "Delayed Healing"),
    flag("partial_paresis", "Partial Paresis"),
    flag("muscle_stiffness", "Muscle Stiffness"),
    flag("alopecia", "Alopecia"),
    flag("obesity", "Obesity"),
];

pub const HEART_FIELDS: &[FieldSpec] = &[
    AGE,
    sex("sex", "Sex"),
    ranged("chest_pain_type", "Chest Pain Type (0-3)", 0.0, 3.0),
    number("resting_bp", "Resting Blood Pressure"),
    number("cholesterol", "Cholesterol"),
    number("fasting_bs", "Fasting Blood Sugar"),
    ranged("resting_ecg", "Resting ECG (0-2)", 0.0, 2.0),
    number("max_hr", "Max Heart Rate"),
    flag("exercise_angina", "Exercise Angina"),
    unbounded("old_peak", "Old Peak"),
    ranged("st_slope", "ST Slope (0-2)", 0.0, 2.0),
];

pub const THYROID_FIELDS: &[FieldSpec] = &[
    AGE,
    sex("sex", "Sex"),
    flag("on_thyroxine", "On Thyroxine"),
    flag("query_on_thyroxine", "Query On Thyroxine"),
    flag("on_antithyroid_medication", "On Antithyroid Medication"),
    flag("sick", "Sick"),
    flag("pregnant", "Pregnant"),
    flag("thyroid_surgery", "Thyroid Surgery"),
    flag("i131_treatment", "I131 Treatment"),
    flag("query_hypothyroid", "Query Hypothyroid"),
    flag("query_hyperthyroid", "Query Hyperthyroid"),
    flag("lithium", "Lithium"),
    flag("goitre", "Goitre"),
    flag("tumor", "Tumor"),
    flag("hypopituitary", "Hypopituitary"),
    flag("psych", "Psych"),
    number("tsh", "TSH"),
    number("t3", "T3"),
    number("tt4", "TT4"),
    number("t4u", "T4U"),
    number("fti", "FTI"),
];

pub fn schema(disease: DiseaseType) -> &'static [FieldSpec] {
    match disease {
        DiseaseType::Diabetes => DIABETES_FIELDS,
        DiseaseType::Heart => HEART_FIELDS,
        DiseaseType::Thyroid => THYROID_FIELDS,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Sex(Option<Sex>),
}

impl FieldValue {
    fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Number { .. } => FieldValue::Text(String::new()),
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::Sex => FieldValue::Sex(None),
        }
    }
}

/// Editable state for one disease form
#[derive(Debug, Clone)]
pub struct DiseaseForm {
    disease: DiseaseType,
    values: Vec<FieldValue>,
}

impl DiseaseForm {
    pub fn new(disease: DiseaseType) -> Self {
        let values = schema(disease).iter().map(|f| FieldValue::empty(f.kind)).collect();
        Self { disease, values }
    }

    pub fn disease(&self) -> DiseaseType {
        self.disease
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.disease);
    }

    /// Schema entries paired with their editable values, for rendering
    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&'static FieldSpec, &mut FieldValue)> {
        schema(self.disease).iter().zip(self.values.iter_mut())
    }

    #[cfg(test)]
    fn index_of(&self, name: &str) -> Option<usize> {
        schema(self.disease).iter().position(|f| f.name == name)
    }

    #[cfg(test)]
    pub fn set_text(&mut self, name: &str, text: &str) -> bool {
        match self.index_of(name).map(|i| &mut self.values[i]) {
            Some(FieldValue::Text(t)) => {
                *t = text.to_string();
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn set_flag(&mut self, name: &str, on: bool) -> bool {
        match self.index_of(name).map(|i| &mut self.values[i]) {
            Some(FieldValue::Flag(f)) => {
                *f = on;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn set_sex(&mut self, name: &str, value: Sex) -> bool {
        match self.index_of(name).map(|i| &mut self.values[i]) {
            Some(FieldValue::Sex(s)) => {
                *s = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Build the request body. Fails with one user-facing message on the
    /// first missing or malformed field.
    pub fn to_request(&self) -> Result<PredictionRequest, String> {
        let mut req = PredictionRequest::new();
        for (spec, value) in schema(self.disease).iter().zip(&self.values) {
            match (spec.kind, value) {
                (FieldKind::Number { min, max }, FieldValue::Text(text)) => {
                    let n = parse_number(spec.label, text)?;
                    check_range(spec.label, n, min, max)?;
                    req.insert_number(spec.name, n);
                }
                (FieldKind::Flag, FieldValue::Flag(on)) => req.insert_bool(spec.name, *on),
                (FieldKind::Sex, FieldValue::Sex(Some(s))) => req.insert_str(spec.name, s.as_str()),
                (FieldKind::Sex, FieldValue::Sex(None)) => {
                    return Err(format!("{} is required", spec.label));
                }
                _ => return Err(format!("{} has an invalid value", spec.label)),
            }
        }
        Ok(req)
    }
}

fn parse_number(label: &str, text: &str) -> Result<f64, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(format!("{} is required", label));
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(format!("{} must be a number", label)),
    }
}

fn check_range(label: &str, n: f64, min: Option<f64>, max: Option<f64>) -> Result<(), String> {
    match (min, max) {
        (Some(lo), Some(hi)) if n < lo || n > hi => {
            Err(format!("{} must be between {} and {}", label, lo, hi))
        }
        (Some(lo), _) if n < lo => Err(format!("{} must be at least {}", label, lo)),
        (_, Some(hi)) if n > hi => Err(format!("{} must be at most {}", label, hi)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(disease: DiseaseType) -> DiseaseForm {
        let mut form = DiseaseForm::new(disease);
        for (spec, value) in form.fields_mut() {
            match value {
                FieldValue::Text(t) => *t = if spec.name == "age" { "52".into() } else { "1".into() },
                FieldValue::Sex(s) => *s = Some(Sex::Female),
                FieldValue::Flag(_) => {}
            }
        }
        form
    }

    #[test]
    fn schemas_match_server_feature_order() {
        let heart: Vec<&str> = HEART_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(
            heart,
            [
                "age", "sex", "chest_pain_type", "resting_bp", "cholesterol", "fasting_bs",
                "resting_ecg", "max_hr", "exercise_angina", "old_peak", "st_slope"
            ]
        );
        assert_eq!(DIABETES_FIELDS.len(), 16);
        assert_eq!(THYROID_FIELDS.len(), 21);
    }

    #[test]
    fn complete_form_populates_every_field() {
        for disease in DiseaseType::ALL {
            let req = filled(disease).to_request().unwrap();
            assert_eq!(req.len(), schema(disease).len(), "{}", disease);
            for spec in schema(disease) {
                assert!(req.get(spec.name).is_some(), "{} missing {}", disease, spec.name);
            }
        }
    }

    #[test]
    fn empty_form_reports_first_missing_field() {
        let form = DiseaseForm::new(DiseaseType::Heart);
        assert_eq!(form.to_request().unwrap_err(), "Age is required");
    }

    #[test]
    fn missing_sex_is_rejected() {
        let mut form = DiseaseForm::new(DiseaseType::Diabetes);
        form.set_text("age", "40");
        assert_eq!(form.to_request().unwrap_err(), "Gender is required");
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let mut form = filled(DiseaseType::Heart);
        assert!(form.set_text("cholesterol", "high"));
        assert_eq!(form.to_request().unwrap_err(), "Cholesterol must be a number");
    }

    #[test]
    fn ranged_fields_are_checked() {
        let mut form = filled(DiseaseType::Heart);
        form.set_text("chest_pain_type", "4");
        assert_eq!(
            form.to_request().unwrap_err(),
            "Chest Pain Type (0-3) must be between 0 and 3"
        );
        form.set_text("chest_pain_type", "3");
        form.set_text("age", "-1");
        assert!(form.to_request().is_err());
    }

    #[test]
    fn old_peak_may_be_negative() {
        let mut form = filled(DiseaseType::Heart);
        form.set_text("old_peak", "-1.5");
        let req = form.to_request().unwrap();
        assert_eq!(req.get("old_peak"), Some(&serde_json::json!(-1.5)));
    }

    #[test]
    fn values_are_typed_on_the_wire() {
        let mut form = filled(DiseaseType::Diabetes);
        form.set_sex("gender", Sex::Male);
        form.set_flag("obesity", true);
        form.set_text("age", " 61 ");
        let req = form.to_request().unwrap();
        assert_eq!(req.get("gender"), Some(&serde_json::json!("male")));
        assert_eq!(req.get("obesity"), Some(&serde_json::json!(true)));
        assert_eq!(req.get("itching"), Some(&serde_json::json!(false)));
        assert_eq!(req.get("age"), Some(&serde_json::json!(61.0)));
    }

    #[test]
    fn setters_reject_wrong_kind_or_unknown_field() {
        let mut form = DiseaseForm::new(DiseaseType::Thyroid);
        assert!(!form.set_flag("tsh", true));
        assert!(!form.set_text("pregnant", "1"));
        assert!(!form.set_text("cholesterol", "200"));
    }

    #[test]
    fn reset_clears_values() {
        let mut form = filled(DiseaseType::Thyroid);
        form.reset();
        assert_eq!(form.to_request().unwrap_err(), "Age is required");
        assert_eq!(form.disease(), DiseaseType::Thyroid);
    }
}
