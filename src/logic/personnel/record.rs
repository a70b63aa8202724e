//! Personnel Record - raw input to the pipeline
//!
//! Fields are optional because callers hand in partial mappings.
//! Missing values are resolved later against explicit default tables,
//! never here.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::category::{CategoricalField, LeadershipPotential, Rank};
use super::fields::NumericField;
use crate::error::{Result, ScoringError};

// ============================================================================
// SKILLS
// ============================================================================

/// Skills tracked by the skill clustering model, in one-hot order
pub const SKILL_COUNT: usize = 15;

pub const SKILL_CATALOGUE: [&str; SKILL_COUNT] = [
    "Fighter Aircraft",
    "Transport Aircraft",
    "Helicopter Operations",
    "Aircraft Maintenance",
    "Avionics",
    "Radar Systems",
    "Cyber Security",
    "Administration",
    "Logistics",
    "Intelligence",
    "Aviation Medicine",
    "Emergency Medicine",
    "Training",
    "Leadership",
    "Strategic Planning",
];

/// Skill set, serialized as a comma-joined string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skills(BTreeSet<String>);

impl Skills {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-joined list; blanks and duplicates are dropped
    pub fn parse(joined: &str) -> Self {
        joined.split(',').collect()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn insert(&mut self, skill: impl Into<String>) {
        let skill = skill.into();
        let trimmed = skill.trim();
        if !trimmed.is_empty() {
            self.0.insert(trimmed.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }

    /// 1.0 for every catalogue skill held, 0.0 otherwise
    pub fn one_hot(&self) -> [f64; SKILL_COUNT] {
        SKILL_CATALOGUE.map(|skill| if self.contains(skill) { 1.0 } else { 0.0 })
    }
}

impl<S: AsRef<str>> FromIterator<S> for Skills {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut skills = Skills::new();
        for s in iter {
            skills.insert(s.as_ref());
        }
        skills
    }
}

impl Serialize for Skills {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsRepr {
    Joined(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for Skills {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match SkillsRepr::deserialize(deserializer)? {
            SkillsRepr::Joined(s) => Skills::parse(&s),
            SkillsRepr::List(list) => list.into_iter().collect(),
        })
    }
}

// ============================================================================
// PERSONNEL RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonnelRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,

    // Categorical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_clearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leadership_potential: Option<LeadershipPotential>,

    // Numeric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_service: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missions_participated: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_review_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leadership_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_records: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disciplinary_actions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaints: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_grade: Option<f64>,

    #[serde(default, alias = "skills_str", skip_serializing_if = "Skills::is_empty")]
    pub skills: Skills,

    // Labels (present in training data only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrition_risk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_score: Option<f64>,
}

impl PersonnelRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Raw numeric value, `None` when the field is absent
    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Age => self.age,
            NumericField::YearsOfService => self.years_of_service,
            NumericField::FitnessScore => self.fitness_score,
            NumericField::StressIndex => self.stress_index,
            NumericField::MissionsParticipated => self.missions_participated,
            NumericField::MissionSuccessRate => self.mission_success_rate,
            NumericField::PeerReviewScore => self.peer_review_score,
            NumericField::LeadershipScore => self.leadership_score,
            NumericField::EngagementScore => self.engagement_score,
            NumericField::LeaveRecords => self.leave_records,
            NumericField::DisciplinaryActions => self.disciplinary_actions,
            NumericField::Complaints => self.complaints,
            NumericField::SalaryGrade => self.salary_grade,
        }
    }

    pub fn set_numeric(&mut self, field: NumericField, value: Option<f64>) {
        let slot = match field {
            NumericField::Age => &mut self.age,
            NumericField::YearsOfService => &mut self.years_of_service,
            NumericField::FitnessScore => &mut self.fitness_score,
            NumericField::StressIndex => &mut self.stress_index,
            NumericField::MissionsParticipated => &mut self.missions_participated,
            NumericField::MissionSuccessRate => &mut self.mission_success_rate,
            NumericField::PeerReviewScore => &mut self.peer_review_score,
            NumericField::LeadershipScore => &mut self.leadership_score,
            NumericField::EngagementScore => &mut self.engagement_score,
            NumericField::LeaveRecords => &mut self.leave_records,
            NumericField::DisciplinaryActions => &mut self.disciplinary_actions,
            NumericField::Complaints => &mut self.complaints,
            NumericField::SalaryGrade => &mut self.salary_grade,
        };
        *slot = value;
    }

    /// Raw categorical value, `None` when the field is absent
    pub fn category(&self, field: CategoricalField) -> Option<&str> {
        match field {
            CategoricalField::Rank => self.rank.as_ref().map(Rank::as_str),
            CategoricalField::Branch => self.branch.as_deref(),
            CategoricalField::Unit => self.unit.as_deref(),
            CategoricalField::Gender => self.gender.as_deref(),
            CategoricalField::FamilyStatus => self.family_status.as_deref(),
            CategoricalField::EducationLevel => self.education_level.as_deref(),
            CategoricalField::DeploymentStatus => self.deployment_status.as_deref(),
            CategoricalField::SecurityClearance => self.security_clearance.as_deref(),
            CategoricalField::PerformanceRating => self.performance_rating.as_deref(),
            CategoricalField::LeadershipPotential => {
                self.leadership_potential.as_ref().map(LeadershipPotential::as_str)
            }
        }
    }

    /// Categorical value with the field default applied
    pub fn category_or_default(&self, field: CategoricalField) -> &str {
        self.category(field).unwrap_or_else(|| field.default_value())
    }

    fn set_category(&mut self, field: CategoricalField, value: &str) -> Result<()> {
        let owned = Some(value.trim().to_string());
        match field {
            CategoricalField::Rank => self.rank = Some(value.parse()?),
            CategoricalField::LeadershipPotential => {
                self.leadership_potential = Some(value.parse()?)
            }
            CategoricalField::Branch => self.branch = owned,
            CategoricalField::Unit => self.unit = owned,
            CategoricalField::Gender => self.gender = owned,
            CategoricalField::FamilyStatus => self.family_status = owned,
            CategoricalField::EducationLevel => self.education_level = owned,
            CategoricalField::DeploymentStatus => self.deployment_status = owned,
            CategoricalField::SecurityClearance => self.security_clearance = owned,
            CategoricalField::PerformanceRating => self.performance_rating = owned,
        }
        Ok(())
    }

    /// Build a record from a loosely typed field mapping
    ///
    /// Numbers may arrive as JSON numbers or numeric strings. Unknown keys are
    /// ignored; `null` counts as absent.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut record = PersonnelRecord {
            id: map.get("id").map(value_to_text).unwrap_or_default(),
            name: map.get("name").map(value_to_text).unwrap_or_default(),
            ..Default::default()
        };

        for field in NumericField::ALL {
            let value = match map.get(field.as_str()) {
                None | Some(Value::Null) => None,
                Some(v) => Some(value_to_f64(field.as_str(), v)?),
            };
            record.set_numeric(field, value);
        }

        for field in CategoricalField::ALL {
            match map.get(field.as_str()) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) if s.trim().is_empty() => {}
                Some(v @ (Value::String(_) | Value::Number(_))) => {
                    record.set_category(field, &value_to_text(v))?;
                }
                Some(_) => {
                    return Err(ScoringError::invalid(field.as_str(), "expected a string"));
                }
            }
        }

        if let Some(v) = map.get("skills").or_else(|| map.get("skills_str")) {
            record.skills = match v {
                Value::String(s) => Skills::parse(s),
                Value::Array(items) => items.iter().map(value_to_text).collect(),
                Value::Null => Skills::new(),
                _ => return Err(ScoringError::invalid("skills", "expected a string or a list")),
            };
        }

        record.attrition_risk = match map.get("attrition_risk") {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Some(true),
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => Some(false),
            Some(v) => Some(value_to_f64("attrition_risk", v)? != 0.0),
        };

        record.readiness_score = match map.get("readiness_score") {
            None | Some(Value::Null) => None,
            Some(v) => Some(value_to_f64("readiness_score", v)?),
        };

        Ok(record)
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn value_to_f64(field: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ScoringError::invalid(field, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ScoringError::invalid(field, format!("'{}' is not a number", s))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(ScoringError::invalid(field, "expected a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skills_one_hot() {
        let skills = Skills::parse("Avionics,Leadership,Underwater Basket Weaving");
        let one_hot = skills.one_hot();
        assert_eq!(one_hot.iter().sum::<f64>(), 2.0);
        assert_eq!(one_hot[4], 1.0);
        assert_eq!(one_hot[13], 1.0);
    }

    #[test]
    fn test_skills_parse_ignores_order_and_duplicates() {
        let a = Skills::parse("Avionics, Logistics,Avionics,,");
        let b = Skills::parse("Logistics,Avionics");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.joined(), "Avionics,Logistics");
    }

    #[test]
    fn test_skills_deserialize_string_or_list() {
        let from_str: Skills = serde_json::from_value(json!("Training,Leadership")).unwrap();
        let from_list: Skills = serde_json::from_value(json!(["Leadership", "Training"])).unwrap();
        assert_eq!(from_str, from_list);
    }

    #[test]
    fn test_from_map_accepts_numeric_strings() {
        let map = json!({
            "id": "IAF_000001",
            "name": "Officer_1",
            "rank": "Wing Commander",
            "fitness_score": "88",
            "stress_index": 35,
            "mission_success_rate": 0.93,
            "skills_str": "Avionics,Radar Systems",
            "attrition_risk": 0,
            "leadership_potential": "High"
        });
        let record = PersonnelRecord::from_map(map.as_object().unwrap()).unwrap();

        assert_eq!(record.id, "IAF_000001");
        assert_eq!(record.rank, Some(Rank::WingCommander));
        assert_eq!(record.fitness_score, Some(88.0));
        assert_eq!(record.stress_index, Some(35.0));
        assert_eq!(record.years_of_service, None);
        assert!(record.skills.contains("Radar Systems"));
        assert_eq!(record.attrition_risk, Some(false));
        assert_eq!(record.leadership_potential, Some(LeadershipPotential::High));
    }

    #[test]
    fn test_from_map_attrition_flag_spellings() {
        for (raw, expected) in [(json!("True"), true), (json!("false"), false), (json!("1"), true), (json!(0.0), false)] {
            let map = json!({ "attrition_risk": raw });
            let record = PersonnelRecord::from_map(map.as_object().unwrap()).unwrap();
            assert_eq!(record.attrition_risk, Some(expected));
        }
    }

    #[test]
    fn test_from_map_rejects_garbage_numbers() {
        let map = json!({ "fitness_score": "fit" });
        let err = PersonnelRecord::from_map(map.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidField { ref field, .. } if field == "fitness_score"));
    }

    #[test]
    fn test_from_map_rejects_unknown_rank() {
        let map = json!({ "rank": "Ground_Staff" });
        assert!(PersonnelRecord::from_map(map.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_category_or_default() {
        let mut record = PersonnelRecord::new("x", "y");
        assert_eq!(record.category_or_default(CategoricalField::Branch), "Flying");
        record.branch = Some("Technical".to_string());
        assert_eq!(record.category_or_default(CategoricalField::Branch), "Technical");
    }

    #[test]
    fn test_serde_skips_absent_fields() {
        let record = PersonnelRecord::new("IAF_1", "A");
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("fitness_score").is_none());
        assert!(value.get("skills").is_none());
    }
}
