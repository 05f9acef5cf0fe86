//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names are camelCase to stay wire compatible with the quiz front end.

use serde::{Deserialize, Serialize};

use crate::domain::{Attempt, DifficultyFilter, Mode, Question, Section, UserAnswer};
use crate::grading::GradedItem;
use crate::handbook::{handbook_entry, handbook_hints};
use crate::templates::templates_for;

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

/// One exam section as listed by `GET /api/v1/sections`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOut {
    pub name: String,
    pub subsections: Vec<String>,
    pub expected_questions: String,
    pub template_count: usize,
    pub handbook_hints: Vec<String>,
}

pub fn section_out(section: &Section) -> SectionOut {
    let entry = handbook_entry(section);
    SectionOut {
        name: section.name().to_string(),
        subsections: entry
            .map(|e| e.subsections.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default(),
        expected_questions: entry.map(|e| e.question_count_label()).unwrap_or_default(),
        template_count: templates_for(section).len(),
        handbook_hints: handbook_hints(section),
    }
}

#[derive(Debug, Serialize)]
pub struct SectionsOut {
    pub sections: Vec<SectionOut>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestOut {
    pub topic: String,
    pub sections: Vec<Section>,
}

/// Relative weights of question kinds. Without `numeric`, `mcq` is read as a
/// fraction on its own.
#[derive(Debug, Deserialize)]
pub struct TypeDistribution {
    pub mcq: f64,
    #[serde(default)]
    pub numeric: Option<f64>,
}

impl TypeDistribution {
    pub fn mcq_fraction(&self) -> f64 {
        match self.numeric {
            Some(numeric) if self.mcq + numeric > 0.0 => self.mcq / (self.mcq + numeric),
            _ => self.mcq,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIn {
    pub sections: Vec<Section>,
    #[serde(default)]
    pub difficulty: DifficultyFilter,
    pub count: i64,
    #[serde(default)]
    pub type_distribution: Option<TypeDistribution>,
    #[serde(default)]
    pub mcq_fraction: Option<f64>,
    #[serde(default)]
    pub mode: Mode,
}

impl GenerateIn {
    /// Explicit `mcqFraction` wins over `typeDistribution.mcq`; otherwise the
    /// configured default applies.
    pub fn resolved_mcq_fraction(&self, default: f64) -> f64 {
        self.mcq_fraction
            .or_else(|| self.type_distribution.as_ref().map(TypeDistribution::mcq_fraction))
            .unwrap_or(default)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeIn {
    pub quiz_id: String,
    pub questions: Vec<Question>,
    pub answers: Vec<UserAnswer>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
pub struct GradeOut {
    pub attempt: Attempt,
    pub answers: Vec<GradedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_body_accepts_front_end_shape() {
        let body: GenerateIn = serde_json::from_str(
            r#"{"sections": ["Statics", "Fluid Mechanics"], "difficulty": "mixed", "count": 10,
                "typeDistribution": {"mcq": 0.6, "numeric": 0.4}, "mode": "exam"}"#,
        )
        .expect("parse");
        assert_eq!(body.sections, vec![Section::Statics, Section::FluidMechanics]);
        assert_eq!(body.mode, Mode::Timed);
        assert_eq!(body.resolved_mcq_fraction(0.8), 0.6);
    }

    #[test]
    fn generate_body_defaults() {
        let body: GenerateIn = serde_json::from_str(r#"{"sections": ["Chemistry"], "count": 3}"#).expect("parse");
        assert_eq!(body.difficulty, DifficultyFilter::Mixed);
        assert_eq!(body.mode, Mode::Practice);
        assert_eq!(body.resolved_mcq_fraction(0.8), 0.8);
    }

    #[test]
    fn type_distribution_weights_are_normalized() {
        let weights = TypeDistribution { mcq: 3.0, numeric: Some(1.0) };
        assert_eq!(weights.mcq_fraction(), 0.75);
        let only_mcq = TypeDistribution { mcq: 0.7, numeric: None };
        assert_eq!(only_mcq.mcq_fraction(), 0.7);
        let zeros = TypeDistribution { mcq: 0.0, numeric: Some(0.0) };
        assert_eq!(zeros.mcq_fraction(), 0.0);

        let body: GenerateIn = serde_json::from_str(
            r#"{"sections": ["Statics"], "count": 8, "typeDistribution": {"mcq": 80, "numeric": 20}}"#,
        )
        .expect("parse");
        assert!((body.resolved_mcq_fraction(0.5) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn sections_listing_covers_handbook_and_templates() {
        let out = section_out(&Section::EngineeringEconomics);
        assert_eq!(out.name, "Engineering Economics");
        assert!(!out.subsections.is_empty());
        assert_eq!(out.template_count, 3);
        assert_eq!(section_out(&Section::EthicsSocietalImpacts).template_count, 0);
    }
}
