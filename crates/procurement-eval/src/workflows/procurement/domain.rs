use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::lenient::{
    date_or_none, flag_or_false, number_or_zero, numbers_or_empty, optional_flag, optional_text,
    record_or_default, records_or_empty, text_map_or_empty, text_or_empty, texts_or_empty,
    variant_or_default,
};

/// Identifier wrapper for registered procurement processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProcessId(pub String);

impl ProcessId {
    pub fn is_unassigned(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<'de> Deserialize<'de> for ProcessId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        text_or_empty(deserializer).map(ProcessId)
    }
}

/// Identifier wrapper for bidders registered against a process.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProponentId(pub String);

impl ProponentId {
    pub fn is_unassigned(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<'de> Deserialize<'de> for ProponentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        text_or_empty(deserializer).map(ProponentId)
    }
}

/// The six fixed scoring criteria of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringCriterion {
    WomanEntrepreneurship,
    Mipyme,
    Disabled,
    QualityFactor,
    EnvironmentalQuality,
    NationalIndustrySupport,
}

impl ScoringCriterion {
    pub const ALL: [ScoringCriterion; 6] = [
        ScoringCriterion::WomanEntrepreneurship,
        ScoringCriterion::Mipyme,
        ScoringCriterion::Disabled,
        ScoringCriterion::QualityFactor,
        ScoringCriterion::EnvironmentalQuality,
        ScoringCriterion::NationalIndustrySupport,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScoringCriterion::WomanEntrepreneurship => "Emprendimientos de mujeres",
            ScoringCriterion::Mipyme => "Mipyme",
            ScoringCriterion::Disabled => "Personas con discapacidad",
            ScoringCriterion::QualityFactor => "Factor de calidad",
            ScoringCriterion::EnvironmentalQuality => "Calidad ambiental",
            ScoringCriterion::NationalIndustrySupport => "Apoyo a la industria nacional",
        }
    }

    /// Values a process may declare as this criterion's maximum.
    pub const fn allowed_maxima(self) -> &'static [f64] {
        match self {
            ScoringCriterion::WomanEntrepreneurship => &[0.0, 0.25],
            ScoringCriterion::Mipyme => &[0.0, 0.25],
            ScoringCriterion::Disabled => &[0.0, 1.0],
            ScoringCriterion::QualityFactor => &[0.0, 10.0, 19.0, 20.0],
            ScoringCriterion::EnvironmentalQuality => &[0.0, 5.0, 10.0],
            ScoringCriterion::NationalIndustrySupport => &[0.0, 5.0, 10.0, 20.0],
        }
    }
}

/// Maximum score a process grants for each criterion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringMaxima {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub woman_entrepreneurship: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub mipyme: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub disabled: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub quality_factor: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub environmental_quality: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub national_industry_support: f64,
}

impl ScoringMaxima {
    pub fn get(&self, criterion: ScoringCriterion) -> f64 {
        match criterion {
            ScoringCriterion::WomanEntrepreneurship => self.woman_entrepreneurship,
            ScoringCriterion::Mipyme => self.mipyme,
            ScoringCriterion::Disabled => self.disabled,
            ScoringCriterion::QualityFactor => self.quality_factor,
            ScoringCriterion::EnvironmentalQuality => self.environmental_quality,
            ScoringCriterion::NationalIndustrySupport => self.national_industry_support,
        }
    }

    /// Criteria whose declared maximum is not one of the values the criterion allows.
    pub fn outside_domain(&self) -> Vec<ScoringCriterion> {
        ScoringCriterion::ALL
            .into_iter()
            .filter(|criterion| {
                let maximum = self.get(*criterion);
                !criterion
                    .allowed_maxima()
                    .iter()
                    .any(|allowed| (allowed - maximum).abs() < f64::EPSILON)
            })
            .collect()
    }
}

/// Unit in which an additional specific-experience requirement is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementUnit {
    Length,
    CoveredArea,
    ExecutedArea,
    Smmlv,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl MeasurementUnit {
    pub const fn label(self) -> &'static str {
        match self {
            MeasurementUnit::Length => "m",
            MeasurementUnit::CoveredArea => "m2 cubiertos",
            MeasurementUnit::ExecutedArea => "m2 ejecutados",
            MeasurementUnit::Smmlv => "SMMLV",
            MeasurementUnit::Unspecified => "",
        }
    }
}

/// Quantified specific-experience requirement (e.g. kilometres of road built).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCriterion {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub value: f64,
    #[serde(default, deserialize_with = "variant_or_default")]
    pub unit: MeasurementUnit,
}

/// Experience requirements of a process. Narrative requirements are verified by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequirements {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub general: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub specific: String,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub additional_specific: Vec<AdditionalCriterion>,
}

/// Rules of one procurement process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinition {
    #[serde(default)]
    pub id: ProcessId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "date_or_none")]
    pub closing_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "record_or_default")]
    pub scoring_maxima: ScoringMaxima,
    #[serde(default, deserialize_with = "record_or_default")]
    pub experience_requirements: ExperienceRequirements,
    #[serde(default, deserialize_with = "texts_or_empty")]
    pub classifier_codes: Vec<String>,
}

impl ProcessDefinition {
    pub fn additional_criteria(&self) -> &[AdditionalCriterion] {
        &self.experience_requirements.additional_specific
    }
}

/// Member of a consortium or temporary union.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "date_or_none")]
    pub rup_renewal_date: Option<NaiveDate>,
}

/// Registry (RUP) credential of a single proponent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RupStatus {
    #[serde(default, deserialize_with = "date_or_none")]
    pub renewal_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub complies: bool,
}

/// Score awarded per criterion. Values are either zero or the process maximum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoring {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub woman_entrepreneurship: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub mipyme: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub disabled: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub quality_factor: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub environmental_quality: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub national_industry_support: f64,
    #[serde(default, deserialize_with = "text_map_or_empty")]
    pub comments: BTreeMap<ScoringCriterion, String>,
    /// Partner credited with the disability criterion on plural proponents.
    #[serde(default, deserialize_with = "optional_text")]
    pub disability_partner: Option<String>,
}

impl Scoring {
    pub fn value(&self, criterion: ScoringCriterion) -> f64 {
        match criterion {
            ScoringCriterion::WomanEntrepreneurship => self.woman_entrepreneurship,
            ScoringCriterion::Mipyme => self.mipyme,
            ScoringCriterion::Disabled => self.disabled,
            ScoringCriterion::QualityFactor => self.quality_factor,
            ScoringCriterion::EnvironmentalQuality => self.environmental_quality,
            ScoringCriterion::NationalIndustrySupport => self.national_industry_support,
        }
    }

    /// Non-blank comment recorded for the criterion.
    pub fn comment(&self, criterion: ScoringCriterion) -> Option<&str> {
        self.comments
            .get(&criterion)
            .map(|comment| comment.trim())
            .filter(|comment| !comment.is_empty())
    }
}

/// Outcome of one additional criterion, mirroring the process list by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalComplianceResult {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub complies: bool,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub comment: String,
}

/// Manually verified eligibility requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, deserialize_with = "flag_or_false")]
    pub general_experience: bool,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub specific_experience: bool,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub professional_card: bool,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub additional_specific: Vec<AdditionalComplianceResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    #[default]
    #[serde(alias = "publico", alias = "público")]
    Public,
    #[serde(alias = "privado")]
    Private,
}

/// Past contract supplied as experience evidence. Owned by its proponent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub contracting_entity: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub contract_number: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub object: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub services_code: String,
    #[serde(default, alias = "totalValueSMMLV", deserialize_with = "number_or_zero")]
    pub total_value_smmlv: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub participation_percentage: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub adjusted_value: f64,
    #[serde(default, deserialize_with = "numbers_or_empty")]
    pub additional_specific_experience_contribution: Vec<f64>,
    #[serde(default, deserialize_with = "numbers_or_empty")]
    pub adjusted_additional_specific_value: Vec<f64>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub experience_contributor: String,
    #[serde(default, deserialize_with = "variant_or_default")]
    pub contract_type: ContractType,
    #[serde(default, deserialize_with = "optional_flag")]
    pub private_documents_complete: Option<bool>,
    #[serde(default, deserialize_with = "texts_or_empty")]
    pub selected_classifier_codes: Vec<String>,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub classifier_codes_match: bool,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub contract_complies: bool,
    #[serde(default, deserialize_with = "optional_text")]
    pub non_compliance_reason: Option<String>,
}

/// One evaluated bidder together with its derived evaluation fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proponent {
    #[serde(default)]
    pub id: ProponentId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub is_plural: bool,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub partners: Vec<Partner>,
    #[serde(default, deserialize_with = "record_or_default")]
    pub rup: RupStatus,
    #[serde(default, deserialize_with = "record_or_default")]
    pub scoring: Scoring,
    #[serde(default, deserialize_with = "record_or_default")]
    pub requirements: Requirements,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub contractors: Vec<Contract>,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_score: f64,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub needs_subsanation: bool,
    #[serde(default, deserialize_with = "texts_or_empty")]
    pub subsanation_details: Vec<String>,
}
