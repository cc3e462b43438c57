//! Display labels for profile enums.
//!
//! The scoring engine only ever sees the enums; labels are how the questionnaire
//! and profile documents talk to people.

use super::types::{DomesticEducation, EducationLevel, MaritalStatus, OccupationCategory};

const EDUCATION_LABELS: [(EducationLevel, &str, &str); 8] = [
    (
        EducationLevel::None,
        "none",
        "Less than secondary school (high school)",
    ),
    (
        EducationLevel::Secondary,
        "secondary",
        "Secondary diploma (high school graduation)",
    ),
    (
        EducationLevel::OneYear,
        "one_year",
        "One-year degree, diploma or certificate",
    ),
    (EducationLevel::TwoYear, "two_year", "Two-year program"),
    (
        EducationLevel::ThreeYear,
        "three_year",
        "Bachelor's degree OR three or more year program",
    ),
    (
        EducationLevel::TwoOrMore,
        "two_or_more",
        "Two or more certificates/degrees (One must be for 3+ years)",
    ),
    (
        EducationLevel::Masters,
        "masters",
        "Master's degree, or professional degree",
    ),
    (
        EducationLevel::PhD,
        "phd",
        "Doctoral level university degree (Ph.D.)",
    ),
];

/// Long-form description shown to applicants.
pub fn education_label(level: EducationLevel) -> &'static str {
    EDUCATION_LABELS
        .iter()
        .find(|(l, _, _)| *l == level)
        .map(|(_, _, label)| *label)
        .unwrap_or("")
}

/// Short machine key used in profile documents (e.g. `three_year`).
pub fn education_key(level: EducationLevel) -> &'static str {
    EDUCATION_LABELS
        .iter()
        .find(|(l, _, _)| *l == level)
        .map(|(_, key, _)| *key)
        .unwrap_or("")
}

/// Resolve either a key (case-insensitive) or an exact long-form label.
pub fn parse_education(input: &str) -> Option<EducationLevel> {
    let input = input.trim();
    EDUCATION_LABELS
        .iter()
        .find(|(_, key, label)| key.eq_ignore_ascii_case(input) || *label == input)
        .map(|(level, _, _)| *level)
}

pub fn marital_status_label(status: MaritalStatus) -> &'static str {
    match status {
        MaritalStatus::Single => "Single",
        MaritalStatus::Married => "Married",
        MaritalStatus::CommonLaw => "Common-Law",
    }
}

pub fn domestic_education_label(tier: DomesticEducation) -> &'static str {
    match tier {
        DomesticEducation::None => "None",
        DomesticEducation::OneOrTwoYear => "One- or two-year diploma or certificate",
        DomesticEducation::ThreeYearOrMore => "Degree, diploma or certificate of three years or more",
    }
}

pub fn occupation_label(category: OccupationCategory) -> &'static str {
    match category {
        OccupationCategory::General => "General",
        OccupationCategory::Healthcare => "Healthcare",
        OccupationCategory::Stem => "STEM",
        OccupationCategory::Trades => "Trades",
        OccupationCategory::Transport => "Transport",
        OccupationCategory::Agriculture => "Agriculture",
        OccupationCategory::French => "French",
        OccupationCategory::None => "None",
    }
}
