use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::labels::education_key;
use super::types::{
    ApplicantProfile, DomesticEducation, LanguageScore, MaritalStatus, OccupationCategory,
};

/// Applicant profile as written in a YAML file.
///
/// Numbers are kept signed and education is free text so that mistakes reach
/// [`super::validate_profile`], which reports every problem at once instead of
/// failing on the first bad field.
///
/// Example YAML:
/// ```yaml
/// marital_status: married
/// spouse:
///   accompanying: true
///   education: masters
///   english: { speak: 7, listen: 7, read: 7, write: 7 }
/// age: 29
/// education: "Master's degree, or professional degree"
/// english: { speak: 9, listen: 9, read: 9, write: 9 }
/// work_years_domestic: 2
/// occupation: healthcare
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileDocument {
    #[serde(default)]
    pub marital_status: MaritalStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<SpouseDocument>,

    pub age: i64,

    /// Education key (`three_year`) or its long-form label
    pub education: String,

    #[serde(default)]
    pub domestic_education: DomesticEducation,

    pub english: ScoresDocument,

    #[serde(default)]
    pub french: ScoresDocument,

    #[serde(default)]
    pub work_years_domestic: i64,

    #[serde(default)]
    pub work_years_foreign: i64,

    #[serde(default)]
    pub trade_certificate: bool,

    #[serde(default)]
    pub provincial_nomination: bool,

    #[serde(default)]
    pub sibling_domestic: bool,

    #[serde(default)]
    pub occupation: OccupationCategory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpouseDocument {
    #[serde(default)]
    pub accompanying: bool,

    #[serde(default)]
    pub domestic_citizen_or_resident: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,

    #[serde(default)]
    pub work_years_domestic: i64,

    #[serde(default)]
    pub english: ScoresDocument,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoresDocument {
    #[serde(default)]
    pub speak: i64,
    #[serde(default)]
    pub listen: i64,
    #[serde(default)]
    pub read: i64,
    #[serde(default)]
    pub write: i64,
}

impl From<LanguageScore> for ScoresDocument {
    fn from(score: LanguageScore) -> Self {
        Self {
            speak: score.speak.into(),
            listen: score.listen.into(),
            read: score.read.into(),
            write: score.write.into(),
        }
    }
}

impl From<&ApplicantProfile> for ProfileDocument {
    fn from(profile: &ApplicantProfile) -> Self {
        Self {
            marital_status: profile.marital_status,
            spouse: profile.spouse.map(|spouse| SpouseDocument {
                accompanying: spouse.accompanying,
                domestic_citizen_or_resident: spouse.is_domestic_citizen_or_resident,
                education: Some(education_key(spouse.education).to_string()),
                work_years_domestic: spouse.work_years_domestic.into(),
                english: spouse.english.into(),
            }),
            age: profile.age.into(),
            education: education_key(profile.education).to_string(),
            domestic_education: profile.domestic_education,
            english: profile.english.into(),
            french: profile.french.into(),
            work_years_domestic: profile.work_years_domestic.into(),
            work_years_foreign: profile.work_years_foreign.into(),
            trade_certificate: profile.has_trade_certificate,
            provincial_nomination: profile.has_provincial_nomination,
            sibling_domestic: profile.has_sibling_domestic,
            occupation: profile.occupation,
        }
    }
}

/// Read and parse a profile document from a YAML file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or not a valid profile
/// document. Field-level problems (negative ages and so on) are left to
/// validation.
pub fn load_profile(path: &Path) -> Result<ProfileDocument> {
    if !path.exists() {
        anyhow::bail!("Profile file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile at {}", path.display()))?;

    parse_profile(&content)
        .with_context(|| format!("Failed to parse profile: invalid YAML in {}", path.display()))
}

pub fn parse_profile(yaml: &str) -> Result<ProfileDocument> {
    let document: ProfileDocument = serde_saphyr::from_str(yaml)?;
    Ok(document)
}

/// Render a profile back to YAML, e.g. after the questionnaire.
pub fn to_yaml(profile: &ApplicantProfile) -> Result<String> {
    serde_saphyr::to_string(&ProfileDocument::from(profile))
        .map_err(|e| anyhow::anyhow!("Failed to serialize profile: {}", e))
}
