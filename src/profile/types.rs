use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    CommonLaw,
}

impl MaritalStatus {
    /// Married and common-law applicants may bring a partner into the calculation.
    pub fn has_partner(self) -> bool {
        matches!(self, MaritalStatus::Married | MaritalStatus::CommonLaw)
    }
}

/// Highest completed credential, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EducationLevel {
    #[default]
    None,
    Secondary,
    OneYear,
    TwoYear,
    ThreeYear,
    TwoOrMore,
    Masters,
    PhD,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 8] = [
        EducationLevel::None,
        EducationLevel::Secondary,
        EducationLevel::OneYear,
        EducationLevel::TwoYear,
        EducationLevel::ThreeYear,
        EducationLevel::TwoOrMore,
        EducationLevel::Masters,
        EducationLevel::PhD,
    ];

    /// Anything beyond a secondary diploma.
    pub fn is_post_secondary(self) -> bool {
        !matches!(self, EducationLevel::None | EducationLevel::Secondary)
    }

    /// Two or more credentials, a master's or a doctorate.
    pub fn is_multi_credential(self) -> bool {
        matches!(
            self,
            EducationLevel::TwoOrMore | EducationLevel::Masters | EducationLevel::PhD
        )
    }
}

/// Education completed inside the country, used for the additional-points bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomesticEducation {
    #[default]
    None,
    OneOrTwoYear,
    ThreeYearOrMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationCategory {
    General,
    Healthcare,
    Stem,
    Trades,
    Transport,
    Agriculture,
    French,
    #[default]
    None,
}

/// Benchmark levels for the four language skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct LanguageScore {
    pub speak: u8,
    pub listen: u8,
    pub read: u8,
    pub write: u8,
}

impl LanguageScore {
    pub const fn new(speak: u8, listen: u8, read: u8, write: u8) -> Self {
        Self {
            speak,
            listen,
            read,
            write,
        }
    }

    /// Same benchmark level in every skill.
    pub const fn uniform(level: u8) -> Self {
        Self::new(level, level, level, level)
    }

    pub fn skills(&self) -> [u8; 4] {
        [self.speak, self.listen, self.read, self.write]
    }

    /// Lowest of the four skills; "all four at least N" is `weakest() >= N`.
    pub fn weakest(&self) -> u8 {
        self.skills().into_iter().min().unwrap_or(0)
    }

    pub fn all_at_least(&self, level: u8) -> bool {
        self.weakest() >= level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spouse {
    pub accompanying: bool,
    pub is_domestic_citizen_or_resident: bool,
    pub education: EducationLevel,
    pub work_years_domestic: u32,
    pub english: LanguageScore,
}

/// Validated applicant profile consumed by the scoring engine.
///
/// Built either from a profile document (see [`super::validate_profile`]) or by
/// the interactive questionnaire. Every field carries an explicit value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicantProfile {
    pub marital_status: MaritalStatus,
    pub spouse: Option<Spouse>,
    pub age: u32,
    pub education: EducationLevel,
    pub domestic_education: DomesticEducation,
    pub english: LanguageScore,
    pub french: LanguageScore,
    pub work_years_domestic: u32,
    pub work_years_foreign: u32,
    pub has_trade_certificate: bool,
    pub has_provincial_nomination: bool,
    pub has_sibling_domestic: bool,
    pub occupation: OccupationCategory,
}

impl ApplicantProfile {
    /// The spouse whose presence switches every core table to the married column.
    ///
    /// Only a partner who is accompanying and is not already a citizen or
    /// permanent resident counts.
    pub fn accompanying_spouse(&self) -> Option<&Spouse> {
        if !self.marital_status.has_partner() {
            return None;
        }
        self.spouse
            .as_ref()
            .filter(|s| s.accompanying && !s.is_domestic_citizen_or_resident)
    }

    pub fn scored_with_spouse(&self) -> bool {
        self.accompanying_spouse().is_some()
    }
}
