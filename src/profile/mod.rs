pub mod document;
pub mod labels;
pub mod questionnaire;
pub mod types;
pub mod validation;

pub use document::{load_profile, parse_profile, to_yaml, ProfileDocument, ScoresDocument, SpouseDocument};
pub use questionnaire::run_questionnaire;
pub use types::{
    ApplicantProfile, DomesticEducation, EducationLevel, LanguageScore, MaritalStatus,
    OccupationCategory, Spouse,
};
pub use validation::validate_profile;
