use super::document::{ProfileDocument, ScoresDocument};
use super::labels::parse_education;
use super::types::{ApplicantProfile, EducationLevel, LanguageScore, Spouse};

/// Highest benchmark level a language test can report.
pub const MAX_BENCHMARK: i64 = 12;

/// Validate a profile document and normalize it into an [`ApplicantProfile`].
/// Returns all validation errors at once (not just the first).
///
/// Spouse details on a single applicant are dropped rather than rejected.
pub fn validate_profile(doc: &ProfileDocument) -> Result<ApplicantProfile, Vec<String>> {
    let mut errors = Vec::new();

    let age = non_negative("age", doc.age, &mut errors);
    let education = parse_education_field("education", &doc.education, &mut errors);
    let english = scores("english", &doc.english, &mut errors);
    let french = scores("french", &doc.french, &mut errors);
    let work_years_domestic = non_negative("work_years_domestic", doc.work_years_domestic, &mut errors);
    let work_years_foreign = non_negative("work_years_foreign", doc.work_years_foreign, &mut errors);

    let spouse = match &doc.spouse {
        Some(spouse) if doc.marital_status.has_partner() => Some(Spouse {
            accompanying: spouse.accompanying,
            is_domestic_citizen_or_resident: spouse.domestic_citizen_or_resident,
            education: match &spouse.education {
                Some(level) => parse_education_field("spouse.education", level, &mut errors),
                None => EducationLevel::None,
            },
            work_years_domestic: non_negative(
                "spouse.work_years_domestic",
                spouse.work_years_domestic,
                &mut errors,
            ),
            english: scores("spouse.english", &spouse.english, &mut errors),
        }),
        Some(_) => {
            tracing::debug!("ignoring spouse details on a single applicant");
            None
        }
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ApplicantProfile {
        marital_status: doc.marital_status,
        spouse,
        age,
        education,
        domestic_education: doc.domestic_education,
        english,
        french,
        work_years_domestic,
        work_years_foreign,
        has_trade_certificate: doc.trade_certificate,
        has_provincial_nomination: doc.provincial_nomination,
        has_sibling_domestic: doc.sibling_domestic,
        occupation: doc.occupation,
    })
}

fn non_negative(field: &str, value: i64, errors: &mut Vec<String>) -> u32 {
    match u32::try_from(value) {
        Ok(v) => v,
        Err(_) if value < 0 => {
            errors.push(format!("{}: must be non-negative (got {})", field, value));
            0
        }
        Err(_) => {
            errors.push(format!("{}: value {} is too large", field, value));
            0
        }
    }
}

fn parse_education_field(field: &str, value: &str, errors: &mut Vec<String>) -> EducationLevel {
    parse_education(value).unwrap_or_else(|| {
        errors.push(format!("{}: unknown education level '{}'", field, value));
        EducationLevel::None
    })
}

fn scores(field: &str, doc: &ScoresDocument, errors: &mut Vec<String>) -> LanguageScore {
    let mut skill = |name: &str, value: i64| -> u8 {
        if (0..=MAX_BENCHMARK).contains(&value) {
            value as u8
        } else {
            errors.push(format!(
                "{}.{}: benchmark must be between 0 and {} (got {})",
                field, name, MAX_BENCHMARK, value
            ));
            0
        }
    };

    LanguageScore {
        speak: skill("speak", doc.speak),
        listen: skill("listen", doc.listen),
        read: skill("read", doc.read),
        write: skill("write", doc.write),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::document::SpouseDocument;
    use crate::profile::types::{MaritalStatus, OccupationCategory};

    fn sample_doc() -> ProfileDocument {
        ProfileDocument {
            marital_status: MaritalStatus::Single,
            spouse: None,
            age: 26,
            education: "three_year".to_string(),
            domestic_education: Default::default(),
            english: ScoresDocument {
                speak: 9,
                listen: 9,
                read: 9,
                write: 9,
            },
            french: ScoresDocument::default(),
            work_years_domestic: 3,
            work_years_foreign: 0,
            trade_certificate: false,
            provincial_nomination: false,
            sibling_domestic: false,
            occupation: OccupationCategory::Stem,
        }
    }

    #[test]
    fn test_valid_profile() {
        let profile = validate_profile(&sample_doc()).unwrap();
        assert_eq!(profile.age, 26);
        assert_eq!(profile.education, EducationLevel::ThreeYear);
        assert_eq!(profile.english, LanguageScore::uniform(9));
        assert_eq!(profile.work_years_domestic, 3);
        assert_eq!(profile.occupation, OccupationCategory::Stem);
    }

    #[test]
    fn test_education_label_accepted() {
        let mut doc = sample_doc();
        doc.education = "Doctoral level university degree (Ph.D.)".to_string();
        let profile = validate_profile(&doc).unwrap();
        assert_eq!(profile.education, EducationLevel::PhD);
    }

    #[test]
    fn test_negative_age() {
        let mut doc = sample_doc();
        doc.age = -1;
        let errors = validate_profile(&doc).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("age:"));
    }

    #[test]
    fn test_benchmark_out_of_range() {
        let mut doc = sample_doc();
        doc.english.listen = 13;
        doc.french.write = -2;
        let errors = validate_profile(&doc).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("english.listen"));
        assert!(errors[1].contains("french.write"));
    }

    #[test]
    fn test_unknown_education() {
        let mut doc = sample_doc();
        doc.education = "bootcamp".to_string();
        let errors = validate_profile(&doc).unwrap_err();
        assert!(errors[0].contains("unknown education level 'bootcamp'"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut doc = sample_doc();
        doc.age = -5; // Error 1
        doc.work_years_foreign = -1; // Error 2
        doc.education = "???".to_string(); // Error 3
        let errors = validate_profile(&doc).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_spouse_validated_for_married() {
        let mut doc = sample_doc();
        doc.marital_status = MaritalStatus::Married;
        doc.spouse = Some(SpouseDocument {
            accompanying: true,
            education: Some("masters".to_string()),
            work_years_domestic: -3,
            ..SpouseDocument::default()
        });
        let errors = validate_profile(&doc).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("spouse.work_years_domestic"));

        doc.spouse.as_mut().unwrap().work_years_domestic = 2;
        let profile = validate_profile(&doc).unwrap();
        let spouse = profile.spouse.unwrap();
        assert_eq!(spouse.education, EducationLevel::Masters);
        assert_eq!(spouse.work_years_domestic, 2);
        assert!(profile.scored_with_spouse());
    }

    #[test]
    fn test_unknown_spouse_education() {
        let mut doc = sample_doc();
        doc.marital_status = MaritalStatus::Married;
        doc.education = "bootcamp".to_string();
        doc.spouse = Some(SpouseDocument {
            accompanying: true,
            education: Some("apprenticeship".to_string()),
            ..SpouseDocument::default()
        });
        let errors = validate_profile(&doc).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "education: unknown education level 'bootcamp'".to_string(),
                "spouse.education: unknown education level 'apprenticeship'".to_string(),
            ]
        );
    }

    #[test]
    fn test_spouse_without_education_defaults_to_none() {
        let mut doc = sample_doc();
        doc.marital_status = MaritalStatus::CommonLaw;
        doc.spouse = Some(SpouseDocument {
            accompanying: true,
            ..SpouseDocument::default()
        });
        let profile = validate_profile(&doc).unwrap();
        assert_eq!(profile.spouse.unwrap().education, EducationLevel::None);
    }

    #[test]
    fn test_spouse_dropped_for_single() {
        let mut doc = sample_doc();
        doc.spouse = Some(SpouseDocument {
            accompanying: true,
            work_years_domestic: -10,
            ..SpouseDocument::default()
        });
        let profile = validate_profile(&doc).unwrap();
        assert!(profile.spouse.is_none());
    }
}
