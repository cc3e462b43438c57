use super::breakdown::{
    AdditionalSection, CoreSection, ScoreBreakdown, SpouseSection, TransferabilitySection,
};
use super::factors::{first_match, Ladder};
use super::policy::{
    default_policy, AdditionalPolicy, ComboPolicy, CorePolicy, PointsPolicy, SpousePolicy,
    TransferabilityPolicy,
};
use crate::profile::{ApplicantProfile, DomesticEducation, LanguageScore, Spouse};

/// Score a profile against the built-in policy.
pub fn compute_breakdown(profile: &ApplicantProfile) -> ScoreBreakdown {
    compute_breakdown_with(profile, default_policy())
}

/// Score a profile against an explicit policy.
///
/// Pure and total: every input produces a breakdown. Section subtotals are
/// capped by the policy; the total is their plain sum.
pub fn compute_breakdown_with(profile: &ApplicantProfile, policy: &PointsPolicy) -> ScoreBreakdown {
    let spouse = profile.accompanying_spouse();
    let with_spouse = spouse.is_some();

    let core = core_section(profile, &policy.core, with_spouse);
    let spouse = spouse
        .map(|s| spouse_section(s, &policy.spouse))
        .unwrap_or_default();
    let transferability = transferability_section(profile, &policy.transferability);
    let additional = additional_section(profile, &policy.additional);

    ScoreBreakdown {
        total: points_sum([
            core.subtotal,
            spouse.subtotal,
            transferability.subtotal,
            additional.subtotal,
        ]),
        core,
        spouse,
        transferability,
        additional,
    }
}

fn core_section(profile: &ApplicantProfile, policy: &CorePolicy, with_spouse: bool) -> CoreSection {
    let age = policy.age.lookup(profile.age).pick(with_spouse);
    let education = policy.education.get(profile.education).pick(with_spouse);
    let first = points_sum(
        per_skill(&policy.first_language, &profile.english).map(|points| points.pick(with_spouse)),
    );
    let second = points_sum(per_skill(&policy.second_language, &profile.french));
    let domestic_work = policy
        .domestic_work
        .lookup(profile.work_years_domestic.min(policy.work_year_cap))
        .pick(with_spouse);

    let language = first.saturating_add(second);
    CoreSection {
        age,
        education,
        language,
        domestic_work,
        subtotal: points_sum([age, education, language, domestic_work]),
    }
}

fn spouse_section(spouse: &Spouse, policy: &SpousePolicy) -> SpouseSection {
    let education = policy.education.get(spouse.education);
    let language = points_sum(per_skill(&policy.language, &spouse.english));
    let work = policy
        .work
        .lookup(spouse.work_years_domestic.min(policy.work_year_cap));

    SpouseSection {
        education,
        language,
        work,
        subtotal: points_sum([education, language, work]),
    }
}

fn transferability_section(
    profile: &ApplicantProfile,
    policy: &TransferabilityPolicy,
) -> TransferabilitySection {
    let education = combo(&policy.education, profile);
    let foreign_work = combo(&policy.foreign_work, profile);
    let certificate = combo(&policy.certificate, profile);

    TransferabilitySection {
        education,
        foreign_work,
        certificate,
        subtotal: points_sum([education, foreign_work, certificate]).min(policy.cap),
    }
}

fn additional_section(profile: &ApplicantProfile, policy: &AdditionalPolicy) -> AdditionalSection {
    let sibling = if profile.has_sibling_domestic {
        policy.sibling
    } else {
        0
    };
    let french = first_match(&policy.french, profile);
    let domestic_education = match profile.domestic_education {
        DomesticEducation::None => 0,
        DomesticEducation::OneOrTwoYear => policy.domestic_education.one_or_two_year,
        DomesticEducation::ThreeYearOrMore => policy.domestic_education.three_year_or_more,
    };
    let provincial_nomination = if profile.has_provincial_nomination {
        policy.provincial_nomination
    } else {
        0
    };

    AdditionalSection {
        sibling,
        french,
        domestic_education,
        provincial_nomination,
        subtotal: points_sum([sibling, french, domestic_education, provincial_nomination])
            .min(policy.cap),
    }
}

/// Sum of each chain's first match, capped.
fn combo(policy: &ComboPolicy, profile: &ApplicantProfile) -> u32 {
    points_sum(
        policy
            .chains
            .iter()
            .map(|chain| first_match(&chain.rules, profile)),
    )
    .min(policy.cap)
}

/// Saturating sum, so oversized policy values pin at `u32::MAX` before caps apply.
fn points_sum(points: impl IntoIterator<Item = u32>) -> u32 {
    points.into_iter().fold(0, u32::saturating_add)
}

fn per_skill<P: Copy + Default>(ladder: &Ladder<P>, score: &LanguageScore) -> [P; 4] {
    score.skills().map(|level| ladder.lookup(u32::from(level)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{EducationLevel, MaritalStatus};
    use crate::scoring::factors::SplitPoints;
    use proptest::prelude::*;

    fn scenario_profile() -> ApplicantProfile {
        ApplicantProfile {
            age: 26,
            education: EducationLevel::ThreeYear,
            english: LanguageScore::uniform(9),
            work_years_domestic: 3,
            domestic_education: DomesticEducation::ThreeYearOrMore,
            ..ApplicantProfile::default()
        }
    }

    fn spouse() -> Spouse {
        Spouse {
            accompanying: true,
            is_domestic_citizen_or_resident: false,
            education: EducationLevel::Masters,
            work_years_domestic: 2,
            english: LanguageScore::uniform(7),
        }
    }

    #[test]
    fn test_single_graduate_scenario() {
        let b = compute_breakdown(&scenario_profile());

        assert_eq!(b.core.age, 110);
        assert_eq!(b.core.education, 120);
        assert_eq!(b.core.language, 124);
        assert_eq!(b.core.domestic_work, 64);
        assert_eq!(b.core.subtotal, 418);
        assert_eq!(b.spouse, SpouseSection::default());
        assert_eq!(b.transferability.education, 50);
        assert_eq!(b.transferability.foreign_work, 0);
        assert_eq!(b.transferability.subtotal, 50);
        assert_eq!(b.additional.domestic_education, 30);
        assert_eq!(b.additional.subtotal, 30);
        assert_eq!(b.total, 498);
    }

    #[test]
    fn test_provincial_nomination_caps_additional() {
        let profile = ApplicantProfile {
            has_provincial_nomination: true,
            has_sibling_domestic: true,
            french: LanguageScore::uniform(7),
            english: LanguageScore::uniform(5),
            domestic_education: DomesticEducation::ThreeYearOrMore,
            ..ApplicantProfile::default()
        };
        let b = compute_breakdown(&profile);
        assert_eq!(b.additional.provincial_nomination, 600);
        assert_eq!(b.additional.sibling, 15);
        assert_eq!(b.additional.french, 50);
        assert_eq!(b.additional.subtotal, 600);
    }

    #[test]
    fn test_french_bonus_without_english() {
        let profile = ApplicantProfile {
            french: LanguageScore::uniform(7),
            english: LanguageScore::new(5, 5, 5, 4),
            ..ApplicantProfile::default()
        };
        assert_eq!(compute_breakdown(&profile).additional.french, 25);

        let weak = ApplicantProfile {
            french: LanguageScore::new(7, 7, 7, 6),
            ..ApplicantProfile::default()
        };
        assert_eq!(compute_breakdown(&weak).additional.french, 0);
    }

    #[test]
    fn test_married_with_spouse_uses_married_column() {
        let profile = ApplicantProfile {
            marital_status: MaritalStatus::Married,
            spouse: Some(spouse()),
            ..scenario_profile()
        };
        let b = compute_breakdown(&profile);

        assert_eq!(b.core.age, 100);
        assert_eq!(b.core.education, 112);
        assert_eq!(b.core.language, 116);
        assert_eq!(b.core.domestic_work, 56);
        assert_eq!(b.spouse.education, 10);
        assert_eq!(b.spouse.language, 12);
        assert_eq!(b.spouse.work, 7);
        assert_eq!(b.spouse.subtotal, 29);
        assert_eq!(
            b.total,
            b.core.subtotal + b.spouse.subtotal + b.transferability.subtotal + b.additional.subtotal
        );
    }

    #[test]
    fn test_domestic_spouse_scores_as_single() {
        let profile = ApplicantProfile {
            marital_status: MaritalStatus::CommonLaw,
            spouse: Some(Spouse {
                is_domestic_citizen_or_resident: true,
                ..spouse()
            }),
            ..scenario_profile()
        };
        assert_eq!(compute_breakdown(&profile), compute_breakdown(&scenario_profile()));
    }

    #[test]
    fn test_age_outside_range_scores_zero() {
        for age in [0, 17, 45, 80] {
            let profile = ApplicantProfile {
                age,
                ..ApplicantProfile::default()
            };
            assert_eq!(compute_breakdown(&profile).core.age, 0, "age {}", age);
        }
    }

    #[test]
    fn test_work_years_are_capped() {
        let five = ApplicantProfile {
            work_years_domestic: 5,
            ..ApplicantProfile::default()
        };
        let twelve = ApplicantProfile {
            work_years_domestic: 12,
            ..ApplicantProfile::default()
        };
        assert_eq!(compute_breakdown(&five).core.domestic_work, 80);
        assert_eq!(
            compute_breakdown(&twelve).core.domestic_work,
            compute_breakdown(&five).core.domestic_work
        );
    }

    #[test]
    fn test_second_language_added_to_core() {
        let profile = ApplicantProfile {
            french: LanguageScore::new(9, 8, 6, 4),
            ..ApplicantProfile::default()
        };
        assert_eq!(compute_breakdown(&profile).core.language, 6 + 3 + 1);
    }

    #[test]
    fn test_transferability_caps() {
        let profile = ApplicantProfile {
            education: EducationLevel::PhD,
            english: LanguageScore::uniform(10),
            work_years_domestic: 3,
            work_years_foreign: 3,
            has_trade_certificate: true,
            ..ApplicantProfile::default()
        };
        let b = compute_breakdown(&profile);
        assert_eq!(b.transferability.education, 50);
        assert_eq!(b.transferability.foreign_work, 50);
        assert_eq!(b.transferability.certificate, 50);
        assert_eq!(b.transferability.subtotal, 100);
    }

    #[test]
    fn test_certificate_tiers() {
        let mut profile = ApplicantProfile {
            has_trade_certificate: true,
            english: LanguageScore::uniform(5),
            ..ApplicantProfile::default()
        };
        assert_eq!(compute_breakdown(&profile).transferability.certificate, 25);
        profile.english = LanguageScore::uniform(4);
        assert_eq!(compute_breakdown(&profile).transferability.certificate, 0);
    }

    #[test]
    fn test_custom_policy_changes_points() {
        let mut policy = PointsPolicy::default();
        policy.additional.sibling = 20;
        let profile = ApplicantProfile {
            has_sibling_domestic: true,
            ..ApplicantProfile::default()
        };
        assert_eq!(compute_breakdown_with(&profile, &policy).additional.sibling, 20);
        assert_eq!(compute_breakdown(&profile).additional.sibling, 15);
    }

    #[test]
    fn test_oversized_policy_values_saturate() {
        let mut policy = PointsPolicy::default();
        policy.additional.provincial_nomination = u32::MAX;
        policy.additional.cap = u32::MAX;
        policy.core.education.phd = SplitPoints::new(u32::MAX, u32::MAX);
        let profile = ApplicantProfile {
            education: EducationLevel::PhD,
            has_provincial_nomination: true,
            has_sibling_domestic: true,
            ..scenario_profile()
        };
        let b = compute_breakdown_with(&profile, &policy);
        assert_eq!(b.core.subtotal, u32::MAX);
        assert_eq!(b.additional.subtotal, u32::MAX);
        assert_eq!(b.total, u32::MAX);
    }

    #[test]
    fn test_transferability_middle_tiers() {
        // (education, english, domestic years, foreign years) -> (education combo, foreign work combo)
        let cases = [
            (EducationLevel::ThreeYear, 7, 1, 1, 26, 26),
            (EducationLevel::ThreeYear, 7, 1, 3, 26, 50),
            (EducationLevel::Masters, 7, 0, 0, 25, 0),
            (EducationLevel::ThreeYear, 9, 6, 0, 50, 0),
            (EducationLevel::Secondary, 9, 1, 2, 0, 38),
            (EducationLevel::Secondary, 7, 0, 1, 0, 13),
            (EducationLevel::TwoYear, 8, 2, 0, 38, 0),
            (EducationLevel::PhD, 6, 0, 5, 0, 0),
        ];
        for (education, english, domestic, foreign, expected_education, expected_foreign) in cases {
            let profile = ApplicantProfile {
                education,
                english: LanguageScore::uniform(english),
                work_years_domestic: domestic,
                work_years_foreign: foreign,
                ..ApplicantProfile::default()
            };
            let t = compute_breakdown(&profile).transferability;
            let case = format!("{:?} CLB {} domestic {} foreign {}", education, english, domestic, foreign);
            assert_eq!(t.education, expected_education, "{}", case);
            assert_eq!(t.foreign_work, expected_foreign, "{}", case);
            assert_eq!(t.subtotal, expected_education + expected_foreign, "{}", case);
        }
    }

    #[test]
    fn test_long_domestic_careers_count_in_combos() {
        for years in [2, 5, 6, 10] {
            let profile = ApplicantProfile {
                education: EducationLevel::OneYear,
                work_years_domestic: years,
                work_years_foreign: 1,
                ..ApplicantProfile::default()
            };
            let t = compute_breakdown(&profile).transferability;
            assert_eq!(t.education, 25, "{} years", years);
            assert_eq!(t.foreign_work, 25, "{} years", years);
        }
    }

    #[test]
    fn test_age_curve_shape() {
        let married = |age: u32| ApplicantProfile {
            age,
            marital_status: MaritalStatus::Married,
            spouse: Some(spouse()),
            ..ApplicantProfile::default()
        };
        let single = |age: u32| ApplicantProfile {
            age,
            ..ApplicantProfile::default()
        };

        let columns: [(&str, &dyn Fn(u32) -> ApplicantProfile, u32); 2] =
            [("single", &single, 110), ("married", &married, 100)];
        for (column, profile_at, peak) in columns {
            let points: Vec<u32> = (0..=60)
                .map(|age| compute_breakdown(&profile_at(age)).core.age)
                .collect();
            for age in 0..=60usize {
                let p = points[age];
                match age {
                    0..=17 | 45..=60 => assert_eq!(p, 0, "{} age {}", column, age),
                    20..=29 => assert_eq!(p, peak, "{} age {}", column, age),
                    18 | 19 => assert!(p > 0 && p < points[age + 1], "{} age {}", column, age),
                    _ => assert!(p > 0 && p < points[age - 1], "{} age {}", column, age),
                }
            }
            assert_eq!(points.iter().max(), Some(&peak));
        }
    }

    #[test]
    fn test_married_domestic_work_caps_at_five_years() {
        for years in 5..=9 {
            let profile = ApplicantProfile {
                marital_status: MaritalStatus::Married,
                spouse: Some(spouse()),
                work_years_domestic: years,
                ..ApplicantProfile::default()
            };
            assert_eq!(compute_breakdown(&profile).core.domestic_work, 70, "{} years", years);
        }
    }

    fn language() -> impl Strategy<Value = LanguageScore> {
        (0u8..=12, 0u8..=12, 0u8..=12, 0u8..=12).prop_map(|(s, l, r, w)| LanguageScore::new(s, l, r, w))
    }

    fn education() -> impl Strategy<Value = EducationLevel> {
        prop::sample::select(EducationLevel::ALL.to_vec())
    }

    fn marital() -> impl Strategy<Value = MaritalStatus> {
        prop::sample::select(vec![
            MaritalStatus::Single,
            MaritalStatus::Married,
            MaritalStatus::CommonLaw,
        ])
    }

    fn domestic_education() -> impl Strategy<Value = DomesticEducation> {
        prop::sample::select(vec![
            DomesticEducation::None,
            DomesticEducation::OneOrTwoYear,
            DomesticEducation::ThreeYearOrMore,
        ])
    }

    fn spouse_strategy() -> impl Strategy<Value = Option<Spouse>> {
        prop::option::of(
            (any::<bool>(), any::<bool>(), education(), 0u32..10, language()).prop_map(
                |(accompanying, domestic, education, years, english)| Spouse {
                    accompanying,
                    is_domestic_citizen_or_resident: domestic,
                    education,
                    work_years_domestic: years,
                    english,
                },
            ),
        )
    }

    fn profile_strategy() -> impl Strategy<Value = ApplicantProfile> {
        (
            (marital(), spouse_strategy(), 0u32..70, education(), domestic_education()),
            (language(), language(), 0u32..15, 0u32..15),
            (any::<bool>(), any::<bool>(), any::<bool>()),
        )
            .prop_map(
                |(
                    (marital_status, spouse, age, education, domestic_education),
                    (english, french, work_years_domestic, work_years_foreign),
                    (has_trade_certificate, has_provincial_nomination, has_sibling_domestic),
                )| ApplicantProfile {
                    marital_status,
                    spouse,
                    age,
                    education,
                    domestic_education,
                    english,
                    french,
                    work_years_domestic,
                    work_years_foreign,
                    has_trade_certificate,
                    has_provincial_nomination,
                    has_sibling_domestic,
                    ..ApplicantProfile::default()
                },
            )
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_sections(profile in profile_strategy()) {
            let b = compute_breakdown(&profile);
            prop_assert_eq!(
                b.total,
                b.core.subtotal + b.spouse.subtotal + b.transferability.subtotal + b.additional.subtotal
            );
            prop_assert_eq!(
                b.core.subtotal,
                b.core.age + b.core.education + b.core.language + b.core.domestic_work
            );
        }

        #[test]
        fn prop_section_caps_hold(profile in profile_strategy()) {
            let b = compute_breakdown(&profile);
            prop_assert!(b.transferability.education <= 50);
            prop_assert!(b.transferability.foreign_work <= 50);
            prop_assert!(b.transferability.certificate <= 50);
            prop_assert!(b.transferability.subtotal <= 100);
            prop_assert!(b.additional.subtotal <= 600);
        }

        #[test]
        fn prop_spouse_zero_unless_scored(profile in profile_strategy()) {
            let b = compute_breakdown(&profile);
            if !profile.scored_with_spouse() {
                prop_assert_eq!(b.spouse, SpouseSection::default());
            }
        }

        #[test]
        fn prop_deterministic(profile in profile_strategy()) {
            prop_assert_eq!(compute_breakdown(&profile), compute_breakdown(&profile));
        }

        #[test]
        fn prop_more_english_never_lowers_core_language(
            profile in profile_strategy(),
            skill in 0usize..4,
        ) {
            let mut better = profile.clone();
            match skill {
                0 => better.english.speak = better.english.speak.saturating_add(1),
                1 => better.english.listen = better.english.listen.saturating_add(1),
                2 => better.english.read = better.english.read.saturating_add(1),
                _ => better.english.write = better.english.write.saturating_add(1),
            }
            prop_assert!(
                compute_breakdown(&better).core.language >= compute_breakdown(&profile).core.language
            );
        }
    }
}
