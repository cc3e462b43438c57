use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::factors::{
    ByEducation, ComboRule, CredentialTier, Ladder, RangeOp, SplitPoints, Tier,
};

/// Epoch name of the built-in policy.
pub const DEFAULT_EPOCH: &str = "2024-express-entry";

/// Every number the scoring engine uses, grouped by section.
///
/// Point values change between policy epochs; the engine only reads them from
/// here. `PointsPolicy::default()` is the built-in epoch. A different epoch can
/// be supplied through the config file.
///
/// Example YAML (abbreviated):
/// ```yaml
/// epoch: 2024-express-entry
/// core:
///   age:
///     - { range: "20-29", points: { single: 110, married: 100 } }
///   work_year_cap: 5
/// transferability:
///   cap: 100
///   certificate:
///     cap: 50
///     chains:
///       - name: trade
///         rules:
///           - { trade_certificate: true, english_at_least: 7, points: 50 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PointsPolicy {
    pub epoch: String,
    pub core: CorePolicy,
    pub spouse: SpousePolicy,
    pub transferability: TransferabilityPolicy,
    pub additional: AdditionalPolicy,
}

/// Human capital points for the applicant alone.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorePolicy {
    pub age: Ladder<SplitPoints>,
    pub education: ByEducation<SplitPoints>,
    /// Per skill, English
    pub first_language: Ladder<SplitPoints>,
    /// Per skill, French; same points with or without a spouse
    pub second_language: Ladder<u32>,
    /// Keyed by `min(years, work_year_cap)`
    pub domestic_work: Ladder<SplitPoints>,
    pub work_year_cap: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpousePolicy {
    pub education: ByEducation<u32>,
    /// Per skill, English
    pub language: Ladder<u32>,
    /// Keyed by `min(years, work_year_cap)`
    pub work: Ladder<u32>,
    pub work_year_cap: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TransferabilityPolicy {
    pub cap: u32,
    pub education: ComboPolicy,
    pub foreign_work: ComboPolicy,
    pub certificate: ComboPolicy,
}

/// A capped sum of first-match chains.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComboPolicy {
    pub cap: u32,
    pub chains: Vec<ComboChain>,
}

/// Rules evaluated top to bottom; the first matching rule's points count.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComboChain {
    pub name: String,
    pub rules: Vec<ComboRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AdditionalPolicy {
    pub cap: u32,
    pub sibling: u32,
    pub french: Vec<ComboRule>,
    pub domestic_education: DomesticEducationPoints,
    pub provincial_nomination: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DomesticEducationPoints {
    pub one_or_two_year: u32,
    pub three_year_or_more: u32,
}

static DEFAULT_POLICY: LazyLock<PointsPolicy> = LazyLock::new(PointsPolicy::default);

/// The built-in policy, constructed once per process.
pub fn default_policy() -> &'static PointsPolicy {
    &DEFAULT_POLICY
}

fn split(range: RangeOp, single: u32, married: u32) -> Tier<SplitPoints> {
    Tier {
        range,
        points: SplitPoints::new(single, married),
    }
}

fn flat(range: RangeOp, points: u32) -> Tier<u32> {
    Tier { range, points }
}

fn chain(name: &str, rules: Vec<ComboRule>) -> ComboChain {
    ComboChain {
        name: name.to_string(),
        rules,
    }
}

fn default_age() -> Ladder<SplitPoints> {
    use RangeOp::{Between, Equal};

    let mut tiers = vec![
        split(Equal(18), 99, 90),
        split(Equal(19), 105, 95),
        split(Between(20, 29), 110, 100),
    ];
    let decline = [
        (30, 105, 95),
        (31, 99, 90),
        (32, 94, 85),
        (33, 88, 80),
        (34, 83, 75),
        (35, 77, 70),
        (36, 72, 65),
        (37, 66, 60),
        (38, 61, 55),
        (39, 55, 50),
        (40, 50, 45),
        (41, 39, 35),
        (42, 28, 25),
        (43, 17, 15),
        (44, 6, 5),
    ];
    tiers.extend(
        decline
            .into_iter()
            .map(|(age, single, married)| split(Equal(age), single, married)),
    );
    Ladder::new(tiers)
}

fn default_core() -> CorePolicy {
    use RangeOp::{Between, Equal, GreaterEqual};

    CorePolicy {
        age: default_age(),
        education: ByEducation {
            none: SplitPoints::new(0, 0),
            secondary: SplitPoints::new(30, 28),
            one_year: SplitPoints::new(90, 84),
            two_year: SplitPoints::new(98, 91),
            three_year: SplitPoints::new(120, 112),
            two_or_more: SplitPoints::new(128, 119),
            masters: SplitPoints::new(135, 126),
            phd: SplitPoints::new(150, 140),
        },
        first_language: Ladder::new(vec![
            split(GreaterEqual(10), 34, 32),
            split(Equal(9), 31, 29),
            split(Equal(8), 23, 22),
            split(Equal(7), 17, 16),
            split(Equal(6), 9, 8),
            split(Between(4, 5), 6, 6),
        ]),
        second_language: Ladder::new(vec![
            flat(GreaterEqual(9), 6),
            flat(Between(7, 8), 3),
            flat(Between(5, 6), 1),
        ]),
        domestic_work: Ladder::new(vec![
            split(Equal(0), 0, 0),
            split(Equal(1), 40, 35),
            split(Equal(2), 53, 46),
            split(Equal(3), 64, 56),
            split(Equal(4), 72, 63),
            split(Equal(5), 80, 70),
        ]),
        work_year_cap: 5,
    }
}

fn default_spouse() -> SpousePolicy {
    use RangeOp::{Between, Equal, GreaterEqual};

    SpousePolicy {
        education: ByEducation {
            none: 0,
            secondary: 2,
            one_year: 6,
            two_year: 7,
            three_year: 8,
            two_or_more: 9,
            masters: 10,
            phd: 10,
        },
        language: Ladder::new(vec![
            flat(GreaterEqual(9), 5),
            flat(Between(7, 8), 3),
            flat(Between(5, 6), 1),
        ]),
        work: Ladder::new(vec![
            flat(Equal(0), 0),
            flat(Equal(1), 5),
            flat(Equal(2), 7),
            flat(Equal(3), 8),
            flat(Equal(4), 9),
            flat(Equal(5), 10),
        ]),
        work_year_cap: 5,
    }
}

fn default_transferability() -> TransferabilityPolicy {
    use CredentialTier::{Multiple, PostSecondary};
    use RangeOp::{Equal, GreaterEqual};

    let r = ComboRule::points;

    TransferabilityPolicy {
        cap: 100,
        education: ComboPolicy {
            cap: 50,
            chains: vec![
                chain(
                    "language",
                    vec![
                        r(50).english(9).credential(Multiple),
                        r(25).english(9).credential(PostSecondary),
                        r(25).english(7).credential(Multiple),
                        r(13).english(7).credential(PostSecondary),
                    ],
                ),
                chain(
                    "domestic_work",
                    vec![
                        r(50).domestic_years(GreaterEqual(2)).credential(Multiple),
                        r(25).domestic_years(GreaterEqual(2)).credential(PostSecondary),
                        r(25).domestic_years(Equal(1)).credential(Multiple),
                        r(13).domestic_years(Equal(1)).credential(PostSecondary),
                    ],
                ),
            ],
        },
        foreign_work: ComboPolicy {
            cap: 50,
            chains: vec![
                chain(
                    "language",
                    vec![
                        r(50).english(9).foreign_years(GreaterEqual(3)),
                        r(25).english(9).foreign_years(GreaterEqual(1)),
                        r(25).english(7).foreign_years(GreaterEqual(3)),
                        r(13).english(7).foreign_years(GreaterEqual(1)),
                    ],
                ),
                chain(
                    "domestic_work",
                    vec![
                        r(50).domestic_years(GreaterEqual(2)).foreign_years(GreaterEqual(3)),
                        r(25).domestic_years(GreaterEqual(2)).foreign_years(GreaterEqual(1)),
                        r(25).domestic_years(Equal(1)).foreign_years(GreaterEqual(3)),
                        r(13).domestic_years(Equal(1)).foreign_years(GreaterEqual(1)),
                    ],
                ),
            ],
        },
        certificate: ComboPolicy {
            cap: 50,
            chains: vec![chain(
                "trade",
                vec![
                    r(50).trade_certificate(true).english(7),
                    r(25).trade_certificate(true).english(5),
                ],
            )],
        },
    }
}

fn default_additional() -> AdditionalPolicy {
    AdditionalPolicy {
        cap: 600,
        sibling: 15,
        french: vec![
            ComboRule::points(50).french(7).english(5),
            ComboRule::points(25).french(7),
        ],
        domestic_education: DomesticEducationPoints {
            one_or_two_year: 15,
            three_year_or_more: 30,
        },
        provincial_nomination: 600,
    }
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH.to_string(),
            core: default_core(),
            spouse: default_spouse(),
            transferability: default_transferability(),
            additional: default_additional(),
        }
    }
}
