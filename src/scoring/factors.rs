use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::profile::{ApplicantProfile, EducationLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    LessThan(u32),
    LessEqual(u32),
    GreaterThan(u32),
    GreaterEqual(u32),
    Equal(u32),
    Between(u32, u32), // Inclusive range: N-M
}

/// Comparison prefixes, longest first so `>=` wins over `>`.
const PREFIXED: [(&str, fn(u32) -> RangeOp); 4] = [
    (">=", RangeOp::GreaterEqual),
    ("<=", RangeOp::LessEqual),
    (">", RangeOp::GreaterThan),
    ("<", RangeOp::LessThan),
];

impl FromStr for RangeOp {
    type Err = anyhow::Error;

    /// Accepts `<N`, `<=N`, `>N`, `>=N`, `N-M` (inclusive) or a plain `N`.
    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let bound = |part: &str| -> Result<u32> {
            part.trim()
                .parse()
                .with_context(|| format!("invalid bound '{}' in range '{}'", part.trim(), text))
        };

        if let Some((rest, make)) = PREFIXED
            .iter()
            .find_map(|(prefix, make)| text.strip_prefix(prefix).map(|rest| (rest, make)))
        {
            return Ok(make(bound(rest)?));
        }

        match text.split_once('-') {
            None => Ok(RangeOp::Equal(bound(text)?)),
            Some((low, _)) if low.trim().is_empty() => {
                bail!("range '{}' must not be negative", text)
            }
            Some((low, high)) => Ok(RangeOp::Between(bound(low)?, bound(high)?)),
        }
    }
}

impl RangeOp {
    pub fn matches(&self, value: u32) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }

    /// Inclusive `(low, high)` bounds, or `None` when nothing can match.
    pub fn bounds(&self) -> Option<(u32, u32)> {
        match *self {
            RangeOp::LessThan(0) => None,
            RangeOp::LessThan(n) => Some((0, n - 1)),
            RangeOp::LessEqual(n) => Some((0, n)),
            RangeOp::GreaterThan(u32::MAX) => None,
            RangeOp::GreaterThan(n) => Some((n + 1, u32::MAX)),
            RangeOp::GreaterEqual(n) => Some((n, u32::MAX)),
            RangeOp::Equal(n) => Some((n, n)),
            RangeOp::Between(low, high) if low > high => None,
            RangeOp::Between(low, high) => Some((low, high)),
        }
    }

    /// True when every value matched by `other` is also matched by `self`.
    pub fn covers(&self, other: &RangeOp) -> bool {
        match (self.bounds(), other.bounds()) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some((lo, hi)), Some((other_lo, other_hi))) => lo <= other_lo && hi >= other_hi,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

impl Serialize for RangeOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct RangeOpVisitor;

impl serde::de::Visitor<'_> for RangeOpVisitor {
    type Value = RangeOp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a range such as \"<4\", \">=10\", \"20-29\" or a plain number")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<RangeOp, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<RangeOp, E> {
        u32::try_from(v)
            .map(RangeOp::Equal)
            .map_err(|_| E::custom(format!("range value {} is too large", v)))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<RangeOp, E> {
        u32::try_from(v)
            .map(RangeOp::Equal)
            .map_err(|_| E::custom(format!("range value {} must be non-negative", v)))
    }
}

// Plain numbers are accepted so `range: 5` works without quotes.
impl<'de> Deserialize<'de> for RangeOp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RangeOpVisitor)
    }
}

/// Points that depend on whether a spouse is part of the calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SplitPoints {
    pub single: u32,
    pub married: u32,
}

impl SplitPoints {
    pub const fn new(single: u32, married: u32) -> Self {
        Self { single, married }
    }

    pub fn pick(&self, with_spouse: bool) -> u32 {
        if with_spouse {
            self.married
        } else {
            self.single
        }
    }
}

/// One row of a [`Ladder`]: a range and the points it awards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Tier<P> {
    pub range: RangeOp,
    pub points: P,
}

/// Ordered point tiers. The first tier whose range matches wins; no match
/// scores the default (zero) points.
///
/// Example YAML:
/// ```yaml
/// - { range: ">=10", points: { single: 34, married: 32 } }
/// - { range: "9", points: { single: 31, married: 29 } }
/// - { range: "4-5", points: { single: 6, married: 6 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Ladder<P> {
    pub tiers: Vec<Tier<P>>,
}

impl<P: Copy + Default> Ladder<P> {
    pub fn new(tiers: Vec<Tier<P>>) -> Self {
        Self { tiers }
    }

    pub fn lookup(&self, value: u32) -> P {
        self.tiers
            .iter()
            .find(|tier| tier.range.matches(value))
            .map(|tier| tier.points)
            .unwrap_or_default()
    }
}

/// Points awarded per education level. Total by construction: every level
/// has a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ByEducation<P> {
    pub none: P,
    pub secondary: P,
    pub one_year: P,
    pub two_year: P,
    pub three_year: P,
    pub two_or_more: P,
    pub masters: P,
    pub phd: P,
}

impl<P: Copy> ByEducation<P> {
    /// Every level's points, lowest level first.
    pub fn values(&self) -> [P; 8] {
        [
            self.none,
            self.secondary,
            self.one_year,
            self.two_year,
            self.three_year,
            self.two_or_more,
            self.masters,
            self.phd,
        ]
    }

    pub fn get(&self, level: EducationLevel) -> P {
        match level {
            EducationLevel::None => self.none,
            EducationLevel::Secondary => self.secondary,
            EducationLevel::OneYear => self.one_year,
            EducationLevel::TwoYear => self.two_year,
            EducationLevel::ThreeYear => self.three_year,
            EducationLevel::TwoOrMore => self.two_or_more,
            EducationLevel::Masters => self.masters,
            EducationLevel::PhD => self.phd,
        }
    }
}

/// Credential groups used by combination rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialTier {
    /// Any credential beyond a secondary diploma
    PostSecondary,
    /// Two or more credentials, a master's or a doctorate
    Multiple,
}

impl CredentialTier {
    pub fn holds(self, level: EducationLevel) -> bool {
        match self {
            CredentialTier::PostSecondary => level.is_post_secondary(),
            CredentialTier::Multiple => level.is_multi_credential(),
        }
    }
}

/// Conditions plus points. All present conditions must hold for the rule to
/// match; a rule with no conditions always matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComboRule {
    /// Every English skill at or above this benchmark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_at_least: Option<u8>,

    /// Every French skill at or above this benchmark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub french_at_least: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialTier>,

    /// Years of domestic skilled work (uncapped)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domestic_years: Option<RangeOp>,

    /// Years of foreign skilled work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_years: Option<RangeOp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_certificate: Option<bool>,

    pub points: u32,
}

impl ComboRule {
    pub fn points(points: u32) -> Self {
        Self {
            english_at_least: None,
            french_at_least: None,
            credential: None,
            domestic_years: None,
            foreign_years: None,
            trade_certificate: None,
            points,
        }
    }

    pub fn english(mut self, level: u8) -> Self {
        self.english_at_least = Some(level);
        self
    }

    pub fn french(mut self, level: u8) -> Self {
        self.french_at_least = Some(level);
        self
    }

    pub fn credential(mut self, tier: CredentialTier) -> Self {
        self.credential = Some(tier);
        self
    }

    pub fn domestic_years(mut self, range: RangeOp) -> Self {
        self.domestic_years = Some(range);
        self
    }

    pub fn foreign_years(mut self, range: RangeOp) -> Self {
        self.foreign_years = Some(range);
        self
    }

    pub fn trade_certificate(mut self, required: bool) -> Self {
        self.trade_certificate = Some(required);
        self
    }

    pub fn is_unconditional(&self) -> bool {
        self.english_at_least.is_none()
            && self.french_at_least.is_none()
            && self.credential.is_none()
            && self.domestic_years.is_none()
            && self.foreign_years.is_none()
            && self.trade_certificate.is_none()
    }

    pub fn matches(&self, profile: &ApplicantProfile) -> bool {
        self.english_at_least
            .map_or(true, |level| profile.english.all_at_least(level))
            && self
                .french_at_least
                .map_or(true, |level| profile.french.all_at_least(level))
            && self
                .credential
                .map_or(true, |tier| tier.holds(profile.education))
            && self
                .domestic_years
                .map_or(true, |range| range.matches(profile.work_years_domestic))
            && self
                .foreign_years
                .map_or(true, |range| range.matches(profile.work_years_foreign))
            && self
                .trade_certificate
                .map_or(true, |required| profile.has_trade_certificate == required)
    }
}

/// Points of the first matching rule, or zero when none match.
pub fn first_match(rules: &[ComboRule], profile: &ApplicantProfile) -> u32 {
    rules
        .iter()
        .find(|rule| rule.matches(profile))
        .map(|rule| rule.points)
        .unwrap_or(0)
}
