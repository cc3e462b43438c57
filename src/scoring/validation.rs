use super::factors::{ByEducation, ComboRule, Ladder, RangeOp, SplitPoints};
use super::policy::{ComboPolicy, PointsPolicy};
use crate::profile::validation::MAX_BENCHMARK;

/// Ceiling for any single point value or cap: the highest possible CRS total.
pub const MAX_POINTS: u32 = 1200;

/// Largest number of points a table entry can award.
trait PointValue {
    fn largest(&self) -> u32;
}

impl PointValue for u32 {
    fn largest(&self) -> u32 {
        *self
    }
}

impl PointValue for SplitPoints {
    fn largest(&self) -> u32 {
        self.single.max(self.married)
    }
}

/// Validate a points policy at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_policy(policy: &PointsPolicy) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if policy.epoch.trim().is_empty() {
        errors.push("policy.epoch: must not be empty".to_string());
    }

    // Core tables
    let core = &policy.core;
    check_ladder("policy.core.age", &core.age, &mut errors);
    check_by_education("policy.core.education", &core.education, &mut errors);
    check_ladder("policy.core.first_language", &core.first_language, &mut errors);
    check_ladder("policy.core.second_language", &core.second_language, &mut errors);
    check_ladder("policy.core.domestic_work", &core.domestic_work, &mut errors);
    check_year_cap(
        "policy.core",
        core.work_year_cap,
        &core.domestic_work,
        &mut errors,
    );

    // Spouse tables
    let spouse = &policy.spouse;
    check_by_education("policy.spouse.education", &spouse.education, &mut errors);
    check_ladder("policy.spouse.language", &spouse.language, &mut errors);
    check_ladder("policy.spouse.work", &spouse.work, &mut errors);
    check_year_cap("policy.spouse", spouse.work_year_cap, &spouse.work, &mut errors);

    // Combination rules
    let transferability = &policy.transferability;
    if transferability.cap == 0 {
        errors.push("policy.transferability.cap: must be greater than zero".to_string());
    }
    check_points("policy.transferability.cap", transferability.cap, &mut errors);
    for (name, combo) in [
        ("education", &transferability.education),
        ("foreign_work", &transferability.foreign_work),
        ("certificate", &transferability.certificate),
    ] {
        check_combo(
            &format!("policy.transferability.{}", name),
            combo,
            transferability.cap,
            &mut errors,
        );
    }

    // Additional points
    let additional = &policy.additional;
    if additional.cap == 0 {
        errors.push("policy.additional.cap: must be greater than zero".to_string());
    }
    check_points("policy.additional.cap", additional.cap, &mut errors);
    check_points("policy.additional.sibling", additional.sibling, &mut errors);
    check_points(
        "policy.additional.provincial_nomination",
        additional.provincial_nomination,
        &mut errors,
    );
    check_points(
        "policy.additional.domestic_education.one_or_two_year",
        additional.domestic_education.one_or_two_year,
        &mut errors,
    );
    check_points(
        "policy.additional.domestic_education.three_year_or_more",
        additional.domestic_education.three_year_or_more,
        &mut errors,
    );
    check_rules("policy.additional.french", &additional.french, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_points(path: &str, value: u32, errors: &mut Vec<String>) {
    if value > MAX_POINTS {
        errors.push(format!(
            "{}: {} exceeds the maximum of {} points",
            path, value, MAX_POINTS
        ));
    }
}

fn check_by_education<P: PointValue + Copy>(
    path: &str,
    table: &ByEducation<P>,
    errors: &mut Vec<String>,
) {
    let largest = table.values().iter().map(PointValue::largest).max().unwrap_or(0);
    check_points(path, largest, errors);
}

fn check_ladder<P: PointValue>(path: &str, ladder: &Ladder<P>, errors: &mut Vec<String>) {
    if ladder.tiers.is_empty() {
        errors.push(format!("{}: must have at least one tier", path));
        return;
    }

    for (i, tier) in ladder.tiers.iter().enumerate() {
        check_points(&format!("{}[{}].points", path, i), tier.points.largest(), errors);
        if tier.range.bounds().is_none() {
            errors.push(format!(
                "{}[{}].range: '{}' can never match",
                path, i, tier.range
            ));
            continue;
        }
        if let Some((j, earlier)) = ladder.tiers[..i]
            .iter()
            .enumerate()
            .find(|(_, earlier)| earlier.range.covers(&tier.range))
        {
            errors.push(format!(
                "{}[{}].range: '{}' is unreachable after tier {} ('{}')",
                path, i, tier.range, j, earlier.range
            ));
        }
    }
}

/// Capped year counts must land on a tier, otherwise long careers score zero.
fn check_year_cap<P>(path: &str, cap: u32, ladder: &Ladder<P>, errors: &mut Vec<String>) {
    if cap == 0 {
        errors.push(format!("{}.work_year_cap: must be greater than zero", path));
        return;
    }
    if !ladder.tiers.is_empty() && !ladder.tiers.iter().any(|tier| tier.range.matches(cap)) {
        errors.push(format!(
            "{}.work_year_cap: no work tier matches the cap value {}",
            path, cap
        ));
    }
}

fn check_combo(path: &str, combo: &ComboPolicy, section_cap: u32, errors: &mut Vec<String>) {
    if combo.cap == 0 {
        errors.push(format!("{}.cap: must be greater than zero", path));
    } else if combo.cap > section_cap {
        errors.push(format!(
            "{}.cap: {} exceeds the section cap of {}",
            path, combo.cap, section_cap
        ));
    }

    if combo.chains.is_empty() {
        errors.push(format!("{}.chains: must have at least one chain", path));
    }
    for (i, chain) in combo.chains.iter().enumerate() {
        let chain_path = format!("{}.chains[{}]", path, i);
        if chain.name.trim().is_empty() {
            errors.push(format!("{}.name: must not be empty", chain_path));
        }
        check_rules(&format!("{}.rules", chain_path), &chain.rules, errors);
    }
}

fn check_rules(path: &str, rules: &[ComboRule], errors: &mut Vec<String>) {
    if rules.is_empty() {
        errors.push(format!("{}: must have at least one rule", path));
        return;
    }

    let mut catch_all: Option<usize> = None;
    for (i, rule) in rules.iter().enumerate() {
        if let Some(j) = catch_all {
            errors.push(format!(
                "{}[{}]: unreachable after unconditional rule {}",
                path, i, j
            ));
        }
        if rule.is_unconditional() && catch_all.is_none() {
            catch_all = Some(i);
        }

        for (field, level) in [
            ("english_at_least", rule.english_at_least),
            ("french_at_least", rule.french_at_least),
        ] {
            if let Some(level) = level {
                if i64::from(level) > MAX_BENCHMARK {
                    errors.push(format!(
                        "{}[{}].{}: benchmark {} is above the maximum of {}",
                        path, i, field, level, MAX_BENCHMARK
                    ));
                }
            }
        }
        check_points(&format!("{}[{}].points", path, i), rule.points, errors);
        check_rule_range(path, i, "domestic_years", rule.domestic_years, errors);
        check_rule_range(path, i, "foreign_years", rule.foreign_years, errors);
    }
}

fn check_rule_range(
    path: &str,
    index: usize,
    field: &str,
    range: Option<RangeOp>,
    errors: &mut Vec<String>,
) {
    if let Some(range) = range {
        if range.bounds().is_none() {
            errors.push(format!(
                "{}[{}].{}: '{}' can never match",
                path, index, field, range
            ));
        }
    }
}
