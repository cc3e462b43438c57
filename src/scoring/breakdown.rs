use serde::Serialize;

/// Human capital points for the applicant alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoreSection {
    pub age: u32,
    pub education: u32,
    /// First and second official language combined
    pub language: u32,
    pub domestic_work: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpouseSection {
    pub education: u32,
    pub language: u32,
    pub work: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferabilitySection {
    pub education: u32,
    pub foreign_work: u32,
    pub certificate: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdditionalSection {
    pub sibling: u32,
    pub french: u32,
    pub domestic_education: u32,
    pub provincial_nomination: u32,
    pub subtotal: u32,
}

/// Itemized score. Derived on demand from a profile, never edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub core: CoreSection,
    pub spouse: SpouseSection,
    pub transferability: TransferabilitySection,
    pub additional: AdditionalSection,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Core,
    Spouse,
    Transferability,
    Additional,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Core => "Human Capital (Core)",
            Section::Spouse => "Spouse Factors",
            Section::Transferability => "Skill Transferability",
            Section::Additional => "Additional Points",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub section: Section,
    pub label: &'static str,
    pub points: u32,
}

impl ScoreBreakdown {
    pub fn subtotal(&self, section: Section) -> u32 {
        match section {
            Section::Core => self.core.subtotal,
            Section::Spouse => self.spouse.subtotal,
            Section::Transferability => self.transferability.subtotal,
            Section::Additional => self.additional.subtotal,
        }
    }

    /// Every individual factor in display order.
    pub fn line_items(&self) -> Vec<LineItem> {
        let item = |section, label, points| LineItem {
            section,
            label,
            points,
        };
        vec![
            item(Section::Core, "Age", self.core.age),
            item(Section::Core, "Education", self.core.education),
            item(Section::Core, "Official Language", self.core.language),
            item(Section::Core, "Canadian Work", self.core.domestic_work),
            item(Section::Spouse, "Education", self.spouse.education),
            item(Section::Spouse, "Language", self.spouse.language),
            item(Section::Spouse, "Canadian Work", self.spouse.work),
            item(Section::Transferability, "Education Combos", self.transferability.education),
            item(Section::Transferability, "Work Exp Combos", self.transferability.foreign_work),
            item(Section::Transferability, "Trade Certificate", self.transferability.certificate),
            item(Section::Additional, "Sibling in Canada", self.additional.sibling),
            item(Section::Additional, "French Ability", self.additional.french),
            item(Section::Additional, "Canadian Education", self.additional.domestic_education),
            item(
                Section::Additional,
                "Provincial Nomination",
                self.additional.provincial_nomination,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_items_cover_every_section() {
        let breakdown = ScoreBreakdown {
            core: CoreSection {
                age: 110,
                subtotal: 110,
                ..CoreSection::default()
            },
            additional: AdditionalSection {
                sibling: 15,
                subtotal: 15,
                ..AdditionalSection::default()
            },
            total: 125,
            ..ScoreBreakdown::default()
        };

        let items = breakdown.line_items();
        assert_eq!(items.len(), 14);
        assert_eq!(items[0].label, "Age");
        assert_eq!(items[0].points, 110);
        for section in [
            Section::Core,
            Section::Spouse,
            Section::Transferability,
            Section::Additional,
        ] {
            assert!(items.iter().any(|i| i.section == section));
        }
        assert_eq!(breakdown.subtotal(Section::Additional), 15);
    }

    #[test]
    fn test_breakdown_serializes_to_json() {
        let json = serde_json::to_value(ScoreBreakdown::default()).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["core"]["domestic_work"], 0);
        assert_eq!(json["transferability"]["foreign_work"], 0);
    }
}
