use serde::Serialize;
use std::sync::LazyLock;

use crate::profile::OccupationCategory;

/// Category tag of a selection stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamCategory {
    General,
    ProvincialNominee,
    CanadianExperience,
    French,
    Healthcare,
    Stem,
    Trades,
    Transport,
    Agriculture,
}

impl StreamCategory {
    pub fn label(self) -> &'static str {
        match self {
            StreamCategory::General => "General",
            StreamCategory::ProvincialNominee => "PNP",
            StreamCategory::CanadianExperience => "CEC",
            StreamCategory::French => "French",
            StreamCategory::Healthcare => "Healthcare",
            StreamCategory::Stem => "STEM",
            StreamCategory::Trades => "Trades",
            StreamCategory::Transport => "Transport",
            StreamCategory::Agriculture => "Agriculture",
        }
    }

    /// True when the applicant's occupation targets this stream.
    pub fn matches_occupation(self, occupation: OccupationCategory) -> bool {
        matches!(
            (self, occupation),
            (StreamCategory::General, OccupationCategory::General)
                | (StreamCategory::French, OccupationCategory::French)
                | (StreamCategory::Healthcare, OccupationCategory::Healthcare)
                | (StreamCategory::Stem, OccupationCategory::Stem)
                | (StreamCategory::Trades, OccupationCategory::Trades)
                | (StreamCategory::Transport, OccupationCategory::Transport)
                | (StreamCategory::Agriculture, OccupationCategory::Agriculture)
        )
    }
}

/// One historical selection round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    pub stream: &'static str,
    pub score: u32,
    /// ISO `YYYY-MM-DD`
    pub date: &'static str,
    pub category: StreamCategory,
}

const fn draw(
    stream: &'static str,
    score: u32,
    date: &'static str,
    category: StreamCategory,
) -> DrawRecord {
    DrawRecord {
        stream,
        score,
        date,
        category,
    }
}

const GENERAL: &str = "General / All Programs";
const CEC: &str = "Canadian Experience Class (CEC)";
const PNP: &str = "Provincial Nominee Program (PNP)";
const FRENCH: &str = "French Proficiency";
const HEALTHCARE: &str = "Healthcare Occupations";
const TRADES: &str = "Trades Occupations";
const STEM: &str = "STEM Occupations";
const TRANSPORT: &str = "Transport Occupations";

/// Compiled-in reference data, newest first within each stream.
pub const DRAW_HISTORY: &[DrawRecord] = &[
    draw(GENERAL, 529, "2024-04-23", StreamCategory::General),
    draw(GENERAL, 535, "2024-04-02", StreamCategory::General),
    draw(GENERAL, 531, "2024-03-17", StreamCategory::General),
    draw(GENERAL, 542, "2024-02-26", StreamCategory::General),
    draw(GENERAL, 557, "2024-02-12", StreamCategory::General),
    draw(CEC, 533, "2025-11-12", StreamCategory::CanadianExperience),
    draw(CEC, 541, "2025-09-05", StreamCategory::CanadianExperience),
    draw(CEC, 550, "2025-07-21", StreamCategory::CanadianExperience),
    draw(CEC, 560, "2025-05-10", StreamCategory::CanadianExperience),
    draw(CEC, 575, "2025-03-01", StreamCategory::CanadianExperience),
    draw(PNP, 738, "2025-11-10", StreamCategory::ProvincialNominee),
    draw(PNP, 752, "2025-08-19", StreamCategory::ProvincialNominee),
    draw(PNP, 765, "2025-06-30", StreamCategory::ProvincialNominee),
    draw(PNP, 780, "2025-05-05", StreamCategory::ProvincialNominee),
    draw(PNP, 791, "2025-03-11", StreamCategory::ProvincialNominee),
    draw(FRENCH, 416, "2025-10-29", StreamCategory::French),
    draw(FRENCH, 425, "2025-08-10", StreamCategory::French),
    draw(FRENCH, 430, "2025-06-15", StreamCategory::French),
    draw(FRENCH, 451, "2025-04-08", StreamCategory::French),
    draw(FRENCH, 460, "2025-02-14", StreamCategory::French),
    draw(HEALTHCARE, 462, "2025-11-14", StreamCategory::Healthcare),
    draw(HEALTHCARE, 470, "2025-09-29", StreamCategory::Healthcare),
    draw(HEALTHCARE, 485, "2025-07-11", StreamCategory::Healthcare),
    draw(HEALTHCARE, 490, "2025-05-20", StreamCategory::Healthcare),
    draw(HEALTHCARE, 501, "2025-03-10", StreamCategory::Healthcare),
    draw(TRADES, 505, "2025-09-18", StreamCategory::Trades),
    draw(TRADES, 512, "2025-07-01", StreamCategory::Trades),
    draw(TRADES, 520, "2025-05-01", StreamCategory::Trades),
    draw(TRADES, 528, "2025-02-15", StreamCategory::Trades),
    draw(STEM, 491, "2024-04-11", StreamCategory::Stem),
    draw(STEM, 499, "2024-03-01", StreamCategory::Stem),
    draw(STEM, 505, "2024-01-10", StreamCategory::Stem),
    draw(TRANSPORT, 430, "2024-03-13", StreamCategory::Transport),
    draw(TRANSPORT, 445, "2024-02-01", StreamCategory::Transport),
    draw(TRANSPORT, 450, "2023-12-15", StreamCategory::Transport),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub score: u32,
    pub date: String,
}

/// All draws of one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamHistory {
    pub stream: String,
    pub category: StreamCategory,
    /// Cutoff of the newest draw
    pub latest_cutoff: u32,
    /// Newest first
    pub history: Vec<HistoryEntry>,
}

/// Group records by stream name, keeping first-appearance order.
///
/// Records are expected newest first; the first record of a stream sets its
/// latest cutoff and category.
pub fn group_by_stream(records: &[DrawRecord]) -> Vec<StreamHistory> {
    let mut groups: Vec<StreamHistory> = Vec::new();

    for record in records {
        let entry = HistoryEntry {
            score: record.score,
            date: record.date.to_string(),
        };
        match groups.iter_mut().find(|g| g.stream == record.stream) {
            Some(group) => group.history.push(entry),
            None => groups.push(StreamHistory {
                stream: record.stream.to_string(),
                category: record.category,
                latest_cutoff: record.score,
                history: vec![entry],
            }),
        }
    }

    groups
}

static GROUPED_HISTORY: LazyLock<Vec<StreamHistory>> =
    LazyLock::new(|| group_by_stream(DRAW_HISTORY));

/// The compiled-in history, grouped once per process.
pub fn grouped_history() -> &'static [StreamHistory] {
    &GROUPED_HISTORY
}
