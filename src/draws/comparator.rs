use serde::Serialize;
use std::cmp::Reverse;

use super::history::{grouped_history, StreamCategory, StreamHistory};
use crate::profile::ApplicantProfile;

/// Number of past draws reported per stream.
pub const RECENT_DRAW_LIMIT: usize = 5;

/// French speaking benchmark that makes the French stream relevant.
const FRENCH_STREAM_SPEAKING: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentDraw {
    pub score: u32,
    pub date: String,
    /// Whether the applicant's total would have cleared this draw
    pub cleared: bool,
}

/// Verdict for one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamResult {
    pub stream_name: String,
    pub latest_cutoff: u32,
    pub category: StreamCategory,
    pub relevant: bool,
    pub recent_history: Vec<RecentDraw>,
    pub qualified: bool,
}

/// Whether a stream applies to this applicant.
pub fn is_relevant(category: StreamCategory, profile: &ApplicantProfile) -> bool {
    match category {
        StreamCategory::General | StreamCategory::ProvincialNominee => true,
        StreamCategory::CanadianExperience if profile.work_years_domestic >= 1 => true,
        StreamCategory::French if profile.french.speak >= FRENCH_STREAM_SPEAKING => true,
        other => other.matches_occupation(profile.occupation),
    }
}

/// Rank the compiled-in streams for a profile and its computed total.
pub fn rank_streams(profile: &ApplicantProfile, total: u32) -> Vec<StreamResult> {
    rank_streams_in(grouped_history(), profile, total)
}

/// Rank any grouped history.
///
/// Relevant streams come first, then the General stream, then the rest by
/// descending latest cutoff. The sort is stable so ties keep dataset order.
pub fn rank_streams_in(
    history: &[StreamHistory],
    profile: &ApplicantProfile,
    total: u32,
) -> Vec<StreamResult> {
    let mut results: Vec<StreamResult> = history
        .iter()
        .map(|stream| StreamResult {
            stream_name: stream.stream.clone(),
            latest_cutoff: stream.latest_cutoff,
            category: stream.category,
            relevant: is_relevant(stream.category, profile),
            recent_history: stream
                .history
                .iter()
                .take(RECENT_DRAW_LIMIT)
                .map(|entry| RecentDraw {
                    score: entry.score,
                    date: entry.date.clone(),
                    cleared: total >= entry.score,
                })
                .collect(),
            qualified: total >= stream.latest_cutoff,
        })
        .collect();

    results.sort_by_key(|r| {
        (
            Reverse(r.relevant),
            r.category != StreamCategory::General,
            Reverse(r.latest_cutoff),
        )
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draws::history::{group_by_stream, DrawRecord};
    use crate::profile::{LanguageScore, OccupationCategory};

    fn find<'a>(results: &'a [StreamResult], name: &str) -> &'a StreamResult {
        results
            .iter()
            .find(|r| r.stream_name == name)
            .unwrap()
    }

    #[test]
    fn test_general_and_pnp_always_relevant() {
        let profile = ApplicantProfile::default();
        assert!(is_relevant(StreamCategory::General, &profile));
        assert!(is_relevant(StreamCategory::ProvincialNominee, &profile));
        assert!(!is_relevant(StreamCategory::CanadianExperience, &profile));
        assert!(!is_relevant(StreamCategory::French, &profile));
        assert!(!is_relevant(StreamCategory::Healthcare, &profile));
    }

    #[test]
    fn test_conditional_relevance() {
        let profile = ApplicantProfile {
            work_years_domestic: 1,
            french: LanguageScore::new(7, 0, 0, 0),
            occupation: OccupationCategory::Trades,
            ..ApplicantProfile::default()
        };
        assert!(is_relevant(StreamCategory::CanadianExperience, &profile));
        assert!(is_relevant(StreamCategory::French, &profile));
        assert!(is_relevant(StreamCategory::Trades, &profile));
        assert!(!is_relevant(StreamCategory::Stem, &profile));
    }

    #[test]
    fn test_verdicts_for_healthcare_applicant() {
        let profile = ApplicantProfile {
            occupation: OccupationCategory::Healthcare,
            ..ApplicantProfile::default()
        };
        let results = rank_streams(&profile, 500);

        let general = find(&results, "General / All Programs");
        assert_eq!(general.latest_cutoff, 529);
        assert!(!general.qualified);

        let healthcare = find(&results, "Healthcare Occupations");
        assert!(healthcare.relevant);
        assert_eq!(healthcare.latest_cutoff, 462);
        assert!(healthcare.qualified);
        let cleared: Vec<bool> = healthcare.recent_history.iter().map(|d| d.cleared).collect();
        assert_eq!(cleared, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_ranking_order() {
        let profile = ApplicantProfile {
            occupation: OccupationCategory::Healthcare,
            ..ApplicantProfile::default()
        };
        let results = rank_streams(&profile, 500);
        let names: Vec<&str> = results.iter().map(|r| r.stream_name.as_str()).collect();

        assert_eq!(
            &names[..3],
            &[
                "General / All Programs",
                "Provincial Nominee Program (PNP)",
                "Healthcare Occupations",
            ]
        );
        assert!(results[3..].iter().all(|r| !r.relevant));
        assert!(results[3..]
            .windows(2)
            .all(|pair| pair[0].latest_cutoff >= pair[1].latest_cutoff));
    }

    #[test]
    fn test_recent_history_is_limited() {
        let records: Vec<DrawRecord> = (0..8)
            .map(|i| DrawRecord {
                stream: "Long",
                score: 400 + i,
                date: "2025-01-01",
                category: StreamCategory::General,
            })
            .collect();
        let history = group_by_stream(&records);
        let results = rank_streams_in(&history, &ApplicantProfile::default(), 450);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].recent_history.len(), RECENT_DRAW_LIMIT);
        assert_eq!(results[0].latest_cutoff, 400);
        assert!(results[0].qualified);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let records = [
            DrawRecord {
                stream: "First",
                score: 480,
                date: "2025-01-01",
                category: StreamCategory::Stem,
            },
            DrawRecord {
                stream: "Second",
                score: 480,
                date: "2025-01-01",
                category: StreamCategory::Trades,
            },
        ];
        let history = group_by_stream(&records);
        let results = rank_streams_in(&history, &ApplicantProfile::default(), 0);
        assert_eq!(results[0].stream_name, "First");
        assert_eq!(results[1].stream_name, "Second");
        assert!(results.iter().all(|r| !r.qualified));
    }
}
