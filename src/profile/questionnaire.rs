use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use super::labels::{
    domestic_education_label, education_label, marital_status_label, occupation_label,
};
use super::types::{
    ApplicantProfile, DomesticEducation, EducationLevel, LanguageScore, MaritalStatus,
    OccupationCategory, Spouse,
};

/// Short explanation of an acronym used in a question.
pub struct Jargon {
    pub acronym: &'static str,
    pub definition: &'static str,
    pub meaning: &'static str,
}

const ECA: Jargon = Jargon {
    acronym: "ECA",
    definition: "Educational Credential Assessment",
    meaning: "A report that verifies your foreign degree, diploma, or certificate is valid and equal to a Canadian credential.",
};

const CLB: Jargon = Jargon {
    acronym: "CLB",
    definition: "Canadian Language Benchmark",
    meaning: "The standardized measure of English/French language ability used for immigration purposes. CLB 7 is typically the minimum requirement for Express Entry.",
};

const TEER: Jargon = Jargon {
    acronym: "TEER",
    definition: "Training, Education, Experience, and Responsibilities",
    meaning: "The system used to classify occupations (previously NOC codes). Only experience in TEER 0, 1, 2, or 3 is considered skilled work.",
};

const PNP: Jargon = Jargon {
    acronym: "PNP",
    definition: "Provincial Nominee Program",
    meaning: "A stream where a Canadian province selects candidates who meet their specific labor market needs, automatically awarding 600 CRS points.",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionId {
    MaritalStatus,
    SpouseIsDomestic,
    SpouseAccompanying,
    Age,
    Education,
    DomesticEducation,
    English,
    French,
    WorkDomestic,
    WorkForeign,
    TradeCertificate,
    ProvincialNomination,
    SiblingDomestic,
    SpouseEducation,
    SpouseWorkDomestic,
    SpouseEnglish,
    Occupation,
}

pub struct Question {
    pub id: QuestionId,
    pub text: &'static str,
    pub info: &'static str,
    pub jargon: Option<&'static Jargon>,
    /// Whether the question applies given the answers so far
    pub applies: fn(&ApplicantProfile) -> bool,
}

fn always(_: &ApplicantProfile) -> bool {
    true
}

fn has_partner(p: &ApplicantProfile) -> bool {
    p.marital_status.has_partner()
}

fn partner_not_domestic(p: &ApplicantProfile) -> bool {
    has_partner(p) && !p.spouse.is_some_and(|s| s.is_domestic_citizen_or_resident)
}

fn partner_scored(p: &ApplicantProfile) -> bool {
    p.scored_with_spouse()
}

pub const QUESTIONS: &[Question] = &[
    Question {
        id: QuestionId::MaritalStatus,
        text: "What is your marital status?",
        info: "If you have a spouse or common-law partner who is not Canadian, your core points are lower to allow for their contribution.",
        jargon: None,
        applies: always,
    },
    Question {
        id: QuestionId::SpouseIsDomestic,
        text: "Is your spouse or partner a Canadian Citizen or Permanent Resident?",
        info: "If your spouse is already Canadian, you earn points as if you were single.",
        jargon: None,
        applies: has_partner,
    },
    Question {
        id: QuestionId::SpouseAccompanying,
        text: "Will your spouse or partner come with you to Canada?",
        info: "If they are not accompanying you, you earn points as if you were single.",
        jargon: None,
        applies: partner_not_domestic,
    },
    Question {
        id: QuestionId::Age,
        text: "How old are you?",
        info: "Maximum points are awarded between 20-29. Points drop significantly after 30 and hit 0 at age 45.",
        jargon: None,
        applies: always,
    },
    Question {
        id: QuestionId::Education,
        text: "What is your highest level of education?",
        info: "Include your Canadian credential or foreign credential (with ECA).",
        jargon: Some(&ECA),
        applies: always,
    },
    Question {
        id: QuestionId::DomesticEducation,
        text: "Did you obtain any of this education in Canada?",
        info: "Points are awarded for 1-2 year diplomas (15 pts) or degrees of 3+ years (30 pts).",
        jargon: None,
        applies: always,
    },
    Question {
        id: QuestionId::English,
        text: "English Language Results (CLB)",
        info: "CLB 9 in all skills triggers massive 'Skill Transferability' bonuses.",
        jargon: Some(&CLB),
        applies: always,
    },
    Question {
        id: QuestionId::French,
        text: "French Language Results (NCLC/CLB)",
        info: "Score NCLC 7 in all four abilities to unlock 25 or 50 additional points.",
        jargon: Some(&CLB),
        applies: always,
    },
    Question {
        id: QuestionId::WorkDomestic,
        text: "Years of skilled work experience IN Canada?",
        info: "Must be legal, paid, and in TEER 0, 1, 2, or 3.",
        jargon: Some(&TEER),
        applies: always,
    },
    Question {
        id: QuestionId::WorkForeign,
        text: "Years of skilled work experience OUTSIDE Canada?",
        info: "Foreign experience boosts your score if combined with high language results.",
        jargon: None,
        applies: always,
    },
    Question {
        id: QuestionId::TradeCertificate,
        text: "Do you have a Certificate of Qualification in a trade?",
        info: "Issued by a Canadian province or federal body for tradespeople.",
        jargon: None,
        applies: always,
    },
    Question {
        id: QuestionId::ProvincialNomination,
        text: "Do you have a Provincial Nomination?",
        info: "Awards +600 points. Does not include simple 'interest letters'.",
        jargon: Some(&PNP),
        applies: always,
    },
    Question {
        id: QuestionId::SiblingDomestic,
        text: "Do you have a sibling in Canada (Citizen/PR)?",
        info: "Must be 18+ and living in Canada.",
        jargon: None,
        applies: always,
    },
    Question {
        id: QuestionId::SpouseEducation,
        text: "What is your spouse's education level?",
        info: "Contributes up to 10 points.",
        jargon: Some(&ECA),
        applies: partner_scored,
    },
    Question {
        id: QuestionId::SpouseWorkDomestic,
        text: "Years of spouse's skilled work IN Canada?",
        info: "Contributes up to 10 points.",
        jargon: Some(&TEER),
        applies: partner_scored,
    },
    Question {
        id: QuestionId::SpouseEnglish,
        text: "Spouse's English Results (CLB)",
        info: "Contributes up to 20 points.",
        jargon: Some(&CLB),
        applies: partner_scored,
    },
    Question {
        id: QuestionId::Occupation,
        text: "Primary Occupation Category",
        info: "Used for Category-Based Selection rounds.",
        jargon: None,
        applies: always,
    },
];

const MARITAL_OPTIONS: [MaritalStatus; 3] = [
    MaritalStatus::Single,
    MaritalStatus::Married,
    MaritalStatus::CommonLaw,
];

const DOMESTIC_EDUCATION_OPTIONS: [DomesticEducation; 3] = [
    DomesticEducation::None,
    DomesticEducation::OneOrTwoYear,
    DomesticEducation::ThreeYearOrMore,
];

const OCCUPATION_OPTIONS: [OccupationCategory; 6] = [
    OccupationCategory::None,
    OccupationCategory::Healthcare,
    OccupationCategory::Stem,
    OccupationCategory::Trades,
    OccupationCategory::Transport,
    OccupationCategory::Agriculture,
];

/// Line-oriented prompt helper over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt with a message and return the trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input ended before the questionnaire was finished");
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write output")
    }

    fn prompt_yes_no(&mut self, message: &str) -> Result<bool> {
        loop {
            let input = self.prompt(&format!("{} [y/n]: ", message))?.to_lowercase();
            match input.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("  Please answer y or n.")?,
            }
        }
    }

    fn prompt_number(&mut self, message: &str) -> Result<u32> {
        loop {
            let input = self.prompt(&format!("{}: ", message))?;
            match input.parse::<u32>() {
                Ok(v) => return Ok(v),
                Err(_) => self.say("  Invalid: must be a whole non-negative number. Try again.")?,
            }
        }
    }

    fn prompt_benchmark(&mut self, skill: &str) -> Result<u8> {
        loop {
            let input = self.prompt(&format!("  {} [0-12]: ", skill))?;
            match input.parse::<u8>() {
                Ok(v) if v <= 12 => return Ok(v),
                _ => self.say("  Invalid: benchmark must be between 0 and 12. Try again.")?,
            }
        }
    }

    fn prompt_scores(&mut self) -> Result<LanguageScore> {
        Ok(LanguageScore {
            speak: self.prompt_benchmark("Speaking")?,
            listen: self.prompt_benchmark("Listening")?,
            read: self.prompt_benchmark("Reading")?,
            write: self.prompt_benchmark("Writing")?,
        })
    }

    /// Show a numbered list and return the chosen option.
    fn prompt_choice<T: Copy>(&mut self, options: &[T], label: fn(T) -> &'static str) -> Result<T> {
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("  {}. {}", i + 1, label(*option)))?;
        }
        loop {
            let input = self.prompt(&format!("Choose 1-{}: ", options.len()))?;
            match input.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1]),
                _ => self.say("  Invalid choice. Try again.")?,
            }
        }
    }

    fn ask(&mut self, id: QuestionId, profile: &mut ApplicantProfile) -> Result<()> {
        match id {
            QuestionId::MaritalStatus => {
                profile.marital_status = self.prompt_choice(&MARITAL_OPTIONS, marital_status_label)?;
                if !profile.marital_status.has_partner() {
                    profile.spouse = None;
                }
            }
            QuestionId::SpouseIsDomestic => {
                let domestic = self.prompt_yes_no("Citizen or permanent resident?")?;
                profile.spouse.get_or_insert_with(Spouse::default).is_domestic_citizen_or_resident =
                    domestic;
            }
            QuestionId::SpouseAccompanying => {
                let accompanying = self.prompt_yes_no("Accompanying?")?;
                profile.spouse.get_or_insert_with(Spouse::default).accompanying = accompanying;
            }
            QuestionId::Age => profile.age = self.prompt_number("Age")?,
            QuestionId::Education => {
                profile.education = self.prompt_choice(&EducationLevel::ALL, education_label)?
            }
            QuestionId::DomesticEducation => {
                profile.domestic_education =
                    self.prompt_choice(&DOMESTIC_EDUCATION_OPTIONS, domestic_education_label)?
            }
            QuestionId::English => profile.english = self.prompt_scores()?,
            QuestionId::French => profile.french = self.prompt_scores()?,
            QuestionId::WorkDomestic => profile.work_years_domestic = self.prompt_number("Years")?,
            QuestionId::WorkForeign => profile.work_years_foreign = self.prompt_number("Years")?,
            QuestionId::TradeCertificate => {
                profile.has_trade_certificate = self.prompt_yes_no("Certificate of Qualification?")?
            }
            QuestionId::ProvincialNomination => {
                profile.has_provincial_nomination = self.prompt_yes_no("Provincial nomination?")?
            }
            QuestionId::SiblingDomestic => {
                profile.has_sibling_domestic = self.prompt_yes_no("Sibling in Canada?")?
            }
            QuestionId::SpouseEducation => {
                let level = self.prompt_choice(&EducationLevel::ALL, education_label)?;
                profile.spouse.get_or_insert_with(Spouse::default).education = level;
            }
            QuestionId::SpouseWorkDomestic => {
                let years = self.prompt_number("Years")?;
                profile.spouse.get_or_insert_with(Spouse::default).work_years_domestic = years;
            }
            QuestionId::SpouseEnglish => {
                let english = self.prompt_scores()?;
                profile.spouse.get_or_insert_with(Spouse::default).english = english;
            }
            QuestionId::Occupation => {
                profile.occupation = self.prompt_choice(&OCCUPATION_OPTIONS, occupation_label)?
            }
        }
        Ok(())
    }
}

/// Run the questionnaire and return the collected profile.
///
/// Questions whose condition does not hold for the answers so far are skipped,
/// so spouse questions only appear for applicants with a partner.
pub fn run_questionnaire<R: BufRead, W: Write>(input: R, output: W) -> Result<ApplicantProfile> {
    let mut prompter = Prompter::new(input, output);
    let mut profile = ApplicantProfile::default();

    prompter.say("CRS Assessment")?;
    prompter.say("==============")?;

    let mut asked = 0;
    for question in QUESTIONS {
        if !(question.applies)(&profile) {
            tracing::debug!(question = ?question.id, "skipping question");
            continue;
        }
        asked += 1;
        let total = QUESTIONS.iter().filter(|q| (q.applies)(&profile)).count();

        prompter.say("")?;
        prompter.say(&format!("Question {} of {}", asked, total))?;
        prompter.say(question.text)?;
        prompter.say(&format!("CRITERIA: {}", question.info))?;
        if let Some(jargon) = question.jargon {
            prompter.say(&format!(
                "JARGON: {} ({}) - {}",
                jargon.acronym, jargon.definition, jargon.meaning
            ))?;
        }

        prompter.ask(question.id, &mut profile)?;
    }

    Ok(profile)
}
