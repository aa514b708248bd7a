//! Report wording.
//!
//! French is the default; English is available through [`Language::En`].

use serde::{Deserialize, Serialize};

/// Language of the fixed report wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" | "french" | "francais" | "français" => Ok(Self::Fr),
            "en" | "english" => Ok(Self::En),
            other => Err(format!("unsupported language: '{other}' (expected fr or en)")),
        }
    }
}

/// Every fixed string that appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub title: &'static str,
    pub question: &'static str,
    pub topic: &'static str,
    pub max_points: &'static str,
    pub student_score: &'static str,
    pub percentage: &'static str,
    pub answer_heading: &'static str,
    pub breakdown_heading: &'static str,
    pub criterion_column: &'static str,
    pub max_points_column: &'static str,
    pub score_column: &'static str,
    pub justification_column: &'static str,
    pub feedback_heading: &'static str,
    pub fallback_title: &'static str,
    pub final_score: &'static str,
    pub not_available: &'static str,
}

impl Labels {
    #[must_use]
    pub const fn french() -> Self {
        Self {
            title: "Rapport d'évaluation généré par l'IA",
            question: "Question :",
            topic: "Sujet :",
            max_points: "Points maximum :",
            student_score: "Note de l'étudiant :",
            percentage: "Pourcentage :",
            answer_heading: "Réponse de l'étudiant :",
            breakdown_heading: "Répartition de la notation :",
            criterion_column: "Critère",
            max_points_column: "Points max",
            score_column: "Score",
            justification_column: "Justification",
            feedback_heading: "Commentaires généraux :",
            fallback_title: "AutoCorrectGPT - Rapport de notation",
            final_score: "Score final :",
            not_available: "N/A",
        }
    }

    #[must_use]
    pub const fn english() -> Self {
        Self {
            title: "AI-Generated Grading Report",
            question: "Question:",
            topic: "Topic:",
            max_points: "Maximum points:",
            student_score: "Student score:",
            percentage: "Percentage:",
            answer_heading: "Student answer:",
            breakdown_heading: "Grading breakdown:",
            criterion_column: "Criterion",
            max_points_column: "Max points",
            score_column: "Score",
            justification_column: "Justification",
            feedback_heading: "Overall feedback:",
            fallback_title: "AutoCorrectGPT - Grading Report",
            final_score: "Final score:",
            not_available: "N/A",
        }
    }

    #[must_use]
    pub const fn for_language(language: Language) -> Self {
        match language {
            Language::Fr => Self::french(),
            Language::En => Self::english(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::french()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_french() {
        assert_eq!(Labels::default(), Labels::french());
        assert_eq!(Labels::default().percentage, "Pourcentage :");
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("FR".parse::<Language>(), Ok(Language::Fr));
        assert_eq!("english".parse::<Language>(), Ok(Language::En));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_for_language() {
        assert_eq!(Labels::for_language(Language::En).score_column, "Score");
        assert_eq!(
            Labels::for_language(Language::En).title,
            "AI-Generated Grading Report"
        );
    }
}
