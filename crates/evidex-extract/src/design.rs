//! Study design tier from title and abstract keywords.

use std::sync::LazyLock;

use evidex_core::{LiteratureRecord, StudyDesign};
use regex::Regex;

static META_ANALYSIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:meta-?analys[ie]s|systematic\s+reviews?|pooled\s+analysis)\b")
        .expect("valid meta-analysis pattern")
});

static RANDOMIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:randomi[sz]ed|randomly\s+assigned|RCTs?|placebo-controlled)\b")
        .expect("valid randomized pattern")
});

static OBSERVATIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:cohort|observational|retrospective|prospective|case-control|cross-sectional|registry)\b",
    )
    .expect("valid observational pattern")
});

/// Strongest design named in `text`.
#[must_use]
pub fn classify_text(text: &str) -> StudyDesign {
    if META_ANALYSIS.is_match(text) {
        StudyDesign::MetaAnalysis
    } else if RANDOMIZED.is_match(text) {
        StudyDesign::RandomizedTrial
    } else if OBSERVATIONAL.is_match(text) {
        StudyDesign::Observational
    } else {
        StudyDesign::Unknown
    }
}

/// Design tier of a record, from its title and abstract.
#[must_use]
pub fn classify(record: &LiteratureRecord) -> StudyDesign {
    let text = [record.title.as_deref(), record.abstract_text.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    classify_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CYP2C19 and clopidogrel: a meta-analysis", StudyDesign::MetaAnalysis)]
    #[case("A systematic review of antiplatelet response", StudyDesign::MetaAnalysis)]
    #[case("A randomized, double-blind trial", StudyDesign::RandomizedTrial)]
    #[case("Results of the RCT", StudyDesign::RandomizedTrial)]
    #[case("A retrospective cohort from a national registry", StudyDesign::Observational)]
    #[case("Case report of stent thrombosis", StudyDesign::Unknown)]
    #[case("Randomized trials in a meta-analysis", StudyDesign::MetaAnalysis)]
    fn keyword_tiers(#[case] text: &str, #[case] expected: StudyDesign) {
        assert_eq!(classify_text(text), expected);
    }

    #[test]
    fn uses_title_and_abstract() {
        let mut record = LiteratureRecord::new("pubmed");
        record.title = Some("Clopidogrel response".into());
        assert_eq!(classify(&record), StudyDesign::Unknown);
        record.abstract_text = Some("We randomized 400 patients.".into());
        assert_eq!(classify(&record), StudyDesign::RandomizedTrial);
    }
}
