//! Program classification of decree summaries.
//!
//! Pure text rules, applied in a fixed order. Program and amendment markers
//! match case-insensitively; the grant verbs (`Concede`, `Autoriza`) only
//! match capitalized, as they open the summary of an original grant and occur
//! in lowercase inside amendments that cite it.

use decree_core::{Decree, DecreeType, Program};
use once_cell::sync::Lazy;
use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static PRODEPE: Lazy<Regex> = Lazy::new(|| regex(r"(?i)PRODEPE"));
static PROIND: Lazy<Regex> = Lazy::new(|| regex(r"(?i)PROIND"));

static NAMED: Lazy<Regex> = Lazy::new(|| regex(r"(?i)denominada\s+(.+)"));
static COMPANY: Lazy<Regex> = Lazy::new(|| regex(r"(?i)empresa\s+(.+)"));
static TAXPAYER: Lazy<Regex> = Lazy::new(|| regex(r"(?i)contribuinte\s+(.+)"));

static GRANTS: Lazy<Regex> = Lazy::new(|| regex(r"\bConcede\b"));
static AUTHORIZES: Lazy<Regex> = Lazy::new(|| regex(r"\bAutoriza\b"));

/// Secondary markers in priority order. Accents are part of the marker.
static ACT_MARKERS: Lazy<Vec<(Regex, DecreeType)>> = Lazy::new(|| {
    vec![
        (regex(r"(?i)introduz\s+alterações"), DecreeType::Amendment),
        (regex(r"(?i)prorrogaç"), DecreeType::Extension),
        (regex(r"(?i)renovaç"), DecreeType::Renewal),
        (regex(r"(?i)transferência"), DecreeType::Transfer),
    ]
});

static ORIGIN_NUMBER: Lazy<Regex> = Lazy::new(|| regex(r"\d{2,3}\.\d{3}"));

/// Keep the decrees belonging to a known program, classified, in input order.
pub fn classify(decrees: Vec<Decree>) -> Vec<Decree> {
    let total = decrees.len();
    let classified: Vec<Decree> = decrees
        .into_iter()
        .filter_map(|mut decree| classify_decree(&mut decree).then_some(decree))
        .collect();
    tracing::info!("{} of {} decrees belong to a program", classified.len(), total);
    classified
}

/// Fill the program fields of one decree, returning whether it qualified.
pub fn classify_decree(decree: &mut Decree) -> bool {
    if PRODEPE.is_match(&decree.summary) {
        classify_prodepe(decree);
        true
    } else if PROIND.is_match(&decree.summary) {
        classify_proind(decree);
        true
    } else {
        false
    }
}

fn classify_prodepe(decree: &mut Decree) {
    let summary = &decree.summary;
    decree.program = Some(Program::Prodepe);
    decree.company = capture(&NAMED, summary).or_else(|| capture(&COMPANY, summary));

    if GRANTS.is_match(summary) {
        decree.decree_type = Some(DecreeType::Grant);
        decree.origin_decrees = Some(vec![decree.number]);
        return;
    }

    decree.decree_type = ACT_MARKERS
        .iter()
        .find(|(marker, _)| marker.is_match(summary))
        .map(|(_, decree_type)| *decree_type);

    let origins = origin_numbers(summary);
    if !origins.is_empty() {
        decree.origin_decrees = Some(origins);
    }
}

fn classify_proind(decree: &mut Decree) {
    let summary = &decree.summary;
    decree.program = Some(Program::Proind);
    decree.company = capture(&TAXPAYER, summary);
    if AUTHORIZES.is_match(summary) {
        decree.decree_type = Some(DecreeType::Grant);
    }
    decree.origin_decrees = Some(vec![decree.number]);
}

/// Every `NN.NNN`/`NNN.NNN` number in the summary, separators removed.
///
/// Repeated citations are kept as they appear.
pub fn origin_numbers(summary: &str) -> Vec<i64> {
    ORIGIN_NUMBER
        .find_iter(summary)
        .filter_map(|m| m.as_str().replace('.', "").parse().ok())
        .collect()
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decree(number: i64, summary: &str) -> Decree {
        Decree::new(number, "01/03/2024", "https://legis.alepe.pe.gov.br/texto.aspx?id=1", summary, None)
    }

    #[test]
    fn test_prodepe_grant() {
        let mut d = decree(
            55_100,
            "Concede ao estabelecimento da empresa ACME INDÚSTRIA LTDA. os benefícios do PRODEPE.",
        );
        assert!(classify_decree(&mut d));
        assert_eq!(d.program, Some(Program::Prodepe));
        assert_eq!(d.decree_type, Some(DecreeType::Grant));
        assert_eq!(d.origin_decrees, Some(vec![55_100]));
        assert_eq!(
            d.company.as_deref(),
            Some("ACME INDÚSTRIA LTDA. os benefícios do PRODEPE.")
        );
    }

    #[test]
    fn test_named_pattern_wins_over_company() {
        let mut d = decree(
            1,
            "Concede incentivos do PRODEPE à empresa situada em Recife, denominada BETA S.A.",
        );
        classify_decree(&mut d);
        assert_eq!(d.company.as_deref(), Some("BETA S.A."));
    }

    #[test]
    fn test_prodepe_amendment_origins() {
        let mut d = decree(
            56_000,
            "Introduz alterações no Decreto nº 123.456, que concede benefícios do PRODEPE à empresa GAMA LTDA.",
        );
        assert!(classify_decree(&mut d));
        assert_eq!(d.decree_type, Some(DecreeType::Amendment));
        assert_eq!(d.origin_decrees, Some(vec![123_456]));
    }

    #[test]
    fn test_marker_priority() {
        let mut d = decree(
            2,
            "Dispõe sobre a prorrogação e renovação dos incentivos do PRODEPE, Decreto nº 45.001.",
        );
        classify_decree(&mut d);
        assert_eq!(d.decree_type, Some(DecreeType::Extension));

        let mut d = decree(
            3,
            "Autoriza a transferência dos benefícios do PRODEPE do Decreto nº 45.002.",
        );
        classify_decree(&mut d);
        assert_eq!(d.decree_type, Some(DecreeType::Transfer));
        assert_eq!(d.origin_decrees, Some(vec![45_002]));
    }

    #[test]
    fn test_origin_numbers_keep_duplicates() {
        let mut d = decree(
            4,
            "Renovação do PRODEPE previsto nos Decretos nº 40.100 e 40.100 e nº 41.250.",
        );
        classify_decree(&mut d);
        assert_eq!(d.decree_type, Some(DecreeType::Renewal));
        assert_eq!(d.origin_decrees, Some(vec![40_100, 40_100, 41_250]));
    }

    #[test]
    fn test_amendment_without_origin_numbers() {
        let mut d = decree(5, "Introduz alterações nos incentivos do PRODEPE.");
        assert!(classify_decree(&mut d));
        assert_eq!(d.program, Some(Program::Prodepe));
        assert_eq!(d.decree_type, Some(DecreeType::Amendment));
        assert!(d.origin_decrees.is_none());
    }

    #[test]
    fn test_unaccented_markers_leave_type_unset() {
        let mut d = decree(6, "Introduz alteracoes no Decreto nº 45.123 do PRODEPE.");
        assert!(classify_decree(&mut d));
        assert_eq!(d.program, Some(Program::Prodepe));
        assert_eq!(d.decree_type, None);
        assert_eq!(d.origin_decrees, Some(vec![45_123]));

        let mut d = decree(7, "Dispõe sobre a prorrogacao e renovacao do PRODEPE.");
        classify_decree(&mut d);
        assert_eq!(d.decree_type, None);

        let mut d = decree(8, "TRANSFERÊNCIA dos incentivos do PRODEPE.");
        classify_decree(&mut d);
        assert_eq!(d.decree_type, Some(DecreeType::Transfer));
    }

    #[test]
    fn test_proind() {
        let mut d = decree(
            57_000,
            "Autoriza a adesão ao PROIND do contribuinte DELTA ALIMENTOS LTDA.",
        );
        assert!(classify_decree(&mut d));
        assert_eq!(d.program, Some(Program::Proind));
        assert_eq!(d.decree_type, Some(DecreeType::Grant));
        assert_eq!(d.company.as_deref(), Some("DELTA ALIMENTOS LTDA."));
        assert_eq!(d.origin_decrees, Some(vec![57_000]));

        let mut d = decree(57_001, "Altera o enquadramento no PROIND do Decreto nº 50.000.");
        classify_decree(&mut d);
        assert!(d.decree_type.is_none());
        assert_eq!(d.origin_decrees, Some(vec![57_001]));
    }

    #[test]
    fn test_unclassified_decree() {
        let mut d = decree(6, "Aprova o regulamento do imposto.");
        assert!(!classify_decree(&mut d));
        assert!(d.program.is_none());
        assert!(d.origin_decrees.is_none());
    }

    #[test]
    fn test_classify_filters_and_preserves_order() {
        let decrees = vec![
            decree(10, "Concede benefícios do PRODEPE à empresa A."),
            decree(11, "Aprova o regulamento."),
            decree(12, "Autoriza o PROIND do contribuinte B."),
            decree(13, "Concede benefícios do PRODEPE à empresa C."),
        ];

        let classified = classify(decrees);
        let numbers: Vec<i64> = classified.iter().map(|d| d.number).collect();
        assert_eq!(numbers, vec![10, 12, 13]);

        let again = classify(classified.clone());
        assert_eq!(again, classified);
    }
}
