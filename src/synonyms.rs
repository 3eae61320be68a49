//! Bilingual job-title synonym table and equivalence lookups.
//!
//! Keys are normalized lowercase titles; values are the English-first
//! equivalent list used to bridge Portuguese queries onto English-indexed
//! search data. [`best_english_title`] picks the head of the list, which is
//! why English spellings come first in every entry.

use crate::variations;

/// Synonym table. First equivalent per entry is the preferred English form.
const JOB_TITLE_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "cio",
        &[
            "chief information officer",
            "it director",
            "head of it",
            "diretor de ti",
            "diretor de tecnologia da informacao",
        ],
    ),
    (
        "cto",
        &[
            "chief technology officer",
            "technology director",
            "head of technology",
            "diretor de tecnologia",
        ],
    ),
    (
        "ceo",
        &["chief executive officer", "president", "managing director", "diretor executivo", "presidente"],
    ),
    (
        "cfo",
        &["chief financial officer", "finance director", "head of finance", "diretor financeiro"],
    ),
    (
        "coo",
        &["chief operating officer", "operations director", "head of operations", "diretor de operacoes"],
    ),
    (
        "diretor de ti",
        &["it director", "chief information officer", "head of it", "cio"],
    ),
    (
        "diretor de tecnologia",
        &["technology director", "chief technology officer", "head of technology", "cto"],
    ),
    (
        "diretor executivo",
        &["chief executive officer", "managing director", "ceo"],
    ),
    (
        "diretor financeiro",
        &["finance director", "chief financial officer", "head of finance", "cfo"],
    ),
    (
        "diretor de operacoes",
        &["operations director", "chief operating officer", "head of operations", "coo"],
    ),
    (
        "diretor comercial",
        &["sales director", "chief revenue officer", "head of sales", "commercial director"],
    ),
    (
        "diretor de marketing",
        &["marketing director", "chief marketing officer", "head of marketing", "cmo"],
    ),
    (
        "gerente de ti",
        &["it manager", "information technology manager", "technology manager"],
    ),
    (
        "gerente de vendas",
        &["sales manager", "head of sales", "commercial manager"],
    ),
    (
        "gerente de marketing",
        &["marketing manager", "head of marketing"],
    ),
    (
        "gerente de projetos",
        &["project manager", "program manager"],
    ),
    (
        "coordenador de ti",
        &["technology coordinator", "it coordinator", "it supervisor"],
    ),
    (
        "analista de sistemas",
        &["systems analyst", "it analyst", "software analyst"],
    ),
    (
        "engenheiro de software",
        &["software engineer", "software developer"],
    ),
    (
        "desenvolvedor",
        &["software developer", "developer", "software engineer"],
    ),
];

fn lookup(key: &str) -> Option<&'static [&'static str]> {
    JOB_TITLE_SYNONYMS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Exact-key equivalents for a title after trim + lowercase. Empty when the
/// title is not in the table.
pub fn equivalents(title: &str) -> Vec<String> {
    let key = title.trim().to_lowercase();
    lookup(&key)
        .map(|list| list.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// The preferred English rendering of a title: the first table equivalent,
/// or the trimmed original when the table has no entry.
pub fn best_english_title(title: &str) -> String {
    equivalents(title)
        .into_iter()
        .next()
        .unwrap_or_else(|| title.trim().to_string())
}

/// Union of equivalents reachable through every normalization the crate
/// knows: the raw key, the accent-folded key, and every structural variation.
/// Falls back to the plain variation list when nothing matches the table, so
/// the result is never empty for a non-empty title.
pub fn enhanced_equivalents(title: &str) -> Vec<String> {
    fn push_all(out: &mut Vec<String>, items: Vec<String>) {
        for item in items {
            if !out.iter().any(|v| v == &item) {
                out.push(item);
            }
        }
    }

    let mut out: Vec<String> = Vec::new();
    push_all(&mut out, equivalents(title));
    push_all(&mut out, equivalents(&variations::normalize_string(title)));
    for variant in variations::variations(title) {
        push_all(&mut out, equivalents(&variant));
        push_all(&mut out, equivalents(&variations::normalize_string(&variant)));
    }

    if out.is_empty() {
        push_all(&mut out, variations::variations(title));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_via_lowercasing() {
        assert_eq!(best_english_title("CIO"), "chief information officer");
        assert_eq!(best_english_title("  cio  "), "chief information officer");
    }

    #[test]
    fn unknown_title_falls_back_to_itself() {
        assert_eq!(best_english_title("Head of Cheese"), "Head of Cheese");
    }

    #[test]
    fn enhanced_equivalents_bridge_accents() {
        // "diretor de operações" only hits the table once accents fold.
        let eq = enhanced_equivalents("Diretor de Operações");
        assert!(eq.contains(&"operations director".to_string()));
    }

    #[test]
    fn enhanced_equivalents_fall_back_to_variations() {
        let eq = enhanced_equivalents("Especialista em Queijos");
        assert!(!eq.is_empty());
        assert_eq!(eq[0], "Especialista em Queijos");
    }

    #[test]
    fn every_table_key_is_normalized() {
        for (key, values) in JOB_TITLE_SYNONYMS {
            assert_eq!(*key, variations::normalize_string(key), "key {}", key);
            assert!(!values.is_empty());
        }
    }
}
