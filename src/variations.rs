//! Job-title normalization and variation generation.
//!
//! Portuguese job titles carry prepositions ("Diretor de Tecnologia") that
//! upstream search indexes often drop or reorder. The generator produces a
//! tiered list of alternative spellings, most specific first, so the search
//! orchestrator can fall through them in order.

/// Portuguese prepositions and articles stripped when building variants.
const STOPWORDS: &[&str] = &[
    "de", "da", "do", "das", "dos", "em", "na", "no", "nas", "nos", "para",
    "pela", "pelo", "com", "sem", "sob", "sobre",
];

/// Lowercases, trims, and strips accents. Comparison key for every title
/// match in the crate; display strings are never normalized in place.
pub fn normalize_string(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(fold_accent)
        .collect::<String>()
        .to_lowercase()
}

/// Maps accented Latin characters to their base letter, passing everything
/// else through untouched.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => c,
    }
}

fn is_stopword(token: &str) -> bool {
    let folded = normalize_string(token);
    STOPWORDS.iter().any(|s| *s == folded)
}

/// Uppercases the first letter of each whitespace-separated token.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generates the ordered, deduplicated variation list for a job title.
///
/// The raw input always comes first. Structural variants follow (prepositions
/// stripped, "de" removed wholesale and one at a time), then casing variants
/// of everything produced so far. Single-token titles yield only casing
/// variants of themselves.
pub fn variations(title: &str) -> Vec<String> {
    fn push(out: &mut Vec<String>, candidate: String) {
        let candidate = candidate.trim().to_string();
        if !candidate.is_empty() && !out.iter().any(|v| v == &candidate) {
            out.push(candidate);
        }
    }

    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::new();
    push(&mut out, trimmed.to_string());

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() > 1 {
        // Drop interior stopwords but always keep the first and last token,
        // so "Diretor de Tecnologia" yields "Diretor Tecnologia" and never
        // collapses to a single word.
        let stripped: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|(i, token)| *i == 0 || *i == tokens.len() - 1 || !is_stopword(token))
            .map(|(_, token)| *token)
            .collect();
        push(&mut out, stripped.join(" "));

        let de_positions: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| normalize_string(t) == "de")
            .map(|(i, _)| i)
            .collect();
        if !de_positions.is_empty() {
            let without_all: Vec<&str> = tokens
                .iter()
                .filter(|t| normalize_string(t) != "de")
                .copied()
                .collect();
            push(&mut out, without_all.join(" "));

            for skip in &de_positions {
                let without_one: Vec<&str> = tokens
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| i != skip)
                    .map(|(_, t)| *t)
                    .collect();
                push(&mut out, without_one.join(" "));
            }
        }
    }

    let structural: Vec<String> = out.clone();
    for variant in structural {
        push(&mut out, title_case(&variant));
        push(&mut out, variant.to_uppercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_accents_and_case() {
        assert_eq!(normalize_string("  Diretor de Tecnologia  "), "diretor de tecnologia");
        assert_eq!(normalize_string("Coordenação"), "coordenacao");
        assert_eq!(normalize_string("GERÊNCIA"), "gerencia");
    }

    #[test]
    fn raw_title_always_comes_first() {
        let v = variations("Diretor de Tecnologia");
        assert_eq!(v[0], "Diretor de Tecnologia");
    }

    #[test]
    fn prepositions_are_stripped_but_edges_survive() {
        let v = variations("Diretor de Tecnologia");
        assert!(v.contains(&"Diretor Tecnologia".to_string()));
        let v = variations("de Tecnologia");
        assert!(v.contains(&"de Tecnologia".to_string()));
    }

    #[test]
    fn casing_variants_are_appended() {
        let v = variations("diretor de tecnologia");
        assert!(v.contains(&"Diretor De Tecnologia".to_string()));
        assert!(v.contains(&"DIRETOR DE TECNOLOGIA".to_string()));
    }

    #[test]
    fn single_token_title_only_varies_casing() {
        let v = variations("ceo");
        assert_eq!(v[0], "ceo");
        assert!(v.contains(&"Ceo".to_string()));
        assert!(v.contains(&"CEO".to_string()));
        assert!(v.iter().all(|t| t.split_whitespace().count() == 1));
    }

    #[test]
    fn no_duplicates_and_empty_input_yields_nothing() {
        let v = variations("CEO");
        let mut seen = std::collections::HashSet::new();
        assert!(v.iter().all(|t| seen.insert(t.clone())));
        assert!(variations("   ").is_empty());
    }
}
