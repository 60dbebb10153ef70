//! Approximate dataflow similarity.
//!
//! Extracts variable definition/use relations line by line: an assignment
//! defines its left-hand identifier and draws edges from it to the known
//! variables on the right-hand side; later mentions of a known variable
//! record a use. Variable names are normalized positionally (first defined
//! becomes `var0`, and so on) so consistent renaming leaves the relation
//! graph, and therefore the score, unchanged.

use super::token::{Token, TokenKind, tokenize};
use crate::language::Language;
use std::collections::HashMap;

const ASSIGN_OPS: &[&str] = &["=", "+=", "-=", "*=", "/=", ":="];

/// Keywords that introduce a binding for the following identifier.
const BINDER_KEYWORDS: &[&str] = &["let", "var", "const", "for"];

type Edge = (String, String);

fn is_assign(token: &Token) -> bool {
    token.kind == TokenKind::Symbol && ASSIGN_OPS.contains(&token.text.as_str())
}

/// Collects normalized def-use edges from `code`.
fn extract_edges(
    code: &str,
    language: Language,
) -> Vec<Edge> {
    fn normalized(
        name: &str,
        names: &mut HashMap<String, usize>,
    ) -> String {
        let next = names.len();
        let id = *names.entry(name.to_string()).or_insert(next);
        format!("var{id}")
    }

    let mut names: HashMap<String, usize> = HashMap::new();
    let mut edges = Vec::new();

    for line in code.lines() {
        let tokens = tokenize(line, language);
        let assign_pos = tokens.iter().position(is_assign);

        if let Some(pos) = assign_pos {
            let target = tokens[..pos]
                .iter()
                .rev()
                .find(|t| t.kind == TokenKind::Identifier);
            let Some(target) = target else { continue };

            let target_id = normalized(&target.text, &mut names);
            edges.push(("def".to_string(), target_id.clone()));

            for token in &tokens[pos + 1..] {
                if token.kind == TokenKind::Identifier && names.contains_key(&token.text) {
                    let source_id = normalized(&token.text, &mut names);
                    edges.push((target_id.clone(), source_id));
                }
            }
        } else {
            // Binding forms without '=' (e.g. `for x in xs`) define, the
            // rest of the line only uses.
            let mut binder_pending = false;
            for token in &tokens {
                if token.kind == TokenKind::Keyword && BINDER_KEYWORDS.contains(&token.text.as_str()) {
                    binder_pending = true;
                    continue;
                }
                if token.kind == TokenKind::Identifier {
                    if binder_pending {
                        let id = normalized(&token.text, &mut names);
                        edges.push(("def".to_string(), id));
                        binder_pending = false;
                    } else if names.contains_key(&token.text) {
                        let id = normalized(&token.text, &mut names);
                        edges.push(("use".to_string(), id));
                    }
                }
            }
        }
    }

    edges
}

/// Def-use relation overlap in [0, 1]. Code with no extractable dataflow
/// on either side compares as vacuously equal.
#[must_use]
pub fn dataflow_match(
    reference: &str,
    candidate: &str,
    language: Language,
) -> f64 {
    let ref_edges = extract_edges(reference, language);
    let cand_edges = extract_edges(candidate, language);

    if ref_edges.is_empty() && cand_edges.is_empty() {
        return 1.0;
    }
    if cand_edges.is_empty() || ref_edges.is_empty() {
        return 0.0;
    }

    let mut ref_counts: HashMap<&Edge, usize> = HashMap::new();
    for edge in &ref_edges {
        *ref_counts.entry(edge).or_insert(0) += 1;
    }

    let mut cand_counts: HashMap<&Edge, usize> = HashMap::new();
    for edge in &cand_edges {
        *cand_counts.entry(edge).or_insert(0) += 1;
    }

    let matched: usize = cand_counts
        .iter()
        .map(|(edge, count)| (*count).min(ref_counts.get(*edge).copied().unwrap_or(0)))
        .sum();

    matched as f64 / cand_edges.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_scores_one() {
        let code = "a = 1\nb = a + 2\nprint(b)";
        assert!((dataflow_match(code, code, Language::Python) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_renamed_variables_score_one() {
        let reference = "a = 1\nb = a + 2\nprint(b)";
        let renamed = "x = 1\ny = x + 2\nprint(y)";
        assert!((dataflow_match(reference, renamed, Language::Python) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_different_flow_scores_lower() {
        let reference = "a = 1\nb = a + 2";
        let candidate = "a = 1\nb = 2\nc = 3";
        let score = dataflow_match(reference, candidate, Language::Python);
        assert!(score < 1.0);
    }

    #[test]
    fn test_no_dataflow_on_either_side_is_vacuous_match() {
        assert!(
            (dataflow_match("pass", "pass", Language::Python) - 1.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_one_sided_dataflow_scores_zero() {
        assert_eq!(dataflow_match("a = 1", "pass", Language::Python), 0.0);
    }

    #[test]
    fn test_for_loop_binds_variable() {
        let code = "for item in items:\n    total += item";
        assert!((dataflow_match(code, code, Language::Python) - 1.0).abs() < 1e-9);
    }
}
