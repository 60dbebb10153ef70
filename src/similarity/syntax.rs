//! Structural similarity over lightweight syntax trees.
//!
//! A real parser per language is out of proportion here; instead the token
//! stream is shaped into a tree by bracket nesting, with leaves labeled by
//! token kind for identifiers and literals (so renaming does not change
//! structure) and by text for keywords and symbols. The score is the
//! clipped overlap of candidate subtree shapes against the reference's,
//! the same all-subtrees matching CodeBLEU applies to its ASTs.

use super::token::{Token, TokenKind};
use std::collections::HashMap;

#[derive(Debug)]
enum Node {
    Leaf(String),
    Group { open: char, children: Vec<Node> },
}

fn leaf_label(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier => "id".to_string(),
        TokenKind::Number => "num".to_string(),
        TokenKind::StringLit => "str".to_string(),
        TokenKind::Keyword | TokenKind::Symbol => token.text.clone(),
    }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Builds a bracket-nesting tree. Unmatched closers are treated as plain
/// leaves so malformed input still produces a usable tree.
fn build_tree(tokens: &[Token]) -> Vec<Node> {
    let mut stack: Vec<(char, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for token in tokens {
        let is_symbol = token.kind == TokenKind::Symbol && token.text.len() == 1;
        let c = token.text.chars().next().unwrap_or('\0');

        if is_symbol && matches!(c, '(' | '[' | '{') {
            stack.push((c, std::mem::take(&mut current)));
        } else if is_symbol
            && matches!(c, ')' | ']' | '}')
            && stack.last().is_some_and(|(open, _)| closing_for(*open) == c)
        {
            let (open, parent) = stack.pop().unwrap();
            let children = std::mem::replace(&mut current, parent);
            current.push(Node::Group { open, children });
        } else {
            current.push(Node::Leaf(leaf_label(token)));
        }
    }

    // Unclosed groups collapse back into their parents.
    while let Some((open, parent)) = stack.pop() {
        let children = std::mem::replace(&mut current, parent);
        current.push(Node::Group { open, children });
    }

    current
}

/// Serializes every subtree (groups and leaves) into a shape multiset.
fn collect_shapes(
    nodes: &[Node],
    shapes: &mut HashMap<String, usize>,
) {
    for node in nodes {
        let repr = shape_of(node);
        *shapes.entry(repr).or_insert(0) += 1;
        if let Node::Group { children, .. } = node {
            collect_shapes(children, shapes);
        }
    }
}

fn shape_of(node: &Node) -> String {
    match node {
        Node::Leaf(label) => label.clone(),
        Node::Group { open, children } => {
            let inner: Vec<String> = children.iter().map(shape_of).collect();
            format!("{open}{}{}", inner.join(" "), closing_for(*open))
        }
    }
}

/// Subtree-overlap similarity in [0, 1]. Identical token streams score 1.0.
#[must_use]
pub fn syntax_match(
    reference: &[Token],
    candidate: &[Token],
) -> f64 {
    let mut ref_shapes = HashMap::new();
    collect_shapes(&build_tree(reference), &mut ref_shapes);
    let mut cand_shapes = HashMap::new();
    collect_shapes(&build_tree(candidate), &mut cand_shapes);

    let total: usize = cand_shapes.values().sum();
    if total == 0 {
        return if ref_shapes.is_empty() { 1.0 } else { 0.0 };
    }

    let matched: usize = cand_shapes
        .iter()
        .map(|(shape, count)| (*count).min(ref_shapes.get(shape).copied().unwrap_or(0)))
        .sum();

    matched as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::similarity::token::tokenize;

    #[test]
    fn test_identical_scores_one() {
        let tokens = tokenize("def f(a, b):\n    return [a, b]", Language::Python);
        assert!((syntax_match(&tokens, &tokens) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_renamed_identifiers_still_match() {
        let reference = tokenize("def add(a, b):\n    return a + b", Language::Python);
        let renamed = tokenize("def plus(x, y):\n    return x + y", Language::Python);
        assert!((syntax_match(&reference, &renamed) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_different_structure_scores_lower() {
        let reference = tokenize("def f(a):\n    return a", Language::Python);
        let candidate = tokenize("x = [1, 2, 3]", Language::Python);
        let score = syntax_match(&reference, &candidate);
        assert!(score < 0.5);
    }

    #[test]
    fn test_unbalanced_input_does_not_panic() {
        let reference = tokenize("f(a", Language::Python);
        let candidate = tokenize(") close only", Language::Python);
        let score = syntax_match(&reference, &candidate);
        assert!((0.0..=1.0).contains(&score));
    }
}
