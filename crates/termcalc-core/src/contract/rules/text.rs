//! Text normalization and clause segmentation.

use super::patterns::{SPACE_RUN, ZERO_WIDTH};

/// Normalize raw contract text.
///
/// Carriage returns become newlines, zero-width characters are removed, runs
/// of spaces and tabs collapse to one space, and the result is trimmed.
pub fn normalize(text: &str) -> String {
    let text = text.replace('\r', "\n");
    let text = ZERO_WIDTH.replace_all(&text, "");
    let text = SPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

/// Split text into non-empty, trimmed clauses.
///
/// Clauses end at full-width and half-width periods, semicolons and newlines.
/// A half-width period between two digits is a decimal point and does not
/// split.
pub fn split_clauses(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut clauses = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let boundary = match c {
            '。' | '．' | '；' | ';' | '\n' => true,
            '.' => !is_decimal_point(&chars, i),
            _ => false,
        };

        if boundary {
            push_clause(&mut clauses, &mut current);
        } else {
            current.push(c);
        }
    }
    push_clause(&mut clauses, &mut current);

    clauses
}

fn is_decimal_point(chars: &[char], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|j| chars.get(j));
    let after = chars.get(i + 1);
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

fn push_clause(clauses: &mut Vec<String>, current: &mut String) {
    let clause = current.trim();
    if !clause.is_empty() {
        clauses.push(clause.to_string());
    }
    current.clear();
}
