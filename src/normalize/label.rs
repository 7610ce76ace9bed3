// src/normalize/label.rs
use crate::config::consts::DRAW_LABEL;

const DRAW_SPELLINGS: [&str; 3] = ["n", "nul", "draw"];

/// Draw spellings → `Nul`; anything else comes back trimmed.
pub fn normalize_label(label: &str) -> String {
    let label = label.trim();
    if DRAW_SPELLINGS.iter().any(|d| label.eq_ignore_ascii_case(d)) {
        return s!(DRAW_LABEL);
    }
    s!(label)
}
