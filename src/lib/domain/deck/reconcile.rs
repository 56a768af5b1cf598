use crate::domain::models::row::RowRecord;
use crate::inbound::prompt::Prompter;
use std::collections::HashSet;
use tracing::{info, warn};

/// Primary words present both in the store snapshot and in this run's valid
/// rows, in incoming order, deduped.
pub fn duplicate_words(valid: &[RowRecord], existing: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for record in valid {
        let word = record.primary_word();
        if existing.contains(word) && seen.insert(word.to_string()) {
            duplicates.push(word.to_string());
        }
    }
    duplicates
}

/// Drops every record whose primary word the operator chose to keep as-is.
pub fn without_excluded(valid: Vec<RowRecord>, excluded: &[String]) -> Vec<RowRecord> {
    if excluded.is_empty() {
        return valid;
    }
    valid
        .into_iter()
        .filter(|record| !excluded.iter().any(|word| word == record.primary_word()))
        .collect()
}

/// The one branch point of an import run. With no duplicates the rows pass
/// through untouched; otherwise the operator picks which duplicates to keep,
/// and an empty selection means overwrite them all.
pub fn resolve_duplicates(
    valid: Vec<RowRecord>,
    existing: &HashSet<String>,
    prompter: &mut impl Prompter,
) -> anyhow::Result<Vec<RowRecord>> {
    let duplicates = duplicate_words(&valid, existing);
    if duplicates.is_empty() {
        info!("No duplicates detected");
        return Ok(valid);
    }
    warn!("Duplicates detected: {} card(s)", duplicates.len());
    let message = format!(
        "{} card(s) to be uploaded already exist in the deck. Select the cards you do NOT wish to override, or select none to override all of them.",
        duplicates.len()
    );
    let selection = prompter.select_many(&message, &duplicates)?;
    let excluded: Vec<String> = selection
        .into_iter()
        .filter_map(|idx| duplicates.get(idx).cloned())
        .collect();
    if !excluded.is_empty() {
        info!("Keeping existing cards for: {}", excluded.join(", "));
    }
    Ok(without_excluded(valid, &excluded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: u64, word: &str) -> RowRecord {
        let columns = [word, "a", "b", "c", "d", "e"]
            .iter()
            .enumerate()
            .map(|(idx, value)| ((idx + 1).to_string(), value.to_string()))
            .collect();
        RowRecord::new(line, columns)
    }

    fn existing(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn duplicate_set_is_subset_of_incoming_words() {
        let valid = vec![row(1, "APPLE"), row(2, "PEAR")];
        let snapshot = existing(&["APPLE", "MELON"]);
        let duplicates = duplicate_words(&valid, &snapshot);
        assert_eq!(duplicates, ["APPLE"]);
    }

    #[test]
    fn duplicate_set_is_empty_when_nothing_overlaps() {
        let valid = vec![row(1, "APPLE")];
        assert!(duplicate_words(&valid, &existing(&["PEAR"])).is_empty());
        assert!(duplicate_words(&[], &existing(&["PEAR"])).is_empty());
    }

    #[test]
    fn repeated_incoming_word_appears_once() {
        let valid = vec![row(1, "APPLE"), row(2, "APPLE")];
        let duplicates = duplicate_words(&valid, &existing(&["APPLE"]));
        assert_eq!(duplicates, ["APPLE"]);
    }

    #[test]
    fn exclusion_removes_every_row_with_that_word() {
        let valid = vec![row(1, "APPLE"), row(2, "PEAR"), row(3, "APPLE")];
        let kept = without_excluded(valid, &["APPLE".to_string()]);
        let words: Vec<&str> = kept.iter().map(|r| r.primary_word()).collect();
        assert_eq!(words, ["PEAR"]);
    }

    #[test]
    fn no_exclusions_keeps_all_rows() {
        let valid = vec![row(1, "APPLE"), row(2, "PEAR")];
        let kept = without_excluded(valid.clone(), &[]);
        assert_eq!(kept, valid);
    }
}
