use crate::domain::models::row::{RowClass, RowRecord, classify_row};
use serde::{Deserialize, Serialize};

pub const TABOO_LIST_LEN: usize = 5;

/// The persisted card shape: the word to guess plus the ordered list of
/// words forbidden while giving clues for it. Built only from rows that
/// passed classification; a re-import of the same word supersedes the
/// stored card wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    taboo_word: String,
    taboo_list: [String; TABOO_LIST_LEN],
}

impl Card {
    pub fn new(taboo_word: impl Into<String>, taboo_list: [String; TABOO_LIST_LEN]) -> Self {
        Self {
            taboo_word: taboo_word.into(),
            taboo_list,
        }
    }

    /// First column becomes the taboo word, the remaining five the taboo
    /// list. Fails on any row that would not classify as valid.
    pub fn try_from_row(record: &RowRecord) -> anyhow::Result<Self> {
        if let RowClass::Invalid(reason) = classify_row(record) {
            anyhow::bail!("row {} is not a valid card: {}", record.line(), reason);
        }
        let mut values = record.values().map(str::to_owned);
        let taboo_word = values
            .next()
            .ok_or_else(|| anyhow::anyhow!("row {} has no taboo word column", record.line()))?;
        let taboo_list: [String; TABOO_LIST_LEN] = values
            .collect::<Vec<String>>()
            .try_into()
            .map_err(|_| {
                anyhow::anyhow!(
                    "row {} does not have {} associated words",
                    record.line(),
                    TABOO_LIST_LEN
                )
            })?;
        Ok(Self {
            taboo_word,
            taboo_list,
        })
    }

    pub fn taboo_word(&self) -> &str {
        &self.taboo_word
    }

    pub fn taboo_list(&self) -> &[String] {
        &self.taboo_list
    }
}

/// A player-submitted card candidate from the suggestions collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub taboo_word: String,
    pub taboo_list: Vec<String>,
    pub reviewed: bool,
}
