use crate::config::Config;
use crate::domain::deck::ingest::ingest_deck_file;
use crate::domain::deck::reconcile::resolve_duplicates;
use crate::domain::deck::summary::confirm_upload_message;
use crate::domain::deck::write::write_cards;
use crate::inbound::prompt::Prompter;
use crate::outbound::store::DeckStore;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Terminal states of one import run. Fatal errors (unreadable file, store
/// failures) surface as `Err` instead and end the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    NoValidRows { invalid: usize },
    Cancelled,
    Written {
        written: usize,
        skipped_duplicates: usize,
        invalid: usize,
    },
}

/// One import run, straight through: read and classify the file, confirm the
/// upload, reconcile against the live deck, write the batch. Suspends only
/// at the two prompter calls.
pub async fn run_import(
    config: &Config,
    store: &impl DeckStore,
    prompter: &mut impl Prompter,
    file_path: &Path,
) -> anyhow::Result<ImportOutcome> {
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown file");
    info!("Reading {}", file_name);
    let rows = ingest_deck_file(file_path)?;
    info!(
        "Finished reading {}: {} valid, {} invalid row(s)",
        file_name,
        rows.valid.len(),
        rows.invalid.len()
    );

    if rows.valid.is_empty() {
        return Ok(ImportOutcome::NoValidRows {
            invalid: rows.invalid.len(),
        });
    }

    let message = confirm_upload_message(config.invalid_row_report, &rows);
    if !prompter.confirm(&message)? {
        return Ok(ImportOutcome::Cancelled);
    }

    info!("Comparing against existing cards");
    let existing = store
        .fetch_card_words()
        .await
        .context("failed to read the existing deck")?;

    let invalid = rows.invalid.len();
    let incoming = rows.valid.len();
    let to_upload = resolve_duplicates(rows.valid, &existing, prompter)?;
    let skipped_duplicates = incoming - to_upload.len();

    info!("Batch adding {} card(s)", to_upload.len());
    let written = write_cards(&to_upload, store).await?;

    Ok(ImportOutcome::Written {
        written,
        skipped_duplicates,
        invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidRowReport;
    use crate::domain::models::card::{Card, Suggestion};
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use url::Url;

    struct FakeStore {
        cards: Mutex<HashMap<String, Vec<String>>>,
        reads: Mutex<usize>,
        commits: Mutex<usize>,
    }

    impl FakeStore {
        fn empty() -> Self {
            Self {
                cards: Mutex::new(HashMap::new()),
                reads: Mutex::new(0),
                commits: Mutex::new(0),
            }
        }

        fn seeded(cards: &[(&str, &[&str])]) -> Self {
            let store = Self::empty();
            {
                let mut guard = store.cards.lock().unwrap();
                for (word, list) in cards {
                    guard.insert(
                        word.to_string(),
                        list.iter().map(|w| w.to_string()).collect(),
                    );
                }
            }
            store
        }

        fn card(&self, word: &str) -> Option<Vec<String>> {
            self.cards.lock().unwrap().get(word).cloned()
        }

        fn reads(&self) -> usize {
            *self.reads.lock().unwrap()
        }

        fn commits(&self) -> usize {
            *self.commits.lock().unwrap()
        }
    }

    impl DeckStore for FakeStore {
        async fn fetch_card_words(&self) -> anyhow::Result<HashSet<String>> {
            *self.reads.lock().unwrap() += 1;
            Ok(self.cards.lock().unwrap().keys().cloned().collect())
        }

        async fn commit_cards(&self, cards: &[Card]) -> anyhow::Result<()> {
            *self.commits.lock().unwrap() += 1;
            let mut guard = self.cards.lock().unwrap();
            for card in cards {
                guard.insert(card.taboo_word().to_string(), card.taboo_list().to_vec());
            }
            Ok(())
        }

        async fn fetch_suggestions(&self, _reviewed: bool) -> anyhow::Result<Vec<Suggestion>> {
            Ok(Vec::new())
        }
    }

    enum Answer {
        Confirm(bool),
        SelectMany(Vec<usize>),
    }

    struct ScriptedPrompter {
        answers: VecDeque<Answer>,
    }

    impl ScriptedPrompter {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select_one(&mut self, message: &str, _choices: &[String]) -> anyhow::Result<usize> {
            panic!("unexpected select_one prompt: {}", message);
        }

        fn select_many(
            &mut self,
            message: &str,
            _choices: &[String],
        ) -> anyhow::Result<Vec<usize>> {
            match self.answers.pop_front() {
                Some(Answer::SelectMany(selection)) => Ok(selection),
                _ => panic!("unexpected select_many prompt: {}", message),
            }
        }

        fn input(&mut self, message: &str) -> anyhow::Result<String> {
            panic!("unexpected input prompt: {}", message);
        }

        fn confirm(&mut self, message: &str) -> anyhow::Result<bool> {
            match self.answers.pop_front() {
                Some(Answer::Confirm(answer)) => Ok(answer),
                _ => panic!("unexpected confirm prompt: {}", message),
            }
        }
    }

    fn test_config() -> Config {
        Config {
            firestore_base_url: Url::parse("https://firestore.example.test").unwrap(),
            token_url: Url::parse("https://oauth.example.test/token").unwrap(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            project_id: "deck-test".to_string(),
            environment: "test".to_string(),
            deck_dir: std::env::temp_dir(),
            invalid_row_report: InvalidRowReport::Full,
            log_level: tracing::Level::INFO,
        }
    }

    fn deck_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("deck_admin_test_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const HEADERS: &str = "tabooWord,word1,word2,word3,word4,word5\n";

    #[tokio::test]
    async fn overwrites_unexcluded_duplicate_and_skips_invalid_row() {
        let store = FakeStore::seeded(&[("APPLE", &["old", "old", "old", "old", "old"])]);
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(true),
            Answer::SelectMany(Vec::new()),
        ]);
        let path = deck_file(
            "overwrite.csv",
            &format!("{}APPLE,fruit,red,tree,pie,juice\n,a,b,c,d,e\n", HEADERS),
        );

        let outcome = run_import(&test_config(), &store, &mut prompter, &path)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Written {
                written: 1,
                skipped_duplicates: 0,
                invalid: 1,
            }
        );
        assert_eq!(
            store.card("APPLE").unwrap(),
            ["fruit", "red", "tree", "pie", "juice"]
        );
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn excluded_duplicate_is_left_untouched() {
        let store = FakeStore::seeded(&[("APPLE", &["old", "old", "old", "old", "old"])]);
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(true),
            Answer::SelectMany(vec![0]),
        ]);
        let path = deck_file(
            "exclude.csv",
            &format!(
                "{}APPLE,fruit,red,tree,pie,juice\nBANANA,yellow,fruit,peel,monkey,split\n",
                HEADERS
            ),
        );

        let outcome = run_import(&test_config(), &store, &mut prompter, &path)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Written {
                written: 1,
                skipped_duplicates: 1,
                invalid: 0,
            }
        );
        assert_eq!(store.card("APPLE").unwrap(), ["old", "old", "old", "old", "old"]);
        assert_eq!(
            store.card("BANANA").unwrap(),
            ["yellow", "fruit", "peel", "monkey", "split"]
        );
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn no_duplicates_skips_the_override_prompt() {
        let store = FakeStore::empty();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Confirm(true)]);
        let path = deck_file(
            "fresh.csv",
            &format!(
                "{}APPLE,fruit,red,tree,pie,juice\nPEAR,fruit,green,tree,tart,cider\n",
                HEADERS
            ),
        );

        let outcome = run_import(&test_config(), &store, &mut prompter, &path)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Written {
                written: 2,
                skipped_duplicates: 0,
                invalid: 0,
            }
        );
        assert_eq!(store.commits(), 1);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn cancelling_the_upload_changes_nothing() {
        let store = FakeStore::seeded(&[("APPLE", &["old", "old", "old", "old", "old"])]);
        let mut prompter = ScriptedPrompter::new(vec![Answer::Confirm(false)]);
        let path = deck_file(
            "cancel.csv",
            &format!("{}APPLE,fruit,red,tree,pie,juice\n", HEADERS),
        );

        let outcome = run_import(&test_config(), &store, &mut prompter, &path)
            .await
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Cancelled);
        assert_eq!(store.reads(), 0);
        assert_eq!(store.commits(), 0);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn headers_only_file_never_contacts_the_store() {
        let store = FakeStore::empty();
        let mut prompter = ScriptedPrompter::new(Vec::new());
        let path = deck_file("empty.csv", HEADERS);

        let outcome = run_import(&test_config(), &store, &mut prompter, &path)
            .await
            .unwrap();

        assert_eq!(outcome, ImportOutcome::NoValidRows { invalid: 0 });
        assert_eq!(store.reads(), 0);
        assert_eq!(store.commits(), 0);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn excluding_every_duplicate_writes_nothing() {
        let store = FakeStore::seeded(&[("APPLE", &["old", "old", "old", "old", "old"])]);
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(true),
            Answer::SelectMany(vec![0]),
        ]);
        let path = deck_file(
            "exclude_all.csv",
            &format!("{}APPLE,fruit,red,tree,pie,juice\n", HEADERS),
        );

        let outcome = run_import(&test_config(), &store, &mut prompter, &path)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Written {
                written: 0,
                skipped_duplicates: 1,
                invalid: 0,
            }
        );
        assert_eq!(store.commits(), 0);
        assert_eq!(store.card("APPLE").unwrap(), ["old", "old", "old", "old", "old"]);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn unreadable_file_is_fatal() {
        let store = FakeStore::empty();
        let mut prompter = ScriptedPrompter::new(Vec::new());
        let path = std::env::temp_dir().join("deck_admin_test_missing.csv");

        let result = run_import(&test_config(), &store, &mut prompter, &path).await;

        assert!(result.is_err());
        assert_eq!(store.commits(), 0);
    }
}
