pub mod auth;
pub mod firestore;

pub use auth::AuthClient;
pub use firestore::FirestoreClient;

use crate::domain::models::card::{Card, Suggestion};
use std::collections::HashSet;

/// The remote deck collection as the import pipeline sees it. One
/// implementation talks Firestore REST; tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait DeckStore {
    /// Every primary word currently persisted in the cards collection.
    async fn fetch_card_words(&self) -> anyhow::Result<HashSet<String>>;

    /// Persist the cards in one atomic batch keyed by taboo word; either
    /// all writes apply or none do.
    async fn commit_cards(&self, cards: &[Card]) -> anyhow::Result<()>;

    /// Suggestions whose `reviewed` flag matches the given value.
    async fn fetch_suggestions(&self, reviewed: bool) -> anyhow::Result<Vec<Suggestion>>;
}
