use crate::domain::models::card::Card;
use crate::domain::models::row::RowRecord;
use crate::outbound::store::DeckStore;
use anyhow::Context;

/// Turns the filtered rows into cards and persists them in one atomic batch.
/// An empty set never touches the store.
pub async fn write_cards(records: &[RowRecord], store: &impl DeckStore) -> anyhow::Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    let mut cards = Vec::with_capacity(records.len());
    for record in records {
        cards.push(Card::try_from_row(record)?);
    }
    store
        .commit_cards(&cards)
        .await
        .context("batch write to the deck failed")?;
    Ok(cards.len())
}
