use anyhow::Context;
use colored::Colorize;
use deck_admin::{
    config::Config,
    domain::deck::{log_outcome, run_import, setup::setup_logging},
    inbound::{
        file::list_deck_files,
        prompt::{Prompter, StdinPrompter},
    },
    outbound::store::{AuthClient, DeckStore, FirestoreClient},
};
use std::sync::Arc;
use tracing::info;

const FILE_NOT_LISTED: &str = "File not listed";

enum MenuAction {
    ImportFile,
    ListCards,
    ListSuggestions,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config =
        Config::from_env().context("Failed to load configuration from environment variables")?;
    setup_logging(config.log_level)?;

    let auth_client = Arc::new(AuthClient::new(config.clone()));
    let store = FirestoreClient::new(config.clone(), auth_client);
    let mut prompter = StdinPrompter::new();

    confirm_environment(&config, &mut prompter)?;

    loop {
        match main_menu(&mut prompter)? {
            MenuAction::ImportFile => import_from_file(&config, &store, &mut prompter).await?,
            MenuAction::ListCards => list_existing_cards(&store).await?,
            MenuAction::ListSuggestions => list_card_suggestions(&store).await?,
            MenuAction::Quit => break,
        }
        if !prompter.confirm("Perform additional actions?")? {
            break;
        }
    }

    info!("Quitting deck admin");
    Ok(())
}

/// The operator must type the environment name back before anything else
/// runs; every action below touches the live database for that environment.
fn confirm_environment(config: &Config, prompter: &mut impl Prompter) -> anyhow::Result<()> {
    let message = format!(
        "PLEASE READ: all changes made will impact the {} database. To show you understand and intend to update the {} database, type '{}' and press enter.",
        config.environment.to_uppercase(),
        config.environment.to_uppercase(),
        config.environment
    );
    loop {
        if prompter.input(&message)? == config.environment {
            return Ok(());
        }
        println!(
            "{}",
            "Input does not match the environment name. Press 'Ctrl + C' to end with no changes made."
                .yellow()
        );
    }
}

fn main_menu(prompter: &mut impl Prompter) -> anyhow::Result<MenuAction> {
    let choices = vec![
        "Import new cards from a file".to_string(),
        "Print list of existing cards".to_string(),
        "Print list of card suggestions".to_string(),
        "Quit".to_string(),
    ];
    let action = match prompter.select_one("What would you like to do?", &choices)? {
        0 => MenuAction::ImportFile,
        1 => MenuAction::ListCards,
        2 => MenuAction::ListSuggestions,
        _ => MenuAction::Quit,
    };
    Ok(action)
}

async fn import_from_file(
    config: &Config,
    store: &impl DeckStore,
    prompter: &mut impl Prompter,
) -> anyhow::Result<()> {
    let files = list_deck_files(&config.deck_dir)?;
    let mut choices: Vec<String> = files.iter().map(|(_, name)| name.clone()).collect();
    choices.push(FILE_NOT_LISTED.to_string());
    let selected = prompter.select_one(
        "Which file would you like to use to add cards to the deck?",
        &choices,
    )?;
    let Some((path, _)) = files.get(selected) else {
        println!(
            "{}",
            format!(
                "Add the csv file to import to the '{}' directory and try again.",
                config.deck_dir.display()
            )
            .yellow()
        );
        return Ok(());
    };
    let outcome = run_import(config, store, prompter, path).await?;
    log_outcome(&outcome);
    Ok(())
}

async fn list_existing_cards(store: &impl DeckStore) -> anyhow::Result<()> {
    let mut words: Vec<String> = store.fetch_card_words().await?.into_iter().collect();
    words.sort();
    if words.is_empty() {
        println!("The deck is empty.");
        return Ok(());
    }
    println!(
        "\n{}",
        format!("{} card(s) in the deck:", words.len()).cyan().bold()
    );
    for word in words {
        println!("  {}", word);
    }
    Ok(())
}

async fn list_card_suggestions(store: &impl DeckStore) -> anyhow::Result<()> {
    let suggestions = store.fetch_suggestions(false).await?;
    if suggestions.is_empty() {
        println!("No unreviewed card suggestions.");
        return Ok(());
    }
    println!(
        "\n{}",
        format!("{} unreviewed suggestion(s):", suggestions.len())
            .cyan()
            .bold()
    );
    for suggestion in suggestions {
        println!(
            "  {}: {}",
            suggestion.taboo_word,
            suggestion.taboo_list.join(", ")
        );
    }
    Ok(())
}
