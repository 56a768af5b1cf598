use anyhow::Context;
use colored::Colorize;
use std::io::{BufRead, Write};

/// The operator question shapes the tool needs. Each call suspends until an
/// answer arrives; the stdin implementation below renders plain numbered
/// lists, and tests script answers instead.
pub trait Prompter {
    /// Pick exactly one choice; returns its index.
    fn select_one(&mut self, message: &str, choices: &[String]) -> anyhow::Result<usize>;
    /// Pick any subset of choices (possibly none); returns their indices.
    fn select_many(&mut self, message: &str, choices: &[String]) -> anyhow::Result<Vec<usize>>;
    /// Free-text answer, trimmed.
    fn input(&mut self, message: &str) -> anyhow::Result<String>;
    /// Yes/no answer.
    fn confirm(&mut self, message: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> anyhow::Result<String> {
        print!("> ");
        std::io::stdout()
            .flush()
            .context("failed to flush stdout")?;
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read operator input")?;
        if read == 0 {
            anyhow::bail!("input stream closed");
        }
        Ok(line.trim().to_string())
    }

    fn print_choices(choices: &[String]) {
        for (idx, choice) in choices.iter().enumerate() {
            println!("  {}. {}", idx + 1, choice);
        }
    }
}

impl Prompter for StdinPrompter {
    fn select_one(&mut self, message: &str, choices: &[String]) -> anyhow::Result<usize> {
        println!("\n{}", message.cyan().bold());
        Self::print_choices(choices);
        loop {
            match self.read_line()?.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => println!(
                    "{}",
                    format!("Enter a number between 1 and {}", choices.len()).yellow()
                ),
            }
        }
    }

    fn select_many(&mut self, message: &str, choices: &[String]) -> anyhow::Result<Vec<usize>> {
        println!("\n{}", message.cyan().bold());
        Self::print_choices(choices);
        println!(
            "{}",
            "Enter comma-separated numbers, or press enter to select none".dimmed()
        );
        'prompt: loop {
            let line = self.read_line()?;
            if line.is_empty() {
                return Ok(Vec::new());
            }
            let mut selected = Vec::new();
            for part in line.split(',') {
                match part.trim().parse::<usize>() {
                    Ok(n) if (1..=choices.len()).contains(&n) => {
                        if !selected.contains(&(n - 1)) {
                            selected.push(n - 1);
                        }
                    }
                    _ => {
                        println!(
                            "{}",
                            format!(
                                "'{}' is not a number between 1 and {}",
                                part.trim(),
                                choices.len()
                            )
                            .yellow()
                        );
                        continue 'prompt;
                    }
                }
            }
            return Ok(selected);
        }
    }

    fn input(&mut self, message: &str) -> anyhow::Result<String> {
        println!("\n{}", message.cyan().bold());
        self.read_line()
    }

    fn confirm(&mut self, message: &str) -> anyhow::Result<bool> {
        println!("\n{}", message.cyan().bold());
        loop {
            match self.read_line()?.to_lowercase().as_str() {
                "y" | "yes" | "proceed" => return Ok(true),
                "n" | "no" | "cancel" => return Ok(false),
                _ => println!("{}", "Enter 'y' or 'n'".yellow()),
            }
        }
    }
}
