use anyhow::{Context, Result};
use colored::Colorize;
use inquire::validator::Validation;
use inquire::{CustomUserError, Text};

use crate::credentials::CredentialStore;
use crate::error::SelectionError;

/// Separator printed around menus and status blocks
pub const SEPARATOR: &str = "==========================================";

/// A selectable `(service, key)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub service: String,
    pub key: String,
}

/// Flatten the store into menu order
pub fn flatten_choices(store: &CredentialStore) -> Vec<Choice> {
    store
        .keys()
        .map(|(service, key)| Choice {
            service: service.to_string(),
            key: key.to_string(),
        })
        .collect()
}

/// Render `"{n}. {service}. {key}. {username}"` for each choice, numbered from 1
pub fn menu_lines(store: &CredentialStore, choices: &[Choice]) -> Vec<String> {
    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let username = store
                .username(&choice.service, &choice.key)
                .unwrap_or("<no username>");
            format!("{}. {}. {}. {}", i + 1, choice.service, choice.key, username)
        })
        .collect()
}

/// Parse a menu number and return the zero-based index it refers to.
pub fn validate_choice(input: &str, len: usize) -> Result<usize, SelectionError> {
    let out_of_range = || SelectionError::OutOfRange {
        input: input.to_string(),
        len,
    };

    let number: usize = input.trim().parse().map_err(|_| out_of_range())?;
    if number >= 1 && number <= len {
        Ok(number - 1)
    } else {
        Err(out_of_range())
    }
}

/// Resolve a menu number against the choice list
pub fn select<'a>(choices: &'a [Choice], input: &str) -> Result<&'a Choice, SelectionError> {
    let index = validate_choice(input, choices.len())?;
    Ok(&choices[index])
}

/// Fail early instead of prompting over an empty menu
pub fn ensure_choices(choices: &[Choice], source: &str) -> Result<(), SelectionError> {
    if choices.is_empty() {
        Err(SelectionError::NoCredentials(source.to_string()))
    } else {
        Ok(())
    }
}

/// Check if we're running in an interactive terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Print the numbered credential menu
pub fn print_menu(store: &CredentialStore, choices: &[Choice]) {
    println!("{}", SEPARATOR);
    println!("{}", "Select a credential profile:".bold());
    for line in menu_lines(store, choices) {
        println!("{}", line);
    }
    println!("{}", SEPARATOR);
}

/// Prompt until the operator enters a valid menu number.
pub fn prompt_choice(choices: &[Choice]) -> Result<Choice> {
    let len = choices.len();

    let answer = Text::new("Enter the number of your selection:")
        .with_validator(
            move |input: &str| -> Result<Validation, CustomUserError> {
                match validate_choice(input, len) {
                    Ok(_) => Ok(Validation::Valid),
                    Err(e) => Ok(Validation::Invalid(e.to_string().into())),
                }
            },
        )
        .prompt()
        .context("Failed to read selection")?;

    Ok(select(choices, &answer)?.clone())
}

/// Ask for the commit message. Any text, including an empty line, is accepted.
pub fn prompt_commit_message() -> Result<String> {
    Text::new("Commit message:")
        .prompt()
        .context("Failed to read commit message")
}
