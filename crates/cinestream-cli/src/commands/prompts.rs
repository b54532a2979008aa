use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};

use cinestream_models::{MAX_RATING, MIN_RATING};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact_text().map_err(|e| eyre!("Falha ao ler a entrada: {}", e))
}

/// Prompt until a non-blank value is entered
pub fn prompt_required(prompt: &str) -> Result<String> {
    loop {
        let value = prompt_string(prompt, None)?;
        if !value.trim().is_empty() {
            return Ok(value);
        }
        eprintln!("Este campo é obrigatório.");
    }
}

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| eyre!("Falha ao ler o token: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Falha ao ler a confirmação: {}", e))
}

/// Parse a star rating typed by the user; accepts only whole stars in range
pub fn parse_rating(input: &str) -> Option<i32> {
    input
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
}

/// Prompt for a star rating, repeating until it is valid
pub fn prompt_rating(prompt: &str) -> Result<i32> {
    loop {
        let input = Input::<String>::new()
            .with_prompt(format!("{} ({}-{})", prompt, MIN_RATING, MAX_RATING))
            .interact_text()
            .map_err(|e| eyre!("Falha ao ler a entrada: {}", e))?;

        match parse_rating(&input) {
            Some(rating) => return Ok(rating),
            None => eprintln!("Nota inválida. Digite um número de {} a {}.", MIN_RATING, MAX_RATING),
        }
    }
}
