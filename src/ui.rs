// Operator layer: collects the breed and the OAuth token with `dialoguer`
// prompts, builds the config and the two clients, runs the backup and
// prints the final summary. The workflow itself never prompts; this is
// the only module that talks to the terminal interactively.

use crate::api::DogApiClient;
use crate::backup::{run_backup, BackupConfig};
use crate::disk::DiskClient;
use anyhow::Result;
use dialoguer::{Confirm, Input, Password};
use log::warn;
use std::path::PathBuf;

const TOKEN_FILE: &str = ".dog_backup_token";

/// Prompt for the run parameters, execute the backup and report the
/// outcome. Blocks until the run finishes or aborts.
pub fn run() -> Result<()> {
    let breed: String = Input::new()
        .with_prompt("Введите название породы (напр. spaniel)")
        .interact_text()?;
    let token = obtain_token()?;

    let cfg = BackupConfig::new(&breed);
    let dog_api = DogApiClient::new()?;
    let disk = DiskClient::new(&token)?;

    let report = run_backup(&cfg, &dog_api, &disk)?;

    // The run went through, so the token is worth keeping for next time.
    if let Err(e) = persist_token(&token) {
        warn!("Не удалось сохранить токен: {:#}", e);
    }

    println!(
        "Готово! Загружено: {}, пропущено (уже было): {}, ошибок: {}",
        report.uploaded, report.skipped, report.failed
    );
    Ok(())
}

/// Reuse a previously persisted token if the operator agrees, otherwise
/// prompt for a fresh one. The token is never validated before use.
fn obtain_token() -> Result<String> {
    if let Ok(saved) = load_token() {
        let reuse = Confirm::new()
            .with_prompt("Использовать сохранённый OAuth-токен?")
            .default(true)
            .interact()?;
        if reuse {
            return Ok(saved);
        }
    }
    let token: String = Password::new()
        .with_prompt("Введите OAuth-токен Яндекс.Диска")
        .interact()?;
    Ok(token.trim().to_string())
}

/// Persist the token into a file in the user's home directory.
fn persist_token(token: &str) -> Result<()> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(TOKEN_FILE);
    std::fs::write(path, token)?;
    Ok(())
}

/// Load the token from the user's home directory file.
fn load_token() -> Result<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(TOKEN_FILE);
    let data = std::fs::read_to_string(path)?;
    Ok(data.trim().to_string())
}
