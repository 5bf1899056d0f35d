use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use waylog_core::db::{Database, EntryRepository, SqliteEntryRepository};
use waylog_core::{Entry, EntryId};

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub title: String,
    pub location: String,
    pub date: String,
    pub draft: bool,
    pub archived: bool,
    pub updated_at: String,
    pub remote_path: Option<String>,
}

pub fn open_database(db_path: &Path) -> Result<Database, CliError> {
    Ok(Database::open(db_path)?)
}

pub fn normalize_entry_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyEntryId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_title(title: &str) -> Result<String, CliError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Resolve an entry by full ID or unique ID prefix.
pub fn resolve_entry(query: &str, repo: &SqliteEntryRepository<'_>) -> Result<Entry, CliError> {
    if let Ok(id) = query.parse::<EntryId>() {
        if let Some(entry) = repo.get(&id)? {
            return Ok(entry);
        }
    }

    let mut matches: Vec<Entry> = repo
        .list_all()?
        .into_iter()
        .filter(|entry| entry.id.as_str().starts_with(query))
        .collect();

    match matches.len() {
        0 => Err(CliError::EntryNotFound(query.to_string())),
        1 => Ok(matches.swap_remove(0)),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|entry| entry.id.as_str().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousEntryId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn entry_to_list_item(entry: &Entry) -> EntryListItem {
    EntryListItem {
        id: entry.id.to_string(),
        title: entry.title.clone(),
        location: entry.location.clone(),
        date: entry.date.clone(),
        draft: entry.draft,
        archived: entry.archived,
        updated_at: entry.updated_at.clone(),
        remote_path: entry.remote_path.clone(),
    }
}

pub fn format_entry_lines(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let short_id = entry.id.as_str().chars().take(13).collect::<String>();
            let marker = if entry.archived {
                "[archived]"
            } else if entry.draft {
                "[draft]"
            } else {
                ""
            };
            let title = truncate(&entry.title, 32);
            let location = truncate(&entry.location, 24);
            format!(
                "{short_id:<13}  {:<10}  {title:<32}  {location:<24}  {marker}",
                entry.date
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Resolve body text from args, piped stdin, or $EDITOR, in that order.
/// An empty result is acceptable - journal bodies can start blank.
pub fn resolve_body(body_parts: &[String]) -> Result<String, CliError> {
    let joined = body_parts.join(" ");
    if !joined.trim().is_empty() {
        return Ok(joined.trim().to_string());
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    Ok(capture_editor_input_with_initial("")?.unwrap_or_default())
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = default_editor();
    let temp_file = create_temp_entry_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

pub fn default_editor() -> String {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

fn create_temp_entry_file_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    std::env::temp_dir().join(format!("waylog-entry-{nanos}.md"))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR may carry arguments, e.g. "code --wait".
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);
            let status = command
                .status()
                .map_err(|error| CliError::EditorFailed(format!("`{editor}`: {error}")))?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::EditorFailed(format!("`{editor}`: {err}"))),
    }
}
