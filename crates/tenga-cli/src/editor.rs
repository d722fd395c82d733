//! Interactive editing support
//!
//! Opens $EDITOR for writing and revising document content.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

/// Editors tried when neither $EDITOR nor $VISUAL is set
const FALLBACK_EDITORS: &[&str] = &["nano", "vim", "vi", "emacs"];

/// Open document content in the user's preferred editor and return the
/// edited text
pub fn edit_content(initial: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("tenga_doc_{}.md", std::process::id()));
    fs::write(&temp_path, initial)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!("Editor '{}' exited with non-zero status.", editor);
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;
    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for editor in FALLBACK_EDITORS {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!("No editor found. Set $EDITOR (e.g. export EDITOR=nano).")
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Prompt showing the current value; Enter keeps it
///
/// Returns `None` when the user keeps the current value.
pub fn prompt_with_default(label: &str, current: &str) -> Result<Option<String>> {
    print!("{} [{}]: ", label, current);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() || input == current {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}
