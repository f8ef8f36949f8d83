//! Saving and loading values as JSON files.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

pub const DEFAULT_FILENAME: &str = "Untitled.json";

/// Asks the user a yes/no style question.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    fn ask(&self, question: &str) -> Result<String>;
}

/// Prompts on stdout and reads one line from stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&self, question: &str) -> Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(question.as_bytes())?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

pub fn overwrite_question(path: &Path) -> String {
    format!(
        "WARNING: '{}' already exists. Are you sure you want to overwrite it ([y]/n)? ",
        path.display()
    )
}

/// `y`, `yes` and an empty answer confirm; anything else declines.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "")
}

/// Save/load support for any serde type.
pub trait Persist: Serialize + DeserializeOwned {
    /// Writes `self` to `path`, asking before overwriting an existing file.
    /// Returns whether the file was written.
    fn save(&self, path: impl AsRef<Path>, prompt: &dyn Prompt) -> Result<bool> {
        let path = path.as_ref();
        if path.exists() {
            let answer = prompt.ask(&overwrite_question(path))?;
            if !is_confirmation(&answer) {
                warn!(path = %path.display(), "not overwriting existing file");
                return Ok(false);
            }
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to serialize into {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), "saved");
        Ok(true)
    }

    fn save_default(&self, prompt: &dyn Prompt) -> Result<bool> {
        self.save(DEFAULT_FILENAME, prompt)
    }

    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;

        info!(path = %path.display(), "loaded");
        Ok(value)
    }
}
