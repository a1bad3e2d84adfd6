//! Recently asked questions, kept across runs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::truncate_chars;

/// Number of exchanges remembered
pub const MAX_ENTRIES: usize = 10;
const QUESTION_CHARS: usize = 100;
const ANSWER_CHARS: usize = 200;
const FILE_NAME: &str = "history.json";

/// One remembered exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    /// Local time the answer completed
    pub time: String,
}

/// Newest-first log of successful exchanges
#[derive(Debug)]
pub struct RecentQuestions {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl RecentQuestions {
    /// Log stored next to the settings file at `settings_path`
    pub fn beside(settings_path: &Path) -> Self {
        Self::load_from(settings_path.with_file_name(FILE_NAME))
    }

    /// Load from `path`; a missing or corrupt file starts an empty log
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt history file {}: {}", path.display(), e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Remember a completed exchange and persist the log
    pub fn record(&mut self, question: &str, answer: &str) -> std::io::Result<()> {
        self.entries.insert(
            0,
            HistoryEntry {
                question: truncate_chars(question, QUESTION_CHARS),
                answer: truncate_chars(answer, ANSWER_CHARS),
                time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        self.save()
    }

    fn save(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)
    }

    /// Render the log for display
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "No history yet".to_string();
        }

        let mut output = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. [{}] Q: {}\n    A: {}\n",
                i + 1,
                entry.time,
                entry.question,
                entry.answer.replace('\n', " ")
            ));
        }
        output
    }
}
