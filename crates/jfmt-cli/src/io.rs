//! Where command input comes from and where exported output goes.

use clap::Args;
use jfmt_store::{load_last_content, KvStore};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("cannot read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot export to {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Input selection shared by commands that take JSON text.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Read from FILE ("-" for stdin). Defaults to piped stdin, else the saved buffer
    pub file: Option<String>,
    /// Use the saved buffer even when stdin is piped
    #[arg(long, conflicts_with = "file")]
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    Buffer,
}

impl InputArgs {
    pub fn source(&self) -> Source {
        self.source_with(std::io::stdin().is_terminal())
    }

    fn source_with(&self, stdin_is_terminal: bool) -> Source {
        match self.file.as_deref() {
            _ if self.last => Source::Buffer,
            Some("-") => Source::Stdin,
            Some(path) => Source::File(PathBuf::from(path)),
            None if stdin_is_terminal => Source::Buffer,
            None => Source::Stdin,
        }
    }
}

#[cfg(test)]
impl InputArgs {
    pub fn from_file(path: &Path) -> Self {
        Self {
            file: Some(path.display().to_string()),
            last: false,
        }
    }

    pub fn from_buffer() -> Self {
        Self {
            file: None,
            last: true,
        }
    }
}

/// Read the selected input. An absent buffer reads as empty text.
pub fn read_input(source: &Source, kv: &impl KvStore) -> Result<String, IoError> {
    match source {
        Source::File(path) => std::fs::read_to_string(path).map_err(|source| IoError::FileRead {
            path: path.display().to_string(),
            source,
        }),
        Source::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| IoError::FileRead {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text)
        }
        Source::Buffer => Ok(load_last_content(kv).unwrap_or_default()),
    }
}

/// Write `text` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), IoError> {
    match path {
        Some(path) => std::fs::write(path, text).map_err(|source| IoError::Export {
            path: path.display().to_string(),
            source,
        }),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
