use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{name} was not found{}", similar_items(.similar))]
    InvalidRecipe { name: String, similar: Vec<String> },

    #[error("edge list is missing the required `{0}` column")]
    MissingColumn(&'static str),

    #[error("line {line}: `{value}` is not a valid ingredient rate")]
    InvalidRate { line: u64, value: String },

    #[error("quantity of {ingredient} does not fit in a decimal")]
    Overflow { ingredient: String },

    #[error("failed to read edge list: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl Error {
    /// True for errors raised while loading the edge list, before any query runs.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::MissingColumn(_) | Error::InvalidRate { .. } | Error::Csv(_)
        )
    }
}

fn similar_items(similar: &[String]) -> String {
    if similar.is_empty() {
        String::new()
    } else {
        format!(". Similar items: {}", similar.join(", "))
    }
}
