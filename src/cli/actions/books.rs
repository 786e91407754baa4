use crate::{
    cli::actions::print_json,
    library::{BookInput, BookQuery, Library},
    session::guard::ViewConfig,
    store::Role,
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug)]
pub enum Command {
    List(BookQuery),
    Show(u64),
    Search(String),
    Categories,
    Add(BookInput),
    Update { id: u64, input: BookInput },
    Delete(u64),
    BulkUpload(PathBuf),
}

impl Command {
    /// Browsing is public; inventory changes need an administrator.
    #[must_use]
    pub fn view(&self) -> ViewConfig {
        match self {
            Self::List(_) | Self::Show(_) | Self::Search(_) | Self::Categories => {
                ViewConfig::public()
            }
            Self::Add(_) | Self::Update { .. } | Self::Delete(_) | Self::BulkUpload(_) => {
                ViewConfig::roles(&[Role::Administrator])
            }
        }
    }
}

fn read_books(path: &Path) -> Result<Vec<BookInput>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let books: Vec<BookInput> = serde_json::from_str(&raw)
        .with_context(|| format!("{} must hold a JSON array of books", path.display()))?;
    if books.is_empty() {
        anyhow::bail!("{} contains no books", path.display());
    }
    Ok(books)
}

/// # Errors
/// Returns an error if the backend call fails.
pub async fn execute(command: Command, library: &Library) -> Result<()> {
    match command {
        Command::List(query) => print_json(&library.list_books(&query).await?),
        Command::Show(id) => print_json(&library.book(id).await?),
        Command::Search(query) => print_json(&library.search_books(&query).await?),
        Command::Categories => print_json(&library.categories().await?),
        Command::Add(input) => print_json(&library.create_book(&input).await?),
        Command::Update { id, input } => print_json(&library.update_book(id, &input).await?),
        Command::Delete(id) => print_json(&library.delete_book(id).await?),
        Command::BulkUpload(path) => {
            let books = read_books(&path)?;
            info!(count = books.len(), file = %path.display(), "uploading books");
            print_json(&library.bulk_upload(&books).await?)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn read_books_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(
            &path,
            r#"[{"title": "Dune", "isbn": "9780441013593", "available_copies": 3}]"#,
        )
        .unwrap();

        let books = read_books(&path).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].available_copies, Some(3));
    }

    #[test]
    fn read_books_rejects_empty_and_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        fs::write(&path, "[]").unwrap();
        assert!(read_books(&path).is_err());

        fs::write(&path, r#"{"title": "Dune"}"#).unwrap();
        assert!(read_books(&path).is_err());
    }

    #[test]
    fn inventory_changes_need_administrator() {
        assert!(Command::Categories.view().public);
        assert_eq!(
            Command::Delete(3).view().required_roles,
            vec![Role::Administrator]
        );
    }
}
