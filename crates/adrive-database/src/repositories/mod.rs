//! Repository implementations for all A-Drive entities.

pub mod favorite;
pub mod file;
pub mod folder;
pub mod recent;

pub use favorite::FavoriteRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use recent::RecentAccessRepository;

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Whether a sqlx error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
