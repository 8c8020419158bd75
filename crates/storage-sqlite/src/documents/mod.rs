//! SQLite storage for whole-aggregate JSON documents.

mod model;
mod repository;

pub use model::DocumentRow;
pub use repository::SqliteDocumentRepository;
