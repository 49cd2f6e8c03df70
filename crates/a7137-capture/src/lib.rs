pub mod analyze;
pub mod model;

// Re-export commonly used types/functions for the CLI
pub use analyze::{summarize, Summary};
pub use model::{load_csv, parse_csv, ParseError};
