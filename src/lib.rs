pub mod analyzer;
pub mod decoder;
pub mod error;
pub mod event;
pub mod format;
pub mod tables;
pub mod timing;

pub mod isa {
    pub mod a7137; // AMICCOM A7137 command set
}

pub use analyzer::{Analyzer, AnalyzerConfig};
pub use decoder::{Annotation, AnnotationKind, Direction};
pub use error::{SettingsError, TimestampError};
pub use event::{BusEvent, DataFrame, Line, Source};
pub use timing::Timestamp;
