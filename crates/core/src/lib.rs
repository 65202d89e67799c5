pub mod config;
pub mod error;
pub mod logging;

pub mod organizer;
pub mod provider;
pub mod syntax;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, TagscopeError};
pub use organizer::{CaptureOrganizer, PatternCache};
pub use provider::{ProviderEvent, TreeSitterProvider, TsDocument, TsLayer};
