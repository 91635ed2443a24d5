//! Data models for scraped job postings.

mod job;
mod site;

pub use job::{
    ExtractionMethod, ExtractionResult, JobFields, RawJobFields, FAILURE_MARKER, NO_DESCRIPTION,
    UNKNOWN_COMPANY, UNKNOWN_POSITION,
};
pub use site::SourceSite;
