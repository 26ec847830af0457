//! Boolean-outcome envelope over the student records core.
//! Presentation layers call this crate instead of the typed core API.

mod api;

pub use api::{
    core_version, courses, init_logging, ActionResponse, RecordResponse, RecordsApi,
    RecordsResponse,
};
