//! In-memory record store standing in for the CRM. Raw string-encoded
//! records are parsed and validated at the insert boundary; readers only
//! ever see strongly-typed deals and contacts.

pub mod sample;
pub mod store;

pub use store::RecordStore;
