//! Book metadata: raw lookup payloads, normalized candidates and the
//! lookup service seam with its Google Books adapter.

pub mod candidate;
pub mod google;
pub mod lookup;
pub mod volume;

pub use candidate::Candidate;
pub use google::GoogleBooksClient;
pub use lookup::{BookLookup, LookupError, LookupResult};
pub use volume::{ImageLinks, IndustryIdentifier, RawVolume, VolumeInfo, VolumesResponse};

#[cfg(test)]
pub use lookup::MockBookLookup;
