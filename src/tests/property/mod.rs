//! Property-based tests
//!
//! Invariants checked with proptest across generated inputs:
//!
//! - `candidate_props`: normalization of raw volumes
//!   - ISBN-13 always wins over ISBN-10
//!   - cover URL is never empty and follows the provider → ISBN → placeholder order
//!   - label never empty
//! - `library_props`: progress bookkeeping
//!   - pages read never exceed the total
//!   - daily totals cover every day of the range
//!
//! By default proptest runs 256 cases per property; override with
//! `PROPTEST_CASES`.

mod candidate_props;
mod library_props;
