//! This crate reverses name obfuscation in log output.
//!
//! A golden mapping file records, per class, which obfuscated name each
//! original ("golden") class and member name was replaced with. Parsing the
//! file yields a bidirectional, per-class index; the rewriter applies that
//! index to a block of log text, replacing every obfuscated fully-qualified
//! name with its golden equivalent.
//!
//! # Examples
//!
//! ```
//! let mapping = "\
//! com.example.Original -> com.example.a:
//!     int value -> b
//!     11:15:void doThing(int) -> c";
//!
//! let rewriter = golden_retrace::LogRewriter::from(mapping);
//!
//! // look up a class by either of its names
//! let class = rewriter.index().by_obfuscated("com.example.a").unwrap();
//! assert_eq!(class.golden, "com.example.Original");
//!
//! // rewrite a log
//! assert_eq!(
//!     rewriter.rewrite("com.example.a.b = 5\n"),
//!     "com.example.Original.value = 5\n",
//! );
//! ```

#![warn(missing_docs)]

mod index;
mod mapping;
mod rewrite;

pub use index::{ClassEntry, GoldenMember, MappingIndex, MemberKind, MemberMap};
pub use mapping::{GoldenMapping, MappingRecord, MappingRecordIter, MappingSummary, ParseError};
pub use rewrite::{normalize_log, LogRewriter};
