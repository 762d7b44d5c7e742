//! Labeled support corpus: records, datasets and the sources they load from.
//!
//! A corpus is newline-delimited JSON, one [`Record`] per line. Record order
//! is significant: fitted vector rows are aligned by index with dataset
//! positions, so a [`Dataset`] is never filtered or reordered once loaded.

pub mod record;
pub mod remote;
pub mod source;

pub use record::{Dataset, ParsePolicy, Record, parse_jsonl};
pub use remote::{NullFetcher, RemoteFetcher, RemoteSource, extract_file_id};
pub use source::{CorpusSource, FileSource, StaticSource};
