//! sift: keyword search over crawled pages.
//!
//! sift answers keyword queries against the ranking tables a crawler leaves in a
//! SQLite database, or against a Solr core. It ranks the matches, pages them and
//! highlights the query terms, from the command line or over HTTP as JSON.

#![warn(missing_docs)]

pub mod cli;
