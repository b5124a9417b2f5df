//! Locale variant resolution for static build pipelines.
//!
//! Given a collection of files whose names carry a locale (`es/about.md` or
//! `about_es.md`), this crate works out each file's locale, links every file
//! to its counterparts in the other configured locales, lets locale variants
//! inherit metadata from their default-locale base, and moves index documents
//! to locale-appropriate keys.
//!
//! # Architecture
//!
//! - `convention`: recognizes path and suffix locale encodings
//! - `rewrite`: derives alternate-locale and base filenames
//! - `entry`: file entries, the `lang()` accessor and metadata deep merge
//! - `resolver`: runs the whole collection through classification, merge and
//!   index relocation
//! - `manifest`: JSON manifest I/O used by the command-line host
//!
//! # Example
//!
//! ```rust
//! use multilang::{Config, FileEntry, Files, Resolver};
//!
//! let resolver = Resolver::new(Config::new("en", vec!["en", "es"])?)?;
//!
//! let mut files = Files::new();
//! files.insert("about_en.md".into(), FileEntry::new("Hello").with_meta("layout", "page.hbs"));
//! files.insert("about_es.md".into(), FileEntry::new("Hola"));
//!
//! let index = resolver.resolve(&mut files)?;
//!
//! assert_eq!(files["about_es.md"].get("layout"), Some(&"page.hbs".into()));
//! assert_eq!(files["about_es.md"].lang(&files, "en")?.contents, b"Hello");
//! assert!(index.files("es").unwrap().contains_key("about_es.md"));
//! # Ok::<(), multilang::MultilangError>(())
//! ```

pub mod config;
pub mod convention;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod rewrite;

pub use config::{CollisionPolicy, Config};
pub use convention::{Convention, LocaleMatcher};
pub use entry::{FileEntry, Files};
pub use error::MultilangError;
pub use resolver::{LocaleIndex, Resolver};
