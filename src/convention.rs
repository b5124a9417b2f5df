//! Naming convention matcher.
//!
//! A filename carries its locale either as a path segment (`es/about.md`,
//! `blog/es/post.md`) or as a suffix right before the extension
//! (`about_es.md`). Both patterns are compiled once from the configured
//! locale set. When a name satisfies both, the path segment wins.

use crate::config::Config;
use crate::error::{MultilangError, Result};
use regex::Regex;

/// How a filename encodes its locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// A path segment equal to a locale code, e.g. `es/page.md`.
    Path,
    /// An `_<locale>` token before the extension, e.g. `page_es.md`.
    Suffix,
    /// No locale in the name; the file belongs to the default locale.
    Unencoded,
}

/// Byte offsets of a locale match inside a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSpan {
    /// Start of the whole match (`_` for suffixes, `/` or 0 for paths).
    pub start: usize,
    /// End of the whole match (after the trailing `/` or the extension).
    pub end: usize,
    pub locale_start: usize,
    pub locale_end: usize,
}

impl LocaleSpan {
    pub fn locale<'a>(&self, filename: &'a str) -> &'a str {
        &filename[self.locale_start..self.locale_end]
    }
}

#[derive(Debug, Clone)]
pub struct LocaleMatcher {
    default_locale: String,
    locales: Vec<String>,
    suffix_pattern: Regex,
    path_pattern: Regex,
}

impl LocaleMatcher {
    pub fn new(default_locale: &str, locales: &[String]) -> Result<Self> {
        if locales.is_empty() {
            return Err(MultilangError::InvalidConfig(
                "cannot build a matcher without locales".to_string(),
            ));
        }

        let alternation = locales
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");

        let suffix_pattern = Regex::new(&format!(r"_({})\.[^./]*$", alternation))
            .map_err(|e| MultilangError::InvalidConfig(e.to_string()))?;
        let path_pattern = Regex::new(&format!(r"(?:^|/)({})/", alternation))
            .map_err(|e| MultilangError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            default_locale: default_locale.to_string(),
            locales: locales.to_vec(),
            suffix_pattern,
            path_pattern,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.default_locale, &config.locales)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Classify a filename. Path encoding takes precedence over suffix encoding.
    pub fn classify(&self, filename: &str) -> Convention {
        if self.path_pattern.is_match(filename) {
            Convention::Path
        } else if self.suffix_pattern.is_match(filename) {
            Convention::Suffix
        } else {
            Convention::Unencoded
        }
    }

    /// First locale path segment in `filename`, if any.
    pub fn find_path_segment(&self, filename: &str) -> Option<LocaleSpan> {
        Self::span(&self.path_pattern, filename)
    }

    /// Trailing `_<locale><ext>` token in `filename`, if any.
    pub fn find_suffix(&self, filename: &str) -> Option<LocaleSpan> {
        Self::span(&self.suffix_pattern, filename)
    }

    /// Locale span for the given convention; `None` for `Unencoded` or when
    /// the filename does not actually follow `convention`.
    pub fn find(&self, filename: &str, convention: Convention) -> Option<LocaleSpan> {
        match convention {
            Convention::Path => self.find_path_segment(filename),
            Convention::Suffix => self.find_suffix(filename),
            Convention::Unencoded => None,
        }
    }

    /// Extract the locale code a filename is written in.
    ///
    /// Unencoded files resolve to the default locale. A captured token that
    /// is not a configured locale (or a convention the name does not follow)
    /// yields `UnrecognizedLocale`.
    pub fn extract_locale(&self, filename: &str, convention: Convention) -> Result<String> {
        if convention == Convention::Unencoded {
            return Ok(self.default_locale.clone());
        }

        let token = self
            .find(filename, convention)
            .map(|span| span.locale(filename))
            .unwrap_or_default();

        if self.locales.iter().any(|l| l == token) {
            Ok(token.to_string())
        } else {
            Err(MultilangError::UnrecognizedLocale {
                filename: filename.to_string(),
                token: token.to_string(),
            })
        }
    }

    /// Classify and extract in one step.
    pub fn locale_of(&self, filename: &str) -> Result<(Convention, String)> {
        let convention = self.classify(filename);
        let locale = self.extract_locale(filename, convention)?;
        Ok((convention, locale))
    }

    fn span(pattern: &Regex, filename: &str) -> Option<LocaleSpan> {
        let caps = pattern.captures(filename)?;
        let whole = caps.get(0)?;
        let locale = caps.get(1)?;
        Some(LocaleSpan {
            start: whole.start(),
            end: whole.end(),
            locale_start: locale.start(),
            locale_end: locale.end(),
        })
    }
}
