//! Filename rewriting between locale variants.
//!
//! All functions here are pure string transformations driven by the spans
//! the [`LocaleMatcher`] finds; they never look at the file collection.

use crate::convention::{LocaleMatcher, LocaleSpan};
use tracing::debug;

/// Extension of `filename` including the leading dot, or `""` if it has none.
///
/// Only the last path segment is considered, and a segment whose only dot
/// is its first character (`.gitignore`) has no extension.
pub fn extension(filename: &str) -> &str {
    let segment_start = filename.rfind('/').map(|i| i + 1).unwrap_or(0);
    let segment = &filename[segment_start..];
    match segment.rfind('.') {
        Some(i) if i > 0 => &segment[i..],
        _ => "",
    }
}

/// Last path segment of `filename`.
pub fn basename(filename: &str) -> &str {
    match filename.rfind('/') {
        Some(i) => &filename[i + 1..],
        None => filename,
    }
}

fn replace_locale(filename: &str, span: LocaleSpan, locale: &str) -> String {
    format!(
        "{}{}{}",
        &filename[..span.locale_start],
        locale,
        &filename[span.locale_end..]
    )
}

impl LocaleMatcher {
    /// Name of the same document in `to_locale`.
    ///
    /// Path-encoded names get their first locale segment swapped; other names
    /// get their trailing `_<from><ext>` swapped for `_<to><ext>`. `from_locale`
    /// must be the file's own locale; if it is not, the name comes back unchanged.
    pub fn alternate_filename(&self, filename: &str, from_locale: &str, to_locale: &str) -> String {
        if let Some(span) = self.find_path_segment(filename) {
            if span.locale(filename) != from_locale {
                debug!(
                    "{} is not in locale '{}', leaving it as is",
                    filename, from_locale
                );
                return filename.to_string();
            }
            return replace_locale(filename, span, to_locale);
        }

        let ext = extension(filename);
        let from_token = format!("_{}{}", from_locale, ext);
        match filename.strip_suffix(&from_token) {
            Some(stem) => format!("{}_{}{}", stem, to_locale, ext),
            None => filename.to_string(),
        }
    }

    /// Name of the same document in the default locale.
    ///
    /// Unencoded files are their own base.
    pub fn base_filename(&self, filename: &str) -> String {
        if let Some(span) = self.find_path_segment(filename) {
            return replace_locale(filename, span, self.default_locale());
        }

        if let Some(span) = self.find_suffix(filename) {
            let ext = &filename[span.locale_end..];
            return format!(
                "{}_{}{}",
                &filename[..span.start],
                self.default_locale(),
                ext
            );
        }

        filename.to_string()
    }

    /// Name with its locale encoding removed.
    ///
    /// `es/page.md` and `page_es.md` both become `page.md`; `blog/es/post.md`
    /// becomes `blog/post.md`.
    pub fn unencoded_filename(&self, filename: &str) -> String {
        if let Some(span) = self.find_path_segment(filename) {
            let joint = if filename[span.start..].starts_with('/') {
                "/"
            } else {
                ""
            };
            return format!("{}{}{}", &filename[..span.start], joint, &filename[span.end..]);
        }

        if let Some(span) = self.find_suffix(filename) {
            return format!("{}{}", &filename[..span.start], &filename[span.locale_end..]);
        }

        filename.to_string()
    }

    /// Candidate names for an unencoded file in `locale`, path convention first.
    pub fn encoded_candidates(&self, filename: &str, locale: &str) -> Vec<String> {
        let ext = extension(filename);
        let stem = &filename[..filename.len() - ext.len()];
        vec![
            format!("{}/{}", locale, filename),
            format!("{}_{}{}", stem, locale, ext),
        ]
    }
}
