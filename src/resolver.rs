//! Collection resolver.
//!
//! Runs over a whole file collection in three steps:
//!
//! 1. Create an empty locale bucket for every configured locale.
//! 2. Classify every file, merge its base-locale metadata in and compute its
//!    alternate-locale map.
//! 3. Relocate index documents: default-locale indexes go to the root,
//!    others under `<locale>/`.
//!
//! Each step reads a snapshot of the keys taken when it starts and stages its
//! changes on a working copy. `files` is only replaced once every step has
//! succeeded, so an error leaves the caller's collection untouched.

use crate::config::{CollisionPolicy, Config};
use crate::convention::{Convention, LocaleMatcher};
use crate::entry::{FileEntry, Files};
use crate::error::{MultilangError, Result};
use crate::rewrite::basename;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Run-scoped locale data for templates building locale switchers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleIndex {
    pub default_locale: String,

    /// Every configured locale, in order, mapped to the files classified in it.
    ///
    /// Files are keyed by the name they had when classified; relocated index
    /// documents show their final state.
    pub locales: IndexMap<String, IndexMap<String, FileEntry>>,
}

impl LocaleIndex {
    fn new(config: &Config) -> Self {
        Self {
            default_locale: config.default_locale.clone(),
            locales: config
                .locales
                .iter()
                .map(|locale| (locale.clone(), IndexMap::new()))
                .collect(),
        }
    }

    pub fn files(&self, locale: &str) -> Option<&IndexMap<String, FileEntry>> {
        self.locales.get(locale)
    }
}

/// An index document moving from one key to another.
#[derive(Debug)]
struct Relocation {
    from: String,
    to: String,
    entry: FileEntry,
}

pub struct Resolver {
    config: Config,
    matcher: LocaleMatcher,
}

impl Resolver {
    pub fn new(config: Config) -> Result<Self> {
        let matcher = LocaleMatcher::from_config(&config)?;
        Ok(Self { config, matcher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn matcher(&self) -> &LocaleMatcher {
        &self.matcher
    }

    /// Resolve locales for the whole collection in place.
    pub fn resolve(&self, files: &mut Files) -> Result<LocaleIndex> {
        let mut index = LocaleIndex::new(&self.config);
        let mut working = files.clone();

        let classified = self.classify_and_merge(files)?;
        let mut registered: Vec<(String, String)> = Vec::with_capacity(classified.len());
        for (name, entry) in classified {
            let locale = entry.locale.clone().unwrap_or_default();
            registered.push((locale, name.clone()));
            working.insert(name, entry);
        }

        let relocations = self.plan_relocations(&working)?;
        let renames = Self::renames(&working, &relocations);

        let staged: HashMap<&str, &FileEntry> = relocations
            .iter()
            .map(|r| (r.from.as_str(), &r.entry))
            .collect();
        for (locale, name) in registered {
            let Some(entry) = staged.get(name.as_str()).copied().or_else(|| working.get(&name))
            else {
                continue;
            };
            let mut entry = entry.clone();
            repoint(&mut entry, &renames);
            if let Some(bucket) = index.locales.get_mut(&locale) {
                bucket.insert(name, entry);
            }
        }

        self.apply_relocations(&mut working, relocations, &renames);
        let moved = renames.values().filter(|to| to.is_some()).count();

        info!(
            "Resolved {} files across {} locales ({} index documents relocated)",
            working.len(),
            self.config.locales.len(),
            moved
        );

        *files = working;
        Ok(index)
    }

    /// Classify each file, merge in its base and compute its alternates.
    fn classify_and_merge(&self, files: &Files) -> Result<Vec<(String, FileEntry)>> {
        let mut staged = Vec::with_capacity(files.len());

        for (name, entry) in files {
            let (convention, locale) = self.matcher.locale_of(name)?;

            let mut updated = match self.base_of(name, convention, &locale, files) {
                Some(base) => {
                    debug!("Merging {} into {}", base, name);
                    entry.merged_onto(&files[base.as_str()])
                }
                None => entry.clone(),
            };

            updated.alt_files = self.alternates_of(name, convention, &locale, files);
            debug!(
                "{} -> locale '{}' ({:?}), {} alternates",
                name,
                locale,
                convention,
                updated.alt_files.len()
            );
            updated.locale = Some(locale);

            staged.push((name.clone(), updated));
        }

        Ok(staged)
    }

    /// Key of the entry `name` inherits from, if it exists in `files`.
    ///
    /// Falls back to the unencoded name when the default-locale name is absent.
    fn base_of(
        &self,
        name: &str,
        convention: Convention,
        locale: &str,
        files: &Files,
    ) -> Option<String> {
        let base = self.matcher.base_filename(name);
        if base != name && files.contains_key(&base) {
            return Some(base);
        }

        if convention == Convention::Unencoded || self.config.is_default(locale) {
            return None;
        }

        let plain = self.matcher.unencoded_filename(name);
        (plain != name && files.contains_key(&plain)).then_some(plain)
    }

    fn alternates_of(
        &self,
        name: &str,
        convention: Convention,
        locale: &str,
        files: &Files,
    ) -> IndexMap<String, String> {
        let mut alternates = IndexMap::new();

        for target in self.config.locales.iter().filter(|l| l.as_str() != locale) {
            let found = if convention == Convention::Unencoded {
                self.matcher
                    .encoded_candidates(name, target)
                    .into_iter()
                    .find(|candidate| candidate != name && files.contains_key(candidate))
            } else {
                let alt = self.matcher.alternate_filename(name, locale, target);
                if alt != name && files.contains_key(&alt) {
                    Some(alt)
                } else if self.config.is_default(target) {
                    let plain = self.matcher.unencoded_filename(name);
                    (plain != name && files.contains_key(&plain)).then_some(plain)
                } else {
                    None
                }
            };

            if let Some(found) = found {
                alternates.insert(target.clone(), found);
            }
        }

        alternates
    }

    /// Work out where every index document goes, checking for collisions.
    fn plan_relocations(&self, files: &Files) -> Result<Vec<Relocation>> {
        let mut relocations = Vec::new();

        for (name, entry) in files {
            if !entry.is_index() {
                continue;
            }

            let locale = entry
                .locale()
                .unwrap_or(self.config.default_locale.as_str())
                .to_string();
            let plain = self.matcher.unencoded_filename(name);

            let mut moved = entry.clone();
            let to = if self.config.is_default(&locale) {
                moved.path = Some(String::new());
                basename(&plain).to_string()
            } else {
                moved.path = Some(format!("{}/", locale));
                format!("{}/{}", locale, plain)
            };

            debug!("Index {} -> {}", name, to);
            relocations.push(Relocation {
                from: name.clone(),
                to,
                entry: moved,
            });
        }

        self.check_collisions(files, &relocations)?;
        Ok(relocations)
    }

    fn check_collisions(&self, files: &Files, relocations: &[Relocation]) -> Result<()> {
        let vacated: HashSet<&str> = relocations
            .iter()
            .filter(|r| r.from != r.to)
            .map(|r| r.from.as_str())
            .collect();

        let mut claims: IndexMap<&str, Vec<String>> = IndexMap::new();
        for relocation in relocations {
            claims
                .entry(relocation.to.as_str())
                .or_default()
                .push(relocation.from.clone());
        }

        for (destination, mut sources) in claims {
            let occupied = files.contains_key(destination)
                && !vacated.contains(destination)
                && !sources.iter().any(|s| s == destination);
            if occupied {
                sources.insert(0, destination.to_string());
            }
            if sources.len() < 2 {
                continue;
            }

            match self.config.on_collision {
                CollisionPolicy::Error => {
                    return Err(MultilangError::DestinationCollision {
                        destination: destination.to_string(),
                        sources,
                    });
                }
                CollisionPolicy::LastWriteWins => {
                    warn!(
                        "Destination collision on {}: {:?}, keeping the last one",
                        destination, sources
                    );
                }
            }
        }

        Ok(())
    }

    /// Where each key touched by relocation ends up.
    ///
    /// `None` means the document under that key was overwritten by another
    /// one; keys that are not listed keep their document.
    fn renames(files: &Files, relocations: &[Relocation]) -> HashMap<String, Option<String>> {
        let mut winners: HashMap<&str, &str> = HashMap::new();
        for relocation in relocations {
            winners.insert(relocation.to.as_str(), relocation.from.as_str());
        }
        let sources: HashSet<&str> = relocations.iter().map(|r| r.from.as_str()).collect();

        let mut renames = HashMap::new();
        for relocation in relocations {
            if winners.get(relocation.to.as_str()) == Some(&relocation.from.as_str()) {
                if relocation.from != relocation.to {
                    renames.insert(relocation.from.clone(), Some(relocation.to.clone()));
                }
            } else {
                renames.insert(relocation.from.clone(), None);
            }
        }

        for destination in winners.keys() {
            if files.contains_key(*destination) && !sources.contains(destination) {
                renames.insert(destination.to_string(), None);
            }
        }

        renames
    }

    /// Commit relocations: drop vacated keys, then write destinations in order.
    fn apply_relocations(
        &self,
        files: &mut Files,
        relocations: Vec<Relocation>,
        renames: &HashMap<String, Option<String>>,
    ) {
        for relocation in relocations.iter().filter(|r| r.from != r.to) {
            files.shift_remove(&relocation.from);
        }
        for relocation in relocations {
            files.insert(relocation.to, relocation.entry);
        }

        for entry in files.values_mut() {
            repoint(entry, renames);
        }
    }
}

/// Follow relocations in `alt_files`, dropping alternates that were overwritten.
fn repoint(entry: &mut FileEntry, renames: &HashMap<String, Option<String>>) {
    entry
        .alt_files
        .retain(|_, target| match renames.get(target.as_str()) {
            Some(Some(to)) => {
                *target = to.clone();
                true
            }
            Some(None) => false,
            None => true,
        });
}
