use crate::types::{PostId, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_STATE_FILE: &str = "seen_tweets.json";

/// Durable set of post ids that have already been handled.
///
/// Stored as a JSON array of strings and rewritten in full after every
/// mutation. Ids are only ever added. A failed write is logged and the id
/// stays in memory; the next successful write catches the file up.
#[derive(Debug)]
pub struct SeenSet {
    path: PathBuf,
    ids: BTreeSet<PostId>,
}

impl SeenSet {
    /// Loads the set from `path`. A missing, empty or unreadable file starts an empty set.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let ids = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeSet::new(),
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(raw) => raw.iter().filter_map(|id| PostId::parse(id)).collect(),
                Err(e) => {
                    warn!("Ignoring corrupt state file {}: {}", path.display(), e);
                    BTreeSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} seen post id(s) from {}", ids.len(), path.display());
        Ok(Self { path, ids })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostId> {
        self.ids.iter()
    }

    /// Records one id and persists immediately. Returns whether it was new.
    pub fn insert(&mut self, id: PostId) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.save();
        true
    }

    /// Records many ids with a single write. Returns how many were new.
    pub fn insert_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = PostId>,
    {
        let added = ids.into_iter().filter(|id| self.ids.insert(id.clone())).count();
        if added > 0 {
            self.save();
        }
        added
    }

    fn save(&self) {
        if let Err(e) = self.persist() {
            warn!(
                "Could not write state file {} ({} id(s) kept in memory only): {}",
                self.path.display(),
                self.ids.len(),
                e
            );
        }
    }

    /// Writes to a sibling temp file and renames it over the real one, so a
    /// crash mid-write never leaves a truncated state file behind.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let raw: Vec<&str> = self.ids.iter().map(PostId::as_str).collect();
        let json = serde_json::to_string(&raw)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("Persisted {} seen id(s) to {}", self.ids.len(), self.path.display());
        Ok(())
    }
}
