use std::io;
use std::path::PathBuf;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;

#[derive(Debug)]
pub struct Config {
    pub enabled: bool,
    pub dir: PathBuf,
}

/// Page bodies stored on disk, one file per URL named by its slug.
pub struct Cache {
    enabled: bool,
    dir: PathBuf,
}

impl Cache {
    pub fn new(config: Config) -> Self {
        Self {
            enabled: config.enabled,
            dir: config.dir,
        }
    }

    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let slug = slugify(url);
        if !self.enabled || slug.is_empty() {
            return None;
        }

        Some(self.dir.join(slug))
    }

    /// Any failure to read the entry counts as a miss.
    pub async fn get(&self, url: &str) -> Option<String> {
        let path = self.path_for(url)?;

        match fs::read_to_string(&path).await {
            Ok(body) => {
                debug!("Cache hit {}", path.display());
                Some(body)
            }
            Err(err) => {
                debug!("Cache miss {}: {err}", path.display());
                None
            }
        }
    }

    pub async fn insert(&self, url: &str, body: &str) -> io::Result<()> {
        let Some(path) = self.path_for(url) else {
            return Ok(());
        };

        fs::create_dir_all(&self.dir).await?;
        fs::write(path, body).await
    }
}

/// Lowercases and trims `input`, turns every run of characters outside
/// `[a-z0-9_-]` into a single hyphen and strips leading and trailing `-`/`_`.
pub fn slugify(input: &str) -> String {
    static NOT_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_-]").unwrap());
    static HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

    let slug = input.trim().to_lowercase();
    let slug = NOT_SLUG.replace_all(&slug, "-");
    let slug = HYPHENS.replace_all(&slug, "-");

    slug.trim_matches(|ch| ch == '-' || ch == '_').to_string()
}
