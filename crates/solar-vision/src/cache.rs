//! Cache for rooftop records

use solar_types::{CacheError, Result, RooftopRecord};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// On-disk cache of rooftop records keyed by image content and detector
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    /// Create a new cache manager
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// SHA-256 of the file contents, streamed
    pub fn hash_image(image_path: &Path) -> Result<String> {
        let file = File::open(image_path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn entry_path(&self, image_path: &Path, detector: &str) -> Result<PathBuf> {
        let key = Self::hash_image(image_path)?;
        Ok(self.cache_dir.join(format!("{}-{}.json", detector, key)))
    }

    /// Get cached record for an image
    pub fn get(&self, image_path: &Path, detector: &str) -> Result<Option<RooftopRecord>> {
        let cache_path = self.entry_path(image_path, detector)?;

        if !cache_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&cache_path)?;
        let record = serde_json::from_str(&content)
            .map_err(|e| CacheError::Corrupted(format!("{}: {}", cache_path.display(), e)))?;
        Ok(Some(record))
    }

    /// Store record in cache
    pub fn set(&self, image_path: &Path, detector: &str, record: &RooftopRecord) -> Result<()> {
        let cache_path = self.entry_path(image_path, detector)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&cache_path, content)?;
        Ok(())
    }

    fn cached_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Clear all cached records
    pub fn clear(&self) -> Result<usize> {
        let files = self.cached_files()?;
        for path in &files {
            fs::remove_file(path)?;
        }
        Ok(files.len())
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let files = self.cached_files()?;
        let total_size_bytes = files
            .iter()
            .filter_map(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();

        Ok(CacheStats {
            entry_count: files.len(),
            total_size_bytes,
            cache_dir: self.cache_dir.clone(),
        })
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: u64,
    pub cache_dir: PathBuf,
}

impl CacheStats {
    pub fn display(&self) -> String {
        let size_kb = self.total_size_bytes as f64 / 1024.0;
        format!(
            "Cache Statistics\n\
             ================\n\
             Entries:    {}\n\
             Total size: {:.2} KB\n\
             Location:   {}",
            self.entry_count,
            size_kb,
            self.cache_dir.display()
        )
    }
}
