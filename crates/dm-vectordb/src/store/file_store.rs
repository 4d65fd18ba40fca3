use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Directory-backed file store with atomic writes.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn resolve_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    pub fn get(&self, key: &str) -> std::io::Result<Vec<u8>> {
        fs::read(self.resolve_path(key))
    }

    /// Write `value` under `key`. Readers see either the previous file or the
    /// complete new one, never a partial write. Each write stages in its own
    /// uniquely named temp file, so concurrent writers never share one.
    pub fn put(&self, key: &str, value: &[u8]) -> std::io::Result<()> {
        let path = self.resolve_path(key);
        let parent = match path.parent() {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(value)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        // Dropping a temp file that failed to persist removes it.
        tmp.persist(&path).map_err(|e| e.error)?;

        // Make the rename itself durable where the platform allows opening dirs.
        if let Ok(dir) = fs::File::open(&parent) {
            let _ = dir.sync_all();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.put("blob", b"first").unwrap();
        store.put("blob", b"second").unwrap();
        assert_eq!(store.get("blob").unwrap(), b"second");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.put("blob.bin", b"data").unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["blob.bin".to_string()]);
    }

    #[test]
    fn test_missing_key_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("nothing").is_err());
    }

    #[test]
    fn test_concurrent_puts_never_interleave() {
        let dir = tempfile::TempDir::new().unwrap();
        let big = vec![0xAAu8; 1 << 20];
        let small = vec![0x55u8; 1 << 19];
        for _ in 0..10 {
            std::thread::scope(|s| {
                for payload in [&big, &small] {
                    let store = FileStore::new(dir.path());
                    s.spawn(move || store.put("blob", payload).unwrap());
                }
            });
            let got = FileStore::new(dir.path()).get("blob").unwrap();
            assert!(got == big || got == small, "mixed write of {} bytes", got.len());
        }
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["blob".to_string()]);
    }
}
