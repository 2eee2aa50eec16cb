use std::{fs, path::Path};

use tempfile::TempDir;

/// Writes a fake `/proc/meminfo` with the given body into `dir`.
#[allow(dead_code)]
pub fn write_meminfo(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("meminfo");
    fs::write(&path, contents).unwrap();

    path
}

/// Writes a fake sysfs cache `index*` directory.
#[allow(dead_code)]
pub fn write_cache_index(cache_dir: &Path, index: usize, level: u8, kind: &str, size: &str) {
    let index = cache_dir.join(format!("index{index}"));
    fs::create_dir_all(&index).unwrap();

    fs::write(index.join("level"), format!("{level}\n")).unwrap();
    fs::write(index.join("type"), format!("{kind}\n")).unwrap();
    fs::write(index.join("size"), format!("{size}\n")).unwrap();
}
