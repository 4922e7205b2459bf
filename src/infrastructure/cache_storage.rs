//! 分代缓存存储
//!
//! 每一代（generation）是一个以请求 URL 为键的响应快照表。
//! 新版本部署时整代删除，单个条目从不单独淘汰。
//!
//! 配置了持久化目录时，每一代对应一个 `<dir>/<generation>.json` 文件，
//! 每次写入后整体落盘，启动时全部加载回来。落盘操作互斥执行，
//! 文件内容总是某一时刻内存中的完整快照。

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::response::ResponseSnapshot;
use crate::error::GatewayError;

/// 一代缓存
#[derive(Debug)]
pub struct CacheGeneration {
    name: String,
    entries: RwLock<HashMap<String, ResponseSnapshot>>,
}

impl CacheGeneration {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<ResponseSnapshot> {
        self.entries.read().get(key).cloned()
    }

    /// 写入条目，同一个键后写者覆盖先写者
    pub fn put(&self, key: impl Into<String>, snapshot: ResponseSnapshot) {
        self.entries.write().insert(key.into(), snapshot);
    }

    /// 一次性写入多个条目
    pub fn put_all(&self, items: Vec<(String, ResponseSnapshot)>) {
        let mut entries = self.entries.write();
        for (key, snapshot) in items {
            entries.insert(key, snapshot);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn to_file(&self) -> GenerationFile {
        let entries = self.entries.read();
        GenerationFile {
            name: self.name.clone(),
            entries: entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// 落盘格式
#[derive(Debug, Serialize, Deserialize)]
struct GenerationFile {
    name: String,
    entries: BTreeMap<String, ResponseSnapshot>,
}

/// 所有缓存代的集合
///
/// 由网关独占写入，可在多个请求之间共享。
#[derive(Debug, Default)]
pub struct CacheStorage {
    generations: RwLock<BTreeMap<String, Arc<CacheGeneration>>>,
    persist_dir: Option<PathBuf>,
    /// 从取快照到改名完成期间持有
    disk_lock: Mutex<()>,
}

impl CacheStorage {
    /// 仅内存缓存
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// 打开持久化缓存，加载目录下已有的所有缓存代
    pub async fn open_persistent(dir: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| persistence_error(&dir, source))?;

        let storage = Self {
            generations: RwLock::new(BTreeMap::new()),
            persist_dir: Some(dir.clone()),
            disk_lock: Mutex::new(()),
        };

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|source| persistence_error(&dir, source))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| persistence_error(&dir, source))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match load_generation_file(&path).await {
                Ok(file) => {
                    debug!("加载缓存代 {}: {} 个条目", file.name, file.entries.len());
                    let generation = storage.open(&file.name);
                    generation.put_all(file.entries.into_iter().collect());
                }
                Err(e) => {
                    warn!("跳过无法加载的缓存文件 {}: {}", path.display(), e);
                }
            }
        }

        info!(
            "📦 已加载持久化缓存: {} ({} 代)",
            dir.display(),
            storage.keys().len()
        );

        Ok(storage)
    }

    /// 打开指定代，不存在则创建
    pub fn open(&self, name: &str) -> Arc<CacheGeneration> {
        if let Some(existing) = self.generations.read().get(name) {
            return existing.clone();
        }
        self.generations
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CacheGeneration::new(name)))
            .clone()
    }

    /// 获取指定代，不存在返回 None
    pub fn get(&self, name: &str) -> Option<Arc<CacheGeneration>> {
        self.generations.read().get(name).cloned()
    }

    /// 在指定代中查找条目
    pub fn lookup(&self, name: &str, key: &str) -> Option<ResponseSnapshot> {
        self.get(name).and_then(|generation| generation.get(key))
    }

    /// 所有缓存代的名称
    pub fn keys(&self) -> Vec<String> {
        self.generations.read().keys().cloned().collect()
    }

    /// 每一代的名称和条目数
    pub fn report(&self) -> Vec<(String, usize)> {
        self.generations
            .read()
            .iter()
            .map(|(name, generation)| (name.clone(), generation.len()))
            .collect()
    }

    /// 删除整代缓存（包括落盘文件），返回是否存在
    pub async fn delete(&self, name: &str) -> Result<bool, GatewayError> {
        let _disk = self.disk_lock.lock().await;
        let removed = self.generations.write().remove(name).is_some();

        if let Some(path) = self.file_path(name) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(persistence_error(&path, source)),
            }
        }

        Ok(removed)
    }

    /// 把指定代写回磁盘，未配置持久化目录时什么也不做
    pub async fn persist(&self, name: &str) -> Result<(), GatewayError> {
        let Some(path) = self.file_path(name) else {
            return Ok(());
        };

        // 在锁内取快照，最后落盘的总是最新的内容
        let _disk = self.disk_lock.lock().await;
        let Some(generation) = self.get(name) else {
            return Ok(());
        };

        let content = serde_json::to_vec(&generation.to_file()).map_err(|source| {
            GatewayError::CorruptCache {
                path: path.display().to_string(),
                source,
            }
        })?;

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|source| persistence_error(&tmp_path, source))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| persistence_error(&path, source))?;

        Ok(())
    }

    pub fn persist_dir(&self) -> Option<&Path> {
        self.persist_dir.as_deref()
    }

    fn file_path(&self, name: &str) -> Option<PathBuf> {
        self.persist_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", sanitize_file_stem(name))))
    }
}

async fn load_generation_file(path: &Path) -> Result<GenerationFile, GatewayError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| persistence_error(path, source))?;
    serde_json::from_slice(&content).map_err(|source| GatewayError::CorruptCache {
        path: path.display().to_string(),
        source,
    })
}

fn persistence_error(path: &Path, source: std::io::Error) -> GatewayError {
    GatewayError::Persistence {
        path: path.display().to_string(),
        source,
    }
}

/// 缓存代名称转成安全的文件名
fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_writer_wins() {
        let storage = CacheStorage::in_memory();
        let generation = storage.open("v1");

        generation.put("http://a/x", ResponseSnapshot::new("http://a/x", 200, "first"));
        generation.put("http://a/x", ResponseSnapshot::new("http://a/x", 200, "second"));

        assert_eq!(generation.len(), 1);
        assert_eq!(
            storage.lookup("v1", "http://a/x").unwrap().body.as_ref(),
            b"second"
        );
    }

    #[test]
    fn open_returns_same_generation() {
        let storage = CacheStorage::in_memory();
        storage.open("v1").put("k", ResponseSnapshot::new("k", 200, "body"));
        assert!(storage.open("v1").contains("k"));
        assert_eq!(storage.keys(), vec!["v1".to_string()]);
    }

    #[test]
    fn file_stem_is_sanitized() {
        assert_eq!(sanitize_file_stem("plantid-cache-v1"), "plantid-cache-v1");
        assert_eq!(sanitize_file_stem("../evil/name"), ".._evil_name");
    }
}
