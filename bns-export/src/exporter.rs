//! Multi-target artifact exporter.
//!
//! Each target is processed independently: read the existing document,
//! deep-merge the new facts over it, write it back pretty-printed. A failing
//! target never prevents the others from being written.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use bns_core::constants::ARTIFACT_EXTENSION;
use bns_core::{json_kind, BnsError, ExportTarget, FactSet, PathParams, Result, Status};

use crate::merge::merge_facts;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// What to do when an existing target document cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorruptDocumentPolicy {
    /// Log a warning and start from an empty document.
    #[default]
    TreatAsEmpty,
    /// Fail the target and leave the file untouched.
    Fail,
}

/// Exporter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExporterConfig {
    /// Handling of unparseable existing documents.
    #[serde(default)]
    pub corrupt_policy: CorruptDocumentPolicy,
    /// Write through a sibling temp file and rename it over the target.
    #[serde(default = "default_atomic_writes")]
    pub atomic_writes: bool,
}

fn default_atomic_writes() -> bool {
    true
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            corrupt_policy: CorruptDocumentPolicy::default(),
            atomic_writes: true,
        }
    }
}

impl From<CorruptDocumentPolicy> for ExporterConfig {
    fn from(corrupt_policy: CorruptDocumentPolicy) -> Self {
        Self {
            corrupt_policy,
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of exporting to a single target.
#[derive(Debug)]
pub struct TargetOutcome {
    /// The target as requested.
    pub target: ExportTarget,
    /// Concrete file path the target resolved to.
    pub path: PathBuf,
    /// Whether the write succeeded.
    pub result: Result<()>,
}

impl TargetOutcome {
    /// True if the target was written.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-target outcomes of one export call, in target order.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// One entry per requested target.
    pub outcomes: Vec<TargetOutcome>,
}

impl ExportReport {
    /// True if every target was written (vacuously true for no targets).
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(TargetOutcome::is_success)
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Paths that were written.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.path.as_path())
    }

    /// Number of targets in the report.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True if no targets were requested.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Appends another report's outcomes.
    pub fn extend(&mut self, other: ExportReport) {
        self.outcomes.extend(other.outcomes);
    }

    /// Collapses the report into a status carrying the written paths.
    pub fn into_status(self) -> Status<Vec<PathBuf>> {
        let total = self.outcomes.len();
        let mut written = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for outcome in self.outcomes {
            match outcome.result {
                Ok(()) => written.push(outcome.path),
                Err(e) => errors.push(format!("{}: {}", outcome.path.display(), e)),
            }
        }

        if errors.is_empty() {
            Status::success(format!("exported {} artifact(s)", written.len()), written)
        } else {
            Status::error(
                format!("{} of {} target(s) failed: {}", errors.len(), total, errors.join("; ")),
                written,
            )
        }
    }
}

/// An ABI to publish, keyed by the file name it is written under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiArtifact {
    /// File stem, e.g. `registrar`.
    pub name: String,
    /// ABI JSON.
    pub abi: Value,
}

impl AbiArtifact {
    /// Create a new ABI artifact.
    pub fn new(name: impl Into<String>, abi: Value) -> Self {
        Self {
            name: name.into(),
            abi,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPORTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes fact sets into JSON artifact files.
///
/// Read-merge-write cycles on the same path are serialized within the
/// process; distinct paths proceed concurrently.
#[derive(Debug, Default)]
pub struct ArtifactExporter {
    config: ExporterConfig,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl ArtifactExporter {
    /// Creates an exporter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an exporter with the given configuration.
    pub fn with_config(config: impl Into<ExporterConfig>) -> Self {
        Self {
            config: config.into(),
            locks: DashMap::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Merges `facts` into every target.
    ///
    /// Directory targets resolve to `<dir>/<chainId>.json`. Missing parent
    /// directories are created. Targets are written concurrently and each
    /// gets its own outcome in the report.
    #[instrument(skip(self, facts, targets), fields(facts = facts.len(), targets = targets.len(), chain_id = params.chain_id))]
    pub async fn export_facts(
        &self,
        facts: &FactSet,
        targets: &[ExportTarget],
        params: &PathParams,
    ) -> ExportReport {
        let outcomes = join_all(targets.iter().map(|target| async move {
            let path = target.resolve(params);
            let result = self.merge_into(&path, facts).await;
            log_outcome(&path, &result);
            TargetOutcome {
                target: target.clone(),
                path,
                result,
            }
        }))
        .await;

        let report = ExportReport { outcomes };
        info!(
            written = report.written().count(),
            failed = report.failures().count(),
            "Facts exported"
        );
        report
    }

    /// Writes each ABI to `<dir>/<chainId>/<name>.json` in every directory,
    /// replacing any previous file.
    #[instrument(skip(self, abis, dirs), fields(abis = abis.len(), dirs = dirs.len()))]
    pub async fn export_abis(
        &self,
        abis: &[AbiArtifact],
        dirs: &[PathBuf],
        chain_id: u64,
    ) -> ExportReport {
        let jobs = dirs.iter().flat_map(|dir| {
            abis.iter().map(move |artifact| {
                let path = dir
                    .join(chain_id.to_string())
                    .join(format!("{}.{}", artifact.name, ARTIFACT_EXTENSION));
                async move {
                    let result = self.replace(&path, &artifact.abi).await;
                    log_outcome(&path, &result);
                    TargetOutcome {
                        target: ExportTarget::file(path.clone()),
                        path,
                        result,
                    }
                }
            })
        });

        ExportReport {
            outcomes: join_all(jobs).await,
        }
    }

    /// Reads a document as the exporter would before merging.
    ///
    /// Returns `None` for a missing file.
    pub async fn load_document(&self, path: impl AsRef<Path>) -> Result<Option<Map<String, Value>>> {
        let path = path.as_ref();
        match fs::read(path).await {
            Ok(bytes) => self.parse_document(path, &bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(export_error(path, e)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PER-TARGET PIPELINE
    // ═══════════════════════════════════════════════════════════════════════════

    async fn merge_into(&self, path: &Path, facts: &FactSet) -> Result<()> {
        let key = lock_key(path);
        let lock = self.lock_for(&key);

        let result = async {
            let _guard = lock.lock().await;
            ensure_parent(path).await?;
            let document = self.load_document(path).await?.unwrap_or_default();
            let merged = merge_facts(document, facts);
            self.write_document(path, &Value::Object(merged)).await
        }
        .await;

        drop(lock);
        self.release(&key);
        result
    }

    async fn replace(&self, path: &Path, value: &Value) -> Result<()> {
        let key = lock_key(path);
        let lock = self.lock_for(&key);

        let result = async {
            let _guard = lock.lock().await;
            ensure_parent(path).await?;
            self.write_document(path, value).await
        }
        .await;

        drop(lock);
        self.release(&key);
        result
    }

    fn lock_for(&self, key: &Path) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the lock entry once no writer holds or awaits it.
    fn release(&self, key: &Path) {
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn parse_document(&self, path: &Path, bytes: &[u8]) -> Result<Map<String, Value>> {
        // An empty file is what an interrupted non-atomic write leaves behind.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        let reason = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(other) => format!("expected an object, found {}", json_kind(&other)),
            Err(e) => e.to_string(),
        };

        match self.config.corrupt_policy {
            CorruptDocumentPolicy::TreatAsEmpty => {
                warn!(path = %path.display(), %reason, "Existing document unreadable, starting from empty");
                Ok(Map::new())
            }
            CorruptDocumentPolicy::Fail => Err(BnsError::CorruptDocument {
                path: path.display().to_string(),
                reason,
            }),
        }
    }

    async fn write_document(&self, path: &Path, value: &Value) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(value)?;
        contents.push('\n');

        if !self.config.atomic_writes {
            return fs::write(path, contents)
                .await
                .map_err(|e| export_error(path, e));
        }

        let temp_path = temp_path_for(path);
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(contents.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(export_error(path, e));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

async fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| export_error(path, e)),
        _ => Ok(()),
    }
}

/// Lexically normalized path used to key the lock table, so `a/./b.json`
/// and `a/c/../b.json` share a lock with `a/b.json`.
fn lock_key(path: &Path) -> PathBuf {
    let mut key = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(key.components().next_back(), Some(Component::Normal(_))) {
                    key.pop();
                } else {
                    key.push(component);
                }
            }
            other => key.push(other),
        }
    }
    key
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn export_error(path: &Path, e: std::io::Error) -> BnsError {
    BnsError::ExportFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn log_outcome(path: &Path, result: &Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Artifact written"),
        Err(e) => warn!(path = %path.display(), error = %e, "Artifact export failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn facts(value: Value) -> FactSet {
        FactSet::try_from(value).unwrap()
    }

    async fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_created_with_facts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config/tlds.json");
        let exporter = ArtifactExporter::new();

        let report = exporter
            .export_facts(
                &facts(json!({"bnb": [97]})),
                &[ExportTarget::file(&path)],
                &PathParams::new(97),
            )
            .await;

        assert!(report.is_success());
        assert_eq!(report.len(), 1);
        assert_eq!(read_json(&path).await, json!({"bnb": [97]}));
    }

    #[tokio::test]
    async fn test_merges_into_existing_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"a": 1, "b": {"x": 1}}"#).await.unwrap();

        let exporter = ArtifactExporter::new();
        let report = exporter
            .export_facts(
                &facts(json!({"b": {"y": 2}, "c": 3})),
                &[ExportTarget::file(&path)],
                &PathParams::new(1),
            )
            .await;

        assert!(report.is_success());
        assert_eq!(read_json(&path).await, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
    }

    #[tokio::test]
    async fn test_output_is_pretty_with_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let exporter = ArtifactExporter::new();

        exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        let text = fs::read_to_string(&path).await.unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}\n");
    }

    #[tokio::test]
    async fn test_directory_target_resolves_to_chain_file() {
        let dir = tempdir().unwrap();
        let exporter = ArtifactExporter::new();

        let report = exporter
            .export_facts(
                &facts(json!({"registrar": "0x01"})),
                &[ExportTarget::directory(dir.path().join("contracts"))],
                &PathParams::new(97),
            )
            .await;

        let expected = dir.path().join("contracts/97.json");
        assert_eq!(report.outcomes[0].path, expected);
        assert_eq!(read_json(&expected).await, json!({"registrar": "0x01"}));
    }

    #[tokio::test]
    async fn test_export_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"keep": true}"#).await.unwrap();
        let exporter = ArtifactExporter::new();
        let facts = facts(json!({"registries": {"bnb": "0xaa"}}));
        let targets = [ExportTarget::file(&path)];

        exporter.export_facts(&facts, &targets, &PathParams::new(1)).await;
        let first = fs::read_to_string(&path).await.unwrap();
        exporter.export_facts(&facts, &targets, &PathParams::new(1)).await;
        let second = fs::read_to_string(&path).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_targets() {
        let exporter = ArtifactExporter::new();
        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[], &PathParams::new(1))
            .await;

        assert!(report.is_empty());
        assert!(report.is_success());
        assert!(report.into_status().is_success());
    }

    #[tokio::test]
    async fn test_empty_facts_keep_document_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"a":1,"b":[1,2]}"#).await.unwrap();
        let exporter = ArtifactExporter::new();

        let report = exporter
            .export_facts(&FactSet::new(), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(report.is_success());
        assert_eq!(read_json(&path).await, json!({"a": 1, "b": [1, 2]}));
    }

    #[tokio::test]
    async fn test_failing_target_does_not_block_others() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "plain file").await.unwrap();

        let good = dir.path().join("good.json");
        let bad = blocker.join("doc.json");
        let exporter = ArtifactExporter::new();

        let report = exporter
            .export_facts(
                &facts(json!({"a": 1})),
                &[ExportTarget::file(&bad), ExportTarget::file(&good)],
                &PathParams::new(1),
            )
            .await;

        assert!(!report.is_success());
        assert_eq!(report.len(), 2);
        assert!(!report.outcomes[0].is_success());
        assert!(report.outcomes[1].is_success());
        assert_eq!(read_json(&good).await, json!({"a": 1}));

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].result, Err(BnsError::ExportFailed { .. })));

        let status = report.into_status();
        assert!(status.is_error());
        assert_eq!(status.data(), Some(&vec![good]));
    }

    #[tokio::test]
    async fn test_corrupt_document_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "{ not json").await.unwrap();
        let exporter = ArtifactExporter::new();

        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(report.is_success());
        assert_eq!(read_json(&path).await, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_undecodable_document_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, [0xff, 0xfe, b'{', b'}']).await.unwrap();
        let exporter = ArtifactExporter::new();

        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(report.is_success());
        assert_eq!(read_json(&path).await, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_undecodable_document_fails_under_strict_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, [0xff, 0xfe, b'{', b'}']).await.unwrap();
        let exporter = ArtifactExporter::with_config(CorruptDocumentPolicy::Fail);

        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(matches!(
            report.outcomes[0].result,
            Err(BnsError::CorruptDocument { .. })
        ));
        assert_eq!(fs::read(&path).await.unwrap(), vec![0xff, 0xfe, b'{', b'}']);
    }

    #[tokio::test]
    async fn test_corrupt_document_fails_under_strict_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "[1, 2]").await.unwrap();
        let exporter = ArtifactExporter::with_config(CorruptDocumentPolicy::Fail);

        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(!report.is_success());
        assert!(matches!(
            report.outcomes[0].result,
            Err(BnsError::CorruptDocument { .. })
        ));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[1, 2]");
    }

    #[tokio::test]
    async fn test_empty_file_is_not_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "").await.unwrap();
        let exporter = ArtifactExporter::with_config(CorruptDocumentPolicy::Fail);

        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_concurrent_exports_to_same_path_lose_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.json");
        let exporter = ArtifactExporter::new();
        let targets = [ExportTarget::file(&path)];
        let params = PathParams::new(1);

        let fact_sets: Vec<FactSet> = (0..16)
            .map(|i| FactSet::new().with(format!("key{}", i), json!(i)))
            .collect();

        let reports = join_all(
            fact_sets
                .iter()
                .map(|facts| exporter.export_facts(facts, &targets, &params)),
        )
        .await;

        assert!(reports.iter().all(ExportReport::is_success));
        let doc = read_json(&path).await;
        for i in 0..16 {
            assert_eq!(doc[format!("key{}", i)], json!(i));
        }
    }

    #[test]
    fn test_lock_key_normalizes_path() {
        assert_eq!(lock_key(Path::new("dir/./a.json")), PathBuf::from("dir/a.json"));
        assert_eq!(lock_key(Path::new("dir/sub/../a.json")), PathBuf::from("dir/a.json"));
        assert_eq!(lock_key(Path::new("../a.json")), PathBuf::from("../a.json"));
        assert_eq!(lock_key(Path::new("/tmp/./x/a.json")), PathBuf::from("/tmp/x/a.json"));
    }

    #[tokio::test]
    async fn test_equivalent_paths_share_a_lock_and_entries_are_released() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).await.unwrap();
        let plain = dir.path().join("shared.json");
        let dotted = dir.path().join("./sub/../shared.json");
        let exporter = ArtifactExporter::new();
        let params = PathParams::new(1);

        let fact_sets: Vec<(FactSet, ExportTarget)> = (0..16)
            .map(|i| {
                let path = if i % 2 == 0 { &plain } else { &dotted };
                (
                    FactSet::new().with(format!("key{}", i), json!(i)),
                    ExportTarget::file(path),
                )
            })
            .collect();

        let reports = join_all(fact_sets.iter().map(|(facts, target)| {
            exporter.export_facts(facts, std::slice::from_ref(target), &params)
        }))
        .await;

        assert!(reports.iter().all(ExportReport::is_success));
        let doc = read_json(&plain).await;
        for i in 0..16 {
            assert_eq!(doc[format!("key{}", i)], json!(i));
        }
        assert!(exporter.locks.is_empty());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let exporter = ArtifactExporter::new();

        exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(!temp_path_for(&path).exists());
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_non_atomic_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let exporter = ArtifactExporter::with_config(ExporterConfig {
            atomic_writes: false,
            ..Default::default()
        });

        let report = exporter
            .export_facts(&facts(json!({"a": 1})), &[ExportTarget::file(&path)], &PathParams::new(1))
            .await;

        assert!(report.is_success());
        assert_eq!(read_json(&path).await, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_export_abis() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("app/abis");
        let second = dir.path().join("backend/abis");
        let exporter = ArtifactExporter::new();

        let abis = [
            AbiArtifact::new("registrar", json!([{"type": "function", "name": "register"}])),
            AbiArtifact::new("registry", json!([])),
        ];

        let report = exporter
            .export_abis(&abis, &[first.clone(), second.clone()], 97)
            .await;

        assert!(report.is_success());
        assert_eq!(report.len(), 4);
        assert_eq!(
            read_json(&first.join("97/registrar.json")).await,
            json!([{"type": "function", "name": "register"}])
        );
        assert_eq!(read_json(&second.join("97/registry.json")).await, json!([]));
    }

    #[tokio::test]
    async fn test_abis_replace_previous_file() {
        let dir = tempdir().unwrap();
        let abi_dir = dir.path().join("abis");
        fs::create_dir_all(abi_dir.join("1")).await.unwrap();
        fs::write(abi_dir.join("1/registrar.json"), r#"[{"old": true}]"#)
            .await
            .unwrap();

        let exporter = ArtifactExporter::new();
        exporter
            .export_abis(&[AbiArtifact::new("registrar", json!([]))], &[abi_dir.clone()], 1)
            .await;

        assert_eq!(read_json(&abi_dir.join("1/registrar.json")).await, json!([]));
    }

    #[tokio::test]
    async fn test_load_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let exporter = ArtifactExporter::new();

        assert!(exporter.load_document(&path).await.unwrap().is_none());

        fs::write(&path, r#"{"a": 1}"#).await.unwrap();
        let doc = exporter.load_document(&path).await.unwrap().unwrap();
        assert_eq!(doc.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ExporterConfig = serde_json::from_str(r#"{"corruptPolicy": "fail"}"#).unwrap();
        assert_eq!(config.corrupt_policy, CorruptDocumentPolicy::Fail);
        assert!(config.atomic_writes);
    }
}
