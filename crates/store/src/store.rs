use refig_codec::ImageFormat;
use refig_record::ProvenanceRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Result, StoreError};

pub const DEFAULT_ROOT: &str = "figures";
const LATEST_DIR: &str = "latest";
const HISTORY_DIR: &str = "history";
const TIMESTAMP_TOKEN: &str = "%Y%m%dT%H%M%S";
const SHORT_HASH_LEN: usize = 7;

/// Where one save landed.
#[derive(Debug, Clone)]
pub struct SaveResult {
    pub latest_path: PathBuf,
    pub history_path: PathBuf,
    pub record: ProvenanceRecord,
}

/// The versioned figure store.
///
/// Owns the layout under its root exclusively:
///
/// ```text
/// <root>/latest/<name>.<ext>              overwritten atomically
/// <root>/history/<name>/_<ts>[-<hash>].<ext>   write-once, one per save
/// ```
///
/// Lexicographic filename order inside a figure's history directory is
/// chronological save order; external tooling relies on that.
pub struct FigureStore {
    root: PathBuf,
}

impl Default for FigureStore {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl FigureStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Embed `record` into `payload` and persist both the latest copy
    /// and a fresh history copy. The payload is encoded once; both
    /// destinations receive identical bytes.
    pub async fn save(
        &self,
        name: &str,
        payload: &[u8],
        record: &ProvenanceRecord,
    ) -> Result<SaveResult> {
        let (stem, format) = split_figure_name(name)?;

        // Content is authoritative: a PNG byte stream saved under a
        // .svg name is a caller bug, not a reason to trust the name.
        match ImageFormat::sniff(payload) {
            Some(sniffed) if sniffed == format => {}
            _ => return Err(refig_codec::CodecError::UnsupportedFormat.into()),
        }

        let encoded = refig_codec::embed(payload, record)?;
        let file_name = format!("{stem}.{ext}", ext = format.extension());

        let latest_dir = self.root.join(LATEST_DIR);
        fs::create_dir_all(&latest_dir)
            .await
            .map_err(|err| StoreError::io(&latest_dir, err))?;
        let latest_path = latest_dir.join(&file_name);
        write_atomic(&latest_path, &encoded).await?;

        let history_dir = self.root.join(HISTORY_DIR).join(&stem);
        fs::create_dir_all(&history_dir)
            .await
            .map_err(|err| StoreError::io(&history_dir, err))?;
        let history_path =
            reserve_history_path(&history_dir, record, format.extension()).await?;
        write_atomic(&history_path, &encoded).await?;

        log::info!(
            "saved figure '{stem}' -> {} (+ history {})",
            latest_path.display(),
            history_path.display()
        );

        Ok(SaveResult {
            latest_path,
            history_path,
            record: record.clone(),
        })
    }
}

/// Split `name` into its stem and target format. Only the file-name
/// component matters; callers never control directory placement.
pub(crate) fn split_figure_name(name: &str) -> Result<(String, ImageFormat)> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StoreError::InvalidFigureName(name.to_string()))?;
    let (stem, ext) = file_name
        .rsplit_once('.')
        .ok_or_else(|| StoreError::UnsupportedExtension(name.to_string()))?;
    if stem.is_empty() {
        return Err(StoreError::InvalidFigureName(name.to_string()));
    }
    let format = ImageFormat::from_extension(ext)
        .ok_or_else(|| StoreError::UnsupportedExtension(name.to_string()))?;
    Ok((stem.to_string(), format))
}

/// History file name stem for one save: `_<timestamp>[-<short hash>]`.
///
/// The timestamp token is fixed-width, so lexicographic order across
/// seconds equals chronological order. An absent commit is spelled by
/// omission, never by a sentinel.
fn history_stem(record: &ProvenanceRecord) -> String {
    let token = record.created_at.format(TIMESTAMP_TOKEN);
    match short_hash(record.git_commit.as_deref()) {
        Some(hash) => format!("_{token}-{hash}"),
        None => format!("_{token}"),
    }
}

fn short_hash(commit: Option<&str>) -> Option<String> {
    let trimmed = commit?.trim();
    let safe: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(SHORT_HASH_LEN)
        .collect();
    if safe.is_empty() {
        return None;
    }
    Some(safe)
}

/// Claim a unique history path with `O_EXCL`, so no save can ever
/// overwrite another one, in-process or across processes.
///
/// On a timestamp+commit collision the name grows a zero-padded
/// counter appended straight after the stem; digits sort after the
/// `.` of the uncounted name, so base, 01, 02, … stay in save order.
async fn reserve_history_path(
    dir: &Path,
    record: &ProvenanceRecord,
    ext: &str,
) -> Result<PathBuf> {
    let stem = history_stem(record);
    let mut attempt: u32 = 0;
    loop {
        let file_name = if attempt == 0 {
            format!("{stem}.{ext}")
        } else {
            format!("{stem}{attempt:02}.{ext}")
        };
        let path = dir.join(file_name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => return Ok(path),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                attempt += 1;
            }
            Err(err) => return Err(StoreError::io(path, err)),
        }
    }
}

/// Write through a tmp sibling and rename into place. A concurrent
/// reader sees either the previous content or the new content, never
/// a partial file.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StoreError::io(path, ErrorKind::InvalidInput.into()))?;
    let tmp = path.with_file_name(format!(".{file_name}.tmp.{}", std::process::id()));
    fs::write(&tmp, bytes)
        .await
        .map_err(|err| StoreError::io(&tmp, err))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|err| StoreError::io(path, err))?;
    Ok(())
}
