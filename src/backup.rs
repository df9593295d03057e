// Backup workflow: the orchestrator that glues the image source and the
// remote store together. It takes a validated config plus the two trait
// objects, processes sub-breeds strictly one at a time, and returns an
// explicit report instead of mutating ambient session state. Interactive
// prompting lives in `ui`, never here.

use anyhow::{Context, Result};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::ImageSource;
use crate::disk::RemoteStore;

/// Remote root folder all breed folders live under.
const BASE_FOLDER: &str = "/dogs";

/// Default manifest file name, written into the working directory.
pub const MANIFEST_FILE: &str = "uploaded_images.json";

/// Validated run configuration. Built once from operator input (or by a
/// test) and immutable afterwards.
pub struct BackupConfig {
    pub breed: String,
    pub manifest_path: PathBuf,
}

impl BackupConfig {
    pub fn new(breed: &str) -> Self {
        BackupConfig {
            breed: breed.trim().to_lowercase(),
            manifest_path: PathBuf::from(MANIFEST_FILE),
        }
    }
}

/// One manifest entry: the derived file name and whether the file was
/// already present remotely. Never mutated after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub file_name: String,
    pub skipped: bool,
}

/// Outcome of a whole run. `records` is in sub-breed resolution order.
/// An entry that fails mid-flight (image lookup, download or transfer)
/// produces no record; it is only visible through `failed`.
#[derive(Debug, Default)]
pub struct BackupReport {
    pub records: Vec<UploadRecord>,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// File name for an entry: the sub-breed (or the breed itself) glued to
/// the last path segment of the source URL. Uniqueness is whatever the
/// image CDN's file naming gives us.
pub fn image_file_name(entry_name: &str, image_url: &str) -> String {
    let last_segment = image_url.rsplit('/').next().unwrap_or(image_url);
    format!("{}_{}", entry_name, last_segment)
}

/// Run the backup end to end: ensure the remote folders, resolve the
/// sub-breeds, mirror one image per entry, write the manifest. Folder
/// creation failing is the one fatal condition; everything after it
/// degrades per entry.
pub fn run_backup(
    cfg: &BackupConfig,
    source: &dyn ImageSource,
    store: &dyn RemoteStore,
) -> Result<BackupReport> {
    let breed_folder = format!("{}/{}", BASE_FOLDER, cfg.breed);
    store
        .ensure_folder(BASE_FOLDER)
        .context("Не удалось создать папку на Яндекс.Диске")?;
    store
        .ensure_folder(&breed_folder)
        .context("Не удалось создать папку на Яндекс.Диске")?;

    let sub_breeds = match source.sub_breeds(&cfg.breed) {
        Ok(subs) => subs,
        Err(e) => {
            error!("Не удалось получить под-породы: {:#}", e);
            Vec::new()
        }
    };
    // No sub-breeds means the breed itself is the single entry.
    let entries: Vec<Option<String>> = if sub_breeds.is_empty() {
        vec![None]
    } else {
        sub_breeds.into_iter().map(Some).collect()
    };

    let mut report = BackupReport::default();
    let total = entries.len();
    for (i, sub) in entries.iter().enumerate() {
        let entry_name = sub.as_deref().unwrap_or(&cfg.breed);
        println!("[{}/{}] Обработка под-породы: {}", i + 1, total, entry_name);

        let image_url = match source.random_image_url(&cfg.breed, sub.as_deref()) {
            Ok(url) => url,
            Err(e) => {
                error!(
                    "Не удалось получить картинку для {}/{}: {:#}",
                    cfg.breed, entry_name, e
                );
                report.failed += 1;
                continue;
            }
        };
        let file_name = image_file_name(entry_name, &image_url);
        mirror_image(source, store, &breed_folder, &file_name, &image_url, &mut report)?;
    }

    write_manifest(&cfg.manifest_path, &report.records)?;
    Ok(report)
}

/// Mirror a single image: check remote existence first, then download
/// and transfer. Download and transfer failures drop the entry (logged,
/// counted as `failed`, no record).
fn mirror_image(
    source: &dyn ImageSource,
    store: &dyn RemoteStore,
    folder: &str,
    file_name: &str,
    image_url: &str,
    report: &mut BackupReport,
) -> Result<()> {
    let target_path = format!("{}/{}", folder, file_name);

    // Existence check always precedes any byte transfer.
    if store.exists(&target_path)? {
        info!("Пропущено (уже существует): {}", file_name);
        report.records.push(UploadRecord {
            file_name: file_name.to_string(),
            skipped: true,
        });
        report.skipped += 1;
        return Ok(());
    }

    let bytes = match source.fetch_bytes(image_url) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Ошибка скачивания изображения: {:#}", e);
            report.failed += 1;
            return Ok(());
        }
    };

    match store.upload(&target_path, &bytes) {
        Ok(()) => {
            info!("Загружено: {}", file_name);
            report.records.push(UploadRecord {
                file_name: file_name.to_string(),
                skipped: false,
            });
            report.uploaded += 1;
        }
        Err(e) => {
            error!("Ошибка загрузки файла: {:#}", e);
            report.failed += 1;
        }
    }
    Ok(())
}

/// Write the manifest: a pretty-printed UTF-8 JSON array, overwriting
/// any previous manifest at `path`.
pub fn write_manifest(path: &Path, records: &[UploadRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Serializing manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Writing manifest to {}", path.display()))?;
    Ok(())
}
