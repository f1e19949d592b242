//! Writes an [`ApiTree`] under the dist directory
//!
//! Layout:
//! ```text
//! <dist>/mods.json
//! <dist>/stats.json
//! <dist>/modrinth/<modrinth_id>.json
//! <dist>/modrinth/index.json
//! <dist>/curseforge/<curseforge_id>.json
//! <dist>/curseforge/index.json
//! ```
//! Platform directories are recreated on every run so documents of
//! removed records do not linger. Every file name is checked before
//! anything is deleted.

use crate::derive::{ApiTree, PlatformTree};
use bmt_common::integrity::Platform;
use bmt_common::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const INDEX_FILE: &str = "index.json";

/// Counts reported after a successful write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub mods: usize,
    pub modrinth: usize,
    pub curseforge: usize,
    pub files: usize,
}

pub fn write_tree(tree: &ApiTree, dist_dir: &Path) -> Result<WriteSummary> {
    for platform in &tree.platforms {
        check_file_names(platform)?;
    }

    fs::create_dir_all(dist_dir)?;
    let mut summary = WriteSummary {
        mods: tree.stats.total_mods,
        ..WriteSummary::default()
    };

    write_json(&dist_dir.join("mods.json"), &tree.mods)?;
    write_json(&dist_dir.join("stats.json"), &tree.stats)?;
    summary.files += 2;

    for platform in &tree.platforms {
        let dir = dist_dir.join(platform.directory());
        if dir.exists() {
            debug!(dir = %dir.display(), "Removing previous platform documents");
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        for (key, document) in &platform.documents {
            write_json(&dir.join(format!("{}.json", key)), document)?;
        }
        write_json(&dir.join(INDEX_FILE), &platform.index)?;
        summary.files += platform.documents.len() + 1;

        match platform.platform {
            Platform::Modrinth => summary.modrinth = platform.documents.len(),
            Platform::Curseforge => summary.curseforge = platform.documents.len(),
        }
    }

    info!(
        dist = %dist_dir.display(),
        files = summary.files,
        "{} mods, {} Modrinth, {} CurseForge",
        summary.mods,
        summary.modrinth,
        summary.curseforge
    );
    Ok(summary)
}

/// Identifiers become file names; refuse any that could leave the directory
fn check_file_names(platform: &PlatformTree) -> Result<()> {
    for (key, document) in &platform.documents {
        let stem = key.to_string();
        let unsafe_name = stem.is_empty()
            || stem.contains('/')
            || stem.contains('\\')
            || stem.contains("..")
            || format!("{}.json", stem) == INDEX_FILE;
        if unsafe_name {
            return Err(Error::InvalidInput(format!(
                "{} ID \"{}\" of [{}] cannot be used as a file name",
                platform.platform.label(),
                stem,
                document.name
            )));
        }
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}
