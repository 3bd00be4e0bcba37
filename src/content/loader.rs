//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::ContentRegistry;
use crate::core::CombatTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
pub(crate) fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse the text of a RON file containing a DataFile<T> wrapper.
pub fn parse_data_file<T>(file_name: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })?;
    Ok(data.items)
}

/// Load a RON file containing a DataFile<T> wrapper.
fn load_data_file<T>(path: &Path) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_data_file(&path.display().to_string(), &contents)
}

/// Load a single RON struct (not wrapped in DataFile).
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    ron_options()
        .from_str(&contents)
        .map_err(|e| ContentLoadError {
            file: path.display().to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load all content from `base_path` into a ContentRegistry.
/// Returns errors for every file that fails to load.
pub fn load_all_content(
    base_path: &Path,
) -> Result<(ContentRegistry, CombatTuning), Vec<ContentLoadError>> {
    let mut registry = ContentRegistry::default();
    let mut errors = Vec::new();

    match load_data_file::<EnemyDef>(&base_path.join("enemies.ron")) {
        Ok(items) => items.into_iter().for_each(|def| registry.insert_enemy(def)),
        Err(e) => errors.push(e),
    }
    match load_data_file::<BossDef>(&base_path.join("bosses.ron")) {
        Ok(items) => items.into_iter().for_each(|def| registry.insert_boss(def)),
        Err(e) => errors.push(e),
    }

    // Tuning is optional; a missing file means defaults, a broken one is an error.
    let tuning_path = base_path.join("combat_tuning.ron");
    let tuning = if tuning_path.exists() {
        match load_single_file::<CombatTuning>(&tuning_path) {
            Ok(tuning) => tuning,
            Err(e) => {
                errors.push(e);
                CombatTuning::default()
            }
        }
    } else {
        CombatTuning::default()
    };

    if errors.is_empty() {
        Ok((registry, tuning))
    } else {
        Err(errors)
    }
}
