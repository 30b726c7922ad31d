//! Reading definitions into a registry and writing them back out.

use std::io::{self, Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::{debug, warn};
use tagwise_core::{Feature, FeatureDb, FeatureKind};

use crate::{FeatureDefinition, LoadError};

/// Parse a JSON array of feature definitions.
///
/// # Errors
/// Returns [`LoadError::Parse`] when `json` is not a valid definition
/// array.
///
/// # Examples
/// ```
/// use tagwise_loader::load_definitions;
///
/// # fn main() -> Result<(), tagwise_loader::LoadError> {
/// let definitions = load_definitions(r#"[{ "name": "cafe", "tags": "amenity=cafe" }]"#)?;
/// assert_eq!(definitions.len(), 1);
/// assert_eq!(definitions[0].tags, ["amenity=cafe"]);
/// # Ok(())
/// # }
/// ```
pub fn load_definitions(json: &str) -> Result<Vec<FeatureDefinition>, LoadError> {
    serde_json::from_str(json).map_err(|source| LoadError::Parse { source })
}

/// Read and parse a definition file.
///
/// # Errors
/// Returns [`LoadError::Read`] when the file cannot be read and
/// [`LoadError::Parse`] when its contents are not a definition array.
pub fn load_definitions_file(path: &Utf8Path) -> Result<Vec<FeatureDefinition>, LoadError> {
    let read_error = |source: io::Error| LoadError::Read {
        source,
        path: path.to_path_buf(),
    };
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(read_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(read_error)?;
    let definitions = load_definitions(&contents)?;
    debug!("read {} feature definitions from {path}", definitions.len());
    Ok(definitions)
}

/// Register `definitions` into `db`, returning how many were registered.
///
/// Memberships are wired after every definition is registered, so entries
/// may appear in any order. A category that is named by a definition but
/// never defined itself is created with default settings.
///
/// Loading is all-or-nothing: on error `db` is left exactly as it was.
///
/// # Errors
/// Returns the first definition or registration error encountered.
pub fn load_into<I>(db: &mut FeatureDb, definitions: I) -> Result<usize, LoadError>
where
    I: IntoIterator<Item = FeatureDefinition>,
{
    let mut staged = db.clone();
    let mut memberships: Vec<(String, String)> = Vec::new();
    let mut registered = 0_usize;
    for definition in definitions {
        let feature = definition.to_feature()?;
        memberships.extend(
            definition
                .categories
                .iter()
                .map(|category| (category.clone(), definition.name.clone())),
        );
        memberships.extend(
            definition
                .members
                .iter()
                .map(|member| (definition.name.clone(), member.clone())),
        );
        staged.register(feature)?;
        registered += 1;
    }
    for (category, member) in memberships {
        link_member(&mut staged, &category, member)?;
    }
    *db = staged;
    debug!("loaded {registered} feature definitions");
    Ok(registered)
}

fn link_member(db: &mut FeatureDb, category: &str, member: String) -> Result<(), LoadError> {
    if !db.contains(category) {
        warn!("category '{category}' is referenced by '{member}' but not defined; creating it");
        let mut definition = FeatureDefinition::new(category);
        definition.kind = FeatureKind::Category;
        db.register(definition.to_feature()?)?;
    }
    let linked = db
        .get(category)
        .and_then(Feature::as_category)
        .is_some_and(|found| found.members().contains(&member));
    if !linked {
        db.register_member(category, member)?;
    }
    Ok(())
}

/// Describe every registered feature, in registration order.
#[must_use]
pub fn dump_definitions(db: &FeatureDb) -> Vec<FeatureDefinition> {
    db.iter().map(FeatureDefinition::from_feature).collect()
}

/// Write the registry's definitions to `path` as pretty-printed JSON.
///
/// The parent directory must already exist; an existing file is replaced.
///
/// # Errors
/// Returns [`LoadError::Serialize`] if encoding fails and
/// [`LoadError::Write`] if the file cannot be written.
pub fn dump_definitions_file(db: &FeatureDb, path: &Utf8Path) -> Result<(), LoadError> {
    let write_error = |source: io::Error| LoadError::Write {
        source,
        path: path.to_path_buf(),
    };
    let encoded = serde_json::to_vec_pretty(&dump_definitions(db))
        .map_err(|source| LoadError::Serialize { source })?;
    let (dir, file_name) = open_parent(path).map_err(write_error)?;
    let mut file = dir.create(file_name.as_str()).map_err(write_error)?;
    file.write_all(&encoded).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    debug!("wrote {} feature definitions to {path}", db.len());
    Ok(())
}

fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(&parent, ambient_authority())?;
    Ok((dir, file_name))
}
