//! Classify command implementation for the tagwise CLI.

use std::io::{self, BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tagwise_core::{ElementType, FeatureDb, Match, MatchGroup, MatchSummary, OsmElement};
use tagwise_loader::{load_definitions_file, load_into, register_fallbacks};

use crate::{
    ARG_BEST, ARG_ELEMENTS, ARG_FEATURES, ARG_NO_FALLBACKS, CliError, ENV_ELEMENTS, ENV_FEATURES,
};

/// CLI arguments for the `classify` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Match a JSON array of OpenStreetMap elements against a JSON \
                 array of feature definitions and print, for every element, \
                 its matches ranked by precision together with the derived \
                 prominence and specificity. Paths can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Describe map elements using feature definitions"
)]
#[ortho_config(prefix = "TAGWISE")]
pub(crate) struct ClassifyArgs {
    /// Path to a JSON array of feature definitions.
    #[arg(long = ARG_FEATURES, value_name = "path")]
    #[serde(default)]
    pub(crate) features: Option<Utf8PathBuf>,
    /// Path to a JSON array of elements.
    #[arg(long = ARG_ELEMENTS, value_name = "path")]
    #[serde(default)]
    pub(crate) elements: Option<Utf8PathBuf>,
    /// Report only the most precise match for each element.
    #[arg(long = ARG_BEST)]
    #[serde(default)]
    pub(crate) best: bool,
    /// Do not register the built-in catch-all features.
    #[arg(long = ARG_NO_FALLBACKS)]
    #[serde(default)]
    pub(crate) no_fallbacks: bool,
}

impl ClassifyArgs {
    pub(crate) fn into_config(self) -> Result<ClassifyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ClassifyConfig::try_from(merged)
    }
}

/// Resolved `classify` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassifyConfig {
    /// Feature definitions file.
    pub(crate) features: Utf8PathBuf,
    /// Elements file.
    pub(crate) elements: Utf8PathBuf,
    /// Keep only the best match per element.
    pub(crate) best_only: bool,
    /// Register the built-in catch-all features after the definitions.
    pub(crate) fallbacks: bool,
}

impl ClassifyConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.features, ARG_FEATURES)?;
        Self::require_existing(&self.elements, ARG_ELEMENTS)?;
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Build the registry described by this configuration.
    ///
    /// Definitions load first so their names take precedence over the
    /// built-in fallbacks.
    pub(crate) fn build_registry(&self) -> Result<FeatureDb, CliError> {
        let mut db = FeatureDb::new();
        let definitions = load_definitions_file(&self.features)?;
        load_into(&mut db, definitions)?;
        if self.fallbacks {
            register_fallbacks(&mut db)?;
        }
        Ok(db)
    }
}

impl TryFrom<ClassifyArgs> for ClassifyConfig {
    type Error = CliError;

    fn try_from(args: ClassifyArgs) -> Result<Self, Self::Error> {
        let features = args.features.ok_or(CliError::MissingArgument {
            field: ARG_FEATURES,
            env: ENV_FEATURES,
        })?;
        let elements = args.elements.ok_or(CliError::MissingArgument {
            field: ARG_ELEMENTS,
            env: ENV_ELEMENTS,
        })?;
        Ok(Self {
            features,
            elements,
            best_only: args.best,
            fallbacks: !args.no_fallbacks,
        })
    }
}

/// Classification of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ElementReport {
    /// Element identifier.
    pub(crate) id: i64,
    /// Element type.
    #[serde(rename = "type")]
    pub(crate) element_type: ElementType,
    /// Matches, most precise first.
    pub(crate) matches: Vec<MatchSummary>,
    /// Prominence of the reported matches taken together, if any matched.
    pub(crate) prominence: Option<i32>,
    /// Highest specificity among the reported matches, if any matched.
    pub(crate) specificity: Option<i32>,
}

impl ElementReport {
    fn new(element: &OsmElement, matches: Vec<Match<'_>>) -> Self {
        let group = MatchGroup::new(matches).ok();
        Self {
            id: element.id,
            element_type: element.element_type,
            prominence: group.as_ref().map(MatchGroup::prominence),
            specificity: group.as_ref().map(MatchGroup::specificity),
            matches: group.map_or_else(Vec::new, |found| {
                found.iter().map(Match::summary).collect()
            }),
        }
    }
}

/// Classify each element against `db`, in input order.
pub(crate) fn classify(
    db: &FeatureDb,
    elements: &[OsmElement],
    best_only: bool,
) -> Vec<ElementReport> {
    elements
        .iter()
        .map(|element| {
            let matches = if best_only {
                db.match_best(element).into_iter().collect()
            } else {
                db.match_element(element)
            };
            ElementReport::new(element, matches)
        })
        .collect()
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_classify_with(args, &mut stdout)
}

pub(crate) fn run_classify_with(
    args: ClassifyArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let db = config.build_registry()?;
    let elements = load_elements(&config.elements)?;
    let reports = classify(&db, &elements, config.best_only);
    write_reports(writer, &reports)
}

/// Loads a JSON-encoded array of [`OsmElement`] from disk.
pub(crate) fn load_elements(path: &Utf8Path) -> Result<Vec<OsmElement>, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenElements {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseElements {
        path: path.to_path_buf(),
        source,
    })
}

fn write_reports(writer: &mut dyn Write, reports: &[ElementReport]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(reports).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}

fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(file_name).map(|meta| meta.is_file())
}
