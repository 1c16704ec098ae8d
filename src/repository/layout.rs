//! Maven repository layout and packaging type handlers.
//!
//! A declared dependency names a packaging `type`; the file that type maps to
//! has an extension and sometimes an implied classifier (`test-jar` is the
//! `jar` with classifier `tests`). Files live at
//! `<group as path>/<artifactId>/<version>/<artifactId>-<version>[-<classifier>].<extension>`.

use crate::coordinate::ArtifactCoordinate;
use std::path::PathBuf;

/// Extension and implied classifier of a packaging type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeHandler {
    pub extension: &'static str,
    pub classifier: &'static str,
}

const HANDLERS: &[(&str, TypeHandler)] = &[
    ("jar", TypeHandler { extension: "jar", classifier: "" }),
    ("war", TypeHandler { extension: "war", classifier: "" }),
    ("ear", TypeHandler { extension: "ear", classifier: "" }),
    ("rar", TypeHandler { extension: "rar", classifier: "" }),
    ("zip", TypeHandler { extension: "zip", classifier: "" }),
    ("pom", TypeHandler { extension: "pom", classifier: "" }),
    ("test-jar", TypeHandler { extension: "jar", classifier: "tests" }),
    ("ejb", TypeHandler { extension: "jar", classifier: "" }),
    ("ejb-client", TypeHandler { extension: "jar", classifier: "client" }),
    ("maven-plugin", TypeHandler { extension: "jar", classifier: "" }),
    ("java-source", TypeHandler { extension: "jar", classifier: "sources" }),
    ("javadoc", TypeHandler { extension: "jar", classifier: "javadoc" }),
    ("bundle", TypeHandler { extension: "jar", classifier: "" }),
    ("hk2-jar", TypeHandler { extension: "jar", classifier: "" }),
    ("glassfish-jar", TypeHandler { extension: "jar", classifier: "" }),
    ("distribution-fragment", TypeHandler { extension: "zip", classifier: "" }),
];

/// Maps a packaging type to its extension and implied classifier.
///
/// Unknown types are their own extension.
pub fn type_handler(type_name: &str) -> (String, String) {
    HANDLERS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map_or_else(
            || (type_name.to_string(), String::new()),
            |(_, handler)| (handler.extension.to_string(), handler.classifier.to_string()),
        )
}

/// Builds the coordinate of a dependency declared with `type_name`.
///
/// An explicit `classifier` wins over the classifier implied by the type.
pub fn coordinate_for_type(
    group_id: &str,
    artifact_id: &str,
    version: &str,
    type_name: &str,
    classifier: Option<&str>,
) -> ArtifactCoordinate {
    let (extension, implied) = type_handler(type_name);
    let classifier = classifier.filter(|c| !c.is_empty()).map_or(implied, ToString::to_string);
    ArtifactCoordinate::new(group_id, artifact_id, version)
        .with_extension(extension)
        .with_classifier(classifier)
}

/// File name of an artifact in the repository.
pub fn file_name(artifact: &ArtifactCoordinate) -> String {
    if artifact.classifier.is_empty() {
        format!("{}-{}.{}", artifact.artifact_id, artifact.version, artifact.extension)
    } else {
        format!(
            "{}-{}-{}.{}",
            artifact.artifact_id, artifact.version, artifact.classifier, artifact.extension
        )
    }
}

/// Repository-relative path segments of an artifact.
fn segments(artifact: &ArtifactCoordinate) -> Vec<String> {
    let mut segments: Vec<String> = artifact.group_id.split('.').map(ToString::to_string).collect();
    segments.push(artifact.artifact_id.clone());
    segments.push(artifact.version.clone());
    segments.push(file_name(artifact));
    segments
}

/// Path of an artifact relative to a repository root.
pub fn relative_path(artifact: &ArtifactCoordinate) -> PathBuf {
    segments(artifact).iter().collect()
}

/// URL path of an artifact relative to a remote repository base URL.
pub fn url_path(artifact: &ArtifactCoordinate) -> String {
    segments(artifact).join("/")
}
