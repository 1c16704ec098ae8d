//! POM parsing and effective model building.
//!
//! [`RawPom`] is a POM file as written: no inheritance, no interpolation.
//! [`EffectivePom::build`] folds a parent chain into the values a dependency
//! descriptor needs:
//!
//! - `groupId` and `version` inherited from the parent when omitted
//! - `<properties>` merged from the root ancestor down, children winning
//! - `<dependencyManagement>` and `<dependencies>` merged the same way
//! - `${...}` references interpolated against the merged properties and the
//!   `project.*` built-ins
//! - missing dependency versions and scopes filled in from dependency
//!   management
//!
//! Import-scoped BOMs in dependency management are not followed.

use crate::constants::{MAX_INTERPOLATION_PASSES, scope};
use crate::coordinate::{ArtifactCoordinate, DependencyDeclaration};
use crate::core::StageError;
use crate::repository::layout::coordinate_for_type;
use regex::Regex;
use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PROPERTY_REFERENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").ok());

/// `<parent>` reference of a POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// `<relativePath>`, defaulting to `../pom.xml` when absent. An empty
    /// `<relativePath/>` is `None`: the parent is only looked up in the
    /// repository.
    pub relative_path: Option<String>,
}

impl ParentRef {
    pub fn coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate::new(&self.group_id, &self.artifact_id, &self.version).with_extension("pom")
    }
}

/// One `<dependency>` element before interpolation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub type_name: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: Option<String>,
}

impl RawDependency {
    /// Management key: `groupId:artifactId:type:classifier`.
    fn management_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.type_name.as_deref().unwrap_or("jar"),
            self.classifier.as_deref().unwrap_or("")
        )
    }
}

/// A POM file as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPom {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub managed_dependencies: Vec<RawDependency>,
    pub dependencies: Vec<RawDependency>,
    /// File the POM was read from, for error messages.
    pub source: PathBuf,
}

impl RawPom {
    /// Parses POM XML read from `source`.
    pub fn parse(content: &str, source: &Path) -> Result<Self, StageError> {
        let parse_error = |reason: String| StageError::PomParse {
            path: source.to_path_buf(),
            reason,
        };

        let doc = Document::parse(content).map_err(|e| parse_error(e.to_string()))?;
        let root = doc.root_element();
        if !root.has_tag_name("project") {
            return Err(parse_error(format!(
                "root element is <{}>, expected <project>",
                root.tag_name().name()
            )));
        }

        let parent = match child(root, "parent") {
            Some(node) => Some(ParentRef {
                group_id: required_text(node, "groupId").map_err(&parse_error)?,
                artifact_id: required_text(node, "artifactId").map_err(&parse_error)?,
                version: required_text(node, "version").map_err(&parse_error)?,
                relative_path: match child(node, "relativePath") {
                    Some(relative) => text(relative),
                    None => Some("../pom.xml".to_string()),
                },
            }),
            None => None,
        };

        let properties = child(root, "properties")
            .map(|node| {
                node.children()
                    .filter(Node::is_element)
                    .map(|p| (p.tag_name().name().to_string(), text(p).unwrap_or_default()))
                    .collect()
            })
            .unwrap_or_default();

        let managed_dependencies = child(root, "dependencyManagement")
            .and_then(|node| child(node, "dependencies"))
            .map(|node| parse_dependencies(node, &parse_error))
            .transpose()?
            .unwrap_or_default();

        let dependencies = child(root, "dependencies")
            .map(|node| parse_dependencies(node, &parse_error))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            group_id: child_text(root, "groupId"),
            artifact_id: required_text(root, "artifactId").map_err(&parse_error)?,
            version: child_text(root, "version"),
            packaging: child_text(root, "packaging"),
            parent,
            properties,
            managed_dependencies,
            dependencies,
            source: source.to_path_buf(),
        })
    }

    /// Reads and parses a POM file.
    pub fn read(path: &Path) -> Result<Self, StageError> {
        let content = std::fs::read_to_string(path).map_err(|e| StageError::PomParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }
}

fn parse_dependencies(
    node: Node<'_, '_>,
    parse_error: &impl Fn(String) -> StageError,
) -> Result<Vec<RawDependency>, StageError> {
    node.children()
        .filter(|n| n.has_tag_name("dependency"))
        .map(|dep| {
            Ok(RawDependency {
                group_id: required_text(dep, "groupId").map_err(parse_error)?,
                artifact_id: required_text(dep, "artifactId").map_err(parse_error)?,
                version: child_text(dep, "version"),
                type_name: child_text(dep, "type"),
                classifier: child_text(dep, "classifier"),
                scope: child_text(dep, "scope"),
                optional: child_text(dep, "optional"),
            })
        })
        .collect()
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn text(node: Node<'_, '_>) -> Option<String> {
    node.text().map(str::trim).filter(|t| !t.is_empty()).map(ToString::to_string)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).and_then(text)
}

fn required_text(node: Node<'_, '_>, name: &str) -> Result<String, String> {
    child_text(node, name)
        .ok_or_else(|| format!("<{}> is missing <{name}>", node.tag_name().name()))
}

/// The values of a POM after inheritance and interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePom {
    /// Coordinate of the POM's main artifact, typed by its packaging.
    pub coordinate: ArtifactCoordinate,
    pub packaging: String,
    pub dependencies: Vec<DependencyDeclaration>,
}

impl EffectivePom {
    /// Builds the effective model of `chain[0]`, where each following element
    /// is the parent of the one before.
    pub fn build(chain: &[RawPom]) -> Result<Self, StageError> {
        let Some(pom) = chain.first() else {
            return Err(StageError::config("empty POM chain"));
        };
        let pom_error = |reason: String| StageError::PomParse {
            path: pom.source.clone(),
            reason,
        };

        let group_id = pom
            .group_id
            .clone()
            .or_else(|| pom.parent.as_ref().map(|p| p.group_id.clone()))
            .ok_or_else(|| pom_error("no groupId and no parent".to_string()))?;
        let version = pom
            .version
            .clone()
            .or_else(|| pom.parent.as_ref().map(|p| p.version.clone()))
            .ok_or_else(|| pom_error("no version and no parent".to_string()))?;
        let packaging = pom.packaging.clone().unwrap_or_else(|| "jar".to_string());

        let mut properties = BTreeMap::new();
        let mut managed: BTreeMap<String, RawDependency> = BTreeMap::new();
        let mut declared: BTreeMap<String, RawDependency> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();

        for ancestor in chain.iter().rev() {
            properties.extend(ancestor.properties.clone());
            for dep in &ancestor.managed_dependencies {
                managed.insert(dep.management_key(), dep.clone());
            }
            for dep in &ancestor.dependencies {
                let key = dep.management_key();
                if declared.insert(key.clone(), dep.clone()).is_none() {
                    order.push(key);
                }
            }
        }

        properties.insert("project.groupId".to_string(), group_id.clone());
        properties.insert("project.artifactId".to_string(), pom.artifact_id.clone());
        properties.insert("project.version".to_string(), version.clone());
        properties.insert("project.packaging".to_string(), packaging.clone());
        properties.insert("pom.groupId".to_string(), group_id.clone());
        properties.insert("pom.version".to_string(), version.clone());
        if let Some(parent) = &pom.parent {
            properties.insert("project.parent.groupId".to_string(), parent.group_id.clone());
            properties.insert("project.parent.version".to_string(), parent.version.clone());
        }

        let expand = |value: &str| interpolate(value, &properties);
        let group_id = expand(&group_id);
        let version = expand(&version);
        let artifact_id = expand(&pom.artifact_id);
        let packaging = expand(&packaging);

        let managed: BTreeMap<String, RawDependency> = managed
            .into_values()
            .map(|dep| {
                let dep = interpolate_dependency(&dep, &expand);
                (dep.management_key(), dep)
            })
            .collect();

        let mut dependencies = Vec::with_capacity(order.len());
        for key in order {
            let Some(raw) = declared.get(&key) else {
                continue;
            };
            let dep = interpolate_dependency(raw, &expand);
            let management = managed.get(&dep.management_key());

            let dep_version = dep
                .version
                .clone()
                .or_else(|| management.and_then(|m| m.version.clone()))
                .ok_or_else(|| {
                    pom_error(format!("no version for dependency {}:{}", dep.group_id, dep.artifact_id))
                })?;
            if dep_version.contains("${") {
                return Err(pom_error(format!(
                    "unresolved version '{dep_version}' for dependency {}:{}",
                    dep.group_id, dep.artifact_id
                )));
            }

            let dep_scope = dep
                .scope
                .clone()
                .or_else(|| management.and_then(|m| m.scope.clone()))
                .unwrap_or_else(|| scope::COMPILE.to_string());
            let type_name = dep.type_name.clone().unwrap_or_else(|| "jar".to_string());
            let artifact = coordinate_for_type(
                &dep.group_id,
                &dep.artifact_id,
                &dep_version,
                &type_name,
                dep.classifier.as_deref(),
            );

            let mut declaration = DependencyDeclaration::new(artifact)
                .with_scope(dep_scope)
                .with_optional(dep.optional.as_deref() == Some("true"));
            declaration.type_name = type_name;
            dependencies.push(declaration);
        }

        let coordinate = coordinate_for_type(&group_id, &artifact_id, &version, &packaging, None);

        Ok(Self {
            coordinate,
            packaging,
            dependencies,
        })
    }
}

fn interpolate_dependency(dep: &RawDependency, expand: &impl Fn(&str) -> String) -> RawDependency {
    let apply = |value: &Option<String>| value.as_deref().map(expand);
    RawDependency {
        group_id: expand(&dep.group_id),
        artifact_id: expand(&dep.artifact_id),
        version: apply(&dep.version),
        type_name: apply(&dep.type_name),
        classifier: apply(&dep.classifier),
        scope: apply(&dep.scope),
        optional: apply(&dep.optional),
    }
}

/// Replaces `${name}` references with their property value.
///
/// Unknown references are left in place. Values referencing other properties
/// are expanded up to [`MAX_INTERPOLATION_PASSES`] levels deep.
pub fn interpolate(value: &str, properties: &BTreeMap<String, String>) -> String {
    let mut current = value.to_string();
    let Some(reference) = PROPERTY_REFERENCE.as_ref() else {
        return current;
    };
    for _ in 0..MAX_INTERPOLATION_PASSES {
        if !current.contains("${") {
            break;
        }
        let next = reference
            .replace_all(&current, |caps: &regex::Captures<'_>| {
                properties.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}
