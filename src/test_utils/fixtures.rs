//! On-disk fixtures: local Maven repositories, POM files and archives.

use crate::coordinate::ArtifactCoordinate;
use crate::repository::layout;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a zip archive holding `entries` as `(path, content)` pairs.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create archive parent");
    }
    let file = File::create(path).expect("create zip file");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, content) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(content.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip");
}

/// Writes a gzip-compressed tar archive holding `entries`.
pub fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create archive parent");
    }
    let file = File::create(path).expect("create tar.gz file");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes()).expect("append tar entry");
    }

    builder.into_inner().expect("finish tar").finish().expect("finish gzip");
}

/// One `<dependency>` of a [`PomFixture`].
#[derive(Debug, Clone)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub type_name: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
}

impl PomDependency {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: Some(version.to_string()),
            type_name: None,
            classifier: None,
            scope: None,
            optional: false,
        }
    }

    /// A dependency without `<version>`, left to dependency management.
    pub fn managed(group_id: &str, artifact_id: &str) -> Self {
        Self {
            version: None,
            ..Self::new(group_id, artifact_id, "")
        }
    }

    pub fn with_type(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn write_xml(&self, xml: &mut String, indent: &str) {
        let _ = writeln!(xml, "{indent}<dependency>");
        let _ = writeln!(xml, "{indent}  <groupId>{}</groupId>", self.group_id);
        let _ = writeln!(xml, "{indent}  <artifactId>{}</artifactId>", self.artifact_id);
        let optional = self.optional.then(|| "true".to_string());
        for (tag, value) in [
            ("version", &self.version),
            ("type", &self.type_name),
            ("classifier", &self.classifier),
            ("scope", &self.scope),
            ("optional", &optional),
        ] {
            if let Some(value) = value {
                let _ = writeln!(xml, "{indent}  <{tag}>{value}</{tag}>");
            }
        }
        let _ = writeln!(xml, "{indent}</dependency>");
    }
}

/// Builder for POM XML.
#[derive(Debug, Clone)]
pub struct PomFixture {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: Option<String>,
    pub parent: Option<(String, String, String)>,
    pub properties: Vec<(String, String)>,
    pub managed: Vec<PomDependency>,
    pub dependencies: Vec<PomDependency>,
}

impl PomFixture {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            packaging: None,
            parent: None,
            properties: Vec::new(),
            managed: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    pub fn parent(mut self, group_id: &str, artifact_id: &str, version: &str) -> Self {
        self.parent = Some((group_id.to_string(), artifact_id.to_string(), version.to_string()));
        self
    }

    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }

    pub fn managed(mut self, dependency: PomDependency) -> Self {
        self.managed.push(dependency);
        self
    }

    pub fn dependency(mut self, dependency: PomDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Coordinate of this POM file.
    pub fn coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate::new(&self.group_id, &self.artifact_id, &self.version).with_extension("pom")
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <modelVersion>4.0.0</modelVersion>\n",
        );
        if let Some((group_id, artifact_id, version)) = &self.parent {
            let _ = writeln!(
                xml,
                "  <parent>\n    <groupId>{group_id}</groupId>\n    <artifactId>{artifact_id}</artifactId>\n    <version>{version}</version>\n  </parent>"
            );
        }
        let _ = writeln!(xml, "  <groupId>{}</groupId>", self.group_id);
        let _ = writeln!(xml, "  <artifactId>{}</artifactId>", self.artifact_id);
        let _ = writeln!(xml, "  <version>{}</version>", self.version);
        if let Some(packaging) = &self.packaging {
            let _ = writeln!(xml, "  <packaging>{packaging}</packaging>");
        }
        if !self.properties.is_empty() {
            xml.push_str("  <properties>\n");
            for (name, value) in &self.properties {
                let _ = writeln!(xml, "    <{name}>{value}</{name}>");
            }
            xml.push_str("  </properties>\n");
        }
        if !self.managed.is_empty() {
            xml.push_str("  <dependencyManagement>\n    <dependencies>\n");
            for dependency in &self.managed {
                dependency.write_xml(&mut xml, "      ");
            }
            xml.push_str("    </dependencies>\n  </dependencyManagement>\n");
        }
        if !self.dependencies.is_empty() {
            xml.push_str("  <dependencies>\n");
            for dependency in &self.dependencies {
                dependency.write_xml(&mut xml, "    ");
            }
            xml.push_str("  </dependencies>\n");
        }
        xml.push_str("</project>\n");
        xml
    }

    /// Writes the POM to `dir/pom.xml` and returns its path.
    pub fn write_project(&self, dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create project directory");
        let path = dir.join("pom.xml");
        std::fs::write(&path, self.to_xml()).expect("write project pom");
        path
    }
}

/// Populates a local Maven repository directory.
#[derive(Debug, Clone)]
pub struct LocalRepositoryBuilder {
    root: PathBuf,
}

impl LocalRepositoryBuilder {
    pub fn new(root: &Path) -> Self {
        std::fs::create_dir_all(root).expect("create repository root");
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.root.clone()
    }

    /// Path of `artifact` inside this repository.
    pub fn path_of(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        self.root.join(layout::relative_path(artifact))
    }

    /// Writes an artifact file with `content`.
    pub fn artifact(self, group_id: &str, artifact_id: &str, version: &str, extension: &str, content: &str) -> Self {
        let coordinate = ArtifactCoordinate::new(group_id, artifact_id, version).with_extension(extension);
        self.file(&coordinate, content.as_bytes())
    }

    /// Writes a zip artifact holding `entries`.
    pub fn zip_artifact(self, group_id: &str, artifact_id: &str, version: &str, entries: &[(&str, &str)]) -> Self {
        let coordinate = ArtifactCoordinate::new(group_id, artifact_id, version).with_extension("zip");
        write_zip(&self.path_of(&coordinate), entries);
        self
    }

    /// Writes raw POM XML for `group_id:artifact_id:version`.
    pub fn pom(self, group_id: &str, artifact_id: &str, version: &str, xml: &str) -> Self {
        let coordinate = ArtifactCoordinate::new(group_id, artifact_id, version).with_extension("pom");
        self.file(&coordinate, xml.as_bytes())
    }

    pub fn pom_fixture(self, pom: &PomFixture) -> Self {
        let coordinate = pom.coordinate();
        self.file(&coordinate, pom.to_xml().as_bytes())
    }

    pub fn file(self, artifact: &ArtifactCoordinate, content: &[u8]) -> Self {
        let path = self.path_of(artifact);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create artifact directory");
        }
        std::fs::write(&path, content).expect("write artifact");
        self
    }
}
