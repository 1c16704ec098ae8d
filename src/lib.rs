//! depstage - Maven feature-set dependency staging
//!
//! A distribution build collects the files of many modules into one directory
//! tree before packaging it. Modules are grouped into *feature sets*:
//! aggregator artifacts whose own dependencies are the real payload. depstage
//! resolves those dependencies from a Maven repository and materialises them in
//! a stage directory, copying library artifacts and unpacking archive
//! artifacts.
//!
//! # Architecture Overview
//!
//! A run is a straight pipeline:
//!
//! 1. [`config`] loads `depstage.toml`, applies `-D` overrides and validates
//!    every exclusion, entry pattern and name mapping up front
//! 2. [`project`] reads the project `pom.xml` into a [`project::ProjectModel`]
//! 3. [`resolver`] expands feature sets, filters by scope and resolves every
//!    artifact in one batch through a [`repository::RepositoryService`]
//! 4. [`stager`] decides copy, unpack or skip for each artifact and performs
//!    it, extracting archives through an [`archive::ArchiveService`]
//!
//! # Core Modules
//!
//! ## Pipeline
//! - [`config`] - configuration file, overrides and validation
//! - [`project`] - project model and compile-scope closure
//! - [`resolver`] - feature-set expansion and batched resolution
//! - [`stager`] - per-dependency staging actions and their execution
//!
//! ## Matching and naming
//! - [`coordinate`] - artifact coordinates, declarations and resolved files
//! - [`exclusion`] - positional `groupId:artifactId:version` exclusions
//! - [`filter`] - scope and type filters
//! - [`mapping`] - destination name overrides
//! - [`pattern`] - include/exclude selection of archive entries
//!
//! ## Collaborators
//! - [`repository`] - Maven repository layout, POM reading and downloads
//! - [`archive`] - zip and tar extraction
//!
//! ## Supporting Modules
//! - [`cli`] - command-line interface
//! - [`constants`] - file names and defaults
//! - [`core`] - error types and user-facing error rendering
//! - [`utils`] - file system and path helpers
//!
//! # Configuration (depstage.toml)
//!
//! ```toml
//! [stage]
//! featureset-groupids = ["org.glassfish.main.featuresets"]
//! copy-types = "jar,war,rar"
//! unpack-types = "zip"
//! unpack-excludes = ["org.glassfish.main.admingui:console-plugins"]
//! mappings = [{ artifact-id = "nucleus-web", name = "nucleus" }]
//!
//! [repository]
//! local = "~/.m2/repository"
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! depstage stage                       # resolve and stage
//! depstage plan --format json          # show the actions without writing
//! depstage -D copyTypes=jar check      # validate configuration only
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coordinate;
pub mod core;
pub mod exclusion;
pub mod filter;
pub mod mapping;
pub mod pattern;
pub mod project;
pub mod repository;
pub mod resolver;
pub mod stager;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
