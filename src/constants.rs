//! Global constants used throughout the depstage codebase.
//!
//! Default values of the staging configuration, well-known dependency scopes
//! and file names. Defining them centrally keeps the configuration defaults,
//! the CLI help and the tests in agreement.

/// Name of the configuration file looked up next to the project POM.
pub const CONFIG_FILE_NAME: &str = "depstage.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "DEPSTAGE_CONFIG";

/// Name of the project descriptor looked up in the working directory.
pub const PROJECT_FILE_NAME: &str = "pom.xml";

/// Prefix of the original build property names accepted by `-D` overrides.
pub const PROPERTY_PREFIX: &str = "gfbuild.featuresets.dependencies.";

/// Default build output directory, relative to the project base directory.
pub const DEFAULT_BUILD_DIRECTORY: &str = "target";

/// Stage directory name below the build directory.
pub const DEFAULT_STAGE_DIRECTORY_NAME: &str = "stage";

/// Extensions copied verbatim into the stage directory.
pub const DEFAULT_COPY_TYPES: &str = "jar,war,rar";

/// Extensions unpacked into a directory below the stage directory.
pub const DEFAULT_UNPACK_TYPES: &str = "zip";

/// Scopes staged by default.
pub const DEFAULT_INCLUDE_SCOPE: &str = "compile";

/// Scopes never staged by default.
pub const DEFAULT_EXCLUDE_SCOPE: &str = "test,system";

/// Local repository location, `~` is expanded at load time.
pub const DEFAULT_LOCAL_REPOSITORY: &str = "~/.m2/repository";

/// Remote repository used when none is configured.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Identifier of [`MAVEN_CENTRAL_URL`].
pub const MAVEN_CENTRAL_ID: &str = "central";

/// Upper bound on the parent POM chain walked while building a descriptor.
pub const MAX_PARENT_DEPTH: usize = 32;

/// Upper bound on nested `${...}` interpolation passes.
pub const MAX_INTERPOLATION_PASSES: usize = 10;

/// Well-known dependency scopes.
pub mod scope {
    pub const COMPILE: &str = "compile";
    pub const PROVIDED: &str = "provided";
    pub const RUNTIME: &str = "runtime";
    pub const TEST: &str = "test";
    pub const SYSTEM: &str = "system";
    pub const IMPORT: &str = "import";
}
