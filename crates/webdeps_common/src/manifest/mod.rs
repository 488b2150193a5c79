pub mod package_manifest;
pub mod project_manifest;
