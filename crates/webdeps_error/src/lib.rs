mod build_error;
mod install_error;

pub use crate::{
  build_error::{BuildError, BuildResult},
  install_error::{InstallError, UnresolvedImportHint},
};
