pub mod bundle_options;
pub mod install_options;
pub mod normalized_install_options;
