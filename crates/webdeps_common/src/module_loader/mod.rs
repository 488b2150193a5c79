pub mod runtime_module_brief;
pub mod task_result;

use self::task_result::NormalModuleTaskResult;

pub enum ModuleLoaderMsg {
  NormalModuleDone(Box<NormalModuleTaskResult>),
  BuildErrors(Vec<anyhow::Error>),
}
