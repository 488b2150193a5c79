use arcstr::ArcStr;
use itertools::Itertools;
use oxc::{
  allocator::Allocator,
  parser::{ParseOptions, Parser},
  span::SourceType,
};
use webdeps_error::{BuildResult, InstallError};

use crate::ecma_ast::{
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
  EcmaAst,
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Parses `source` as an ES module first and falls back to a script with top-level `return` allowed, which is
  /// what a CommonJS wrapper function body accepts.
  pub fn parse(module: &str, source: impl Into<ArcStr>) -> BuildResult<EcmaAst> {
    let allocator = Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let mut source_type = SourceType::default().with_module(true);
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.errors.is_empty() && !ret.panicked {
        return Ok(ProgramCellDependent { program: ret.program });
      }
      let module_errors = ret.errors.iter().map(ToString::to_string).join("; ");

      source_type = SourceType::default().with_script(true);
      let ret = Parser::new(&owner.allocator, &owner.source, source_type)
        .with_options(ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() })
        .parse();
      if ret.errors.is_empty() && !ret.panicked {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(InstallError::ParseError { module: module.to_string(), message: module_errors })
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }
}

#[cfg(test)]
mod tests {
  use webdeps_error::InstallError;

  use super::EcmaCompiler;

  #[test]
  fn parses_modules() {
    let ast = EcmaCompiler::parse("a.mjs", "export const a = 1;").unwrap();
    assert!(ast.is_module());
    assert_eq!(ast.program().body.len(), 1);
  }

  #[test]
  fn falls_back_to_script() {
    let ast = EcmaCompiler::parse("legacy.js", "if (typeof window === 'undefined') return;\nwith (a) {}")
      .unwrap();
    assert!(!ast.is_module());
  }

  #[test]
  fn reports_parse_errors() {
    let err = EcmaCompiler::parse("broken.js", "const = ;").unwrap_err();
    assert!(matches!(err.find::<InstallError>(), Some(InstallError::ParseError { module, .. }) if module == "broken.js"));
  }
}
