use oxc::{
  ast::{
    ast::{
      self, Argument, AssignmentTarget, BindingPatternKind, Declaration, ExportDefaultDeclarationKind,
      Expression, ImportDeclarationSpecifier, ObjectPropertyKind, Statement,
    },
    visit::walk,
    Visit,
  },
  span::{GetSpan, Span},
  syntax::scope::ScopeFlags,
};
use webdeps_common::{ImportKind, ImportRecordMeta, Patch, Specifier};
use webdeps_utils::{ecmascript::to_string_literal, rstr::Rstr};

use super::AstScanner;

impl<'ast> Visit<'ast> for AstScanner<'_> {
  fn visit_program(&mut self, program: &ast::Program<'ast>) {
    if let Some(hashbang) = &program.hashbang {
      self.patches.push(Patch::Remove(hashbang.span));
    }
    for stmt in &program.body {
      self.scan_top_level_statement(stmt);
    }
  }

  fn visit_binding_identifier(&mut self, ident: &ast::BindingIdentifier<'ast>) {
    if let Some(symbol) = self.root_symbol_of(ident.symbol_id.get()) {
      self.patches.push(Patch::SymbolRef { span: ident.span, symbol, shorthand: self.in_shorthand });
    }
  }

  fn visit_identifier_reference(&mut self, ident: &ast::IdentifierReference<'ast>) {
    let Some(reference_id) = ident.reference_id.get() else {
      return;
    };
    match self.symbol_table.get_reference(reference_id).symbol_id() {
      Some(symbol_id) => {
        if let Some(symbol) = self.root_symbol_of(Some(symbol_id)) {
          self.patches.push(Patch::SymbolRef { span: ident.span, symbol, shorthand: self.in_shorthand });
        }
      }
      None if self.options.shim_builtins => self.shim_global(ident),
      None => {}
    }
  }

  fn visit_object_property(&mut self, prop: &ast::ObjectProperty<'ast>) {
    if let (true, Expression::Identifier(ident)) = (prop.shorthand, &prop.value) {
      self.in_shorthand = true;
      self.visit_identifier_reference(ident);
      self.in_shorthand = false;
      return;
    }
    walk::walk_object_property(self, prop);
  }

  fn visit_binding_property(&mut self, prop: &ast::BindingProperty<'ast>) {
    if !prop.shorthand {
      walk::walk_binding_property(self, prop);
      return;
    }
    match &prop.value.kind {
      BindingPatternKind::BindingIdentifier(ident) => {
        self.in_shorthand = true;
        self.visit_binding_identifier(ident);
        self.in_shorthand = false;
      }
      BindingPatternKind::AssignmentPattern(pattern) => {
        if let BindingPatternKind::BindingIdentifier(ident) = &pattern.left.kind {
          self.in_shorthand = true;
          self.visit_binding_identifier(ident);
          self.in_shorthand = false;
        } else {
          self.visit_binding_pattern(&pattern.left);
        }
        self.visit_expression(&pattern.right);
      }
      _ => walk::walk_binding_property(self, prop),
    }
  }

  fn visit_assignment_target_property_identifier(
    &mut self,
    prop: &ast::AssignmentTargetPropertyIdentifier<'ast>,
  ) {
    self.in_shorthand = true;
    self.visit_identifier_reference(&prop.binding);
    self.in_shorthand = false;
    if let Some(init) = &prop.init {
      self.visit_expression(init);
    }
  }

  fn visit_assignment_expression(&mut self, expr: &ast::AssignmentExpression<'ast>) {
    match &expr.left {
      AssignmentTarget::StaticMemberExpression(member) => {
        if self.is_exports_object(&member.object) {
          // exports.foo = ...
          self.add_cjs_export_name(member.property.name.as_str());
        } else if self.is_module_exports(member) {
          // module.exports = { foo, bar: ... }
          if let Expression::ObjectExpression(object) = &expr.right {
            for prop in &object.properties {
              if let ObjectPropertyKind::ObjectProperty(prop) = prop {
                if let Some(name) = prop.key.static_name().filter(|_| !prop.computed) {
                  self.add_cjs_export_name(&name);
                }
              }
            }
          }
        }
      }
      AssignmentTarget::ComputedMemberExpression(member) => {
        if let (true, Expression::StringLiteral(name)) =
          (self.is_exports_object(&member.object), &member.expression)
        {
          self.add_cjs_export_name(name.value.as_str());
        }
      }
      _ => {}
    }

    self.in_assignment_target = true;
    self.visit_assignment_target(&expr.left);
    self.in_assignment_target = false;
    self.visit_expression(&expr.right);
  }

  fn visit_static_member_expression(&mut self, expr: &ast::StaticMemberExpression<'ast>) {
    // process.env.NODE_ENV
    if let (false, "NODE_ENV", Expression::StaticMemberExpression(env)) =
      (self.in_assignment_target, expr.property.name.as_str(), &expr.object)
    {
      if env.property.name == "env" && self.is_unresolved_named(&env.object, "process") {
        let text = to_string_literal(&self.options.node_env);
        self.patches.push(Patch::Replace { span: expr.span, text: text.into() });
        return;
      }
    }
    walk::walk_static_member_expression(self, expr);
  }

  fn visit_call_expression(&mut self, expr: &ast::CallExpression<'ast>) {
    if let Expression::Identifier(callee) = &expr.callee {
      if callee.name == "require" && self.is_unresolved(callee) {
        if let (1, Some(Argument::StringLiteral(request))) = (expr.arguments.len(), expr.arguments.first()) {
          let record = self.add_import_record(
            request.value.as_str(),
            ImportKind::Require,
            expr.span,
            ImportRecordMeta::empty(),
          );
          self.patches.push(Patch::Require { span: expr.span, record });
          return;
        }
        self.warnings.push(anyhow::anyhow!(
          "{}: `require` with a non-literal argument is left as is and will throw in the browser",
          self.stable_id
        ));
      }
    }

    // Object.defineProperty(exports, 'foo', { ... })
    if let Expression::StaticMemberExpression(callee) = &expr.callee {
      if callee.property.name == "defineProperty" && self.is_unresolved_named(&callee.object, "Object") {
        if let (Some(Argument::StringLiteral(name)), Some(target)) = (
          expr.arguments.get(1),
          expr.arguments.first().and_then(Argument::as_expression),
        ) {
          if self.is_exports_object(target) {
            self.add_cjs_export_name(name.value.as_str());
          }
        }
      }
    }

    walk::walk_call_expression(self, expr);
  }

  fn visit_import_expression(&mut self, expr: &ast::ImportExpression<'ast>) {
    if let Expression::StringLiteral(request) = &expr.source {
      let record = self.add_import_record(
        request.value.as_str(),
        ImportKind::DynamicImport,
        request.span,
        ImportRecordMeta::empty(),
      );
      self.patches.push(Patch::DynamicImport { span: request.span, record });
    }
    walk::walk_import_expression(self, expr);
  }

  fn visit_meta_property(&mut self, it: &ast::MetaProperty<'ast>) {
    if it.meta.name == "import" {
      self.has_module_syntax = true;
    }
  }
}

impl AstScanner<'_> {
  fn scan_top_level_statement<'ast>(&mut self, stmt: &Statement<'ast>) {
    match stmt {
      Statement::ImportDeclaration(decl) => {
        self.has_module_syntax = true;
        self.scan_import_decl(decl);
        self.patches.push(Patch::Remove(decl.span));
      }
      Statement::ExportAllDeclaration(decl) => {
        self.has_module_syntax = true;
        self.scan_export_all_decl(decl);
        self.patches.push(Patch::Remove(decl.span));
      }
      Statement::ExportNamedDeclaration(decl) => {
        self.has_module_syntax = true;
        self.scan_export_named_decl(decl);
      }
      Statement::ExportDefaultDeclaration(decl) => {
        self.has_module_syntax = true;
        self.scan_export_default_decl(decl);
      }
      _ => self.visit_statement(stmt),
    }
  }

  fn scan_import_decl(&mut self, decl: &ast::ImportDeclaration<'_>) {
    let meta = if decl.specifiers.as_ref().map_or(true, |specifiers| specifiers.is_empty()) {
      ImportRecordMeta::IS_PLAIN_IMPORT
    } else {
      ImportRecordMeta::empty()
    };
    let record = self.add_import_record(decl.source.value.as_str(), ImportKind::Import, decl.span, meta);

    for specifier in decl.specifiers.iter().flatten() {
      let (local, imported) = match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(spec) => {
          (&spec.local, Specifier::Literal(Rstr::new(spec.imported.name().as_str())))
        }
        ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
          (&spec.local, Specifier::Literal(Rstr::new("default")))
        }
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => (&spec.local, Specifier::Star),
      };
      if let Some(symbol) = self.root_symbol_of(local.symbol_id.get()) {
        self.add_named_import(symbol, imported, specifier.span(), record);
      }
    }
  }

  fn scan_export_all_decl(&mut self, decl: &ast::ExportAllDeclaration<'_>) {
    let Some(exported) = &decl.exported else {
      // export * from '...'
      let record = self.add_import_record(
        decl.source.value.as_str(),
        ImportKind::Import,
        decl.span,
        ImportRecordMeta::IS_EXPORT_STAR,
      );
      self.star_exports.push(record);
      return;
    };

    // export * as ns from '...'
    let record =
      self.add_import_record(decl.source.value.as_str(), ImportKind::Import, decl.span, ImportRecordMeta::empty());
    let exported = exported.name();
    let facade = self.symbols.create_facade_root_symbol_ref(&legitimize(exported.as_str()));
    self.add_named_import(facade, Specifier::Star, decl.span, record);
    self.add_local_export(exported.as_str(), facade, decl.span);
  }

  fn scan_export_named_decl(&mut self, decl: &ast::ExportNamedDeclaration<'_>) {
    if let Some(source) = &decl.source {
      // export { foo as bar } from '...'
      let record =
        self.add_import_record(source.value.as_str(), ImportKind::Import, decl.span, ImportRecordMeta::empty());
      for spec in &decl.specifiers {
        let exported = spec.exported.name();
        let facade = self.symbols.create_facade_root_symbol_ref(&legitimize(exported.as_str()));
        let imported = Specifier::Literal(Rstr::new(spec.local.name().as_str()));
        self.add_named_import(facade, imported, spec.span, record);
        self.add_local_export(exported.as_str(), facade, spec.span);
      }
      self.patches.push(Patch::Remove(decl.span));
      return;
    }

    if let Some(declaration) = &decl.declaration {
      // export const foo = ...
      let mut bound = vec![];
      match declaration {
        Declaration::VariableDeclaration(var) => {
          for declarator in &var.declarations {
            collect_binding_identifiers(&declarator.id, &mut bound);
          }
        }
        Declaration::FunctionDeclaration(func) => bound.extend(func.id.as_ref()),
        Declaration::ClassDeclaration(class) => bound.extend(class.id.as_ref()),
        _ => {}
      }
      for ident in bound {
        if let Some(symbol) = self.root_symbol_of(ident.symbol_id.get()) {
          self.add_local_export(ident.name.as_str(), symbol, ident.span);
        }
      }
      self.patches.push(Patch::Remove(Span::new(decl.span.start, declaration.span().start)));
      self.visit_declaration(declaration);
      return;
    }

    // export { foo, bar as baz }
    for spec in &decl.specifiers {
      let local = spec.local.name();
      let exported = spec.exported.name();
      match self.root_symbol_named(local.as_str()) {
        Some(symbol) => self.add_local_export(exported.as_str(), symbol, spec.span),
        None => self.warnings.push(anyhow::anyhow!(
          "{}: exported name \"{local}\" is not declared; the export is dropped",
          self.stable_id
        )),
      }
    }
    self.patches.push(Patch::Remove(decl.span));
  }

  fn scan_export_default_decl(&mut self, decl: &ast::ExportDefaultDeclaration<'_>) {
    match &decl.declaration {
      ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
        self.patches.push(Patch::Remove(Span::new(decl.span.start, func.span.start)));
        let symbol = match &func.id {
          Some(id) => self.root_symbol_of(id.symbol_id.get()),
          None => {
            let symbol = self.create_default_export_ref();
            self.patches.push(Patch::InsertName { at: func.params.span.start, symbol });
            Some(symbol)
          }
        };
        if let Some(symbol) = symbol {
          self.add_local_export("default", symbol, decl.span);
        }
        self.visit_function(func, ScopeFlags::Function);
      }
      ExportDefaultDeclarationKind::ClassDeclaration(class) => {
        self.patches.push(Patch::Remove(Span::new(decl.span.start, class.span.start)));
        let symbol = match &class.id {
          Some(id) => self.root_symbol_of(id.symbol_id.get()),
          None => {
            let symbol = self.create_default_export_ref();
            // right after the `class` keyword
            self.patches.push(Patch::InsertName { at: class.span.start + 5, symbol });
            Some(symbol)
          }
        };
        if let Some(symbol) = symbol {
          self.add_local_export("default", symbol, decl.span);
        }
        self.visit_class(class);
      }
      kind => {
        let Some(expr) = kind.as_expression() else {
          return;
        };
        // export default <expr>
        let symbol = self.create_default_export_ref();
        self.patches.push(Patch::DeclareDefault { span: Span::new(decl.span.start, expr.span().start), symbol });
        self.add_local_export("default", symbol, decl.span);
        self.visit_expression(expr);
      }
    }
  }
}

fn legitimize(name: &str) -> String {
  webdeps_utils::ecmascript::legitimize_identifier_name(name).into_owned()
}

/// Every identifier a binding pattern declares, e.g. `a`, `b` and `c` in `{ a, b: [b], ...c }`.
fn collect_binding_identifiers<'b, 'ast>(
  pattern: &'b ast::BindingPattern<'ast>,
  out: &mut Vec<&'b ast::BindingIdentifier<'ast>>,
) {
  match &pattern.kind {
    BindingPatternKind::BindingIdentifier(ident) => out.push(ident),
    BindingPatternKind::ObjectPattern(object) => {
      for property in &object.properties {
        collect_binding_identifiers(&property.value, out);
      }
      if let Some(rest) = &object.rest {
        collect_binding_identifiers(&rest.argument, out);
      }
    }
    BindingPatternKind::ArrayPattern(array) => {
      for element in array.elements.iter().flatten() {
        collect_binding_identifiers(element, out);
      }
      if let Some(rest) = &array.rest {
        collect_binding_identifiers(&rest.argument, out);
      }
    }
    BindingPatternKind::AssignmentPattern(assignment) => collect_binding_identifiers(&assignment.left, out),
  }
}
