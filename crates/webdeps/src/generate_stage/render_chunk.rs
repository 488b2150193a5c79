use std::path::Path;

use itertools::Itertools;
use rustc_hash::FxHashSet;
use sugar_path::SugarPath;
use webdeps_common::{
  BundleOptions, Chunk, ChunkIdx, InstantiatedChunk, Module, NormalModule, Patch,
  PreliminaryFilename, SymbolRef,
};
use webdeps_sourcemap::{LineIndex, MappedWriter};
use webdeps_utils::{
  concat_string,
  ecmascript::{property_access_str, to_module_import_export_name, to_property_key, to_string_literal},
  rayon::{IntoParallelIterator, ParallelIterator},
};

use crate::{graph::ChunkGraph, link_stage::LinkStageOutput, types::IndexInstantiatedChunks};

use super::GenerateStage;

impl GenerateStage<'_> {
  pub fn render_chunks(&self, chunk_graph: &ChunkGraph) -> IndexInstantiatedChunks {
    chunk_graph
      .sorted_chunk_idx_vec
      .clone()
      .into_par_iter()
      .map(|chunk_idx| {
        ChunkRenderer {
          link_output: self.link_output,
          options: self.options,
          chunk_graph,
          chunk_idx,
          chunk: &chunk_graph.chunk_table[chunk_idx],
        }
        .render()
      })
      .collect::<Vec<_>>()
      .into()
  }
}

struct ChunkRenderer<'a> {
  link_output: &'a LinkStageOutput,
  options: &'a BundleOptions,
  chunk_graph: &'a ChunkGraph,
  chunk_idx: ChunkIdx,
  chunk: &'a Chunk,
}

impl<'a> ChunkRenderer<'a> {
  fn render(self) -> InstantiatedChunk {
    let mut writer = MappedWriter::new(self.options.source_map);
    self.render_imports(&mut writer);
    for module_idx in &self.chunk.modules {
      if let Module::Normal(module) = &self.link_output.module_table[*module_idx] {
        self.render_module(&mut writer, module);
      }
    }
    self.render_exports(&mut writer);

    let filename = self.filename_of(self.chunk_idx);
    if self.options.source_map {
      let basename = filename.rsplit('/').next().unwrap_or(filename);
      writer.push_str(&concat_string!("//# sourceMappingURL=", basename, ".map\n"));
    }

    let (content, map) = writer.finish();
    InstantiatedChunk {
      originate_from: self.chunk_idx,
      content,
      map,
      preliminary_filename: self
        .chunk
        .preliminary_filename
        .clone()
        .unwrap_or_else(|| PreliminaryFilename::new(filename.to_string(), None)),
    }
  }

  /// The name a symbol is rendered with in this chunk.
  fn name(&self, symbol: SymbolRef) -> &'a str {
    let canonical = self.link_output.symbols.canonical_ref_for(symbol);
    self.chunk.name_of(canonical).unwrap_or_else(|| canonical.name(&self.link_output.symbols))
  }

  fn helper(&self, name: &str) -> &'a str {
    self.name(self.link_output.runtime.resolve_symbol(name))
  }

  fn filename_of(&self, chunk_idx: ChunkIdx) -> &'a str {
    self.chunk_graph.chunk_table[chunk_idx].preliminary_filename.as_deref().unwrap_or_default()
  }

  fn import_path(&self, importee: ChunkIdx) -> String {
    relative_chunk_path(self.filename_of(self.chunk_idx), self.filename_of(importee))
  }

  fn render_imports(&self, writer: &mut MappedWriter) {
    for (importee_idx, items) in &self.chunk.imports_from_other_chunks {
      let path = to_string_literal(&self.import_path(*importee_idx));
      if items.is_empty() {
        writer.push_str(&concat_string!("import ", path, ";\n"));
        continue;
      }
      let specifiers = items
        .iter()
        .map(|item| {
          let local = self.name(item.import_ref);
          if item.export_alias.as_str() == local {
            local.to_string()
          } else {
            concat_string!(item.export_alias, " as ", local)
          }
        })
        .join(", ");
      writer.push_str(&concat_string!("import { ", specifiers, " } from ", path, ";\n"));
    }

    for (external_idx, symbols) in &self.chunk.imports_from_external_modules {
      let Some(external) = self.link_output.module_table[*external_idx].as_external() else {
        continue;
      };
      let path = to_string_literal(&external.id);
      let mut rendered = false;
      if symbols.contains(&external.namespace_ref) {
        let namespace = self.name(external.namespace_ref);
        writer.push_str(&concat_string!("import * as ", namespace, " from ", path, ";\n"));
        rendered = true;
      }
      let specifiers = external
        .named_imports
        .iter()
        .filter(|(_, symbol)| symbols.contains(symbol))
        .map(|(imported, symbol)| {
          let local = self.name(*symbol);
          if imported.as_str() == local {
            local.to_string()
          } else {
            concat_string!(to_module_import_export_name(imported), " as ", local)
          }
        })
        .collect_vec();
      if !specifiers.is_empty() {
        writer.push_str(&concat_string!("import { ", specifiers.join(", "), " } from ", path, ";\n"));
        rendered = true;
      }
      if !rendered {
        writer.push_str(&concat_string!("import ", path, ";\n"));
      }
    }
  }

  fn render_exports(&self, writer: &mut MappedWriter) {
    let mut exported = FxHashSet::default();
    let mut specifiers = vec![];
    for (alias, symbol) in &self.chunk.entry_exports {
      let local = self.name(*symbol);
      exported.insert(alias.as_str());
      if alias.as_str() == local {
        specifiers.push(local.to_string());
      } else {
        specifiers.push(concat_string!(local, " as ", to_module_import_export_name(alias)));
      }
    }
    for symbol in &self.chunk.exports_to_other_chunks {
      let local = self.name(*symbol);
      if exported.insert(local) {
        specifiers.push(local.to_string());
      }
    }
    if !specifiers.is_empty() {
      writer.push_str(&concat_string!("export { ", specifiers.join(", "), " };\n"));
    }
  }

  fn render_module(&self, writer: &mut MappedWriter, module: &NormalModule) {
    let meta = &self.link_output.metadata[module.idx];
    writer.push_str(&concat_string!("//#region ", module.stable_id, "\n"));

    if let Some(wrapper_ref) = module.wrapper_ref {
      writer.push_str(&concat_string!(
        "var ",
        self.name(wrapper_ref),
        " = ",
        self.helper("__commonJS"),
        "(function (exports, module) {\n"
      ));
      self.render_body(writer, module);
      writer.push_str("});\n");
      if meta.needs_namespace {
        let namespace = self.name(module.namespace_ref);
        writer.push_str(&concat_string!(
          "var ",
          namespace,
          " = ",
          self.helper("__toESM"),
          "(",
          self.name(wrapper_ref),
          "());\n"
        ));
        for (export_name, facade) in &meta.commonjs_named_facades {
          writer.push_str(&concat_string!(
            "var ",
            self.name(*facade),
            " = ",
            property_access_str(namespace, export_name),
            ";\n"
          ));
        }
      }
    } else {
      if meta.needs_namespace {
        let properties = meta
          .resolved_exports
          .iter()
          .map(|(name, symbol)| concat_string!("  ", to_property_key(name), ": () => ", self.name(*symbol)))
          .join(",\n");
        let namespace = self.name(module.namespace_ref);
        writer.push_str(&concat_string!("var ", namespace, " = {};\n"));
        if !properties.is_empty() {
          writer.push_str(&concat_string!(
            self.helper("__export"),
            "(",
            namespace,
            ", {\n",
            properties,
            "\n});\n"
          ));
        }
      }
      self.render_body(writer, module);
    }

    writer.push_str("//#endregion\n");
  }

  /// Copies the module source with its patches applied. Copied text is mapped back to the original file.
  fn render_body(&self, writer: &mut MappedWriter, module: &NormalModule) {
    let source = module.source.as_str();
    let index = LineIndex::new(source);
    let source_id =
      if module.is_virtual() { None } else { writer.add_source(&self.source_name(module), source) };

    let mut last = 0;
    for patch in &module.patches {
      let (start, end) = (patch.start() as usize, patch.end() as usize);
      if start > last {
        writer.push_mapped(&source[last..start], source_id, source, &index, last);
      }
      writer.push_str(&self.render_patch(module, patch, source));
      last = last.max(end);
    }
    writer.push_mapped(&source[last..], source_id, source, &index, last);
    if !source.ends_with('\n') {
      writer.push_str("\n");
    }
  }

  fn render_patch(&self, module: &NormalModule, patch: &Patch, source: &str) -> String {
    match patch {
      Patch::Remove(_) => String::new(),
      Patch::Replace { text, .. } => text.to_string(),
      Patch::SymbolRef { span, symbol, shorthand } => {
        let name = self.name(*symbol);
        let original = &source[span.start as usize..span.end as usize];
        if *shorthand && original != name {
          concat_string!(original, ": ", name)
        } else {
          name.to_string()
        }
      }
      Patch::DeclareDefault { symbol, .. } => concat_string!("var ", self.name(*symbol), " = "),
      Patch::InsertName { symbol, .. } => concat_string!(" ", self.name(*symbol)),
      Patch::Require { record, .. } => {
        match &self.link_output.module_table[module.import_records[*record].resolved_module()] {
          Module::Normal(importee) => match importee.wrapper_ref {
            Some(wrapper_ref) => concat_string!(self.name(wrapper_ref), "()"),
            None => concat_string!(
              "(",
              self.helper("__toCommonJS"),
              "(",
              self.name(importee.namespace_ref),
              "))"
            ),
          },
          Module::External(importee) => self.name(importee.namespace_ref).to_string(),
        }
      }
      Patch::DynamicImport { span, record } => {
        let importee_idx = module.import_records[*record].resolved_module();
        match self.chunk_graph.entry_module_to_entry_chunk.get(&importee_idx) {
          Some(importee_chunk) => to_string_literal(&self.import_path(*importee_chunk)),
          None => source[span.start as usize..span.end as usize].to_string(),
        }
      }
    }
  }

  /// The path of a module relative to the directory its chunk is written to.
  fn source_name(&self, module: &NormalModule) -> String {
    let chunk_path = self.options.dest.join(self.filename_of(self.chunk_idx));
    let chunk_dir = chunk_path.parent().unwrap_or(&self.options.dest);
    Path::new(&*module.id).relative(chunk_dir).to_slash_lossy().into_owned()
  }
}

/// The specifier `importer` uses to import `importee`. Both are filenames relative to the output root.
fn relative_chunk_path(importer: &str, importee: &str) -> String {
  let importer_dir = importer.rsplit_once('/').map_or(vec![], |(dir, _)| dir.split('/').collect_vec());
  let importee_segments = importee.split('/').collect_vec();
  let common = importer_dir
    .iter()
    .zip(&importee_segments)
    .take_while(|(a, b)| a == b)
    .count()
    .min(importee_segments.len() - 1);

  let ups = importer_dir.len() - common;
  let rest = importee_segments[common..].join("/");
  if ups == 0 {
    concat_string!("./", rest)
  } else {
    concat_string!("../".repeat(ups), rest)
  }
}

#[test]
fn test_relative_chunk_path() {
  assert_eq!(relative_chunk_path("preact.js", "common/hooks-!~{000}~.js"), "./common/hooks-!~{000}~.js");
  assert_eq!(relative_chunk_path("common/a.js", "common/b.js"), "./b.js");
  assert_eq!(relative_chunk_path("common/a.js", "preact.js"), "../preact.js");
  assert_eq!(relative_chunk_path("preact.js", "react.js"), "./react.js");
}
