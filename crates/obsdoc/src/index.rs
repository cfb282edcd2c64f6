//! Cross-file type index
//!
//! Every parsed [`SourceUnit`] is kept for the lifetime of a run. Types are
//! addressed through [`TypeId`] handles that record the file and the position
//! of the declaration inside the unit's type tree, so any later phase can go
//! back to the full declaration without reparsing.

use obsdoc_parser_api::{
    strip_generics, EnumConstant, MethodDecl, ParserError, SourceParser, SourceUnit, TypeDecl,
};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::error::{DocsError, Result};

/// Files that never declare documentation types
const EXCLUDED_FILES: &[&str] = &["package-info.java", "module-info.java"];

/// Handle to a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an indexed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an enum constant of an indexed type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantHandle {
    pub owner: TypeId,
    pub index: usize,
}

/// Handle to a method declared directly in an indexed type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle {
    pub owner: TypeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
struct TypeRecord {
    file: FileId,
    /// Child positions from the unit's top-level list down to the declaration
    path: Vec<usize>,
    parent: Option<TypeId>,
    nested: Vec<TypeId>,
    simple: String,
    qualified: String,
    canonical: String,
}

/// Index of every type declared in the included source files
#[derive(Debug, Default)]
pub struct SourceIndex {
    units: Vec<SourceUnit>,
    roots: Vec<Vec<TypeId>>,
    types: Vec<TypeRecord>,
    by_qualified: HashMap<String, Vec<TypeId>>,
    by_canonical: HashMap<String, Vec<TypeId>>,
    by_package: HashMap<String, Vec<TypeId>>,
    failed_files: BTreeMap<PathBuf, String>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index units that are already parsed
    pub fn from_units(units: impl IntoIterator<Item = SourceUnit>) -> Self {
        let mut index = Self::new();
        for unit in units {
            index.add_unit(unit);
        }
        index
    }

    /// Discover, parse and register every eligible file under the configured root.
    ///
    /// Files that fail to parse are logged, recorded in
    /// [`failed_files`](Self::failed_files) and skipped.
    #[instrument(skip(config, parser), fields(root = %config.root.display()))]
    pub fn build(config: &GeneratorConfig, parser: &dyn SourceParser) -> Result<Self> {
        let inclusion = config.compile_pattern()?;
        let files = discover(config.root(), &inclusion, parser)?;
        info!(files = files.len(), parallel = config.parallel, "Indexing source files");

        let parse = |path: &PathBuf| -> (PathBuf, std::result::Result<SourceUnit, ParserError>) {
            (path.clone(), parser.parse_file(path))
        };
        let results: Vec<_> = if config.parallel {
            // Collecting an indexed parallel iterator keeps path order
            config
                .thread_pool()?
                .install(|| files.par_iter().map(parse).collect())
        } else {
            files.iter().map(parse).collect()
        };

        let mut index = Self::new();
        for (path, result) in results {
            match result {
                Ok(unit) => {
                    index.add_unit(unit);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping file that failed to parse");
                    index.failed_files.insert(path, e.to_string());
                }
            }
        }

        info!(
            files = index.file_count(),
            types = index.type_count(),
            failed = index.failed_files.len(),
            "Index built"
        );
        Ok(index)
    }

    /// Register a parsed unit and all of its (nested) types
    pub fn add_unit(&mut self, unit: SourceUnit) -> FileId {
        let file = FileId(self.units.len() as u32);
        let package = unit.package.clone().unwrap_or_default();

        let mut roots = Vec::with_capacity(unit.types.len());
        for (position, decl) in unit.types.iter().enumerate() {
            let id = self.register(file, vec![position], None, decl);
            self.by_package.entry(package.clone()).or_default().push(id);
            roots.push(id);
        }

        debug!(
            file = %unit.file_path.display(),
            types = unit.type_count(),
            "Registered file"
        );
        self.units.push(unit);
        self.roots.push(roots);
        file
    }

    fn register(
        &mut self,
        file: FileId,
        path: Vec<usize>,
        parent: Option<TypeId>,
        decl: &TypeDecl,
    ) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeRecord {
            file,
            path: path.clone(),
            parent,
            nested: Vec::new(),
            simple: decl.simple_name.clone(),
            qualified: decl.qualified_name.clone(),
            canonical: decl.canonical_name.clone(),
        });

        let same_name = self.by_qualified.entry(decl.qualified_name.clone()).or_default();
        if !same_name.is_empty() {
            warn!(
                name = %decl.qualified_name,
                "Type declared more than once, lookups use the first declaration"
            );
        }
        same_name.push(id);
        self.by_canonical
            .entry(decl.canonical_name.clone())
            .or_default()
            .push(id);

        for (position, nested) in decl.nested.iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(position);
            let child = self.register(file, child_path, Some(id), nested);
            self.types[id.index()].nested.push(child);
        }
        id
    }

    /// Find a type by qualified (`a.Outer$Inner`) or canonical (`a.Outer.Inner`)
    /// name. Generic arguments are ignored.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.lookup_all(name).first().copied()
    }

    /// Every type registered under the name, in registration order
    pub fn lookup_all(&self, name: &str) -> &[TypeId] {
        let name = strip_generics(name);
        self.by_qualified
            .get(name)
            .or_else(|| self.by_canonical.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The full declaration behind a handle
    pub fn resolve(&self, id: TypeId) -> Result<&TypeDecl> {
        let record = self
            .types
            .get(id.index())
            .ok_or_else(|| DocsError::internal(format!("unknown type handle {}", id.0)))?;
        let unit = self.units.get(record.file.index()).ok_or_else(|| {
            DocsError::internal(format!("type {} points at a missing file", record.qualified))
        })?;

        let mut decl = record.path.first().and_then(|&i| unit.types.get(i));
        for &position in record.path.iter().skip(1) {
            decl = decl.and_then(|d| d.nested.get(position));
        }

        match decl {
            Some(decl) if decl.qualified_name == record.qualified => Ok(decl),
            _ => Err(DocsError::internal(format!(
                "type {} cannot be re-located in {}",
                record.qualified,
                unit.file_path.display()
            ))),
        }
    }

    fn record(&self, id: TypeId) -> &TypeRecord {
        &self.types[id.index()]
    }

    pub fn simple_name(&self, id: TypeId) -> &str {
        &self.record(id).simple
    }

    pub fn qualified_name(&self, id: TypeId) -> &str {
        &self.record(id).qualified
    }

    pub fn canonical_name(&self, id: TypeId) -> &str {
        &self.record(id).canonical
    }

    pub fn file_of(&self, id: TypeId) -> FileId {
        self.record(id).file
    }

    /// The unit the type is declared in
    pub fn unit_of(&self, id: TypeId) -> &SourceUnit {
        &self.units[self.record(id).file.index()]
    }

    pub fn package_of(&self, id: TypeId) -> Option<&str> {
        self.unit_of(id).package.as_deref()
    }

    pub fn parent(&self, id: TypeId) -> Option<TypeId> {
        self.record(id).parent
    }

    /// Types declared directly inside `id`
    pub fn nested_types(&self, id: TypeId) -> &[TypeId] {
        &self.record(id).nested
    }

    /// Top-level types declared in a package (`""` for the default package)
    pub fn types_in_package(&self, package: &str) -> &[TypeId] {
        self.by_package
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.units.len()).map(|i| FileId(i as u32))
    }

    pub fn unit(&self, file: FileId) -> Option<&SourceUnit> {
        self.units.get(file.index())
    }

    /// The file's root type: the top-level type named after the file
    pub fn primary_type(&self, file: FileId) -> Option<TypeId> {
        let unit = self.unit(file)?;
        let position = unit.primary_index()?;
        self.roots.get(file.index())?.get(position).copied()
    }

    pub fn find_constant(&self, owner: TypeId, name: &str) -> Option<ConstantHandle> {
        let decl = self.resolve(owner).ok()?;
        decl.constants
            .iter()
            .position(|c| c.name == name)
            .map(|index| ConstantHandle { owner, index })
    }

    pub fn constant(&self, handle: ConstantHandle) -> Option<&EnumConstant> {
        self.resolve(handle.owner).ok()?.constants.get(handle.index)
    }

    pub fn method(&self, handle: MethodHandle) -> Option<&MethodDecl> {
        self.resolve(handle.owner).ok()?.methods.get(handle.index)
    }

    pub fn file_count(&self) -> usize {
        self.units.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Files skipped because they failed to parse, with the reason
    pub fn failed_files(&self) -> &BTreeMap<PathBuf, String> {
        &self.failed_files
    }
}

/// Walk `root` and collect every eligible file, sorted by path
pub fn discover(root: &Path, inclusion: &Regex, parser: &dyn SourceParser) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DocsError::walk(root, "not a directory"));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_eligible(entry.path(), inclusion, parser) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// A file participates when the whole path matches the inclusion pattern,
/// the parser handles its extension, and it is not a package/module descriptor.
pub fn is_eligible(path: &Path, inclusion: &Regex, parser: &dyn SourceParser) -> bool {
    let descriptor = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| EXCLUDED_FILES.contains(&name));

    !descriptor && parser.can_parse(path) && inclusion.is_match(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use obsdoc_java::JavaParser;
    use obsdoc_parser_api::{EnumConstant, TypeKind};
    use std::fs;

    fn sample_unit() -> SourceUnit {
        let outer = TypeDecl::new(TypeKind::Enum, Some("com.example"), "Docs");
        let keys = outer
            .nested_type(TypeKind::Enum, "Keys")
            .with_constant(EnumConstant::new("METHOD"));
        let deep = keys.nested_type(TypeKind::Class, "Deep");
        let keys = keys.with_nested(deep);
        let outer = outer.with_nested(keys);

        SourceUnit::new("src/com/example/Docs.java")
            .with_package("com.example")
            .with_type(outer)
    }

    #[test]
    fn test_lookup_name_forms() {
        let index = SourceIndex::from_units([sample_unit()]);

        let by_qualified = index.lookup("com.example.Docs$Keys").unwrap();
        let by_canonical = index.lookup("com.example.Docs.Keys").unwrap();
        assert_eq!(by_qualified, by_canonical);
        assert_eq!(index.simple_name(by_qualified), "Keys");

        let deep = index.lookup("com.example.Docs$Keys$Deep").unwrap();
        assert_eq!(index.canonical_name(deep), "com.example.Docs.Keys.Deep");
        assert_eq!(index.parent(deep), Some(by_qualified));

        assert!(index.lookup("Keys").is_none());
        assert!(index.lookup("com.example.Missing").is_none());
    }

    #[test]
    fn test_lookup_strips_generics() {
        let index = SourceIndex::from_units([sample_unit()]);
        assert!(index.lookup("com.example.Docs<String>").is_some());
    }

    #[test]
    fn test_resolve_nested_declaration() {
        let index = SourceIndex::from_units([sample_unit()]);
        let keys = index.lookup("com.example.Docs.Keys").unwrap();

        let decl = index.resolve(keys).unwrap();
        assert_eq!(decl.qualified_name, "com.example.Docs$Keys");
        assert_eq!(decl.constants[0].name, "METHOD");

        let handle = index.find_constant(keys, "METHOD").unwrap();
        assert_eq!(index.constant(handle).unwrap().name, "METHOD");
        assert!(index.find_constant(keys, "OTHER").is_none());
    }

    #[test]
    fn test_package_and_primary_type() {
        let index = SourceIndex::from_units([sample_unit()]);
        let file = index.file_ids().next().unwrap();

        let primary = index.primary_type(file).unwrap();
        assert_eq!(index.qualified_name(primary), "com.example.Docs");
        assert_eq!(index.types_in_package("com.example"), &[primary]);
        assert_eq!(index.package_of(primary), Some("com.example"));
        assert_eq!(index.nested_types(primary).len(), 1);
        assert_eq!(index.type_count(), 3);
    }

    #[test]
    fn test_duplicates_keep_every_declaration() {
        let index = SourceIndex::from_units([sample_unit(), sample_unit()]);

        let all = index.lookup_all("com.example.Docs");
        assert_eq!(all.len(), 2);
        assert_eq!(index.lookup("com.example.Docs"), Some(all[0]));
        assert_ne!(index.file_of(all[0]), index.file_of(all[1]));
    }

    fn write_tree(root: &Path) {
        let pkg = root.join("com/example");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("Docs.java"), "package com.example; enum Docs { A }").unwrap();
        fs::write(pkg.join("Other.java"), "package com.example; class Other {}").unwrap();
        fs::write(pkg.join("package-info.java"), "package com.example;").unwrap();
        fs::write(pkg.join("notes.txt"), "not java").unwrap();
        fs::write(pkg.join("Empty.java"), "package com.example;").unwrap();
    }

    #[test]
    fn test_discover_filters_files() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path());
        let parser = JavaParser::new();

        let all = Regex::new("^(?:.*)$").unwrap();
        let files = discover(dir.path(), &all, &parser).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Docs.java", "Empty.java", "Other.java"]);

        let docs_only = Regex::new("^(?:.*Docs\\.java)$").unwrap();
        assert_eq!(discover(dir.path(), &docs_only, &parser).unwrap().len(), 1);
    }

    #[test]
    fn test_discover_missing_root() {
        let parser = JavaParser::new();
        let all = Regex::new(".*").unwrap();
        assert!(matches!(
            discover(Path::new("/definitely/not/here"), &all, &parser),
            Err(DocsError::Walk { .. })
        ));
    }

    #[test]
    fn test_build_records_failed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path());
        let parser = JavaParser::new();

        let index = SourceIndex::build(&GeneratorConfig::new(dir.path()), &parser).unwrap();

        assert_eq!(index.file_count(), 2);
        assert!(index.lookup("com.example.Docs").is_some());
        assert!(index.lookup("com.example.Other").is_some());
        assert_eq!(index.failed_files().len(), 1);
        assert!(index
            .failed_files()
            .keys()
            .all(|p| p.ends_with("Empty.java")));
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path());
        let parser = JavaParser::new();

        let sequential = SourceIndex::build(&GeneratorConfig::new(dir.path()), &parser).unwrap();
        let parallel = SourceIndex::build(
            &GeneratorConfig::new(dir.path())
                .with_parallel(true)
                .with_num_threads(2),
            &parser,
        )
        .unwrap();

        let names = |index: &SourceIndex| -> Vec<String> {
            index
                .file_ids()
                .filter_map(|f| index.primary_type(f))
                .map(|t| index.qualified_name(t).to_string())
                .collect()
        };
        assert_eq!(names(&sequential), names(&parallel));
    }
}
