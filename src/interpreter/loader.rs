use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    rc::Rc,
};

use walkdir::WalkDir;

use crate::{
    ast::Statement,
    error::LoadError,
    interpreter::{lexer, parser},
};

/// File extension of Tox source files.
pub const SOURCE_SUFFIX: &str = "tox";

/// Loader settings supplied by the front end.
///
/// The project configuration file itself is the host's concern; this struct
/// is the boundary the loader works against.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Project prefix stripped from the front of import paths.
    pub package_prefix: String,
    /// Source directories searched for import head files, in order.
    pub source_dirs:    Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { package_prefix: String::new(),
               source_dirs:    vec!["src".to_string()], }
    }
}

/// Composes the combined statement list for a whole program.
///
/// The entry file's directory is parsed as one package; every `import` is
/// resolved to its head file (`a.b.c` maps to `a/b/c/c.tox`) under the
/// configured source directories and loaded recursively. Exported (`pub`)
/// declarations of an imported module are re-emitted under `module.name`
/// aliases next to their originals, which is what makes `module.symbol`
/// references resolve; private declarations are copied through unchanged
/// and stay unreachable from outside.
///
/// # Parameters
/// - `entry`: Path of the program's entry file.
/// - `config`: Package prefix and source directories.
///
/// # Returns
/// The combined statement list, imports first.
///
/// # Errors
/// Unreadable files, parse failures, package declaration mismatches and
/// unresolvable imports are all fatal load errors.
pub fn load_program(entry: &Path, config: &LoaderConfig) -> Result<Vec<Statement>, LoadError> {
    if !entry.is_file() {
        return Err(LoadError::Io { path:   entry.display().to_string(),
                                   source: std::io::Error::from(std::io::ErrorKind::NotFound), });
    }

    let mut loaded = HashSet::new();
    let mut out = Vec::new();
    let program = load_directory(entry, &mut loaded, config, &mut out)?;
    out.extend(program);
    Ok(out)
}

/// Loads the package directory around `entry` and returns its own
/// statements; statements contributed by its imports are appended to `out`
/// directly.
fn load_directory(entry: &Path,
                  loaded: &mut HashSet<PathBuf>,
                  config: &LoaderConfig,
                  out: &mut Vec<Statement>)
                  -> Result<Vec<Statement>, LoadError> {
    let dir = entry.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut files: Vec<PathBuf> =
        WalkDir::new(&dir).max_depth(1)
                          .into_iter()
                          .filter_map(Result::ok)
                          .filter(|e| e.file_type().is_file())
                          .filter(|e| {
                              e.path().extension().is_some_and(|ext| ext == SOURCE_SUFFIX)
                          })
                          .map(|e| e.path().to_path_buf())
                          .collect();
    files.sort();

    let mut program = Vec::new();
    let mut declared_package: Option<String> = None;

    for file in files {
        if !loaded.insert(file.clone()) {
            continue;
        }
        let source = std::fs::read_to_string(&file).map_err(|source| {
                         LoadError::Io { path: file.display().to_string(),
                                         source }
                     })?;
        let (statements, errors) = parser::core::parse_program(&lexer::lex(&source));
        if !errors.is_empty() {
            return Err(LoadError::Parse { path: file.display().to_string(),
                                          errors });
        }

        for statement in &statements {
            if let Statement::Package { name, .. } = statement {
                match &declared_package {
                    None => declared_package = Some(name.clone()),
                    Some(existing) if existing != name => {
                        return Err(LoadError::PackageMismatch { dir:    dir.display()
                                                                            .to_string(),
                                                                first:  existing.clone(),
                                                                second: name.clone(), });
                    },
                    Some(_) => {},
                }
            }
        }
        program.extend(statements);
    }

    let imports: Vec<String> = program.iter()
                                      .filter_map(|statement| match statement {
                                          Statement::Import { path, .. } => Some(path.clone()),
                                          _ => None,
                                      })
                                      .collect();

    for import in imports {
        load_import(&import, entry, loaded, config, out)?;
    }

    if let Some(declared) = &declared_package {
        verify_package_name(entry, declared, config)?;
    }

    Ok(program)
}

/// Resolves one import path to its head file and loads it, emitting the
/// `module.name` aliases for its exported declarations.
fn load_import(import: &str,
               entry: &Path,
               loaded: &mut HashSet<PathBuf>,
               config: &LoaderConfig,
               out: &mut Vec<Statement>)
               -> Result<(), LoadError> {
    let stripped = strip_package_prefix(import, &config.package_prefix);
    let segments: Vec<&str> = stripped.split('.').collect();
    let module = segments.last().copied().unwrap_or(stripped);

    let mut relative = PathBuf::new();
    for segment in &segments {
        relative.push(segment);
    }
    relative.push(format!("{module}.{SOURCE_SUFFIX}"));

    for source_dir in &config.source_dirs {
        let head = project_root(entry, source_dir).join(source_dir).join(&relative);
        if !head.is_file() {
            continue;
        }

        let module_statements = load_directory(&head, loaded, config, out)?;
        for statement in module_statements {
            match &statement {
                Statement::Function(decl) if decl.visibility.is_public() => {
                    let mut alias = (**decl).clone();
                    alias.name = format!("{module}.{}", decl.name);
                    out.push(Statement::Function(Rc::new(alias)));
                },
                Statement::Let(decl) if decl.visibility.is_public() => {
                    let mut alias = decl.clone();
                    alias.name = format!("{module}.{}", decl.name);
                    out.push(Statement::Let(alias));
                },
                _ => {},
            }
            out.push(statement);
        }
        return Ok(());
    }

    Err(LoadError::ImportNotFound { path: import.to_string() })
}

/// Strips the project prefix (plus its dot) off an import or package path.
fn strip_package_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.strip_prefix('.').unwrap_or(path),
        None => path,
    }
}

/// Derives the project root from the entry path: everything before the last
/// occurrence of the source directory in the absolute path, falling back to
/// the entry's own directory.
fn project_root(entry: &Path, source_dir: &str) -> PathBuf {
    let abs = entry.canonicalize().unwrap_or_else(|_| entry.to_path_buf());
    let hay = abs.to_string_lossy().into_owned();
    match hay.rfind(source_dir) {
        Some(index) => PathBuf::from(&hay[..index]),
        None => entry.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    }
}

/// Verifies that a file's declared package is consistent with its path
/// relative to the source directory.
///
/// Special case: the entry file `main.tox` at a source root may declare
/// either `main` or the project prefix as its package. A file outside every
/// configured source directory is exempt (single-file programs).
fn verify_package_name(entry: &Path,
                       declared: &str,
                       config: &LoaderConfig)
                       -> Result<(), LoadError> {
    let abs = entry.canonicalize().unwrap_or_else(|_| entry.to_path_buf());
    let hay = abs.to_string_lossy().into_owned();

    let mut expected = None;
    for source_dir in &config.source_dirs {
        if let Some(index) = hay.find(source_dir.as_str()) {
            let rel = hay[index + source_dir.len()..].trim_start_matches(['/', '\\']);
            let rel = rel.strip_suffix(&format!(".{SOURCE_SUFFIX}")).unwrap_or(rel);
            expected = Some(rel.replace(['/', '\\'], "."));
            break;
        }
    }
    let expected = match expected {
        Some(expected) => expected,
        None => return Ok(()),
    };

    let declared = strip_package_prefix(declared, &config.package_prefix);
    if expected == "main" && (declared == config.package_prefix || declared == "main") {
        return Ok(());
    }

    let declared_last = declared.rsplit('.').next().unwrap_or(declared);
    let expected_last = expected.rsplit('.').next().unwrap_or(&expected);
    if declared_last == expected_last {
        Ok(())
    } else {
        Err(LoadError::PackageNameMismatch { declared: declared.to_string(),
                                             expected: expected.clone(), })
    }
}
