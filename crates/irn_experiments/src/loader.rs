//! Network files and network classes.
//!
//! A network file is a whitespace-tokenized GML subset:
//!
//! ```text
//! graph [
//!   node [ id 0 label "a" ]
//!   node [ id 1 ]
//!   edge [ source 0 target 1 ]
//! ]
//! ```
//!
//! Only `id`, `source` and `target` are interpreted; any other key/value data
//! is skipped. A class is a set of `instance-<id>.txt` network files, stored
//! in a directory, a `.tar.gz` archive or a `.zip` archive, ordered by `<id>`.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use irn_core::Network;
use tracing::{debug, info};

use crate::error::{ExperimentError, ExperimentResult};

/// The instances of one network class, in id order.
#[derive(Debug, Clone)]
pub struct NetworkClass {
    pub name: String,
    pub networks: Vec<Arc<Network>>,
}

/// Reads and parses a single network file.
pub fn read_network_file(path: impl AsRef<Path>) -> ExperimentResult<Network> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ExperimentError::io(path, source))?;
    parse_network(&source, path)
}

/// Parses network text. `path` is only used in error messages.
pub fn parse_network(source: &str, path: &Path) -> ExperimentResult<Network> {
    let tokens = tokenize(source);
    let mut parser = Parser {
        path,
        tokens: &tokens,
        pos: 0,
    };
    parser.graph()
}

/// Loads every instance of the class stored at `path` (a directory, a
/// `.tar.gz`/`.tgz` archive or a `.zip` archive).
pub fn read_class(path: impl AsRef<Path>) -> ExperimentResult<NetworkClass> {
    let path = path.as_ref();
    let name = class_name(path);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let instances = if path.is_dir() {
        read_directory_instances(path)?
    } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
        read_tar_gz_instances(path)?
    } else if file_name.ends_with(".zip") {
        read_zip_instances(path)?
    } else {
        return Err(ExperimentError::Config(format!(
            "{} is not a directory, .tar.gz or .zip archive",
            path.display()
        )));
    };

    let networks = instances
        .into_iter()
        .map(|(_, instance_path, source)| parse_network(&source, &instance_path).map(Arc::new))
        .collect::<ExperimentResult<Vec<_>>>()?;
    info!(class = %name, instances = networks.len(), "loaded network class");
    Ok(NetworkClass { name, networks })
}

/// File name up to the first `.`, e.g. `lattice` for `lattice.tar.gz`.
pub fn class_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
        .to_string()
}

/// `Some(id)` for file names of the form `instance-<id>.txt`.
pub fn instance_id(file_name: &str) -> Option<u64> {
    file_name
        .strip_prefix("instance-")?
        .strip_suffix(".txt")?
        .parse()
        .ok()
}

type Instance = (u64, PathBuf, String);

fn read_directory_instances(dir: &Path) -> ExperimentResult<Vec<Instance>> {
    let entries = fs::read_dir(dir).map_err(|source| ExperimentError::io(dir, source))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ExperimentError::io(dir, source))?;
        let path = entry.path();
        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(instance_id);
        if let (Some(id), true) = (id, path.is_file()) {
            found.push((id, path));
        }
    }
    found.sort_by_key(|(id, _)| *id);

    found
        .into_iter()
        .map(|(id, path)| {
            let source =
                fs::read_to_string(&path).map_err(|source| ExperimentError::io(&path, source))?;
            Ok((id, path, source))
        })
        .collect()
}

fn read_tar_gz_instances(archive_path: &Path) -> ExperimentResult<Vec<Instance>> {
    let io_error = |source: std::io::Error| ExperimentError::io(archive_path, source);
    let file = File::open(archive_path).map_err(io_error)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut found = Vec::new();
    for entry in archive.entries().map_err(io_error)? {
        let mut entry = entry.map_err(io_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let entry_path = entry.path().map_err(io_error)?.into_owned();
        let Some(id) = entry_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(instance_id)
        else {
            continue;
        };
        let mut text = String::new();
        let instance_path = archive_path.join(&entry_path);
        entry
            .read_to_string(&mut text)
            .map_err(|source| ExperimentError::io(&instance_path, source))?;
        found.push((id, instance_path, text));
    }
    found.sort_by_key(|(id, _, _)| *id);
    debug!(archive = %archive_path.display(), instances = found.len(), "read class archive");
    Ok(found)
}

fn read_zip_instances(archive_path: &Path) -> ExperimentResult<Vec<Instance>> {
    let archive_error = |source: zip::result::ZipError| ExperimentError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };
    let file = File::open(archive_path).map_err(|source| ExperimentError::io(archive_path, source))?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;

    let mut found = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_error)?;
        if entry.is_dir() {
            continue;
        }
        let entry_name = entry.name().to_string();
        let Some(id) = Path::new(&entry_name)
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(instance_id)
        else {
            continue;
        };
        let mut text = String::new();
        let instance_path = archive_path.join(&entry_name);
        entry
            .read_to_string(&mut text)
            .map_err(|source| ExperimentError::io(&instance_path, source))?;
        found.push((id, instance_path, text));
    }
    found.sort_by_key(|(id, _, _)| *id);
    debug!(archive = %archive_path.display(), instances = found.len(), "read class archive");
    Ok(found)
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    line: usize,
    column: usize,
}

/// Splits on whitespace, recording the 1-based line and column of each token.
fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for (line_index, line) in source.lines().enumerate() {
        let mut start: Option<(usize, usize)> = None;
        for (column, (offset, ch)) in line.char_indices().enumerate() {
            match (ch.is_whitespace(), start) {
                (false, None) => start = Some((offset, column)),
                (true, Some((from, from_column))) => {
                    tokens.push(Token {
                        text: &line[from..offset],
                        line: line_index + 1,
                        column: from_column + 1,
                    });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some((from, from_column)) = start {
            tokens.push(Token {
                text: &line[from..],
                line: line_index + 1,
                column: from_column + 1,
            });
        }
    }
    tokens
}

struct Parser<'p, 't> {
    path: &'p Path,
    tokens: &'p [Token<'t>],
    pos: usize,
}

impl<'p, 't> Parser<'p, 't> {
    fn graph(&mut self) -> ExperimentResult<Network> {
        let start = self.expect("graph")?;
        self.expect("[")?;

        let mut adjacency: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut edges = Vec::new();
        loop {
            let token = self.peek_or_eof("`node`, `edge` or `]`")?;
            match token.text {
                "node" => {
                    let (id, at) = self.node()?;
                    if adjacency.insert(id, Vec::new()).is_some() {
                        return Err(self.error_at(at, format!("duplicate node id {id}")));
                    }
                }
                "edge" => edges.push(self.edge()?),
                "]" => {
                    self.pos += 1;
                    break;
                }
                _ => self.skip_pair()?,
            }
        }
        if let Some(extra) = self.tokens.get(self.pos) {
            return Err(self.error_at(*extra, format!("unexpected `{}` after graph", extra.text)));
        }

        for (u, v, at) in edges {
            for endpoint in [u, v] {
                if !adjacency.contains_key(&endpoint) {
                    return Err(self.error_at(at, format!("edge uses undeclared node {endpoint}")));
                }
            }
            adjacency.entry(u).or_default().push(v);
            adjacency.entry(v).or_default().push(u);
        }

        let nodes: Vec<usize> = adjacency.keys().copied().collect();
        Network::new(nodes, adjacency).map_err(|error| self.error_at(start, error.to_string()))
    }

    fn node(&mut self) -> ExperimentResult<(usize, Token<'t>)> {
        self.expect("node")?;
        self.expect("[")?;
        self.expect("id")?;
        let (id, at) = self.integer()?;
        self.skip_block_rest()?;
        Ok((id, at))
    }

    fn edge(&mut self) -> ExperimentResult<(usize, usize, Token<'t>)> {
        self.expect("edge")?;
        self.expect("[")?;
        self.expect("source")?;
        let (source, at) = self.integer()?;
        self.expect("target")?;
        let (target, _) = self.integer()?;
        self.skip_block_rest()?;
        Ok((source, target, at))
    }

    /// Skips tokens up to and including the `]` closing the current block.
    fn skip_block_rest(&mut self) -> ExperimentResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next_or_eof("`]`")?;
            match token.text {
                "[" => depth += 1,
                "]" => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Skips an unrecognized `key value` pair, where value may be a `[...]` block.
    fn skip_pair(&mut self) -> ExperimentResult<()> {
        self.pos += 1;
        let value = self.next_or_eof("a value")?;
        if value.text == "[" {
            self.skip_block_rest()?;
        }
        Ok(())
    }

    fn expect(&mut self, keyword: &str) -> ExperimentResult<Token<'t>> {
        let token = self.next_or_eof(&format!("`{keyword}`"))?;
        if token.text != keyword {
            return Err(self.error_at(
                token,
                format!("expected `{keyword}`, found `{}`", token.text),
            ));
        }
        Ok(token)
    }

    fn integer(&mut self) -> ExperimentResult<(usize, Token<'t>)> {
        let token = self.next_or_eof("an integer")?;
        let value = token.text.parse().map_err(|_| {
            self.error_at(
                token,
                format!("expected a non-negative integer, found `{}`", token.text),
            )
        })?;
        Ok((value, token))
    }

    fn peek_or_eof(&self, expected: &str) -> ExperimentResult<Token<'t>> {
        self.tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.eof_error(expected))
    }

    fn next_or_eof(&mut self, expected: &str) -> ExperimentResult<Token<'t>> {
        let token = self.peek_or_eof(expected)?;
        self.pos += 1;
        Ok(token)
    }

    fn eof_error(&self, expected: &str) -> ExperimentError {
        let (line, column) = self
            .tokens
            .last()
            .map_or((1, 1), |last| (last.line, last.column + last.text.chars().count()));
        ExperimentError::Parse {
            path: self.path.to_path_buf(),
            line,
            column,
            message: format!("expected {expected}, found end of file"),
        }
    }

    fn error_at(&self, token: Token<'_>, message: String) -> ExperimentError {
        ExperimentError::Parse {
            path: self.path.to_path_buf(),
            line: token.line,
            column: token.column,
            message,
        }
    }
}
