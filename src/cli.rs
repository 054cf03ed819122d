//! Minimal CLI: infer → (go | tree), or render a saved tree.
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::ir::Node;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer Go struct declarations from JSON/NDJSON samples
#[derive(Parser, Debug)]
#[command(name = "json-gostruct", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and emit Go type declarations
    Go(GoOut),
    /// infer and print the merged node tree as JSON
    Tree(TreeOut),
    /// render a (possibly hand-edited) node tree produced by `tree`
    Render(RenderOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct RenderSettings {
    /// JSON file with renderer settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// render optional strings as *string
    #[arg(long)]
    string_pointers_when_key_missing: bool,

    /// render timestamps as string instead of time.Time
    #[arg(long)]
    time_as_str: bool,

    /// struct tag key (default: json)
    #[arg(long)]
    tag_name: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct GoOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    render_settings: RenderSettings,

    /// top-level Go type name
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// Go package clause
    #[arg(long, default_value = "main")]
    package: String,

    /// output .go file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct TreeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// name of the root node
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    /// node tree JSON: one root node or an array of root nodes
    tree: PathBuf,

    #[command(flatten)]
    render_settings: RenderSettings,

    /// Go package clause
    #[arg(long, default_value = "main")]
    package: String,

    /// output .go file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

enum Source {
    Stdin,
    File(PathBuf),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Every sample from every input, in input order. Files are read and
    /// parsed in parallel.
    fn load_samples(&self) -> Result<Vec<Value>> {
        let sources = resolve_file_path_patterns(&self.input)?;
        let per_source = sources
            .par_iter()
            .map(|source| self.load_source(source))
            .collect::<Result<Vec<_>>>()?;
        let samples: Vec<Value> = per_source.into_iter().flatten().collect();
        if samples.is_empty() {
            warn!("no samples found in {} input(s)", sources.len());
        }
        Ok(samples)
    }

    fn load_source(&self, source: &Source) -> Result<Vec<Value>> {
        let (origin, text) = match source {
            Source::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|source| Error::Io { path: PathBuf::from("-"), source })?;
                ("<stdin>".to_string(), text)
            }
            Source::File(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|source| Error::Io { path: path.clone(), source })?;
                (path.to_string_lossy().to_string(), text)
            }
        };

        let documents = if self.ndjson {
            text.lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| parse_json(line, &format!("{origin}:{}", i + 1)))
                .collect::<Result<Vec<_>>>()?
        } else {
            vec![parse_json(&text, &origin)?]
        };
        debug!(origin = %origin, documents = documents.len(), "loaded input");

        let mut samples = Vec::with_capacity(documents.len());
        for document in documents {
            let document = match self.json_pointer.as_deref() {
                None => document,
                Some(pointer) => document
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| Error::JsonPointer {
                        pointer: pointer.to_string(),
                        origin: origin.clone(),
                    })?,
            };
            match self.jq_expr.as_deref() {
                None => samples.push(document),
                Some(jq_expr) => samples.extend(crate::jq_exec::run_jaq(jq_expr, &document)?),
            }
        }
        Ok(samples)
    }
}

impl RenderSettings {
    fn resolve(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if self.string_pointers_when_key_missing {
            config.string_pointers_when_key_missing = true;
        }
        if self.time_as_str {
            config.time_as_str = true;
        }
        if let Some(tag_name) = &self.tag_name {
            config.tag_name = tag_name.clone();
        }
        Ok(config)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Go(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let config = target.render_settings.resolve()?;
                let root = infer(&target.input_settings, &target.root_type)?;
                let source = render_go(&[root], &config, &target.package)?;
                write_output(target.out.as_deref(), &source)
            }
            Command::Tree(target) => {
                let root = infer(&target.input_settings, &target.root_type)?;
                let mut tree = serde_json::to_string_pretty(&root)?;
                tree.push('\n');
                write_output(target.out.as_deref(), &tree)
            }
            Command::Render(target) => {
                let config = target.render_settings.resolve()?;
                let roots = load_tree(&target.tree)?;
                let source = render_go(&roots, &config, &target.package)?;
                write_output(target.out.as_deref(), &source)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn infer(input_settings: &InputSettings, root_type: &str) -> Result<Node> {
    let samples = input_settings.load_samples()?;
    let root_name = crate::inference::name::go_name(root_type);
    let mut inf = crate::inference::Inference::new(root_name);
    for sample in &samples {
        inf.observe_value(sample);
    }
    info!(samples = inf.samples(), "inference finished");
    Ok(inf.solve())
}

fn render_go(roots: &[Node], config: &RenderConfig, package: &str) -> Result<String> {
    let decls = crate::lower::render_declarations(roots, config)?;
    let mut cg = crate::codegen::Codegen::new(package);
    cg.emit(&decls);
    Ok(cg.into_string())
}

/// Top-level entries of a tree file are all declaration targets.
fn load_tree(path: &Path) -> Result<Vec<Node>> {
    let src = std::fs::read_to_string(path)
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let mut roots = if src.trim_start().starts_with('[') {
        crate::path_de::from_str_with_path::<Vec<Node>>(&src)?
    } else {
        vec![crate::path_de::from_str_with_path::<Node>(&src)?]
    };
    for root in &mut roots {
        root.root = true;
    }
    Ok(roots)
}

fn parse_json(text: &str, origin: &str) -> Result<Value> {
    serde_json::from_str::<Value>(text).map_err(|source| Error::Json {
        origin: origin.to_string(),
        source,
    })
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched = glob::glob(pattern)?
                .map(|entry| entry.map(Source::File))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if matched.is_empty() {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(Error::Glob(format!("glob pattern matched no files: {pattern}")));
            }
            out.append(&mut matched);
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
