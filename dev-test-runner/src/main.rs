//! Golden-file runner: every `fixtures/<name>.json` (a JSON array of samples)
//! is inferred and rendered, then compared with `fixtures/<name>.go`.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use json_gostruct::codegen::Codegen;
use json_gostruct::inference::{infer_from_values, name::go_name};
use json_gostruct::lower::render_declarations;
use json_gostruct::RenderConfig;

fn render_fixture(path: &Path) -> Result<String> {
    let src = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let samples: Vec<serde_json::Value> =
        serde_json::from_str(&src).with_context(|| format!("parsing {}", path.display()))?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

    let root = infer_from_values(&go_name(stem), &samples);
    let decls = render_declarations(&[root], &RenderConfig::default())?;
    let mut cg = Codegen::new("main");
    cg.emit(&decls);
    Ok(cg.into_string())
}

fn run(dir: &Path) -> Result<usize> {
    let mut fixtures: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    fixtures.sort();
    if fixtures.is_empty() {
        bail!("no fixtures in {}", dir.display());
    }

    let mut failed = 0;
    for fixture in &fixtures {
        let golden = fixture.with_extension("go");
        let name = fixture.display();
        let expected = match std::fs::read_to_string(&golden) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("{} {name}: no golden file ({error})", "❌".red());
                failed += 1;
                continue;
            }
        };
        match render_fixture(fixture) {
            Ok(actual) if actual == expected => eprintln!("{} {name}", "✅".green()),
            Ok(actual) => {
                eprintln!("{} {name}: output differs", "❌".red());
                eprintln!("{}\n{actual}", "—— actual ——".yellow());
                eprintln!("{}\n{expected}", "—— expected ——".yellow());
                failed += 1;
            }
            Err(error) => {
                eprintln!("{} {name}: {error:#}", "❌".red());
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

    match run(&dir) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("{}", format!("{failed} fixture(s) failed").red().bold());
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
