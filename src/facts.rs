//! Fact scanner
//!
//! Builds a `FactSnapshot` of codebase ground truth: file and language
//! inventory, frameworks and toolchains from manifests, known-good
//! commands, and modification timestamps. The walk respects .gitignore.
//!
//! The audit engine itself never scans anything; it only consumes the
//! snapshot this module (or a test) produces.

use crate::models::FactSnapshot;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Safety valve for pathological repos
const MAX_FILES: usize = 20_000;

fn language_for_extension(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "py" | "pyi" => "Python",
        "rs" => "Rust",
        "ts" | "tsx" => "TypeScript",
        "js" | "jsx" | "mjs" => "JavaScript",
        "go" => "Go",
        "java" => "Java",
        "kt" => "Kotlin",
        "swift" => "Swift",
        "rb" => "Ruby",
        "php" => "PHP",
        "c" | "h" => "C",
        "cpp" | "hpp" | "cc" => "C++",
        "cs" => "C#",
        "ex" | "exs" => "Elixir",
        "hs" => "Haskell",
        "sh" | "bash" | "zsh" => "Shell",
        "sql" => "SQL",
        "html" | "htm" => "HTML",
        "css" | "scss" => "CSS",
        "vue" => "Vue",
        "svelte" => "Svelte",
        _ => return None,
    })
}

/// Dependency name -> framework name, across ecosystems
fn framework_for_dependency(dep: &str) -> Option<&'static str> {
    Some(match dep {
        "react" | "react-dom" => "react",
        "vue" => "vue",
        "@angular/core" => "angular",
        "svelte" => "svelte",
        "next" => "nextjs",
        "nuxt" => "nuxt",
        "express" => "express",
        "@nestjs/core" => "nestjs",
        "django" => "django",
        "flask" => "flask",
        "fastapi" => "fastapi",
        "rails" => "rails",
        "laravel/framework" => "laravel",
        "axum" => "axum",
        "actix-web" => "actix",
        _ => return None,
    })
}

fn makefile_target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^([A-Za-z0-9_-]+):(?:\s|$)").expect("valid regex"))
}

pub struct FactScanner {
    root: PathBuf,
    max_files: usize,
}

impl FactScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_files: MAX_FILES,
        }
    }

    /// Walk the project and produce the ground-truth snapshot.
    pub fn scan(&self) -> Result<FactSnapshot> {
        let root = &self.root;
        if !root.is_dir() {
            anyhow::bail!("project root is not a directory: {}", root.display());
        }

        let mut facts = FactSnapshot::default();
        let mut newest_source: Option<DateTime<Utc>> = None;

        let walker = WalkBuilder::new(root).hidden(true).build();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            let path = entry.path();
            if path == root {
                continue;
            }
            let rel = match path.strip_prefix(root) {
                Ok(r) => rel_string(r),
                Err(_) => continue,
            };

            if entry.file_type().is_some_and(|t| t.is_dir()) {
                facts.directories.insert(rel);
                continue;
            }
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if facts.total_files >= self.max_files {
                warn!("Reached max file limit ({}), stopping scan", self.max_files);
                break;
            }

            facts.total_files += 1;

            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if let Some(language) = language_for_extension(&ext.to_lowercase()) {
                    *facts.languages.entry(language.to_string()).or_insert(0) += 1;
                    if let Some(mtime) = file_mtime(path) {
                        newest_source = Some(match newest_source {
                            Some(current) => current.max(mtime),
                            None => mtime,
                        });
                    }
                }
            }

            if is_test_path(&rel) {
                facts.test_files += 1;
            }

            facts.files.insert(rel);
        }

        facts.source_modified = newest_source;
        self.read_manifests(&mut facts)?;
        self.collect_domain_terms(&mut facts);

        debug!(
            "Scanned {} files, {} languages, {} frameworks",
            facts.total_files,
            facts.languages.len(),
            facts.frameworks.len()
        );
        Ok(facts)
    }

    fn read_manifests(&self, facts: &mut FactSnapshot) -> Result<()> {
        let root = &self.root;

        if root.join("package.json").is_file() {
            self.read_package_json(facts)
                .context("reading package.json")?;
            let manager = if root.join("pnpm-lock.yaml").is_file() {
                "pnpm"
            } else if root.join("yarn.lock").is_file() {
                "yarn"
            } else if root.join("bun.lockb").is_file() {
                "bun"
            } else {
                "npm"
            };
            facts.toolchains.insert(manager.to_string());
            facts.toolchains.insert("npx".to_string());
        }

        if root.join("Cargo.toml").is_file() {
            self.read_cargo_toml(facts).context("reading Cargo.toml")?;
            facts.toolchains.insert("cargo".to_string());
            facts.commands.insert("cargo build".to_string());
            facts.commands.insert("cargo test".to_string());
        }

        if root.join("pyproject.toml").is_file() {
            self.read_pyproject(facts).context("reading pyproject.toml")?;
        }
        if root.join("requirements.txt").is_file() {
            self.read_requirements(facts)
                .context("reading requirements.txt")?;
        }
        if root.join("pyproject.toml").is_file() || root.join("requirements.txt").is_file() {
            let manager = if root.join("uv.lock").is_file() {
                "uv"
            } else if root.join("poetry.lock").is_file() {
                "poetry"
            } else {
                "pip"
            };
            facts.toolchains.insert(manager.to_string());
            facts.toolchains.insert("python".to_string());
        }

        if root.join("go.mod").is_file() {
            facts.toolchains.insert("go".to_string());
            facts.commands.insert("go build ./...".to_string());
            facts.commands.insert("go test ./...".to_string());
        }

        for name in ["Makefile", "makefile"] {
            let path = root.join(name);
            if path.is_file() {
                facts.toolchains.insert("make".to_string());
                if let Ok(content) = std::fs::read_to_string(&path) {
                    for cap in makefile_target_re().captures_iter(&content) {
                        let target = &cap[1];
                        if target != "PHONY" {
                            facts.commands.insert(format!("make {}", target));
                        }
                    }
                }
                break;
            }
        }

        Ok(())
    }

    fn read_package_json(&self, facts: &mut FactSnapshot) -> Result<()> {
        let content = std::fs::read_to_string(self.root.join("package.json"))?;
        let manifest: serde_json::Value = serde_json::from_str(&content)?;

        for key in ["dependencies", "devDependencies"] {
            if let Some(deps) = manifest.get(key).and_then(|v| v.as_object()) {
                for (name, version) in deps {
                    record_dependency(facts, name, version.as_str().unwrap_or(""));
                }
            }
        }

        if let Some(scripts) = manifest.get("scripts").and_then(|v| v.as_object()) {
            for name in scripts.keys() {
                facts.commands.insert(format!("npm run {}", name));
            }
        }
        Ok(())
    }

    fn read_cargo_toml(&self, facts: &mut FactSnapshot) -> Result<()> {
        let content = std::fs::read_to_string(self.root.join("Cargo.toml"))?;
        let manifest: toml::Value = toml::from_str(&content)?;

        for key in ["dependencies", "dev-dependencies"] {
            if let Some(deps) = manifest.get(key).and_then(|v| v.as_table()) {
                for (name, spec) in deps {
                    let version = match spec {
                        toml::Value::String(v) => v.clone(),
                        toml::Value::Table(t) => t
                            .get("version")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                        _ => String::new(),
                    };
                    record_dependency(facts, name, &version);
                }
            }
        }

        if let Some(name) = manifest
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
        {
            facts.domain_terms.insert(name.to_lowercase());
        }
        Ok(())
    }

    fn read_pyproject(&self, facts: &mut FactSnapshot) -> Result<()> {
        let content = std::fs::read_to_string(self.root.join("pyproject.toml"))?;
        let manifest: toml::Value = toml::from_str(&content)?;

        if let Some(deps) = manifest
            .get("project")
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
        {
            for dep in deps.iter().filter_map(|d| d.as_str()) {
                let (name, version) = split_requirement(dep);
                record_dependency(facts, name, version);
            }
        }
        Ok(())
    }

    fn read_requirements(&self, facts: &mut FactSnapshot) -> Result<()> {
        let content = std::fs::read_to_string(self.root.join("requirements.txt"))?;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }
            let (name, version) = split_requirement(line);
            record_dependency(facts, name, version);
        }
        Ok(())
    }

    /// Domain vocabulary: non-generic top-level directory names.
    fn collect_domain_terms(&self, facts: &mut FactSnapshot) {
        const GENERIC: &[&str] = &[
            "src", "lib", "tests", "test", "docs", "doc", "build", "dist", "target", "scripts",
            "bin", "assets", "static", "public", "vendor",
        ];
        let top_level: Vec<String> = facts
            .directories
            .iter()
            .filter(|d| !d.contains('/'))
            .cloned()
            .collect();
        for dir in top_level {
            let lower = dir.to_lowercase();
            if !GENERIC.contains(&lower.as_str()) {
                facts.domain_terms.insert(lower);
            }
        }
    }
}

fn record_dependency(facts: &mut FactSnapshot, name: &str, version: &str) {
    let lower = name.to_lowercase();
    if let Some(framework) = framework_for_dependency(&lower) {
        facts.frameworks.insert(framework.to_string());
    }
    if !version.is_empty() {
        facts
            .dependency_versions
            .insert(lower.clone(), version.trim().to_string());
    }
    facts.dependencies.insert(lower);
}

/// "django>=4.2" -> ("django", "4.2"); "flask" -> ("flask", "")
fn split_requirement(req: &str) -> (&str, &str) {
    let split_at = req.find(['=', '>', '<', '~', '!', ' ', ';']);
    match split_at {
        Some(pos) => {
            let version = req[pos..].trim_start_matches(['=', '>', '<', '~', '!', ' ']);
            let version = version.split(';').next().unwrap_or("").trim();
            (req[..pos].trim(), version)
        }
        None => (req.trim(), ""),
    }
}

fn rel_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_test_path(rel: &str) -> bool {
    let lower = rel.to_lowercase();
    let file = lower.rsplit('/').next().unwrap_or(&lower);
    lower.split('/').any(|seg| seg == "tests" || seg == "test" || seg == "__tests__")
        || file.starts_with("test_")
        || file.contains("_test.")
        || file.contains(".test.")
        || file.contains(".spec.")
}

fn file_mtime(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

/// Modification time helper for the audited document itself.
pub fn document_mtime(path: &Path) -> Option<DateTime<Utc>> {
    file_mtime(path)
}

/// Per-language counts formatted for display, most files first.
pub fn language_summary(languages: &BTreeMap<String, usize>) -> String {
    let mut pairs: Vec<(&String, &usize)> = languages.iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    pairs
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}
