use std::io::IsTerminal;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use isls_conf::RuleConfig;
use isls_conf::Settings;
use isls_ide::DiagnosticRenderer;
use isls_server::Document;
use isls_server::Session;

use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Check {
    /// ISML file to check.
    source: Utf8PathBuf,

    /// JSON array of tokenizer events for SOURCE.
    #[arg(long)]
    events: Utf8PathBuf,

    /// Rule configuration to use instead of discovering `.htmlhintrc` files.
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

impl Command for Check {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let project_root = resolve_project_root()?;
        let mut settings = Settings::new(&project_root).context("Failed to load settings")?;

        if let Some(config) = &self.config {
            let text = std::fs::read_to_string(config)
                .with_context(|| format!("Failed to read rule config {config}"))?;
            let rules = RuleConfig::from_jsonc(&text)
                .with_context(|| format!("Failed to parse rule config {config}"))?;
            settings = settings.with_rules(rules);
        }

        let source_path = absolute(&project_root, &self.source);
        let source = std::fs::read_to_string(&source_path)
            .with_context(|| format!("Failed to read {source_path}"))?;
        let events = std::fs::read_to_string(&self.events)
            .with_context(|| format!("Failed to read events {}", self.events))?;
        let document = Document::from_json_events(source_path.clone(), source, &events)
            .with_context(|| format!("Failed to parse events {}", self.events))?;

        let mut session = Session::with_os_fs(settings);
        let findings = session
            .check(&document)
            .with_context(|| format!("Failed to validate {source_path}"))?;

        if findings.is_empty() {
            return Ok(Exit::success());
        }

        if !args.global.quiet {
            let fmt = pick_renderer();
            let path = self.source.as_str();
            for finding in &findings {
                println!("{}\n", fmt.render(document.text(), path, finding));
            }
        }

        let count = findings.len();
        let word = if count == 1 { "error" } else { "errors" };
        Ok(Exit::error().with_message(format!("Found {count} {word}.")))
    }
}

fn resolve_project_root() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| anyhow::anyhow!("Current directory is not valid UTF-8"))
}

fn absolute(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_relative() {
        root.join(path)
    } else {
        path.to_owned()
    }
}

fn pick_renderer() -> DiagnosticRenderer {
    if std::io::stdout().is_terminal() {
        DiagnosticRenderer::styled()
    } else {
        DiagnosticRenderer::plain()
    }
}
