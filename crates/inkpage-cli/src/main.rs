//! InkPage command line: validate and render stored pages.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use inkpage_core::{
    CompositionDocument, EditorConfig, EditorSession, Element, LoadReport, StoredPage,
};
use inkpage_render::{
    DevicePreset, DisplayList, PreviewRenderer, PublicRenderer, RenderError, Renderer,
};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "inkpage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a page and print what was kept and what was skipped.
    Check {
        /// Stored page or bare document JSON.
        page: PathBuf,

        /// Editor configuration JSON; elements below its minimum size are
        /// listed.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the display list of a page as JSON.
    Render {
        /// Stored page or bare document JSON.
        page: PathBuf,

        /// iphone, android, ipad, desktop or public.
        #[arg(long, default_value = "iphone")]
        device: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to encode display list: {0}")]
    Encode(serde_json::Error),
}

enum Target {
    Preview(DevicePreset),
    Public,
}

impl Target {
    fn parse(name: &str) -> Result<Self, CliError> {
        if name.eq_ignore_ascii_case("public") {
            return Ok(Target::Public);
        }
        DevicePreset::from_name(name)
            .map(Target::Preview)
            .ok_or_else(|| CliError::UnknownDevice(name.to_string()))
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    EditorConfig::from_json(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_page(path: &Path) -> Result<StoredPage, CliError> {
    let mut page = StoredPage::from_json(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if page.id.is_empty() {
        if let Some(stem) = path.file_stem() {
            page.id = stem.to_string_lossy().into_owned();
        }
    }
    Ok(page)
}

/// Manipulable elements smaller than `config.min_element_size` on either
/// axis. The editor would clamp them on their next resize.
fn undersized<'a>(document: &'a CompositionDocument, config: &EditorConfig) -> Vec<&'a Element> {
    let min = config.min_element_size;
    document
        .elements()
        .iter()
        .filter(|e| e.is_manipulable())
        .filter(|e| e.frame.size.width < min.width || e.frame.size.height < min.height)
        .collect()
}

fn print_report(page: &StoredPage, report: &LoadReport) {
    println!("page:       {} ({})", page.id, page.title);
    println!("published:  {}", page.published);
    println!(
        "loaded:     {} element(s), {} stroke(s)",
        report.loaded, report.strokes
    );
    if report.background_defaulted {
        println!("background: default gradient");
    }
    for old in &report.renamed {
        println!("renamed:    duplicate id {old}");
    }
    for rejected in &report.rejected {
        println!(
            "skipped:    #{} {}: {}",
            rejected.index,
            rejected.id.as_deref().unwrap_or("<no id>"),
            rejected.reason
        );
    }
}

fn cmd_check(page_path: &Path, config: EditorConfig) -> Result<bool, CliError> {
    let page = load_page(page_path)?;
    let mut session = EditorSession::loading(config);
    let report = session.finish_loading(&page);
    print_report(&page, &report);
    let min = session.config().min_element_size;
    for element in undersized(session.document(), session.config()) {
        println!(
            "undersized: {} {}x{} (minimum {}x{})",
            element.id(),
            element.frame.size.width,
            element.frame.size.height,
            min.width,
            min.height
        );
    }
    Ok(report.is_clean())
}

fn cmd_render(page_path: &Path, device: &str) -> Result<(), CliError> {
    let target = Target::parse(device)?;
    let page = load_page(page_path)?;
    let list: DisplayList = match target {
        Target::Public => {
            let (renderer, _) = PublicRenderer::from_page(&page)?;
            renderer.render()
        }
        Target::Preview(preset) => {
            let (document, _) = page.to_document();
            PreviewRenderer::new(document).with_device(preset).render()
        }
    };
    println!("{}", list.to_json().map_err(CliError::Encode)?);
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.cmd {
        Command::Check { page, config } => {
            let config = load_config(config.as_deref())?;
            log::debug!("Using {:?}", config);
            let clean = cmd_check(&page, config)?;
            Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Command::Render { page, device } => {
            cmd_render(&page, &device)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
