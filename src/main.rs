use clap::{Parser, Subcommand};
use proofsheet::config::SheetConfig;
use proofsheet::imaging::RustCodec;
use proofsheet::layout::PlanFile;
use proofsheet::render::pdf::PdfRenderer;
use proofsheet::{compose, config, layout, output, scan};
use std::path::PathBuf;

/// Layout overrides shared by commands that compute a plan.
///
/// Each flag overrides the matching `sheet.toml` key; unset flags leave the
/// file (or stock) value alone.
#[derive(clap::Args, Clone, Default)]
struct LayoutArgs {
    /// Images per row
    #[arg(long)]
    per_row: Option<u32>,

    /// Images per column
    #[arg(long)]
    per_column: Option<u32>,

    /// Breathing room inside each cell, in points
    #[arg(long)]
    padding: Option<f64>,

    /// Margin around the grid, in points
    #[arg(long)]
    margin: Option<f64>,

    /// Page width in points
    #[arg(long)]
    page_width: Option<f64>,

    /// Page height in points
    #[arg(long)]
    page_height: Option<f64>,

    /// Skip the filename captions under each image
    #[arg(long)]
    no_titles: bool,
}

impl LayoutArgs {
    fn apply(&self, config: &mut SheetConfig) {
        if let Some(v) = self.per_row {
            config.images_per_row = v;
        }
        if let Some(v) = self.per_column {
            config.images_per_column = v;
        }
        if let Some(v) = self.padding {
            config.image_padding = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.page_width {
            config.page_width = v;
        }
        if let Some(v) = self.page_height {
            config.page_height = v;
        }
        if self.no_titles {
            config.print_titles = false;
        }
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "proofsheet")]
#[command(about = "Contact-sheet PDFs from a directory of images")]
#[command(long_about = "\
Contact-sheet PDFs from a directory of images

Lays the images out on a fixed grid across as many pages as needed. Images
are taken in natural filename order (img2 before img10), shrunk to fit their
grid cell without distortion, centered, and captioned with their filename.
Dotted guide lines mark the cell boundaries on every page.

Configuration resolves in three layers: stock defaults, then an optional
sheet.toml in the image directory, then CLI flags.

Run 'proofsheet gen-config' to print a documented sheet.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing the source images
    #[arg(long, default_value = "images", global = true)]
    source: PathBuf,

    /// Output PDF path
    #[arg(long, default_value = "sheet.pdf", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest, plan)
    #[arg(long, default_value = ".proofsheet-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the image directory into a manifest
    Scan,
    /// Compute the layout plan from the manifest
    Plan(LayoutArgs),
    /// Render the PDF from the plan
    Render,
    /// Run the full pipeline: scan → plan → render
    Build(LayoutArgs),
    /// Validate configuration and image directory without rendering
    Check(LayoutArgs),
    /// Print a stock sheet.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source, &RustCodec::new())?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Plan(layout_args) => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: scan::Manifest = serde_json::from_str(&manifest_content)?;

            let mut sheet = manifest.config.clone();
            layout_args.apply(&mut sheet);
            sheet.validate()?;

            let instructions = layout::plan(&manifest.entries, &sheet);
            output::print_plan_output(&instructions, sheet.images_per_row, sheet.images_per_column);

            let plan_path = cli.temp_dir.join("plan.json");
            let plan_file = PlanFile {
                config: sheet,
                instructions,
            };
            std::fs::write(&plan_path, serde_json::to_string_pretty(&plan_file)?)?;
        }
        Command::Render => {
            let plan_path = cli.temp_dir.join("plan.json");
            let plan_content = std::fs::read_to_string(&plan_path)?;
            let plan_file: PlanFile = serde_json::from_str(&plan_content)?;

            if plan_file.instructions.is_empty() {
                println!("Nothing to render: the plan is empty");
                return Ok(());
            }

            let mut renderer = PdfRenderer::new(
                plan_file.config.page_width,
                plan_file.config.page_height,
                RustCodec::new(),
            );
            let summary = compose::compose(plan_file.instructions, &mut renderer, &cli.output)?;
            output::print_render_output(&summary, &cli.output);
        }
        Command::Build(layout_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source, &RustCodec::new())?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join("manifest.json"), json)?;
            output::print_scan_output(&manifest);

            let mut sheet = manifest.config.clone();
            layout_args.apply(&mut sheet);
            sheet.validate()?;

            if manifest.entries.is_empty() {
                // Diagnostic already printed by the scan output; no pages,
                // no output file.
                return Ok(());
            }

            println!("==> Stage 2: Computing layout");
            let instructions = layout::plan(&manifest.entries, &sheet);
            output::print_plan_output(&instructions, sheet.images_per_row, sheet.images_per_column);
            let plan_file = PlanFile {
                config: sheet.clone(),
                instructions: instructions.clone(),
            };
            std::fs::write(
                cli.temp_dir.join("plan.json"),
                serde_json::to_string_pretty(&plan_file)?,
            )?;

            println!("==> Stage 3: Rendering PDF → {}", cli.output.display());
            let mut renderer =
                PdfRenderer::new(sheet.page_width, sheet.page_height, RustCodec::new());
            let summary = compose::compose(instructions, &mut renderer, &cli.output)?;
            output::print_render_output(&summary, &cli.output);
        }
        Command::Check(layout_args) => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source, &RustCodec::new())?;

            let mut sheet = manifest.config.clone();
            layout_args.apply(&mut sheet);
            sheet.validate()?;

            output::print_scan_output(&manifest);
            println!("==> Configuration and content are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
