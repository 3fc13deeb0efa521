// ABOUTME: Main entry point for the slidecraft program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use slidecraft::{
    outline::limit_outline, palette, AssetResolver, Config, ContentMap, DeckError,
    GoogleImageSearch, Template, TemplateCatalog,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a content map with a template into a PPTX file
    Render(RenderArgs),

    /// Post-process a generated content map (closing slides, images)
    Prepare(PrepareArgs),

    /// List the templates in a catalog directory
    Templates(TemplatesArgs),

    /// Print a CSS background derived from an image's dominant colors
    Backdrop(BackdropArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Path to the content map JSON file
    #[arg(short, long)]
    content_map: PathBuf,

    /// Path to a template JSON file
    #[arg(short, long, conflicts_with = "template_id", required_unless_present = "template_id")]
    template: Option<PathBuf>,

    /// Id of a template in the catalog directory
    #[arg(long)]
    template_id: Option<String>,

    /// Template catalog directory (defaults to TEMPLATES_DIR or ./templates)
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Directory for the generated PPTX (defaults to OUTPUT_DIR or .)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct PrepareArgs {
    /// Path to the content map JSON file
    #[arg(short, long)]
    content_map: PathBuf,

    /// Outline the content map was generated from (JSON array or fenced block)
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Where to write the prepared content map (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Look up missing images with the configured image search
    #[arg(long)]
    search: bool,
}

#[derive(Args)]
struct TemplatesArgs {
    /// Template catalog directory (defaults to TEMPLATES_DIR or ./templates)
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[derive(Args)]
struct BackdropArgs {
    /// Image to sample
    #[arg(short, long)]
    image: PathBuf,
}

fn render(config: &Config, args: &RenderArgs) -> anyhow::Result<()> {
    let content_map = ContentMap::from_file(&args.content_map)
        .with_context(|| format!("Failed to load content map {:?}", args.content_map))?;

    let template = match (&args.template, &args.template_id) {
        (Some(path), _) => Template::from_file(path)
            .with_context(|| format!("Failed to load template {:?}", path))?,
        (None, Some(id)) => {
            let dir = args.templates_dir.as_ref().unwrap_or(&config.templates_dir);
            let catalog = TemplateCatalog::load(dir)?;
            catalog
                .find(id)
                .cloned()
                .ok_or_else(|| DeckError::TemplateNotFound(id.clone()))?
        }
        (None, None) => anyhow::bail!("Either --template or --template-id is required"),
    };

    let resolver = AssetResolver::from_config(&config.resolver_config())?;
    let artifact = slidecraft::assemble(&content_map, &template, &resolver)?;

    let output_dir = args.output_dir.as_ref().unwrap_or(&config.output_dir);
    let path = artifact.write_to(output_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn prepare(config: &Config, args: &PrepareArgs) -> anyhow::Result<()> {
    let mut content_map = ContentMap::from_file(&args.content_map)
        .with_context(|| format!("Failed to load content map {:?}", args.content_map))?;

    let outline = match &args.outline {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read outline {:?}", path))?;
            let parsed = slidecraft::parse_outline_response(&raw)?;
            limit_outline(&parsed, config.outline_limit)
        }
        None => Vec::new(),
    };

    slidecraft::finalize_content_map(&mut content_map, &outline);

    if args.search {
        match config.search_config() {
            Some(search_config) => {
                let search = GoogleImageSearch::new(search_config)?;
                slidecraft::enrich_images(&mut content_map, &search);
            }
            None => warn!("GOOGLE_API_KEY or GOOGLE_CX not configured, skipping image search"),
        }
    }

    let json = content_map.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            slidecraft::utils::ensure_parent_directory_exists(path)?;
            fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Prepared content map written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn list_templates(config: &Config, args: &TemplatesArgs) -> anyhow::Result<()> {
    let dir = args.dir.as_ref().unwrap_or(&config.templates_dir);
    let catalog = TemplateCatalog::load(dir)?;

    for (i, template) in catalog.iter().enumerate() {
        let layouts: Vec<&str> = template.layouts.keys().map(String::as_str).collect();
        println!(
            "{}{}\t{}\t{}",
            if i == 0 { "* " } else { "  " },
            template.id.as_deref().unwrap_or("-"),
            template.label(),
            layouts.join(", ")
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match &cli.command {
        Some(Commands::Render(args)) => render(&config, args),
        Some(Commands::Prepare(args)) => prepare(&config, args),
        Some(Commands::Templates(args)) => list_templates(&config, args),
        Some(Commands::Backdrop(args)) => palette::estimate_from_file(&args.image)
            .map(|backdrop| println!("{}", backdrop.to_css()))
            .map_err(anyhow::Error::from),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
