//! kiln command line.
//!
//! - `kiln convert page.html --css site.css --pretty` converts to builder JSON
//! - `kiln inspect-css site.css` summarizes a compiled stylesheet
//!
//! Any input path may be `-` to read standard input.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kiln_common::warning::set_quiet;
use kiln_convert::{ConvertOptions, convert_with_report};
use kiln_css::try_compile_stylesheet;
use owo_colors::OwoColorize;

/// Convert HTML and CSS into a site-builder element tree
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Convert a page with its stylesheet
    kiln convert index.html --css style.css --pretty

    # Keep inline styles on classes and scope custom CSS to elements
    kiln convert index.html --inline-styles class --selector-target id

    # Read HTML from stdin, write JSON to a file
    cat index.html | kiln convert - --output page.json

    # Summarize a stylesheet
    kiln inspect-css style.css
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an HTML document to builder JSON
    Convert(ConvertArgs),
    /// Print a summary of a compiled stylesheet
    InspectCss {
        /// CSS file, or `-` for stdin
        #[arg(value_name = "FILE")]
        css: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// HTML file, or `-` for stdin
    #[arg(value_name = "FILE")]
    html: PathBuf,

    /// Stylesheet to apply
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Script to embed (with --include-js)
    #[arg(long, value_name = "FILE")]
    js: Option<PathBuf>,

    /// Options as JSON text or a path to a JSON file; flags override it
    #[arg(long, value_name = "JSON|FILE")]
    options: Option<String>,

    /// What to do with `style` attributes: skip, inline or class
    #[arg(long, value_name = "MODE")]
    inline_styles: Option<String>,

    /// Label each element with its first class name
    #[arg(long)]
    show_node_class: bool,

    /// Keep tag and id selector declarations on elements instead of classes
    #[arg(long)]
    no_merge_non_class: bool,

    /// Where custom CSS is scoped: class or id
    #[arg(long, value_name = "TARGET")]
    selector_target: Option<String>,

    /// Embed the script as a code element
    #[arg(long)]
    include_js: bool,

    /// Pretty-print the JSON
    #[arg(short, long)]
    pretty: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suppress warnings and the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => run_convert(&args),
        Command::InspectCss { css } => inspect_css(&css),
    }
}

/// Read a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        let _ = io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    path.map_or_else(|| Ok(String::new()), read_input)
}

/// `--options` value first, then individual flags on top.
fn build_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = match &args.options {
        Some(raw) if raw.trim_start().starts_with('{') => {
            ConvertOptions::from_json(raw).context("invalid --options JSON")?
        }
        Some(path) => {
            let text = read_input(Path::new(path))?;
            ConvertOptions::from_json(&text)
                .with_context(|| format!("invalid options in {path}"))?
        }
        None => ConvertOptions::default(),
    };
    if let Some(mode) = &args.inline_styles {
        options.set("inlineStyleHandling", mode)?;
    }
    if let Some(target) = &args.selector_target {
        options.set("cssSelectorTarget", target)?;
    }
    if args.show_node_class {
        options.show_node_class = true;
    }
    if args.no_merge_non_class {
        options.merge_non_class_selectors = false;
    }
    if args.include_js {
        options.include_js = true;
    }
    Ok(options)
}

fn run_convert(args: &ConvertArgs) -> Result<()> {
    set_quiet(args.quiet);
    let options = build_options(args)?;
    let html = read_input(&args.html)?;
    let css = read_optional(args.css.as_deref())?;
    let js = read_optional(args.js.as_deref())?;

    let report = convert_with_report(&html, &css, &js, &options);
    let json = if args.pretty {
        report.document.to_json_pretty()?
    } else {
        report.document.to_json()?
    };

    match &args.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write stdout")?;
        }
    }

    if !args.quiet {
        let doc = &report.document;
        eprintln!(
            "{} {} elements, {} classes, {} issues",
            "converted".green(),
            doc.content.len(),
            doc.global_classes.len(),
            report.issues.len()
        );
    }
    Ok(())
}

fn inspect_css(path: &Path) -> Result<()> {
    let css = read_input(path)?;
    let styles = try_compile_stylesheet(&css)
        .with_context(|| format!("failed to compile {}", path.display()))?;

    println!("=== Selectors ===");
    let selectors = styles.selectors();
    println!("{} selectors in {} rule entries", selectors.len(), styles.entries.len());
    for selector in selectors {
        println!("  {selector} ({} declarations)", styles.declarations_for(selector).len());
    }

    println!("\n=== Variables ===");
    for (name, value) in &styles.variables {
        println!("  {name}: {value}");
    }

    println!("\n=== At-rules ===");
    println!("{} keyframes", styles.keyframes.len());
    println!("{} media blocks", styles.media_queries.len());
    println!("{} other at-rules", styles.other_at_rules.len());
    Ok(())
}
