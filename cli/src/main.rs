//! certgen CLI - certificate generation tool

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use certgen::deliver::{DirectoryExporter, Dispatcher};
use certgen::job::{GenerationJob, GenerationRequest};
use certgen::render::progress_channel;
use certgen::store::{upload, AssetKind, AssetStore, DirectoryStore};
use certgen::{BatchEvent, FontCatalog, RenderOptions, RosterOptions, RosterParser};

#[derive(Parser)]
#[command(name = "certgen")]
#[command(version)]
#[command(about = "Generate certificates from a roster and a PDF template", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns and record count of a roster
    InspectRoster {
        /// Roster file
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Cell delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
    },

    /// Show template information
    InspectTemplate {
        /// Template PDF
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Reduce a PDF to its first page
    Normalize {
        /// Input PDF
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// List font families and their weights
    Fonts {
        /// Font catalog JSON
        #[arg(long, value_name = "FILE", env = "CERTGEN_FONT_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// Store a roster or template upload
    Upload {
        /// Store directory
        #[arg(long, value_name = "DIR", env = "CERTGEN_STORE")]
        store: PathBuf,

        /// Roster file to store
        #[arg(long, value_name = "FILE", conflicts_with = "certificate", required_unless_present = "certificate")]
        csv: Option<PathBuf>,

        /// Template PDF to store
        #[arg(long, value_name = "FILE")]
        certificate: Option<PathBuf>,
    },

    /// Generate certificates for a request
    Generate {
        /// Generation request JSON
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Store directory
        #[arg(long, value_name = "DIR", env = "CERTGEN_STORE")]
        store: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Worker threads (0 = one per CPU)
        #[arg(long, default_value = "0", env = "CERTGEN_WORKERS")]
        workers: usize,

        /// Page points per placement unit
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Font catalog JSON
        #[arg(long, value_name = "FILE", env = "CERTGEN_FONT_CATALOG")]
        catalog: Option<PathBuf>,

        /// Do not write manifest.json
        #[arg(long)]
        no_manifest: bool,

        /// Print the delivery report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::InspectRoster { input, delimiter } => cmd_inspect_roster(&input, delimiter),
        Commands::InspectTemplate { input } => cmd_inspect_template(&input),
        Commands::Normalize { input, output } => cmd_normalize(&input, &output),
        Commands::Fonts { catalog } => cmd_fonts(catalog.as_deref()),
        Commands::Upload {
            store,
            csv,
            certificate,
        } => cmd_upload(&store, csv.as_deref(), certificate.as_deref()),
        Commands::Generate {
            request,
            store,
            output,
            workers,
            scale,
            catalog,
            no_manifest,
            json,
        } => cmd_generate(
            &request,
            &store,
            &output,
            RenderOptions::new().with_workers(workers).with_scale(scale),
            catalog.as_deref(),
            no_manifest,
            json,
        ),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        let (kind, code) = match e.downcast_ref::<certgen::Error>() {
            Some(err) if err.is_validation() => (err.kind().as_str(), 2),
            Some(err) => (err.kind().as_str(), 1),
            None => ("other", 1),
        };
        eprintln!("{}: {}", format!("error[{}]", kind).red().bold(), e);
        std::process::exit(code);
    }
}

fn load_catalog(path: Option<&Path>) -> Result<FontCatalog, certgen::Error> {
    match path {
        Some(p) => FontCatalog::from_json_file(p),
        None => Ok(FontCatalog::builtin()),
    }
}

fn cmd_inspect_roster(input: &Path, delimiter: char) -> CmdResult {
    let data = fs::read(input)?;
    let parser = RosterParser::with_options(RosterOptions::new().with_delimiter(delimiter));
    let roster = parser.parse_bytes(&data)?;

    println!("{}", "Roster".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Records".bold(), roster.len());
    println!(
        "{}: {}",
        "E-mail column".bold(),
        roster.email_column().unwrap_or("-")
    );
    println!("{}:", "Columns".bold());
    for (i, header) in roster.headers().iter().enumerate() {
        let branch = if i + 1 == roster.headers().len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), header);
    }
    Ok(())
}

fn cmd_inspect_template(input: &Path) -> CmdResult {
    let template = certgen::ingest_template_file(input)?;
    let page = template.page_box();

    println!("{}", "Template".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), template.pdf_version());
    println!("{}: {}", "Source pages".bold(), template.source_page_count());
    println!(
        "{}: {:.1} x {:.1} pt (origin {:.1}, {:.1})",
        "Page".bold(),
        template.width(),
        template.height(),
        page.llx,
        page.lly
    );
    if template.source_page_count() > 1 {
        println!(
            "{} only the first page is used",
            "Note:".yellow().bold()
        );
    }
    Ok(())
}

fn cmd_normalize(input: &Path, output: &Path) -> CmdResult {
    let template = certgen::ingest_template_file(input)?;
    fs::write(output, template.bytes())?;
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_fonts(catalog: Option<&Path>) -> CmdResult {
    let catalog = load_catalog(catalog)?;

    println!("{}", "Font families".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for family in catalog.families() {
        println!("{} ({})", family.id.bold(), family.name);
        for weight in family.weights() {
            println!("  {} {} {}", "├─".dimmed(), weight.value(), weight.label());
        }
    }
    Ok(())
}

fn cmd_upload(store_dir: &Path, csv: Option<&Path>, certificate: Option<&Path>) -> CmdResult {
    let store = DirectoryStore::open(store_dir)?;
    let (kind, path) = match (csv, certificate) {
        (Some(p), _) => (AssetKind::Roster, p),
        (None, Some(p)) => (AssetKind::Template, p),
        (None, None) => return Err("either --csv or --certificate is required".into()),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let asset = upload(&store, kind, &name, &fs::read(path)?)?;

    println!("{} {} as {}", "Stored".green(), kind, asset.name.bold());
    println!(
        "  {} {}",
        "└─".dimmed(),
        store.dir(kind).join(&asset.name).display()
    );
    Ok(())
}

fn cmd_generate(
    request_path: &Path,
    store_dir: &Path,
    output: &Path,
    options: RenderOptions,
    catalog: Option<&Path>,
    no_manifest: bool,
    json: bool,
) -> CmdResult {
    let store = DirectoryStore::open(store_dir)?;
    let catalog = load_catalog(catalog)?;
    let request = GenerationRequest::from_json_file(request_path)?;
    let job = GenerationJob::resolve(&store, catalog, &request)?;
    log::debug!(
        "Resolved request against {} ({} roster(s) stored)",
        store.root().display(),
        store.list(AssetKind::Roster)?.len()
    );

    let pb = ProgressBar::new(job.snapshot().roster.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Rendering...");

    let (tx, rx) = progress_channel();
    let bar = pb.clone();
    let listener = thread::spawn(move || {
        for event in rx {
            match event {
                BatchEvent::Started { total } => bar.set_length(total as u64),
                BatchEvent::RecordRendered { .. } => bar.inc(1),
                BatchEvent::Finished => bar.set_message("Writing files..."),
            }
        }
    });

    let rendered = job.render(options.with_progress(tx));
    let _ = listener.join();
    let batch = match rendered {
        Ok(batch) => batch,
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e.into());
        }
    };

    let mut exporter = DirectoryExporter::new(output);
    if no_manifest {
        exporter = exporter.without_manifest();
    }
    let report = exporter.dispatch(&batch)?;
    pb.finish_with_message("Done!");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\n{} {} certificate(s) generated",
        "Done!".green().bold(),
        report.count
    );
    for (i, entry) in report.documents.iter().enumerate() {
        let branch = if i + 1 == report.documents.len() && report.manifest_path.is_none() {
            "└─"
        } else {
            "├─"
        };
        println!("  {} {}", branch.dimmed(), output.join(&entry.file).display());
    }
    if let Some(ref manifest) = report.manifest_path {
        println!("  {} {}", "└─".dimmed(), manifest.display());
    }

    if batch.has_warnings() {
        println!(
            "\n{} {}",
            "Warnings:".yellow().bold(),
            batch.warnings.len()
        );
        for warning in &batch.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "certgen".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Certificate generation tool");
    println!();
    println!("Library: certgen {}", env!("CARGO_PKG_VERSION"));
    println!("License: MIT");
}
