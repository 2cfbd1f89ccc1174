use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use onboarding_report::fonts::FontSource;
use onboarding_report::{RenderOptions, Role, parse_request, render_submission};

#[derive(Parser)]
#[command(name = "onboarding-report")]
#[command(version)]
#[command(about = "Render an onboarding form submission as a PDF report", long_about = None)]
struct Cli {
    /// Submission JSON (bare record or {"submission", "requester"})
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (defaults to the suggested filename in --out-dir)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Directory for the suggested filename
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// TrueType font for regular text (overrides ONBOARDING_REPORT_FONT)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// TrueType font for bold text (overrides ONBOARDING_REPORT_FONT_BOLD)
    #[arg(long, value_name = "FILE")]
    font_bold: Option<PathBuf>,

    /// Brand printed in the footer and the letter
    #[arg(long)]
    brand: Option<String>,

    /// Header title
    #[arg(long)]
    title: Option<String>,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,

    /// Role of the person requesting the report
    #[arg(long, value_enum)]
    role: Option<RoleArg>,

    /// Name of the person requesting the report
    #[arg(long, value_name = "NAME")]
    requester: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Agent,
    Client,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Agent => Role::Agent,
            RoleArg::Client => Role::Client,
        }
    }
}

fn options(cli: &Cli) -> RenderOptions {
    let mut options = RenderOptions::from_env();
    if let Some(path) = &cli.font {
        options.font_regular = FontSource::File(path.clone());
        if cli.font_bold.is_none() {
            options.font_bold = options.font_regular.clone();
        }
    }
    if let Some(path) = &cli.font_bold {
        options.font_bold = FontSource::File(path.clone());
    }
    if let Some(brand) = &cli.brand {
        options.brand = brand.clone();
    }
    if let Some(title) = &cli.title {
        options.title = title.clone();
    }
    if cli.no_compress {
        options.compress_streams = false;
    }
    options
}

fn run(cli: &Cli) -> onboarding_report::Result<PathBuf> {
    let raw = std::fs::read(&cli.input)?;
    let mut request = parse_request(&raw)?;
    if let Some(role) = cli.role {
        request.requester.role = role.into();
    }
    if let Some(name) = &cli.requester {
        request.requester.full_name = Some(name.clone());
    }

    let report = render_submission(&request, &options(cli))?;
    let target = match &cli.output {
        Some(path) => path.clone(),
        None => cli.out_dir.join(&report.filename),
    };
    std::fs::write(&target, &report.bytes)?;
    log::info!("{} pages written to {}", report.page_count, target.display());
    Ok(target)
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
