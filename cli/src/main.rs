//! uncal CLI - academic calendar event extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use uncal::parser::{collect_fragments_blocking, LopdfBackend, PdfBackend};
use uncal::profile::parse_semester;
use uncal::{
    AcademicProfile, AliasTable, DateOptions, JsonFormat, LayoutOptions, LocatorOptions,
    PageSelection, ParseOptions, Pipeline, PipelineOptions,
};

#[derive(Parser)]
#[command(name = "uncal")]
#[command(version)]
#[command(about = "Extract dated events from academic calendar PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the events of one program and semester as JSON
    Events {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Program name (e.g., "cse", "B.Tech", "MCA")
        #[arg(short, long, env = "UNCAL_PROGRAM")]
        program: String,

        /// Semester, as "5" or "S5"
        #[arg(short, long, value_parser = semester_arg)]
        semester: Option<u32>,

        /// Curriculum scheme year
        #[arg(long)]
        scheme: Option<u32>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Directory for the CSV inspection file
        #[arg(long, value_name = "DIR", env = "UNCAL_CSV_DIR")]
        csv_dir: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Print the reconstructed text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the text after boilerplate removal
        #[arg(short, long)]
        normalized: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// List the program blocks found in a calendar
    Blocks {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Highlight the block selected for this program
        #[arg(short, long)]
        program: Option<String>,

        /// Semester, as "5" or "S5"
        #[arg(short, long, value_parser = semester_arg)]
        semester: Option<u32>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Options shared by every command that runs the pipeline.
#[derive(Args)]
struct PipelineArgs {
    /// Return no events when no block matches (default: use the whole text)
    #[arg(long)]
    strict: bool,

    /// Year for dates written without one (default: current academic year)
    #[arg(long)]
    year: Option<i32>,

    /// Extra program alias, as NAME=PROGRAM (repeatable)
    #[arg(long = "alias", value_name = "NAME=PROGRAM")]
    aliases: Vec<String>,

    /// Horizontal gap that starts a new column
    #[arg(long, default_value = "40")]
    gap: f32,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Skip pages whose content cannot be decoded
    #[arg(long)]
    lenient: bool,
}

impl PipelineArgs {
    fn options(&self) -> Result<PipelineOptions, Box<dyn std::error::Error>> {
        let mut parse = ParseOptions::new();
        if let Some(p) = &self.pages {
            let selection =
                PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?;
            parse = parse.with_pages(selection);
        }
        if self.lenient {
            parse = parse.lenient();
        }

        let mut aliases = AliasTable::default();
        for entry in &self.aliases {
            aliases.insert_entry(entry)?;
        }
        let mut locator = LocatorOptions::new().with_aliases(aliases);
        if self.strict {
            locator = locator.strict();
        }

        let mut date = DateOptions::new();
        if let Some(year) = self.year {
            date = date.with_year_hint(year);
        }

        Ok(PipelineOptions::new()
            .with_parse(parse)
            .with_layout(LayoutOptions::new().with_gap_threshold(self.gap))
            .with_locator(locator)
            .with_date(date))
    }
}

fn semester_arg(value: &str) -> Result<u32, String> {
    parse_semester(value).ok_or_else(|| format!("invalid semester {:?}, expected e.g. 5 or S5", value))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Events {
            input,
            program,
            semester,
            scheme,
            output,
            compact,
            csv_dir,
            pipeline,
        }) => {
            let mut profile = AcademicProfile::new(program);
            profile.semester = semester;
            profile.scheme = scheme;
            cmd_events(&input, &profile, output.as_deref(), compact, csv_dir, &pipeline)
        }
        Some(Commands::Text {
            input,
            output,
            normalized,
            pipeline,
        }) => cmd_text(&input, output.as_deref(), normalized, &pipeline),
        Some(Commands::Blocks {
            input,
            program,
            semester,
            pipeline,
        }) => {
            let profile = program.map(|p| {
                let mut profile = AcademicProfile::new(p);
                profile.semester = semester;
                profile
            });
            cmd_blocks(&input, profile.as_ref(), &pipeline)
        }
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: uncal events <FILE> --program <PROGRAM>".yellow());
            println!("       uncal --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message);
    pb
}

fn cmd_events(
    input: &Path,
    profile: &AcademicProfile,
    output: Option<&Path>,
    compact: bool,
    csv_dir: Option<PathBuf>,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = args.options()?;
    if let Some(dir) = csv_dir {
        fs::create_dir_all(&dir)?;
        options = options.with_csv_dir(dir);
    }
    let pipeline = Pipeline::new(options);
    let data = fs::read(input)?;

    let pb = spinner("Extracting events...");
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(pipeline.extract(data, profile));
    pb.finish_and_clear();
    let events = result?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = uncal::to_json(&events, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} ({} events)",
            "Saved to".green(),
            path.display(),
            events.len()
        );
    } else {
        println!("{}", json);
    }

    if events.is_empty() {
        eprintln!("{}", "No events found for this profile".yellow());
    }

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    normalized: bool,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options()?;
    let parse = options.parse.clone();
    let pipeline = Pipeline::new(options);

    let data = fs::read(input)?;
    let rows = collect_fragments_blocking(&data, &parse)?;
    let mut text = pipeline.reconstruct(&rows).to_string();
    if normalized {
        text = pipeline.normalizer().normalize(&text);
    }

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_blocks(
    input: &Path,
    profile: Option<&AcademicProfile>,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options()?;
    let parse = options.parse.clone();
    let pipeline = Pipeline::new(options);

    let data = fs::read(input)?;
    let rows = collect_fragments_blocking(&data, &parse)?;
    let text = pipeline.reconstruct(&rows).to_string();
    let normalized = pipeline.normalizer().normalize(&text);

    let segments = pipeline.locator().segments(&normalized);
    let selected = profile.map(|p| pipeline.locator().locate(&normalized, p));

    println!("{} ({})", "Program Blocks".cyan().bold(), segments.len());
    println!("{}", "─".repeat(40).dimmed());

    for (index, segment) in segments.iter().enumerate() {
        let heading = segment
            .lines()
            .skip(1)
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        let lines = segment.lines().count();
        let marker = match &selected {
            Some(block) if block.origin == uncal::BlockOrigin::Segment(index) => "*".green().bold(),
            _ => " ".normal(),
        };
        println!(
            "{} {:>3}  {}  {}",
            marker,
            index,
            heading.bold(),
            format!("({} lines)", lines).dimmed()
        );
    }

    if let Some(block) = selected {
        if !block.is_match() {
            println!(
                "\n{} {:?}",
                "No block matched the profile; fallback:".yellow(),
                block.origin
            );
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let header = uncal::sniff(&data)?;
    let backend = LopdfBackend::load_bytes(&data)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), header);
    println!("{}: {}", "Pages".bold(), backend.pages().len());

    let rows = collect_fragments_blocking(&data, &ParseOptions::new().lenient())?;
    let fragments: usize = rows
        .values()
        .flat_map(|page| page.values())
        .map(Vec::len)
        .sum();
    let row_count: usize = rows.values().map(|page| page.len()).sum();

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Fragments".bold(), fragments);
    println!("{}: {}", "Rows".bold(), row_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "uncal".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Academic calendar event extraction tool");
}
