mod debug_report;

use clap::{Args, Parser, Subcommand};
use padaccheda::{Analyzer, Error, Options, SutraEngine};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

/// Sanskrit sandhi splitter and sentence parser. Input and output are SLP1.
#[derive(Debug, Parser)]
#[command(name = "padaccheda", version)]
#[command(after_help = "Exit codes:\n  0  Success (including \"no split found\").\n  1  Runtime error.\n  2  Invalid arguments or configuration.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Options file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Force ANSI color output
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Segment a sentence into words
    Split(SplitArgs),
    /// Segment a sentence and parse each split
    Parse(ParseArgs),
    /// Join two words with sandhi
    Join { first: String, second: String },
    /// Undo sandhi in one word, at one position or all of them
    SandhiSplit {
        word: String,
        /// Char position to split at
        #[arg(long)]
        at: Option<usize>,
    },
    /// Derive the sandhi of two words from sutras, step by step
    Prakriya { left: String, right: String },
}

#[derive(Debug, Args)]
struct SplitArgs {
    /// Input text
    #[arg(required = true, num_args = 1..)]
    input: Vec<String>,

    /// Number of splits (overrides the options file)
    #[arg(short = 'n', long)]
    max_paths: Option<usize>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    split: SplitArgs,

    /// Parses shown per split
    #[arg(long, default_value_t = 2)]
    max_parses: usize,

    /// The input is already split into words
    #[arg(long, conflicts_with = "report")]
    pre_segmented: bool,

    /// Print timings and counters for every stage
    #[arg(long)]
    report: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::Config(_)) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> padaccheda::Result<()> {
    let mut options = match &cli.config {
        Some(path) => Options::from_path(path)?,
        None => Options::default(),
    };
    let color = !cli.no_color && (cli.color || io::stdout().is_terminal());

    match &cli.command {
        Command::Split(args) => {
            if let Some(n) = args.max_paths {
                options.max_paths = n;
            }
            let analyzer = Analyzer::new(options)?;
            split(&analyzer, &args.input.join(" "), cli.json)
        }
        Command::Parse(args) => {
            if let Some(n) = args.split.max_paths {
                options.max_paths = n;
            }
            let analyzer = Analyzer::new(options)?;
            parse(&analyzer, args, cli.json, color)
        }
        Command::Join { first, second } => {
            let analyzer = Analyzer::new(options)?;
            let joins: Vec<String> = analyzer.join(first, second).unwrap_or_default().into_iter().collect();
            print_list(&joins, cli.json, "No join found")
        }
        Command::SandhiSplit { word, at } => {
            let analyzer = Analyzer::new(options)?;
            let splits = match at {
                Some(idx) => analyzer.split_at(word, *idx),
                None => analyzer.split_all(word),
            };
            let pairs: Vec<String> = splits.unwrap_or_default().into_iter().map(|(l, r)| format!("{l} + {r}")).collect();
            print_list(&pairs, cli.json, "No split found")
        }
        Command::Prakriya { left, right } => {
            let prakriya = SutraEngine::default().sandhi(left, right);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&prakriya)?);
            } else {
                println!("{prakriya}");
            }
            Ok(())
        }
    }
}

fn split(analyzer: &Analyzer, text: &str, json: bool) -> padaccheda::Result<()> {
    let splits: Vec<Vec<String>> = match analyzer.analyze(text)? {
        Some(mut analysis) => {
            analysis.splits(analyzer.options().max_paths)?.iter().map(|s| s.rendered()).collect()
        }
        None => Vec::new(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&splits)?);
    } else if splits.is_empty() {
        println!("No splits found");
    } else {
        for s in &splits {
            println!("[{}]", s.join(", "));
        }
    }
    Ok(())
}

fn parse(analyzer: &Analyzer, args: &ParseArgs, json: bool, color: bool) -> padaccheda::Result<()> {
    let text = args.split.input.join(" ");
    if args.report {
        let res = analyzer.analyze_verbose(&text)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&res.splits)?);
        } else {
            debug_report::print_run(&res, args.max_parses, color);
        }
        return Ok(());
    }

    let analysis = if args.pre_segmented {
        let words: Vec<&str> = text.split_whitespace().collect();
        Some(analyzer.analyze_words(&words))
    } else {
        analyzer.analyze(&text)?
    };
    let Some(mut analysis) = analysis else {
        println!("{}", if json { "[]" } else { "No splits found" });
        return Ok(());
    };

    let splits = analysis.splits(analyzer.options().max_paths)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&splits)?);
        return Ok(());
    }
    for split in &splits {
        println!("Lexical split: {split}");
        let parses = split.parses();
        if parses.is_empty() {
            println!("  (no valid parse)");
        }
        for (i, p) in parses.iter().take(args.max_parses).enumerate() {
            println!("Parse {i} (cost {})", p.cost);
            println!("{p}");
        }
    }
    Ok(())
}

fn print_list(items: &[String], json: bool, empty: &str) -> padaccheda::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("{empty}");
    } else {
        for item in items {
            println!("{item}");
        }
    }
    Ok(())
}
