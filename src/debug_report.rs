use padaccheda::{ParseItem, VerboseAnalysis};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(run: &VerboseAnalysis, max_parses: usize, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Analyzing: \"{}\"", run.input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Segmentation ━━━", ansi::GRAY));
    print_segmentation(run, &palette);

    println!("\n{}", palette.paint("━━━ Splits ━━━", ansi::GRAY));
    if run.splits.is_empty() {
        println!("{}", palette.dim("  No split found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • A word is missing from the lexicon");
        println!("  • No sandhi rule undoes the junction");
        println!("\n{}", palette.dim("  Tip: run with -vv to see every rejected candidate"));
    } else {
        print_splits(run, max_parses, &palette);
    }

    let m = &run.metrics;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Segment: {}  │  Paths: {}  │  Parse: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.paint(format!("{:?}", m.segment.duration), ansi::CYAN),
        palette.dim(format!("{:?}", m.paths)),
        palette.dim(format!("{:?}", m.parse.duration)),
    );
    println!();
}

fn print_segmentation(run: &VerboseAnalysis, palette: &ansi::Palette) {
    let s = &run.metrics.segment;
    let rows = [
        ("substrings explored", s.substrings_explored),
        ("scoreboard hits", s.scoreboard_hits),
        ("sandhi proposals", s.sandhi_proposals),
        ("lexicon rejections", s.lexicon_rejections),
        ("graph nodes", s.graph_nodes),
        ("graph edges", s.graph_edges),
    ];
    for (label, value) in rows {
        println!("  {} {}", palette.paint(format!("{label:<20}"), ansi::BLUE), palette.paint(value.to_string(), ansi::YELLOW));
    }
}

fn print_splits(run: &VerboseAnalysis, max_parses: usize, palette: &ansi::Palette) {
    for (idx, split) in run.splits.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(split.words.join(" "), ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("{} parses", split.parses.len()), ansi::YELLOW),
        );
        for (p, parse) in split.parses.iter().take(max_parses).enumerate() {
            println!("      {} {}", palette.dim(format!("parse {p}, cost")), palette.paint(parse.cost.to_string(), ansi::CYAN));
            for item in &parse.graph {
                println!("        {}", fmt_item(item, palette));
            }
        }
        if split.parses.len() > max_parses {
            println!("      {}", palette.dim(format!("... +{} more", split.parses.len() - max_parses)));
        }
    }
}

fn fmt_item(item: &ParseItem, palette: &ansi::Palette) -> String {
    match item {
        ParseItem::Edge(e) => format!(
            "{} {} {} {}",
            palette.paint(&e.node.pada, ansi::BLUE),
            palette.dim(format!("({})", e.node.root)),
            palette.paint(format!("─{}→", e.sambandha), ansi::CYAN),
            e.predecessor
        ),
        ParseItem::Node(n) => {
            format!("{} {} {}", palette.paint(&n.pada, ansi::BLUE), palette.dim(format!("({})", n.root)), palette.dim(n.tags.join(" ")))
        }
    }
}
