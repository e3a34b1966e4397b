mod config;
mod test_runner;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use dedlee::markup::{Element, Node};
use dedlee::options::{CharacterClose, CompileOptions, LinkCapture};
use dedlee::parser::ParseError;

const SUBCOMMANDS: &[&str] = &["compile", "test", "help"];

#[derive(Parser)]
#[command(name = "dedlee", version, about = "Dedlee story compiler")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a dedlee story to story markup
    Compile(CompileArgs),

    /// Run .test.dl fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CompileArgs {
    /// Dedlee source file
    file: PathBuf,

    /// Write markup here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compile without writing output, report warnings (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the parsed node tree
    #[arg(long)]
    tree: bool,

    /// List every element with its id
    #[arg(long)]
    outline: bool,

    /// Options file (defaults to dedlee.toml next to the source)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match link placeholders leftmost-shortest
    #[arg(long)]
    lazy_links: bool,

    /// Leave link placeholders untouched
    #[arg(long)]
    no_links: bool,

    /// Closing tag for character blocks
    #[arg(long, value_enum)]
    character_close: Option<CloseTag>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CloseTag {
    Obj,
    Character,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.dl file or directory containing them
    path: PathBuf,

    /// Run only fixtures in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `dedlee story.dl` is shorthand for `dedlee compile story.dl`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|p| p + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "compile".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    match cli.command {
        Command::Compile(compile_args) => do_compile(compile_args, cli.no_color),
        Command::Test(test_args) => {
            if test_args.list_categories {
                test_runner::list_categories(&test_args.path);
                return;
            }
            let exit_code =
                test_runner::run_tests(&test_args.path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, wins over -v.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn do_compile(args: CompileArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file.display(), e);
            process::exit(1);
        }
    };

    let options = match resolve_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source.clone());

    log::info!("compiling {}", args.file.display());
    let story = match dedlee::compile_story(&source, file_id, options) {
        Ok(story) => story,
        Err(errors) => {
            emit_diagnostics(&writer, &files, &errors);
            process::exit(1);
        }
    };
    emit_diagnostics(&writer, &files, &story.warnings);

    // --check: compiled successfully, exit
    if args.check {
        let warnings = story.warnings.iter().filter(|w| w.is_warning()).count();
        eprintln!(
            "ok: {} parsed successfully ({} warning(s))",
            args.file.display(),
            warnings
        );
        return;
    }

    if args.tree {
        println!("{:#?}", story.nodes);
        return;
    }

    if args.outline {
        print_outline(&story.nodes);
        return;
    }

    let markup = story.to_string();
    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &markup) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            log::info!("wrote {} bytes to {}", markup.len(), path.display());
        }
        None => print!("{}", markup),
    }
}

fn resolve_options(args: &CompileArgs) -> Result<CompileOptions, String> {
    let mut options = config::load_options(args.config.as_deref(), &args.file)?;
    if args.lazy_links {
        options.link_capture = LinkCapture::Lazy;
    }
    if args.no_links {
        options.rewrite_links = false;
    }
    if let Some(close) = args.character_close {
        options.character_close = match close {
            CloseTag::Obj => CharacterClose::Obj,
            CloseTag::Character => CharacterClose::Character,
        };
    }
    Ok(options)
}

fn print_outline(nodes: &[Node]) {
    let mut pending: Vec<(usize, &Element)> = elements_of(nodes).rev().map(|e| (0, e)).collect();
    while let Some((depth, element)) = pending.pop() {
        println!("{}{}", "  ".repeat(depth), describe(element));
        pending.extend(elements_of(&element.children).rev().map(|e| (depth + 1, e)));
    }
}

fn elements_of(nodes: &[Node]) -> impl DoubleEndedIterator<Item = &Element> {
    nodes.iter().filter_map(|node| match node {
        Node::Element(element) => Some(element),
        _ => None,
    })
}

fn describe(element: &Element) -> String {
    let mut line = element.kind.tag_name().to_string();
    if let Some(id) = element.id() {
        line.push(' ');
        line.push_str(id);
    }
    if let Some(name) = element.attribute("inventoryName") {
        line.push_str(&format!(" \"{}\"", name));
    }
    if element.is_first_page() {
        line.push_str(" (first)");
    }
    line
}

fn emit_diagnostics(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    diagnostics: &[ParseError],
) {
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let _ = term::emit_to_write_style(
            &mut writer.lock(),
            &config,
            files,
            &diagnostic.to_diagnostic(),
        );
    }
}

