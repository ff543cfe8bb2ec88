mod shell;
mod source;

use std::io;

use clap::{Parser, Subcommand};
use tagmend_fixer::Document;
use tagmend_render::{render_with, RenderOptions, DEFAULT_INDENT_WIDTH};

use crate::shell::{Shell, ShellOptions};

#[derive(Parser)]
#[command(name = "tagmend")]
#[command(about = "tagmend: tokenize HTML and repair its tag nesting")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session (the default)
    Shell {
        #[command(flatten)]
        options: Options,
    },

    /// List the tags of a page
    Tags {
        /// File path or http(s) URL, blank for an empty page
        source: String,

        /// Print the tags as JSON
        #[arg(long)]
        json: bool,

        /// Fail on unterminated comments and malformed tags
        #[arg(long)]
        strict: bool,
    },

    /// Print a page one tag per line, as written
    Print {
        /// File path or http(s) URL, blank for an empty page
        source: String,

        #[command(flatten)]
        options: Options,
    },

    /// Repair a page's nesting and print the result
    Fix {
        /// File path or http(s) URL, blank for an empty page
        source: String,

        #[command(flatten)]
        options: Options,
    },
}

#[derive(clap::Args)]
struct Options {
    /// Spaces per nesting level
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH)]
    indent: usize,

    /// Fail on unterminated comments and malformed tags
    #[arg(long)]
    strict: bool,
}

impl Options {
    fn render(&self) -> RenderOptions {
        RenderOptions::with_indent_width(self.indent)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        None => cmd_shell(&Options {
            indent: DEFAULT_INDENT_WIDTH,
            strict: false,
        }),
        Some(Command::Shell { options }) => cmd_shell(&options),
        Some(Command::Tags {
            source,
            json,
            strict,
        }) => cmd_tags(&source, json, strict),
        Some(Command::Print { source, options }) => cmd_print(&source, &options),
        Some(Command::Fix { source, options }) => cmd_fix(&source, &options),
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

fn load_document(address: &str, strict: bool) -> Document {
    let text = match source::load(address) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if !strict {
        return Document::parse(&text);
    }
    match Document::parse_strict(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {address}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_shell(options: &Options) {
    let shell_options = ShellOptions {
        strict: options.strict,
        render: options.render(),
    };
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), source::load, shell_options);
    if let Err(e) = shell.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    log::debug!("session ended with {} tags", shell.document().len());
}

fn cmd_tags(address: &str, json: bool, strict: bool) {
    let doc = load_document(address, strict);

    if json {
        match serde_json::to_string_pretty(doc.sequence()) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    for tag in doc.sequence() {
        println!("{tag}");
    }
}

fn cmd_print(address: &str, options: &Options) {
    let doc = load_document(address, options.strict);
    print!("{}", render_with(doc.sequence(), &options.render()));
}

fn cmd_fix(address: &str, options: &Options) {
    let mut doc = load_document(address, options.strict);
    let report = doc.fix();
    print!("{}", render_with(doc.sequence(), &options.render()));
    eprintln!(
        "Fixed: {} closing tags inserted, {} dropped",
        report.synthesized, report.discarded
    );
}
