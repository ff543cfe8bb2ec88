//! Interactive command loop.
//!
//! ```text
//! (a)dd, (g)etTags, (f)ixHTML, (s)et URL, (p)rint (q)uit?
//! ```
//!
//! Commands are picked by their first letter. The loop starts by asking for
//! a source and ends on `q` or end of input.

use std::io::{self, BufRead, Write};

use tagmend_fixer::Document;
use tagmend_lexer::Tag;
use tagmend_render::{render_with, RenderOptions};

use crate::source::SourceError;

const MENU: &str = "(a)dd, (g)etTags, (f)ixHTML, (s)et URL, (p)rint (q)uit? ";
const SOURCE_PROMPT: &str = "Page URL or file name (blank for empty): ";
const TAG_PROMPT: &str = "What tag (such as '<table>' or '</p>')? ";

/// Shell configuration.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    pub strict: bool,
    pub render: RenderOptions,
}

pub struct Shell<R, W, L> {
    input: R,
    output: W,
    load: L,
    options: ShellOptions,
    document: Document,
}

impl<R, W, L> Shell<R, W, L>
where
    R: BufRead,
    W: Write,
    L: FnMut(&str) -> Result<String, SourceError>,
{
    pub fn new(input: R, output: W, load: L, options: ShellOptions) -> Self {
        Self {
            input,
            output,
            load,
            options,
            document: Document::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Run until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        let mut choice = String::from("s");

        loop {
            match choice.chars().next() {
                Some('s') => {
                    if !self.set_source()? {
                        return Ok(());
                    }
                }
                Some('a') => {
                    if !self.add_tag()? {
                        return Ok(());
                    }
                }
                Some('g') => self.list_tags()?,
                Some('f') => self.fix(),
                Some('p') => self.print()?,
                Some('q') => return Ok(()),
                _ => {}
            }

            writeln!(self.output)?;
            match self.prompt(MENU)? {
                Some(line) => choice = line.to_lowercase(),
                None => return Ok(()),
            }
        }
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for a source until one loads. Returns false at end of input.
    fn set_source(&mut self) -> io::Result<bool> {
        loop {
            let Some(address) = self.prompt(SOURCE_PROMPT)? else {
                return Ok(false);
            };

            let text = match (self.load)(&address) {
                Ok(text) => text,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    writeln!(self.output, "Couldn't resolve input. Try again!")?;
                    continue;
                }
            };

            let document = if self.options.strict {
                match Document::parse_strict(&text) {
                    Ok(document) => document,
                    Err(e) => {
                        writeln!(self.output, "{e}")?;
                        continue;
                    }
                }
            } else {
                Document::parse(&text)
            };

            log::info!("loaded {} tags", document.len());
            self.document = document;
            return Ok(true);
        }
    }

    /// Returns false at end of input.
    fn add_tag(&mut self) -> io::Result<bool> {
        let Some(literal) = self.prompt(TAG_PROMPT)? else {
            return Ok(false);
        };
        match literal.parse::<Tag>() {
            Ok(tag) => self.document.add(tag),
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(true)
    }

    fn list_tags(&mut self) -> io::Result<()> {
        let tags: Vec<String> = self
            .document
            .tags()
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(self.output, "[{}]", tags.join(", "))
    }

    fn fix(&mut self) {
        let report = self.document.fix();
        log::info!(
            "fixed: {} closing tags inserted, {} dropped",
            report.synthesized,
            report.discarded
        );
    }

    fn print(&mut self) -> io::Result<()> {
        let rendered = render_with(self.document.sequence(), &self.options.render);
        writeln!(self.output, "{rendered}")
    }
}
