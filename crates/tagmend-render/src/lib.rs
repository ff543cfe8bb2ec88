//! tagmend Renderer
//!
//! Prints a tag sequence one tag per line, indented by nesting depth.
//!
//! ```text
//! <ul>
//!     <li>
//!         one
//!     </li>
//! </ul>
//! ```
//!
//! The renderer trusts the sequence: an unbalanced one renders with
//! uneven indentation, never below column zero.

use tagmend_lexer::Tag;

/// Spaces per nesting level unless configured otherwise.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl RenderOptions {
    pub fn with_indent_width(indent_width: usize) -> Self {
        Self { indent_width }
    }
}

/// Render tags with the default four-space indentation.
pub fn render<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> String {
    render_with(tags, &RenderOptions::default())
}

/// Render tags with explicit options.
pub fn render_with<'a>(tags: impl IntoIterator<Item = &'a Tag>, options: &RenderOptions) -> String {
    let mut renderer = Renderer::new(options);
    for tag in tags {
        renderer.push(tag);
    }
    renderer.finish()
}

/// Incremental renderer. Tracks the current depth between tags.
pub struct Renderer {
    unit: String,
    depth: usize,
    out: String,
}

impl Renderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            unit: " ".repeat(options.indent_width),
            depth: 0,
            out: String::new(),
        }
    }

    /// Render one tag on its own line.
    pub fn push(&mut self, tag: &Tag) {
        match tag {
            Tag::Opening { .. } => {
                self.write_line(tag);
                self.depth += 1;
            }
            Tag::Closing { .. } => {
                self.depth = self.depth.saturating_sub(1);
                self.write_line(tag);
            }
            Tag::SelfClosing { .. } | Tag::Comment { .. } | Tag::Content { .. } => {
                self.write_line(tag);
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write_line(&mut self, tag: &Tag) {
        for _ in 0..self.depth {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(&tag.to_string());
        self.out.push('\n');
    }
}
