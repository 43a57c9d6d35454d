//! Streaming XML writer used by the encoders.

use quick_xml::escape::escape;

const INDENT: &str = "  ";

struct Frame {
    tag: String,
    inline: bool,
}

/// Indenting XML writer.
///
/// Elements are opened with [`XmlWriter::open`], decorated with attributes
/// while their start tag is still pending, and closed with
/// [`XmlWriter::close`]. Elements closed without content are written as
/// empty-element tags.
///
/// ```
/// use metro_dom::XmlWriter;
///
/// let mut writer = XmlWriter::new();
/// writer.open("component").attr("type", "acme.Widget");
/// writer.open("parts");
/// writer.close();
/// writer.close();
/// assert_eq!(
///     writer.finish(),
///     "<component type=\"acme.Widget\">\n  <parts/>\n</component>\n"
/// );
/// ```
#[derive(Default)]
pub struct XmlWriter {
    out: String,
    stack: Vec<Frame>,
    pending: bool,
}

impl XmlWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the XML declaration.
    pub fn declaration(&mut self) -> &mut Self {
        self.out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n");
        self
    }

    /// Opens a child element of the current element.
    pub fn open(&mut self, tag: &str) -> &mut Self {
        self.seal(true);
        self.indent(self.stack.len());
        self.out.push('<');
        self.out.push_str(tag);
        self.stack.push(Frame {
            tag: tag.to_string(),
            inline: false,
        });
        self.pending = true;
        self
    }

    /// Adds an attribute to the element whose start tag is pending.
    ///
    /// Attributes written after the start tag has been sealed are ignored.
    pub fn attr(&mut self, name: &str, value: impl AsRef<str>) -> &mut Self {
        if !self.pending {
            tracing::warn!(name, "attribute written after start tag was sealed");
            return self;
        }
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape(value.as_ref()));
        self.out.push('"');
        self
    }

    /// Adds an attribute when `value` is present.
    pub fn attr_opt(&mut self, name: &str, value: Option<impl AsRef<str>>) -> &mut Self {
        if let Some(value) = value {
            self.attr(name, value);
        }
        self
    }

    /// Writes escaped text content inside the current element.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.seal(false);
        if let Some(frame) = self.stack.last_mut() {
            frame.inline = true;
        }
        self.out.push_str(&escape(text));
        self
    }

    /// Closes the current element.
    pub fn close(&mut self) -> &mut Self {
        let Some(frame) = self.stack.pop() else {
            return self;
        };
        if self.pending {
            self.out.push_str("/>\n");
            self.pending = false;
            return self;
        }
        if !frame.inline {
            self.indent(self.stack.len());
        }
        self.out.push_str("</");
        self.out.push_str(&frame.tag);
        self.out.push_str(">\n");
        self
    }

    /// Closes any open elements and returns the document.
    #[must_use]
    pub fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.close();
        }
        self.out
    }

    fn seal(&mut self, newline: bool) {
        if self.pending {
            self.out.push('>');
            if newline {
                self.out.push('\n');
            }
            self.pending = false;
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}
