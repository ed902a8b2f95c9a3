//! Receipt segments and the two ways of writing them out.
//!
//! A receipt is laid out once as a flat list of [`Segment`]s. The printer
//! serializer turns control segments into ESC/POS codes; the preview
//! serializer drops them and imitates alignment with spaces. Both walk the
//! same list, so the printed text and the preview cannot drift apart.

/// Horizontal alignment for the following lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A formatting instruction with no text of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reset the printer (ESC @).
    Init,
    Align(Align),
    BoldOn,
    BoldOff,
    /// Double width and height (GS ! 0x30).
    DoubleSize,
    /// Double height only (GS ! 0x10).
    DoubleHeight,
    /// Back to normal size (GS ! 0x00).
    NormalSize,
    LineFeed,
    /// Partial paper cut (GS V 1).
    PartialCut,
}

impl Command {
    /// ESC/POS encoding of this command.
    pub const fn escpos(&self) -> &'static str {
        match self {
            Command::Init => "\x1B@",
            Command::Align(Align::Left) => "\x1Ba\x00",
            Command::Align(Align::Center) => "\x1Ba\x01",
            Command::Align(Align::Right) => "\x1Ba\x02",
            Command::BoldOn => "\x1BE\x01",
            Command::BoldOff => "\x1BE\x00",
            Command::DoubleSize => "\x1D!\x30",
            Command::DoubleHeight => "\x1D!\x10",
            Command::NormalSize => "\x1D!\x00",
            Command::LineFeed => "\n",
            Command::PartialCut => "\x1DV\x01",
        }
    }
}

/// One element of a laid-out receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Control(Command),
}

// =============================================================================
// Builder
// =============================================================================

/// Fluent builder for a segment list.
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&mut self, command: Command) -> &mut Self {
        self.segments.push(Segment::Control(command));
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    /// Text followed by a line feed.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.text(text).command(Command::LineFeed)
    }

    pub fn feed(&mut self, lines: usize) -> &mut Self {
        for _ in 0..lines {
            self.command(Command::LineFeed);
        }
        self
    }

    pub fn align(&mut self, align: Align) -> &mut Self {
        self.command(Command::Align(align))
    }

    pub fn build(self) -> Vec<Segment> {
        self.segments
    }
}

// =============================================================================
// Serializers
// =============================================================================

/// Turns a segment list into its final string form.
pub trait SegmentSerializer {
    fn serialize(&self, segments: &[Segment]) -> String;
}

/// Printer output: text verbatim, commands as ESC/POS codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscPosSerializer;

impl SegmentSerializer for EscPosSerializer {
    fn serialize(&self, segments: &[Segment]) -> String {
        let mut out = String::with_capacity(1024);
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Control(command) => out.push_str(command.escpos()),
            }
        }
        out
    }
}

/// Plain-text output for on-screen preview.
///
/// Only alignment and line feeds have an effect. Centered and right-aligned
/// lines are padded on the left with spaces; no trailing spaces are added.
#[derive(Debug, Clone, Copy)]
pub struct PreviewSerializer {
    width: usize,
}

impl PreviewSerializer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn place(&self, text: &str, align: Align) -> String {
        let len = text.chars().count();
        let slack = self.width.saturating_sub(len);
        let indent = match align {
            Align::Left => 0,
            Align::Center => slack / 2,
            Align::Right => slack,
        };
        format!("{}{}", " ".repeat(indent), text)
    }
}

impl SegmentSerializer for PreviewSerializer {
    fn serialize(&self, segments: &[Segment]) -> String {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut align = Align::Left;

        for segment in segments {
            match segment {
                Segment::Text(text) => current.push_str(text),
                Segment::Control(Command::Align(next)) => align = *next,
                Segment::Control(Command::LineFeed) => {
                    lines.push(self.place(&current, align));
                    current.clear();
                }
                Segment::Control(_) => {}
            }
        }
        if !current.is_empty() {
            lines.push(self.place(&current, align));
        }

        lines.join("\n")
    }
}
