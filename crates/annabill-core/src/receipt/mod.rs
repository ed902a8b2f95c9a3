//! # Receipt Formatter
//!
//! Lays out a [`Bill`] for a 58mm thermal printer (32 characters per line)
//! and for on-screen preview.
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────────┐
//! │            AnnaBill            │  centered, double size
//! │════════════════════════════════│
//! │Chicken Biryani (Full)  ×1 ₹200 │  name padded/truncated, qty, line total
//! │  + Raita                       │  add-ons, "×q" only above one
//! │--------------------------------│
//! │                     TOTAL: ₹200│  bold, double height, right-aligned
//! │--------------------------------│
//! │     Bill No: BP-20241115-001   │  centered
//! │       15/11/2024  13:05        │
//! │          [ DINE-IN ]           │  bold
//! │════════════════════════════════│
//! │     Thank You! Visit Again     │
//! │                                │  feed, then partial cut (printer only)
//! └────────────────────────────────┘
//! ```
//!
//! ## One Layout, Two Outputs
//! The layout is built once as [`Segment`]s. [`render_receipt`] keeps the
//! ESC/POS codes for the printer, [`render_preview`] drops them. The text
//! lines of both are identical apart from the spaces used for centering.
//!
//! Widths are counted in Unicode scalar values, so `₹` and `═` count as one
//! column each. Names that do not fit are cut, without an ellipsis.

mod segment;

pub use segment::{
    Align, Command, EscPosSerializer, PreviewSerializer, Segment, SegmentBuilder,
    SegmentSerializer,
};

use crate::pricing::{display_name, format_currency};
use crate::types::Bill;
use crate::DEFAULT_SHOP_NAME;

/// Characters per line on a 58mm roll.
pub const LINE_WIDTH: usize = 32;

/// Rule under the header and above the footer.
pub const HEAVY_RULE_CHAR: char = '═';

/// Rule around the total.
pub const LIGHT_RULE_CHAR: char = '-';

pub const FOOTER_TEXT: &str = "Thank You! Visit Again";

/// Blank lines fed before the cut so the footer clears the blade.
const TRAILING_FEED: usize = 2;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

// =============================================================================
// Public API
// =============================================================================

/// Printer-ready receipt: text with ESC/POS control codes.
///
/// `shop_name` overrides the configured default header.
pub fn render_receipt(bill: &Bill, shop_name: Option<&str>) -> String {
    EscPosSerializer.serialize(&layout(bill, shop_name))
}

/// Plain-text receipt for the preview screen.
pub fn render_preview(bill: &Bill, shop_name: Option<&str>) -> String {
    PreviewSerializer::new(LINE_WIDTH).serialize(&layout(bill, shop_name))
}

/// Builds the segment list for a bill.
pub fn layout(bill: &Bill, shop_name: Option<&str>) -> Vec<Segment> {
    let shop_name = shop_name.unwrap_or(DEFAULT_SHOP_NAME);
    let mut b = SegmentBuilder::new();

    // Header
    b.command(Command::Init)
        .align(Align::Center)
        .command(Command::DoubleSize)
        .text(shop_name)
        .command(Command::NormalSize)
        .command(Command::LineFeed)
        .line(rule(HEAVY_RULE_CHAR));

    // Items
    b.align(Align::Left);
    for line in &bill.items {
        b.line(format_item_line(
            &display_name(line),
            line.quantity,
            &format_currency(line.line_total()),
        ));
        for add_on in line.add_ons.iter().filter(|a| a.quantity > 0) {
            b.line(format_add_on_line(&add_on.name, add_on.quantity));
        }
    }
    b.line(rule(LIGHT_RULE_CHAR));

    // Total
    b.command(Command::BoldOn)
        .command(Command::DoubleHeight)
        .text(pad_left(
            &format!("TOTAL: {}", format_currency(bill.total)),
            LINE_WIDTH,
        ))
        .command(Command::NormalSize)
        .command(Command::BoldOff)
        .command(Command::LineFeed)
        .line(rule(LIGHT_RULE_CHAR));

    // Bill info
    b.align(Align::Center)
        .line(format!("Bill No: {}", bill.bill_number))
        .line(format!(
            "{}  {}",
            bill.created_at.format(DATE_FORMAT),
            bill.created_at.format(TIME_FORMAT)
        ))
        .command(Command::BoldOn)
        .text(bill.order_type.receipt_tag())
        .command(Command::BoldOff)
        .command(Command::LineFeed);

    // Footer
    b.line(rule(HEAVY_RULE_CHAR))
        .line(FOOTER_TEXT)
        .feed(TRAILING_FEED)
        .command(Command::PartialCut);

    b.build()
}

// =============================================================================
// Line Helpers
// =============================================================================

fn rule(c: char) -> String {
    std::iter::repeat(c).take(LINE_WIDTH).collect()
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Pads with spaces on the right, or cuts, to exactly `target` columns.
pub fn pad_right(text: &str, target: usize) -> String {
    let len = width(text);
    if len >= target {
        truncate(text, target)
    } else {
        format!("{}{}", text, " ".repeat(target - len))
    }
}

/// Pads with spaces on the left, or cuts, to exactly `target` columns.
pub fn pad_left(text: &str, target: usize) -> String {
    let len = width(text);
    if len >= target {
        truncate(text, target)
    } else {
        format!("{}{}", " ".repeat(target - len), text)
    }
}

/// `<name> ×<qty> <price>`, exactly [`LINE_WIDTH`] columns.
///
/// The name takes whatever the quantity and price leave over.
pub fn format_item_line(name: &str, quantity: u32, price: &str) -> String {
    let qty = format!("×{quantity}");
    let name_width = LINE_WIDTH.saturating_sub(width(price) + width(&qty) + 2);
    format!("{} {} {}", pad_right(name, name_width), qty, price)
}

/// `  + <name>`, with ` ×<qty>` when more than one.
pub fn format_add_on_line(name: &str, quantity: u32) -> String {
    let line = if quantity > 1 {
        format!("  + {name} ×{quantity}")
    } else {
        format!("  + {name}")
    };
    truncate(&line, LINE_WIDTH)
}

// =============================================================================
// Unit Tests
// =============================================================================
