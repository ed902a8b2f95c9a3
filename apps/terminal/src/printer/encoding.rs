//! Receipt text to printer bytes.
//!
//! Receipts are laid out as Unicode text, but counter printers run a
//! single-byte code page. Before sending, text is converted to Windows-1252
//! (ESC/POS code table 16). ESC/POS commands are ASCII and pass through
//! unchanged.
//!
//! Glyphs the code page lacks are replaced:
//! - `═` and `─` print as `=` and `-`
//! - `₹` prints as `Rs`; the extra column comes out of the widest run of
//!   spaces on the same line so columns stay aligned
//! - anything else prints as `?`

use encoding_rs::WINDOWS_1252;
use tracing::instrument;

/// ESC @ (initialize). Resets the code table.
const INIT: &str = "\x1B@";

/// ESC @ followed by ESC t 16 (select WPC1252).
const INIT_WPC1252: &str = "\x1B@\x1Bt\x10";

/// ESC t 16: select WPC1252.
pub const SELECT_WPC1252: [u8; 3] = [0x1B, 0x74, 0x10];

/// Converts a rendered receipt to bytes for a WPC1252 printer.
///
/// The code table is selected up front and again after every initialize.
#[instrument(skip(receipt))]
pub fn encode_receipt(receipt: &str) -> Vec<u8> {
    let receipt = receipt.replace(INIT, INIT_WPC1252);
    let mut out = Vec::with_capacity(receipt.len() + SELECT_WPC1252.len());
    if !receipt.starts_with(INIT) {
        out.extend_from_slice(&SELECT_WPC1252);
    }

    for line in receipt.split_inclusive('\n') {
        encode_text(&substitute(line), &mut out);
    }
    out
}

/// Replaces glyphs missing from the code page, keeping the line width.
///
/// A line with no run of two or more spaces to give up grows by one column
/// per `₹`.
fn substitute(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 2);
    let mut extra = 0;
    for c in line.chars() {
        match c {
            '═' => out.push('='),
            '─' => out.push('-'),
            '₹' => {
                out.push_str("Rs");
                extra += 1;
            }
            c => out.push(c),
        }
    }

    for _ in 0..extra {
        if !take_space(&mut out) {
            break;
        }
    }
    out
}

/// Removes one space from the longest run of two or more spaces.
fn take_space(line: &mut String) -> bool {
    let bytes = line.as_bytes();
    let (mut best_start, mut best_len) = (0, 0);
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b' ' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        if i - start > best_len {
            best_start = start;
            best_len = i - start;
        }
    }

    if best_len < 2 {
        return false;
    }
    line.remove(best_start);
    true
}

fn encode_text(text: &str, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
}
