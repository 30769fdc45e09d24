//! CLI output formatting.
//!
//! Output is slot-centric: each slot leads with its index and grid position,
//! with the source identifier and adjustment as indented context lines.
//!
//! # Output Format
//!
//! ## Show
//!
//! ```text
//! Slots
//! 0 top-left     dawn
//!     Source: photos/dawn.jpg
//!     Adjustment: exposure +20, shadow -30, highlight +10
//! 1 top-right    (empty)
//! 2 bottom-left  paste_tmp_2
//!     Source: .quadframe/paste_tmp_2.png
//! 3 bottom-right (empty)
//! ```
//!
//! ## Export
//!
//! ```text
//! Exported 1920x1080 → ./dawn_none_paste_tmp_2_none_1920x1080.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::{Adjustment, OutputSize, TilePosition};
use crate::naming::source_stem;
use crate::slot::{Slot, SlotId};
use crate::store::SlotStore;
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn position_label(position: TilePosition) -> &'static str {
    match position {
        TilePosition::TopLeft => "top-left",
        TilePosition::TopRight => "top-right",
        TilePosition::BottomLeft => "bottom-left",
        TilePosition::BottomRight => "bottom-right",
    }
}

/// Signed adjustment summary, e.g. `exposure +20, shadow -30, highlight 0`.
fn adjustment_line(adjustment: Adjustment) -> String {
    fn signed(value: i32) -> String {
        if value > 0 {
            format!("+{value}")
        } else {
            value.to_string()
        }
    }
    format!(
        "exposure {}, shadow {}, highlight {}",
        signed(adjustment.exposure),
        signed(adjustment.shadow),
        signed(adjustment.highlight)
    )
}

/// Header line for a slot: index, padded position, and name.
///
/// ```text
/// 0 top-left     dawn
/// 3 bottom-right (empty)
/// ```
fn slot_header(slot: &Slot) -> String {
    let name = if slot.is_empty() {
        "(empty)".to_string()
    } else {
        source_stem(slot.source())
    };
    format!(
        "{} {:<12} {}",
        slot.id(),
        position_label(slot.id().position()),
        name
    )
}

// ============================================================================
// show
// ============================================================================

/// Format the state of all four slots.
///
/// Neutral adjustments are omitted; a non-neutral adjustment is shown even for
/// an empty slot, since it applies to whatever is loaded next.
pub fn format_slots(store: &SlotStore) -> Vec<String> {
    let mut lines = vec!["Slots".to_string()];
    for slot in store.slots() {
        lines.push(slot_header(slot));
        if !slot.is_empty() {
            lines.push(format!("{}Source: {}", indent(1), slot.source()));
        }
        if !slot.adjustment().is_neutral() {
            lines.push(format!(
                "{}Adjustment: {}",
                indent(1),
                adjustment_line(slot.adjustment())
            ));
        }
    }
    lines
}

pub fn print_slots(store: &SlotStore) {
    for line in format_slots(store) {
        println!("{}", line);
    }
}

// ============================================================================
// Single-slot commands
// ============================================================================

/// One-line confirmation after `load` / `paste` / `adjust`.
pub fn format_slot_update(slot: &Slot) -> Vec<String> {
    let mut lines = vec![slot_header(slot)];
    if !slot.adjustment().is_neutral() {
        lines.push(format!(
            "{}Adjustment: {}",
            indent(1),
            adjustment_line(slot.adjustment())
        ));
    }
    lines
}

pub fn print_slot_update(slot: &Slot) {
    for line in format_slot_update(slot) {
        println!("{}", line);
    }
}

/// Result of dropping slot `source` on slot `dest`.
pub fn format_swap(dest: SlotId, source: SlotId) -> Vec<String> {
    if dest == source {
        vec![format!("Slot {dest} dropped on itself, nothing changed")]
    } else {
        vec![format!("Swapped slot {source} ↔ slot {dest}")]
    }
}

pub fn print_swap(dest: SlotId, source: SlotId) {
    for line in format_swap(dest, source) {
        println!("{}", line);
    }
}

// ============================================================================
// preview / export
// ============================================================================

pub fn format_preview(path: &Path, size: OutputSize) -> Vec<String> {
    vec![format!("Preview {} → {}", size, path.display())]
}

pub fn print_preview(path: &Path, size: OutputSize) {
    for line in format_preview(path, size) {
        println!("{}", line);
    }
}

/// `None` means every slot was empty and nothing was written.
pub fn format_export(path: Option<&Path>, size: OutputSize) -> Vec<String> {
    match path {
        Some(path) => vec![format!("Exported {} → {}", size, path.display())],
        None => vec!["Nothing to export: all slots are empty".to_string()],
    }
}

pub fn print_export(path: Option<&Path>, size: OutputSize) {
    for line in format_export(path, size) {
        println!("{}", line);
    }
}
