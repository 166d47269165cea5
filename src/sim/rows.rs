//! Sliding buffer of decoded rows
//!
//! Rows are appended at the tail as sections stream in and popped from the
//! head as they scroll off. Row indices are global and strictly increasing,
//! so a row keeps its index for its whole life regardless of retirement.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::section::{SectionLibrary, decode};
use crate::consts::TILE;

/// One decoded slice of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub index: u64,
    /// Occupied columns, left to right
    pub columns: Vec<u16>,
    /// Platforms for this row exist
    pub spawned: bool,
    /// Autotiler has run on this row
    pub textured: bool,
}

/// Left-truncating queue of rows plus the vertical anchor of its head
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowBuffer {
    rows: VecDeque<Row>,
    next_index: u64,
    /// Screen Y of the head row's top edge. Scrolls with the world.
    head_top: i32,
    /// Rows popped off the head so far
    retired: u64,
}

impl RowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows_retired(&self) -> u64 {
        self.retired
    }

    pub fn head_top(&self) -> i32 {
        self.head_top
    }

    /// Index the next appended row will get
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn head(&self) -> Option<&Row> {
        self.rows.front()
    }

    pub fn get(&self, index: u64) -> Option<&Row> {
        let head = self.rows.front()?.index;
        let offset = index.checked_sub(head)?;
        self.rows.get(offset as usize)
    }

    pub fn get_mut(&mut self, index: u64) -> Option<&mut Row> {
        let head = self.rows.front()?.index;
        let offset = index.checked_sub(head)?;
        self.rows.get_mut(offset as usize)
    }

    /// Append decoded rows at the tail, returning the index of the first
    pub fn append(&mut self, decoded: Vec<Vec<u16>>) -> u64 {
        let first = self.next_index;
        for columns in decoded {
            self.rows.push_back(Row {
                index: self.next_index,
                columns,
                spawned: false,
                textured: false,
            });
            self.next_index += 1;
        }
        first
    }

    /// Screen Y of a buffered row's top edge.
    ///
    /// Rows stack with no gaps: each row's top is the bottom of the row
    /// before it, empty rows included.
    pub fn row_top(&self, index: u64) -> Option<i32> {
        let head = self.rows.front()?.index;
        if index < head || index >= self.next_index {
            return None;
        }
        Some(self.head_top + crate::row_offset(index, head))
    }

    /// Oldest row that has not been spawned yet
    pub fn first_unspawned(&self) -> Option<u64> {
        self.rows.iter().find(|r| !r.spawned).map(|r| r.index)
    }

    /// Move the whole buffer up with the world
    pub fn scroll(&mut self, overflow: i32) {
        self.head_top -= overflow;
    }

    /// Pop spawned head rows whose bottom edge is above the visible origin.
    /// Returns how many were popped.
    pub fn retire_scrolled(&mut self) -> u64 {
        let mut popped = 0;
        while let Some(head) = self.rows.front() {
            if !head.spawned || self.head_top + TILE >= 0 {
                break;
            }
            log::debug!("Retiring row {}", head.index);
            self.rows.pop_front();
            self.head_top += TILE;
            self.retired += 1;
            popped += 1;
        }
        popped
    }
}

/// Stream one section into `rows` if the buffer is at or below the
/// low-water mark. Returns the section name and how many rows it added.
pub fn stream_if_low<R: Rng + ?Sized>(
    rows: &mut RowBuffer,
    library: &SectionLibrary,
    low_water: usize,
    rng: &mut R,
) -> Option<(String, usize)> {
    if rows.len() > low_water {
        return None;
    }
    let section = library.pick(rng)?;
    let decoded = decode(section);
    let count = decoded.len();
    let first = rows.append(decoded);
    log::info!(
        "Streamed section '{}': rows {}..{} (buffered {})",
        section.name,
        first,
        first + count as u64,
        rows.len()
    );
    Some((section.name.clone(), count))
}
