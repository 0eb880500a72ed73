//! Ordered working set of pages drawn from one or more source documents.
//!
//! A [`PageSet`] is what the assembled document will contain, in order. Every
//! successful mutation records a snapshot so it can be undone; failed calls
//! and calls that match nothing leave both the entries and the history alone.

use crate::error::PageSetError;
use crate::page_range::RangeSpec;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u16")]
pub enum Rotation {
    #[default]
    None,
    Right, // 90° clockwise
    Down,  // 180°
    Left,  // 90° counter-clockwise
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Right => 90,
            Rotation::Down => 180,
            Rotation::Left => 270,
        }
    }

    /// Nearest quarter turn for an arbitrary (possibly negative) angle.
    pub fn from_degrees(degrees: i64) -> Self {
        let quarter = (degrees.rem_euclid(360) + 45) / 90 % 4;
        match quarter {
            1 => Rotation::Right,
            2 => Rotation::Down,
            3 => Rotation::Left,
            _ => Rotation::None,
        }
    }

    pub fn turn(self, direction: Direction) -> Self {
        match direction {
            Direction::Right => Rotation::from_degrees(i64::from(self.degrees()) + 90),
            Direction::Left => Rotation::from_degrees(i64::from(self.degrees()) - 90),
        }
    }

    /// Combine with a page's existing `/Rotate` value.
    pub fn apply_to(self, existing: i64) -> i64 {
        (existing + i64::from(self.degrees())).rem_euclid(360)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Identity of a page within a [`PageSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PageId {
    pub document_id: String,
    /// 0-based index into the source document
    pub source_index: u32,
}

impl PageId {
    pub fn new(document_id: impl Into<String>, source_index: u32) -> Self {
        PageId {
            document_id: document_id.into(),
            source_index,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document_id, self.source_index + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    id: PageId,
    source_document: String,
    rotation: Rotation,
    selected: bool,
}

impl PageRef {
    pub fn new(document_id: impl Into<String>, source_index: u32) -> Self {
        let document_id = document_id.into();
        PageRef {
            source_document: document_id.clone(),
            id: PageId {
                document_id,
                source_index,
            },
            rotation: Rotation::None,
            selected: false,
        }
    }

    /// A copy of `self` under a different document id, still read from the
    /// same source page.
    fn copy_as(&self, document_id: String) -> Self {
        PageRef {
            id: PageId {
                document_id,
                source_index: self.id.source_index,
            },
            source_document: self.source_document.clone(),
            rotation: self.rotation,
            selected: false,
        }
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn document_id(&self) -> &str {
        &self.id.document_id
    }

    pub fn source_index(&self) -> u32 {
        self.id.source_index
    }

    /// The loaded document the page content comes from.
    pub fn source_document(&self) -> &str {
        &self.source_document
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_copy(&self) -> bool {
        self.id.document_id != self.source_document
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageSet {
    entries: Vec<PageRef>,
    undo_stack: Vec<Vec<PageRef>>,
    redo_stack: Vec<Vec<PageRef>>,
    history_limit: Option<usize>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` undo snapshots, dropping the oldest first.
    pub fn with_history_limit(limit: usize) -> Self {
        PageSet {
            history_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Every page of one document, in order, with no history.
    pub fn from_document(document_id: &str, page_count: u32) -> Self {
        PageSet {
            entries: (0..page_count)
                .map(|i| PageRef::new(document_id, i))
                .collect(),
            ..Self::default()
        }
    }

    /// A set holding `pages` in order, with no history.
    pub fn from_pages(pages: Vec<PageRef>) -> Result<Self, PageSetError> {
        let mut set = PageSet::new();
        set.append(pages)?;
        set.undo_stack.clear();
        Ok(set)
    }

    pub fn entries(&self) -> &[PageRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry count as a page total for range parsing, saturating at `u32::MAX`.
    pub fn page_total(&self) -> u32 {
        u32::try_from(self.entries.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &PageId) -> Option<&PageRef> {
        self.position(id).map(|i| &self.entries[i])
    }

    pub fn position(&self, id: &PageId) -> Option<usize> {
        self.entries.iter().position(|p| &p.id == id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &PageRef> {
        self.entries.iter().filter(|p| p.selected)
    }

    /// Identities of the entries at the given 1-based positions. Positions
    /// past the end are skipped.
    pub fn ids_at(&self, positions: &RangeSpec) -> Vec<PageId> {
        positions
            .indices()
            .filter_map(|i| self.entries.get(i))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn append(&mut self, pages: Vec<PageRef>) -> Result<(), PageSetError> {
        let mut seen: HashSet<&PageId> = self.entries.iter().map(|p| &p.id).collect();
        for page in &pages {
            if !seen.insert(&page.id) {
                return Err(PageSetError::DuplicateIdentity(page.id.clone()));
            }
        }
        if pages.is_empty() {
            return Ok(());
        }

        self.checkpoint();
        self.entries.extend(pages);
        Ok(())
    }

    /// Returns `false` if no entry has this identity.
    pub fn toggle_select(&mut self, id: &PageId) -> bool {
        let Some(index) = self.find(id, "toggle_select") else {
            return false;
        };
        self.checkpoint();
        let page = &mut self.entries[index];
        page.selected = !page.selected;
        true
    }

    pub fn select_all(&mut self) {
        self.set_all_selected(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all_selected(false);
    }

    /// Select the entries at the given 1-based positions, leaving the rest as
    /// they are. Returns how many entries became selected.
    pub fn select_positions(&mut self, positions: &RangeSpec) -> usize {
        let targets: Vec<usize> = positions
            .indices()
            .filter(|&i| i < self.entries.len() && !self.entries[i].selected)
            .collect();
        if targets.is_empty() {
            return 0;
        }
        self.checkpoint();
        for &i in &targets {
            self.entries[i].selected = true;
        }
        targets.len()
    }

    /// Move one entry to `new_position` (clamped), shifting the others while
    /// keeping their relative order.
    pub fn move_to(&mut self, id: &PageId, new_position: usize) -> bool {
        let Some(from) = self.find(id, "move_to") else {
            return false;
        };
        let to = new_position.min(self.entries.len() - 1);
        self.checkpoint();
        let page = self.entries.remove(from);
        self.entries.insert(to, page);
        true
    }

    pub fn rotate(&mut self, id: &PageId, direction: Direction) -> bool {
        let Some(index) = self.find(id, "rotate") else {
            return false;
        };
        self.checkpoint();
        let page = &mut self.entries[index];
        page.rotation = page.rotation.turn(direction);
        true
    }

    /// Rotate the entries with the given identities as one undo step. Absent
    /// identities are skipped. Returns the count rotated.
    pub fn rotate_pages(&mut self, ids: &[PageId], direction: Direction) -> usize {
        let targets: HashSet<&PageId> = ids.iter().collect();
        let count = self.entries.iter().filter(|p| targets.contains(&p.id)).count();
        if count == 0 {
            debug!(requested = ids.len(), "rotate_pages matched no page");
            return 0;
        }
        self.checkpoint();
        for page in self.entries.iter_mut().filter(|p| targets.contains(&p.id)) {
            page.rotation = page.rotation.turn(direction);
        }
        count
    }

    /// Rotate every selected entry as one undo step. Returns the count rotated.
    pub fn rotate_selected(&mut self, direction: Direction) -> usize {
        let count = self.selected().count();
        if count == 0 {
            return 0;
        }
        self.checkpoint();
        for page in self.entries.iter_mut().filter(|p| p.selected) {
            page.rotation = page.rotation.turn(direction);
        }
        count
    }

    /// Insert a copy of the entry right after it, under a fresh synthetic
    /// identity. Returns the copy's identity.
    pub fn duplicate(&mut self, id: &PageId) -> Option<PageId> {
        let index = self.find(id, "duplicate")?;
        let original = &self.entries[index];

        let taken: HashSet<&PageId> = self.entries.iter().map(|p| &p.id).collect();
        let document_id = (1u32..)
            .map(|n| format!("{}+copy{}", original.source_document, n))
            .find(|candidate| !taken.contains(&PageId::new(candidate.as_str(), id.source_index)))?;

        let copy = original.copy_as(document_id);
        let copy_id = copy.id.clone();
        self.checkpoint();
        self.entries.insert(index + 1, copy);
        Some(copy_id)
    }

    /// Remove every entry whose identity is in `ids`. Returns the count removed.
    pub fn remove(&mut self, ids: &HashSet<PageId>) -> Result<usize, PageSetError> {
        let removing = self.entries.iter().filter(|p| ids.contains(&p.id)).count();
        if removing == 0 {
            debug!("remove matched no pages");
            return Ok(0);
        }
        if removing == self.entries.len() {
            return Err(PageSetError::WouldEmptyDocument { removing });
        }

        self.checkpoint();
        self.entries.retain(|p| !ids.contains(&p.id));
        Ok(removing)
    }

    pub fn remove_selected(&mut self) -> Result<usize, PageSetError> {
        let ids: HashSet<PageId> = self.selected().map(|p| p.id.clone()).collect();
        self.remove(&ids)
    }

    /// Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            debug!("undo: history is empty");
            return false;
        };
        let current = std::mem::replace(&mut self.entries, previous);
        self.redo_stack.push(current);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        true
    }

    /// Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            debug!("redo: nothing to redo");
            return false;
        };
        let current = std::mem::replace(&mut self.entries, next);
        self.undo_stack.push(current);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        true
    }

    fn set_all_selected(&mut self, selected: bool) {
        self.checkpoint();
        for page in &mut self.entries {
            page.selected = selected;
        }
    }

    fn find(&self, id: &PageId, operation: &str) -> Option<usize> {
        let index = self.position(id);
        if index.is_none() {
            debug!(page = %id, operation, "page not in set, ignoring");
        }
        index
    }

    /// Record the current entries as an undo step. Call only once the
    /// mutation is known to succeed.
    fn checkpoint(&mut self) {
        self.undo_stack.push(self.entries.clone());
        self.redo_stack.clear();
        if let Some(limit) = self.history_limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}
