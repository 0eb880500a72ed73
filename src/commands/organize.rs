use super::{open_single, write_pages, WrittenFile};
use anyhow::{anyhow, bail, Result};
use pdfpages::{Direction, PageId, PageSet, RangeSpec};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One edit step. Positions are 1-based and refer to the page order at the
/// moment the edit is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEdit {
    Move { from: u32, to: u32 },
    Rotate { pages: String, direction: Direction },
    Delete { pages: String },
    Duplicate { page: u32 },
    Select { pages: String },
    RotateSelected { direction: Direction },
    DeleteSelected,
    Undo,
    Redo,
}

impl PageEdit {
    /// Parse an edit like "move:3:1", "rotate:2-4:right", "delete:5" or "undo".
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let edit = match parts.as_slice() {
            ["move", from, to] => PageEdit::Move {
                from: parse_position(from)?,
                to: parse_position(to)?,
            },
            ["rotate", pages, direction] => PageEdit::Rotate {
                pages: pages.to_string(),
                direction: parse_direction(direction)?,
            },
            ["delete", pages] => PageEdit::Delete {
                pages: pages.to_string(),
            },
            ["duplicate", page] => PageEdit::Duplicate {
                page: parse_position(page)?,
            },
            ["select", pages] => PageEdit::Select {
                pages: pages.to_string(),
            },
            ["rotate-selected", direction] => PageEdit::RotateSelected {
                direction: parse_direction(direction)?,
            },
            ["delete-selected"] => PageEdit::DeleteSelected,
            ["undo"] => PageEdit::Undo,
            ["redo"] => PageEdit::Redo,
            _ => bail!("Invalid edit: {}", s),
        };
        Ok(edit)
    }

    pub fn apply(&self, set: &mut PageSet) -> Result<()> {
        match self {
            PageEdit::Move { from, to } => {
                let id = id_at(set, *from)?;
                set.move_to(&id, (*to - 1) as usize);
            }
            PageEdit::Rotate { pages, direction } => {
                let ids = ids_in(set, pages)?;
                set.rotate_pages(&ids, *direction);
            }
            PageEdit::Delete { pages } => {
                let ids: HashSet<_> = ids_in(set, pages)?.into_iter().collect();
                set.remove(&ids)?;
            }
            PageEdit::Duplicate { page } => {
                let id = id_at(set, *page)?;
                set.duplicate(&id);
            }
            PageEdit::Select { pages } => {
                let spec = RangeSpec::parse(pages, set.page_total())?;
                set.select_positions(&spec);
            }
            PageEdit::RotateSelected { direction } => {
                if set.rotate_selected(*direction) == 0 {
                    bail!("No pages are selected");
                }
            }
            PageEdit::DeleteSelected => {
                if set.remove_selected()? == 0 {
                    bail!("No pages are selected");
                }
            }
            PageEdit::Undo => {
                if !set.undo() {
                    debug!("nothing to undo");
                }
            }
            PageEdit::Redo => {
                if !set.redo() {
                    debug!("nothing to redo");
                }
            }
        }
        Ok(())
    }
}

fn parse_position(s: &str) -> Result<u32> {
    match s.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(anyhow!("Invalid page position: {}", s)),
    }
}

fn parse_direction(s: &str) -> Result<Direction> {
    match s.to_ascii_lowercase().as_str() {
        "left" | "l" => Ok(Direction::Left),
        "right" | "r" => Ok(Direction::Right),
        _ => Err(anyhow!("Invalid rotation direction: {} (expected left or right)", s)),
    }
}

fn id_at(set: &PageSet, position: u32) -> Result<PageId> {
    let spec = RangeSpec::parse(&position.to_string(), set.page_total())?;
    set.ids_at(&spec)
        .pop()
        .ok_or_else(|| anyhow!("No page at position {}", position))
}

fn ids_in(set: &PageSet, pages: &str) -> Result<Vec<PageId>> {
    let spec = RangeSpec::parse(pages, set.page_total())?;
    if spec.is_empty() {
        bail!("No pages specified");
    }
    Ok(set.ids_at(&spec))
}

#[derive(Debug, Serialize)]
pub struct OrganizeSummary {
    pub edits: usize,
    #[serde(flatten)]
    pub written: WrittenFile,
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    edits: &[String],
    output: Q,
) -> Result<OrganizeSummary> {
    let edits = edits
        .iter()
        .map(|e| PageEdit::parse(e))
        .collect::<Result<Vec<_>>>()?;

    let (library, _) = open_single(input.as_ref())?;
    let mut set = library.page_set()?;

    for (i, edit) in edits.iter().enumerate() {
        edit.apply(&mut set)
            .map_err(|e| e.context(format!("Edit {} ({:?}) failed", i + 1, edit)))?;
    }

    let written = write_pages(&library, set.entries(), output.as_ref())?;
    Ok(OrganizeSummary {
        edits: edits.len(),
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfpages::Rotation;

    fn order(set: &PageSet) -> Vec<u32> {
        set.entries().iter().map(|p| p.source_index() + 1).collect()
    }

    fn apply_all(set: &mut PageSet, edits: &[&str]) -> Result<()> {
        for edit in edits {
            PageEdit::parse(edit)?.apply(set)?;
        }
        Ok(())
    }

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            PageEdit::parse("move:3:1").unwrap(),
            PageEdit::Move { from: 3, to: 1 }
        );
        assert_eq!(
            PageEdit::parse(" rotate:2-4:R ").unwrap(),
            PageEdit::Rotate {
                pages: "2-4".into(),
                direction: Direction::Right
            }
        );
        assert_eq!(PageEdit::parse("undo").unwrap(), PageEdit::Undo);
        assert!(PageEdit::parse("move:0:1").is_err());
        assert!(PageEdit::parse("rotate:1:up").is_err());
        assert!(PageEdit::parse("shuffle").is_err());
    }

    #[test]
    fn test_move_and_undo() {
        let mut set = PageSet::from_document("doc", 4);
        apply_all(&mut set, &["move:4:1"]).unwrap();
        assert_eq!(order(&set), vec![4, 1, 2, 3]);
        apply_all(&mut set, &["move:1:9", "undo", "undo", "redo"]).unwrap();
        assert_eq!(order(&set), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_positions_follow_current_order() {
        let mut set = PageSet::from_document("doc", 4);
        apply_all(&mut set, &["delete:1", "rotate:1:left"]).unwrap();
        assert_eq!(order(&set), vec![2, 3, 4]);
        assert_eq!(set.entries()[0].rotation(), Rotation::Left);
    }

    #[test]
    fn test_select_then_bulk_edits() {
        let mut set = PageSet::from_document("doc", 5);
        apply_all(&mut set, &["select:2,4", "rotate-selected:right", "delete-selected"]).unwrap();
        assert_eq!(order(&set), vec![1, 3, 5]);
        apply_all(&mut set, &["undo"]).unwrap();
        let rotated: Vec<u32> = set
            .entries()
            .iter()
            .filter(|p| p.rotation() == Rotation::Right)
            .map(|p| p.source_index() + 1)
            .collect();
        assert_eq!(rotated, vec![2, 4]);
    }

    #[test]
    fn test_rotate_range_undoes_in_one_step() {
        let mut set = PageSet::from_document("doc", 3);
        apply_all(&mut set, &["rotate:1-3:right"]).unwrap();
        assert!(set.entries().iter().all(|p| p.rotation() == Rotation::Right));
        apply_all(&mut set, &["undo"]).unwrap();
        assert!(set.entries().iter().all(|p| p.rotation() == Rotation::None));
        assert!(!set.can_undo());
    }

    #[test]
    fn test_delete_everything_fails() {
        let mut set = PageSet::from_document("doc", 2);
        assert!(apply_all(&mut set, &["delete:1-2"]).is_err());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_duplicate() {
        let mut set = PageSet::from_document("doc", 2);
        apply_all(&mut set, &["duplicate:2", "move:3:1"]).unwrap();
        assert_eq!(order(&set), vec![2, 1, 2]);
        assert!(set.entries()[0].is_copy());
    }

    #[test]
    fn test_out_of_range_position_fails() {
        let mut set = PageSet::from_document("doc", 2);
        assert!(apply_all(&mut set, &["move:3:1"]).is_err());
    }
}
