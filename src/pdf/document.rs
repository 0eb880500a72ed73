use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

// Guards against cyclic /Parent chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).context("Failed to parse PDF from memory")?;
        Ok(PdfDocument {
            doc,
            path: "<memory>".to_string(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Page dictionary with inherited attributes copied down from the tree.
    pub fn resolved_page_dict(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut dict = self
            .doc
            .get_dictionary(page_id)
            .with_context(|| format!("Page object {:?} is not a dictionary", page_id))?
            .clone();

        let mut parent = dict.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;
        while let Some(parent_id) = parent {
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                break;
            }
            let Ok(node) = self.doc.get_dictionary(parent_id) else {
                break;
            };
            for key in INHERITABLE_KEYS {
                if !dict.has(key) {
                    if let Ok(value) = node.get(key) {
                        dict.set(key, value.clone());
                    }
                }
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }

        Ok(dict)
    }

    /// Size and rotation of every page, in page order.
    pub fn page_info(&self) -> Result<Vec<PageInfo>> {
        self.page_ids()
            .into_iter()
            .map(|(number, id)| -> Result<PageInfo> {
                let dict = self.resolved_page_dict(id)?;
                let (width, height) = dict
                    .get(b"MediaBox")
                    .ok()
                    .and_then(|b| self.media_box_size(b))
                    .unwrap_or((0.0, 0.0));
                Ok(PageInfo {
                    number,
                    width,
                    height,
                    rotation: existing_rotation(&dict),
                })
            })
            .collect()
    }

    fn media_box_size(&self, obj: &Object) -> Option<(f32, f32)> {
        let array = match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
            other => other.as_array().ok()?,
        };
        let values: Vec<f32> = array.iter().filter_map(|v| v.as_float().ok()).collect();
        match values.as_slice() {
            [x0, y0, x1, y1] => Some(((x1 - x0).abs(), (y1 - y0).abs())),
            _ => None,
        }
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub rotation: i64,
}

/// The page's own `/Rotate`, normalized to `0..360`.
pub fn existing_rotation(dict: &Dictionary) -> i64 {
    dict.get(b"Rotate")
        .and_then(Object::as_i64)
        .map(|r| r.rem_euclid(360))
        .unwrap_or(0)
}
