use super::document::{existing_rotation, PdfDocument};
use crate::page_set::{PageRef, PageSet};
use anyhow::{bail, Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Loaded source documents, keyed by document id, in insertion order.
#[derive(Default)]
pub struct Library {
    docs: Vec<(String, PdfDocument)>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any previous one with the same id.
    pub fn insert(&mut self, id: impl Into<String>, doc: PdfDocument) {
        let id = id.into();
        match self.docs.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = doc,
            None => self.docs.push((id, doc)),
        }
    }

    pub fn open<P: AsRef<Path>>(&mut self, id: impl Into<String>, path: P) -> Result<()> {
        let doc = PdfDocument::open(path)?;
        self.insert(id, doc);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&PdfDocument> {
        self.docs
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, doc)| doc)
    }

    /// Every page of every document, documents in insertion order, with no
    /// undo history.
    pub fn page_set(&self) -> Result<PageSet> {
        let pages = self
            .docs
            .iter()
            .flat_map(|(id, doc)| (0..doc.page_count()).map(move |i| PageRef::new(id.as_str(), i)))
            .collect();
        Ok(PageSet::from_pages(pages)?)
    }

    /// Build a new document containing `pages` in order.
    ///
    /// All objects of each referenced source are imported once under an ID
    /// offset; pages are then re-parented under a fresh page tree with their
    /// inherited attributes made explicit. A source page used more than once
    /// gets a separate page object per use. Unreachable objects are pruned.
    pub fn assemble(&self, pages: &[PageRef]) -> Result<Document> {
        if pages.is_empty() {
            bail!("No pages to assemble");
        }

        let mut out = Document::with_version("1.5");
        let pages_root = out.new_object_id();
        // offset and 1-indexed page ids per imported source
        let mut imported: HashMap<&str, (u32, Vec<(u32, ObjectId)>)> = HashMap::new();
        let mut placed: HashSet<ObjectId> = HashSet::new();
        let mut kids = Vec::with_capacity(pages.len());

        for page in pages {
            let source_id = page.source_document();
            let source = self
                .get(source_id)
                .with_context(|| format!("Unknown source document: {}", source_id))?;

            let (offset, page_ids) = match imported.entry(source_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let offset = import_objects(&mut out, &source.doc);
                    entry.insert((offset, source.page_ids()))
                }
            };
            let offset = *offset;

            let src_page_id = page_ids
                .get(page.source_index() as usize)
                .map(|&(_, id)| id)
                .with_context(|| {
                    format!(
                        "Page {} is out of range (1-{}) in {}",
                        page.source_index() + 1,
                        page_ids.len(),
                        source.path
                    )
                })?;
            let mut dict = source.resolved_page_dict(src_page_id)?;
            let rotate = page.rotation().apply_to(existing_rotation(&dict));
            dict = match remap_refs(Object::Dictionary(dict), offset) {
                Object::Dictionary(d) => d,
                _ => unreachable!("remapping preserves the object kind"),
            };
            dict.set("Parent", Object::Reference(pages_root));
            dict.set("Rotate", Object::Integer(rotate));

            let target_id = (src_page_id.0 + offset, src_page_id.1);
            let page_id = if placed.insert(target_id) {
                out.objects.insert(target_id, Object::Dictionary(dict));
                target_id
            } else {
                out.add_object(Object::Dictionary(dict))
            };
            kids.push(Object::Reference(page_id));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set("Kids", Object::Array(kids));
        out.objects.insert(pages_root, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_root));
        let catalog_id = out.add_object(Object::Dictionary(catalog));
        out.trailer.set("Root", Object::Reference(catalog_id));

        let pruned = out.prune_objects();
        debug!(
            pages = pages.len(),
            sources = imported.len(),
            pruned = pruned.len(),
            "assembled document"
        );

        Ok(out)
    }
}

/// Copy every object of `source` into `out` under a fresh ID range and
/// return the offset that was applied.
fn import_objects(out: &mut Document, source: &Document) -> u32 {
    let offset = out.max_id;
    for (&(number, generation), object) in &source.objects {
        out.objects.insert(
            (number + offset, generation),
            remap_refs(object.clone(), offset),
        );
    }
    out.max_id = offset + source.max_id;
    offset
}

fn remap_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => {
            Object::Array(arr.into_iter().map(|o| remap_refs(o, offset)).collect())
        }
        Object::Dictionary(mut dict) => {
            remap_dict(&mut dict, offset);
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            remap_dict(&mut stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(dict: &mut Dictionary, offset: u32) {
    for (_, value) in dict.iter_mut() {
        let taken = std::mem::replace(value, Object::Null);
        *value = remap_refs(taken, offset);
    }
}
