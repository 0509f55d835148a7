use crate::geometry::Margins;
use crate::ids::PageId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Page index {index} is out of range for a document of {len} pages.")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("A document must keep at least one page.")]
    LastPage,
}

/// The unit of document content: markup text plus an optional margin override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
}

/// An ordered list of pages in reading order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding a single blank page.
    pub fn new() -> Self {
        let mut doc = Self {
            pages: Vec::new(),
            next_id: 1,
        };
        let page = doc.make_page(String::new(), None);
        doc.pages.push(page);
        doc
    }

    /// Builds a document from page texts; an empty iterator still yields one blank page.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc = Self {
            pages: Vec::new(),
            next_id: 1,
        };
        for text in texts {
            let page = doc.make_page(text.into(), None);
            doc.pages.push(page);
        }
        if doc.pages.is_empty() {
            let page = doc.make_page(String::new(), None);
            doc.pages.push(page);
        }
        doc
    }

    fn make_page(&mut self, text: String, margins: Option<Margins>) -> Page {
        let id = PageId::new(self.next_id);
        self.next_id += 1;
        Page { id, text, margins }
    }

    fn check_index(&self, index: usize) -> Result<(), DocumentError> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(DocumentError::IndexOutOfRange {
                index,
                len: self.pages.len(),
            })
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn position(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// Inserts a page at `index` (which may equal `len()` to append).
    pub fn insert(&mut self, index: usize, text: impl Into<String>) -> Result<PageId, DocumentError> {
        if index > self.pages.len() {
            return Err(DocumentError::IndexOutOfRange {
                index,
                len: self.pages.len(),
            });
        }
        let page = self.make_page(text.into(), None);
        let id = page.id;
        self.pages.insert(index, page);
        Ok(id)
    }

    pub fn push(&mut self, text: impl Into<String>) -> PageId {
        let page = self.make_page(text.into(), None);
        let id = page.id;
        self.pages.push(page);
        id
    }

    pub fn remove(&mut self, index: usize) -> Result<Page, DocumentError> {
        self.check_index(index)?;
        if self.pages.len() == 1 {
            return Err(DocumentError::LastPage);
        }
        Ok(self.pages.remove(index))
    }

    /// Copies the page at `index` (text and margins) to a new page right after it.
    pub fn duplicate(&mut self, index: usize) -> Result<PageId, DocumentError> {
        self.check_index(index)?;
        let source = &self.pages[index];
        let (text, margins) = (source.text.clone(), source.margins.clone());
        let copy = self.make_page(text, margins);
        let id = copy.id;
        self.pages.insert(index + 1, copy);
        Ok(id)
    }

    /// Moves the page at `from` so that it ends up at index `to`.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(())
    }

    /// Replaces the page at `index` with the first of `texts` and inserts the rest
    /// right after it. The original page keeps its id and margins; the new pages
    /// inherit the margins.
    pub fn split_page(&mut self, index: usize, texts: Vec<String>) -> Result<Vec<PageId>, DocumentError> {
        self.check_index(index)?;
        let mut texts = texts.into_iter();
        let Some(first) = texts.next() else {
            return Ok(Vec::new());
        };
        let margins = self.pages[index].margins.clone();
        self.pages[index].text = first;
        let mut ids = vec![self.pages[index].id];
        for (offset, text) in texts.enumerate() {
            let page = self.make_page(text, margins.clone());
            ids.push(page.id);
            self.pages.insert(index + 1 + offset, page);
        }
        Ok(ids)
    }
}
