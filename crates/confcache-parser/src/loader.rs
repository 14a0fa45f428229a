//! Loading and deep-merging resolved documents in order

use confcache_core::{ConfigTree, Merge, WithSigil};
use serde::Serialize;
use tracing::debug;

use crate::error::ParserError;
use crate::resolver::DocumentRef;
use crate::yaml::DocumentParser;

/// Merged document tree together with the files it came from
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDocument {
    pub tree: ConfigTree,
    pub sources: Vec<DocumentRef>,
}

impl MergedDocument {
    /// Display paths of every source document, in merge order.
    pub fn provenance(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|doc| doc.path().display().to_string())
            .collect()
    }

    pub fn into_tree(self) -> ConfigTree {
        self.tree
    }

    /// Serializable view with literal texts written back using `sigil`.
    pub fn with_sigil(&self, sigil: char) -> MergedDocumentView<'_> {
        MergedDocumentView {
            tree: WithSigil::new(&self.tree, sigil),
            sources: &self.sources,
        }
    }
}

/// See [`MergedDocument::with_sigil`].
#[derive(Debug, Serialize)]
pub struct MergedDocumentView<'a> {
    tree: WithSigil<'a, ConfigTree>,
    sources: &'a [DocumentRef],
}

/// Parses documents with `P` and merges them, later documents winning.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader<P> {
    parser: P,
}

impl<P: DocumentParser> DocumentLoader<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn load(&self, documents: &[DocumentRef]) -> Result<MergedDocument, ParserError> {
        let mut tree = ConfigTree::new();
        for document in documents {
            let path = document.path();
            let parsed = self.parser.parse(&path)?;
            debug!("Merging {} top-level key(s) from {:?}", parsed.len(), path);
            tree = tree.merge(parsed);
        }

        Ok(MergedDocument {
            tree,
            sources: documents.to_vec(),
        })
    }
}
