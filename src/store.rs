//! External collaborator seams.
//!
//! The designer itself owns no persistence. Product data, branch names,
//! image bytes and saved artifacts all cross these traits; hosts plug in
//! whatever backs them. The `Memory*` implementations back the tests and
//! small embedders.

use std::collections::HashMap;

use crate::error::StudioError;
use crate::template::ProductRecord;

/// Read-only product lookup.
pub trait ProductCatalog {
    fn get(&self, id: &str) -> Option<ProductRecord>;
}

/// A store branch, used only to prefix artifact display names.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub id: String,
    pub name: String,
}

/// Read-only branch listing.
pub trait BranchDirectory {
    fn list(&self) -> Vec<Branch>;
}

/// Write side for published artifacts. One save per explicit publish.
pub trait AssetStore {
    fn save(
        &mut self,
        product_id: &str,
        artifact_name: &str,
        png_data_url: &str,
    ) -> Result<(), StudioError>;
}

/// Resolves opaque image references to encoded image bytes.
///
/// Data URLs never reach this trait; the renderer decodes those inline.
pub trait ImageStore {
    fn load(&self, image_ref: &str) -> Option<Vec<u8>>;
}

/// In-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: HashMap<String, ProductRecord>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, product: ProductRecord) {
        self.products.insert(id.into(), product);
    }
}

impl ProductCatalog for MemoryCatalog {
    fn get(&self, id: &str) -> Option<ProductRecord> {
        self.products.get(id).cloned()
    }
}

/// Fixed in-memory branch list.
#[derive(Debug, Clone, Default)]
pub struct MemoryBranchDirectory {
    branches: Vec<Branch>,
}

impl MemoryBranchDirectory {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self { branches }
    }
}

impl BranchDirectory for MemoryBranchDirectory {
    fn list(&self) -> Vec<Branch> {
        self.branches.clone()
    }
}

/// A published artifact as recorded by [`MemoryAssetStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedAsset {
    pub product_id: String,
    pub artifact_name: String,
    pub png_data_url: String,
}

/// Asset store that records every save, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    pub saved: Vec<SavedAsset>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetStore for MemoryAssetStore {
    fn save(
        &mut self,
        product_id: &str,
        artifact_name: &str,
        png_data_url: &str,
    ) -> Result<(), StudioError> {
        self.saved.push(SavedAsset {
            product_id: product_id.into(),
            artifact_name: artifact_name.into(),
            png_data_url: png_data_url.into(),
        });
        Ok(())
    }
}

/// Image store over a map of encoded image bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image_ref: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(image_ref.into(), bytes);
    }
}

impl ImageStore for MemoryImageStore {
    fn load(&self, image_ref: &str) -> Option<Vec<u8>> {
        self.images.get(image_ref).cloned()
    }
}
