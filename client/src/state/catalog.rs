//! Cache invalidation for catalog reads.
//!
//! DESIGN
//! ======
//! Page resources read the revision counters they depend on, so bumping a
//! counter after a successful write re-runs every affected fetch. Product
//! writes also invalidate the dashboard; category writes invalidate products
//! (a deleted category unassigns them) and the dashboard.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub categories_rev: u64,
    pub products_rev: u64,
    pub dashboard_rev: u64,
}

impl CatalogState {
    pub fn products_changed(&mut self) {
        self.products_rev += 1;
        self.dashboard_rev += 1;
    }

    pub fn categories_changed(&mut self) {
        self.categories_rev += 1;
        self.products_rev += 1;
        self.dashboard_rev += 1;
    }
}
