//! Data layer for the DataTable/DataView architecture
//!
//! Rows and column descriptors live in a `DataTable`; a `DataView` derives
//! the filtered, sorted and paged rows from it without modifying the data.

// Core data modules
pub mod data_view;
pub mod datatable;
pub mod datavalue_compare;
pub mod search_filter;
pub mod selection;
pub mod view_state;

// Fixture loading and export
pub mod column_format;
pub mod data_exporter;
pub mod datatable_loaders;
