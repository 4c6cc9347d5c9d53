//! Built-in element kind identifiers.
//!
//! These are the values stored in `elements.kind`. Extra container kinds can
//! be added through configuration; addressable kinds are fixed because each
//! one needs a display loader.

pub const ENTRY: &str = "entry";
pub const GLOBAL_SET: &str = "global_set";
pub const CATEGORY: &str = "category";
pub const TAG: &str = "tag";
pub const ASSET: &str = "asset";
pub const USER: &str = "user";
pub const COMMERCE_PRODUCT: &str = "commerce_product";
pub const COMMERCE_VARIANT: &str = "commerce_variant";

pub const MATRIX_BLOCK: &str = "matrix_block";
pub const SUPER_TABLE_BLOCK: &str = "super_table_block";
