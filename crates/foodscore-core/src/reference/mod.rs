pub mod database;
pub mod report;
pub mod schema;

pub use database::{
    find_matching_allergen, get_additive_info, get_allergen_info, get_nova_group_info,
    lookup_nova,
};
pub use report::allergen_report;
