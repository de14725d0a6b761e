pub mod type_tag;
pub mod value;
