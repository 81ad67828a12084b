pub(crate) mod json;
pub(crate) mod marshal;
pub(crate) mod value;
