//! Small CSS text helpers shared by the inspector and the in-memory engine.
//!
//! None of this is a CSS parser. It covers exactly the text the inspector has to read
//! itself: `style` attributes, `var()` references and `font-family` lists.

mod family_list;
mod style_attr;
mod variables;

pub use family_list::{FamilyName, serialize_family, split_family_list};
pub use style_attr::{Declaration, parse_style_attribute, parse_style_attribute_into_map};
pub use variables::{CustomProperties, resolve_vars_in_value};
