mod multimap;
mod ordered_map;

pub use multimap::SetMultimap;
pub use ordered_map::OrderedMap;
