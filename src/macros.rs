macro_rules! str {
    ($s:expr) => {
        $s.to_string()
    };
}

macro_rules! unless {
    ($ex:expr, else $else_block:expr) => {
        match $ex {
            Some(x) => x,
            _ => $else_block,
        }
    };
    ($ex:expr) => {
        match $ex {
            Some(x) => x,
            _ => return,
        }
    };
}

/// Builds a `Ty` from a type expression, panicking if it does not parse.
/// Only meant for literals written in this crate and its tests.
#[allow(unused_macros)]
macro_rules! ty {
    ($s:expr) => {
        $crate::ty::Ty::parse($s).unwrap_or_else(|e| panic!("bad type literal `{}`: {}", $s, e))
    };
}
