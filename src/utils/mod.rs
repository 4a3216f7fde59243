pub fn indent(s: String, n: usize) -> String {
    let mut dst = String::new();
    for (i, line) in s.lines().enumerate() {
        if i != 0 {
            dst.push('\n');
        }
        if !line.is_empty() {
            dst.push_str(&"  ".repeat(n));
            dst.push_str(line);
        }
    }
    dst
}

pub fn join<'a, T, S>(i: T, sep: S) -> String
where
    T: IntoIterator,
    T::Item: ToString,
    S: Into<&'a str>,
{
    i.into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(sep.into())
}

pub fn map_join<'a, T, S, F>(i: T, sep: S, f: F) -> String
where
    T: IntoIterator,
    S: Into<&'a str>,
    F: Fn(T::Item) -> String,
{
    i.into_iter().map(f).collect::<Vec<_>>().join(sep.into())
}

/// Pushes `value` unless an equal value is already present, keeping first-seen order.
pub fn push_unique<T: PartialEq>(dest: &mut Vec<T>, value: T) -> bool {
    if dest.contains(&value) {
        false
    } else {
        dest.push(value);
        true
    }
}

pub fn extend_unique<T, I>(dest: &mut Vec<T>, values: I)
where
    T: PartialEq,
    I: IntoIterator<Item = T>,
{
    for v in values {
        push_unique(dest, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_skips_blank_lines() {
        let s = indent(str!("a\n\nb"), 2);
        assert_eq!(s, "    a\n\n    b");
    }

    #[test]
    fn extend_unique_keeps_first_order() {
        let mut v = vec![3, 1];
        extend_unique(&mut v, vec![1, 2, 3, 4]);
        assert_eq!(v, vec![3, 1, 2, 4]);
    }
}
