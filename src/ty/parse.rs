use crate::errors::{StilettoError, StilettoResult};

use super::{Aliases, Annotation, Path, Primitive, Ty};

/// Parses a type expression such as `Map<String, Provider<Foo>>`.
pub fn parse_ty(src: &str, aliases: Option<&Aliases>) -> StilettoResult<Ty> {
    Parser::new(src, aliases).parse_ty_only()
}

/// Parses a type expression with an optional leading annotation, such as
/// `@Named("db") Connection`.
pub fn parse_annotated(src: &str, aliases: Option<&Aliases>) -> StilettoResult<(Option<Annotation>, Ty)> {
    Parser::new(src, aliases).parse_annotated()
}

pub fn parse_annotation(src: &str) -> StilettoResult<Annotation> {
    let mut p = Parser::new(src, None);
    let a = p.annotation()?;
    p.expect_end()?;
    Ok(a)
}

pub struct Parser<'a> {
    src: &'a str,
    chars: Vec<char>,
    pos: usize,
    aliases: Option<&'a Aliases>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, aliases: Option<&'a Aliases>) -> Parser<'a> {
        Parser {
            src,
            chars: src.chars().collect(),
            pos: 0,
            aliases,
        }
    }

    pub fn parse_ty_only(mut self) -> StilettoResult<Ty> {
        let ty = self.ty()?;
        self.expect_end()?;
        Ok(ty)
    }

    pub fn parse_annotated(mut self) -> StilettoResult<(Option<Annotation>, Ty)> {
        self.skip_ws();
        let annotation = if self.peek() == Some('@') {
            Some(self.annotation()?)
        } else {
            None
        };
        let ty = self.ty()?;
        self.expect_end()?;
        Ok((annotation, ty))
    }

    fn error<S: Into<String>>(&self, msg: S) -> StilettoError {
        StilettoError::parse(format!("{} at offset {}", msg.into(), self.pos), self.src)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> StilettoResult {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", c)))
        }
    }

    fn expect_end(&mut self) -> StilettoResult {
        self.skip_ws();
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected `{}`", c))),
        }
    }

    fn ident(&mut self) -> StilettoResult<String> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn path(&mut self) -> StilettoResult<Path> {
        let mut parts = vec![self.ident()?];
        loop {
            self.skip_ws();
            if self.peek() == Some('.') {
                self.pos += 1;
                parts.push(self.ident()?);
            } else if self.peek() == Some(':') && self.chars.get(self.pos + 1) == Some(&':') {
                self.pos += 2;
                parts.push(self.ident()?);
            } else {
                break;
            }
        }
        Ok(Path::from(parts))
    }

    fn annotation(&mut self) -> StilettoResult<Annotation> {
        self.expect('@')?;
        let path = self.path()?;
        self.skip_ws();
        if self.peek() != Some('(') {
            return Ok(Annotation::new(path));
        }

        self.pos += 1;
        let start = self.pos;
        let mut depth = 1;
        let mut in_str = false;
        while depth > 0 {
            let c = unless!(self.peek(), else return Err(self.error("unterminated annotation arguments")));
            match c {
                '"' => in_str = !in_str,
                '\\' if in_str => self.pos += 1,
                '(' if !in_str => depth += 1,
                ')' if !in_str => depth -= 1,
                _ => (),
            }
            self.pos += 1;
        }

        let raw: String = self.chars[start..self.pos - 1].iter().collect();
        let args = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if args.is_empty() {
            Ok(Annotation::new(path))
        } else {
            Ok(Annotation::with_args(path, args))
        }
    }

    fn ty(&mut self) -> StilettoResult<Ty> {
        self.skip_ws();
        if self.eat('?') {
            self.skip_ws();
            let rest: String = self.chars[self.pos..].iter().take(7).collect();
            if rest == "extends" {
                self.pos += 7;
                let bound = self.ty()?;
                return Ok(Ty::Wildcard(Some(Box::new(bound))));
            }
            return Ok(Ty::Wildcard(None));
        }

        let path = self.path()?;
        let mut ty = if self.eat('<') {
            let mut args = vec![self.ty()?];
            while self.eat(',') {
                args.push(self.ty()?);
            }
            self.expect('>')?;
            Ty::Declared(path, args)
        } else if let Some(p) = path.name().filter(|_| path.len() == 1).and_then(Primitive::from_name) {
            Ty::Primitive(p)
        } else {
            self.resolve_alias(path)
        };

        while self.eat('[') {
            self.expect(']')?;
            ty = Ty::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn resolve_alias(&self, path: Path) -> Ty {
        let target = self.aliases.and_then(|aliases| aliases.get(&path.to_string()));
        match target {
            Some(target) => Ty::Alias(path, Box::new(target.clone())),
            None => Ty::Declared(path, vec![]),
        }
    }
}
