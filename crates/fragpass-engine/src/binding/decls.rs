use crate::uniform::{UniformDecl, UniformKind, UniformValue};

/// Ordered mapping of uniform name to declaration.
///
/// Declaration order decides binding indices. Inserting an existing name
/// replaces its declaration in place and keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformDecls {
    entries: Vec<(String, UniformDecl)>,
}

impl UniformDecls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(
        mut self,
        name: impl Into<String>,
        kind: UniformKind,
        initial: impl Into<UniformValue>,
    ) -> Self {
        self.insert(name, UniformDecl::new(kind, initial));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, decl: UniformDecl) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = decl,
            None => self.entries.push((name, decl)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformDecl> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformDecl)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, UniformDecl)> for UniformDecls {
    fn from_iter<T: IntoIterator<Item = (N, UniformDecl)>>(iter: T) -> Self {
        let mut decls = UniformDecls::new();
        for (name, decl) in iter {
            decls.insert(name, decl);
        }
        decls
    }
}
