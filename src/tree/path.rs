use std::fmt;

use serde::{Deserialize, Serialize};

/// Child-index route from the root; empty addresses the root itself.
///
/// Paths are what UI state persists, so they survive serialization, but an
/// edit that removes or reorders siblings can leave a held path stale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn root() -> Self { Self(Vec::new()) }

    pub fn is_root(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn indices(&self) -> &[usize] { &self.0 }

    pub fn push(&mut self, idx: usize) { self.0.push(idx); }
    pub fn pop(&mut self) -> Option<usize> { self.0.pop() }

    pub fn child(&self, idx: usize) -> Self {
        let mut p = self.clone();
        p.0.push(idx);
        p
    }

    /// `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() { return None; }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn starts_with(&self, prefix: &Path) -> bool { self.0.starts_with(&prefix.0) }

    /// True when every step is a mainline (index 0) step.
    pub fn is_mainline(&self) -> bool { self.0.iter().all(|&i| i == 0) }
}

impl From<Vec<usize>> for Path {
    fn from(v: Vec<usize>) -> Self { Self(v) }
}

impl From<&[usize]> for Path {
    fn from(v: &[usize]) -> Self { Self(v.to_vec()) }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ",")?; }
            write!(f, "{idx}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_child() {
        let p = Path::from(vec![0, 2, 1]);
        assert_eq!(p.parent(), Some(Path::from(vec![0, 2])));
        assert_eq!(Path::root().parent(), None);
        assert_eq!(Path::root().child(3), Path::from(vec![3]));
        assert!(p.starts_with(&Path::from(vec![0, 2])));
        assert!(!p.is_mainline());
        assert_eq!(p.to_string(), "[0,2,1]");
    }
}
