use std::fmt::{self, Display, Formatter};

/// An immutable tree with a label at every node and an ordered list of
/// subtrees.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Tree<A> {
    pub root: A,
    pub children: Vec<Tree<A>>,
}

impl<A> Tree<A> {
    pub fn new(root: A, children: Vec<Tree<A>>) -> Self {
        Tree { root, children }
    }

    pub fn leaf(root: A) -> Self {
        Tree {
            root,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The labels of the leaves in left-to-right tree order.
    pub fn leaves(&self) -> Vec<&A> {
        if self.children.is_empty() {
            vec![&self.root]
        } else {
            self.children.iter().flat_map(Tree::leaves).collect()
        }
    }
}

impl<A: PartialEq> Tree<A> {
    pub fn contains(&self, label: &A) -> bool {
        self.root == *label || self.children.iter().any(|c| c.contains(label))
    }
}

/// Bracketed notation: `(Label child1 child2 …)`, leaves are bare labels.
impl<A: Display> Display for Tree<A> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.children.is_empty() {
            write!(f, "{}", self.root)
        } else {
            write!(f, "({}", self.root)?;
            for child in &self.children {
                write!(f, " {}", child)?;
            }
            write!(f, ")")
        }
    }
}
