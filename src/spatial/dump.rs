use std::fmt::{self, Display, Write};

use super::node::OctreeNode;
use super::octree::SpatialOctree;

/// A subtree rendered with a fixed left padding.
struct Dump<'a, T> {
    node: &'a OctreeNode<T>,
    padding: &'a str,
}

impl<T: Display> Display for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.write_dump(f, self.padding)
    }
}

impl<T: Display> OctreeNode<T> {
    /// Indented text rendering of this subtree, for diagnostics only.
    pub fn dump(&self, padding: &str) -> String {
        Dump {
            node: self,
            padding,
        }
        .to_string()
    }

    fn write_dump<W: Write>(&self, out: &mut W, padding: &str) -> fmt::Result {
        let b = &self.bounds;
        writeln!(out, "{padding}<OctreeNode>")?;
        writeln!(out, "{padding}  Bounding Box")?;
        writeln!(out, "{padding}    x1: {:.6}", b.min[0])?;
        writeln!(out, "{padding}    y1: {:.6}", b.min[1])?;
        writeln!(out, "{padding}    z1: {:.6}", b.min[2])?;
        writeln!(out, "{padding}    x2: {:.6}", b.max[0])?;
        writeln!(out, "{padding}    y2: {:.6}", b.max[1])?;
        writeln!(out, "{padding}    z2: {:.6}", b.max[2])?;

        if let Some(children) = self.children() {
            writeln!(out, "{padding}  Child Nodes")?;
            let child_padding = format!("{padding}    ");
            for child in children.iter() {
                child.write_dump(out, &child_padding)?;
            }
        }

        if self.targets.is_empty() {
            writeln!(out, "{padding}  <empty targets>")?;
        } else {
            writeln!(out, "{padding}  Targets")?;
            for (i, target) in self.targets.iter().enumerate() {
                writeln!(out, "{padding}    Target {i}: {target}")?;
            }
        }
        Ok(())
    }
}

impl<T: Display> SpatialOctree<T> {
    pub fn dump(&self, padding: &str) -> String {
        self.root().dump(padding)
    }
}

impl<T: Display> Display for SpatialOctree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root().write_dump(f, "")
    }
}
