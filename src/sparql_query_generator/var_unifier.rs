use std::collections::BTreeMap;

use super::errors::SparqlQueryGeneratorError;

/// Union-find over sub-formula ids, collapsing query variables that denote
/// the same thing (AND, TC, superlative and COUNT operands).
///
/// `union` always points the larger root at the smaller one; the assembler
/// relies on that rule when it canonicalizes `?x<k>` occurrences, so it is a
/// correctness requirement, not a heuristic. `find` chases parent pointers
/// without path compression; expressions are a handful of nodes deep and the
/// flat map keeps `find` pure.
#[derive(Debug, Default)]
pub struct VariableUnifier {
    parent: BTreeMap<usize, usize>,
}

impl VariableUnifier {
    pub fn new() -> Self {
        VariableUnifier::default()
    }

    /// Canonical representative of `var`'s class.
    pub fn find(&self, mut var: usize) -> usize {
        while let Some(&parent) = self.parent.get(&var) {
            var = parent;
        }
        var
    }

    /// Merge the classes of `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        if root_a > root_b {
            self.parent.insert(root_a, root_b);
        } else {
            self.parent.insert(root_b, root_a);
        }
    }

    /// Point a COUNT sub-formula directly at the canonical class of its
    /// operand. COUNT is required to be the outermost operator, so its own id
    /// must not have been unified before; anything else would silently
    /// discard an earlier record, and we fail instead.
    pub fn alias_count(
        &mut self,
        count_id: usize,
        var: usize,
    ) -> Result<(), SparqlQueryGeneratorError> {
        if self.parent.contains_key(&count_id) {
            return Err(SparqlQueryGeneratorError::CountNotOutermost(count_id));
        }
        let root = self.find(var);
        if root != count_id {
            self.parent.insert(count_id, root);
        }
        Ok(())
    }

    /// All ids that are not their own canonical representative, in sorted
    /// order so rewrites over them are deterministic.
    pub fn aliased_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.parent.keys().copied()
    }
}
