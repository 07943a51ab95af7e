// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Filter combinations.
//!
//! `GetMany` dispatches on which filter fields are set. For `N` filter fields
//! there are `2^N` presence patterns: every non-empty subset gets its own
//! `objects-by-...` statement and the empty pattern gets plain `objects`.
//!
//! Subsets are ordered by descending size, then lexicographically by
//! declaration index. For fields `[a, b, c]`:
//!
//! ```text
//! [a, b, c]
//! [a, b] [a, c] [b, c]
//! [a] [b] [c]
//! []                      <- unconditional, always last
//! ```

use super::{kind::StmtKind, parse::FieldDef};

/// Every non-empty subset of `items`.
pub fn combinations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let n = items.len();
    let mut out = Vec::new();
    for size in (1..=n).rev() {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            out.push(indices.iter().map(|&i| items[i].clone()).collect());
            if !next_combination(&mut indices, n) {
                break;
            }
        }
    }
    out
}

/// Advance `indices` to the next combination of `indices.len()` out of `n`.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if indices[i] < n - k + i {
            indices[i] += 1;
            for j in i + 1..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// One row of a [`DecisionTable`].
#[derive(Debug, Clone)]
pub struct Variant<'a> {
    /// Presence of each filter field, in filter order.
    pub presence: Vec<bool>,

    /// Fields set in this variant.
    pub fields: Vec<&'a FieldDef>
}

impl Variant<'_> {
    /// Statement kind serving this variant.
    pub fn kind(&self) -> StmtKind {
        StmtKind::objects_by(&self.fields.iter().map(|f| f.pascal()).collect::<Vec<_>>())
    }
}

/// Static dispatch table from filter presence to statement.
#[derive(Debug, Clone)]
pub struct DecisionTable<'a> {
    fields:   Vec<&'a FieldDef>,
    variants: Vec<Variant<'a>>
}

impl<'a> DecisionTable<'a> {
    /// Build the table for `fields`, in filter declaration order.
    pub fn new(fields: Vec<&'a FieldDef>) -> Self {
        let positions: Vec<usize> = (0..fields.len()).collect();
        let mut variants: Vec<Variant<'a>> = combinations(&positions)
            .into_iter()
            .map(|subset| Variant {
                presence: (0..fields.len()).map(|i| subset.contains(&i)).collect(),
                fields:   subset.iter().map(|&i| fields[i]).collect()
            })
            .collect();

        variants.push(Variant {
            presence: vec![false; fields.len()],
            fields:   Vec::new()
        });

        Self {
            fields,
            variants
        }
    }

    /// Filter fields, in order.
    pub fn fields(&self) -> &[&'a FieldDef] {
        &self.fields
    }

    /// Every variant, unconditional last.
    pub fn variants(&self) -> &[Variant<'a>] {
        &self.variants
    }

    /// The single variant matching `presence`.
    pub fn lookup(&self, presence: &[bool]) -> Option<&Variant<'a>> {
        self.variants.iter().find(|v| v.presence == presence)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use syn::parse_quote;

    use super::*;

    #[test]
    fn ordering() {
        assert_eq!(combinations(&['a', 'b', 'c']), vec![
            vec!['a', 'b', 'c'],
            vec!['a', 'b'],
            vec!['a', 'c'],
            vec!['b', 'c'],
            vec!['a'],
            vec!['b'],
            vec!['c']
        ]);
    }

    #[test]
    fn counts() {
        for n in 0..=6 {
            let items: Vec<usize> = (0..n).collect();
            assert_eq!(combinations(&items).len(), (1 << n) - 1);
        }
    }

    #[test]
    fn empty_input() {
        assert!(combinations::<u8>(&[]).is_empty());
    }

    #[test]
    fn table_is_total_and_injective() {
        let fields: Vec<FieldDef> = ["a", "b", "c", "d"]
            .iter()
            .map(|name| {
                FieldDef::new(
                    syn::Ident::new(name, proc_macro2::Span::call_site()),
                    parse_quote!(i64),
                    None
                )
                .unwrap()
            })
            .collect();
        let table = DecisionTable::new(fields.iter().collect());
        assert_eq!(table.variants().len(), 16);
        assert!(table.variants().last().unwrap().fields.is_empty());

        let mut seen = BTreeSet::new();
        for mask in 0..16_u32 {
            let presence: Vec<bool> = (0..4).map(|i| mask & (1 << i) != 0).collect();
            let matches = table
                .variants()
                .iter()
                .filter(|v| v.presence == presence)
                .count();
            assert_eq!(matches, 1);

            let variant = table.lookup(&presence).unwrap();
            assert_eq!(variant.fields.len(), mask.count_ones() as usize);
            assert!(seen.insert(variant.kind().to_string()));
        }
    }

    #[test]
    fn variant_kind_names_fields() {
        let field = FieldDef::new(parse_quote!(network_id), parse_quote!(i64), None).unwrap();
        let table = DecisionTable::new(vec![&field]);
        assert_eq!(table.variants()[0].kind().to_string(), "objects-by-NetworkId");
        assert_eq!(table.variants()[1].kind().to_string(), "objects");
    }
}
