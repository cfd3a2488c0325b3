//! Cross-category combination queries and dense category views.
//!
//! A combination is the tuple of labels (one per requested category) a row
//! carries, with the undefined sentinel standing in where a row has no
//! label in a category. Enumeration hashes each row's tuple and
//! deduplicates in one pass, collecting the row list per distinct tuple.

use std::collections::HashMap;

use crate::bits::BitArray;
use crate::buffer::DynamicArray;

use super::engine::{Locator, UNDEFINED_LABEL};

/// Distinct label combinations and, per combination, its rows.
///
/// `combinations` holds one stride of labels per distinct tuple (stride
/// length = number of requested categories, in request order);
/// `indices` is parallel to the strides.
#[derive(Debug, Clone, Default)]
pub struct FindAll {
    /// Flattened label tuples.
    pub combinations: DynamicArray<u32>,
    /// Ascending row list per distinct tuple.
    pub indices: DynamicArray<DynamicArray<u32>>,
}

impl FindAll {
    /// Number of distinct combinations.
    pub fn len(&self) -> u32 {
        self.indices.tail()
    }

    /// `true` when no combination was found.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl Locator {
    /// Sorted member labels of `category`, or `None` when unknown.
    pub fn all_in_category(&self, category: u32) -> Option<DynamicArray<u32>> {
        self.members_of(category).cloned()
    }

    /// Dense row-to-label view of `category` with unlabeled rows set to
    /// the undefined sentinel, or `None` when the category is unknown.
    pub fn full_category(&self, category: u32) -> Option<DynamicArray<u32>> {
        self.full_category_filled(category, UNDEFINED_LABEL)
    }

    /// Dense row-to-label view of `category`; unlabeled rows get `fill`.
    pub fn full_category_filled(&self, category: u32, fill: u32) -> Option<DynamicArray<u32>> {
        let members = self.members_of(category)?;

        let size = self.size();
        let mut result = DynamicArray::with_len(size);
        for slot in result.as_mut_slice() {
            *slot = fill;
        }

        for &label in members.tail_slice() {
            if let Some(indicator) = self.indicator(label) {
                for &row in BitArray::find(indicator, 0).tail_slice() {
                    result.unchecked_place(label, row);
                }
            }
        }

        Some(result)
    }

    /// `true` when the labels of `category` cover every row, or `None`
    /// when the category is unknown.
    pub fn is_full_category(&self, category: u32) -> Option<bool> {
        let members = self.members_of(category)?;

        let mut covered = 0u32;
        for &label in members.tail_slice() {
            covered += self.count(label);
        }
        // members are pairwise disjoint, so the sums add without overlap
        Some(covered == self.size())
    }

    /// Distinct label tuples that co-occur on some row, or `None` when a
    /// requested category is unknown.
    pub fn combinations(&self, categories: &DynamicArray<u32>) -> Option<DynamicArray<u32>> {
        self.find_all(categories, 0).map(|found| found.combinations)
    }

    /// One-pass GROUP BY over the requested categories.
    ///
    /// Hashes each row's label tuple, deduplicating into distinct
    /// combinations and collecting each combination's ascending row list
    /// (rows reported plus `offset`). `None` when a requested category is
    /// unknown.
    pub fn find_all(&self, categories: &DynamicArray<u32>, offset: u32) -> Option<FindAll> {
        let mut result = FindAll::default();

        let n_categories = categories.tail();
        if n_categories == 0 {
            return Some(result);
        }

        let mut dense = Vec::with_capacity(n_categories as usize);
        for &category in categories.tail_slice() {
            dense.push(self.full_category_filled(category, UNDEFINED_LABEL)?);
        }

        let size = self.size();
        let mut seen: HashMap<Vec<u32>, u32> = HashMap::new();
        let mut tuple = vec![0u32; n_categories as usize];
        let mut next_id = 0u32;

        for row in 0..size {
            for (j, view) in dense.iter().enumerate() {
                tuple[j] = view.at(row);
            }

            let combination = match seen.get(tuple.as_slice()) {
                Some(&index) => index,
                None => {
                    for &label in &tuple {
                        result.combinations.push(label);
                    }
                    result.indices.push(DynamicArray::new());
                    seen.insert(tuple.clone(), next_id);
                    let index = next_id;
                    next_id += 1;
                    index
                }
            };

            result.indices.as_mut_slice()[combination as usize].push(row + offset);
        }

        Some(result)
    }

    /// Reduces the engine to one representative row per distinct
    /// combination of the requested categories.
    ///
    /// Requested categories carry their combination labels over directly.
    /// Each remaining category keeps the label its rows agree on; where a
    /// combination's rows disagree (mixed labels, or labeled mixed with
    /// unlabeled), the rows merge under one fresh collapsed label per
    /// category. Returns the combinations that defined the reduction, or
    /// `None` when a requested category is unknown.
    pub fn keep_each(&mut self, categories: &DynamicArray<u32>, offset: u32) -> Option<FindAll> {
        let found = self.find_all(categories, offset)?;
        let n_combinations = found.indices.tail();
        let n_categories = categories.tail();

        let mut remaining = self.get_categories().clone();
        for &category in categories.tail_slice() {
            if let Ok(position) = remaining.search(&category) {
                remaining.erase(position);
            }
        }

        let mut reduced = self.clone();
        for indicator in reduced.indicators_mut() {
            indicator.resize(n_combinations);
            indicator.fill(false);
        }

        // one collapsed label per category, created on first disagreement
        let mut collapsed: HashMap<u32, u32> = HashMap::new();

        for i in 0..n_combinations {
            for j in 0..n_categories {
                let label = found.combinations.at(i * n_categories + j);
                if label == UNDEFINED_LABEL {
                    continue;
                }
                if let Some(indicator) = reduced.indicator_mut(label) {
                    indicator.place(true, i);
                }
            }

            let rows = found.indices.ref_at(i).tail_slice();

            for &category in remaining.tail_slice() {
                let members = match self.members_of(category) {
                    Some(members) if !members.is_empty() => members,
                    _ => continue,
                };

                let label_at = |row: u32| -> Option<u32> {
                    members.tail_slice().iter().copied().find(|&label| {
                        self.indicator(label)
                            .map(|indicator| indicator.at(row))
                            .unwrap_or(false)
                    })
                };

                let first = label_at(rows[0] - offset);
                let agrees = rows[1..].iter().all(|&row| label_at(row - offset) == first);

                if agrees {
                    // fully unlabeled rows stay unlabeled
                    if let Some(label) = first {
                        if let Some(indicator) = reduced.indicator_mut(label) {
                            indicator.place(true, i);
                        }
                    }
                    continue;
                }

                let label = match collapsed.get(&category) {
                    Some(&label) => label,
                    None => {
                        let fresh = reduced.fresh_label_id();
                        reduced.register_label(category, fresh, BitArray::with_len(n_combinations));
                        collapsed.insert(category, fresh);
                        fresh
                    }
                };
                if let Some(indicator) = reduced.indicator_mut(label) {
                    indicator.place(true, i);
                }
            }
        }

        reduced.prune();
        *self = reduced;

        Some(found)
    }
}
