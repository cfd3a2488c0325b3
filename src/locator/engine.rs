//! The categorical store: categories, labels, indicators.

use std::collections::HashMap;

use crate::bits::BitArray;
use crate::buffer::DynamicArray;

use super::config::LocatorConfig;
use super::errors::{LocatorError, LocatorResult};
use super::ids::IdSource;

/// Reserved sentinel marking "no label" in dense category views and
/// combination tuples. Never a valid label id.
pub const UNDEFINED_LABEL: u32 = u32::MAX;

/// Categorical index engine over a shared row domain.
///
/// Rows are implicit positions `[0, size)` where `size` is the length
/// shared by every label's indicator; an engine with no labels has size 0
/// and adopts the size of the first indicator assigned to it.
///
/// Mutators return a status the caller branches on; queries against ids
/// the engine does not know return empty results, except the grouping
/// queries, which report an unknown category as `None`.
#[derive(Debug, Clone)]
pub struct Locator {
    /// Sorted list of every live label id.
    labels: DynamicArray<u32>,
    /// Sorted list of every category id.
    categories: DynamicArray<u32>,
    /// Label id to owning category id.
    in_category: HashMap<u32, u32>,
    /// Category id to its sorted member-label list.
    by_category: HashMap<u32, DynamicArray<u32>>,
    /// Label id to its indicator.
    indicators: HashMap<u32, BitArray>,
    /// Instance-owned fresh-id source.
    ids: IdSource,
}

impl Locator {
    /// Engine with default options.
    pub fn new() -> Self {
        Self::with_config(LocatorConfig::default())
    }

    /// Engine with a preallocated label-list capacity.
    pub fn with_label_hint(n_labels_hint: u32) -> Self {
        Self::with_config(LocatorConfig::with_label_hint(n_labels_hint))
    }

    /// Engine built from explicit options.
    pub fn with_config(config: LocatorConfig) -> Self {
        let mut labels = DynamicArray::with_len(config.label_capacity_hint);
        labels.seek_tail_to_start();

        let ids = match config.rng_seed {
            Some(seed) => IdSource::seeded(seed),
            None => IdSource::from_entropy(),
        };

        Self {
            labels,
            categories: DynamicArray::new(),
            in_category: HashMap::new(),
            by_category: HashMap::new(),
            indicators: HashMap::new(),
            ids,
        }
    }

    /// Shared indicator length; 0 when no labels exist.
    pub fn size(&self) -> u32 {
        match self.labels.tail_slice().first() {
            Some(label) => self.indicators[label].len(),
            None => 0,
        }
    }

    /// `true` when the engine holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of live labels.
    pub fn n_labels(&self) -> u32 {
        self.labels.tail()
    }

    /// Number of categories, empty ones included.
    pub fn n_categories(&self) -> u32 {
        self.categories.tail()
    }

    /// `true` when `label` is live in any category.
    pub fn has_label(&self, label: u32) -> bool {
        self.in_category.contains_key(&label)
    }

    /// `true` when `category` exists, with or without labels.
    pub fn has_category(&self, category: u32) -> bool {
        self.by_category.contains_key(&category)
    }

    /// Sorted list of live label ids.
    pub fn get_labels(&self) -> &DynamicArray<u32> {
        &self.labels
    }

    /// Sorted list of category ids.
    pub fn get_categories(&self) -> &DynamicArray<u32> {
        &self.categories
    }

    /// Number of rows carrying `label`; 0 for an unknown label.
    pub fn count(&self, label: u32) -> u32 {
        match self.indicators.get(&label) {
            Some(indicator) => indicator.sum(),
            None => 0,
        }
    }

    /// Category owning `label`, or `None` for an unknown label.
    pub fn which_category(&self, label: u32) -> Option<u32> {
        self.in_category.get(&label).copied()
    }

    /// `true` when both engines have the same category id set.
    pub fn categories_match(&self, other: &Locator) -> bool {
        self.categories.equal_contents(&other.categories)
    }

    /// `true` when both engines have the same label id set.
    pub fn labels_match(&self, other: &Locator) -> bool {
        self.labels.equal_contents(&other.labels)
    }

    /// Creates an empty category.
    pub fn add_category(&mut self, category: u32) -> LocatorResult<()> {
        if self.has_category(category) {
            return Err(LocatorError::CategoryExists);
        }
        self.unchecked_add_category(category);
        Ok(())
    }

    /// Creates `category` unless it already exists. Never errors.
    pub fn require_category(&mut self, category: u32) {
        if !self.has_category(category) {
            self.unchecked_add_category(category);
        }
    }

    fn unchecked_add_category(&mut self, category: u32) {
        self.categories.push(category);
        self.by_category.insert(category, DynamicArray::new());
        self.categories.sort();
    }

    /// Removes `category`, emptying (hence pruning) every label it owns.
    pub fn rm_category(&mut self, category: u32) -> LocatorResult<()> {
        if !self.has_category(category) {
            return Err(LocatorError::CategoryDoesNotExist);
        }

        let members: Vec<u32> = self.by_category[&category].tail_slice().to_vec();
        for label in members {
            if let Some(indicator) = self.indicators.get_mut(&label) {
                indicator.fill(false);
            }
        }
        self.prune();

        self.by_category.remove(&category);
        if let Ok(position) = self.categories.search(&category) {
            self.categories.erase(position);
        }

        Ok(())
    }

    /// Assigns the true rows of `indicator` to `label` under `category`.
    ///
    /// True rows are unioned into the label's own indicator (creating the
    /// label when new) and subtracted from every other label in the
    /// category, which keeps members pairwise disjoint. An empty engine
    /// adopts `indicator`'s length as its row domain.
    ///
    /// An all-false `indicator` is a no-op for a new label; assigned to an
    /// existing label it empties that label, which prunes it.
    pub fn set_category(
        &mut self,
        category: u32,
        label: u32,
        indicator: &BitArray,
    ) -> LocatorResult<()> {
        if !self.has_category(category) {
            return Err(LocatorError::CategoryDoesNotExist);
        }
        if label == UNDEFINED_LABEL {
            return Err(LocatorError::IsUndefinedLabel);
        }

        let is_present = self.has_label(label);
        if is_present && self.in_category[&label] != category {
            return Err(LocatorError::LabelExistsInOtherCategory);
        }

        if !self.is_empty() && indicator.len() != self.size() {
            return Err(LocatorError::WrongIndexSize);
        }

        if !indicator.any() {
            if is_present {
                if let Some(own) = self.indicators.get_mut(&label) {
                    own.fill(false);
                }
                self.prune();
            }
            return Ok(());
        }

        self.unchecked_set_category(category, label, is_present, indicator);
        Ok(())
    }

    /// Batch assignment: the i-th true row of `indicator` (ascending) goes
    /// to `labels[i]`.
    ///
    /// The true-row count must equal the label count; duplicate labels
    /// union their assigned rows. Each distinct label follows the
    /// single-label rules.
    pub fn set_category_multi(
        &mut self,
        category: u32,
        labels: &DynamicArray<u32>,
        indicator: &BitArray,
    ) -> LocatorResult<()> {
        if !self.has_category(category) {
            return Err(LocatorError::CategoryDoesNotExist);
        }
        if !self.is_empty() && indicator.len() != self.size() {
            return Err(LocatorError::WrongIndexSize);
        }
        if labels.tail() != indicator.sum() {
            return Err(LocatorError::WrongNumberOfIndices);
        }
        if !indicator.any() {
            return Ok(());
        }

        // distinct labels in first-occurrence order
        let mut distinct: Vec<u32> = Vec::new();
        for &label in labels.tail_slice() {
            if !distinct.contains(&label) {
                distinct.push(label);
            }
        }

        for &label in &distinct {
            if label == UNDEFINED_LABEL {
                return Err(LocatorError::IsUndefinedLabel);
            }
            if let Some(&owner) = self.in_category.get(&label) {
                if owner != category {
                    return Err(LocatorError::LabelExistsInOtherCategory);
                }
            }
        }

        let positions = BitArray::find(indicator, 0);
        let mut assigned = BitArray::with_len(indicator.len());

        for &label in &distinct {
            for (j, &candidate) in labels.tail_slice().iter().enumerate() {
                if candidate == label {
                    assigned.unchecked_place(true, positions.at(j as u32));
                }
            }

            let is_present = self.has_label(label);
            self.unchecked_set_category(category, label, is_present, &assigned);
            assigned.fill(false);
        }

        Ok(())
    }

    fn unchecked_set_category(
        &mut self,
        category: u32,
        label: u32,
        is_present: bool,
        indicator: &BitArray,
    ) {
        let size = self.size();
        let members: Vec<u32> = self.by_category[&category].tail_slice().to_vec();

        for member in members {
            if member == label {
                // updating a pre-existing label: union in the new rows
                if let Some(own) = self.indicators.get_mut(&member) {
                    own.union_range(indicator, 0, size);
                }
                continue;
            }
            if let Some(other) = self.indicators.get_mut(&member) {
                other.subtract_range(indicator, 0, size);
            }
        }

        if !is_present {
            self.labels.push(label);
            self.in_category.insert(label, category);
            self.indicators.insert(label, indicator.clone());

            let by_cat = self
                .by_category
                .get_mut(&category)
                .expect("category checked by caller");
            by_cat.push(label);
            by_cat.sort();
            self.labels.sort();
        }

        if self.labels.tail() > 1 {
            self.prune();
        }
    }

    /// Replaces the labels of `category` with one fresh label spanning
    /// their union. No-op when the category has fewer than two labels.
    pub fn collapse_category(&mut self, category: u32) -> LocatorResult<()> {
        if !self.has_category(category) {
            return Err(LocatorError::CategoryDoesNotExist);
        }

        let members: Vec<u32> = self.by_category[&category].tail_slice().to_vec();
        if members.len() <= 1 {
            return Ok(());
        }

        let size = self.size();
        let mut union = BitArray::with_len(size);
        for label in &members {
            union.union_range(&self.indicators[label], 0, size);
        }

        let fresh = self.fresh_label_id();
        self.unchecked_set_category(category, fresh, false, &union);

        Ok(())
    }

    /// Drops every label whose indicator went all-false.
    pub(super) fn prune(&mut self) {
        let dead: Vec<u32> = self
            .indicators
            .iter()
            .filter(|(_, indicator)| !indicator.any())
            .map(|(&label, _)| label)
            .collect();

        for label in dead {
            self.unlink_label(label);
        }
    }

    fn unlink_label(&mut self, label: u32) {
        self.indicators.remove(&label);

        if let Some(category) = self.in_category.remove(&label) {
            if let Some(by_cat) = self.by_category.get_mut(&category) {
                if let Ok(position) = by_cat.search(&label) {
                    by_cat.erase(position);
                }
            }
        }
        if let Ok(position) = self.labels.search(&label) {
            self.labels.erase(position);
        }
    }

    /// Keeps only the rows at `indices`, in the given order.
    ///
    /// The engine shrinks to `indices` length; an empty index list empties
    /// the engine entirely.
    pub fn keep(&mut self, indices: &DynamicArray<u32>) -> LocatorResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        if indices.tail() == 0 {
            self.empty();
            return Ok(());
        }

        let size = self.size();
        for &index in indices.tail_slice() {
            if index >= size {
                return Err(LocatorError::IndexOutOfBounds);
            }
        }

        self.unchecked_keep(indices, 0);
        Ok(())
    }

    /// `keep` without validation; `offset` is subtracted from each index.
    pub fn unchecked_keep(&mut self, indices: &DynamicArray<u32>, offset: u32) {
        for indicator in self.indicators.values_mut() {
            indicator.unchecked_keep(indices, offset);
        }
        self.prune();
    }

    /// Extends or truncates every indicator to `to` rows.
    ///
    /// Extension pads with false; shrinking can empty labels, which prunes
    /// them.
    pub fn resize(&mut self, to: u32) {
        let original = self.size();

        for indicator in self.indicators.values_mut() {
            indicator.resize(to);
        }
        if to < original {
            self.prune();
        }
    }

    /// Concatenates `other`'s rows after this engine's rows.
    ///
    /// Indicators are unioned by matching label id; a label present on one
    /// side only is padded with all-false filler sized to the other side's
    /// row extent. The category sets must match exactly.
    pub fn append(&mut self, other: &Locator) -> LocatorResult<()> {
        if !self.categories_match(other) {
            return Err(LocatorError::CategoriesDoNotMatch);
        }
        if other.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            let ids = self.ids.clone();
            *self = other.clone();
            self.ids = ids;
            return Ok(());
        }

        let original_size = self.size();
        let other_size = other.size();
        if u32::MAX - original_size < other_size {
            return Err(LocatorError::LocOverflow);
        }

        let own_labels: Vec<u32> = self.labels.tail_slice().to_vec();
        for label in own_labels {
            let own = self
                .indicators
                .get_mut(&label)
                .expect("live label has an indicator");
            match other.indicators.get(&label) {
                Some(theirs) => own.append(theirs),
                None => own.resize(original_size + other_size),
            }
        }

        for &label in other.labels.tail_slice() {
            if self.in_category.contains_key(&label) {
                continue;
            }
            let category = other.in_category[&label];

            let mut padded = BitArray::with_len(original_size);
            padded.append(&other.indicators[&label]);

            self.indicators.insert(label, padded);
            self.labels.push(label);
            self.in_category.insert(label, category);

            let by_cat = self
                .by_category
                .get_mut(&category)
                .expect("category sets match");
            by_cat.push(label);
            by_cat.sort();
        }
        self.labels.sort();

        Ok(())
    }

    /// Ascending rows carrying `label`, plus `offset`; empty when unknown.
    pub fn find(&self, label: u32, offset: u32) -> DynamicArray<u32> {
        match self.indicators.get(&label) {
            Some(indicator) => BitArray::find(indicator, offset),
            None => DynamicArray::new(),
        }
    }

    /// Conjunctive query across categories.
    ///
    /// Labels sharing a category are alternatives (OR); the per-category
    /// accumulators are intersected (AND). Any unknown label makes the
    /// result empty.
    pub fn find_labels(&self, labels: &DynamicArray<u32>, offset: u32) -> DynamicArray<u32> {
        let size = self.size();
        if self.labels.is_empty() || size == 0 {
            return DynamicArray::new();
        }

        let mut per_category: HashMap<u32, BitArray> = HashMap::new();
        for &label in labels.tail_slice() {
            let category = match self.in_category.get(&label) {
                Some(&category) => category,
                None => return DynamicArray::new(),
            };
            let indicator = &self.indicators[&label];

            match per_category.get_mut(&category) {
                Some(accumulator) => accumulator.union_range(indicator, 0, size),
                None => {
                    per_category.insert(category, indicator.clone());
                }
            }
        }

        let mut accumulator = BitArray::filled(size, true);
        for indicator in per_category.values() {
            accumulator.intersect_range(indicator, 0, size);
        }

        BitArray::find(&accumulator, offset)
    }

    /// Renames label `from` to `to` in place.
    pub fn swap_label(&mut self, from: u32, to: u32) -> LocatorResult<()> {
        if !self.has_label(from) {
            return Err(LocatorError::LabelDoesNotExist);
        }
        if self.has_label(to) {
            return Err(LocatorError::LabelExists);
        }

        let category = self
            .in_category
            .remove(&from)
            .expect("label presence checked");
        self.in_category.insert(to, category);

        let by_cat = self
            .by_category
            .get_mut(&category)
            .expect("label's category exists");
        if let Ok(position) = by_cat.search(&from) {
            by_cat.erase(position);
        }
        by_cat.push(to);
        by_cat.sort();

        let indicator = self
            .indicators
            .remove(&from)
            .expect("live label has an indicator");
        self.indicators.insert(to, indicator);

        if let Ok(position) = self.labels.search(&from) {
            self.labels.erase(position);
        }
        self.labels.push(to);
        self.labels.sort();

        Ok(())
    }

    /// Renames category `from` to `to` in place.
    pub fn swap_category(&mut self, from: u32, to: u32) -> LocatorResult<()> {
        if !self.has_category(from) {
            return Err(LocatorError::CategoryDoesNotExist);
        }
        if self.has_category(to) {
            return Err(LocatorError::CategoryExists);
        }

        let members = self
            .by_category
            .remove(&from)
            .expect("category presence checked");
        for &label in members.tail_slice() {
            self.in_category.insert(label, to);
        }
        self.by_category.insert(to, members);

        if let Ok(position) = self.categories.search(&from) {
            self.categories.erase(position);
        }
        self.categories.push(to);
        self.categories.sort();

        Ok(())
    }

    /// Removes every label but keeps the categories.
    pub fn empty(&mut self) {
        self.labels.clear();
        self.in_category.clear();
        self.indicators.clear();
        for members in self.by_category.values_mut() {
            members.clear();
        }
    }

    /// Removes everything, categories included.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.categories.clear();
        self.in_category.clear();
        self.by_category.clear();
        self.indicators.clear();
    }

    /// Draws a label id not currently in use and not the undefined
    /// sentinel.
    pub fn fresh_label_id(&mut self) -> u32 {
        let in_category = &self.in_category;
        self.ids
            .fresh_id(UNDEFINED_LABEL, |id| in_category.contains_key(&id))
    }

    pub(super) fn indicator(&self, label: u32) -> Option<&BitArray> {
        self.indicators.get(&label)
    }

    pub(super) fn members_of(&self, category: u32) -> Option<&DynamicArray<u32>> {
        self.by_category.get(&category)
    }

    pub(super) fn register_label(&mut self, category: u32, label: u32, indicator: BitArray) {
        self.labels.push(label);
        self.labels.sort();
        self.in_category.insert(label, category);
        self.indicators.insert(label, indicator);

        let by_cat = self
            .by_category
            .get_mut(&category)
            .expect("category exists when registering");
        by_cat.push(label);
        by_cat.sort();
    }

    pub(super) fn indicator_mut(&mut self, label: u32) -> Option<&mut BitArray> {
        self.indicators.get_mut(&label)
    }

    pub(super) fn indicators_mut(
        &mut self,
    ) -> std::collections::hash_map::ValuesMut<'_, u32, BitArray> {
        self.indicators.values_mut()
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Locator {
    /// Equal iff same size, same category set, same label set, and
    /// identical indicators.
    fn eq(&self, other: &Locator) -> bool {
        let size = self.size();
        if size != other.size() {
            return false;
        }
        if !self.categories_match(other) {
            return false;
        }
        if !self.labels_match(other) {
            return false;
        }

        let mut agreement = BitArray::with_len(size);
        for &label in self.labels.tail_slice() {
            BitArray::unchecked_dot_eq(
                &mut agreement,
                &self.indicators[&label],
                &other.indicators[&label],
                0,
                size,
            );
            if !agreement.all() {
                return false;
            }
            agreement.fill(false);
        }

        true
    }
}
