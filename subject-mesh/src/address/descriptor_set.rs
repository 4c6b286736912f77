/********************************************************************************
 * Copyright (c) 2025 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Ordered, deduplicated collection of subject descriptors for one endpoint.

use crate::address::name::SubjectDescriptor;
use serde::Serialize;
use std::collections::HashMap;

/// Descriptors sorted ascending by full subject (byte-wise).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DescriptorSet {
    names: Vec<SubjectDescriptor>,
}

impl DescriptorSet {
    /// Collapses a map keyed by full subject into a sorted set.
    pub(crate) fn from_map(names: HashMap<String, SubjectDescriptor>) -> Self {
        let mut names: Vec<SubjectDescriptor> = names.into_values().collect();
        names.sort_by(|a, b| a.full().as_bytes().cmp(b.full().as_bytes()));
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubjectDescriptor> {
        self.names.iter()
    }

    /// Full subjects in set order.
    pub fn full_names(&self) -> Vec<&str> {
        self.names.iter().map(SubjectDescriptor::full).collect()
    }

    /// Exact-match lookup by full subject.
    pub fn lookup(&self, full: &str) -> Option<&SubjectDescriptor> {
        self.names.iter().find(|candidate| candidate.full() == full)
    }

    pub fn contains(&self, full: &str) -> bool {
        self.lookup(full).is_some()
    }
}

impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a SubjectDescriptor;
    type IntoIter = std::slice::Iter<'a, SubjectDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl IntoIterator for DescriptorSet {
    type Item = SubjectDescriptor;
    type IntoIter = std::vec::IntoIter<SubjectDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::DescriptorSet;
    use crate::address::name::{Infix, SubjectDescriptor};
    use std::collections::HashMap;

    fn set_of(names: &[SubjectDescriptor]) -> DescriptorSet {
        let map: HashMap<String, SubjectDescriptor> = names
            .iter()
            .map(|name| (name.full().to_string(), name.clone()))
            .collect();
        DescriptorSet::from_map(map)
    }

    #[test]
    fn from_map_sorts_byte_wise() {
        let set = set_of(&[
            SubjectDescriptor::new("base", Infix::Id, "Z"),
            SubjectDescriptor::new("base", Infix::Any, ""),
            SubjectDescriptor::new("base", Infix::None, ""),
            SubjectDescriptor::new("base", Infix::All, "b"),
        ]);

        assert_eq!(
            set.full_names(),
            vec!["base", "base.all.b", "base.any", "base.id.Z"]
        );
    }

    #[test]
    fn lookup_finds_exact_matches_only() {
        let set = set_of(&[
            SubjectDescriptor::new("base", Infix::All, "a"),
            SubjectDescriptor::new("base", Infix::All, "a.b"),
        ]);

        assert_eq!(
            set.lookup("base.all.a").map(|name| name.scope()),
            Some("a")
        );
        assert!(set.lookup("base.all").is_none());
        assert!(!set.contains("base.all.a.b.c"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_set_reports_empty() {
        let set = DescriptorSet::default();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
