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

//! Topology expansion of an endpoint base name into its full subject set.

use crate::address::descriptor_set::DescriptorSet;
use crate::address::error::AddressError;
use crate::address::name::{Infix, SubjectDescriptor, SEPARATOR};
use std::collections::HashMap;

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c == '*' || c == '>' || c.is_whitespace())
}

fn valid_dotted(value: &str) -> bool {
    value.split(SEPARATOR).all(valid_segment)
}

fn validate(base: &str, topologies: &[impl AsRef<str>], id: &str) -> Result<(), AddressError> {
    if base.is_empty() {
        return Err(AddressError::EmptyBase);
    }
    if !valid_dotted(base) {
        return Err(AddressError::InvalidBase(base.to_string()));
    }
    for topology in topologies {
        let topology: &str = topology.as_ref();
        if !topology.is_empty() && !valid_dotted(topology) {
            return Err(AddressError::InvalidTopology(topology.to_string()));
        }
    }
    if !id.is_empty() && (id.contains(SEPARATOR) || !valid_segment(id)) {
        return Err(AddressError::InvalidInstanceId(id.to_string()));
    }
    Ok(())
}

/// Expands `base` with every level of the given topologies and drops duplicates.
///
/// A base of `"base"`, topologies `["a.x.y", "b"]` and id `"x123"` expands to:
///
/// - `base`
/// - `base.all`
/// - `base.all.a`
/// - `base.all.a.x`
/// - `base.all.a.x.y`
/// - `base.all.b`
/// - `base.any`
/// - `base.any.a`
/// - `base.any.a.x`
/// - `base.any.a.x.y`
/// - `base.any.b`
/// - `base.id.x123`
///
/// Empty topology labels are ignored and an empty `id` omits the `base.id.*` subject.
///
/// # Errors
///
/// Returns an [`AddressError`] if `base` is empty or has an empty segment (leading,
/// trailing or doubled separator), if a non-empty topology has an empty segment, or if
/// `id` is not a single segment.
///
/// # Examples
///
/// ```
/// use subject_mesh::address::expand;
///
/// let names = expand("base", &["a.b"], "id1").unwrap();
/// assert_eq!(
///     names.full_names(),
///     vec![
///         "base",
///         "base.all",
///         "base.all.a",
///         "base.all.a.b",
///         "base.any",
///         "base.any.a",
///         "base.any.a.b",
///         "base.id.id1",
///     ]
/// );
/// ```
pub fn expand(
    base: &str,
    topologies: &[impl AsRef<str>],
    id: &str,
) -> Result<DescriptorSet, AddressError> {
    validate(base, topologies, id)?;

    let mut names: HashMap<String, SubjectDescriptor> = HashMap::new();
    let mut add_name = |infix: Infix, tail: &str| {
        let name = SubjectDescriptor::new(base, infix, tail);
        names.insert(name.full().to_string(), name);
    };

    add_name(Infix::None, "");
    add_name(Infix::All, "");
    add_name(Infix::Any, "");
    if !id.is_empty() {
        add_name(Infix::Id, id);
    }

    for topology in topologies {
        let topology: &str = topology.as_ref();
        if topology.is_empty() {
            continue;
        }
        // "eu.nl.ams", "eu.nl", "eu"
        let mut scope = topology;
        loop {
            add_name(Infix::All, scope);
            add_name(Infix::Any, scope);
            match scope.rfind(SEPARATOR) {
                Some(idx) => scope = &scope[..idx],
                None => break,
            }
        }
    }

    Ok(DescriptorSet::from_map(names))
}

#[cfg(test)]
mod tests {
    use super::expand;
    use crate::address::error::AddressError;
    use crate::address::name::Delivery;

    const NO_TOPOLOGY: [&str; 0] = [];

    #[test]
    fn expand_exposes_descriptor_fields() {
        let names = expand("base", &["a.b"], "id1").expect("valid input");
        let name = names.lookup("base.all.a").expect("scoped broadcast subject");

        assert_eq!(name.full(), "base.all.a");
        assert_eq!(name.base(), "base");
        assert_eq!(name.suffix(), "all.a");
        assert_eq!(name.scope(), "a");
        assert!(name.is_broadcast());
    }

    #[test]
    fn expand_matches_expected_subjects() {
        struct Case {
            name: &'static str,
            topologies: Vec<&'static str>,
            id: &'static str,
            expected: Vec<&'static str>,
        }

        let cases = vec![
            Case {
                name: "empty-list",
                topologies: vec![],
                id: "",
                expected: vec!["base", "base.all", "base.any"],
            },
            Case {
                name: "with-single-level",
                topologies: vec!["a", "b"],
                id: "",
                expected: vec![
                    "base",
                    "base.all",
                    "base.all.a",
                    "base.all.b",
                    "base.any",
                    "base.any.a",
                    "base.any.b",
                ],
            },
            Case {
                name: "with-multi-level",
                topologies: vec!["a.x.y", "b"],
                id: "",
                expected: vec![
                    "base",
                    "base.all",
                    "base.all.a",
                    "base.all.a.x",
                    "base.all.a.x.y",
                    "base.all.b",
                    "base.any",
                    "base.any.a",
                    "base.any.a.x",
                    "base.any.a.x.y",
                    "base.any.b",
                ],
            },
            Case {
                name: "with-multi-level-id",
                topologies: vec!["a.x.y", "b"],
                id: "x123",
                expected: vec![
                    "base",
                    "base.all",
                    "base.all.a",
                    "base.all.a.x",
                    "base.all.a.x.y",
                    "base.all.b",
                    "base.any",
                    "base.any.a",
                    "base.any.a.x",
                    "base.any.a.x.y",
                    "base.any.b",
                    "base.id.x123",
                ],
            },
        ];

        for case in cases {
            let names = expand("base", &case.topologies, case.id).expect(case.name);
            assert_eq!(names.full_names(), case.expected, "case {}", case.name);
        }
    }

    #[test]
    fn concrete_scenario_flags_only_all_subjects_as_broadcast() {
        let names = expand("base", &["a.b"], "id1").expect("valid input");

        assert_eq!(names.len(), 8);
        let broadcast: Vec<&str> = names
            .iter()
            .filter(|name| name.is_broadcast())
            .map(|name| name.full())
            .collect();
        assert_eq!(broadcast, vec!["base.all", "base.all.a", "base.all.a.b"]);
        assert_eq!(
            names.lookup("base.id.id1").map(|name| name.delivery()),
            Some(Delivery::Targeted)
        );
    }

    #[test]
    fn every_subject_starts_with_base_and_is_unique() {
        let names = expand("svc.echo", &["eu.nl.ams", "eu.de", "us"], "abc").expect("valid");
        let mut seen = std::collections::HashSet::new();

        for name in &names {
            assert!(name.full().starts_with("svc.echo"));
            assert!(seen.insert(name.full().to_string()), "{} duplicated", name);
        }
    }

    #[test]
    fn expand_is_deterministic() {
        let topologies = ["c.d", "a.b.c", "a"];
        let first = expand("base", &topologies, "i").expect("valid");
        let second = expand("base", &topologies, "i").expect("valid");

        assert_eq!(first, second);
    }

    #[test]
    fn prefixes_cover_each_level_and_nothing_else() {
        let names = expand("base", &["a.b.c"], "").expect("valid");
        let mut scopes: Vec<&str> = names
            .iter()
            .filter(|name| name.is_broadcast())
            .map(|name| name.scope())
            .filter(|scope| !scope.is_empty())
            .collect();
        scopes.sort_unstable();

        assert_eq!(scopes, vec!["a", "a.b", "a.b.c"]);
        for scope in ["a", "a.b", "a.b.c"] {
            assert!(names.contains(&format!("base.any.{scope}")));
        }
        assert!(!names.contains("base.all.b"));
        assert!(!names.contains("base.all.b.c"));
        assert!(!names.contains("base.any.c"));
    }

    #[test]
    fn overlapping_topologies_collapse() {
        let names = expand("base", &["a.b", "a"], "").expect("valid");
        let scoped_to_a = names.iter().filter(|name| name.scope() == "a").count();

        assert_eq!(scoped_to_a, 2);
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn empty_topology_labels_are_ignored() {
        let names = expand("base", &["", "a"], "").expect("valid");
        assert_eq!(
            names.full_names(),
            vec!["base", "base.all", "base.all.a", "base.any", "base.any.a"]
        );
    }

    #[test]
    fn id_subject_present_only_for_non_empty_id() {
        let without = expand("base", &NO_TOPOLOGY, "").expect("valid");
        let with = expand("base", &NO_TOPOLOGY, "n1").expect("valid");

        assert_eq!(
            without
                .iter()
                .filter(|name| name.full().starts_with("base.id."))
                .count(),
            0
        );
        assert_eq!(
            with.iter()
                .filter(|name| name.full().starts_with("base.id."))
                .count(),
            1
        );
    }

    #[test]
    fn malformed_base_fails_fast() {
        assert_eq!(
            expand("", &NO_TOPOLOGY, "").unwrap_err(),
            AddressError::EmptyBase
        );
        for base in ["base.", ".base", "a..b", "a.*", "a b", "svc.>"] {
            assert_eq!(
                expand(base, &NO_TOPOLOGY, "").unwrap_err(),
                AddressError::InvalidBase(base.to_string())
            );
        }
    }

    #[test]
    fn malformed_topology_and_id_are_rejected() {
        assert_eq!(
            expand("base", &["eu..ams"], "").unwrap_err(),
            AddressError::InvalidTopology("eu..ams".to_string())
        );
        assert_eq!(
            expand("base", &["eu.nl."], "").unwrap_err(),
            AddressError::InvalidTopology("eu.nl.".to_string())
        );
        assert_eq!(
            expand("base", &NO_TOPOLOGY, "a.b").unwrap_err(),
            AddressError::InvalidInstanceId("a.b".to_string())
        );
    }

    #[test]
    fn namespaced_base_keeps_base_intact() {
        let names = expand("svc.echo", &["eu"], "").expect("valid");
        let name = names.lookup("svc.echo.any.eu").expect("scoped subject");

        assert_eq!(name.base(), "svc.echo");
        assert_eq!(name.suffix(), "any.eu");
    }
}
