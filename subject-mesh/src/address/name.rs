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

//! Subject descriptor data model.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Literal separator between subject segments.
pub const SEPARATOR: char = '.';

/// The literal token placed between the base and the scope or instance id.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Infix {
    /// The bare base subject.
    None,
    /// `base.all[.scope]`
    All,
    /// `base.any[.scope]`
    Any,
    /// `base.id.<instance id>`
    Id,
}

impl Infix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Infix::None => "",
            Infix::All => "all",
            Infix::Any => "any",
            Infix::Id => "id",
        }
    }

    /// Delivery guarantee implied by this infix.
    pub fn delivery(&self) -> Delivery {
        match self {
            Infix::All => Delivery::Broadcast,
            Infix::None | Infix::Any => Delivery::LoadBalanced,
            Infix::Id => Delivery::Targeted,
        }
    }
}

/// How a message published on a subject reaches the subscribing instances.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Every live instance receives the message.
    Broadcast,
    /// Exactly one instance, picked by the bus load balancer.
    LoadBalanced,
    /// The one instance named by the subject.
    Targeted,
}

impl Delivery {
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Delivery::Broadcast)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Broadcast => "broadcast",
            Delivery::LoadBalanced => "load_balanced",
            Delivery::Targeted => "targeted",
        }
    }
}

impl Display for Delivery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins two subject fragments, skipping empty ones.
pub(crate) fn join(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a}{SEPARATOR}{b}"),
    }
}

///
/// [`SubjectDescriptor`] is one fully-qualified subject an endpoint instance listens on,
/// together with the delivery semantics it must be bound with.
///
/// `full` always equals `base`, the infix token and the scope (or instance id) joined by
/// `.`, skipping empty parts. Two descriptors with the same `full` are the same descriptor.
///
/// # Examples
///
/// ```
/// use subject_mesh::address::{Delivery, Infix, SubjectDescriptor};
///
/// let name = SubjectDescriptor::new("base", Infix::All, "a.x");
/// assert_eq!(name.full(), "base.all.a.x");
/// assert_eq!(name.suffix(), "all.a.x");
/// assert_eq!(name.scope(), "a.x");
/// assert_eq!(name.delivery(), Delivery::Broadcast);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct SubjectDescriptor {
    full: String,
    base: String,
    suffix: String,
    scope: String,
    infix: Infix,
}

impl SubjectDescriptor {
    /// Builds a descriptor. For [`Infix::Id`] the `tail` is the instance id, otherwise it is
    /// the topology scope (possibly empty).
    pub fn new(base: &str, infix: Infix, tail: &str) -> Self {
        let suffix = join(infix.as_str(), tail);
        let full = join(base, &suffix);
        let scope = match infix {
            Infix::All | Infix::Any => tail.to_string(),
            Infix::None | Infix::Id => String::new(),
        };

        Self {
            full,
            base: base.to_string(),
            suffix,
            scope,
            infix,
        }
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Portion of the subject after the base, e.g. `all.a.x`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Topology prefix this descriptor targets; empty for unscoped descriptors.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn infix(&self) -> Infix {
        self.infix
    }

    pub fn delivery(&self) -> Delivery {
        self.infix.delivery()
    }

    pub fn is_broadcast(&self) -> bool {
        self.delivery().is_broadcast()
    }
}

impl Display for SubjectDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}
