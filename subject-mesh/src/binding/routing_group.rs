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

//! Routing-group identity.
//!
//! The bus delivers each message once per routing group. Load-balanced subjects share one
//! group across the fleet; broadcast subjects get a group nobody else uses, so the bus
//! can never pick another instance over this one.

use crate::address::{Delivery, SEPARATOR};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Group token shared by every instance of every endpoint.
pub const SHARED_GROUP: &str = "q";

/// Leading token of an instance-unique group, followed by the instance id.
pub const INSTANCE_GROUP_PREFIX: &str = "id";

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RoutingGroup {
    /// Same token on every instance; the bus picks exactly one subscriber.
    Shared,
    /// Unique to one instance; every instance receives its own copy.
    Instance(String),
}

impl RoutingGroup {
    /// Group a subject with the given delivery must be bound under.
    ///
    /// Targeted subjects are only ever subscribed by the instance they name, so the shared
    /// group is sufficient for them.
    pub fn for_delivery(delivery: Delivery, instance_id: &str) -> Self {
        match delivery {
            Delivery::Broadcast => RoutingGroup::Instance(instance_id.to_string()),
            Delivery::LoadBalanced | Delivery::Targeted => RoutingGroup::Shared,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, RoutingGroup::Shared)
    }
}

impl Display for RoutingGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingGroup::Shared => f.write_str(SHARED_GROUP),
            RoutingGroup::Instance(id) => write!(f, "{INSTANCE_GROUP_PREFIX}{SEPARATOR}{id}"),
        }
    }
}

impl Serialize for RoutingGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::RoutingGroup;
    use crate::address::Delivery;

    #[test]
    fn broadcast_gets_instance_group() {
        let group = RoutingGroup::for_delivery(Delivery::Broadcast, "abc");

        assert_eq!(group, RoutingGroup::Instance("abc".to_string()));
        assert_eq!(group.to_string(), "id.abc");
        assert!(!group.is_shared());
    }

    #[test]
    fn non_broadcast_groups_ignore_instance() {
        for delivery in [Delivery::LoadBalanced, Delivery::Targeted] {
            let a = RoutingGroup::for_delivery(delivery, "instance-a");
            let b = RoutingGroup::for_delivery(delivery, "instance-b");

            assert_eq!(a, b);
            assert_eq!(a.to_string(), "q");
        }
    }

    #[test]
    fn instance_groups_differ_across_instances() {
        let a = RoutingGroup::for_delivery(Delivery::Broadcast, "instance-a");
        let b = RoutingGroup::for_delivery(Delivery::Broadcast, "instance-b");

        assert_ne!(a.to_string(), b.to_string());
    }
}
