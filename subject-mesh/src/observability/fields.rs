/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
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

//! Canonical structured field keys and value-format helpers.

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";

pub const ENDPOINT: &str = "endpoint";
pub const SUBJECT: &str = "subject";
pub const GROUP: &str = "group";
pub const SCOPE: &str = "scope";
pub const DELIVERY: &str = "delivery";
pub const INSTANCE_ID: &str = "instance_id";
pub const TOPOLOGIES: &str = "topologies";
pub const SUBSCRIPTION_ID: &str = "subscription_id";

pub const COUNT: &str = "count";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_ROLLBACK_AFTER_SUBSCRIBE_FAILURE: &str = "rollback_after_subscribe_failure";
pub const REASON_ROLLBACK_AFTER_START_FAILURE: &str = "rollback_after_start_failure";

/// Metadata key under which a subscription's topology scope is attached.
pub const TOPO_METADATA_KEY: &str = "topo";

/// Scope value for log output; unscoped subjects render as [`NONE`].
pub fn format_scope(scope: &str) -> &str {
    if scope.is_empty() {
        NONE
    } else {
        scope
    }
}

/// Space-separated topology list, as exposed in service metadata.
pub fn join_topologies(topologies: &[String]) -> String {
    topologies.join(" ")
}
