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

//! Binding layer.
//!
//! Maps each subject descriptor to a bus subscription and owns the registration
//! lifecycle: in-order registration, rollback when the bus rejects a subscription, and
//! release on shutdown.

mod binder;
mod routing_group;

pub use binder::{BindError, Binder, Binding, Subscription};
pub use routing_group::{RoutingGroup, INSTANCE_GROUP_PREFIX, SHARED_GROUP};
