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

use integration_test_utils::RecordingHandler;
use std::sync::Arc;
use subject_mesh::address::expand;
use subject_mesh::binding::{Binder, Subscription};
use subject_mesh::transport::BusTransport;

pub(crate) const BASE: &str = "svc.echo";

/// One bound endpoint instance: its handler and the subscriptions holding it on the bus.
pub(crate) struct Instance {
    pub(crate) handler: Arc<RecordingHandler>,
    pub(crate) subscriptions: Vec<Subscription>,
}

pub(crate) async fn bind_instance(
    bus: Arc<dyn BusTransport>,
    topologies: &[&str],
    instance_id: &str,
) -> Instance {
    let descriptors = expand(BASE, topologies, instance_id).expect("valid address input");
    let handler = Arc::new(RecordingHandler::new(instance_id));

    let subscriptions = Binder::new(bus)
        .bind(handler.clone(), &descriptors, instance_id)
        .await
        .expect("binding should succeed");

    Instance {
        handler,
        subscriptions,
    }
}
