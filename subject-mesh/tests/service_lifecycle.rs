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

use integration_test_utils::{FailingSubscribeBus, MemoryBus, RecordingHandler};
use std::sync::Arc;
use subject_mesh::binding::BindError;
use subject_mesh::config::Config;
use subject_mesh::service::{RunningService, Service, ServiceError, ServiceOptions};
use subject_mesh::transport::SubscriptionId;

fn options(instance_id: &str) -> ServiceOptions {
    ServiceOptions {
        name: "lifecycle".to_string(),
        description: "service lifecycle test".to_string(),
        version_semver: "1.2.3".to_string(),
        config: Config {
            prefix: "svc".to_string(),
            topologies: vec!["eu.nl".to_string()],
            instance_id: Some(instance_id.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn start(
    bus: Arc<MemoryBus>,
    instance_id: &str,
    handler: Arc<RecordingHandler>,
) -> RunningService {
    let mut service = Service::new(options(instance_id), bus).expect("service");
    service.add_handler("echo", handler).expect("echo");
    service.start().await.expect("start")
}

#[tokio::test(flavor = "multi_thread")]
async fn two_started_services_share_load_and_both_see_broadcasts() {
    integration_test_utils::init_logging();

    let bus = Arc::new(MemoryBus::new());
    let h1 = Arc::new(RecordingHandler::new("n1"));
    let h2 = Arc::new(RecordingHandler::new("n2"));
    let s1 = start(bus.clone(), "n1", h1.clone()).await;
    let s2 = start(bus.clone(), "n2", h2.clone()).await;

    assert_eq!(s1.info().id, "n1");
    assert_eq!(s1.info().version_full, "1.2.3");
    assert_eq!(s1.subjects().len(), 8);
    assert_eq!(bus.subscription_count().await, 16);

    assert_eq!(bus.publish("svc.echo.all.eu.nl", "ping").await, 2);
    assert_eq!(bus.publish("svc.echo.any.eu.nl", "work").await, 1);
    assert_eq!(bus.publish("svc.echo.id.n2", "direct").await, 1);
    assert_eq!(h1.count() + h2.count(), 4);
    assert!(h2.subjects().await.contains(&"svc.echo.id.n2".to_string()));
    assert!(!h1.subjects().await.contains(&"svc.echo.id.n2".to_string()));

    s1.stop().await.expect("stop n1");
    assert_eq!(bus.subscription_count().await, 8);
    assert_eq!(bus.publish("svc.echo.all", "ping").await, 1);

    s2.stop().await.expect("stop n2");
    assert_eq!(bus.subscription_count().await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_endpoint_releases_every_endpoint_registered_before_it() {
    integration_test_utils::init_logging();

    // alpha takes calls 1..=8, beta fails on its second subscription.
    let bus = Arc::new(FailingSubscribeBus::new(10));
    let mut service = Service::new(options("n1"), bus.clone()).expect("service");
    service
        .add_handler("alpha", Arc::new(RecordingHandler::new("alpha")))
        .expect("alpha");
    service
        .add_handler("beta", Arc::new(RecordingHandler::new("beta")))
        .expect("beta");

    let err = match service.start().await {
        Ok(_) => panic!("start should fail"),
        Err(err) => err,
    };

    match &err {
        ServiceError::Bind {
            endpoint,
            source: BindError::Subscribe {
                subject,
                rolled_back,
                ..
            },
        } => {
            assert_eq!(endpoint, "beta");
            assert_eq!(subject, "svc.beta.all");
            assert_eq!(rolled_back, &vec!["svc.beta".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(bus.subscribe_calls().await.len(), 10);
    let unsubscribed = bus.unsubscribed().await;
    assert_eq!(unsubscribed.len(), 9);
    assert_eq!(unsubscribed[0], SubscriptionId(8));
    let mut released_alpha: Vec<u64> = unsubscribed[1..].iter().map(|id| id.0).collect();
    released_alpha.sort_unstable();
    assert_eq!(released_alpha, (0..8).collect::<Vec<u64>>());
}
