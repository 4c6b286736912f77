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

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use subject_mesh::binding::Binding;
use subject_mesh::transport::{
    BusError, BusErrorCode, BusTransport, MessageHandler, SubscriptionId,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Bus that accepts subscriptions until the `fail_on`-th call (1-based), which it rejects
/// with `UNAVAILABLE`. Every call is recorded.
pub struct FailingSubscribeBus {
    fail_on: usize,
    next_id: AtomicU64,
    subscribe_calls: Mutex<Vec<(String, String)>>,
    unsubscribed: Mutex<Vec<SubscriptionId>>,
}

impl FailingSubscribeBus {
    pub fn new(fail_on: usize) -> Self {
        Self {
            fail_on,
            next_id: AtomicU64::new(0),
            subscribe_calls: Mutex::new(Vec::new()),
            unsubscribed: Mutex::new(Vec::new()),
        }
    }

    /// `(subject, group)` of every subscribe call, including the rejected one.
    pub async fn subscribe_calls(&self) -> Vec<(String, String)> {
        self.subscribe_calls.lock().await.clone()
    }

    pub async fn unsubscribed(&self) -> Vec<SubscriptionId> {
        self.unsubscribed.lock().await.clone()
    }
}

#[async_trait]
impl BusTransport for FailingSubscribeBus {
    async fn subscribe(
        &self,
        binding: &Binding,
        _handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionId, BusError> {
        let mut calls = self.subscribe_calls.lock().await;
        calls.push((binding.subject().to_string(), binding.group().to_string()));

        if calls.len() == self.fail_on {
            debug!(subject = binding.subject(), "failing subscribe");
            return Err(BusError::fail_with_code(
                BusErrorCode::Unavailable,
                "Failing to subscribe",
            ));
        }
        Ok(SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), BusError> {
        debug!(subscription_id = %id, "unsubscribing");
        self.unsubscribed.lock().await.push(id);
        Ok(())
    }
}
