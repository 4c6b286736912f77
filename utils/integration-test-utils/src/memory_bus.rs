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
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use subject_mesh::binding::Binding;
use subject_mesh::transport::{
    BusError, BusErrorCode, BusTransport, Message, MessageHandler, SubscriptionId,
};
use tokio::sync::Mutex;
use tracing::debug;

struct Entry {
    subject: String,
    group: String,
    metadata: BTreeMap<String, String>,
    handler: Arc<dyn MessageHandler>,
}

#[derive(Default)]
struct BusState {
    subscriptions: BTreeMap<SubscriptionId, Entry>,
    cursors: HashMap<(String, String), usize>,
}

/// Point-in-time view of one subscription held by a [`MemoryBus`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionSnapshot {
    pub id: SubscriptionId,
    pub subject: String,
    pub group: String,
    pub metadata: BTreeMap<String, String>,
}

/// In-process bus with queue-group semantics: a published message reaches exactly one
/// subscriber per `(subject, group)`, picked round-robin.
#[derive(Default)]
pub struct MemoryBus {
    next_id: AtomicU64,
    state: Mutex<BusState>,
}

fn same_handler(a: &Arc<dyn MessageHandler>, b: &Arc<dyn MessageHandler>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `payload` on `subject`. Returns the number of handlers invoked.
    pub async fn publish(&self, subject: &str, payload: impl Into<Vec<u8>>) -> usize {
        let targets: Vec<Arc<dyn MessageHandler>> = {
            let mut state = self.state.lock().await;

            let mut groups: BTreeMap<String, Vec<Arc<dyn MessageHandler>>> = BTreeMap::new();
            for entry in state.subscriptions.values() {
                if entry.subject == subject {
                    groups
                        .entry(entry.group.clone())
                        .or_default()
                        .push(entry.handler.clone());
                }
            }

            groups
                .into_iter()
                .filter_map(|(group, members)| {
                    let cursor = state
                        .cursors
                        .entry((subject.to_string(), group))
                        .or_insert(0);
                    let picked = members.get(*cursor % members.len()).cloned();
                    *cursor += 1;
                    picked
                })
                .collect()
        };

        let message = Message::new(subject, payload);
        for handler in &targets {
            handler.on_receive(message.clone()).await;
        }

        debug!(subject, delivered = targets.len(), "memory bus published");
        targets.len()
    }

    pub async fn subscription_count(&self) -> usize {
        self.state.lock().await.subscriptions.len()
    }

    /// All live subscriptions, in creation order.
    pub async fn subscriptions(&self) -> Vec<SubscriptionSnapshot> {
        self.state
            .lock()
            .await
            .subscriptions
            .iter()
            .map(|(id, entry)| SubscriptionSnapshot {
                id: *id,
                subject: entry.subject.clone(),
                group: entry.group.clone(),
                metadata: entry.metadata.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl BusTransport for MemoryBus {
    async fn subscribe(
        &self,
        binding: &Binding,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionId, BusError> {
        let group = binding.group().to_string();
        let mut state = self.state.lock().await;

        let duplicate = state.subscriptions.values().any(|entry| {
            entry.subject == binding.subject()
                && entry.group == group
                && same_handler(&entry.handler, &handler)
        });
        if duplicate {
            return Err(BusError::fail_with_code(
                BusErrorCode::AlreadyExists,
                format!("handler already subscribed to {} in {group}", binding.subject()),
            ));
        }

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        state.subscriptions.insert(
            id,
            Entry {
                subject: binding.subject().to_string(),
                group,
                metadata: binding.metadata(),
                handler,
            },
        );
        Ok(id)
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), BusError> {
        match self.state.lock().await.subscriptions.remove(&id) {
            Some(_) => Ok(()),
            None => Err(BusError::fail_with_code(
                BusErrorCode::NotFound,
                format!("no subscription {id}"),
            )),
        }
    }
}
