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
use std::sync::atomic::{AtomicUsize, Ordering};
use subject_mesh::transport::{Message, MessageHandler};
use tokio::sync::Mutex;
use tracing::debug;

/// Handler that keeps every message it receives.
pub struct RecordingHandler {
    name: String,
    count: AtomicUsize,
    received: Mutex<Vec<Message>>,
}

impl RecordingHandler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Subjects of received messages, in arrival order.
    pub async fn subjects(&self) -> Vec<String> {
        self.received
            .lock()
            .await
            .iter()
            .map(|message| message.subject.clone())
            .collect()
    }

    pub async fn received(&self) -> Vec<Message> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn on_receive(&self, message: Message) {
        debug!("{}: received message on {}", self.name, message.subject);
        self.received.lock().await.push(message);
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
