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

//! Bus transport seam.
//!
//! The bus owns its connection, reconnect policy and message dispatch. The only thing
//! this crate asks of it is to create and remove subscriptions under a routing group.

use crate::binding::Binding;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BusErrorCode {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Unavailable,
    Internal,
}

impl BusErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            BusErrorCode::AlreadyExists => "ALREADY_EXISTS",
            BusErrorCode::NotFound => "NOT_FOUND",
            BusErrorCode::Unavailable => "UNAVAILABLE",
            BusErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Status reported by a bus transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BusError {
    pub code: BusErrorCode,
    pub message: String,
}

impl BusError {
    pub fn fail_with_code(code: BusErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for BusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl Error for BusError {}

/// Opaque handle assigned by the bus to one subscription.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubscriptionId(pub u64);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Inbound message as dispatched by the bus.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Message {
    pub subject: String,
    pub reply: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(subject: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            subject: subject.into(),
            payload: payload.into(),
            ..Default::default()
        }
    }
}

/// Endpoint handler invoked by the bus for every message on a bound subject.
///
/// The bus may call `on_receive` concurrently from several worker contexts, with no
/// ordering across subjects.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_receive(&self, message: Message);
}

/// Narrow view of the message bus used by the binder.
#[async_trait]
pub trait BusTransport: Send + Sync {
    /// Creates one subscription on `binding.subject()` in `binding.group()`, attaching
    /// `binding.metadata()` for operational tooling.
    async fn subscribe(
        &self,
        binding: &Binding,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionId, BusError>;

    /// Removes a subscription previously returned by [`BusTransport::subscribe`].
    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), BusError>;
}
