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

//! Delivery-semantics binder: one bus subscription per subject descriptor.

use crate::address::{Delivery, DescriptorSet, SubjectDescriptor, SEPARATOR};
use crate::binding::routing_group::RoutingGroup;
use crate::observability::{events, fields};
use crate::transport::{BusError, BusTransport, MessageHandler, SubscriptionId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "binder";

/// Binder failures.
#[derive(Debug)]
pub enum BindError {
    /// A broadcast subject needs an instance id to derive its routing group.
    MissingInstanceId,
    /// The bus rejected a subscription. Every subscription created before it was rolled
    /// back and no further subscriptions were attempted.
    Subscribe {
        subject: String,
        rolled_back: Vec<String>,
        source: BusError,
    },
}

impl BindError {
    /// The bus error that aborted binding, unchanged.
    pub fn bus_error(&self) -> Option<&BusError> {
        match self {
            BindError::Subscribe { source, .. } => Some(source),
            BindError::MissingInstanceId => None,
        }
    }
}

impl Display for BindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::MissingInstanceId => {
                write!(f, "broadcast subjects require a non-empty instance id")
            }
            BindError::Subscribe {
                subject, source, ..
            } => write!(f, "failed to subscribe to '{subject}': {source}"),
        }
    }
}

impl Error for BindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BindError::Subscribe { source, .. } => Some(source),
            BindError::MissingInstanceId => None,
        }
    }
}

/// One `(subject, routing group, scope)` registration to hand to the bus.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Binding {
    subject: String,
    group: RoutingGroup,
    scope: String,
    delivery: Delivery,
}

impl Binding {
    pub fn new(descriptor: &SubjectDescriptor, instance_id: &str) -> Self {
        Self {
            subject: descriptor.full().to_string(),
            group: RoutingGroup::for_delivery(descriptor.delivery(), instance_id),
            scope: descriptor.scope().to_string(),
            delivery: descriptor.delivery(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn group(&self) -> &RoutingGroup {
        &self.group
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Introspection metadata attached to the subscription. Not used for routing.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(fields::TOPO_METADATA_KEY.to_string(), self.scope.clone())])
    }

    /// Separator-free name for buses that list endpoints by name, e.g. `svc-echo-all-eu`.
    pub fn endpoint_name(&self) -> String {
        self.subject.replace(SEPARATOR, "-")
    }
}

/// A subscription created by [`Binder::bind`]; hand it back to [`Binder::release`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subscription {
    id: SubscriptionId,
    binding: Binding,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn subject(&self) -> &str {
        self.binding.subject()
    }
}

///
/// [`Binder`] turns the bus's single "one subscriber per group" primitive into both
/// load-balanced and broadcast delivery by choosing the routing group per subject.
///
/// Binding the same endpoint twice concurrently is not supported; callers serialize
/// registrations per endpoint.
#[derive(Clone)]
pub struct Binder {
    transport: Arc<dyn BusTransport>,
}

impl Binder {
    pub fn new(transport: Arc<dyn BusTransport>) -> Self {
        Self { transport }
    }

    /// Computes the registrations for a descriptor set without touching the bus, in set
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingInstanceId`] when the set holds a broadcast subject and
    /// `instance_id` is empty.
    pub fn plan(descriptors: &DescriptorSet, instance_id: &str) -> Result<Vec<Binding>, BindError> {
        if instance_id.is_empty() && descriptors.iter().any(SubjectDescriptor::is_broadcast) {
            return Err(BindError::MissingInstanceId);
        }

        Ok(descriptors
            .iter()
            .map(|descriptor| Binding::new(descriptor, instance_id))
            .collect())
    }

    /// Registers `handler` once per descriptor, in set order.
    ///
    /// On the first rejected subscription the subscriptions already created are removed
    /// again and the bus error is returned inside [`BindError::Subscribe`].
    pub async fn bind(
        &self,
        handler: Arc<dyn MessageHandler>,
        descriptors: &DescriptorSet,
        instance_id: &str,
    ) -> Result<Vec<Subscription>, BindError> {
        let bindings = Self::plan(descriptors, instance_id)?;

        debug!(
            event = events::BIND_START,
            component = COMPONENT,
            instance_id,
            count = bindings.len(),
            "binding endpoint subjects"
        );

        let mut created: Vec<Subscription> = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match self.transport.subscribe(&binding, handler.clone()).await {
                Ok(id) => {
                    debug!(
                        event = events::SUBSCRIBE_OK,
                        component = COMPONENT,
                        subject = binding.subject(),
                        group = %binding.group(),
                        scope = fields::format_scope(binding.scope()),
                        subscription_id = %id,
                        "subscription created"
                    );
                    created.push(Subscription { id, binding });
                }
                Err(err) => {
                    warn!(
                        event = events::SUBSCRIBE_FAILED,
                        component = COMPONENT,
                        subject = binding.subject(),
                        group = %binding.group(),
                        err = %err,
                        "subscription rejected, rolling back endpoint"
                    );
                    let rolled_back = self.rollback(created).await;
                    warn!(
                        event = events::BIND_FAILED,
                        component = COMPONENT,
                        subject = binding.subject(),
                        count = rolled_back.len(),
                        "endpoint binding aborted"
                    );
                    return Err(BindError::Subscribe {
                        subject: binding.subject,
                        rolled_back,
                        source: err,
                    });
                }
            }
        }

        debug!(
            event = events::BIND_OK,
            component = COMPONENT,
            instance_id,
            count = created.len(),
            "endpoint bound"
        );

        Ok(created)
    }

    /// Removes subscriptions in reverse creation order. Returns the subjects in creation
    /// order.
    async fn rollback(&self, created: Vec<Subscription>) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::with_capacity(created.len());

        for subscription in created.into_iter().rev() {
            if let Err(err) = self.transport.unsubscribe(subscription.id).await {
                warn!(
                    event = events::ROLLBACK_UNSUBSCRIBE_FAILED,
                    component = COMPONENT,
                    subject = subscription.subject(),
                    subscription_id = %subscription.id,
                    err = %err,
                    reason = fields::REASON_ROLLBACK_AFTER_SUBSCRIBE_FAILURE,
                    "unable to unsubscribe during rollback"
                );
            } else {
                debug!(
                    event = events::ROLLBACK_UNSUBSCRIBE_OK,
                    component = COMPONENT,
                    subject = subscription.subject(),
                    subscription_id = %subscription.id,
                    reason = fields::REASON_ROLLBACK_AFTER_SUBSCRIBE_FAILURE,
                    "rollback unsubscribe succeeded"
                );
            }
            subjects.push(subscription.binding.subject);
        }

        subjects.reverse();
        subjects
    }

    /// Removes every given subscription. All removals are attempted; the first failure
    /// is returned.
    pub async fn release(&self, subscriptions: Vec<Subscription>) -> Result<(), BusError> {
        let mut first_error: Option<BusError> = None;

        for subscription in subscriptions {
            match self.transport.unsubscribe(subscription.id).await {
                Ok(()) => {
                    debug!(
                        event = events::RELEASE_OK,
                        component = COMPONENT,
                        subject = subscription.subject(),
                        subscription_id = %subscription.id,
                        "subscription released"
                    );
                }
                Err(err) => {
                    warn!(
                        event = events::RELEASE_FAILED,
                        component = COMPONENT,
                        subject = subscription.subject(),
                        subscription_id = %subscription.id,
                        err = %err,
                        "unable to release subscription"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!(
                    event = events::RELEASE_OK,
                    component = COMPONENT,
                    "subscriptions released"
                );
                Ok(())
            }
        }
    }
}
