//! Inference pipeline
//!
//! decode -> normalize -> score -> decide, for one payload. Stateless per
//! call; the pipeline object itself is built once and shared.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Fault;
use crate::logic::image::{decode, normalize, ChannelOrder};
use crate::logic::model::{ClassifierAdapter, DecisionPolicy, Model};

/// Outcome of a scored request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub cheating: bool,
    pub confidence: f32,
}

pub struct Pipeline {
    classifier: ClassifierAdapter,
    policy: DecisionPolicy,
    channel_order: ChannelOrder,
}

impl Pipeline {
    pub fn new(model: Arc<dyn Model>, policy: DecisionPolicy, channel_order: ChannelOrder) -> Self {
        Self {
            classifier: ClassifierAdapter::new(model),
            policy,
            channel_order,
        }
    }

    /// Run every stage on one encoded payload. Blocking and CPU bound.
    pub fn run(&self, payload: &str) -> Result<Decision, Fault> {
        let grid = decode(payload)?;
        tracing::trace!(width = grid.width(), height = grid.height(), "decoded frame");
        let tensor = normalize(&grid, self.channel_order);
        let confidence = self.classifier.score(&tensor)?;

        Ok(Decision {
            cheating: self.policy.decide(confidence),
            confidence,
        })
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    pub fn model_name(&self) -> String {
        self.classifier.model_name()
    }
}
