//! Create, update and delete flows for the distribution custom resource.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use super::api::{ApiError, DistributionApi, LiveDistribution};
use super::event::{CustomResourceEvent, RequestType};
use super::lifecycle::{disabled_config, DeletionStep, PollOutcome, StatusClass};
use super::response::{validate_response_keys, CREATE_RESPONSE_KEYS};
use super::tag_work::plan_tag_update;
use crate::app::cfront::{
    CallerReferenceProvider, CanonicalForm, Distribution, ExternalForm, Tags, UuidCallerReference,
};

/// What CloudFormation gets back for a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerOutcome {
    pub physical_resource_id: Option<String>,
    /// Attributes for `Fn::GetAtt`: `ARN` and `DomainName`
    pub data: BTreeMap<String, String>,
}

impl HandlerOutcome {
    fn for_distribution(id: &str, arn: &str, domain_name: &str) -> Self {
        let mut data = BTreeMap::new();
        data.insert("ARN".to_string(), arn.to_string());
        data.insert("DomainName".to_string(), domain_name.to_string());
        Self {
            physical_resource_id: Some(id.to_string()),
            data,
        }
    }

    fn for_live(live: &LiveDistribution) -> Self {
        Self::for_distribution(&live.id, &live.arn, &live.domain_name)
    }

    fn resource_only(id: &str) -> Self {
        Self {
            physical_resource_id: Some(id.to_string()),
            data: BTreeMap::new(),
        }
    }
}

/// How often and how long the `wait_for_*` helpers poll
#[derive(Debug, Clone, Copy)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_attempts: 120,
        }
    }
}

pub struct CustomResourceHandler<A> {
    api: A,
    caller_references: Box<dyn CallerReferenceProvider>,
}

impl<A: DistributionApi> CustomResourceHandler<A> {
    pub fn new(api: A) -> Self {
        Self::with_caller_references(api, UuidCallerReference)
    }

    pub fn with_caller_references(
        api: A,
        caller_references: impl CallerReferenceProvider + 'static,
    ) -> Self {
        Self {
            api,
            caller_references: Box::new(caller_references),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn handle(&self, event: &CustomResourceEvent) -> Result<HandlerOutcome> {
        trace_info!(
            "{} request {} for {}",
            event.request_type,
            event.request_id,
            event.logical_resource_id
        );
        match event.request_type {
            RequestType::Create => self.create(event).await,
            RequestType::Update => self.update(event).await,
            RequestType::Delete => self.delete(event).await,
        }
    }

    async fn create(&self, event: &CustomResourceEvent) -> Result<HandlerOutcome> {
        let distribution = event.desired_distribution(self.caller_references.as_ref())?;

        let response = match distribution.tags() {
            Some(_) => {
                let payload = distribution.to_canonical_form();
                trace_info!("create payload: {}", payload);
                self.api.create_distribution_with_tags(payload).await
            }
            None => {
                let payload = distribution.distribution_config().to_canonical_form();
                trace_info!("create payload: {}", payload);
                self.api.create_distribution(payload).await
            }
        }
        .context("Failed to create CloudFront distribution")?;

        if let Err(e) = validate_response_keys(&response, CREATE_RESPONSE_KEYS) {
            trace_error!("response validation error: {:#}", e);
            return Err(e);
        }

        created_outcome(&response)
    }

    async fn update(&self, event: &CustomResourceEvent) -> Result<HandlerOutcome> {
        let id = event.require_physical_resource_id()?;
        if event.old_resource_properties.is_none() {
            bail!(
                "missing 'OldResourceProperties' (original resource values) in update for {}",
                id
            );
        }

        let live = self.fetch_live(id).await?;
        trace_debug!("existing live item: {:?}", live);

        let live_tags = if event.manages_tags() {
            self.fetch_live_tags(&live.arn).await?
        } else {
            Tags::default()
        };

        let caller_reference = live.caller_reference()?;
        let desired = event
            .desired_distribution(self.caller_references.as_ref())?
            .with_caller_reference(caller_reference);
        let previous = event
            .previous_distribution(self.caller_references.as_ref())?
            .with_caller_reference(caller_reference);

        if desired == previous {
            trace_info!("template for {} is unchanged from its previous version", id);
        }

        let desired_config = desired.distribution_config().to_canonical_form();
        if desired_config == live.config {
            trace_debug!("desired config for {} equals the live config", id);
        } else {
            trace_debug!(
                "desired config for {} differs from the live config. desired: {} live: {}",
                id,
                desired_config,
                live.config
            );
        }

        let work = plan_tag_update(&live_tags, desired.tags(), previous.tags());
        if !work.tags.is_empty() {
            trace_info!("adding tags to {}: {:?}", live.arn, work.tags);
            self.api
                .tag_resource(&live.arn, &Tags::new(work.tags.clone()))
                .await
                .with_context(|| format!("Failed to tag {}", live.arn))?;
        }
        if !work.untag_keys.is_empty() {
            trace_info!("removing tags from {}: {:?}", live.arn, work.untag_keys);
            self.api
                .untag_resource(&live.arn, &work.untag_keys)
                .await
                .with_context(|| format!("Failed to untag {}", live.arn))?;
        }

        let etag = live.require_etag()?;
        match self.api.update_distribution(id, etag, desired_config).await {
            Ok(_) => trace_info!("updated distribution {}", id),
            Err(ApiError::NoUpdates) => trace_info!("no updates to perform on {}", id),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to update distribution {}", id))
            }
        }

        Ok(HandlerOutcome::for_live(&live))
    }

    async fn delete(&self, event: &CustomResourceEvent) -> Result<HandlerOutcome> {
        let id = event.require_physical_resource_id()?;
        match self.step_deletion(id).await? {
            Some(step) => trace_info!("delete of {}: {:?}", id, step),
            None => trace_info!("distribution {} no longer exists", id),
        }
        Ok(HandlerOutcome::resource_only(id))
    }

    /// One pass over a create or update that CloudFront is still deploying
    pub async fn poll_create_update(&self, id: &str) -> Result<PollOutcome> {
        let live = self.fetch_live(id).await?;
        let outcome = match live.status_class() {
            StatusClass::Success => PollOutcome::Complete(HandlerOutcome::for_live(&live)),
            StatusClass::Failed => PollOutcome::Failed(live.status.clone()),
            StatusClass::InProgress | StatusClass::Unknown => PollOutcome::Pending,
        };
        trace_debug!("poll of {} with status {}: {:?}", id, live.status, outcome);
        Ok(outcome)
    }

    /// One pass of the disable-then-delete sequence
    pub async fn poll_delete(&self, id: &str) -> Result<PollOutcome> {
        let outcome = match self.step_deletion(id).await? {
            None | Some(DeletionStep::Delete) => {
                PollOutcome::Complete(HandlerOutcome::resource_only(id))
            }
            Some(DeletionStep::Wait) | Some(DeletionStep::Disable) => PollOutcome::Pending,
        };
        Ok(outcome)
    }

    pub async fn wait_for_deployment(&self, id: &str, schedule: PollSchedule) -> Result<HandlerOutcome> {
        for attempt in 1..=schedule.max_attempts {
            match self.poll_create_update(id).await? {
                PollOutcome::Complete(outcome) => return Ok(outcome),
                PollOutcome::Failed(status) => {
                    bail!("distribution {} ended in status {}", id, status)
                }
                PollOutcome::Pending => {
                    trace_debug!("{} still deploying (attempt {})", id, attempt);
                    if attempt < schedule.max_attempts {
                        tokio::time::sleep(schedule.interval).await;
                    }
                }
            }
        }
        bail!(
            "distribution {} not deployed after {} polls",
            id,
            schedule.max_attempts
        )
    }

    pub async fn wait_for_deletion(&self, id: &str, schedule: PollSchedule) -> Result<HandlerOutcome> {
        for attempt in 1..=schedule.max_attempts {
            if let PollOutcome::Complete(outcome) = self.poll_delete(id).await? {
                return Ok(outcome);
            }
            trace_debug!("{} not deleted yet (attempt {})", id, attempt);
            if attempt < schedule.max_attempts {
                tokio::time::sleep(schedule.interval).await;
            }
        }
        bail!(
            "distribution {} not deleted after {} polls",
            id,
            schedule.max_attempts
        )
    }

    /// Advances deletion by one step. `None` when the distribution is already gone.
    async fn step_deletion(&self, id: &str) -> Result<Option<DeletionStep>> {
        let response = match self.api.get_distribution(id).await {
            Ok(response) => response,
            Err(ApiError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to get distribution {}", id)),
        };
        let live = LiveDistribution::from_response(&response)?;
        let etag = live.require_etag()?;
        let enabled = live.enabled().map_err(|e| {
            trace_error!("unable to read the live 'Enabled' state of {}: {:#}", id, e);
            e
        })?;

        let step = DeletionStep::decide(enabled, live.status_class());
        match step {
            DeletionStep::Wait => {}
            DeletionStep::Disable => {
                let config = disabled_config(&live.config)?;
                match self.api.update_distribution(id, etag, config).await {
                    Ok(_) | Err(ApiError::NoUpdates) => {}
                    Err(e) => {
                        return Err(e).with_context(|| format!("Failed to disable distribution {}", id))
                    }
                }
            }
            DeletionStep::Delete => {
                if let Err(e) = self.api.delete_distribution(id, etag).await {
                    trace_error!("error on delete of distribution {}: {}", id, e);
                    return Err(e).with_context(|| format!("Failed to delete distribution {}", id));
                }
            }
        }
        Ok(Some(step))
    }

    async fn fetch_live(&self, id: &str) -> Result<LiveDistribution> {
        let response = self
            .api
            .get_distribution(id)
            .await
            .with_context(|| format!("Failed to get distribution {}", id))?;
        LiveDistribution::from_response(&response)
    }

    async fn fetch_live_tags(&self, arn: &str) -> Result<Tags> {
        let response = self
            .api
            .list_tags(arn)
            .await
            .with_context(|| format!("Failed to list tags of {}", arn))?;
        live_tags_from_response(&response)
    }
}

/// Outcome of a create, from the `Distribution` in the create response
fn created_outcome(response: &Value) -> Result<HandlerOutcome> {
    let created = &response["Distribution"];
    let text = |key: &str| -> Result<String> {
        match created[key].as_str() {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => {
                trace_error!("create response has no usable 'Distribution.{}': {}", key, response);
                bail!("create response has no usable 'Distribution.{}'", key)
            }
        }
    };
    let (id, arn, domain_name) = (text("Id")?, text("ARN")?, text("DomainName")?);
    trace_info!(
        "resource CREATE: ID: {} ARN: {} DomainName: {} Status: {}",
        id,
        arn,
        domain_name,
        created["Status"]
    );
    Ok(HandlerOutcome::for_distribution(&id, &arn, &domain_name))
}

fn live_tags_from_response(response: &Value) -> Result<Tags> {
    match response.get("Tags") {
        Some(tags) if tags.get("Items").is_some() => {
            Tags::from_external_form(tags).context("Invalid ListTagsForResource response")
        }
        _ => Ok(Tags::default()),
    }
}

/// The request body the handler sends for an event, without calling anything
pub fn request_payload(
    event: &CustomResourceEvent,
    provider: &dyn CallerReferenceProvider,
) -> Result<Value> {
    let payload = match event.request_type {
        RequestType::Create => {
            let distribution: Distribution = event.desired_distribution(provider)?;
            match distribution.tags() {
                Some(_) => distribution.to_canonical_form(),
                None => distribution.distribution_config().to_canonical_form(),
            }
        }
        RequestType::Update => event
            .desired_distribution(provider)?
            .distribution_config()
            .to_canonical_form(),
        RequestType::Delete => serde_json::json!({ "Id": event.require_physical_resource_id()? }),
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_tags_without_items_are_empty() {
        assert!(live_tags_from_response(&json!({"Tags": {}})).unwrap().is_empty());
        assert!(live_tags_from_response(&json!({})).unwrap().is_empty());
        let tags = live_tags_from_response(&json!({
            "Tags": {"Items": [{"Key": "team", "Value": "edge"}]}
        }))
        .unwrap();
        assert_eq!(tags.get("team"), Some("edge"));
    }

    #[test]
    fn test_created_outcome_needs_string_ids() {
        let response = json!({"Distribution": {
            "Id": "E1", "ARN": "arn:e1", "Status": "InProgress",
            "DomainName": "d1.cloudfront.net", "DistributionConfig": {}
        }});
        let outcome = created_outcome(&response).unwrap();
        assert_eq!(outcome.physical_resource_id.as_deref(), Some("E1"));

        for id in [json!(42), json!(""), Value::Null] {
            let mut broken = response.clone();
            broken["Distribution"]["Id"] = id;
            let err = created_outcome(&broken).unwrap_err();
            assert!(err.to_string().contains("'Distribution.Id'"));
        }
    }

    #[test]
    fn test_outcome_data() {
        let outcome = HandlerOutcome::for_distribution("E1", "arn:e1", "d1.cloudfront.net");
        assert_eq!(outcome.physical_resource_id.as_deref(), Some("E1"));
        assert_eq!(outcome.data["ARN"], "arn:e1");
        assert_eq!(outcome.data["DomainName"], "d1.cloudfront.net");
        assert!(HandlerOutcome::resource_only("E1").data.is_empty());
    }
}
