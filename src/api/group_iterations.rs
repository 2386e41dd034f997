//! Group iterations endpoint.
//!
//! Maps to `groups/:id/iterations` and its sub-resources.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::IterationState;
use crate::options::{validate, Literal, OptionSchema, Predicate, Schema, ValueRule, ValueType};
use crate::path::{GroupId, ResourceLocator};
use crate::transport::{to_payload, Method, Transport};

const STATES: &[Literal] = &[
    Literal::Str(IterationState::All.as_str()),
    Literal::Str(IterationState::Opened.as_str()),
    Literal::Str(IterationState::Closed.as_str()),
];

/// Options accepted by [`GroupIterations::all`].
pub const LIST_SCHEMA: Schema = Schema::new(&[
    OptionSchema::defined("iids")
        .allowed_types(&[ValueType::Array])
        .allowed_values(ValueRule::Predicate(Predicate::EachElement(ValueType::Int))),
    OptionSchema::defined("state").allowed_values(ValueRule::OneOf(STATES)),
    OptionSchema::defined("search"),
    OptionSchema::defined("updated_after"),
    OptionSchema::defined("in"),
]);

/// Operations on a group's iterations.
///
/// Responses are returned exactly as decoded by the transport. Deserialize
/// them into [`Iteration`](crate::Iteration) where a typed view is wanted.
///
/// # Example
///
/// ```no_run
/// use gitlabapi::GitLabClient;
/// use serde_json::json;
///
/// # async fn example() -> gitlabapi::Result<()> {
/// let client = GitLabClient::from_env()?;
/// let iterations = client.group_iterations();
///
/// let opened = iterations.all(5, &json!({"state": "opened"})).await?;
/// let one = iterations.show("gitlab-org/plan", 42).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy)]
pub struct GroupIterations<'a> {
    transport: &'a dyn Transport,
}

impl std::fmt::Debug for GroupIterations<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupIterations").finish_non_exhaustive()
    }
}

impl<'a> GroupIterations<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// List iterations of a group.
    ///
    /// Accepted options: `iids` (array of integers), `state` (`all`,
    /// `opened` or `closed`), `search`, `updated_after` and `in`. Pass
    /// `&()` for no filters, or an [`IterationListQuery`](crate::IterationListQuery).
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending anything if the options
    /// do not match the schema.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty))]
    pub async fn all<P: Serialize + ?Sized>(
        &self,
        group_id: impl Into<GroupId>,
        params: &P,
    ) -> Result<Value> {
        let group_id = record_group(group_id);
        let query = validate(&LIST_SCHEMA, to_payload(params)?).inspect_err(|e| {
            tracing::warn!(option = e.option(), "rejected list options: {e}");
        })?;

        let path = iterations(&group_id).to_string();
        self.transport
            .request(Method::Get, &path, Some(query.as_map()))
            .await
    }

    /// Fetch a single iteration.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty, iteration_id = iteration_id))]
    pub async fn show(&self, group_id: impl Into<GroupId>, iteration_id: u64) -> Result<Value> {
        let group_id = record_group(group_id);
        let path = iterations(&group_id).id(iteration_id).to_string();
        self.transport.request(Method::Get, &path, None).await
    }

    /// Create an iteration. The body is sent as given.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty))]
    pub async fn create<B: Serialize + ?Sized>(
        &self,
        group_id: impl Into<GroupId>,
        params: &B,
    ) -> Result<Value> {
        let group_id = record_group(group_id);
        let body = to_payload(params)?;
        let path = iterations(&group_id).to_string();
        self.transport.request(Method::Post, &path, Some(&body)).await
    }

    /// Update an iteration. The body is sent as given.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty, iteration_id = iteration_id))]
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        group_id: impl Into<GroupId>,
        iteration_id: u64,
        params: &B,
    ) -> Result<Value> {
        let group_id = record_group(group_id);
        let body = to_payload(params)?;
        let path = iterations(&group_id).id(iteration_id).to_string();
        self.transport.request(Method::Put, &path, Some(&body)).await
    }

    /// Delete an iteration.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty, iteration_id = iteration_id))]
    pub async fn remove(&self, group_id: impl Into<GroupId>, iteration_id: u64) -> Result<Value> {
        let group_id = record_group(group_id);
        let path = iterations(&group_id).id(iteration_id).to_string();
        self.transport.request(Method::Delete, &path, None).await
    }

    /// Issues assigned to an iteration.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty, iteration_id = iteration_id))]
    pub async fn issues(&self, group_id: impl Into<GroupId>, iteration_id: u64) -> Result<Value> {
        self.sub_resource(group_id, iteration_id, "issues").await
    }

    /// Discussions of an iteration.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty, iteration_id = iteration_id))]
    pub async fn show_discussions(
        &self,
        group_id: impl Into<GroupId>,
        iteration_id: u64,
    ) -> Result<Value> {
        self.sub_resource(group_id, iteration_id, "discussions").await
    }

    /// Notes of an iteration.
    #[tracing::instrument(skip_all, fields(group = tracing::field::Empty, iteration_id = iteration_id))]
    pub async fn show_notes(&self, group_id: impl Into<GroupId>, iteration_id: u64) -> Result<Value> {
        self.sub_resource(group_id, iteration_id, "notes").await
    }

    async fn sub_resource(
        &self,
        group_id: impl Into<GroupId>,
        iteration_id: u64,
        name: &'static str,
    ) -> Result<Value> {
        let group_id = record_group(group_id);
        let path = iterations(&group_id)
            .id(iteration_id)
            .literal(name)
            .to_string();
        self.transport.request(Method::Get, &path, None).await
    }
}

fn iterations(group_id: &GroupId) -> ResourceLocator {
    ResourceLocator::new("groups").id(group_id).literal("iterations")
}

/// Convert the group reference and attach it to the current span.
fn record_group(group_id: impl Into<GroupId>) -> GroupId {
    let group_id = group_id.into();
    tracing::Span::current().record("group", tracing::field::display(&group_id));
    group_id
}
