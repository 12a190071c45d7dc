//! GraphQL Client
//!
//! Talks to the project's GraphQL endpoint. Query documents live in
//! `queries`; this module handles transport and the `{data, errors}`
//! envelope.

mod queries;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{DomainError, DomainResult, Issue, IssueUpdate, Project};
use crate::repository::IssueStore;

pub use queries::{CREATE_PROJECT, FIND_PROJECT, ISSUES, UPDATE_ISSUE};

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

/// Decode a GraphQL response body.
///
/// The first reported error wins, even when partial data came along;
/// its message is what the user gets to see.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> DomainResult<T> {
    let response: GraphqlResponse<T> = serde_json::from_str(body)?;
    if let Some(error) = response.errors.into_iter().next() {
        return Err(DomainError::Rejected(error.message));
    }
    response
        .data
        .ok_or_else(|| DomainError::Internal("GraphQL response without data".to_string()))
}

#[derive(Deserialize)]
struct IssuesData {
    issues: IssuePage,
}

#[derive(Deserialize)]
struct IssuePage {
    data: Vec<Issue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateIssueData {
    update_issue: Issue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindProjectData {
    find_project: Option<Project>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectData {
    create_project: Project,
}

/// GraphQL-backed issue store
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one query or mutation
    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> DomainResult<T> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() && body.trim().is_empty() {
            return Err(DomainError::Internal(format!("GraphQL endpoint returned {}", status)));
        }
        parse_response(&body)
    }

    pub async fn find_project(&self, project_id: &str) -> DomainResult<Option<Project>> {
        let data: FindProjectData = self.execute(FIND_PROJECT, json!({ "projectId": project_id })).await?;
        Ok(data.find_project)
    }

    pub async fn create_project(&self, project: &Project) -> DomainResult<Project> {
        project.validate()?;
        let data: CreateProjectData = self
            .execute(CREATE_PROJECT, json!({ "name": project.name, "key": project.key }))
            .await?;
        Ok(data.create_project)
    }
}

#[async_trait]
impl IssueStore for GraphqlClient {
    async fn list_issues(&self, project_id: &str) -> DomainResult<Vec<Issue>> {
        let data: IssuesData = self.execute(ISSUES, json!({ "projectId": project_id })).await?;
        Ok(data.issues.data)
    }

    async fn update_issue(&self, update: &IssueUpdate) -> DomainResult<Issue> {
        let data: UpdateIssueData = self.execute(UPDATE_ISSUE, serde_json::to_value(update)?).await?;
        Ok(data.update_issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueStatus;

    #[test]
    fn test_parse_issue_list() {
        let body = r#"{"data":{"issues":{"data":[
            {"id":"1","key":"BRD-1","name":"A","status":"TODO","type":"TASK","projectId":"p","boardPosition":1},
            {"id":"2","key":"BRD-2","name":"B","status":"DONE","type":"BUG","projectId":"p","boardPosition":0.5}
        ]}}}"#;
        let data: IssuesData = parse_response(body).unwrap();
        assert_eq!(data.issues.data.len(), 2);
        assert_eq!(data.issues.data[1].status, IssueStatus::Done);
        assert_eq!(data.issues.data[0].board_position, 1.0);
    }

    #[test]
    fn test_first_error_message_surfaces() {
        let body = r#"{"data":null,"errors":[{"message":"Not authorised"},{"message":"second"}]}"#;
        let err = parse_response::<Value>(body).unwrap_err();
        assert_eq!(err, DomainError::Rejected("Not authorised".to_string()));
        assert_eq!(err.to_string(), "Not authorised");
    }

    #[test]
    fn test_missing_data_and_garbage() {
        assert!(matches!(parse_response::<Value>(r#"{}"#), Err(DomainError::Internal(_))));
        assert!(matches!(parse_response::<Value>("<html>"), Err(DomainError::Internal(_))));
    }

    #[test]
    fn test_update_variables_shape() {
        let update = IssueUpdate { id: "7".to_string(), status: IssueStatus::InProgress, board_position: 2.5 };
        let variables = serde_json::to_value(&update).unwrap();
        assert_eq!(variables, json!({ "id": "7", "status": "IN_PROGRESS", "boardPosition": 2.5 }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let client = GraphqlClient::new("http://127.0.0.1:9/graphql");
        let err = client.list_issues("p").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
