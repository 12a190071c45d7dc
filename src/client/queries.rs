//! GraphQL documents

pub const ISSUES: &str = r#"
query Issues($projectId: ID!) {
  issues(projectId: $projectId) {
    data {
      id
      key
      name
      status
      type
      projectId
      boardPosition
      sprintPosition
      assigneeId
      parentId
      sprintId
    }
  }
}
"#;

pub const UPDATE_ISSUE: &str = r#"
mutation UpdateIssue($id: ID!, $status: IssueStatus!, $boardPosition: Float!) {
  updateIssue(id: $id, status: $status, boardPosition: $boardPosition) {
    id
    key
    name
    status
    type
    projectId
    boardPosition
    sprintPosition
    assigneeId
    parentId
    sprintId
  }
}
"#;

pub const FIND_PROJECT: &str = r#"
query FindProject($projectId: ID!) {
  findProject(projectId: $projectId) {
    id
    name
    key
  }
}
"#;

pub const CREATE_PROJECT: &str = r#"
mutation CreateProject($name: String!, $key: String!) {
  createProject(name: $name, key: $key) {
    id
    name
    key
  }
}
"#;
