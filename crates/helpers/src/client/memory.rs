use async_trait::async_trait;
use runtime_helpers_common::{Environment, Service, Variable};
use tokio::sync::Mutex;

use super::{ApiError, ServerlessApi};

/// Number of calls made to each management operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_services: usize,
    pub list_environments: usize,
    pub list_variables: usize,
    pub create_variable: usize,
    pub update_variable: usize,
}

#[derive(Debug, Default)]
struct State {
    services: Vec<Service>,
    environments: Vec<Environment>,
    variables: Vec<Variable>,
    calls: CallCounts,
    next_id: u64,
    fail_list: bool,
    fail_create: bool,
    fail_update: bool,
}

/// In-process management API for local development and tests
///
/// Resources are kept in insertion order, which is the order the list operations
/// report them in.
#[derive(Debug, Default)]
pub struct InMemoryServerless {
    state: Mutex<State>,
}

impl InMemoryServerless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.state.get_mut().services.push(service);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.state.get_mut().environments.push(environment);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.state.get_mut().variables.push(variable);
        self
    }

    /// Make every list operation fail
    pub fn failing_lists(mut self) -> Self {
        self.state.get_mut().fail_list = true;
        self
    }

    /// Make `create_variable` fail
    pub fn failing_creates(mut self) -> Self {
        self.state.get_mut().fail_create = true;
        self
    }

    /// Make `update_variable` fail
    pub fn failing_updates(mut self) -> Self {
        self.state.get_mut().fail_update = true;
        self
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.lock().await.calls
    }

    /// Snapshot of the variables stored for an environment
    pub async fn variables(&self, environment_sid: &str) -> Vec<Variable> {
        self.state
            .lock()
            .await
            .variables
            .iter()
            .filter(|v| v.environment_sid == environment_sid)
            .cloned()
            .collect()
    }
}

fn unavailable(operation: &str) -> ApiError {
    ApiError::Unavailable(format!("{} failed", operation))
}

#[async_trait]
impl ServerlessApi for InMemoryServerless {
    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.list_services += 1;
        if state.fail_list {
            return Err(unavailable("list services"));
        }
        Ok(state.services.clone())
    }

    async fn list_environments(&self, service_sid: &str) -> Result<Vec<Environment>, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.list_environments += 1;
        if state.fail_list {
            return Err(unavailable("list environments"));
        }
        Ok(state
            .environments
            .iter()
            .filter(|e| e.service_sid == service_sid)
            .cloned()
            .collect())
    }

    async fn list_variables(
        &self,
        service_sid: &str,
        environment_sid: &str,
    ) -> Result<Vec<Variable>, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.list_variables += 1;
        if state.fail_list {
            return Err(unavailable("list variables"));
        }
        Ok(state
            .variables
            .iter()
            .filter(|v| v.service_sid == service_sid && v.environment_sid == environment_sid)
            .cloned()
            .collect())
    }

    async fn create_variable(
        &self,
        service_sid: &str,
        environment_sid: &str,
        key: &str,
        value: &str,
    ) -> Result<Variable, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.create_variable += 1;
        if state.fail_create {
            return Err(unavailable("create variable"));
        }

        state.next_id += 1;
        let variable = Variable::new(
            format!("ZV{:032x}", state.next_id),
            service_sid,
            environment_sid,
            key,
            value,
        );
        state.variables.push(variable.clone());
        Ok(variable)
    }

    async fn update_variable(
        &self,
        service_sid: &str,
        environment_sid: &str,
        variable_sid: &str,
        value: &str,
    ) -> Result<Variable, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.update_variable += 1;
        if state.fail_update {
            return Err(unavailable("update variable"));
        }

        let variable = state
            .variables
            .iter_mut()
            .find(|v| {
                v.sid == variable_sid
                    && v.service_sid == service_sid
                    && v.environment_sid == environment_sid
            })
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("Variable {} not found", variable_sid),
            })?;

        variable.value = value.to_string();
        Ok(variable.clone())
    }
}
