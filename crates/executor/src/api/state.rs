use crate::services::execution_service::ExecutionService;

pub struct ApiState {
    pub execution: ExecutionService,
}
