//! Network actor - runs student API calls in the Tokio runtime

use std::future::Future;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::network::Operation;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::StudentClient;
use crate::network::error::ApiError;

/// Network actor that turns commands into API calls
pub struct NetworkActor {
    client: StudentClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: StudentClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => break,
                        Some(cmd) => self.spawn(cmd),
                    }
                }

                // Reap finished tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Request task panicked");
                        }
                    }
                }
            }
        }

        let in_flight = self.active_requests.len();
        if in_flight > 0 {
            tracing::info!(in_flight, "Aborting in-flight requests");
        }
        self.active_requests.shutdown().await;
    }

    fn spawn(&mut self, cmd: NetworkCommand) {
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            if let Some(response) = execute(&client, cmd).await {
                let _ = response_tx.send(response);
            }
        });
    }
}

/// Execute one command against the API and describe the outcome
async fn execute(client: &StudentClient, cmd: NetworkCommand) -> Option<NetworkResponse> {
    let response = match cmd {
        NetworkCommand::ListStudents { id } => {
            tracing::info!(id, "Fetching student list");
            let start = Instant::now();
            match client.list_students().await {
                Ok(students) => {
                    let time_ms = elapsed_ms(start);
                    tracing::info!(id, count = students.len(), time_ms, "Student list loaded");
                    NetworkResponse::StudentsLoaded { id, students, time_ms }
                }
                Err(e) => failed(id, Operation::List, e, elapsed_ms(start)),
            }
        }
        NetworkCommand::CreateStudent { id, student } => {
            tracing::info!(id, "Creating student");
            mutation(id, Operation::Create, client.create_student(&student)).await
        }
        NetworkCommand::UpdateStudent { id, student_id, draft } => {
            tracing::info!(id, student_id = %student_id, "Updating student");
            mutation(id, Operation::Update, client.update_student(&student_id, &draft)).await
        }
        NetworkCommand::DeleteStudent { id, student_id } => {
            tracing::info!(id, student_id = %student_id, "Deleting student");
            mutation(id, Operation::Delete, client.delete_student(&student_id)).await
        }
        NetworkCommand::Shutdown => return None,
    };
    Some(response)
}

async fn mutation(
    id: u64,
    operation: Operation,
    call: impl Future<Output = Result<(), ApiError>>,
) -> NetworkResponse {
    let start = Instant::now();
    match call.await {
        Ok(()) => {
            let time_ms = elapsed_ms(start);
            tracing::info!(id, operation = operation.as_str(), time_ms, "Request completed");
            NetworkResponse::MutationSucceeded { id, operation, time_ms }
        }
        Err(e) => failed(id, operation, e, elapsed_ms(start)),
    }
}

fn failed(id: u64, operation: Operation, error: ApiError, time_ms: u64) -> NetworkResponse {
    tracing::warn!(id, operation = operation.as_str(), status = ?error.status(), error = %error, "Request failed");
    NetworkResponse::Failed {
        id,
        operation,
        message: error.to_string(),
        time_ms,
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
