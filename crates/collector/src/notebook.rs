use crate::{ExecutionContext, NotebookProbe};

/// Notebook detection through the environment.
///
/// Jupyter kernels export `JPY_SESSION_NAME` with the session's
/// notebook path; outside a kernel the variable is unset and the
/// context is absent. There is no portable cell counter in the
/// environment, so hosts that know it inject a [`StaticNotebookProbe`]
/// instead.
#[derive(Default)]
pub struct EnvNotebookProbe;

const JUPYTER_SESSION_VAR: &str = "JPY_SESSION_NAME";

#[async_trait::async_trait]
impl NotebookProbe for EnvNotebookProbe {
    async fn execution_context(&self) -> ExecutionContext {
        let source = std::env::var(JUPYTER_SESSION_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());
        ExecutionContext {
            source,
            cell_number: None,
        }
    }
}

/// Fixed execution context, for hosts that track their own state and
/// for deterministic tests.
#[derive(Default, Clone)]
pub struct StaticNotebookProbe {
    pub source: Option<String>,
    pub cell_number: Option<u64>,
}

#[async_trait::async_trait]
impl NotebookProbe for StaticNotebookProbe {
    async fn execution_context(&self) -> ExecutionContext {
        ExecutionContext {
            source: self.source.clone(),
            cell_number: self.cell_number,
        }
    }
}
