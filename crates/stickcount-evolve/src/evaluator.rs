use crate::parameter::Individual;

/// Failure reported by an [`Evaluator`]; aborts the search.
#[derive(thiserror::Error, Debug)]
pub enum EvaluateError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl EvaluateError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }
}

/// Scores an [`Individual`]; higher is better.
///
/// Evaluations of one generation may run concurrently, hence `Sync`.
/// Implementations must be deterministic for reproducible searches.
pub trait Evaluator: Sync {
    fn evaluate(&self, individual: &Individual) -> Result<f64, EvaluateError>;
}

impl<F> Evaluator for F
where
    F: Fn(&Individual) -> f64 + Sync,
{
    fn evaluate(&self, individual: &Individual) -> Result<f64, EvaluateError> {
        Ok(self(individual))
    }
}
