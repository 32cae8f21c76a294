use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::CollectError;
use crate::metric::Metric;

/// Runs a collector body, turning a panic into
/// [`CollectError::FaultRecovered`] so one malformed metric never takes the
/// service down.
pub fn guard<T, F>(metric: Metric, body: F) -> Result<T, CollectError>
where
    F: FnOnce() -> Result<T, CollectError>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(metric = %metric, %message, "collector fault recovered");
            Err(CollectError::FaultRecovered { metric, message })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown fault".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_results_through() {
        let ok: Result<u8, CollectError> = guard(Metric::Cpu, || Ok(7));
        assert_eq!(ok.unwrap(), 7);

        let err: Result<u8, CollectError> =
            guard(Metric::Cpu, || Err(CollectError::HostIdentity));
        assert!(matches!(err, Err(CollectError::HostIdentity)));
    }

    #[test]
    fn out_of_range_access_is_recovered() {
        let fields: Vec<&str> = Vec::new();
        let result: Result<String, CollectError> =
            guard(Metric::Network, || Ok(fields[2].to_string()));

        match result {
            Err(CollectError::FaultRecovered { metric, message }) => {
                assert_eq!(metric, Metric::Network);
                assert!(message.contains("index out of bounds"), "{message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn formatted_panic_message_is_kept() {
        let result: Result<(), CollectError> =
            guard(Metric::Mem, || panic!("bad row {}", 3));
        assert!(
            matches!(result, Err(CollectError::FaultRecovered { ref message, .. }) if message == "bad row 3")
        );
    }
}
